// src/services/documents.rs
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::WorkflowError;

pub const DOCUMENT_FILENAME: &str = "srwto_dscr_filled_form.pdf";

/// A downloaded document held in a temporary file until it is saved.
///
/// Saving consumes the handle; dropping it unsaved removes the file.
pub struct TransientDocument {
    file: NamedTempFile,
}

impl TransientDocument {
    /// Writes `contents` to a fresh temporary file inside `dir`.
    pub fn materialize(dir: &Path, contents: &[u8]) -> io::Result<Self> {
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents)?;
        file.flush()?;
        Ok(TransientDocument { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Moves the document to `target`, replacing anything already there.
    pub fn save_as(self, target: &Path) -> io::Result<PathBuf> {
        self.file.persist(target).map_err(|e| e.error)?;
        Ok(target.to_path_buf())
    }
}

/// Saves a downloaded document as `DOCUMENT_FILENAME` in `dir`.
///
/// The target is only ever replaced by a complete file.
pub fn save_document(dir: &Path, contents: &[u8]) -> Result<PathBuf, WorkflowError> {
    let transient = TransientDocument::materialize(dir, contents)?;
    let saved = transient.save_as(&dir.join(DOCUMENT_FILENAME))?;
    info!("Saved {}", saved.display());
    Ok(saved)
}
