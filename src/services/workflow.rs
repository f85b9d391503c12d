// src/services/workflow.rs
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::error::WorkflowError;
use crate::models::{CanonicalPayload, DscrResult, FieldKey, FieldStore};
use crate::services::client::DscrClient;
use crate::services::documents::save_document;
use crate::services::payload::build_payload;
use crate::services::validation::{validate, TOUCHED_ON_FAILURE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compute,
    Download,
}

impl Operation {
    fn fallback_message(self) -> &'static str {
        match self {
            Operation::Compute => "Unknown error",
            Operation::Download => "PDF error",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Compute => write!(f, "compute"),
            Operation::Download => write!(f, "download"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Submitting(Operation),
    Succeeded(Operation),
    Failed(Operation),
}

/// Observable state of the form's submission controls.
///
/// Every transition consumes the current value and returns the next one.
/// `loading` is true exactly while the phase is `Submitting`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub phase: Phase,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<DscrResult>,
    pub touched: BTreeSet<FieldKey>,
}

impl WorkflowState {
    pub fn begin_validation(self) -> Self {
        WorkflowState {
            phase: Phase::Validating,
            loading: false,
            error: None,
            ..self
        }
    }

    /// Validation failed: surface the message and flag the mandatory fields.
    pub fn reject(mut self, message: String) -> Self {
        self.touched.extend(TOUCHED_ON_FAILURE);
        WorkflowState {
            phase: Phase::Idle,
            loading: false,
            error: Some(message),
            ..self
        }
    }

    /// A request is about to go out. Compute also drops the previous result.
    pub fn dispatch(self, operation: Operation) -> Self {
        let result = match operation {
            Operation::Compute => None,
            Operation::Download => self.result,
        };
        WorkflowState {
            phase: Phase::Submitting(operation),
            loading: true,
            error: None,
            result,
            ..self
        }
    }

    pub fn compute_succeeded(self, result: DscrResult) -> Self {
        WorkflowState {
            phase: Phase::Succeeded(Operation::Compute),
            loading: false,
            error: None,
            result: Some(result),
            ..self
        }
    }

    pub fn download_succeeded(self) -> Self {
        WorkflowState {
            phase: Phase::Succeeded(Operation::Download),
            loading: false,
            ..self
        }
    }

    /// The request failed. Any result already held is left as is.
    pub fn fail(self, operation: Operation, message: String) -> Self {
        WorkflowState {
            phase: Phase::Failed(operation),
            loading: false,
            error: Some(message),
            ..self
        }
    }

    /// Returns control to the user.
    pub fn settle(self) -> Self {
        WorkflowState {
            phase: Phase::Idle,
            loading: false,
            ..self
        }
    }

    pub fn touch(mut self, key: FieldKey) -> Self {
        self.touched.insert(key);
        self
    }
}

/// Drives Compute and Download against the calculation service and publishes
/// every state change to subscribers.
pub struct Workflow {
    client: DscrClient,
    download_dir: PathBuf,
    state: watch::Sender<WorkflowState>,
}

impl Workflow {
    pub fn new(client: DscrClient, download_dir: impl Into<PathBuf>) -> Self {
        let (state, _) = watch::channel(WorkflowState::default());
        Workflow {
            client,
            download_dir: download_dir.into(),
            state,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Workflow::new(DscrClient::new(config.base_url.clone()), config.download_dir.clone())
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Current state snapshot.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    fn transition(&self, next: impl FnOnce(WorkflowState) -> WorkflowState) {
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = next(current);
        });
    }

    /// Marks a field as interacted with (blur).
    pub fn mark_touched(&self, key: FieldKey) {
        self.transition(|s| s.touch(key));
    }

    /// Builds and validates the payload, then asks the service for a DSCR
    /// result. Nothing is sent when a mandatory field is missing.
    pub async fn compute(&self, store: &FieldStore) -> Result<DscrResult, WorkflowError> {
        self.transition(WorkflowState::begin_validation);

        let payload = build_payload(store);
        let missing = validate(&payload);
        if !missing.is_empty() {
            let err = WorkflowError::Validation(missing);
            warn!("Compute rejected: {}", err);
            let message = err.to_string();
            self.transition(|s| s.reject(message));
            return Err(err);
        }

        self.transition(|s| s.dispatch(Operation::Compute));
        let outcome = self.client.compute(&payload).await;

        match &outcome {
            Ok(result) => {
                info!(
                    "Compute succeeded (baseline DSCR {:?}, final DSCR {:?})",
                    result.baseline_dscr(),
                    result.final_dscr()
                );
                let result = result.clone();
                self.transition(|s| s.compute_succeeded(result));
            }
            Err(e) => self.record_failure(Operation::Compute, e),
        }
        self.transition(WorkflowState::settle);

        outcome
    }

    /// Requests the filled-in document and saves it to the download
    /// directory. The payload is sent without validation.
    pub async fn download(&self, store: &FieldStore) -> Result<PathBuf, WorkflowError> {
        self.transition(|s| s.dispatch(Operation::Download));

        let payload = build_payload(store);
        let outcome = self.fetch_and_save(&payload).await;

        match &outcome {
            Ok(path) => {
                info!("Download succeeded: {}", path.display());
                self.transition(WorkflowState::download_succeeded);
            }
            Err(e) => self.record_failure(Operation::Download, e),
        }
        self.transition(WorkflowState::settle);

        outcome
    }

    async fn fetch_and_save(&self, payload: &CanonicalPayload) -> Result<PathBuf, WorkflowError> {
        let document = self.client.fetch_document(payload).await?;
        save_document(&self.download_dir, &document)
    }

    fn record_failure(&self, operation: Operation, err: &WorkflowError) {
        error!("{} failed: {}", operation, err);
        let message = err.display_message(operation.fallback_message());
        self.transition(|s| s.fail(operation, message));
    }
}
