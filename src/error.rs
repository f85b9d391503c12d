// src/error.rs
use thiserror::Error;

/// Every way a Compute or Download operation can fail.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Please provide: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    #[error("PDF generation failed: {status} {body}")]
    DocumentGeneration { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WorkflowError {
    /// Message shown to the user, or `fallback` when the error carries none.
    pub fn display_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_labels() {
        let err = WorkflowError::Validation(vec!["Days per month", "Km per day"]);
        assert_eq!(err.to_string(), "Please provide: Days per month, Km per day");
    }

    #[test]
    fn server_messages_carry_status_and_body() {
        let compute = WorkflowError::Server { status: 500, body: "internal error".into() };
        assert_eq!(compute.to_string(), "Server error 500: internal error");

        let document = WorkflowError::DocumentGeneration { status: 502, body: "bad gateway".into() };
        assert_eq!(document.to_string(), "PDF generation failed: 502 bad gateway");
    }

    #[test]
    fn empty_message_uses_fallback() {
        let err = WorkflowError::Io(std::io::Error::new(std::io::ErrorKind::Other, ""));
        assert_eq!(err.display_message("PDF error"), "PDF error");
    }
}
