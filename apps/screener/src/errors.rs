use thiserror::Error;

use crate::analyzer::AnalyzerError;

const INCOMPLETE_INPUT_MESSAGE: &str = "Please provide both a resume and a job description.";
const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again.";

/// Input problems caught locally, before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No resume file selected")]
    MissingFile,

    #[error("Job description is empty")]
    EmptyJobDescription,

    #[error("Unsupported resume file type: {file_name}")]
    UnsupportedFileType { file_name: String },

    #[error("Resume file is empty: {file_name}")]
    EmptyFile { file_name: String },
}

/// Terminal failure of one submission attempt.
///
/// Every variant maps onto the controller's `Failed` state; none is process-fatal.
/// `Display` carries the detail for logs, `user_message` the text safe to show.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request timed out after {after_secs}s")]
    TimedOut { after_secs: u64 },
}

impl SubmitError {
    /// Stable machine-readable code, used in log fields and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            SubmitError::Validation(_) => "VALIDATION_ERROR",
            SubmitError::Transport(_) => "TRANSPORT_ERROR",
            SubmitError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            SubmitError::Cancelled => "CANCELLED",
            SubmitError::TimedOut { .. } => "TIMED_OUT",
        }
    }

    /// Generic, non-leaking description for the user.
    ///
    /// Malformed responses and timeouts read exactly like transport failures.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(ValidationError::MissingFile)
            | SubmitError::Validation(ValidationError::EmptyJobDescription) => {
                INCOMPLETE_INPUT_MESSAGE.to_string()
            }
            SubmitError::Validation(ValidationError::UnsupportedFileType { .. }) => {
                "Only PDF resumes are supported.".to_string()
            }
            SubmitError::Validation(ValidationError::EmptyFile { .. }) => {
                "The selected resume file is empty.".to_string()
            }
            SubmitError::Cancelled => "Analysis was cancelled.".to_string(),
            SubmitError::Transport(_)
            | SubmitError::MalformedResponse(_)
            | SubmitError::TimedOut { .. } => ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::Validation(_))
    }
}

impl From<AnalyzerError> for SubmitError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Malformed(e) => SubmitError::MalformedResponse(e.to_string()),
            other => SubmitError::Transport(other.to_string()),
        }
    }
}

/// Operations the controller refuses outright, without touching its state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("A submission is already in flight")]
    SubmissionInFlight,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::payload::PayloadError;

    #[test]
    fn test_missing_inputs_share_one_message() {
        let a = SubmitError::from(ValidationError::MissingFile);
        let b = SubmitError::from(ValidationError::EmptyJobDescription);
        assert_eq!(a.user_message(), b.user_message());
        assert!(a.is_validation());
    }

    #[test]
    fn test_malformed_displays_like_transport() {
        let transport = SubmitError::Transport("status 502".to_string());
        let malformed = SubmitError::MalformedResponse("missing field".to_string());
        assert_eq!(transport.user_message(), malformed.user_message());
        assert_ne!(transport.code(), malformed.code());
    }

    #[test]
    fn test_user_message_does_not_leak_detail() {
        let err = SubmitError::Transport("connect 10.0.0.3:8000 refused".to_string());
        assert!(!err.user_message().contains("10.0.0.3"));
        assert!(err.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_analyzer_status_maps_to_transport() {
        let err = SubmitError::from(AnalyzerError::Status { status: 500 });
        assert_eq!(err.code(), "TRANSPORT_ERROR");
    }

    #[test]
    fn test_analyzer_malformed_maps_to_malformed_response() {
        let err = SubmitError::from(AnalyzerError::Malformed(PayloadError::InvalidPriority {
            priority: 7,
        }));
        assert_eq!(err.code(), "MALFORMED_RESPONSE");
        assert!(err.to_string().contains('7'));
    }
}
