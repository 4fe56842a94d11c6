use std::error::Error as StdError;
use std::fmt;

/// Everything that can end a caption attempt early.
///
/// All variants are recoverable: the user can pick another image or retry.
/// The variants stay distinct even where the user-facing copy is similar so
/// that logs can tell a malformed response apart from a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionError {
    /// The chosen file was rejected before any network interaction.
    Validation(String),

    /// A caption was requested with no image selected.
    Precondition,

    /// The endpoint answered with a non-success status.
    Remote {
        /// HTTP status code returned by the endpoint.
        status: u16,
    },

    /// The endpoint answered 2xx but without a usable `caption` field.
    MalformedResponse {
        /// What was wrong with the body, for logs.
        detail: String,
    },

    /// No response could be obtained (connectivity, DNS, TLS, timeout).
    Transport {
        /// The underlying transport error, for logs.
        detail: String,
    },
}

impl CaptionError {
    /// Short, user-readable message suitable for the error line.
    pub fn user_message(&self) -> String {
        match self {
            CaptionError::Validation(message) => message.clone(),
            CaptionError::Precondition => "Please upload an image first.".to_string(),
            CaptionError::Remote { status } => {
                format!("API request failed with status {status}.")
            }
            CaptionError::MalformedResponse { .. } => "Caption generation failed.".to_string(),
            CaptionError::Transport { .. } => {
                "An error occurred while generating the caption. Please try again.".to_string()
            }
        }
    }

    /// Stable label for the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CaptionError::Validation(_) => "validation",
            CaptionError::Precondition => "precondition",
            CaptionError::Remote { .. } => "remote",
            CaptionError::MalformedResponse { .. } => "malformed_response",
            CaptionError::Transport { .. } => "transport",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CaptionError::Remote { .. }
                | CaptionError::MalformedResponse { .. }
                | CaptionError::Transport { .. }
        )
    }
}

impl fmt::Display for CaptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionError::MalformedResponse { detail } | CaptionError::Transport { detail } => {
                write!(f, "{} ({})", self.user_message(), detail)
            }
            _ => f.write_str(&self.user_message()),
        }
    }
}

impl StdError for CaptionError {}

impl From<reqwest::Error> for CaptionError {
    fn from(err: reqwest::Error) -> Self {
        CaptionError::Transport {
            detail: err.to_string(),
        }
    }
}

/// A clipboard write that did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardError(pub String);

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for ClipboardError {}
