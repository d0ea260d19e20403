//! Demo error taxonomy
//!
//! Expected failures carry a status code and a message and are raised on
//! purpose by loaders and actions. Unexpected failures stand for bugs and
//! failed outbound calls. Both reach the router unchanged, which renders them
//! as an error document.

use hyper::StatusCode;
use serde::Serialize;

/// Error raised by a loader or an action
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Keyed lookup missed (category, item, route).
    #[error("{message}")]
    NotFound { message: String },

    /// Deliberate failure with an explicit status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Input rejected before any state changed.
    #[error("{0}")]
    Validation(String),

    /// Discriminator did not name a known operation.
    #[error("Unknown action: {0}")]
    UnknownOperation(String),

    /// Fault that nobody planned for.
    #[error("{message}")]
    Unexpected {
        message: String,
        trace: Option<String>,
    },
}

impl DemoError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Build an unexpected fault, capturing a backtrace when the
    /// environment enables one (`RUST_BACKTRACE`).
    pub fn unexpected(message: impl Into<String>) -> Self {
        let backtrace = std::backtrace::Backtrace::capture();
        let trace = match backtrace.status() {
            std::backtrace::BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self::Unexpected {
            message: message.into(),
            trace,
        }
    }

    /// HTTP status the boundary answers with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Validation(_) | Self::UnknownOperation(_) => StatusCode::BAD_REQUEST,
            Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn is_expected(&self) -> bool {
        !matches!(self, Self::Unexpected { .. })
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Status { .. } => "status",
            Self::Validation(_) => "validation",
            Self::UnknownOperation(_) => "unknown_operation",
            Self::Unexpected { .. } => "unexpected",
        }
    }

    /// Render the error boundary payload for this failure
    pub fn to_body(&self, expose_trace: bool) -> ErrorBody {
        let status = self.status_code();
        let trace = match self {
            Self::Unexpected { trace, .. } if expose_trace => trace.clone(),
            _ => None,
        };
        ErrorBody {
            kind: self.kind(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown"),
            message: self.to_string(),
            trace,
        }
    }
}

/// Serialized form of a [`DemoError`]
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub status: u16,
    pub status_text: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DemoError::not_found("Category not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DemoError::status(400, "Bad request in action").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DemoError::UnknownOperation("fly".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DemoError::unexpected("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_status_falls_back_to_500() {
        let err = DemoError::status(42, "odd");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_body_hides_trace_unless_exposed() {
        let err = DemoError::Unexpected {
            message: "Unexpected error thrown in loader!".to_string(),
            trace: Some("frame 0".to_string()),
        };
        assert!(!err.is_expected());
        assert!(err.to_body(false).trace.is_none());
        assert_eq!(err.to_body(true).trace.as_deref(), Some("frame 0"));

        let body = err.to_body(false);
        assert_eq!(body.kind, "unexpected");
        assert_eq!(body.status, 500);
        assert_eq!(body.status_text, "Internal Server Error");
        assert_eq!(body.message, "Unexpected error thrown in loader!");
    }

    #[test]
    fn test_not_found_body() {
        let body = DemoError::not_found("Item not found").to_body(true);
        assert_eq!(body.kind, "not_found");
        assert_eq!(body.status, 404);
        assert_eq!(body.status_text, "Not Found");
        assert_eq!(body.message, "Item not found");
    }
}
