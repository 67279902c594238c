//! Typed error hierarchy for the folio admin client.
//!
//! Four enums cover the library's failure surfaces:
//! - `ApiError`: anything that went wrong talking to the portfolio API
//! - `FormError`: a submission blocked before any request was made
//! - `ListError`: an action the project list refused to start
//! - `StoreError`: the on-disk session file could not be read or written

use thiserror::Error;

/// Fallback text when the server gives no message of its own.
pub const GENERIC_SERVER_ERROR: &str = "An error occurred";

/// Text for bodies that are not JSON at all.
pub const INVALID_RESPONSE: &str = "Network error or invalid response";

/// Errors from the API client. Transport errors never escape raw; they are
/// folded into `Network` with a per-operation message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Network(String),

    #[error("Network error or invalid response")]
    InvalidResponse,
}

impl ApiError {
    /// User-facing text for a notification description.
    pub fn description(&self) -> String {
        match self {
            ApiError::Unauthorized { message } | ApiError::Server { message, .. } => {
                message.clone()
            }
            ApiError::Network(message) => message.clone(),
            ApiError::InvalidResponse => INVALID_RESPONSE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// A form submission that was blocked client-side.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
}

/// Actions the project list refused to start.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("Another change is still in progress")]
    Busy,

    #[error("Project {id} not found")]
    UnknownProject { id: String },

    #[error("No delete is awaiting confirmation")]
    NoPendingDelete,

    #[error("Position {index} is out of range for {len} projects")]
    InvalidPosition { index: usize, len: usize },

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Errors from the file-backed session store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access session file at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is corrupt: {source}")]
    Serde {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session store lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_description_uses_server_message_verbatim() {
        let err = ApiError::Server {
            status: 422,
            message: "Title already taken".to_string(),
        };
        assert_eq!(err.description(), "Title already taken");
        assert!(err.to_string().contains("422"));
    }

    #[test]
    fn api_error_invalid_response_has_fixed_text() {
        assert_eq!(ApiError::InvalidResponse.description(), INVALID_RESPONSE);
        assert_eq!(ApiError::InvalidResponse.to_string(), INVALID_RESPONSE);
    }

    #[test]
    fn api_error_unauthorized_is_detectable() {
        let err = ApiError::Unauthorized {
            message: "Token expired".into(),
        };
        assert!(err.is_unauthorized());
        assert!(!ApiError::Network("x".into()).is_unauthorized());
    }

    #[test]
    fn form_error_lists_missing_fields() {
        let err = FormError::Incomplete {
            missing: vec!["title", "image"],
        };
        assert_eq!(err.to_string(), "Missing required fields: title, image");
    }

    #[test]
    fn list_error_converts_from_form_error() {
        let err: ListError = FormError::Incomplete {
            missing: vec!["title"],
        }
        .into();
        assert!(matches!(err, ListError::Form(FormError::Incomplete { .. })));
    }

    #[test]
    fn store_error_carries_path() {
        let path = std::path::PathBuf::from("/tmp/session.json");
        let err = StoreError::Io {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/session.json"));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&ApiError::InvalidResponse);
        assert_std_error(&FormError::Incomplete { missing: vec![] });
        assert_std_error(&ListError::Busy);
        assert_std_error(&StoreError::LockPoisoned);
    }
}
