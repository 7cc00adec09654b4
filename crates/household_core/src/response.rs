//! Uniform outcome envelope for every core operation.
//!
//! # Responsibility
//! - Format success and error outcomes into one wire shape.
//! - Carry HTTP-style status codes as data, independent of any transport.
//!
//! # Invariants
//! - Exactly one of `result` and `error` is non-null.
//! - Error constructors accept an explicit message that overrides the default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_SERVER_ERROR: u16 = 500;

const DEFAULT_BAD_REQUEST: &str = "Client made an invalid request";
const DEFAULT_METHOD_NOT_ALLOWED: &str =
    "Client made a request with an HTTP method that is not supported at this endpoint";
const DEFAULT_SERVER_ERROR: &str = "Internal server error";

/// Error half of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: u16,
}

/// `{ result, error }` wrapper returned by services and written by the
/// transport as the response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub result: Option<Vec<Value>>,
    pub error: Option<ErrorBody>,
}

impl Envelope {
    /// Wraps a list of result items. An empty list is still a success.
    pub fn success(result: Vec<Value>) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error envelope with an explicit message and code.
    pub fn error(message: impl Into<String>, code: u16) -> Self {
        Self {
            result: None,
            error: Some(ErrorBody {
                message: message.into(),
                code,
            }),
        }
    }

    /// Resource or route not found (404).
    ///
    /// Without a message, the default names `request_url` (empty if absent).
    pub fn not_found(message: Option<&str>, request_url: Option<&str>) -> Self {
        let message = match message {
            Some(message) => message.to_string(),
            None => format!(
                "Sorry this route {} does not exist. Check for spelling errors",
                request_url.unwrap_or_default()
            ),
        };
        Self::error(message, STATUS_NOT_FOUND)
    }

    pub fn bad_request(message: Option<&str>) -> Self {
        Self::error(
            message.unwrap_or(DEFAULT_BAD_REQUEST),
            STATUS_BAD_REQUEST,
        )
    }

    pub fn method_not_allowed(message: Option<&str>) -> Self {
        Self::error(
            message.unwrap_or(DEFAULT_METHOD_NOT_ALLOWED),
            STATUS_METHOD_NOT_ALLOWED,
        )
    }

    pub fn server_error(message: Option<&str>) -> Self {
        Self::error(
            message.unwrap_or(DEFAULT_SERVER_ERROR),
            STATUS_SERVER_ERROR,
        )
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// HTTP-style status: 200 for success, otherwise the carried code.
    pub fn status_code(&self) -> u16 {
        self.error.as_ref().map_or(STATUS_OK, |error| error.code)
    }

    /// Error message, if this is an error envelope.
    pub fn message(&self) -> Option<&str> {
        self.error.as_ref().map(|error| error.message.as_str())
    }
}
