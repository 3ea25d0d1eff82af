//! Failure classification.
//!
//! Every caught failure, whatever its origin, is normalized into a single
//! [`ClassifiedError`] shape carrying a status code, message, structured
//! details, and a timestamp. Downstream code branches on the status (or
//! [`ErrorKind`]) instead of inspecting heterogeneous error types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Status code assigned to network-level failures (request sent, no
/// response received).
pub const STATUS_NETWORK: i32 = 0;

/// Status code assigned to failures with no recognizable shape.
pub const STATUS_UNKNOWN: i32 = -1;

/// Fallback message when a failure carries no message of its own.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// Statuses that are never retried: the request itself is wrong, so
/// re-sending it cannot succeed.
pub const NO_RETRY_STATUSES: &[i32] = &[400, 401, 403, 404, 422];

/// Error class, derived from the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Status 0: the request never got a response.
    Network,
    /// 4xx: caller error, not retryable.
    Client,
    /// 5xx: upstream error, retryable.
    Server,
    /// Status -1 or anything outside the known ranges. Not in the no-retry
    /// set, so the retry loop still re-attempts these.
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Client => write!(f, "client"),
            ErrorKind::Server => write!(f, "server"),
            ErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// The normalized failure shape.
///
/// Constructed once at the point a failure is caught, never mutated after.
/// Serializes to the `{message, status, details, timestamp}` JSON shape used
/// across logging and reporting surfaces.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[error("{message} (status {status})")]
pub struct ClassifiedError {
    /// Human-readable message taken from the failure itself.
    pub message: String,

    /// HTTP-style status code; [`STATUS_NETWORK`] for no-response failures,
    /// [`STATUS_UNKNOWN`] for everything unrecognizable.
    pub status: i32,

    /// Structured details: the response body for HTTP failures, or a
    /// `{"type": ...}` tag for network/unknown failures.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,

    /// When the failure was classified.
    pub timestamp: DateTime<Utc>,
}

impl ClassifiedError {
    /// Create a classified error stamped with the current time.
    pub fn new(message: impl Into<String>, status: i32, details: Map<String, Value>) -> Self {
        Self {
            message: message.into(),
            status,
            details,
            timestamp: Utc::now(),
        }
    }

    /// The error class this status falls into.
    pub fn kind(&self) -> ErrorKind {
        match self.status {
            STATUS_NETWORK => ErrorKind::Network,
            400..=499 => ErrorKind::Client,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }

    /// User-facing message for this error. Table-driven by status; falls
    /// back to the error's own message, then to [`GENERIC_MESSAGE`].
    pub fn user_message(&self) -> String {
        if let Some(msg) = status_message(self.status) {
            return msg.to_string();
        }
        if !self.message.is_empty() {
            return self.message.clone();
        }
        GENERIC_MESSAGE.to_string()
    }

    /// Whether this exact status is carried.
    pub fn has_status(&self, status: i32) -> bool {
        self.status == status
    }

    /// Status 0: the request never reached a server.
    pub fn is_network_error(&self) -> bool {
        self.has_status(STATUS_NETWORK)
    }

    /// 401 or 403.
    pub fn is_auth_error(&self) -> bool {
        self.has_status(401) || self.has_status(403)
    }

    /// 400 or 422.
    pub fn is_validation_error(&self) -> bool {
        self.has_status(400) || self.has_status(422)
    }

    /// Any 5xx status.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Whether a retry loop should re-attempt after this error. Caller
    /// errors ([`NO_RETRY_STATUSES`]) fail immediately; everything else,
    /// including network and unknown failures, is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !NO_RETRY_STATUSES.contains(&self.status)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"status":{},"error":"serialization_failed"}}"#, self.status)
        })
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Fixed status-to-message table for user-facing surfaces.
pub fn status_message(status: i32) -> Option<&'static str> {
    match status {
        0 => Some("Unable to connect. Please check your internet connection."),
        400 => Some("Invalid request. Please check your input and try again."),
        401 => Some("Please log in to continue."),
        403 => Some("You don't have permission to perform this action."),
        404 => Some("The requested resource was not found."),
        409 => Some("This action conflicts with existing data."),
        422 => Some("The data provided is invalid. Please check and try again."),
        429 => Some("Too many requests. Please wait a moment and try again."),
        500 => Some("Server error. Our team has been notified."),
        502 => Some("Service temporarily unavailable. Please try again shortly."),
        503 => Some("Service under maintenance. Please try again later."),
        504 => Some("Request timed out. Please try again."),
        _ => None,
    }
}

/// A caught failure before classification.
///
/// This is the tagged input shape for [`classify`]: call sites wrap whatever
/// they caught in the matching variant instead of relying on structural
/// inspection. `Classified` makes re-classification a no-op.
#[derive(Error, Debug)]
pub enum Failure {
    /// Already classified; passes through unchanged.
    #[error(transparent)]
    Classified(ClassifiedError),

    /// An HTTP response arrived with an error status.
    #[error("http {status} {status_text}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// HTTP status text, e.g. "Not Found". May be empty.
        status_text: String,
        /// Parsed response body, if any.
        body: Option<Value>,
    },

    /// The request was sent but no response came back.
    #[error("network error")]
    Network,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl From<ClassifiedError> for Failure {
    fn from(err: ClassifiedError) -> Self {
        Failure::Classified(err)
    }
}

impl From<std::io::Error> for Failure {
    fn from(_err: std::io::Error) -> Self {
        Failure::Network
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::Other(err.to_string())
    }
}

/// Normalize a caught failure into a [`ClassifiedError`].
///
/// - Already-classified errors pass through unchanged.
/// - HTTP responses keep their status; the message prefers the body's
///   `message` field, then the status text, then "Server error". The body
///   becomes the details.
/// - Network failures get status 0 and a `network_error` tag.
/// - Everything else gets status -1, an `unknown_error` tag, and the
///   failure's own message if it has one.
///
/// Never fails.
pub fn classify(failure: Failure) -> ClassifiedError {
    match failure {
        Failure::Classified(err) => err,

        Failure::Response {
            status,
            status_text,
            body,
        } => {
            let message = body
                .as_ref()
                .and_then(|b| b.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    if status_text.is_empty() {
                        "Server error".to_string()
                    } else {
                        status_text
                    }
                });

            let details = match body {
                Some(Value::Object(map)) => map,
                Some(other) => {
                    let mut map = Map::new();
                    map.insert("body".to_string(), other);
                    map
                }
                None => Map::new(),
            };

            ClassifiedError::new(message, i32::from(status), details)
        }

        Failure::Network => {
            let mut details = Map::new();
            details.insert("type".to_string(), Value::from("network_error"));
            ClassifiedError::new(
                "Network error - please check your connection",
                STATUS_NETWORK,
                details,
            )
        }

        Failure::Other(message) => {
            let mut details = Map::new();
            details.insert("type".to_string(), Value::from("unknown_error"));
            let message = if message.is_empty() {
                GENERIC_MESSAGE.to_string()
            } else {
                message
            };
            ClassifiedError::new(message, STATUS_UNKNOWN, details)
        }
    }
}
