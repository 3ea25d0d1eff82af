//! Failure classification and bounded retry.
//!
//! This crate normalizes heterogeneous failures (HTTP error responses,
//! network failures, unknown exceptions) into one [`ClassifiedError`] shape,
//! maps statuses to user-facing messages, and drives a retry loop that backs
//! off exponentially and never re-sends caller errors.
//!
//! # Data Flow
//!
//! A call site catches a failure, wraps it in the matching [`Failure`]
//! variant, and either classifies it directly or hands the whole operation
//! to [`retry_with_backoff`]:
//!
//! ```
//! use sl_errors::{classify, Failure};
//!
//! let err = classify(Failure::Response {
//!     status: 404,
//!     status_text: "Not Found".to_string(),
//!     body: None,
//! });
//! assert_eq!(err.user_message(), "The requested resource was not found.");
//! assert!(!err.is_retryable());
//! ```
//!
//! Classification is idempotent: a [`ClassifiedError`] fed back through
//! [`classify`] comes out unchanged, so layers can classify defensively at
//! their own boundaries.

pub mod classify;
pub mod log;
pub mod retry;

pub use classify::{
    classify, status_message, ClassifiedError, ErrorKind, Failure, GENERIC_MESSAGE,
    NO_RETRY_STATUSES, STATUS_NETWORK, STATUS_UNKNOWN,
};
pub use log::log_error;
pub use retry::{
    retry_with_backoff, retry_with_backoff_cancellable, RetryPolicy, MAX_JITTER_MS,
};
