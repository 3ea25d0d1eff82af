//! Text redaction for logs and telemetry.
//!
//! This crate provides the scrubbing step that sits between application code
//! and any shared sink: log files, telemetry pipelines, error reporters, and
//! user-visible surfaces. Free text goes through [`redact`] before it is
//! persisted or displayed, and through [`condense_text`] when a sink bounds
//! line length.
//!
//! # Key Properties
//!
//! - **Total**: no input causes a failure; malformed or empty input is
//!   returned unchanged.
//! - **Idempotent**: redacting already-redacted text is a no-op, so double
//!   scrubbing at layer boundaries is harmless.
//! - **Specific before generic**: email, JWT, and known key-prefix patterns
//!   are replaced before the generic long-token pass so each secret gets its
//!   own placeholder.
//!
//! # Example
//!
//! ```
//! use sl_redact::{condense_text, redact};
//!
//! let safe = redact("Contact me at test.user@example.com for details");
//! assert!(safe.contains("[REDACTED_EMAIL]"));
//!
//! assert_eq!(condense_text("  hello   world  ", 5), "he...");
//! ```

pub mod condense;
pub mod pattern;
pub mod scrub;

pub use condense::condense_text;
pub use pattern::{SecretKind, LONG_TOKEN_REDACT_LEN};
pub use scrub::{find_secrets, redact, Detection, CANARY_SECRETS};
