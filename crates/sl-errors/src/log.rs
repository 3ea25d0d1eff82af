//! Structured error logging.
//!
//! Builds one JSON record per failure and emits it through `tracing` so any
//! installed subscriber (console, file, collector) receives the same shape.
//! Free text headed for the record should already have been scrubbed by the
//! caller; this module does not redact.

use crate::classify::ClassifiedError;
use serde_json::{json, Map, Value};

/// Log a classified error with caller-supplied context and return the
/// structured record that was emitted.
///
/// The record is the error's JSON shape plus a `kind` field and the context
/// map. Returning it lets callers forward the same record to an external
/// monitoring sink without re-serializing.
pub fn log_error(error: &ClassifiedError, context: Map<String, Value>) -> Value {
    let mut record = match serde_json::to_value(error) {
        Ok(Value::Object(map)) => map,
        // ClassifiedError always serializes to an object; keep the status
        // visible if that ever stops being true.
        _ => {
            let mut map = Map::new();
            map.insert("status".to_string(), json!(error.status));
            map.insert("message".to_string(), json!(error.message));
            map
        }
    };

    record.insert("kind".to_string(), json!(error.kind().to_string()));
    if !context.is_empty() {
        record.insert("context".to_string(), Value::Object(context));
    }

    tracing::error!(
        status = error.status,
        kind = %error.kind(),
        message = %error.message,
        "classified error"
    );

    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Failure};
    use serde_json::json;

    #[test]
    fn test_record_carries_error_fields() {
        let err = classify(Failure::Response {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: None,
        });

        let record = log_error(&err, Map::new());
        assert_eq!(record["status"], json!(503));
        assert_eq!(record["message"], json!("Service Unavailable"));
        assert_eq!(record["kind"], json!("server"));
        assert!(record.get("context").is_none());
    }

    #[test]
    fn test_record_merges_context() {
        let err = classify(Failure::Network);

        let mut context = Map::new();
        context.insert("endpoint".to_string(), json!("/api/widgets"));
        context.insert("attempt".to_string(), json!(2));

        let record = log_error(&err, context);
        assert_eq!(record["context"]["endpoint"], json!("/api/widgets"));
        assert_eq!(record["context"]["attempt"], json!(2));
        assert_eq!(record["kind"], json!("network"));
    }
}
