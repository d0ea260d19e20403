//! Mutation outcome descriptor

use serde::Serialize;
use serde_json::{Map, Value};

/// Result of a mutation handler: `{ ok, operation, applied, error? }`
///
/// `applied` is false when the request was accepted but changed nothing
/// (empty todo text, unknown id). Operation-specific fields are flattened in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub ok: bool,
    pub operation: &'static str,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Outcome {
    pub fn applied(operation: &'static str) -> Self {
        Self {
            ok: true,
            operation,
            applied: true,
            error: None,
            fields: Map::new(),
        }
    }

    /// Accepted, but nothing changed
    pub fn unchanged(operation: &'static str) -> Self {
        Self {
            applied: false,
            ..Self::applied(operation)
        }
    }

    /// Report a failure without raising it
    pub fn rejected(operation: &'static str, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            operation,
            applied: false,
            error: Some(error.into()),
            fields: Map::new(),
        }
    }

    /// Attach an operation-specific field
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.fields.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Outcome::applied("increment").with("value", 3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "ok": true, "operation": "increment", "applied": true, "value": 3 })
        );
    }

    #[test]
    fn test_rejected_carries_error() {
        let json =
            serde_json::to_value(Outcome::rejected("add-message", "Message is required")).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["applied"], false);
        assert_eq!(json["error"], "Message is required");
    }

    #[test]
    fn test_unchanged() {
        let outcome = Outcome::unchanged("add");
        assert!(outcome.ok);
        assert!(!outcome.applied);
        assert!(outcome.error.is_none());
    }
}
