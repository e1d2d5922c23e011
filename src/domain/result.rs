//! Usage: Uniform result envelope returned by every control command.

use serde::Serialize;

/// The one shape every façade operation resolves to. Failures travel inside the
/// envelope; commands never reject across the UI boundary.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ControlResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ControlResult {
    pub(crate) fn ok(payload: serde_json::Value) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub(crate) fn ok_empty() -> Self {
        Self::ok(serde_json::json!({}))
    }

    pub(crate) fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_envelope_skips_payload() {
        let value = serde_json::to_value(ControlResult::fail("PARSE_ERROR: nope")).expect("json");
        assert_eq!(
            value,
            serde_json::json!({ "success": false, "error": "PARSE_ERROR: nope" })
        );
    }

    #[test]
    fn success_envelope_skips_error() {
        let value = serde_json::to_value(ControlResult::ok_empty()).expect("json");
        assert_eq!(value, serde_json::json!({ "success": true, "payload": {} }));
    }
}
