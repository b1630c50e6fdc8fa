//! Validation of incoming host batches
//!
//! Works on raw JSON so each failure can name the offending field instead
//! of surfacing a generic deserialization message. Only the envelope is
//! checked: bot records are stored and echoed back as the launcher sent them.

use serde_json::{Map, Value};

use crate::error::{PanelError, PanelResult};

/// One bot record, kept verbatim
pub type BotRecord = Map<String, Value>;

/// A batch whose envelope passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBatch {
    pub host_id: String,
    pub bots: Vec<BotRecord>,
}

pub fn validate_batch(payload: &Value) -> PanelResult<StatusBatch> {
    let object = payload
        .as_object()
        .ok_or_else(|| PanelError::validation("payload must be a JSON object"))?;

    let host_id = match object.get("hostId") {
        Some(Value::String(host_id)) if !host_id.trim().is_empty() => host_id.clone(),
        Some(Value::String(_)) => return Err(PanelError::validation("hostId must not be empty")),
        Some(_) => return Err(PanelError::validation("hostId must be a string")),
        None => return Err(PanelError::validation("hostId is required")),
    };

    let bots = match object.get("bots") {
        Some(Value::Array(bots)) => bots,
        Some(_) => return Err(PanelError::validation("bots must be an array")),
        None => return Err(PanelError::validation("bots is required")),
    };

    let bots = bots
        .iter()
        .enumerate()
        .map(|(index, bot)| match bot {
            Value::Object(record) => Ok(record.clone()),
            _ => Err(PanelError::validation(format!("bots[{index}] must be an object"))),
        })
        .collect::<PanelResult<Vec<_>>>()?;

    Ok(StatusBatch { host_id, bots })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(err: PanelError) -> String {
        match err {
            PanelError::Validation { details } => details,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_batch() {
        let batch = validate_batch(&json!({
            "hostId": "host-a",
            "bots": [
                { "name": "echo", "status": "running", "pid": 7, "cpu": 0.5, "memory": 100, "uptime": 3 },
                { "name": "relay", "username": "relay_bot", "status": "error", "pid": null }
            ]
        }))
        .unwrap();

        assert_eq!(batch.host_id, "host-a");
        assert_eq!(batch.bots.len(), 2);
        assert_eq!(batch.bots[1]["status"], "error");
        assert_eq!(batch.bots[1]["username"], "relay_bot");
    }

    #[test]
    fn test_record_fields_are_not_interpreted() {
        let batch = validate_batch(&json!({
            "hostId": "h1",
            "bots": [{ "name": "a", "status": "online", "cpu": "1.25", "restarts": 3 }]
        }))
        .unwrap();

        let record = Value::Object(batch.bots[0].clone());
        assert_eq!(record, json!({ "name": "a", "status": "online", "cpu": "1.25", "restarts": 3 }));
    }

    #[test]
    fn test_empty_bots_is_valid() {
        let batch = validate_batch(&json!({ "hostId": "host-a", "bots": [] })).unwrap();
        assert!(batch.bots.is_empty());
    }

    #[test]
    fn test_missing_or_empty_host_id() {
        assert!(details(validate_batch(&json!({ "bots": [] })).unwrap_err()).contains("hostId"));
        assert!(details(validate_batch(&json!({ "hostId": "", "bots": [] })).unwrap_err()).contains("hostId"));
        assert!(details(validate_batch(&json!({ "hostId": 5, "bots": [] })).unwrap_err()).contains("hostId"));
    }

    #[test]
    fn test_bots_must_be_array() {
        assert!(details(validate_batch(&json!({ "hostId": "h" })).unwrap_err()).contains("bots"));
        assert!(details(validate_batch(&json!({ "hostId": "h", "bots": {} })).unwrap_err()).contains("array"));
    }

    #[test]
    fn test_non_object_record_names_index() {
        let err = validate_batch(&json!({
            "hostId": "h",
            "bots": [{ "name": "ok" }, "bad"]
        }))
        .unwrap_err();

        assert!(details(err).starts_with("bots[1]"));
    }

    #[test]
    fn test_non_object_payload() {
        assert!(validate_batch(&json!([1, 2])).is_err());
    }
}
