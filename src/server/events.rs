//! Realtime event encoding.
//!
//! Every message pushed to WebSocket clients is a JSON text frame of the
//! form `{"type": ..., "data": ..., "timestamp": ...}`.

use serde::Serialize;

use crate::store::RuleTable;

/// Event carrying the full rule table.
pub const ALL_RULES_UPDATED: &str = "all_rules_updated";

/// Encodes an event envelope for the realtime channel.
pub fn encode_event(event_type: &str, data: &impl Serialize) -> Option<String> {
    let message = serde_json::json!({
        "type": event_type,
        "data": data,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    match serde_json::to_string(&message) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(error = %e, event_type, "Failed to encode realtime event");
            None
        }
    }
}

/// Encodes an `all_rules_updated` event for `table`.
pub fn all_rules_updated(table: &RuleTable) -> Option<String> {
    encode_event(ALL_RULES_UPDATED, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EndpointRecord;

    #[test]
    fn test_all_rules_updated_envelope() {
        let mut table = RuleTable::new();
        table.insert(
            "web".to_string(),
            EndpointRecord::new("1.2.3.4", "8080", Some("t1".into())),
        );

        let json = all_rules_updated(&table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "all_rules_updated");
        assert_eq!(
            value["data"],
            serde_json::json!({"web": {"ip": "1.2.3.4", "port": "8080", "timestamp": "t1"}})
        );
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_empty_table_is_an_empty_object() {
        let json = all_rules_updated(&RuleTable::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["data"], serde_json::json!({}));
    }
}
