//! Webhook update and rule table read endpoints.

use axum::{body::Bytes, extract::State, Json};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::server::error::{ApiError, StatusBody};
use crate::server::state::AppState;
use crate::store::{EndpointRecord, Port, RuleTable};

/// A validated webhook notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuckyUpdate {
    pub rule_name: String,
    pub record: EndpointRecord,
}

impl LuckyUpdate {
    /// Parses and validates a raw request body.
    ///
    /// The body must be a non-empty JSON object, and `ip`, `port` and
    /// `rule_name` must each be a non-empty string or a non-zero number.
    /// Anything else (absent, `null`, `""`, `0`, booleans, containers)
    /// counts as missing. `ip`, `port` and `timestamp` are kept with the
    /// JSON type they arrived in; `timestamp` is optional.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let object = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(object)) if !object.is_empty() => object,
            _ => return Err(ApiError::InvalidJson),
        };
        Self::from_object(&object)
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ApiError> {
        let field = |name: &str| object.get(name).filter(|v| is_present(v));

        let (Some(ip), Some(port), Some(rule_name)) =
            (field("ip"), field("port"), field("rule_name"))
        else {
            return Err(ApiError::MissingFields);
        };

        let port = match port {
            Value::Number(n) => Port::Number(n.clone()),
            other => Port::Text(other.as_str().unwrap_or_default().to_string()),
        };
        let rule_name = match rule_name {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let timestamp = object.get("timestamp").filter(|v| !v.is_null()).cloned();

        Ok(Self {
            rule_name,
            record: EndpointRecord {
                ip: ip.clone(),
                port,
                timestamp,
            },
        })
    }
}

/// A required field counts as present if it is a non-empty string or a
/// non-zero number.
fn is_present(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => false,
    }
}

/// POST /update_lucky_ip - Record the endpoint reported by a webhook rule.
///
/// Body: `{"ip": ..., "port": ..., "rule_name": ..., "timestamp": ...}`
pub async fn update_lucky_ip(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<StatusBody>, ApiError> {
    let update = LuckyUpdate::from_body(&body).map_err(|e| {
        tracing::warn!(
            body = %String::from_utf8_lossy(&body),
            "Rejected webhook: {}",
            e
        );
        e
    })?;

    tracing::info!(
        body = %String::from_utf8_lossy(&body),
        "Received raw webhook data"
    );

    let LuckyUpdate { rule_name, record } = update;
    let log_record = record.clone();

    // Broadcast while the store lock is held so clients see snapshots in commit order
    state
        .store
        .upsert_with(&rule_name, record, |table| state.broadcast_rules(table))?;

    tracing::info!(
        rule = %rule_name,
        ip = %log_record.ip,
        port = %log_record.port,
        timestamp = ?log_record.timestamp,
        "Rule endpoint updated"
    );

    Ok(Json(StatusBody::success("IP and port updated")))
}

/// GET /get_lucky_ip - Current rule table.
pub async fn get_lucky_ip(State(state): State<Arc<AppState>>) -> Result<Json<RuleTable>, ApiError> {
    Ok(Json(state.store.snapshot()?))
}
