//! Data types for the rule table.
//!
//! Defines the endpoint record reported by a webhook rule and the
//! table that maps rule names to their latest record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from rule name to the most recently reported endpoint.
///
/// Ordered by rule name so snapshots and the persisted file are stable.
pub type RuleTable = BTreeMap<String, EndpointRecord>;

/// Port as reported by the webhook caller.
///
/// Stored exactly as received: `"8080"` stays a string, `8080` stays a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Port {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Number(n) => write!(f, "{}", n),
            Port::Text(s) => f.write_str(s),
        }
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Port::Number(port.into())
    }
}

impl From<&str> for Port {
    fn from(port: &str) -> Self {
        Port::Text(port.to_string())
    }
}

/// The network endpoint last reported for a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Reported address as received, not validated.
    pub ip: Value,

    /// Reported port, not validated.
    pub port: Port,

    /// Caller-supplied time marker, kept with its JSON type.
    /// Serialized as `null` when absent.
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl EndpointRecord {
    /// Creates a new record.
    pub fn new(ip: impl Into<Value>, port: impl Into<Port>, timestamp: Option<Value>) -> Self {
        Self {
            ip: ip.into(),
            port: port.into(),
            timestamp,
        }
    }
}
