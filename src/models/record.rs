//! Stored record model
//!
//! JSON payloads submitted to the record store, keyed by `user_id`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Independent key spaces of the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    HealthDetails,
    DietaryData,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::HealthDetails, Namespace::DietaryData];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::HealthDetails => "health_details",
            Namespace::DietaryData => "dietary_data",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Namespace::HealthDetails => "Health details",
            Namespace::DietaryData => "Dietary data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown namespace '{0}'")]
pub struct UnknownNamespace(pub String);

impl FromStr for Namespace {
    type Err = UnknownNamespace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "health_details" | "health" => Ok(Namespace::HealthDetails),
            "dietary_data" | "dietary" => Ok(Namespace::DietaryData),
            _ => Err(UnknownNamespace(s.to_string())),
        }
    }
}

/// A payload as held by a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub user_id: String,
    pub payload: Value,
    pub updated_at: String,
}

impl StoredRecord {
    pub fn new(user_id: impl Into<String>, payload: Value) -> Self {
        Self {
            user_id: user_id.into(),
            payload,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Key under which a payload is stored.
///
/// Strings are used verbatim, numbers by their JSON text. Anything else,
/// including an empty string, has no usable key.
pub fn extract_user_id(payload: &Value) -> Option<String> {
    match payload.get("user_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `true` for payloads that count as "no data": null, `{}`, `[]` or `""`
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace_round_trip() {
        for ns in Namespace::ALL {
            assert_eq!(ns.as_str().parse::<Namespace>(), Ok(ns));
        }
        assert_eq!("Dietary".parse::<Namespace>(), Ok(Namespace::DietaryData));
        assert_eq!(
            "vitals".parse::<Namespace>(),
            Err(UnknownNamespace("vitals".to_string()))
        );
    }

    #[test]
    fn test_extract_user_id() {
        assert_eq!(extract_user_id(&json!({"user_id": "u1"})), Some("u1".to_string()));
        assert_eq!(extract_user_id(&json!({"user_id": 42})), Some("42".to_string()));
        assert_eq!(extract_user_id(&json!({"user_id": ""})), None);
        assert_eq!(extract_user_id(&json!({"user_id": null})), None);
        assert_eq!(extract_user_id(&json!({"age": 30})), None);
        assert_eq!(extract_user_id(&json!(["user_id"])), None);
    }

    #[test]
    fn test_is_empty_payload() {
        assert!(is_empty_payload(&Value::Null));
        assert!(is_empty_payload(&json!({})));
        assert!(is_empty_payload(&json!([])));
        assert!(!is_empty_payload(&json!({"user_id": "u1"})));
        assert!(!is_empty_payload(&json!(0)));
    }
}
