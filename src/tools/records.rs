//! Record MCP Tools
//!
//! Save and fetch health details and dietary data.

use serde::Serialize;
use serde_json::Value;

use crate::models::Namespace;
use crate::store::RecordStore;

/// Response for save/receive tools
#[derive(Debug, Serialize)]
pub struct SaveRecordResponse {
    pub success: bool,
    pub user_id: String,
    pub message: &'static str,
}

/// Response for get tools
#[derive(Debug, Serialize)]
pub struct GetRecordResponse {
    pub user_id: String,
    pub updated_at: String,
    pub record: Value,
}

fn saved_message(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::HealthDetails => "Health details saved successfully",
        Namespace::DietaryData => "Dietary data received successfully",
    }
}

/// Save a payload in `namespace`
pub fn save_record(
    store: &RecordStore,
    namespace: Namespace,
    payload: Option<Value>,
) -> Result<SaveRecordResponse, String> {
    let user_id = store.put(namespace, payload).map_err(|e| e.to_string())?;
    Ok(SaveRecordResponse {
        success: true,
        user_id,
        message: saved_message(namespace),
    })
}

/// Fetch the payload stored under `user_id`, `None` when absent
pub fn get_record(
    store: &RecordStore,
    namespace: Namespace,
    user_id: &str,
) -> Result<Option<GetRecordResponse>, String> {
    match store.get(namespace, user_id) {
        Ok(record) => Ok(Some(GetRecordResponse {
            user_id: record.user_id,
            updated_at: record.updated_at,
            record: record.payload,
        })),
        Err(crate::store::StoreError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}
