//! Data models
//!
//! Health profile, food analysis results and stored records.

mod food;
mod profile;
mod record;

pub use food::{DietaryAdvice, FoodAnalysis, FoodDetectionResult, ITEM_DELIMITER};
pub use profile::{HealthProfile, ProfileError};
pub use record::{extract_user_id, is_empty_payload, Namespace, StoredRecord, UnknownNamespace};
