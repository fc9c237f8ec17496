//! EatWise Status Tool
//!
//! Runtime status of the service and usage instructions for AI assistants.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::models::Namespace;
use crate::store::RecordStore;

/// Usage instructions for AI assistants
pub const ADVICE_INSTRUCTIONS: &str = r#"
# EatWise Instructions

EatWise answers one question: "Should I eat this?" It needs the user's health
details and a photo of the planned meal.

## 1. Collect the health details

All five values are required and must be greater than zero:

| Field | Unit |
|-------|------|
| age | years |
| height_cm | centimeters |
| weight_kg | kilograms |
| target_weight_kg | kilograms |
| time_plan_months | months to reach the target |

If any value is missing, ask for it. Do not guess.

## 2. Energy estimate (`estimate_energy`)

Returns:
- **bmr**: basal metabolic rate (Harris-Benedict, single profile)
- **maintenance_calories**: bmr × 1.2 (sedentary)
- **caloric_deficit_per_day**: (weight − target) × 7700 / (months × 30)

A negative deficit means the user wants to gain weight.
`generate_energy_chart` writes the same three numbers as a PNG bar chart.

## 3. Food analysis (`analyze_food_image`)

Pass the image as `image_path` (JPEG or PNG on disk) or `image_base64`.
The tool first lists the food items it sees, then asks for calories,
glycemic index and whether the meal fits the goal. Present the detected
items, then the advice text as returned.

If detection fails, nothing else is attempted. Report the error and let the
user retry; there are no automatic retries.

## 4. Records (optional)

- `save_health_details` / `get_health_details`
- `receive_dietary_data` / `get_dietary_data`

Payloads are JSON objects with a `user_id`. Saving again replaces the record.
"#;

/// Status information
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub store_backend: &'static str,
    pub health_details_records: Option<usize>,
    pub dietary_data_records: Option<usize>,
    pub model_configured: bool,
    pub model: Option<String>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service uptime
pub struct StatusTracker {
    start_time: Instant,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Get the current status
    pub fn get_status(&self, store: &RecordStore, model: Option<&str>) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            store_backend: store.backend_kind(),
            health_details_records: store.count(Namespace::HealthDetails).ok(),
            dietary_data_records: store.count(Namespace::DietaryData).ok(),
            model_configured: model.is_some(),
            model: model.map(String::from),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_counts_records() {
        let store = RecordStore::in_memory();
        store.put(Namespace::HealthDetails, Some(json!({"user_id": "a"}))).unwrap();
        store.put(Namespace::HealthDetails, Some(json!({"user_id": "b"}))).unwrap();

        let status = StatusTracker::new().get_status(&store, Some("gpt-4o"));
        assert_eq!(status.store_backend, "memory");
        assert_eq!(status.health_details_records, Some(2));
        assert_eq!(status.dietary_data_records, Some(0));
        assert!(status.model_configured);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_status_without_model() {
        let status = StatusTracker::new().get_status(&RecordStore::in_memory(), None);
        assert!(!status.model_configured);
        assert_eq!(status.model, None);
    }
}
