//! Health profile model
//!
//! The five values collected by the health form. Everything downstream
//! (energy estimate, food analysis) requires a complete profile.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Profile validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Please fill in all your health details (missing: {})", fields.join(", "))]
    InputIncomplete { fields: Vec<&'static str> },
}

/// Health details entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Age in whole years
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub target_weight_kg: f64,
    /// Months to reach the target weight
    pub time_plan_months: f64,
}

impl HealthProfile {
    pub fn new(
        age: u32,
        height_cm: f64,
        weight_kg: f64,
        target_weight_kg: f64,
        time_plan_months: f64,
    ) -> Self {
        Self {
            age,
            height_cm,
            weight_kg,
            target_weight_kg,
            time_plan_months,
        }
    }

    /// Names of fields that are zero, negative or not finite
    pub fn incomplete_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.age == 0 {
            fields.push("age");
        }
        for (name, value) in [
            ("height_cm", self.height_cm),
            ("weight_kg", self.weight_kg),
            ("target_weight_kg", self.target_weight_kg),
            ("time_plan_months", self.time_plan_months),
        ] {
            if !(value.is_finite() && value > 0.0) {
                fields.push(name);
            }
        }
        fields
    }

    /// Check that every field is strictly positive
    pub fn validate(&self) -> Result<(), ProfileError> {
        let fields = self.incomplete_fields();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ProfileError::InputIncomplete { fields })
        }
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HealthProfile {
        HealthProfile::new(30, 170.0, 80.0, 70.0, 2.0)
    }

    #[test]
    fn test_complete_profile_validates() {
        assert!(sample().validate().is_ok());
        assert!(sample().is_complete());
    }

    #[test]
    fn test_zero_fields_are_reported() {
        let profile = HealthProfile {
            age: 0,
            time_plan_months: 0.0,
            ..sample()
        };
        assert_eq!(
            profile.validate(),
            Err(ProfileError::InputIncomplete {
                fields: vec!["age", "time_plan_months"]
            })
        );
    }

    #[test]
    fn test_negative_and_nan_are_incomplete() {
        let profile = HealthProfile {
            height_cm: -1.0,
            weight_kg: f64::NAN,
            ..sample()
        };
        assert_eq!(profile.incomplete_fields(), vec!["height_cm", "weight_kg"]);
    }

    #[test]
    fn test_error_message_lists_fields() {
        let err = HealthProfile { target_weight_kg: 0.0, ..sample() }
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please fill in all your health details (missing: target_weight_kg)"
        );
    }
}
