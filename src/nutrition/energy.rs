//! Daily energy estimates
//!
//! Basal metabolic rate, maintenance calories and the daily caloric deficit
//! needed to reach a target weight. The functions are pure and do no input
//! checking; use [`EnergyEstimate::from_profile`] for guarded computation.

use serde::Serialize;

use crate::models::{HealthProfile, ProfileError};

/// Harris-Benedict intercept and coefficients. Only one sex profile is modeled;
/// the form never asks for sex.
pub const BMR_INTERCEPT: f64 = 88.362;
pub const BMR_WEIGHT_COEFF: f64 = 13.397;
pub const BMR_HEIGHT_COEFF: f64 = 4.799;
pub const BMR_AGE_COEFF: f64 = 5.677;

/// Sedentary activity multiplier
pub const SEDENTARY_MULTIPLIER: f64 = 1.2;

/// Energy content of one kilogram of body fat
pub const KCAL_PER_KG: f64 = 7700.0;

/// Months are counted as 30 days
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Basal metabolic rate in kcal/day
pub fn compute_bmr(age: u32, weight_kg: f64, height_cm: f64) -> f64 {
    BMR_INTERCEPT + BMR_WEIGHT_COEFF * weight_kg + BMR_HEIGHT_COEFF * height_cm
        - BMR_AGE_COEFF * f64::from(age)
}

/// Calories to hold current weight at a sedentary activity level
pub fn compute_maintenance_calories(bmr: f64) -> f64 {
    bmr * SEDENTARY_MULTIPLIER
}

/// Daily deficit in kcal to go from `weight_kg` to `target_weight_kg` in `months`.
///
/// Negative when the target is above the current weight (a surplus).
/// `months` must be positive; that is the caller's guard.
pub fn compute_caloric_deficit(weight_kg: f64, target_weight_kg: f64, months: f64) -> f64 {
    let total_calories_to_lose = (weight_kg - target_weight_kg) * KCAL_PER_KG;
    total_calories_to_lose / (months * DAYS_PER_MONTH)
}

/// Snapshot of the three figures for one profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub bmr: f64,
    pub maintenance_calories: f64,
    pub caloric_deficit_per_day: f64,
}

impl EnergyEstimate {
    /// Validate the profile, then compute every figure
    pub fn from_profile(profile: &HealthProfile) -> Result<Self, ProfileError> {
        profile.validate()?;

        let bmr = compute_bmr(profile.age, profile.weight_kg, profile.height_cm);
        Ok(Self {
            bmr,
            maintenance_calories: compute_maintenance_calories(bmr),
            caloric_deficit_per_day: compute_caloric_deficit(
                profile.weight_kg,
                profile.target_weight_kg,
                profile.time_plan_months,
            ),
        })
    }

    /// Daily intake that meets the deficit, `maintenance - deficit`
    pub fn target_intake(&self) -> f64 {
        self.maintenance_calories - self.caloric_deficit_per_day
    }
}
