//! Energy MCP Tools
//!
//! Energy estimate and bar chart for a health profile.

use std::path::Path;

use serde::Serialize;

use crate::models::HealthProfile;
use crate::nutrition::{write_energy_chart, EnergyEstimate};

/// Response for estimate_energy
#[derive(Debug, Serialize)]
pub struct EstimateEnergyResponse {
    pub profile: HealthProfile,
    pub bmr: f64,
    pub maintenance_calories: f64,
    pub caloric_deficit_per_day: f64,
    /// maintenance - deficit
    pub target_daily_intake: f64,
    /// `true` when the target weight is above the current weight
    pub is_surplus: bool,
    pub note: &'static str,
}

/// Response for generate_energy_chart
#[derive(Debug, Serialize)]
pub struct GenerateChartResponse {
    pub success: bool,
    pub file_path: String,
    pub bytes_written: usize,
    pub estimate: EnergyEstimate,
}

const ESTIMATE_NOTE: &str =
    "Harris-Benedict BMR for a single sex profile with a sedentary (1.2) activity multiplier.";

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Compute the energy estimate for a profile
pub fn estimate_energy(profile: &HealthProfile) -> Result<EstimateEnergyResponse, String> {
    let estimate = EnergyEstimate::from_profile(profile).map_err(|e| e.to_string())?;

    Ok(EstimateEnergyResponse {
        profile: *profile,
        bmr: round1(estimate.bmr),
        maintenance_calories: round1(estimate.maintenance_calories),
        caloric_deficit_per_day: round1(estimate.caloric_deficit_per_day),
        target_daily_intake: round1(estimate.target_intake()),
        is_surplus: estimate.caloric_deficit_per_day < 0.0,
        note: ESTIMATE_NOTE,
    })
}

/// Render the energy chart for a profile to `output_path`
pub fn generate_energy_chart(
    profile: &HealthProfile,
    output_path: &Path,
) -> Result<GenerateChartResponse, String> {
    let estimate = EnergyEstimate::from_profile(profile).map_err(|e| e.to_string())?;
    let bytes_written = write_energy_chart(&estimate, output_path)
        .map_err(|e| format!("Failed to generate chart: {}", e))?;

    Ok(GenerateChartResponse {
        success: true,
        file_path: output_path.display().to_string(),
        bytes_written,
        estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_energy_rounds_for_display() {
        let response = estimate_energy(&HealthProfile::new(30, 170.0, 80.0, 70.0, 2.0)).unwrap();
        assert_eq!(response.caloric_deficit_per_day, 1283.3);
        assert!(!response.is_surplus);
        let unrounded = response.maintenance_calories - response.caloric_deficit_per_day;
        assert!((response.target_daily_intake - unrounded).abs() <= 0.11);
    }

    #[test]
    fn test_estimate_energy_flags_surplus() {
        let response = estimate_energy(&HealthProfile::new(25, 180.0, 60.0, 66.0, 6.0)).unwrap();
        assert!(response.is_surplus);
        assert!(response.caloric_deficit_per_day < 0.0);
    }

    #[test]
    fn test_incomplete_profile_message() {
        let err = estimate_energy(&HealthProfile::new(0, 170.0, 80.0, 70.0, 2.0)).unwrap_err();
        assert!(err.starts_with("Please fill in all your health details"));
    }

    #[test]
    fn test_chart_rejects_incomplete_profile_before_rendering() {
        let dir = std::env::temp_dir().join("eatwise-chart-never-written.png");
        let err = generate_energy_chart(&HealthProfile::new(30, 0.0, 80.0, 70.0, 2.0), &dir).unwrap_err();
        assert!(err.contains("height_cm"));
        assert!(!dir.exists());
    }

    #[test]
    fn test_generate_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.png");
        // target above current weight: negative deficit bar
        let profile = HealthProfile::new(25, 180.0, 60.0, 66.0, 6.0);

        let response = generate_energy_chart(&profile, &path).unwrap();
        assert!(response.success);
        assert!(response.estimate.caloric_deficit_per_day < 0.0);
        assert_eq!(response.file_path, path.display().to_string());

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), response.bytes_written);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 500));
    }
}
