//! Nutrition calculation module
//!
//! Energy estimates for a health profile and their bar chart.

pub mod chart;
pub mod energy;

pub use chart::{render_energy_chart, write_energy_chart, ChartError};
pub use energy::{
    compute_bmr, compute_caloric_deficit, compute_maintenance_calories, EnergyEstimate,
};
