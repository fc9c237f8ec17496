//! Energy bar chart
//!
//! Draws BMR, maintenance calories and the daily deficit as three bars and
//! encodes the result as PNG.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use thiserror::Error;

use super::energy::EnergyEstimate;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 500;

const MIN_SIDE: u32 = 100;
const MAX_SIDE: u32 = 10_000;

const COLOR_BMR: (u8, u8, u8) = (0, 112, 192);
const COLOR_MAINTENANCE: (u8, u8, u8) = (0, 191, 99);
const COLOR_DEFICIT: (u8, u8, u8) = (255, 165, 0);

/// Chart errors
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Invalid chart size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Chart drawing error: {0}")]
    Render(String),

    #[error("PNG encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

/// One bar of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: f64,
    pub color: (u8, u8, u8),
}

/// Bars in display order
pub fn energy_bars(estimate: &EnergyEstimate) -> Vec<Bar> {
    vec![
        Bar { label: "BMR", value: estimate.bmr, color: COLOR_BMR },
        Bar {
            label: "Maintenance",
            value: estimate.maintenance_calories,
            color: COLOR_MAINTENANCE,
        },
        Bar {
            label: "Daily deficit",
            value: estimate.caloric_deficit_per_day,
            color: COLOR_DEFICIT,
        },
    ]
}

/// Y axis range that always includes zero, padded by 10%
pub fn value_range(bars: &[Bar]) -> (f64, f64) {
    let min = bars.iter().map(|b| b.value).fold(0.0_f64, f64::min);
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let pad = ((max - min) * 0.1).max(1.0);
    let low = if min < 0.0 { min - pad } else { 0.0 };
    (low, max + pad)
}

/// Render the chart as PNG bytes
pub fn render_energy_chart(
    estimate: &EnergyEstimate,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ChartError> {
    use plotters::prelude::*;

    let valid = MIN_SIDE..=MAX_SIDE;
    if !valid.contains(&width) || !valid.contains(&height) {
        return Err(ChartError::InvalidSize { width, height });
    }

    let bars = energy_bars(estimate);
    let (y_min, y_max) = value_range(&bars);
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| ChartError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Daily energy (kcal)", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(bars.len() as f64 - 0.5), y_min..y_max)
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len())
            .x_label_formatter(&|x| {
                let idx = x.round();
                if (idx - x).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < bars.len() {
                    bars[idx as usize].label.to_string()
                } else {
                    String::new()
                }
            })
            .y_desc("kcal/day")
            .draw()
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let x = i as f64;
                let (r, g, b) = bar.color;
                Rectangle::new([(x - 0.3, 0.0), (x + 0.3, bar.value)], RGBColor(r, g, b).filled())
            }))
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(-0.5, 0.0), (bars.len() as f64 - 0.5, 0.0)],
                BLACK.stroke_width(1),
            )))
            .map_err(|e| ChartError::Render(e.to_string()))?;

        root.present().map_err(|e| ChartError::Render(e.to_string()))?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Render("Failed to create image from buffer".to_string()))?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)?;

    Ok(png_bytes)
}

/// Render the chart and write it to `path`
pub fn write_energy_chart<P: AsRef<Path>>(
    estimate: &EnergyEstimate,
    path: P,
) -> Result<usize, ChartError> {
    let png = render_energy_chart(estimate, DEFAULT_WIDTH, DEFAULT_HEIGHT)?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path.as_ref(), &png)?;
    tracing::debug!(path = %path.as_ref().display(), bytes = png.len(), "energy chart written");
    Ok(png.len())
}
