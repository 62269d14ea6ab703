use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Category;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Group colours: category → Color32
// ---------------------------------------------------------------------------

/// Maps every group of the dataset to a distinct colour.
///
/// Built from the full set of groups, so a group keeps its colour while the
/// selection changes.
#[derive(Debug, Clone, Default)]
pub struct GroupColors {
    mapping: BTreeMap<Category, Color32>,
}

impl GroupColors {
    pub fn new(groups: &BTreeSet<Category>) -> Self {
        let mapping = groups
            .iter()
            .cloned()
            .zip(generate_palette(groups.len()))
            .collect();
        GroupColors { mapping }
    }

    pub fn color_for(&self, group: &Category) -> Color32 {
        self.mapping.get(group).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Blue for negative, red for positive, paler towards zero.
/// Undefined coefficients are grey.
pub fn correlation_color(r: Option<f64>) -> Color32 {
    let Some(r) = r else {
        return Color32::from_gray(90);
    };
    let strength = r.abs().clamp(0.0, 1.0) as f32;
    let hue = if r < 0.0 { 220.0 } else { 0.0 };
    hsl_to_color32(hue, 0.70, 0.92 - 0.50 * strength)
}

/// Black or white text, whichever reads better on a heatmap cell.
pub fn text_color_for(r: Option<f64>) -> Color32 {
    match r {
        Some(v) if v.abs() > 0.6 => Color32::WHITE,
        Some(_) => Color32::BLACK,
        None => Color32::LIGHT_GRAY,
    }
}
