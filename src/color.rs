use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// The first hue is a blue so a two-valued column reads blue / red-ish.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 220.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Blue → white → red ("coolwarm") colour for a value in `[-1, 1]`.
/// NaN maps to a neutral gray.
pub fn diverging_color(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::from_gray(90);
    }
    let t = value.clamp(-1.0, 1.0) as f32;
    let cool: LinSrgb = Srgb::new(0.23, 0.30, 0.75).into_linear();
    let warm: LinSrgb = Srgb::new(0.71, 0.02, 0.15).into_linear();
    let mid: LinSrgb = Srgb::new(0.87, 0.87, 0.87).into_linear();
    let mixed = if t < 0.0 { mid.mix(cool, -t) } else { mid.mix(warm, t) };
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique labels.
    pub fn new(column: &str, labels: &BTreeSet<String>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().cloned().zip(palette).collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(self.default_color)
    }

    /// Return the legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping.iter().map(|(v, c)| (v.clone(), *c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_color_map_lookup() {
        let labels: BTreeSet<String> = ["No", "Yes"].iter().map(|s| s.to_string()).collect();
        let cm = ColorMap::new("Attrition", &labels);
        assert_ne!(cm.color_for("No"), cm.color_for("Yes"));
        assert_eq!(cm.color_for("Maybe"), Color32::GRAY);
        assert_eq!(cm.legend_entries().len(), 2);
    }

    #[test]
    fn test_diverging_endpoints() {
        let neg = diverging_color(-1.0);
        let pos = diverging_color(1.0);
        assert!(neg.b() > neg.r(), "negative end is blue");
        assert!(pos.r() > pos.b(), "positive end is red");
        assert_eq!(diverging_color(f64::NAN), Color32::from_gray(90));
        assert_eq!(diverging_color(5.0), pos);
    }
}
