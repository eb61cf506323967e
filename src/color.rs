use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::Temperature;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: temperature → RGBColor
// ---------------------------------------------------------------------------

/// Maps each temperature to a distinct colour, shared by the combined binary
/// diagram and the ternary diagram so the curves cross-reference.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Temperature, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    /// Build a colour map for the given temperatures; hues are assigned in
    /// iteration order.
    pub fn new(temperatures: impl Iterator<Item = Temperature>) -> Self {
        let temperatures: Vec<Temperature> = temperatures.collect();
        let palette = generate_palette(temperatures.len());
        let mapping: BTreeMap<Temperature, RGBColor> =
            temperatures.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a temperature.
    pub fn color_for(&self, temperature: Temperature) -> RGBColor {
        self.mapping
            .get(&temperature)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_entries() {
        assert!(generate_palette(0).is_empty());

        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn color_lookup_is_stable_per_temperature() {
        let temps = [Temperature(25.0), Temperature(50.0), Temperature(75.0)];
        let map = ColorMap::new(temps.iter().copied());

        let c1 = map.color_for(Temperature(50.0));
        let c2 = map.color_for(Temperature(50.0));
        assert_eq!(c1, c2);
        assert_ne!(map.color_for(Temperature(25.0)), map.color_for(Temperature(75.0)));
    }

    #[test]
    fn unknown_temperature_falls_back_to_default() {
        let map = ColorMap::new([Temperature(25.0)].into_iter());
        assert_eq!(map.color_for(Temperature(99.0)), RGBColor(128, 128, 128));
    }
}
