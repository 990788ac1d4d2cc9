//! Color space conversion utilities
//!
//! Provides the single shared sRGB to CIELAB conversion used for both query
//! colors and reference entries, plus the CIE76 color difference:
//! - sRGB gamma decoding to linear RGB
//! - linear RGB to CIEXYZ under the D65 illuminant (2 degree observer)
//! - CIEXYZ to CIELAB
//!
//! Algorithm tag: `algo-srgb-to-cielab-d65`

use palette::{white_point::D65, FromColor, Lab, Srgb};

use crate::constants::D65_WHITE_POINT_XYZ;
use crate::LabColor;

/// Color converter pinned to the D65 illuminant
///
/// Pure and deterministic: identical RGB input yields identical Lab output
/// across calls. Queries and reference entries must go through the same
/// instance type to avoid divergence between the two conversion paths.
pub struct ColorConverter {
    /// Reference white point (always D65)
    #[allow(dead_code)]
    white_point: [f64; 3],
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a new color converter with D65 as reference illuminant
    pub fn new() -> Self {
        Self {
            white_point: D65_WHITE_POINT_XYZ,
        }
    }

    /// Convert 8-bit RGB to Lab
    pub fn rgb8_to_lab(&self, r: u8, g: u8, b: u8) -> LabColor {
        self.rgb_to_lab(r as f64, g as f64, b as f64)
    }

    /// Convert RGB with fractional channels in [0, 255] to Lab
    ///
    /// Cluster centroids are floating-point averages of 8-bit pixels, so the
    /// channels are not quantized before conversion.
    pub fn rgb_to_lab(&self, r: f64, g: f64, b: f64) -> LabColor {
        let srgb: Srgb<f64> = Srgb::new(r / 255.0, g / 255.0, b / 255.0);
        let lab: Lab<D65, f64> = Lab::from_color(srgb);
        LabColor::new(lab.l, lab.a, lab.b)
    }

    /// Compute the CIE76 color difference between two Lab colors
    ///
    /// Plain Euclidean distance over (L*, a*, b*). Symmetric, and zero iff
    /// the two colors are identical up to floating precision.
    pub fn delta_e(&self, a: LabColor, b: LabColor) -> f64 {
        let dl = a.l - b.l;
        let da = a.a - b.a;
        let db = a.b - b.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_lab_black() {
        let converter = ColorConverter::new();
        let lab = converter.rgb8_to_lab(0, 0, 0);
        assert!(lab.l < 1.0); // Black should have very low lightness
    }

    #[test]
    fn test_rgb_to_lab_white() {
        let converter = ColorConverter::new();
        let lab = converter.rgb8_to_lab(255, 255, 255);
        assert!(lab.l > 99.0); // White should have high lightness
        assert!(lab.a.abs() < 1.0); // Should be near neutral
        assert!(lab.b.abs() < 1.0);
    }

    #[test]
    fn test_rgb_to_lab_red_reference_values() {
        // sRGB primary red under D65: L*=53.24, a*=80.09, b*=67.20
        let converter = ColorConverter::new();
        let lab = converter.rgb8_to_lab(255, 0, 0);
        assert!((lab.l - 53.24).abs() < 0.5);
        assert!((lab.a - 80.09).abs() < 0.5);
        assert!((lab.b - 67.20).abs() < 0.5);
    }

    #[test]
    fn test_rgb_to_lab_deterministic() {
        let converter = ColorConverter::new();
        let first = converter.rgb_to_lab(196.0, 63.0, 42.0);
        let second = converter.rgb_to_lab(196.0, 63.0, 42.0);
        assert!((first.l - second.l).abs() < 1e-9);
        assert!((first.a - second.a).abs() < 1e-9);
        assert!((first.b - second.b).abs() < 1e-9);
    }

    #[test]
    fn test_rgb8_matches_fractional_path() {
        let converter = ColorConverter::new();
        let from_u8 = converter.rgb8_to_lab(180, 40, 90);
        let from_f64 = converter.rgb_to_lab(180.0, 40.0, 90.0);
        assert_eq!(from_u8, from_f64);
    }

    #[test]
    fn test_delta_e_same_color() {
        let converter = ColorConverter::new();
        let lab = converter.rgb8_to_lab(120, 80, 60);
        assert_eq!(converter.delta_e(lab, lab), 0.0);
    }

    #[test]
    fn test_delta_e_symmetric() {
        let converter = ColorConverter::new();
        let a = LabColor::new(49.037, 43.146, 50.657);
        let b = LabColor::new(61.799, 47.709, 69.759);
        assert!((converter.delta_e(a, b) - converter.delta_e(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_delta_e_known_value() {
        let converter = ColorConverter::new();
        let a = LabColor::new(50.0, 0.0, 0.0);
        let b = LabColor::new(53.0, 4.0, 0.0);
        assert!((converter.delta_e(a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_conversion_round_trip_distance_zero() {
        // Converting the same RGB source twice yields distance 0
        let converter = ColorConverter::new();
        let a = converter.rgb8_to_lab(196, 63, 42);
        let b = converter.rgb8_to_lab(196, 63, 42);
        assert_eq!(converter.delta_e(a, b), 0.0);
    }
}
