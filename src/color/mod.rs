//! Color representation, conversion, and dominant color extraction
//!
//! This module defines the perceptual color value type shared by queries and
//! reference entries, the sRGB to CIELAB converter, and the clustering-based
//! dominant color extractor.

use serde::{Deserialize, Serialize};

pub mod conversion;
pub mod dominant;

pub use conversion::ColorConverter;
pub use dominant::{ClusterCentroid, DominantColor, DominantColorExtractor};

/// CIE L*a*b* color under the D65 illuminant.
///
/// Immutable value type; L* is conventionally in [0, 100], a*/b* are bounded
/// in practice by the sRGB gamut. Compared only through
/// [`ColorConverter::delta_e`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl LabColor {
    /// Create a Lab color from its three components
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}
