//! # Assay Colors
//!
//! A Rust crate for estimating analyte concentrations from photographs of
//! colorimetric test samples.
//!
//! This library classifies a sample by:
//! - Extracting the dominant color of the photograph by color clustering
//! - Converting it into the perceptually uniform CIELAB space
//! - Comparing it against a fixed table of hand-measured reference colors
//! - Taking a k-nearest-neighbor majority vote over the reference labels
//!
//! The reference table spans discrete calibration levels (e.g. "2.2 mg/ml");
//! the result is one of those labels, or an explicit failure. Image
//! acquisition and result display are host concerns behind the [`host`]
//! traits; the library performs no hardware control or UI rendering.
//!
//! ## Example
//!
//! ```rust,no_run
//! use assay_colors::classify_sample;
//! use std::path::Path;
//!
//! let label = classify_sample(Path::new("sample.jpg"))?;
//! println!("Concentration: {}", label);
//! # Ok::<(), assay_colors::ClassifyError>(())
//! ```

use std::path::Path;

pub mod calibration;
pub mod classifier;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod host;
pub mod image_loader;
pub mod visualize;

pub use calibration::{ReferenceEntry, ReferenceSet};
pub use classifier::{DistanceRecord, SampleClassifier};
pub use color::{ClusterCentroid, ColorConverter, DominantColor, DominantColorExtractor, LabColor};
pub use config::{ClassifierConfig, KmeansConfig};
pub use error::{ClassifyError, Result};
pub use image_loader::{load_image, RawImage};

/// Classify the sample in an image file with default settings
///
/// One-shot convenience over [`SampleClassifier`]: compiled-in reference
/// table, k = 3 neighbors, 5 color clusters.
///
/// # Errors
///
/// Returns `ClassifyError` if:
/// - The image cannot be loaded or is empty
/// - The image holds fewer pixels than the cluster count
/// - The nearest reference labels have no unique majority
pub fn classify_sample(image_path: &Path) -> Result<String> {
    SampleClassifier::new().classify_file(image_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sample_missing_file() {
        let result = classify_sample(Path::new("nonexistent_sample.jpg"));
        assert!(matches!(result, Err(ClassifyError::ImageLoad { .. })));
    }
}
