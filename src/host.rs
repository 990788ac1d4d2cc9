//! Host-side contracts for image acquisition and result presentation
//!
//! The classifier never performs hardware control or UI rendering itself.
//! Acquisition hardware (file pickers, camera capture behind an
//! illumination warm-up) and presentation surfaces (a UI text field) sit
//! behind these two narrow traits; the host wires them to the classifier.

use std::path::PathBuf;

use crate::classifier::SampleClassifier;
use crate::error::{ClassifyError, Result};
use crate::image_loader::{load_image, RawImage};

/// Supplier of raw images to classify
pub trait ImageSource {
    /// Produce the next image
    fn acquire(&mut self) -> Result<RawImage>;
}

/// Consumer of classification outcomes
///
/// Receives either a label from the reference set's universe or the error
/// the run failed with; performs no further interpretation.
pub trait LabelSink {
    fn present(&mut self, outcome: std::result::Result<&str, &ClassifyError>);
}

/// Image source reading a fixed file path
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileImageSource {
    fn acquire(&mut self) -> Result<RawImage> {
        load_image(&self.path)
    }
}

/// Acquire one image, classify it, and present the outcome
///
/// Failures are presented to the sink as failures, never swallowed; the
/// outcome is also returned so callers can react to it directly.
pub fn classify_once(
    source: &mut dyn ImageSource,
    classifier: &mut SampleClassifier,
    sink: &mut dyn LabelSink,
) -> Result<String> {
    let outcome = source
        .acquire()
        .and_then(|image| classifier.classify_image(&image));
    match &outcome {
        Ok(label) => sink.present(Ok(label)),
        Err(error) => sink.present(Err(error)),
    }
    outcome
}
