//! Diagnostic visualization of cluster frequencies
//!
//! Renders the horizontal bar from dominant color extraction: one segment
//! per cluster, widths proportional to cluster frequency, ordered ascending
//! by frequency. Diagnostic only; sinks are injected explicitly and never
//! influence classification.

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use log::warn;

use crate::color::ClusterCentroid;
use crate::constants::visualize::{BAR_HEIGHT, BAR_WIDTH};

/// Receiver for the cluster summary of a classification run
pub trait ClusterSink {
    /// Called once per classification with all clusters, ascending by weight
    fn observe(&mut self, clusters: &[ClusterCentroid]);
}

/// Renderer for the proportional frequency bar
pub struct FrequencyBar {
    width: u32,
    height: u32,
}

impl Default for FrequencyBar {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyBar {
    /// Create a renderer with the default bar dimensions
    pub fn new() -> Self {
        Self::with_size(BAR_WIDTH, BAR_HEIGHT)
    }

    /// Create a renderer with custom dimensions
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render the frequency bar for a cluster summary
    pub fn render(&self, clusters: &[ClusterCentroid]) -> RgbImage {
        let mut ordered: Vec<&ClusterCentroid> = clusters.iter().collect();
        ordered.sort_by(|a, b| a.weight.total_cmp(&b.weight));

        let mut bar = RgbImage::new(self.width, self.height);
        let mut start = 0.0f64;
        for cluster in ordered {
            let end = start + cluster.weight * self.width as f64;
            let x0 = (start.round() as u32).min(self.width);
            let x1 = (end.round() as u32).min(self.width);
            let pixel = Rgb([
                cluster.rgb[0].round().clamp(0.0, 255.0) as u8,
                cluster.rgb[1].round().clamp(0.0, 255.0) as u8,
                cluster.rgb[2].round().clamp(0.0, 255.0) as u8,
            ]);
            for x in x0..x1 {
                for y in 0..self.height {
                    bar.put_pixel(x, y, pixel);
                }
            }
            start = end;
        }
        bar
    }
}

/// Sink that renders the frequency bar and saves it as a PNG
///
/// The file is written for later human inspection instead of blocking on a
/// displayed window, so automated callers are never suspended. A failed
/// write is logged and otherwise ignored.
pub struct PngBarSink {
    bar: FrequencyBar,
    path: PathBuf,
}

impl PngBarSink {
    /// Create a sink writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            bar: FrequencyBar::new(),
            path: path.into(),
        }
    }
}

impl ClusterSink for PngBarSink {
    fn observe(&mut self, clusters: &[ClusterCentroid]) {
        let bar = self.bar.render(clusters);
        if let Err(e) = bar.save(&self.path) {
            warn!("failed to save cluster bar to {}: {}", self.path.display(), e);
        }
    }
}
