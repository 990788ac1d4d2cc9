//! Nearest-neighbor classification against the reference calibration set
//!
//! Computes the CIE76 distance from a query color to every reference entry,
//! selects the k globally nearest entries, and takes the majority label.
//! Selection is true top-k over the full distance list; entries tying at the
//! k-th boundary are taken in table order.
//!
//! Algorithm tag: `algo-knn-majority-vote`

use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::calibration::ReferenceSet;
use crate::color::{ColorConverter, DominantColorExtractor, LabColor};
use crate::config::ClassifierConfig;
use crate::error::{ClassifyError, Result};
use crate::image_loader::{load_image, RawImage};
use crate::visualize::ClusterSink;

/// Distance from a query color to one reference entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceRecord {
    /// Label of the reference entry
    pub label: String,
    /// CIE76 distance to the entry
    pub distance: f64,
    /// Position of the entry in the reference table
    pub index: usize,
}

/// Classifier mapping a sample photograph to a concentration label
///
/// Holds the most recent successful label and the most recent full distance
/// list; both are overwritten per call and kept for diagnostics. A failed
/// call never overwrites the last label, so "failure" and "stale prior
/// result" stay distinct, observable states.
///
/// Classification takes `&mut self`: per-call transient state is not safe
/// for concurrent reentry, and exclusive borrows serialize calls on a
/// shared instance. Distinct instances are independent.
pub struct SampleClassifier {
    references: ReferenceSet,
    converter: ColorConverter,
    extractor: DominantColorExtractor,
    neighbors: usize,
    diagnostics: Option<Box<dyn ClusterSink>>,
    last_label: Option<String>,
    last_distances: Vec<DistanceRecord>,
}

impl Default for SampleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleClassifier {
    /// Create a classifier with the compiled-in reference table and default
    /// parameters
    pub fn new() -> Self {
        Self::assemble(ReferenceSet::builtin(), &ClassifierConfig::default())
    }

    /// Create a classifier with a custom reference table and default
    /// parameters
    pub fn with_references(references: ReferenceSet) -> Self {
        Self::assemble(references, &ClassifierConfig::default())
    }

    /// Create a classifier from a configuration
    ///
    /// Loads the external reference table when one is configured; otherwise
    /// uses the compiled-in table.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let references = match &config.reference_table {
            Some(path) => ReferenceSet::from_json_file(path)?,
            None => ReferenceSet::builtin(),
        };
        Ok(Self::assemble(references, config))
    }

    /// Create a classifier with an explicit table and configuration
    pub fn with_config(references: ReferenceSet, config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(references, config))
    }

    fn assemble(references: ReferenceSet, config: &ClassifierConfig) -> Self {
        Self {
            references,
            converter: ColorConverter::new(),
            extractor: DominantColorExtractor::with_params(
                config.clusters,
                config.kmeans.max_iterations,
                config.kmeans.convergence_threshold,
                config.kmeans.seed,
            ),
            neighbors: config.neighbors,
            diagnostics: None,
            last_label: None,
            last_distances: Vec::new(),
        }
    }

    /// Install an optional diagnostic sink, fed the cluster summary after
    /// each classification; it never influences the result
    pub fn set_diagnostics(&mut self, sink: Box<dyn ClusterSink>) {
        self.diagnostics = Some(sink);
    }

    /// Remove the diagnostic sink
    pub fn clear_diagnostics(&mut self) {
        self.diagnostics = None;
    }

    /// Classify the sample in an image file
    pub fn classify_file(&mut self, path: &Path) -> Result<String> {
        let image = load_image(path)?;
        self.classify_image(&image)
    }

    /// Classify the sample in a raw pixel buffer
    pub fn classify_image(&mut self, image: &RawImage) -> Result<String> {
        let samples = image.pixel_samples();
        let dominant = self.extractor.extract(&samples)?;
        let query = self
            .converter
            .rgb_to_lab(dominant.rgb[0], dominant.rgb[1], dominant.rgb[2]);
        let outcome = self.classify_lab(query);
        if let Some(sink) = self.diagnostics.as_mut() {
            sink.observe(&dominant.clusters);
        }
        outcome
    }

    /// Classify a query color already in Lab space
    ///
    /// Recomputes the distance to every reference entry; nothing is cached
    /// across runs.
    pub fn classify_lab(&mut self, query: LabColor) -> Result<String> {
        let records: Vec<DistanceRecord> = self
            .references
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| DistanceRecord {
                label: entry.label.clone(),
                distance: self.converter.delta_e(query, entry.color),
                index,
            })
            .collect();
        // Recorded before the vote, so ambiguous runs keep their distance list
        self.last_distances = records.clone();

        let nearest = k_nearest(records, self.neighbors);
        let labels: Vec<&str> = nearest.iter().map(|r| r.label.as_str()).collect();
        debug!(
            "nearest {} of {}: {:?}",
            labels.len(),
            self.references.len(),
            nearest
                .iter()
                .map(|r| (r.label.as_str(), r.distance))
                .collect::<Vec<_>>()
        );

        let label = majority_label(&labels)?;
        self.last_label = Some(label.clone());
        Ok(label)
    }

    /// The reference table this classifier votes against
    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Most recent successful label, if any
    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }

    /// Full distance list of the most recent run
    pub fn last_distances(&self) -> &[DistanceRecord] {
        &self.last_distances
    }
}

/// Select the k globally smallest distances
///
/// The sort key includes the table index, so entries sharing the boundary
/// distance are taken in table order regardless of the sort algorithm.
fn k_nearest(mut records: Vec<DistanceRecord>, k: usize) -> Vec<DistanceRecord> {
    records.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
    records.truncate(k);
    records
}

/// Mode of the selected labels; a tie is an explicit failure
///
/// The vote runs over the labels alone, never over whole distance records.
fn majority_label(labels: &[&str]) -> Result<String> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match tally.iter_mut().find(|entry| entry.0 == *label) {
            Some(entry) => entry.1 += 1,
            None => tally.push((label, 1)),
        }
    }

    let best = tally.iter().map(|entry| entry.1).max().unwrap_or(0);
    let mut tied: Vec<String> = tally
        .iter()
        .filter(|entry| entry.1 == best)
        .map(|entry| entry.0.to_string())
        .collect();
    if tied.len() == 1 {
        Ok(tied.remove(0))
    } else {
        Err(ClassifyError::AmbiguousVote {
            k: labels.len(),
            tied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::ReferenceEntry;

    fn reference(label: &str, l: f64, a: f64, b: f64) -> ReferenceEntry {
        ReferenceEntry {
            label: label.to_string(),
            color: LabColor::new(l, a, b),
        }
    }

    #[test]
    fn test_exact_reference_color_classifies_as_its_label() {
        let mut classifier = SampleClassifier::new();
        let label = classifier
            .classify_lab(LabColor::new(49.037, 43.146, 50.657))
            .unwrap();
        assert_eq!(label, "0 mg/ml");

        assert_eq!(classifier.last_label(), Some("0 mg/ml"));
        assert_eq!(classifier.last_distances().len(), 21);
        assert_eq!(classifier.last_distances()[0].distance, 0.0);
    }

    #[test]
    fn test_three_way_tie_is_ambiguous() {
        // Equidistant between "0 mg/ml", "2.35 mg/ml", and "2.8 mg/ml"
        // replicate groups; the three nearest neighbors carry three
        // distinct labels
        let mut classifier = SampleClassifier::new();
        let result = classifier.classify_lab(LabColor::new(55.418, 45.428, 60.208));
        match result {
            Err(ClassifyError::AmbiguousVote { k, tied }) => {
                assert_eq!(k, 3);
                assert_eq!(tied.len(), 3);
            }
            other => panic!("Expected AmbiguousVote, got: {:?}", other),
        }

        // Failure leaves the last label untouched, but the distance list
        // reflects the failed run
        assert_eq!(classifier.last_label(), None);
        assert_eq!(classifier.last_distances().len(), 21);
    }

    #[test]
    fn test_failure_keeps_prior_label_distinct() {
        let mut classifier = SampleClassifier::new();
        classifier
            .classify_lab(LabColor::new(49.037, 43.146, 50.657))
            .unwrap();

        let result = classifier.classify_lab(LabColor::new(55.418, 45.428, 60.208));
        assert!(result.is_err());
        // Stale prior result is still observable, but distinct from the
        // failure returned above
        assert_eq!(classifier.last_label(), Some("0 mg/ml"));
    }

    #[test]
    fn test_boundary_ties_prefer_table_order() {
        // Three entries share the boundary distance; table order decides
        // which two enter the vote, so "low" wins 2-1
        let set = ReferenceSet::from_entries(vec![
            reference("low", 0.0, 0.0, 0.0),
            reference("low", 10.0, 0.0, 0.0),
            reference("high", 10.0, 0.0, 0.0),
            reference("other", 10.0, 0.0, 0.0),
        ])
        .unwrap();
        let mut classifier = SampleClassifier::with_references(set);
        let label = classifier.classify_lab(LabColor::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(label, "low");
    }

    #[test]
    fn test_vote_counts_labels_not_records() {
        // Two "far" records share a label and outvote the single nearest
        // entry even though their distances differ
        let set = ReferenceSet::from_entries(vec![
            reference("near", 1.0, 0.0, 0.0),
            reference("far", 4.0, 0.0, 0.0),
            reference("far", 9.0, 0.0, 0.0),
        ])
        .unwrap();
        let mut classifier = SampleClassifier::with_references(set);
        let label = classifier.classify_lab(LabColor::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(label, "far");
    }

    #[test]
    fn test_neighbor_count_capped_by_table_size() {
        let set = ReferenceSet::from_entries(vec![
            reference("a", 0.0, 0.0, 0.0),
            reference("a", 5.0, 0.0, 0.0),
            reference("b", 50.0, 0.0, 0.0),
        ])
        .unwrap();
        let config = ClassifierConfig {
            neighbors: 5,
            ..ClassifierConfig::default()
        };
        let mut classifier = SampleClassifier::with_config(set, &config).unwrap();
        let label = classifier.classify_lab(LabColor::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(label, "a");
    }

    #[test]
    fn test_k_nearest_is_global_selection() {
        // The nearest entry sits last in the list; order-dependent
        // truncation would miss it
        let records: Vec<DistanceRecord> = [40.0, 30.0, 20.0, 10.0, 0.5]
            .iter()
            .enumerate()
            .map(|(index, &distance)| DistanceRecord {
                label: format!("entry-{}", index),
                distance,
                index,
            })
            .collect();
        let nearest = k_nearest(records, 3);
        let distances: Vec<f64> = nearest.iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![0.5, 10.0, 20.0]);
    }

    #[test]
    fn test_majority_label_tie_cases() {
        assert_eq!(majority_label(&["a", "a", "b"]).unwrap(), "a");
        assert!(majority_label(&["a", "b", "c"]).is_err());
        // 2-2-1 split with k = 5 has no unique mode
        assert!(majority_label(&["a", "a", "b", "b", "c"]).is_err());
    }
}
