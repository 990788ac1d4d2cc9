//! The reference calibration set
//!
//! An ordered, immutable table of labeled Lab colors spanning the
//! concentration levels the classifier can report. The compiled-in table
//! holds 21 hand-measured entries (7 levels, 3 replicates each); an
//! alternative table can be loaded from JSON so recalibration does not
//! require a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};
use crate::LabColor;

/// Hand-measured calibration colors, in table order.
///
/// Entry order is significant: nearest-neighbor selection breaks distance
/// ties by preferring earlier entries.
const BUILTIN: [(&str, [f64; 3]); 21] = [
    ("0 mg/ml", [49.037, 43.146, 50.657]),
    ("0 mg/ml", [42.832, 36.156, 44.324]),
    ("0 mg/ml", [54.301, 45.050, 50.423]),
    ("2.2 mg/ml", [61.799, 47.709, 69.759]),
    ("2.2 mg/ml", [73.31, 48.827, 69.335]),
    ("2.2 mg/ml", [77.089, 60.114, 79.733]),
    ("2.35 mg/ml", [66.707, 48.81, 66.253]),
    ("2.35 mg/ml", [78.999, 61.811, 80.432]),
    ("2.35 mg/ml", [62.625, 44.679, 66.070]),
    ("2.5 mg/ml", [66.907, 54.399, 64.937]),
    ("2.5 mg/ml", [91.305, 72.603, 84.315]),
    ("2.5 mg/ml", [75.136, 60.098, 74.828]),
    ("2.65 mg/ml", [83.398, 57.803, 66.542]),
    ("2.65 mg/ml", [82.317, 60.814, 68.704]),
    ("2.65 mg/ml", [71.47, 50.764, 58.209]),
    ("2.8 mg/ml", [89.226, 61.02, 75.412]),
    ("2.8 mg/ml", [63.833, 43.558, 63.545]),
    ("2.8 mg/ml", [78.229, 56.659, 75.424]),
    ("3.1 mg/ml", [102.357, 78.851, 86.94]),
    ("3.1 mg/ml", [109.81, 81.353, 85.919]),
    ("3.1 mg/ml", [97.2, 70.294, 77.964]),
];

/// A labeled reference color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Concentration level, e.g. "2.2 mg/ml"
    pub label: String,
    /// Measured color in Lab space
    pub color: LabColor,
}

/// An ordered set of reference entries, immutable once constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSet {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceSet {
    /// The compiled-in calibration table
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(label, [l, a, b])| ReferenceEntry {
                    label: (*label).to_string(),
                    color: LabColor::new(*l, *a, *b),
                })
                .collect(),
        }
    }

    /// Build a set from explicit entries
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::Config` if the entry list is empty.
    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ClassifyError::config_message("reference table is empty"));
        }
        Ok(Self { entries })
    }

    /// Load a set from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::config(format!("failed to read {}", path.display()), e)
        })?;
        let set: Self = serde_json::from_str(&content).map_err(|e| {
            ClassifyError::config(format!("failed to parse {}", path.display()), e)
        })?;
        Self::from_entries(set.entries)
    }

    /// Save the set to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassifyError::config("failed to serialize reference table", e))?;
        std::fs::write(path, json).map_err(|e| {
            ClassifyError::config(format!("failed to write {}", path.display()), e)
        })
    }

    /// Entries in table order
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct labels in first-appearance order
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !labels.contains(&entry.label.as_str()) {
                labels.push(&entry.label);
            }
        }
        labels
    }
}
