//! Configuration structures for the classification pipeline
//!
//! All tunable parameters live here: the neighbor count for the vote, the
//! cluster count for dominant color extraction, the clustering knobs, and an
//! optional path to an external reference table. In the default setup these
//! are compiled-in constants; loading a JSON file overrides them without
//! touching classifier logic.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use assay_colors::ClassifierConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = ClassifierConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = ClassifierConfig::default();
//! # Ok::<(), assay_colors::ClassifyError>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, kmeans};
use crate::error::{ClassifyError, Result};

/// Complete classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Neighbors considered by the nearest-neighbor vote
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,

    /// Color clusters used by dominant color extraction
    #[serde(default = "default_clusters")]
    pub clusters: usize,

    /// Clustering parameters
    #[serde(default)]
    pub kmeans: KmeansConfig,

    /// Optional external reference table (JSON); the compiled-in table is
    /// used when absent
    #[serde(default)]
    pub reference_table: Option<PathBuf>,
}

/// Parameters of the Lloyd's clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmeansConfig {
    /// Iteration cap
    pub max_iterations: u32,

    /// Total centroid movement below which a run has converged
    pub convergence_threshold: f64,

    /// Seed for centroid initialization
    pub seed: u64,
}

fn default_neighbors() -> usize {
    defaults::NEIGHBORS
}

fn default_clusters() -> usize {
    defaults::CLUSTERS
}

impl Default for KmeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: kmeans::MAX_ITERATIONS,
            convergence_threshold: kmeans::CONVERGENCE_THRESHOLD,
            seed: kmeans::SEED,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            neighbors: default_neighbors(),
            clusters: default_clusters(),
            kmeans: KmeansConfig::default(),
            reference_table: None,
        }
    }
}

impl ClassifierConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::config(format!("failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ClassifyError::config(format!("failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassifyError::config("failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            ClassifyError::config(format!("failed to write {}", path.display()), e)
        })
    }

    /// Reject parameter combinations the classifier cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(ClassifyError::config_message("neighbors must be at least 1"));
        }
        if self.clusters == 0 {
            return Err(ClassifyError::config_message("clusters must be at least 1"));
        }
        Ok(())
    }
}
