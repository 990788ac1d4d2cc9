//! Dominant color extraction via color clustering
//!
//! Reduces a raw pixel population to a single representative color by
//! partitioning the pixels into a fixed number of clusters in RGB space
//! (Lloyd's iterative clustering, seeded k-means++ initialization) and
//! taking the centroid of the most populous cluster.
//!
//! Algorithm tag: `algo-kmeans-dominant-color`

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::constants::{defaults, kmeans};
use crate::error::{ClassifyError, Result};

/// A cluster centroid with its share of the pixel population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterCentroid {
    /// Centroid color, fractional RGB channels in [0, 255]
    pub rgb: [f64; 3],
    /// Fraction of pixels assigned to this cluster, in [0, 1]
    pub weight: f64,
}

/// Result of a dominant color extraction
#[derive(Debug, Clone, PartialEq)]
pub struct DominantColor {
    /// Centroid of the most populous cluster
    pub rgb: [f64; 3],
    /// All clusters, ordered ascending by weight
    pub clusters: Vec<ClusterCentroid>,
}

/// Dominant color extractor implementing Lloyd's clustering in RGB space
///
/// The initialization seed is fixed, so extraction is deterministic for a
/// given pixel buffer. A solid-color image degenerates to one cluster
/// holding every pixel while the remaining centroids collapse onto the same
/// color; the dominant color is still returned.
pub struct DominantColorExtractor {
    clusters: usize,
    max_iterations: u32,
    convergence_threshold: f64,
    seed: u64,
}

impl Default for DominantColorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DominantColorExtractor {
    /// Create an extractor with the default cluster count and clustering
    /// parameters
    pub fn new() -> Self {
        Self::with_params(
            defaults::CLUSTERS,
            kmeans::MAX_ITERATIONS,
            kmeans::CONVERGENCE_THRESHOLD,
            kmeans::SEED,
        )
    }

    /// Create an extractor with custom parameters
    ///
    /// A cluster count of zero is clamped to one.
    pub fn with_params(
        clusters: usize,
        max_iterations: u32,
        convergence_threshold: f64,
        seed: u64,
    ) -> Self {
        Self {
            clusters: clusters.max(1),
            max_iterations,
            convergence_threshold,
            seed,
        }
    }

    /// Cluster count this extractor partitions pixels into
    pub fn clusters(&self) -> usize {
        self.clusters
    }

    /// Extract the dominant color from a pixel population
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InsufficientSamples` when the pixel count is
    /// smaller than the cluster count.
    pub fn extract(&self, pixels: &[[u8; 3]]) -> Result<DominantColor> {
        if pixels.len() < self.clusters {
            return Err(ClassifyError::InsufficientSamples {
                samples: pixels.len(),
                clusters: self.clusters,
            });
        }

        let points: Vec<[f64; 3]> = pixels
            .iter()
            .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
            .collect();

        let mut centroids = self.init_centroids(&points);
        for iteration in 0..self.max_iterations {
            let movement = self.lloyd_step(&points, &mut centroids);
            if movement < self.convergence_threshold {
                debug!(
                    "k-means converged after {} iterations (movement {:.4})",
                    iteration + 1,
                    movement
                );
                break;
            }
        }

        // Relative frequency of each cluster under the final centroids
        let mut counts = vec![0usize; centroids.len()];
        for point in &points {
            counts[nearest_centroid(point, &centroids)] += 1;
        }

        let total = points.len() as f64;
        let mut clusters: Vec<ClusterCentroid> = centroids
            .iter()
            .zip(&counts)
            .map(|(rgb, &count)| ClusterCentroid {
                rgb: *rgb,
                weight: count as f64 / total,
            })
            .collect();
        clusters.sort_by(|a, b| a.weight.total_cmp(&b.weight));

        // Non-empty: the cluster count is at least one
        let dominant = clusters[clusters.len() - 1];
        Ok(DominantColor {
            rgb: dominant.rgb,
            clusters,
        })
    }

    /// Seeded k-means++ style initialization
    ///
    /// Subsequent centroids are drawn proportional to the squared distance
    /// from the nearest already-chosen centroid. When the remaining mass is
    /// zero (every pixel coincides with a centroid), centroids are drawn
    /// uniformly and duplicates are accepted.
    fn init_centroids(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = Vec::with_capacity(self.clusters);
        centroids.push(points[rng.gen_range(0..points.len())]);

        while centroids.len() < self.clusters {
            let weights: Vec<f64> = points
                .iter()
                .map(|p| {
                    let nearest = nearest_centroid(p, &centroids);
                    squared_distance(p, &centroids[nearest])
                })
                .collect();
            let total: f64 = weights.iter().sum();

            let next = if total > 0.0 {
                let mut target = rng.gen::<f64>() * total;
                let mut chosen = points.len() - 1;
                for (index, weight) in weights.iter().enumerate() {
                    if target <= *weight {
                        chosen = index;
                        break;
                    }
                    target -= weight;
                }
                points[chosen]
            } else {
                points[rng.gen_range(0..points.len())]
            };
            centroids.push(next);
        }
        centroids
    }

    /// One assignment + update pass; returns total centroid movement
    fn lloyd_step(&self, points: &[[f64; 3]], centroids: &mut [[f64; 3]]) -> f64 {
        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];

        for point in points {
            let nearest = nearest_centroid(point, centroids);
            for channel in 0..3 {
                sums[nearest][channel] += point[channel];
            }
            counts[nearest] += 1;
        }

        let mut movement = 0.0;
        for (index, centroid) in centroids.iter_mut().enumerate() {
            if counts[index] == 0 {
                // Empty cluster keeps its previous centroid
                continue;
            }
            let count = counts[index] as f64;
            let updated = [
                sums[index][0] / count,
                sums[index][1] / count,
                sums[index][2] / count,
            ];
            movement += squared_distance(centroid, &updated).sqrt();
            *centroid = updated;
        }
        movement
    }
}

/// Index of the centroid nearest to a point; ties go to the lowest index
fn nearest_centroid(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(color: [u8; 3], count: usize) -> Vec<[u8; 3]> {
        vec![color; count]
    }

    #[test]
    fn test_insufficient_samples() {
        let extractor = DominantColorExtractor::new();
        let result = extractor.extract(&uniform([10, 20, 30], 3));
        match result {
            Err(ClassifyError::InsufficientSamples { samples, clusters }) => {
                assert_eq!(samples, 3);
                assert_eq!(clusters, 5);
            }
            other => panic!("Expected InsufficientSamples, got: {:?}", other),
        }
    }

    #[test]
    fn test_uniform_image_returns_that_color() {
        let extractor = DominantColorExtractor::new();
        for count in [5, 50, 500] {
            let dominant = extractor.extract(&uniform([180, 40, 90], count)).unwrap();
            assert!((dominant.rgb[0] - 180.0).abs() < 1e-6, "count {}", count);
            assert!((dominant.rgb[1] - 40.0).abs() < 1e-6, "count {}", count);
            assert!((dominant.rgb[2] - 90.0).abs() < 1e-6, "count {}", count);

            // One cluster holds the whole population
            let top = dominant.clusters.last().unwrap();
            assert!((top.weight - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_two_tone_image_majority_wins() {
        let extractor = DominantColorExtractor::new();
        let mut pixels = uniform([200, 30, 30], 80);
        pixels.extend(uniform([20, 40, 220], 20));

        let dominant = extractor.extract(&pixels).unwrap();
        assert!((dominant.rgb[0] - 200.0).abs() < 1e-6);
        assert!((dominant.rgb[1] - 30.0).abs() < 1e-6);
        assert!((dominant.rgb[2] - 30.0).abs() < 1e-6);

        let top = dominant.clusters.last().unwrap();
        assert!((top.weight - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_clusters_ordered_ascending_and_normalized() {
        let extractor = DominantColorExtractor::new();
        let mut pixels = uniform([200, 30, 30], 60);
        pixels.extend(uniform([20, 40, 220], 30));
        pixels.extend(uniform([240, 240, 240], 10));

        let dominant = extractor.extract(&pixels).unwrap();
        let weights: Vec<f64> = dominant.clusters.iter().map(|c| c.weight).collect();
        assert!(weights.windows(2).all(|w| w[0] <= w[1]));
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extraction_deterministic() {
        let extractor = DominantColorExtractor::new();
        let mut pixels = uniform([130, 90, 40], 70);
        pixels.extend(uniform([30, 160, 80], 30));

        let first = extractor.extract(&pixels).unwrap();
        let second = extractor.extract(&pixels).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_cluster_count_clamped() {
        let extractor = DominantColorExtractor::with_params(0, 10, 1.0, 0);
        assert_eq!(extractor.clusters(), 1);
        let dominant = extractor.extract(&uniform([1, 2, 3], 4)).unwrap();
        assert!((dominant.rgb[2] - 3.0).abs() < 1e-6);
    }
}
