//! Heading level assignment by 1-D font-size clustering.

use crate::model::HeadingLevel;

/// Splits one-dimensional values into `k` clusters.
///
/// Implementations must be deterministic: the same multiset of values,
/// in any order, yields the same label for each value.
pub trait FontSizePartitioner: Send + Sync {
    /// Cluster index in `0..k` for each value, in input order.
    fn partition(&self, values: &[f32], k: usize) -> Vec<usize>;
}

/// Lloyd's k-means on a line with quantile initialisation.
#[derive(Debug, Clone, Copy)]
pub struct KMeansPartitioner {
    pub max_iterations: usize,
}

impl Default for KMeansPartitioner {
    fn default() -> Self {
        Self { max_iterations: 100 }
    }
}

impl KMeansPartitioner {
    /// Centroids at evenly spaced quantiles of the sorted distinct values.
    fn initial_centroids(values: &[f32], k: usize) -> Vec<f32> {
        let mut distinct = values.to_vec();
        distinct.sort_by(f32::total_cmp);
        distinct.dedup();

        let m = distinct.len();
        if k == 1 || m == 1 {
            return vec![distinct[0]; k];
        }
        (0..k)
            .map(|i| {
                let pos = (i as f32 * (m - 1) as f32 / (k - 1) as f32).round() as usize;
                distinct[pos.min(m - 1)]
            })
            .collect()
    }

    fn nearest(centroids: &[f32], value: f32) -> usize {
        let mut best = 0;
        let mut best_dist = (value - centroids[0]).abs();
        for (i, c) in centroids.iter().enumerate().skip(1) {
            let dist = (value - c).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }
}

impl FontSizePartitioner for KMeansPartitioner {
    fn partition(&self, values: &[f32], k: usize) -> Vec<usize> {
        if values.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut centroids = Self::initial_centroids(values, k);
        let mut labels: Vec<usize> = values.iter().map(|&v| Self::nearest(&centroids, v)).collect();

        for _ in 0..self.max_iterations {
            let mut sums = vec![0.0f64; k];
            let mut counts = vec![0usize; k];
            for (&v, &label) in values.iter().zip(&labels) {
                sums[label] += v as f64;
                counts[label] += 1;
            }
            for i in 0..k {
                // Empty clusters keep their centroid
                if counts[i] > 0 {
                    centroids[i] = (sums[i] / counts[i] as f64) as f32;
                }
            }

            let next: Vec<usize> = values.iter().map(|&v| Self::nearest(&centroids, v)).collect();
            if next == labels {
                break;
            }
            labels = next;
        }
        labels
    }
}

/// Assign a heading level to each font size.
///
/// Uses `k = min(max_levels, distinct sizes)` clusters; the cluster with the
/// largest mean size becomes H1. A single distinct size makes everything H1.
pub fn assign_levels(
    sizes: &[f32],
    max_levels: usize,
    partitioner: &dyn FontSizePartitioner,
) -> Vec<HeadingLevel> {
    let mut distinct = sizes.to_vec();
    distinct.sort_by(f32::total_cmp);
    distinct.dedup();

    let k = max_levels.clamp(1, 3).min(distinct.len());
    match k {
        0 => return Vec::new(),
        1 => return vec![HeadingLevel::H1; sizes.len()],
        _ => {}
    }

    let labels = partitioner.partition(sizes, k);

    // Rank clusters by descending member mean
    let mut sums = vec![0.0f64; k];
    let mut counts = vec![0usize; k];
    for (&size, &label) in sizes.iter().zip(&labels) {
        let label = label.min(k - 1);
        sums[label] += size as f64;
        counts[label] += 1;
    }
    let mut order: Vec<usize> = (0..k).filter(|&i| counts[i] > 0).collect();
    order.sort_by(|&a, &b| {
        let mean_a = sums[a] / counts[a] as f64;
        let mean_b = sums[b] / counts[b] as f64;
        mean_b.total_cmp(&mean_a).then(a.cmp(&b))
    });
    let mut rank = vec![0usize; k];
    for (r, &cluster) in order.iter().enumerate() {
        rank[cluster] = r;
    }

    log::debug!("{} heading sizes in {} levels", sizes.len(), order.len());

    labels
        .iter()
        .map(|&label| HeadingLevel::from_rank(rank[label.min(k - 1)]).unwrap_or(HeadingLevel::H3))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel::*;

    fn levels(sizes: &[f32]) -> Vec<HeadingLevel> {
        assign_levels(sizes, 3, &KMeansPartitioner::default())
    }

    #[test]
    fn test_three_sizes_three_levels() {
        assert_eq!(levels(&[24.0, 18.0, 12.0]), vec![H1, H2, H3]);
        assert_eq!(levels(&[12.0, 24.0, 18.0, 24.0]), vec![H3, H1, H2, H1]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(levels(&[]).is_empty());
        assert_eq!(levels(&[14.0, 14.0]), vec![H1, H1]);
        assert_eq!(levels(&[20.0, 14.0]), vec![H1, H2]);
    }

    #[test]
    fn test_close_sizes_share_a_level() {
        let result = levels(&[24.0, 23.5, 16.0, 15.5, 11.0, 11.2]);
        assert_eq!(result, vec![H1, H1, H2, H2, H3, H3]);
    }

    #[test]
    fn test_max_levels_limits_clusters() {
        let result = assign_levels(&[24.0, 18.0, 12.0], 2, &KMeansPartitioner::default());
        assert!(result.iter().all(|l| *l != H3));
        assert_eq!(result[0], H1);
        assert_eq!(result[2], H2);
    }

    #[test]
    fn test_labels_follow_values_across_permutations() {
        let sizes = [20.0, 16.0, 14.0, 13.0, 20.0, 11.0, 16.0];
        let expected = levels(&sizes);
        let label_of = |size: f32| expected[sizes.iter().position(|&s| s == size).unwrap()];

        let mut permuted = sizes.to_vec();
        permuted.reverse();
        permuted.rotate_left(3);
        for _ in 0..3 {
            let result = levels(&permuted);
            for (size, level) in permuted.iter().zip(&result) {
                assert_eq!(*level, label_of(*size));
            }
        }
    }

    #[test]
    fn test_partitioner_is_deterministic() {
        let partitioner = KMeansPartitioner::default();
        let values = [1.0, 2.0, 10.0, 11.0, 20.0];
        let first = partitioner.partition(&values, 3);
        assert_eq!(first, vec![0, 0, 1, 1, 2]);
        assert_eq!(partitioner.partition(&values, 3), first);
        assert!(partitioner.partition(&[], 3).is_empty());
    }
}
