//! Seeded k-means over RGB samples

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 42;
const MAX_ITERATIONS: usize = 20;

/// Cluster `samples` into at most `k` groups.
///
/// Returns `(center, member_count)` pairs, largest cluster first. Empty clusters are dropped,
/// so fewer than `k` centers come back when the samples hold fewer distinct colors.
pub fn kmeans(samples: &[[f64; 3]], k: usize) -> Vec<([f64; 3], usize)> {
    if samples.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut centers: Vec<[f64; 3]> = (0..k)
        .map(|_| samples[rng.random_range(0..samples.len())])
        .collect();
    let mut assignment = vec![0usize; samples.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (sample, slot) in samples.iter().zip(assignment.iter_mut()) {
            let nearest = nearest_center(sample, &centers);
            if nearest != *slot {
                *slot = nearest;
                changed = true;
            }
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (sample, &cluster) in samples.iter().zip(&assignment) {
            for channel in 0..3 {
                sums[cluster][channel] += sample[channel];
            }
            counts[cluster] += 1;
        }
        for cluster in 0..k {
            if counts[cluster] > 0 {
                let n = counts[cluster] as f64;
                centers[cluster] = sums[cluster].map(|sum| sum / n);
            }
        }

        if !changed {
            break;
        }
    }

    let mut counts = vec![0usize; k];
    for &cluster in &assignment {
        counts[cluster] += 1;
    }
    let mut clusters: Vec<([f64; 3], usize)> = centers
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .collect();
    clusters.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    clusters
}

fn nearest_center(sample: &[f64; 3], centers: &[[f64; 3]]) -> usize {
    centers
        .iter()
        .enumerate()
        .map(|(i, center)| {
            let distance: f64 = (0..3).map(|c| (sample[c] - center[c]).powi(2)).sum();
            (i, distance)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
