//! Seeded k-means with k-means++ initialization.
//!
//! Lloyd iterations: assign every point to its nearest centroid, move each
//! centroid to the mean of its points, stop when the total centroid shift
//! falls below the tolerance. Centroid arithmetic is done in f64 so that
//! long documents with many small components do not lose precision.
//!
//! A fixed seed makes the result a pure function of the input: the
//! assignment step runs in parallel but ties always go to the lowest
//! centroid index.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use raptor_core::errors::{ClusterError, EmbeddingError, RaptorResult};

/// Default convergence tolerance on the summed squared centroid shift.
const DEFAULT_TOL: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    max_iter: usize,
    tol: f64,
    seed: u64,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: DEFAULT_TOL,
            seed,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Cluster `data` and return one label in `0..k` per row.
    ///
    /// Labels are not guaranteed to cover every cluster: duplicate points
    /// can leave a centroid without members.
    pub fn fit_predict(&self, data: &[Vec<f32>]) -> RaptorResult<Vec<usize>> {
        if data.is_empty() {
            return Err(ClusterError::EmptyInput.into());
        }
        let n = data.len();
        if self.k == 0 || self.k > n {
            return Err(ClusterError::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            }
            .into());
        }
        let dims = data[0].len();
        if let Some(row) = data.iter().find(|row| row.len() != dims) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dims,
                actual: row.len(),
            }
            .into());
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.init_centroids(data, &mut rng);
        let mut labels = vec![0usize; n];

        for _ in 0..self.max_iter {
            labels = data
                .par_iter()
                .map(|point| nearest_centroid(point, &centroids))
                .collect();

            let mut sums = vec![vec![0.0f64; dims]; self.k];
            let mut counts = vec![0usize; self.k];
            for (point, &label) in data.iter().zip(&labels) {
                for (acc, x) in sums[label].iter_mut().zip(point) {
                    *acc += *x as f64;
                }
                counts[label] += 1;
            }

            for (sum, &count) in sums.iter_mut().zip(&counts) {
                if count > 0 {
                    for v in sum.iter_mut() {
                        *v /= count as f64;
                    }
                } else {
                    // Empty cluster: reseed from a random point.
                    let idx = rng.random_range(0..n);
                    *sum = to_f64(&data[idx]);
                }
            }

            let shift: f64 = centroids
                .iter()
                .zip(&sums)
                .map(|(old, new)| squared_distance_f64(old, new))
                .sum();

            centroids = sums;
            if shift < self.tol {
                break;
            }
        }

        Ok(labels)
    }

    pub fn n_clusters(&self) -> usize {
        self.k
    }

    /// k-means++: the first centroid is uniform, each later one is drawn
    /// with probability proportional to its squared distance from the
    /// nearest centroid chosen so far.
    fn init_centroids(&self, data: &[Vec<f32>], rng: &mut StdRng) -> Vec<Vec<f64>> {
        let n = data.len();
        let mut centroids = Vec::with_capacity(self.k);
        centroids.push(to_f64(&data[rng.random_range(0..n)]));

        let mut distances: Vec<f64> = data
            .iter()
            .map(|p| squared_distance(p, &centroids[0]))
            .collect();

        while centroids.len() < self.k {
            let total: f64 = distances.iter().sum();
            let selected = if total <= 0.0 {
                rng.random_range(0..n)
            } else {
                let threshold = rng.random::<f64>() * total;
                let mut cumsum = 0.0;
                let mut selected = n - 1;
                for (j, &d) in distances.iter().enumerate() {
                    cumsum += d;
                    if cumsum >= threshold {
                        selected = j;
                        break;
                    }
                }
                selected
            };

            let centroid = to_f64(&data[selected]);
            for (d, point) in distances.iter_mut().zip(data) {
                *d = d.min(squared_distance(point, &centroid));
            }
            centroids.push(centroid);
        }

        centroids
    }
}

fn nearest_centroid(point: &[f32], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (k, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = k;
        }
    }
    best
}

fn squared_distance(point: &[f32], centroid: &[f64]) -> f64 {
    point
        .iter()
        .zip(centroid)
        .map(|(x, c)| (*x as f64 - c).powi(2))
        .sum()
}

fn squared_distance_f64(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn to_f64(point: &[f32]) -> Vec<f64> {
    point.iter().map(|&x| x as f64).collect()
}
