//! Internal cluster-quality metrics over Euclidean distance.
//!
//! Both metrics expect compact labels (`0..k` with every label used) and
//! return `None` when they are undefined for the labelling: fewer than two
//! clusters, every point in its own cluster, or a non-finite result.

use rayon::prelude::*;

/// Mean silhouette coefficient in `[-1, 1]`; higher is better.
///
/// For point i with mean intra-cluster distance `a` and smallest mean
/// distance to another cluster `b`, `s = (b - a) / max(a, b)`. Points in
/// singleton clusters score 0.
pub fn silhouette_score(data: &[Vec<f32>], labels: &[usize]) -> Option<f64> {
    let k = cluster_count(data, labels)?;
    let mut sizes = vec![0usize; k];
    for &l in labels {
        sizes[l] += 1;
    }

    let scores: Vec<f64> = (0..data.len())
        .into_par_iter()
        .map(|i| {
            let own = labels[i];
            if sizes[own] <= 1 {
                return 0.0;
            }
            let mut sums = vec![0.0f64; k];
            for (j, point) in data.iter().enumerate() {
                if i != j {
                    sums[labels[j]] += euclidean(&data[i], point);
                }
            }
            let a = sums[own] / (sizes[own] - 1) as f64;
            let b = (0..k)
                .filter(|&c| c != own && sizes[c] > 0)
                .map(|c| sums[c] / sizes[c] as f64)
                .fold(f64::INFINITY, f64::min);
            let denom = a.max(b);
            if denom > 0.0 {
                (b - a) / denom
            } else {
                0.0
            }
        })
        .collect();

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    mean.is_finite().then_some(mean)
}

/// Davies–Bouldin index in `[0, inf)`; lower is better.
///
/// Scatter `S_i` is the mean distance of cluster i's points to its
/// centroid; `R_ij = (S_i + S_j) / M_ij` with `M_ij` the centroid
/// distance. Coincident centroids contribute 0. The index is the mean over
/// clusters of the worst `R_ij`.
pub fn davies_bouldin_index(data: &[Vec<f32>], labels: &[usize]) -> Option<f64> {
    let k = cluster_count(data, labels)?;
    let dims = data[0].len();

    let mut centroids = vec![vec![0.0f64; dims]; k];
    let mut sizes = vec![0usize; k];
    for (point, &l) in data.iter().zip(labels) {
        for (c, x) in centroids[l].iter_mut().zip(point) {
            *c += *x as f64;
        }
        sizes[l] += 1;
    }
    for (centroid, &size) in centroids.iter_mut().zip(&sizes) {
        for c in centroid.iter_mut() {
            *c /= size as f64;
        }
    }

    let mut scatter = vec![0.0f64; k];
    for (point, &l) in data.iter().zip(labels) {
        scatter[l] += distance_to_centroid(point, &centroids[l]);
    }
    for (s, &size) in scatter.iter_mut().zip(&sizes) {
        *s /= size as f64;
    }

    let mut total = 0.0;
    for i in 0..k {
        let worst = (0..k)
            .filter(|&j| j != i)
            .map(|j| {
                let m = centroid_distance(&centroids[i], &centroids[j]);
                if m > 0.0 {
                    (scatter[i] + scatter[j]) / m
                } else {
                    0.0
                }
            })
            .fold(0.0f64, f64::max);
        total += worst;
    }

    let index = total / k as f64;
    index.is_finite().then_some(index)
}

/// Number of clusters, or `None` when the metrics are undefined.
fn cluster_count(data: &[Vec<f32>], labels: &[usize]) -> Option<usize> {
    if data.len() != labels.len() || data.is_empty() {
        return None;
    }
    let k = labels.iter().max().map(|&m| m + 1)?;
    let mut used = vec![false; k];
    for &l in labels {
        used[l] = true;
    }
    let distinct = used.iter().filter(|&&u| u).count();
    if distinct != k || distinct < 2 || distinct >= data.len() {
        return None;
    }
    Some(k)
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (*x as f64 - *y as f64).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn distance_to_centroid(point: &[f32], centroid: &[f64]) -> f64 {
    point
        .iter()
        .zip(centroid)
        .map(|(x, c)| (*x as f64 - c).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn centroid_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> (Vec<Vec<f32>>, Vec<usize>) {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
            vec![11.0, 10.0],
        ];
        (data, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn well_separated_clusters_score_well() {
        let (data, labels) = two_blobs();
        let s = silhouette_score(&data, &labels).unwrap();
        let d = davies_bouldin_index(&data, &labels).unwrap();
        assert!(s > 0.8, "silhouette {s}");
        assert!(d < 0.2, "dbi {d}");
    }

    #[test]
    fn bad_labelling_scores_worse() {
        let (data, good) = two_blobs();
        let bad = vec![0, 1, 0, 1, 0, 1];
        assert!(silhouette_score(&data, &bad).unwrap() < silhouette_score(&data, &good).unwrap());
        assert!(
            davies_bouldin_index(&data, &bad).unwrap()
                > davies_bouldin_index(&data, &good).unwrap()
        );
    }

    #[test]
    fn single_cluster_is_undefined() {
        let (data, _) = two_blobs();
        assert!(silhouette_score(&data, &[0; 6]).is_none());
        assert!(davies_bouldin_index(&data, &[0; 6]).is_none());
    }

    #[test]
    fn all_singletons_is_undefined() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert!(silhouette_score(&data, &[0, 1, 2]).is_none());
    }

    #[test]
    fn silhouette_stays_in_range() {
        let data: Vec<Vec<f32>> = (0..20).map(|i| vec![(i * 7 % 5) as f32, i as f32]).collect();
        let labels: Vec<usize> = (0..20).map(|i| i % 3).collect();
        let s = silhouette_score(&data, &labels).unwrap();
        assert!((-1.0..=1.0).contains(&s));
    }

    #[test]
    fn coincident_centroids_do_not_produce_infinity() {
        let data = vec![vec![0.0], vec![2.0], vec![0.0], vec![2.0]];
        let labels = vec![0, 0, 1, 1];
        assert_eq!(davies_bouldin_index(&data, &labels), Some(0.0));
    }
}
