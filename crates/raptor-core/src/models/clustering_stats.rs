use serde::{Deserialize, Serialize};

/// Quality scores recorded for every split performed during a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringStats {
    pub silhouette_scores: Vec<f64>,
    pub dbi_scores: Vec<f64>,
    pub selected_k_values: Vec<usize>,
    pub avg_silhouette: f64,
    pub avg_dbi: f64,
    pub avg_k: f64,
}

impl ClusteringStats {
    pub fn record(&mut self, silhouette: f64, dbi: f64, k: usize) {
        self.silhouette_scores.push(silhouette);
        self.dbi_scores.push(dbi);
        self.selected_k_values.push(k);
        self.avg_silhouette = mean(&self.silhouette_scores);
        self.avg_dbi = mean(&self.dbi_scores);
        self.avg_k = self.selected_k_values.iter().sum::<usize>() as f64
            / self.selected_k_values.len() as f64;
    }

    pub fn split_count(&self) -> usize {
        self.selected_k_values.len()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
