use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Per-feature standardization to zero mean and unit variance.
///
/// Uses the population standard deviation. A column with zero spread keeps a
/// scale of 1 so it is only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut means = Vec::with_capacity(n_features);
        let mut scales = Vec::with_capacity(n_features);

        for j in 0..n_features {
            let column: Vec<f64> = rows.iter().map(|r| r[j]).collect();
            let mean = column.iter().mean();
            let std = column.iter().population_std_dev();

            means.push(mean);
            scales.push(if std.is_finite() && std > 0.0 { std } else { 1.0 });
        }

        Self { means, scales }
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_standardizes_columns() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform(&rows);

        for j in 0..2 {
            let col: Vec<f64> = scaled.iter().map(|r| r[j]).collect();
            let mean: f64 = col.iter().sum::<f64>() / col.len() as f64;
            let var: f64 = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_is_only_centered() {
        let rows = vec![vec![5.0], vec![5.0], vec![5.0]];
        let scaler = StandardScaler::fit(&rows);
        assert_eq!(scaler.scales, vec![1.0]);
        assert_eq!(scaler.transform_row(&[7.0]), vec![2.0]);
    }

    #[test]
    fn test_transform_uses_fitted_parameters() {
        let train = vec![vec![0.0], vec![2.0]];
        let scaler = StandardScaler::fit(&train);
        // mean 1, population std 1
        assert_eq!(scaler.transform_row(&[3.0]), vec![2.0]);
    }
}
