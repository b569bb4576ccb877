use serde::{Deserialize, Serialize};

/// Out-of-sample fit quality on the evaluation subset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub rows: usize,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl EvaluationReport {
    /// Returns `None` when there is nothing to score.
    pub fn score(predictions: &[f64], actuals: &[f64]) -> Option<Self> {
        let n = predictions.len().min(actuals.len());
        if n == 0 {
            return None;
        }

        let pairs = || predictions.iter().zip(actuals.iter());
        let sq_err: f64 = pairs().map(|(p, t)| (p - t).powi(2)).sum();
        let abs_err: f64 = pairs().map(|(p, t)| (p - t).abs()).sum();
        let mse = sq_err / n as f64;

        let mean_y = actuals[..n].iter().sum::<f64>() / n as f64;
        let var_y = actuals[..n]
            .iter()
            .map(|t| (t - mean_y).powi(2))
            .sum::<f64>()
            / n as f64;
        let r2 = if var_y > 0.0 { 1.0 - mse / var_y } else { 0.0 };

        Some(Self {
            rows: n,
            rmse: mse.sqrt(),
            mae: abs_err / n as f64,
            r2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let report = EvaluationReport::score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.mae, 0.0);
        assert!((report.r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_error_metrics() {
        let report = EvaluationReport::score(&[2.0, 2.0], &[1.0, 3.0]).unwrap();
        assert!((report.rmse - 1.0).abs() < 1e-12);
        assert!((report.mae - 1.0).abs() < 1e-12);
        assert!(report.r2.abs() < 1e-12);
    }

    #[test]
    fn test_empty_has_no_report() {
        assert!(EvaluationReport::score(&[], &[]).is_none());
    }
}
