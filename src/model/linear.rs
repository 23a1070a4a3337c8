use super::sigmoid;
use anyhow::{ensure, Result};
use serde::Deserialize;

/// Logistic-regression classifier: one coefficient per manifest column
/// plus an intercept, fit at training time. The artifact is the JSON form
/// of this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Signed distance from the decision boundary (log-odds scale).
    pub fn decision_score(&self, features: &[f64]) -> Result<f64> {
        ensure!(
            features.len() == self.coefficients.len(),
            "feature vector has {} values, linear model expects {}",
            features.len(),
            self.coefficients.len()
        );
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }

    /// Two-class probabilities, home win at index 1.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        let p = sigmoid(self.decision_score(features)?);
        Ok([1.0 - p, p])
    }
}
