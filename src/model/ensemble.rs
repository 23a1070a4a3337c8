use super::Classifier;
use anyhow::{ensure, Result};

/// Fixed-weight blend of member classifiers. Weights are non-negative and
/// need not sum to 1; the output is renormalized by their total.
#[derive(Debug, Clone)]
pub struct WeightedEnsemble {
    members: Vec<(Classifier, f64)>,
}

impl WeightedEnsemble {
    pub fn new(members: Vec<(Classifier, f64)>) -> Self {
        Self { members }
    }

    /// `Σ(wᵢ × memberᵢ.predict_proba) / Σ(wᵢ)`. A member failure
    /// propagates out; the caller's neutral fallback handles it.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        ensure!(!self.members.is_empty(), "ensemble has no members");
        let total: f64 = self.members.iter().map(|(_, w)| w).sum();
        ensure!(total > 0.0, "ensemble weights sum to zero");

        let mut acc = [0.0f64; 2];
        for (member, weight) in &self.members {
            let proba = member.predict_proba(features)?;
            acc[0] += weight * proba[0];
            acc[1] += weight * proba[1];
        }
        Ok([acc[0] / total, acc[1] / total])
    }
}
