use super::sigmoid;
use anyhow::{bail, ensure, Result};
use serde::Deserialize;

/// Gradient-boosted classifier: regression trees whose scalar leaf margins
/// sum with a base score on the log-odds scale; the logistic link maps the
/// margin to a probability. The artifact is the JSON form of this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct BoostedModel {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<MarginTree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarginTree {
    pub nodes: Vec<MarginNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MarginNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl MarginTree {
    fn leaf_margin(&self, features: &[f64]) -> Result<f64> {
        let mut idx = 0usize;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(MarginNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let Some(x) = features.get(*feature) else {
                        bail!(
                            "tree splits on feature {} but vector has {} values",
                            feature,
                            features.len()
                        );
                    };
                    idx = if *x <= *threshold { *left } else { *right };
                }
                Some(MarginNode::Leaf { value }) => return Ok(*value),
                None => bail!("tree node index {} out of bounds", idx),
            }
        }
        bail!("tree traversal did not terminate (cyclic node links)")
    }
}

impl BoostedModel {
    /// Raw additive margin (log-odds scale).
    pub fn decision_score(&self, features: &[f64]) -> Result<f64> {
        ensure!(!self.trees.is_empty(), "boosted artifact contains no trees");
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.leaf_margin(features)?;
        }
        Ok(margin)
    }

    /// Two-class probabilities via the logistic link, home win at index 1.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        let p = sigmoid(self.decision_score(features)?);
        Ok([1.0 - p, p])
    }
}
