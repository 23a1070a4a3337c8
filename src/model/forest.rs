use anyhow::{bail, ensure, Result};
use serde::Deserialize;

/// Tree-ensemble classifier: each tree votes a two-class distribution and
/// the forest averages the votes. The artifact is the JSON form of this
/// struct.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<DecisionTree>,
}

/// Flat node list; index 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Normalized two-class distribution at this leaf.
        value: [f64; 2],
    },
}

impl DecisionTree {
    fn leaf_value(&self, features: &[f64]) -> Result<[f64; 2]> {
        let mut idx = 0usize;
        // A well-formed tree reaches a leaf in at most `nodes.len()` hops.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Split {
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
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                None => bail!("tree node index {} out of bounds", idx),
            }
        }
        bail!("tree traversal did not terminate (cyclic node links)")
    }
}

impl ForestModel {
    /// Two-class probabilities: the mean of per-tree leaf distributions.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        ensure!(!self.trees.is_empty(), "forest artifact contains no trees");
        let mut acc = [0.0f64; 2];
        for tree in &self.trees {
            let value = tree.leaf_value(features)?;
            acc[0] += value[0];
            acc[1] += value[1];
        }
        let n = self.trees.len() as f64;
        Ok([acc[0] / n, acc[1] / n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn leaf(away: f64, home: f64) -> TreeNode {
        TreeNode::Leaf {
            value: [away, home],
        }
    }

    /// Root splits on feature 0 at 0.0: negative diff -> mostly away,
    /// positive diff -> second split on feature 1.
    fn model() -> ForestModel {
        ForestModel {
            trees: vec![
                DecisionTree {
                    nodes: vec![
                        split(0, 0.0, 1, 2),
                        leaf(0.8, 0.2),
                        split(1, 10.0, 3, 4),
                        leaf(0.4, 0.6),
                        leaf(0.1, 0.9),
                    ],
                },
                DecisionTree {
                    nodes: vec![split(0, 0.0, 1, 2), leaf(0.7, 0.3), leaf(0.2, 0.8)],
                },
            ],
        }
    }

    #[test]
    fn test_forest_averages_tree_votes() {
        // Feature 0 positive, feature 1 above 10 -> leaves (0.1,0.9) and (0.2,0.8).
        let [away, home] = model().predict_proba(&[5.0, 25.0]).unwrap();
        assert!((home - 0.85).abs() < 1e-12, "got {home}");
        assert!((away - 0.15).abs() < 1e-12, "got {away}");
    }

    #[test]
    fn test_forest_negative_diff_favours_away() {
        let [away, home] = model().predict_proba(&[-3.0, 0.0]).unwrap();
        assert!((away - 0.75).abs() < 1e-12, "got {away}");
        assert!(home < 0.5);
    }

    #[test]
    fn test_proba_complementary() {
        let [away, home] = model().predict_proba(&[1.0, 1.0]).unwrap();
        assert!((away + home - 1.0).abs() < 1e-12, "got {away} + {home}");
    }

    #[test]
    fn test_split_beyond_vector_is_an_error() {
        let err = model().predict_proba(&[5.0]).unwrap_err();
        assert!(err.to_string().contains("feature 1"), "got {err}");
    }

    #[test]
    fn test_cyclic_tree_is_an_error() {
        let broken = ForestModel {
            trees: vec![DecisionTree {
                nodes: vec![split(0, 0.0, 0, 0)],
            }],
        };
        assert!(broken.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_artifact_roundtrip() {
        let raw = r#"{
            "trees": [
                { "nodes": [
                    { "feature": 0, "threshold": 0.0, "left": 1, "right": 2 },
                    { "value": [0.9, 0.1] },
                    { "value": [0.3, 0.7] }
                ]}
            ]
        }"#;
        let forest: ForestModel = serde_json::from_str(raw).unwrap();
        let [_, home] = forest.predict_proba(&[1.0]).unwrap();
        assert!((home - 0.7).abs() < 1e-12, "got {home}");
    }
}
