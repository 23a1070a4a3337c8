pub mod boosted;
pub mod ensemble;
pub mod forest;
pub mod linear;

pub use boosted::BoostedModel;
pub use ensemble::WeightedEnsemble;
pub use forest::ForestModel;
pub use linear::LinearModel;

use anyhow::{Context, Result};
use std::path::Path;

/// Logistic function shared by the linear and boosted links and by the
/// decision-score output tier.
pub fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

/// What a classifier reports for one feature vector. Which variant a model
/// produces is fixed by its kind when the artifact is loaded, not probed
/// per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelOutput {
    /// Two-class probabilities, away at index 0, home at index 1.
    Probabilities([f64; 2]),
    /// Raw decision score on the log-odds scale.
    DecisionScore(f64),
    /// Scalar regression output; a probability only if already in [0, 1].
    RawPrediction(f64),
}

/// Closed set of classifier kinds the repository can serve.
#[derive(Debug, Clone)]
pub enum Classifier {
    Linear(LinearModel),
    Forest(ForestModel),
    Boosted(BoostedModel),
    Ensemble(WeightedEnsemble),
}

impl Classifier {
    /// Two-class probabilities, regardless of the model's preferred output
    /// operation. This is the operation ensemble members must expose.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        match self {
            Classifier::Linear(m) => m.predict_proba(features),
            Classifier::Forest(m) => m.predict_proba(features),
            Classifier::Boosted(m) => m.predict_proba(features),
            Classifier::Ensemble(m) => m.predict_proba(features),
        }
    }

    /// Evaluate through the model's preferred output operation. The boosted
    /// model reports its raw additive margin; everything else reports class
    /// probabilities directly.
    pub fn evaluate(&self, features: &[f64]) -> Result<ModelOutput> {
        match self {
            Classifier::Boosted(m) => Ok(ModelOutput::DecisionScore(m.decision_score(features)?)),
            other => Ok(ModelOutput::Probabilities(other.predict_proba(features)?)),
        }
    }
}

/// Loaded artifacts: the feature manifest plus the named models served by
/// the prediction endpoints, ensemble last.
#[derive(Debug)]
pub struct ModelRepository {
    pub manifest: Vec<String>,
    pub models: Vec<(String, Classifier)>,
}

impl ModelRepository {
    /// Read the three classifier artifacts and the feature manifest from
    /// `dir` and assemble the fixed-weight ensemble.
    pub fn load(dir: &Path, ensemble_weights: [f64; 3]) -> Result<Self> {
        let manifest: Vec<String> = read_artifact(&dir.join("feature_manifest.json"))?;
        let linear: LinearModel = read_artifact(&dir.join("linear.json"))?;
        let forest: ForestModel = read_artifact(&dir.join("forest.json"))?;
        let boosted: BoostedModel = read_artifact(&dir.join("boosted.json"))?;

        Ok(Self::assemble(manifest, linear, forest, boosted, ensemble_weights))
    }

    /// Build the served model list from already-deserialized members.
    pub fn assemble(
        manifest: Vec<String>,
        linear: LinearModel,
        forest: ForestModel,
        boosted: BoostedModel,
        ensemble_weights: [f64; 3],
    ) -> Self {
        let ensemble = WeightedEnsemble::new(vec![
            (Classifier::Linear(linear.clone()), ensemble_weights[0]),
            (Classifier::Forest(forest.clone()), ensemble_weights[1]),
            (Classifier::Boosted(boosted.clone()), ensemble_weights[2]),
        ]);

        Self {
            manifest,
            models: vec![
                ("logistic".to_string(), Classifier::Linear(linear)),
                ("forest".to_string(), Classifier::Forest(forest)),
                ("boosted".to_string(), Classifier::Boosted(boosted)),
                ("ensemble".to_string(), Classifier::Ensemble(ensemble)),
            ],
        }
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model artifact: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse model artifact: {}", path.display()))
}
