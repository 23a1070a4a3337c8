use crate::features::TeamTable;
use crate::model::{sigmoid, Classifier, ModelOutput};
use std::fmt;
use tracing::warn;

/// Why a matchup could not be predicted at all. Model evaluation failures
/// are not in here: they are recovered to a neutral split instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    UnknownTeam(String),
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::UnknownTeam(team) => write!(f, "unknown team code: {}", team),
        }
    }
}

impl std::error::Error for PredictError {}

/// One model's verdict on a matchup. `recovered` marks the neutral split
/// substituted after a model evaluation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupPrediction {
    pub winner: String,
    pub home_prob: f64,
    pub away_prob: f64,
    pub recovered: bool,
}

/// Convert a model output into a (home, away) probability pair.
///
/// Probability outputs are read as reported by the model, home at index 1
/// and away at index 0; every artifact format served here emits
/// complementary classes, so the pair sums to 1. Score outputs squash
/// through the logistic and derive away as the complement. A raw scalar is
/// trusted as a probability only when it already lies in [0, 1].
pub fn probability_pair(output: ModelOutput) -> (f64, f64) {
    match output {
        ModelOutput::Probabilities([away, home]) => (home, away),
        ModelOutput::DecisionScore(score) => {
            let p = sigmoid(score);
            (p, 1.0 - p)
        }
        ModelOutput::RawPrediction(value) => {
            let p = if (0.0..=1.0).contains(&value) {
                value
            } else {
                sigmoid(value)
            };
            (p, 1.0 - p)
        }
    }
}

/// Predict a matchup with one model: home-minus-away feature difference in
/// manifest order, model evaluation, output conversion. Unknown teams are
/// an error; a model evaluation failure degrades to a 0.5/0.5 split with a
/// warning so the request can still be answered.
pub fn predict_matchup(
    name: &str,
    model: &Classifier,
    table: &TeamTable,
    home: &str,
    away: &str,
) -> Result<MatchupPrediction, PredictError> {
    if !table.contains(home) {
        return Err(PredictError::UnknownTeam(home.to_string()));
    }
    let Some(diff) = table.diff(home, away) else {
        return Err(PredictError::UnknownTeam(away.to_string()));
    };

    let (home_prob, away_prob, recovered) = match model.evaluate(&diff) {
        Ok(output) => {
            let (h, a) = probability_pair(output);
            (h, a, false)
        }
        Err(err) => {
            warn!(
                "model {} failed on {} vs {}: {:#}; substituting neutral split",
                name, home, away, err
            );
            (0.5, 0.5, true)
        }
    };

    // Home wins ties.
    let winner = if home_prob >= away_prob { home } else { away };
    Ok(MatchupPrediction {
        winner: winner.to_string(),
        home_prob,
        away_prob,
        recovered,
    })
}
