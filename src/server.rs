use crate::features::TeamTable;
use crate::model::ModelRepository;
use crate::predict::{predict_matchup, PredictError};
use crate::provider::types::ScheduledGame;
use crate::provider::StatsProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;
use warp::http::StatusCode;
use warp::Filter;

/// Read-only state shared by every request handler, built once at startup.
pub struct AppContext {
    pub table: TeamTable,
    pub repository: ModelRepository,
    pub provider: Box<dyn StatsProvider>,
    pub current_season: u16,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub home: String,
    pub away: String,
}

#[derive(Debug, Serialize)]
pub struct ProbabilityPair {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub home_team: String,
    pub away_team: String,
    pub predictions: BTreeMap<String, String>,
    pub probabilities: BTreeMap<String, ProbabilityPair>,
}

/// One game of the latest completed week, with every model's verdict and
/// whether it matched the actual result.
#[derive(Debug, Serialize)]
pub struct GameReport {
    pub home: String,
    pub away: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub true_winner: Option<String>,
    pub predictions: BTreeMap<String, String>,
    pub probabilities: BTreeMap<String, ProbabilityPair>,
    pub correct: BTreeMap<String, Option<bool>>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: message.into(),
        }),
        status,
    )
}

async fn handle_predict(
    req: PredictRequest,
    ctx: Arc<AppContext>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    debug!("predict request: home={} away={}", req.home, req.away);

    let mut predictions = BTreeMap::new();
    let mut probabilities = BTreeMap::new();

    for (name, model) in &ctx.repository.models {
        match predict_matchup(name, model, &ctx.table, &req.home, &req.away) {
            Ok(p) => {
                predictions.insert(name.clone(), p.winner);
                probabilities.insert(
                    name.clone(),
                    ProbabilityPair {
                        home: p.home_prob,
                        away: p.away_prob,
                    },
                );
            }
            // One 400 for the whole request, no partial results.
            Err(PredictError::UnknownTeam(_)) => {
                return Ok(error_reply(StatusCode::BAD_REQUEST, "Invalid team code"));
            }
        }
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&PredictResponse {
            home_team: req.home,
            away_team: req.away,
            predictions,
            probabilities,
        }),
        StatusCode::OK,
    ))
}

async fn handle_teams(ctx: Arc<AppContext>) -> Result<warp::reply::Json, Infallible> {
    Ok(warp::reply::json(&ctx.table.teams()))
}

async fn handle_games(
    ctx: Arc<AppContext>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let schedule = match ctx.provider.schedules(ctx.current_season).await {
        Ok(schedule) => schedule,
        Err(err) => {
            return Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{err:#}"),
            ));
        }
    };

    let regular: Vec<ScheduledGame> = schedule
        .into_iter()
        .filter(|g| g.game_type == "REG")
        .collect();

    let latest_completed_week = regular
        .iter()
        .filter(|g| g.is_completed())
        .map(|g| g.week)
        .max();
    let Some(week) = latest_completed_week else {
        return Ok(error_reply(
            StatusCode::NOT_FOUND,
            "No completed games available",
        ));
    };

    let reports: Vec<GameReport> = regular
        .iter()
        .filter(|g| g.week == week)
        .map(|g| game_report(&ctx, g))
        .collect();

    Ok(warp::reply::with_status(
        warp::reply::json(&reports),
        StatusCode::OK,
    ))
}

fn game_report(ctx: &AppContext, game: &ScheduledGame) -> GameReport {
    let true_winner = game.true_winner().map(str::to_string);

    let mut predictions = BTreeMap::new();
    let mut probabilities = BTreeMap::new();
    let mut correct = BTreeMap::new();

    for (name, model) in &ctx.repository.models {
        // A team missing from the aggregated table leaves this model's
        // entries absent rather than failing the whole report.
        let Ok(p) = predict_matchup(name, model, &ctx.table, &game.home_team, &game.away_team)
        else {
            continue;
        };
        correct.insert(
            name.clone(),
            true_winner.as_deref().map(|winner| p.winner == winner),
        );
        probabilities.insert(
            name.clone(),
            ProbabilityPair {
                home: p.home_prob,
                away: p.away_prob,
            },
        );
        predictions.insert(name.clone(), p.winner);
    }

    GameReport {
        home: game.home_team.clone(),
        away: game.away_team.clone(),
        home_score: game.home_score.map(|s| s as u32),
        away_score: game.away_score.map(|s| s as u32),
        true_winner,
        predictions,
        probabilities,
        correct,
    }
}

async fn handle_refresh() -> Result<warp::reply::Json, Infallible> {
    Ok(warp::reply::json(&serde_json::json!({
        "message": "Not implemented in this version."
    })))
}

/// Assemble the endpoint filters with a permissive CORS wrapper (the API
/// backs a browser frontend).
pub fn routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let with_ctx = warp::any().map(move || ctx.clone());

    let predict = warp::path("predict")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_ctx.clone())
        .and_then(handle_predict);

    let teams = warp::path("teams")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_ctx.clone())
        .and_then(handle_teams);

    let games = warp::path("games")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_ctx.clone())
        .and_then(handle_games);

    let refresh = warp::path("refresh")
        .and(warp::path::end())
        .and(warp::post())
        .and_then(handle_refresh);

    let health = warp::path("health").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    predict
        .or(teams)
        .or(games)
        .or(refresh)
        .or(health)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "OPTIONS"]),
        )
}
