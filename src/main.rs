use anyhow::{Context, Result};
use gridiron_predict::bootstrap;
use gridiron_predict::config::Config;
use gridiron_predict::model::ModelRepository;
use gridiron_predict::provider::http::HttpStatsProvider;
use gridiron_predict::server::{self, AppContext};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridiron_predict=info".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(Path::new(&config_path))?;

    let repository = ModelRepository::load(&config.models.dir, config.models.ensemble_weights)
        .context("failed to load model artifacts")?;
    info!(
        "loaded {} models and a {}-column feature manifest from {}",
        repository.models.len(),
        repository.manifest.len(),
        config.models.dir.display()
    );

    let provider = HttpStatsProvider::new(&config.provider)?;
    let table = bootstrap::load_team_table(&provider, &config.provider, &repository.manifest).await?;

    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.server.bind_addr))?;

    let ctx = Arc::new(AppContext {
        table,
        repository,
        provider: Box::new(provider),
        current_season: config.provider.current_season,
    });

    info!("listening on {}", addr);
    warp::serve(server::routes(ctx)).run(addr).await;
    Ok(())
}
