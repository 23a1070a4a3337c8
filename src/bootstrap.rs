use crate::config::ProviderConfig;
use crate::features::{merge_rosters, TeamTable};
use crate::provider::types::PlayerStatRow;
use crate::provider::StatsProvider;
use anyhow::{Context, Result};
use tracing::info;

/// Build the aggregated team table from the freshest stats the provider
/// has: current-season weekly rows when available, previous-season
/// seasonal rows otherwise. Rosters for the chosen season attach team
/// codes before aggregation. Both stat sources failing is fatal.
pub async fn load_team_table(
    provider: &dyn StatsProvider,
    config: &ProviderConfig,
    manifest: &[String],
) -> Result<TeamTable> {
    let (mut rows, season) = match provider.weekly_stats(config.current_season).await {
        Ok(rows) if !rows.is_empty() => {
            info!(
                "using {} weekly stat rows for season {}",
                rows.len(),
                config.current_season
            );
            (rows, config.current_season)
        }
        Ok(_) => {
            info!(
                "no weekly data for season {}; falling back to season {} seasonal stats",
                config.current_season, config.fallback_season
            );
            (seasonal_rows(provider, config).await?, config.fallback_season)
        }
        Err(err) => {
            info!(
                "weekly stats unavailable for season {} ({:#}); falling back to season {} seasonal stats",
                config.current_season, err, config.fallback_season
            );
            (seasonal_rows(provider, config).await?, config.fallback_season)
        }
    };

    let rosters = provider
        .rosters(season)
        .await
        .with_context(|| format!("failed to fetch rosters for season {}", season))?;
    merge_rosters(&mut rows, &rosters);

    let table = TeamTable::aggregate(&rows, manifest);
    info!(
        "aggregated stats for {} teams over {} feature columns",
        table.len(),
        manifest.len()
    );
    Ok(table)
}

async fn seasonal_rows(
    provider: &dyn StatsProvider,
    config: &ProviderConfig,
) -> Result<Vec<PlayerStatRow>> {
    provider
        .seasonal_stats(config.fallback_season)
        .await
        .with_context(|| {
            format!(
                "failed to fetch seasonal stats for season {}",
                config.fallback_season
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::{RosterEntry, ScheduledGame};
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;

    struct FakeProvider {
        weekly: Result<Vec<PlayerStatRow>, String>,
        seasonal: Result<Vec<PlayerStatRow>, String>,
    }

    #[async_trait]
    impl StatsProvider for FakeProvider {
        async fn weekly_stats(&self, _season: u16) -> Result<Vec<PlayerStatRow>> {
            match &self.weekly {
                Ok(rows) => Ok(rows.clone()),
                Err(msg) => bail!("{msg}"),
            }
        }

        async fn seasonal_stats(&self, _season: u16) -> Result<Vec<PlayerStatRow>> {
            match &self.seasonal {
                Ok(rows) => Ok(rows.clone()),
                Err(msg) => bail!("{msg}"),
            }
        }

        async fn rosters(&self, season: u16) -> Result<Vec<RosterEntry>> {
            Ok(vec![RosterEntry {
                player_id: "p1".to_string(),
                season,
                team: "KC".to_string(),
            }])
        }

        async fn schedules(&self, _season: u16) -> Result<Vec<ScheduledGame>> {
            Ok(Vec::new())
        }
    }

    fn row(season: u16) -> PlayerStatRow {
        PlayerStatRow {
            player_id: "p1".to_string(),
            season,
            team: None,
            columns: [("passing_yards".to_string(), json!(100.0))]
                .into_iter()
                .collect(),
        }
    }

    fn config() -> ProviderConfig {
        ProviderConfig {
            base_url: "http://localhost".to_string(),
            request_timeout_ms: 1000,
            current_season: 2025,
            fallback_season: 2024,
        }
    }

    #[tokio::test]
    async fn test_weekly_data_preferred() {
        let provider = FakeProvider {
            weekly: Ok(vec![row(2025)]),
            seasonal: Err("should not be called".to_string()),
        };
        let table = load_team_table(&provider, &config(), &["passing_yards".to_string()])
            .await
            .unwrap();
        assert!(table.contains("KC"));
    }

    #[tokio::test]
    async fn test_empty_weekly_falls_back_to_seasonal() {
        let provider = FakeProvider {
            weekly: Ok(Vec::new()),
            seasonal: Ok(vec![row(2024)]),
        };
        let table = load_team_table(&provider, &config(), &["passing_yards".to_string()])
            .await
            .unwrap();
        assert_eq!(table.features("KC"), Some(&[100.0][..]));
    }

    #[tokio::test]
    async fn test_weekly_error_falls_back_to_seasonal() {
        let provider = FakeProvider {
            weekly: Err("upstream 503".to_string()),
            seasonal: Ok(vec![row(2024)]),
        };
        let table = load_team_table(&provider, &config(), &["passing_yards".to_string()])
            .await
            .unwrap();
        assert!(table.contains("KC"));
    }

    #[tokio::test]
    async fn test_both_sources_failing_is_fatal() {
        let provider = FakeProvider {
            weekly: Err("upstream 503".to_string()),
            seasonal: Err("upstream 503".to_string()),
        };
        let err = load_team_table(&provider, &config(), &["passing_yards".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("seasonal stats"), "got {err:#}");
    }
}
