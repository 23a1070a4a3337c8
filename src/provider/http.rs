use super::types::{PlayerStatRow, RosterEntry, ScheduledGame};
use super::StatsProvider;
use crate::config::ProviderConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP implementation of [`StatsProvider`] against a host serving JSON
/// arrays of stat, roster, and schedule rows.
pub struct HttpStatsProvider {
    client: Client,
    base_url: String,
}

impl HttpStatsProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build stats provider HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("stats provider request failed: {}", url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("stats provider {} ({}): {}", path, status, body);
        }

        resp.json()
            .await
            .with_context(|| format!("failed to parse stats provider response: {}", url))
    }
}

#[async_trait]
impl StatsProvider for HttpStatsProvider {
    async fn weekly_stats(&self, season: u16) -> Result<Vec<PlayerStatRow>> {
        self.fetch(&format!("stats/weekly/{}", season)).await
    }

    async fn seasonal_stats(&self, season: u16) -> Result<Vec<PlayerStatRow>> {
        self.fetch(&format!("stats/seasonal/{}", season)).await
    }

    async fn rosters(&self, season: u16) -> Result<Vec<RosterEntry>> {
        self.fetch(&format!("rosters/{}", season)).await
    }

    async fn schedules(&self, season: u16) -> Result<Vec<ScheduledGame>> {
        self.fetch(&format!("schedules/{}", season)).await
    }
}
