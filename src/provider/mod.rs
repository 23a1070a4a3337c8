pub mod http;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::{PlayerStatRow, RosterEntry, ScheduledGame};

/// Seam over the external sports-statistics source. The service treats the
/// provider as a black-box tabular source: rows in, no control over its
/// availability or schema stability.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Per-player stat lines for the given season's completed weeks.
    async fn weekly_stats(&self, season: u16) -> Result<Vec<PlayerStatRow>>;

    /// Per-player full-season stat lines.
    async fn seasonal_stats(&self, season: u16) -> Result<Vec<PlayerStatRow>>;

    /// Player-to-team assignments for the given season.
    async fn rosters(&self, season: u16) -> Result<Vec<RosterEntry>>;

    /// The season's schedule, including games not yet played.
    async fn schedules(&self, season: u16) -> Result<Vec<ScheduledGame>>;
}
