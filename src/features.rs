use crate::provider::types::{PlayerStatRow, RosterEntry};
use std::collections::{BTreeMap, HashMap};

/// Aggregated per-team feature vectors, one value per manifest column, in
/// manifest order. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct TeamTable {
    columns: Vec<String>,
    rows: BTreeMap<String, Vec<f64>>,
}

impl TeamTable {
    /// Sum each manifest column over every row tagged with a team.
    ///
    /// Columns the source rows never carry stay zero. Rows without a team
    /// assignment are dropped entirely, so a team with no mapped players
    /// is unknown to downstream lookups rather than zero-filled.
    pub fn aggregate(rows: &[PlayerStatRow], manifest: &[String]) -> Self {
        let mut table: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in rows {
            let Some(team) = row.team.as_deref() else {
                continue;
            };
            let values = table
                .entry(team.to_string())
                .or_insert_with(|| vec![0.0; manifest.len()]);
            for (slot, column) in values.iter_mut().zip(manifest) {
                *slot += row.stat(column).unwrap_or(0.0);
            }
        }
        Self {
            columns: manifest.to_vec(),
            rows: table,
        }
    }

    pub fn contains(&self, team: &str) -> bool {
        self.rows.contains_key(team)
    }

    /// Team codes in sorted order.
    pub fn teams(&self) -> Vec<String> {
        self.rows.keys().cloned().collect()
    }

    pub fn features(&self, team: &str) -> Option<&[f64]> {
        self.rows.get(team).map(Vec::as_slice)
    }

    /// Home-minus-away elementwise difference, in manifest column order.
    /// `None` when either team is absent from the table.
    pub fn diff(&self, home: &str, away: &str) -> Option<Vec<f64>> {
        let home = self.rows.get(home)?;
        let away = self.rows.get(away)?;
        Some(home.iter().zip(away).map(|(h, a)| h - a).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Attach team codes to stat rows via the roster's `(player_id, season)`
/// mapping. Rows the provider already tagged keep their team; rows with no
/// roster match keep `team = None` and fall out of aggregation.
pub fn merge_rosters(rows: &mut [PlayerStatRow], rosters: &[RosterEntry]) {
    let by_player: HashMap<(&str, u16), &str> = rosters
        .iter()
        .map(|r| ((r.player_id.as_str(), r.season), r.team.as_str()))
        .collect();

    for row in rows {
        if row.team.is_none() {
            row.team = by_player
                .get(&(row.player_id.as_str(), row.season))
                .map(|team| team.to_string());
        }
    }
}
