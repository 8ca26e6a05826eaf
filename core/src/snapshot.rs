//! Snapshot serialization: full club state to/from JSON.
//!
//! The snapshot is the only durable copy. It is read once at startup
//! and fully overwritten after every mutation.
//!
//! Loading is forgiving: a malformed match entry is skipped on its own,
//! and the restored state is sanitized so the Fixture invariants hold.

use crate::{
    fixture::{self, FixtureStore, MAX_FEE_DECIMALS},
    normalize::normalize,
    roster::{PlayerStatus, Roster},
    state::ClubState,
    types::{Money, PlayerName},
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubSnapshot {
    #[serde(default)]
    pub club_name: String,
    #[serde(default)]
    pub players: Vec<PlayerName>,
    /// Subset of `players`.
    #[serde(default)]
    pub inactive_players: Vec<PlayerName>,
    #[serde(default, deserialize_with = "skip_malformed_matches")]
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub opponent: String,
    /// Serialized as "YYYY-MM-DD".
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Money,
    /// Selected players.
    #[serde(default)]
    pub players: Vec<PlayerName>,
    /// Subset of `players`.
    #[serde(default)]
    pub paid: Vec<PlayerName>,
}

fn skip_malformed_matches<'de, D>(deserializer: D) -> Result<Vec<MatchRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    let total = raw.len();
    let records: Vec<MatchRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<MatchRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed match entry {i}: {e}");
                None
            }
        })
        .collect();
    if records.len() < total {
        log::warn!("Loaded {} of {total} match entries", records.len());
    }
    Ok(records)
}

impl ClubSnapshot {
    pub fn from_state(state: &ClubState) -> Self {
        Self {
            club_name: state.club_name.clone(),
            players: state.roster.all_players().map(|p| p.name.clone()).collect(),
            inactive_players: state.roster.inactive_players().map(|p| p.name.clone()).collect(),
            matches: state
                .fixtures
                .all()
                .map(|f| MatchRecord {
                    opponent: f.opponent().to_string(),
                    date: f.date(),
                    fee: f.fee(),
                    players: f.selected().iter().cloned().collect(),
                    paid: f.paid().iter().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Rebuild a ClubState.
    ///
    /// Names are normalized, duplicates dropped, inactive names not on
    /// the roster ignored, match players missing from the roster added
    /// to it, paid names clipped to selected, fees rounded to pennies, and
    /// fees that are negative or above MAX_FEE skipped.
    pub fn into_state(self, century_pivot: u32) -> ClubState {
        let inactive: Vec<PlayerName> = self.inactive_players.iter().map(|n| normalize(n)).collect();

        let mut roster = Roster::new();
        for name in self.players.iter().map(|n| normalize(n)).filter(|n| !n.is_empty()) {
            let status = if inactive.contains(&name) {
                PlayerStatus::Inactive
            } else {
                PlayerStatus::Active
            };
            roster.restore(name, status);
        }

        let mut fixtures = FixtureStore::new().with_century_pivot(century_pivot);
        for record in self.matches {
            let opponent = normalize(&record.opponent);
            let fee = match fixture::check_fee(record.fee.round_dp(MAX_FEE_DECIMALS)) {
                Ok(fee) => fee,
                Err(e) => {
                    log::warn!("Skipping match entry: {e}: {record:?}");
                    continue;
                }
            };
            if opponent.is_empty() {
                log::warn!("Skipping match entry with no opponent: {record:?}");
                continue;
            }
            let selected: Vec<PlayerName> = record
                .players
                .iter()
                .map(|n| normalize(n))
                .filter(|n| !n.is_empty())
                .collect();
            for name in &selected {
                if roster.restore(name.clone(), PlayerStatus::Active) {
                    log::warn!("Match player {name} was missing from the roster; restored");
                }
            }
            let paid = record.paid.iter().map(|n| normalize(n));
            fixtures.restore(opponent, record.date, fee, selected, paid);
        }

        ClubState {
            club_name: normalize(&self.club_name),
            roster,
            fixtures,
        }
    }
}
