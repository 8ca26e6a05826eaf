//! The whole in-memory club state.
//!
//! RULE: there are no globals. Every ledger operation receives the
//! ClubState it works on; the engine owns the one live instance.

use crate::{
    error::{LedgerResult, ValidationError},
    fixture::FixtureStore,
    normalize::normalize,
    roster::Roster,
    types::PlayerName,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubState {
    pub club_name: String,
    pub roster:    Roster,
    pub fixtures:  FixtureStore,
}

impl ClubState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_century_pivot(mut self, pivot: u32) -> Self {
        self.fixtures.set_century_pivot(pivot);
        self
    }

    /// Set the club name. It can only be set while empty.
    pub fn set_club_name(&mut self, raw: &str) -> LedgerResult<String> {
        if !self.club_name.is_empty() {
            return Err(ValidationError::ClubNameAlreadySet(self.club_name.clone()).into());
        }
        let name = normalize(raw);
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "Club name" }.into());
        }
        self.club_name = name.clone();
        Ok(name)
    }

    /// Rename a player on the roster and in every fixture's
    /// selected and paid sets, keeping all positions.
    pub fn rename_player(&mut self, old: &str, new: &str) -> LedgerResult<PlayerName> {
        let old = normalize(old);
        let renamed = self.roster.rename(&old, new)?;
        if renamed != old {
            self.fixtures.rename_player(&old, &renamed);
            log::debug!("Renamed {old} to {renamed} across {} fixtures", self.fixtures.len());
        }
        Ok(renamed)
    }

    /// Nothing recorded yet.
    pub fn is_empty(&self) -> bool {
        self.club_name.is_empty() && self.roster.is_empty() && self.fixtures.is_empty()
    }

    /// Drop everything but keep parser settings.
    pub(crate) fn clear(&mut self) {
        let pivot = self.fixtures.century_pivot();
        *self = Self {
            fixtures: FixtureStore::new().with_century_pivot(pivot),
            ..Self::default()
        };
    }
}
