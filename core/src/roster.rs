//! The club roster: players and their active/inactive status.
//!
//! RULE: names stored here are always normalized.
//! Players are never removed, only deactivated; a full wipe is the
//! one exception and goes through the ledger engine.

use crate::{
    error::{EntityKind, LedgerError, LedgerResult, ValidationError},
    normalize::normalize,
    types::PlayerName,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name:   PlayerName,
    pub status: PlayerStatus,
}

impl Player {
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }
}

/// Normalize a raw player name and check it is usable.
pub fn validate_player_name(raw: &str) -> Result<PlayerName, ValidationError> {
    let name = normalize(raw);
    if name.is_empty() {
        return Err(ValidationError::Empty { field: "Player name" });
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NameContainsDigit(name));
    }
    Ok(name)
}

/// Players keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: IndexMap<PlayerName, Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new active player. Returns the normalized name.
    pub fn add(&mut self, raw_name: &str) -> LedgerResult<PlayerName> {
        let name = validate_player_name(raw_name)?;
        if self.players.contains_key(&name) {
            return Err(LedgerError::DuplicatePlayer { name });
        }
        self.players.insert(
            name.clone(),
            Player { name: name.clone(), status: PlayerStatus::Active },
        );
        log::debug!("Roster: added {name}");
        Ok(name)
    }

    /// Rename within the roster only, keeping the player's position.
    /// Fixture references are updated by `ClubState::rename_player`.
    pub(crate) fn rename(&mut self, old: &str, raw_new: &str) -> LedgerResult<PlayerName> {
        let old = normalize(old);
        let new = validate_player_name(raw_new)?;
        if !self.players.contains_key(&old) {
            return Err(LedgerError::player_not_found(&old));
        }
        if new == old {
            return Ok(new);
        }
        if self.players.contains_key(&new) {
            return Err(LedgerError::DuplicatePlayer { name: new });
        }
        self.players = self
            .players
            .drain(..)
            .map(|(key, mut player)| {
                if key == old {
                    player.name = new.clone();
                    (new.clone(), player)
                } else {
                    (key, player)
                }
            })
            .collect();
        Ok(new)
    }

    pub fn deactivate(&mut self, name: &str) -> LedgerResult<()> {
        self.set_status(name, PlayerStatus::Inactive)
    }

    pub fn reactivate(&mut self, name: &str) -> LedgerResult<()> {
        self.set_status(name, PlayerStatus::Active)
    }

    fn set_status(&mut self, name: &str, target: PlayerStatus) -> LedgerResult<()> {
        let name = normalize(name);
        // A player already in the target status is outside the valid set.
        let kind = match target {
            PlayerStatus::Inactive => EntityKind::ActivePlayer,
            PlayerStatus::Active   => EntityKind::InactivePlayer,
        };
        match self.players.get_mut(&name) {
            Some(player) if player.status != target => {
                player.status = target;
                Ok(())
            }
            _ => Err(LedgerError::NotFound { kind, key: name }),
        }
    }

    pub fn all_players(&self) -> impl Iterator<Item = &Player> + Clone + '_ {
        self.players.values()
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> + Clone + '_ {
        self.players.values().filter(|p| p.is_active())
    }

    pub fn inactive_players(&self) -> impl Iterator<Item = &Player> + Clone + '_ {
        self.players.values().filter(|p| !p.is_active())
    }

    /// Lookups normalize `name` first, so raw operator input works.
    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.get(&normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn status_of(&self, name: &str) -> Option<PlayerStatus> {
        self.get(name).map(|p| p.status)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Names in lexicographic order, for display.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.players.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Insert an already-normalized player, used when restoring a snapshot.
    /// Returns false if the name was already present.
    pub(crate) fn restore(&mut self, name: PlayerName, status: PlayerStatus) -> bool {
        if self.players.contains_key(&name) {
            return false;
        }
        self.players.insert(name.clone(), Player { name, status });
        true
    }
}
