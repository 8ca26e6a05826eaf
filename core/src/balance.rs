//! Balance calculator: derives owed/paid/due per player.
//!
//! Nothing here is cached. Fixture counts are small, so balances are
//! recomputed on every query in O(players × fixtures).

use crate::{
    fixture::FixtureStore,
    roster::Roster,
    types::{Money, PlayerName},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub owed: Money,
    pub paid: Money,
    pub due:  Money,
}

impl Balance {
    pub fn is_settled(&self) -> bool {
        self.due.is_zero()
    }

    /// Never selected for anything.
    pub fn is_empty(&self) -> bool {
        self.owed.is_zero() && self.paid.is_zero()
    }
}

/// Balance for every roster player, inactive ones included, in roster order.
pub fn balances(roster: &Roster, fixtures: &FixtureStore) -> IndexMap<PlayerName, Balance> {
    roster
        .all_players()
        .map(|p| (p.name.clone(), balance_of(fixtures, &p.name)))
        .collect()
}

pub fn balance_of(fixtures: &FixtureStore, player: &str) -> Balance {
    let mut balance = Balance::default();
    for fixture in fixtures.all().filter(|f| f.is_selected(player)) {
        balance.owed = balance.owed.saturating_add(fixture.fee());
        if fixture.is_paid(player) {
            balance.paid = balance.paid.saturating_add(fixture.fee());
        }
    }
    balance.due = balance.owed - balance.paid;
    balance
}

/// Players with something still due, sorted by name.
pub fn outstanding(roster: &Roster, fixtures: &FixtureStore) -> Vec<(PlayerName, Balance)> {
    let mut rows: Vec<(PlayerName, Balance)> = balances(roster, fixtures)
        .into_iter()
        .filter(|(_, b)| b.due > Money::ZERO)
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

/// Club-wide sums across all roster players.
pub fn totals(roster: &Roster, fixtures: &FixtureStore) -> Balance {
    balances(roster, fixtures)
        .values()
        .fold(Balance::default(), |mut acc, b| {
            acc.owed = acc.owed.saturating_add(b.owed);
            acc.paid = acc.paid.saturating_add(b.paid);
            acc.due = acc.due.saturating_add(b.due);
            acc
        })
}
