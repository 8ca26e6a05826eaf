//! Ledger events: one per applied change.
//!
//! Events are returned to the caller and logged. They are not persisted;
//! the snapshot is the only durable record.

use crate::{
    attendance::AssignMode,
    fixture::FixtureField,
    types::{FixtureId, Money, PlayerName},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    // ── Club & roster ─────────────────────────────
    ClubNamed {
        name: String,
    },
    PlayerAdded {
        name: PlayerName,
    },
    PlayerRenamed {
        old: PlayerName,
        new: PlayerName,
    },
    PlayerDeactivated {
        name: PlayerName,
    },
    PlayerReactivated {
        name: PlayerName,
    },

    // ── Fixtures ──────────────────────────────────
    FixtureAdded {
        fixture: FixtureId,
        opponent: String,
        date: NaiveDate,
        fee: Money,
        /// Added over an existing fixture with the same opponent and date.
        duplicate: bool,
    },
    FixtureEdited {
        fixture: FixtureId,
        field: FixtureField,
        value: String,
    },
    FixtureDeleted {
        fixture: FixtureId,
        opponent: String,
        date: NaiveDate,
        /// Players who were selected; their obligations went with it.
        selected: usize,
    },

    // ── Attendance ────────────────────────────────
    AttendanceAdded {
        fixture: FixtureId,
        player: PlayerName,
    },
    AttendanceRemoved {
        fixture: FixtureId,
        player: PlayerName,
        payment_revoked: bool,
    },
    AttendanceAssigned {
        mode: AssignMode,
        changed: usize,
        skipped: usize,
        revoked_payments: usize,
    },

    // ── Payments ──────────────────────────────────
    PaymentAllocated {
        player: PlayerName,
        amount: Money,
        fixtures: Vec<FixtureId>,
        remaining_due: Money,
    },

    DataWiped,
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClubNamed { name } => write!(f, "Club name set: {name}"),
            Self::PlayerAdded { name } => write!(f, "Added player: {name}"),
            Self::PlayerRenamed { old, new } => write!(f, "Renamed {old} to {new}"),
            Self::PlayerDeactivated { name } => write!(f, "{name} is now inactive"),
            Self::PlayerReactivated { name } => write!(f, "{name} is active again"),
            Self::FixtureAdded { fixture, opponent, date, fee, duplicate } => {
                write!(f, "Added fixture {fixture}: {opponent} on {date}, fee {fee:.2}")?;
                if *duplicate {
                    write!(f, " (duplicate)")?;
                }
                Ok(())
            }
            Self::FixtureEdited { fixture, field, value } => {
                write!(f, "Fixture {fixture}: {field:?} set to {value}")
            }
            Self::FixtureDeleted { fixture, opponent, date, selected } => write!(
                f,
                "Deleted fixture {fixture} ({opponent} on {date}, {selected} selected)"
            ),
            Self::AttendanceAdded { fixture, player } => {
                write!(f, "{player} marked as attended for fixture {fixture}")
            }
            Self::AttendanceRemoved { fixture, player, payment_revoked } => {
                write!(f, "{player} removed from fixture {fixture}")?;
                if *payment_revoked {
                    write!(f, " (payment revoked)")?;
                }
                Ok(())
            }
            Self::AttendanceAssigned { mode, changed, skipped, revoked_payments } => write!(
                f,
                "Assign {mode:?}: {changed} changed, {skipped} skipped, {revoked_payments} payment(s) revoked"
            ),
            Self::PaymentAllocated { player, amount, fixtures, remaining_due } => write!(
                f,
                "{player} paid {amount:.2} covering {} fixture(s); {remaining_due:.2} still due",
                fixtures.len()
            ),
            Self::DataWiped => write!(f, "All data wiped"),
        }
    }
}
