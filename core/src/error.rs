use crate::types::{FixtureId, Money, PlayerName};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Player '{name}' already exists")]
    DuplicatePlayer { name: PlayerName },

    /// Soft duplicate: the caller may retry with the override set.
    #[error("A fixture against {opponent} on {date} already exists")]
    DuplicateFixture { opponent: String, date: NaiveDate },

    #[error("{kind} '{key}' not found")]
    NotFound { kind: EntityKind, key: String },

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Wipe not confirmed: confirmation token did not match")]
    WipeNotConfirmed,
}

impl LedgerError {
    pub fn player_not_found(name: &str) -> Self {
        Self::NotFound { kind: EntityKind::Player, key: name.to_string() }
    }

    pub fn fixture_not_found(id: FixtureId) -> Self {
        Self::NotFound { kind: EntityKind::Fixture, key: id.to_string() }
    }

    /// True for errors the operator fixes by re-entering input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    ActivePlayer,
    InactivePlayer,
    Fixture,
    Attendance,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Player         => "Player",
            Self::ActivePlayer   => "Active player",
            Self::InactivePlayer => "Inactive player",
            Self::Fixture        => "Fixture",
            Self::Attendance     => "Attendance",
        };
        f.write_str(label)
    }
}

/// Malformed operator input. Always recoverable by re-prompting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("Player name cannot contain numbers: '{0}'")]
    NameContainsDigit(String),

    #[error("Invalid date '{0}'. Use DD/MM/YY (e.g. 05/09/25) or DD/MM/YYYY (e.g. 05/09/2025)")]
    InvalidDate(String),

    #[error("Invalid fee '{0}'. Enter a number up to 1000000 with at most two decimal places")]
    InvalidFee(String),

    #[error("Fee cannot be negative: {0}")]
    NegativeFee(Money),

    #[error("Payment amount must be greater than zero, got {0}")]
    NonPositiveAmount(Money),

    #[error("{player} is already marked as attended for fixture {fixture}")]
    AlreadySelected { player: PlayerName, fixture: FixtureId },

    #[error("{0} is inactive and cannot be selected")]
    PlayerInactive(PlayerName),

    #[error("Club name is already set to '{0}'")]
    ClubNameAlreadySet(String),
}

/// A tendered amount that does not settle a whole number of the
/// player's oldest unpaid fixtures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{amount} does not match the player's oldest unpaid fixtures: \
     {payable_fixtures} fixture(s) fully covered with {remainder} left over; \
     valid amounts are {}",
    format_amounts(.valid_amounts)
)]
pub struct AllocationError {
    pub player: PlayerName,
    pub amount: Money,
    /// Largest k whose prefix sum is strictly below `amount`.
    pub payable_fixtures: usize,
    pub remainder: Money,
    /// Distinct positive prefix sums, ascending.
    pub valid_amounts: Vec<Money>,
}

fn format_amounts(amounts: &[Money]) -> String {
    if amounts.is_empty() {
        return "none (nothing outstanding)".to_string();
    }
    amounts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Snapshot unreadable or unwritable.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
