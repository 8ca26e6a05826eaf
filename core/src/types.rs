//! Shared primitive types used across the entire ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amounts. One implicit currency unit, exact decimal arithmetic.
pub type Money = rust_decimal::Decimal;

/// A normalized player name. Unique within the roster.
pub type PlayerName = String;

/// A session-stable handle for one fixture.
///
/// Ids are handed out in insertion order and are not persisted;
/// a freshly loaded snapshot numbers its fixtures from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(pub u32);

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
