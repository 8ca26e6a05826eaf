//! Fixtures and the fixture store.
//!
//! RULE: `paid` is always a subset of `selected`.
//! The Fixture type enforces this itself; its mutators are crate-private
//! so attendance and payment changes go through the ledger operations.

use crate::{
    error::{LedgerError, LedgerResult, ValidationError},
    normalize::normalize,
    types::{FixtureId, Money, PlayerName},
};
use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Two-digit years below the pivot land in 2000+, the rest in 1900+.
pub const DEFAULT_CENTURY_PIVOT: u32 = 69;

/// Largest fee a fixture can carry.
pub const MAX_FEE: Money = Money::from_parts(1_000_000, 0, 0, false, 0);

/// Fees are whole pennies. Together with MAX_FEE this keeps every fee
/// exact through the float encoding of the snapshot.
pub const MAX_FEE_DECIMALS: u32 = 2;

/// Parse `d/m/yy` or `d/m/yyyy`.
pub fn parse_date(input: &str, century_pivot: u32) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "Date" });
    }
    let invalid = || ValidationError::InvalidDate(trimmed.to_string());

    let parts: Vec<&str> = trimmed.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };
    let day = parse_digits(day, 2).ok_or_else(invalid)?;
    let month = parse_digits(month, 2).ok_or_else(invalid)?;
    let year = match year.len() {
        2 => {
            let yy = parse_digits(year, 2).ok_or_else(invalid)?;
            if yy < century_pivot { 2000 + yy } else { 1900 + yy }
        }
        4 => parse_digits(year, 4).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

fn parse_digits(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a non-negative fee.
pub fn parse_fee(input: &str) -> Result<Money, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "Fee" });
    }
    let fee = Money::from_str(trimmed)
        .map_err(|_| ValidationError::InvalidFee(trimmed.to_string()))?;
    check_fee(fee)
}

pub(crate) fn check_fee(fee: Money) -> Result<Money, ValidationError> {
    if fee < Money::ZERO {
        return Err(ValidationError::NegativeFee(fee));
    }
    let fee = fee.normalize();
    if fee > MAX_FEE || fee.scale() > MAX_FEE_DECIMALS {
        return Err(ValidationError::InvalidFee(fee.to_string()));
    }
    Ok(fee)
}

fn validate_opponent(raw: &str) -> Result<String, ValidationError> {
    let opponent = normalize(raw);
    if opponent.is_empty() {
        return Err(ValidationError::Empty { field: "Opponent" });
    }
    Ok(opponent)
}

/// The single editable fields of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureField {
    Opponent,
    Date,
    Fee,
}

/// A scheduled match carrying a per-player fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    id:       FixtureId,
    opponent: String,
    date:     NaiveDate,
    fee:      Money,
    selected: IndexSet<PlayerName>,
    paid:     IndexSet<PlayerName>,
}

impl Fixture {
    pub fn id(&self) -> FixtureId {
        self.id
    }

    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn fee(&self) -> Money {
        self.fee
    }

    /// Selected players in selection order.
    pub fn selected(&self) -> &IndexSet<PlayerName> {
        &self.selected
    }

    /// Players who have settled this fixture, in payment order.
    pub fn paid(&self) -> &IndexSet<PlayerName> {
        &self.paid
    }

    pub fn is_selected(&self, player: &str) -> bool {
        self.selected.contains(player)
    }

    pub fn is_paid(&self, player: &str) -> bool {
        self.paid.contains(player)
    }

    /// Selected but not yet paid.
    pub fn is_owed_by(&self, player: &str) -> bool {
        self.is_selected(player) && !self.is_paid(player)
    }

    pub(crate) fn select(&mut self, player: &str) -> bool {
        self.selected.insert(player.to_string())
    }

    /// Removing a player also revokes any payment they made for this fixture.
    pub(crate) fn deselect(&mut self, player: &str) -> bool {
        let removed = self.selected.shift_remove(player);
        if removed {
            self.paid.shift_remove(player);
        }
        removed
    }

    /// Returns false if the player is not selected or has already paid.
    pub(crate) fn mark_paid(&mut self, player: &str) -> bool {
        if !self.selected.contains(player) {
            return false;
        }
        self.paid.insert(player.to_string())
    }

    pub(crate) fn rename_player(&mut self, old: &str, new: &str) {
        let swap = |set: &IndexSet<PlayerName>| -> IndexSet<PlayerName> {
            set.iter()
                .map(|n| if n == old { new.to_string() } else { n.clone() })
                .collect()
        };
        if self.selected.contains(old) {
            self.selected = swap(&self.selected);
            self.paid = swap(&self.paid);
        }
    }
}

/// All fixtures for the club, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureStore {
    fixtures:      Vec<Fixture>,
    next_id:       u32,
    century_pivot: u32,
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self {
            fixtures: Vec::new(),
            next_id: 1,
            century_pivot: DEFAULT_CENTURY_PIVOT,
        }
    }
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_century_pivot(mut self, pivot: u32) -> Self {
        self.century_pivot = pivot;
        self
    }

    pub fn century_pivot(&self) -> u32 {
        self.century_pivot
    }

    pub(crate) fn set_century_pivot(&mut self, pivot: u32) {
        self.century_pivot = pivot;
    }

    /// Add a fixture from raw operator input.
    ///
    /// An existing fixture with the same opponent and date is a soft
    /// duplicate: rejected unless `allow_duplicate` is set.
    pub fn add(
        &mut self,
        opponent: &str,
        date: &str,
        fee: &str,
        allow_duplicate: bool,
    ) -> LedgerResult<FixtureId> {
        let opponent = validate_opponent(opponent)?;
        let date = parse_date(date, self.century_pivot)?;
        let fee = parse_fee(fee)?;
        self.insert(opponent, date, fee, allow_duplicate)
    }

    /// Add a fixture from already-typed values.
    pub fn add_parsed(
        &mut self,
        opponent: &str,
        date: NaiveDate,
        fee: Money,
        allow_duplicate: bool,
    ) -> LedgerResult<FixtureId> {
        let opponent = validate_opponent(opponent)?;
        let fee = check_fee(fee)?;
        self.insert(opponent, date, fee, allow_duplicate)
    }

    fn insert(
        &mut self,
        opponent: String,
        date: NaiveDate,
        fee: Money,
        allow_duplicate: bool,
    ) -> LedgerResult<FixtureId> {
        if let Some(existing) = self.find_duplicate(&opponent, date) {
            if !allow_duplicate {
                return Err(LedgerError::DuplicateFixture { opponent, date });
            }
            log::warn!("Adding duplicate of fixture {existing}: {opponent} on {date}");
        }
        let id = FixtureId(self.next_id);
        self.next_id += 1;
        self.fixtures.push(Fixture {
            id,
            opponent,
            date,
            fee,
            selected: IndexSet::new(),
            paid: IndexSet::new(),
        });
        Ok(id)
    }

    /// Re-validate and replace a single field. No merging with other fixtures.
    pub fn edit(&mut self, id: FixtureId, field: FixtureField, value: &str) -> LedgerResult<()> {
        let pivot = self.century_pivot;
        let fixture = self.get_mut(id).ok_or_else(|| LedgerError::fixture_not_found(id))?;
        match field {
            FixtureField::Opponent => fixture.opponent = validate_opponent(value)?,
            FixtureField::Date     => fixture.date = parse_date(value, pivot)?,
            FixtureField::Fee      => fixture.fee = parse_fee(value)?,
        }
        Ok(())
    }

    /// Unconditional removal. Warning about selected players is the caller's job.
    pub fn delete(&mut self, id: FixtureId) -> LedgerResult<Fixture> {
        let index = self
            .fixtures
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| LedgerError::fixture_not_found(id))?;
        Ok(self.fixtures.remove(index))
    }

    pub fn all(&self) -> impl Iterator<Item = &Fixture> + Clone + '_ {
        self.fixtures.iter()
    }

    /// Ascending by date; equal dates keep insertion order.
    pub fn sorted_by_date(&self) -> Vec<&Fixture> {
        let mut sorted: Vec<&Fixture> = self.fixtures.iter().collect();
        sorted.sort_by_key(|f| f.date);
        sorted
    }

    pub fn get(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == id)
    }

    pub fn find_duplicate(&self, opponent: &str, date: NaiveDate) -> Option<FixtureId> {
        self.fixtures
            .iter()
            .find(|f| f.opponent == opponent && f.date == date)
            .map(|f| f.id)
    }

    pub fn contains(&self, id: FixtureId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub(crate) fn rename_player(&mut self, old: &str, new: &str) {
        for fixture in &mut self.fixtures {
            fixture.rename_player(old, new);
        }
    }

    /// Insert a fixture read back from a snapshot. Duplicate names are
    /// dropped and `paid` is clipped to `selected`.
    pub(crate) fn restore(
        &mut self,
        opponent: String,
        date: NaiveDate,
        fee: Money,
        selected: impl IntoIterator<Item = PlayerName>,
        paid: impl IntoIterator<Item = PlayerName>,
    ) -> FixtureId {
        let selected: IndexSet<PlayerName> = selected.into_iter().collect();
        let paid: IndexSet<PlayerName> = paid
            .into_iter()
            .filter(|name| selected.contains(name))
            .collect();
        let id = FixtureId(self.next_id);
        self.next_id += 1;
        self.fixtures.push(Fixture { id, opponent, date, fee, selected, paid });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_both_year_forms() {
        assert_eq!(parse_date("05/09/25", DEFAULT_CENTURY_PIVOT).unwrap(), ymd(2025, 9, 5));
        assert_eq!(parse_date("05/09/2025", DEFAULT_CENTURY_PIVOT).unwrap(), ymd(2025, 9, 5));
        assert_eq!(parse_date("5/9/2025", DEFAULT_CENTURY_PIVOT).unwrap(), ymd(2025, 9, 5));
    }

    #[test]
    fn two_digit_years_follow_the_pivot() {
        assert_eq!(parse_date("01/01/00", 69).unwrap(), ymd(2000, 1, 1));
        assert_eq!(parse_date("01/01/68", 69).unwrap(), ymd(2068, 1, 1));
        assert_eq!(parse_date("01/01/69", 69).unwrap(), ymd(1969, 1, 1));
        assert_eq!(parse_date("01/01/99", 69).unwrap(), ymd(1999, 1, 1));
        assert_eq!(parse_date("01/01/69", 70).unwrap(), ymd(2069, 1, 1));
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["2025-09-05", "31/02/2025", "05/13/25", "05/09/125", "a/b/c", "05/09"] {
            assert!(
                matches!(parse_date(bad, 69), Err(ValidationError::InvalidDate(_))),
                "expected {bad} to be rejected"
            );
        }
        assert_eq!(parse_date("  ", 69), Err(ValidationError::Empty { field: "Date" }));
    }

    #[test]
    fn fee_must_be_a_non_negative_number() {
        assert_eq!(parse_fee("12.50").unwrap(), Money::new(125, 1));
        assert_eq!(parse_fee("0").unwrap(), Money::ZERO);
        assert!(matches!(parse_fee("ten"), Err(ValidationError::InvalidFee(_))));
        assert!(matches!(parse_fee("-5"), Err(ValidationError::NegativeFee(_))));
    }

    #[test]
    fn fee_is_bounded_to_pennies_and_max_fee() {
        assert_eq!(parse_fee("1000000").unwrap(), MAX_FEE);
        assert_eq!(parse_fee("999999.99").unwrap(), Money::new(99_999_999, 2));
        assert_eq!(parse_fee("10.120").unwrap(), Money::new(1012, 2));
        for bad in ["1000000.01", "79228162514264337593543950335", "10.123", "10.123456789012345678"] {
            assert!(
                matches!(parse_fee(bad), Err(ValidationError::InvalidFee(_))),
                "expected {bad} to be rejected"
            );
        }
    }

    #[test]
    fn deselect_revokes_payment() {
        let mut store = FixtureStore::new();
        let id = store.add("tigers cc", "01/06/2025", "10", false).unwrap();
        let fixture = store.get_mut(id).unwrap();
        assert!(fixture.select("Jed Smith"));
        assert!(fixture.mark_paid("Jed Smith"));
        assert!(fixture.deselect("Jed Smith"));
        assert!(!fixture.is_paid("Jed Smith"));
        assert!(!fixture.is_selected("Jed Smith"));
    }

    #[test]
    fn cannot_pay_without_selection() {
        let mut store = FixtureStore::new();
        let id = store.add("tigers cc", "01/06/2025", "10", false).unwrap();
        assert!(!store.get_mut(id).unwrap().mark_paid("Jed Smith"));
    }
}
