//! Payment allocator: turns a tendered amount into fixtures marked paid.
//!
//! RULES:
//!   - Unpaid fixtures are settled oldest first, always. A payment can
//!     never target a later fixture while an earlier one is outstanding.
//!   - Fixtures are settled in full or not at all. No half-paid state.
//!   - So the only acceptable amounts are the prefix sums of the unpaid
//!     fees in date order, and checking an amount is a single O(n) scan.
//!
//! The allocator is the only writer of a fixture's paid set.

use crate::{
    error::{AllocationError, LedgerError, LedgerResult, ValidationError},
    fixture::Fixture,
    normalize::normalize,
    state::ClubState,
    types::{FixtureId, Money},
};

/// The player's unpaid fixtures, oldest first (stable on insertion order).
pub fn unpaid_fixtures<'a>(state: &'a ClubState, player: &str) -> Vec<&'a Fixture> {
    let mut unpaid: Vec<&Fixture> = state
        .fixtures
        .all()
        .filter(|f| f.is_owed_by(player))
        .collect();
    unpaid.sort_by_key(|f| f.date());
    unpaid
}

/// Running totals S₁..Sₙ over the unpaid fees.
fn prefix_sums(unpaid: &[&Fixture]) -> Vec<Money> {
    unpaid
        .iter()
        .scan(Money::ZERO, |running, f| {
            *running = running.saturating_add(f.fee());
            Some(*running)
        })
        .collect()
}

/// Every amount the player could pay right now, ascending and distinct.
pub fn valid_amounts(state: &ClubState, player: &str) -> Vec<Money> {
    let name = normalize(player);
    distinct_positive(&prefix_sums(&unpaid_fixtures(state, &name)))
}

fn distinct_positive(sums: &[Money]) -> Vec<Money> {
    let mut amounts: Vec<Money> = Vec::with_capacity(sums.len());
    for &sum in sums {
        if sum > Money::ZERO && amounts.last() != Some(&sum) {
            amounts.push(sum);
        }
    }
    amounts
}

/// Settle the player's oldest unpaid fixtures with exactly `amount`.
///
/// Returns the fixtures newly marked paid, oldest first. When zero-fee
/// fixtures make several prefixes match, the longest one is settled.
pub fn allocate_payment(state: &mut ClubState, player: &str, amount: Money) -> LedgerResult<Vec<FixtureId>> {
    let name = normalize(player);
    if !state.roster.contains(&name) {
        return Err(LedgerError::player_not_found(&name));
    }
    if amount <= Money::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount).into());
    }

    let unpaid = unpaid_fixtures(state, &name);
    let sums = prefix_sums(&unpaid);

    let Some(k) = sums.iter().rposition(|s| *s == amount).map(|i| i + 1) else {
        let payable = sums.iter().take_while(|s| **s < amount).count();
        let covered = if payable == 0 { Money::ZERO } else { sums[payable - 1] };
        return Err(AllocationError {
            player: name,
            amount,
            payable_fixtures: payable,
            remainder: amount - covered,
            valid_amounts: distinct_positive(&sums),
        }
        .into());
    };

    let settled: Vec<FixtureId> = unpaid[..k].iter().map(|f| f.id()).collect();
    for id in &settled {
        if let Some(fixture) = state.fixtures.get_mut(*id) {
            fixture.mark_paid(&name);
        }
    }
    log::info!("{name} paid {amount}, settling {} fixture(s)", settled.len());
    Ok(settled)
}
