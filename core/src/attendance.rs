//! Attendance ledger: who played in which fixture.
//!
//! RULE: removing a player from a fixture also removes them from its
//! paid set. A player cannot stay "paid" for a match they are not in.
//!
//! Every batch call site goes through `assign`.

use crate::{
    error::{EntityKind, LedgerError, LedgerResult, ValidationError},
    normalize::normalize,
    state::ClubState,
    types::{FixtureId, PlayerName},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignMode {
    Add,
    Remove,
}

/// Outcome of a batch assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignReport {
    pub changed: usize,
    /// Pairs already in the requested state.
    pub skipped: usize,
    /// Payments revoked by removals.
    pub revoked_payments: usize,
    pub changed_pairs: Vec<(FixtureId, PlayerName)>,
}

/// Mark one player as attending one fixture.
///
/// A player already selected is reported as `AlreadySelected`, distinct
/// from success, and the fixture is left untouched.
pub fn add_attendance(state: &mut ClubState, fixture: FixtureId, player: &str) -> LedgerResult<PlayerName> {
    let name = selectable_player(state, player)?;
    let entry = state
        .fixtures
        .get_mut(fixture)
        .ok_or_else(|| LedgerError::fixture_not_found(fixture))?;
    if !entry.select(&name) {
        return Err(ValidationError::AlreadySelected { player: name, fixture }.into());
    }
    log::debug!("{name} selected for fixture {fixture}");
    Ok(name)
}

/// Take a player off a fixture. Returns true if a payment was revoked.
pub fn remove_attendance(state: &mut ClubState, fixture: FixtureId, player: &str) -> LedgerResult<bool> {
    let name = normalize(player);
    let entry = state
        .fixtures
        .get_mut(fixture)
        .ok_or_else(|| LedgerError::fixture_not_found(fixture))?;
    let was_paid = entry.is_paid(&name);
    if !entry.deselect(&name) {
        return Err(LedgerError::NotFound {
            kind: EntityKind::Attendance,
            key: format!("{name} @ {fixture}"),
        });
    }
    if was_paid {
        log::info!("Revoked {name}'s payment for fixture {fixture}");
    }
    Ok(was_paid)
}

pub fn add_attendance_many(
    state: &mut ClubState,
    fixtures: &[FixtureId],
    players: &[impl AsRef<str>],
) -> LedgerResult<AssignReport> {
    assign(state, players, fixtures, AssignMode::Add)
}

pub fn remove_attendance_many(
    state: &mut ClubState,
    fixtures: &[FixtureId],
    players: &[impl AsRef<str>],
) -> LedgerResult<AssignReport> {
    assign(state, players, fixtures, AssignMode::Remove)
}

/// Apply `mode` to every (fixture, player) pair independently.
///
/// Unknown fixtures or players fail the whole call before anything
/// changes; pairs already in the requested state are skipped.
pub fn assign(
    state: &mut ClubState,
    players: &[impl AsRef<str>],
    fixtures: &[FixtureId],
    mode: AssignMode,
) -> LedgerResult<AssignReport> {
    let names = players
        .iter()
        .map(|p| match mode {
            AssignMode::Add    => selectable_player(state, p.as_ref()),
            AssignMode::Remove => known_player(state, p.as_ref()),
        })
        .collect::<LedgerResult<Vec<_>>>()?;
    if let Some(missing) = fixtures.iter().find(|id| !state.fixtures.contains(**id)) {
        return Err(LedgerError::fixture_not_found(*missing));
    }

    let mut report = AssignReport::default();
    for &id in fixtures {
        let Some(fixture) = state.fixtures.get_mut(id) else {
            continue;
        };
        for name in &names {
            let changed = match mode {
                AssignMode::Add => fixture.select(name),
                AssignMode::Remove => {
                    if fixture.is_paid(name) {
                        report.revoked_payments += 1;
                    }
                    fixture.deselect(name)
                }
            };
            if changed {
                report.changed += 1;
                report.changed_pairs.push((id, name.clone()));
            } else {
                report.skipped += 1;
            }
        }
    }
    log::debug!(
        "assign({mode:?}): {} changed, {} skipped",
        report.changed,
        report.skipped
    );
    Ok(report)
}

fn known_player(state: &ClubState, raw: &str) -> LedgerResult<PlayerName> {
    let name = normalize(raw);
    if !state.roster.contains(&name) {
        return Err(LedgerError::player_not_found(&name));
    }
    Ok(name)
}

/// Inactive players keep their history but cannot be picked again.
fn selectable_player(state: &ClubState, raw: &str) -> LedgerResult<PlayerName> {
    let name = known_player(state, raw)?;
    match state.roster.get(&name) {
        Some(player) if !player.is_active() => Err(ValidationError::PlayerInactive(name).into()),
        _ => Ok(name),
    }
}
