//! Attendance ledger tests: idempotence, removal consistency, batch assign.

use matchfees_core::{
    allocator,
    attendance::{self, AssignMode},
    error::{EntityKind, LedgerError, ValidationError},
    state::ClubState,
    types::{FixtureId, Money},
};

fn club_with(players: &[&str], fixtures: &[(&str, &str, &str)]) -> (ClubState, Vec<FixtureId>) {
    let mut state = ClubState::new();
    for p in players {
        state.roster.add(p).unwrap();
    }
    let ids = fixtures
        .iter()
        .map(|(opp, date, fee)| state.fixtures.add(opp, date, fee, false).unwrap())
        .collect();
    (state, ids)
}

#[test]
fn adding_twice_is_a_reported_no_op() {
    let (mut state, ids) = club_with(&["Jed Smith"], &[("tigers cc", "01/06/2025", "10")]);

    attendance::add_attendance(&mut state, ids[0], "jed smith").unwrap();
    let err = attendance::add_attendance(&mut state, ids[0], "Jed Smith").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::AlreadySelected { .. })
    ));

    let fixture = state.fixtures.get(ids[0]).unwrap();
    assert_eq!(fixture.selected().len(), 1);
    assert!(fixture.is_selected("Jed Smith"));
}

#[test]
fn selection_keeps_insertion_order() {
    let (mut state, ids) = club_with(&["Amy", "Jed", "Mo"], &[("tigers cc", "01/06/2025", "10")]);
    for p in ["Mo", "Amy", "Jed"] {
        attendance::add_attendance(&mut state, ids[0], p).unwrap();
    }
    let order: Vec<&str> = state.fixtures.get(ids[0]).unwrap().selected().iter().map(String::as_str).collect();
    assert_eq!(order, vec!["Mo", "Amy", "Jed"]);
}

#[test]
fn unknown_or_inactive_players_cannot_be_selected() {
    let (mut state, ids) = club_with(&["Jed"], &[("tigers cc", "01/06/2025", "10")]);
    assert!(matches!(
        attendance::add_attendance(&mut state, ids[0], "Ghost"),
        Err(LedgerError::NotFound { kind: EntityKind::Player, .. })
    ));

    state.roster.deactivate("Jed").unwrap();
    assert!(matches!(
        attendance::add_attendance(&mut state, ids[0], "Jed"),
        Err(LedgerError::Validation(ValidationError::PlayerInactive(_)))
    ));

    state.roster.reactivate("Jed").unwrap();
    assert!(matches!(
        attendance::add_attendance(&mut state, FixtureId(42), "Jed"),
        Err(LedgerError::NotFound { kind: EntityKind::Fixture, .. })
    ));
}

#[test]
fn removing_a_paid_player_revokes_the_payment() {
    let (mut state, ids) = club_with(&["Jed"], &[("tigers cc", "01/06/2025", "10")]);
    attendance::add_attendance(&mut state, ids[0], "Jed").unwrap();
    allocator::allocate_payment(&mut state, "Jed", Money::new(10, 0)).unwrap();
    assert!(state.fixtures.get(ids[0]).unwrap().is_paid("Jed"));

    let revoked = attendance::remove_attendance(&mut state, ids[0], "Jed").unwrap();
    assert!(revoked);

    let fixture = state.fixtures.get(ids[0]).unwrap();
    assert!(!fixture.is_paid("Jed"));
    assert!(!fixture.is_selected("Jed"));
}

#[test]
fn removing_an_absent_player_is_not_found() {
    let (mut state, ids) = club_with(&["Jed"], &[("tigers cc", "01/06/2025", "10")]);
    let err = attendance::remove_attendance(&mut state, ids[0], "Jed").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound { kind: EntityKind::Attendance, .. }
    ));
}

#[test]
fn batch_add_skips_pairs_already_satisfied() {
    let (mut state, ids) = club_with(
        &["Amy", "Jed"],
        &[("tigers cc", "01/06/2025", "10"), ("lions fc", "08/06/2025", "10")],
    );
    attendance::add_attendance(&mut state, ids[0], "Amy").unwrap();

    let report = attendance::add_attendance_many(&mut state, &ids, &["Amy", "Jed"]).unwrap();
    assert_eq!(report.changed, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.changed_pairs.len(), 3);

    for id in &ids {
        let fixture = state.fixtures.get(*id).unwrap();
        assert!(fixture.is_selected("Amy"));
        assert!(fixture.is_selected("Jed"));
    }
}

#[test]
fn batch_remove_counts_revoked_payments() {
    let (mut state, ids) = club_with(
        &["Amy", "Jed"],
        &[("tigers cc", "01/06/2025", "10"), ("lions fc", "08/06/2025", "10")],
    );
    attendance::assign(&mut state, &["Amy", "Jed"], &ids, AssignMode::Add).unwrap();
    allocator::allocate_payment(&mut state, "Jed", Money::new(10, 0)).unwrap();

    let report = attendance::remove_attendance_many(&mut state, &[ids[0]], &["Jed", "Amy"]).unwrap();
    assert_eq!(report.changed, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.revoked_payments, 1);

    let again = attendance::assign(&mut state, &["Jed"], &[ids[0]], AssignMode::Remove).unwrap();
    assert_eq!(again.changed, 0);
    assert_eq!(again.skipped, 1);
}

#[test]
fn batch_with_unknown_fixture_changes_nothing() {
    let (mut state, ids) = club_with(&["Amy"], &[("tigers cc", "01/06/2025", "10")]);
    let err = attendance::assign(&mut state, &["Amy"], &[ids[0], FixtureId(99)], AssignMode::Add).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { kind: EntityKind::Fixture, .. }));
    assert!(state.fixtures.get(ids[0]).unwrap().selected().is_empty());
}
