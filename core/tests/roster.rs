//! Roster tests: validation, duplicates, rename propagation and status.

use matchfees_core::{
    error::{EntityKind, LedgerError, ValidationError},
    roster::{PlayerStatus, Roster},
    state::ClubState,
    types::Money,
};

fn money(s: &str) -> Money {
    s.parse().expect("valid amount")
}

#[test]
fn add_normalizes_and_starts_active() {
    let mut roster = Roster::new();
    let name = roster.add("  jed   smith ").unwrap();
    assert_eq!(name, "Jed Smith");
    assert_eq!(roster.status_of("Jed Smith"), Some(PlayerStatus::Active));
}

#[test]
fn add_rejects_empty_and_digit_names() {
    let mut roster = Roster::new();
    assert!(matches!(
        roster.add("   "),
        Err(LedgerError::Validation(ValidationError::Empty { .. }))
    ));
    assert!(matches!(
        roster.add("player 2"),
        Err(LedgerError::Validation(ValidationError::NameContainsDigit(_)))
    ));
    assert!(roster.is_empty());
}

#[test]
fn duplicate_is_detected_after_normalization() {
    let mut roster = Roster::new();
    roster.add("Jed Smith").unwrap();
    let err = roster.add("JED smith").unwrap_err();
    assert!(
        matches!(err, LedgerError::DuplicatePlayer { ref name } if name == "Jed Smith"),
        "unexpected error: {err}"
    );
    assert_eq!(roster.len(), 1);
}

#[test]
fn players_iterate_in_insertion_order_and_restart() {
    let mut roster = Roster::new();
    for name in ["zed", "amy", "mo"] {
        roster.add(name).unwrap();
    }
    roster.deactivate("Amy").unwrap();

    let all = roster.all_players();
    let first: Vec<&str> = all.clone().map(|p| p.name.as_str()).collect();
    let second: Vec<&str> = all.map(|p| p.name.as_str()).collect();
    assert_eq!(first, vec!["Zed", "Amy", "Mo"]);
    assert_eq!(first, second);

    let active: Vec<&str> = roster.active_players().map(|p| p.name.as_str()).collect();
    assert_eq!(active, vec!["Zed", "Mo"]);
    assert_eq!(roster.sorted_names(), vec!["Amy", "Mo", "Zed"]);
}

#[test]
fn deactivate_twice_is_not_found() {
    let mut roster = Roster::new();
    roster.add("Jed Smith").unwrap();
    roster.deactivate("Jed Smith").unwrap();

    let err = roster.deactivate("Jed Smith").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound { kind: EntityKind::ActivePlayer, .. }
    ));

    roster.reactivate("Jed Smith").unwrap();
    assert!(matches!(
        roster.reactivate("Jed Smith"),
        Err(LedgerError::NotFound { kind: EntityKind::InactivePlayer, .. })
    ));
    assert!(matches!(
        roster.deactivate("Nobody"),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn rename_propagates_to_fixtures_keeping_order() {
    let mut state = ClubState::new();
    for name in ["Amy", "Jed", "Mo"] {
        state.roster.add(name).unwrap();
    }
    let id = state.fixtures.add("tigers cc", "01/06/2025", "10", false).unwrap();
    matchfees_core::attendance::add_attendance_many(&mut state, &[id], &["Amy", "Jed", "Mo"]).unwrap();
    matchfees_core::allocator::allocate_payment(&mut state, "Jed", money("10")).unwrap();

    let renamed = state.rename_player("Jed", "jed smith").unwrap();
    assert_eq!(renamed, "Jed Smith");

    let roster: Vec<&str> = state.roster.all_players().map(|p| p.name.as_str()).collect();
    assert_eq!(roster, vec!["Amy", "Jed Smith", "Mo"]);

    let fixture = state.fixtures.get(id).unwrap();
    let selected: Vec<&str> = fixture.selected().iter().map(String::as_str).collect();
    assert_eq!(selected, vec!["Amy", "Jed Smith", "Mo"]);
    assert!(fixture.is_paid("Jed Smith"));
    assert!(!fixture.is_selected("Jed"));
}

#[test]
fn rename_validates_the_new_name() {
    let mut state = ClubState::new();
    state.roster.add("Amy").unwrap();
    state.roster.add("Jed").unwrap();

    assert!(matches!(
        state.rename_player("Amy", "jed"),
        Err(LedgerError::DuplicatePlayer { .. })
    ));
    assert!(matches!(
        state.rename_player("Amy", "Amy 2"),
        Err(LedgerError::Validation(ValidationError::NameContainsDigit(_)))
    ));
    assert!(matches!(
        state.rename_player("Ghost", "Casper"),
        Err(LedgerError::NotFound { .. })
    ));
    // Renaming to itself is allowed.
    assert_eq!(state.rename_player("Amy", "amy").unwrap(), "Amy");
}

#[test]
fn deactivated_player_still_owes() {
    let mut state = ClubState::new();
    state.roster.add("Jed").unwrap();
    let id = state.fixtures.add("tigers cc", "01/06/2025", "12.50", false).unwrap();
    matchfees_core::attendance::add_attendance(&mut state, id, "Jed").unwrap();
    state.roster.deactivate("Jed").unwrap();

    let balances = matchfees_core::balance::balances(&state.roster, &state.fixtures);
    assert_eq!(balances["Jed"].due, money("12.5"));
}

#[test]
fn lookups_and_status_changes_accept_raw_names() {
    let mut state = ClubState::new();
    state.roster.add("mo salah").unwrap();

    assert!(state.roster.contains("mo salah"));
    assert_eq!(state.roster.get("  MO  salah").map(|p| p.name.as_str()), Some("Mo Salah"));

    state.roster.deactivate("mo salah").unwrap();
    assert_eq!(state.roster.status_of("mo salah"), Some(PlayerStatus::Inactive));
    state.roster.reactivate("MO SALAH").unwrap();
    assert_eq!(state.roster.status_of("Mo Salah"), Some(PlayerStatus::Active));

    let renamed = state.rename_player("mo salah", "mohamed salah").unwrap();
    assert_eq!(renamed, "Mohamed Salah");
    assert!(!state.roster.contains("Mo Salah"));
}
