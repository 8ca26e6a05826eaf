//! The ledger engine: owns the live ClubState for one session.
//!
//! RULES:
//!   - State is loaded once at startup and saved whole after every
//!     successful mutation.
//!   - A command that fails validation changes nothing and saves nothing.
//!   - A failed save is reported, never swallowed. The in-memory state
//!     keeps the change and the engine stays dirty until a save succeeds.
//!   - Wiping needs the exact confirmation token from the config.

use crate::{
    allocator,
    attendance,
    balance::{self, Balance},
    clock::{Clock, SystemClock},
    command::LedgerCommand,
    config::LedgerConfig,
    error::{LedgerError, LedgerResult},
    event::LedgerEvent,
    fixture::{Fixture, FixtureField},
    normalize::normalize,
    snapshot::ClubSnapshot,
    state::ClubState,
    store::{load_state, JsonFileStore, StateStore},
    types::{Money, PlayerName},
    window::{self, DateWindow},
};
use chrono::NaiveDate;
use indexmap::IndexMap;

pub struct Ledger {
    state:  ClubState,
    store:  Box<dyn StateStore>,
    clock:  Box<dyn Clock>,
    config: LedgerConfig,
    dirty:  bool,
}

impl Ledger {
    /// Open the snapshot file named in the config, using the system clock.
    pub fn open(config: LedgerConfig) -> Self {
        let store = JsonFileStore::open(config.snapshot_path.clone());
        Self::with_store(config, Box::new(store), Box::new(SystemClock))
    }

    /// Load from any store. A missing or unreadable snapshot gives an empty state.
    pub fn with_store(
        config: LedgerConfig,
        store: Box<dyn StateStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let state = load_state(store.as_ref(), config.century_pivot);
        log::info!(
            "Loaded '{}' from {}: {} players, {} fixtures",
            state.club_name,
            store.describe(),
            state.roster.len(),
            state.fixtures.len()
        );
        Self { state, store, clock, config, dirty: false }
    }

    // ── Mutations ──────────────────────────────────────────────

    /// Apply one command, then persist the whole state.
    pub fn execute(&mut self, command: LedgerCommand) -> LedgerResult<Vec<LedgerEvent>> {
        log::debug!("Executing {}", command.name());
        // A wipe removes the snapshot; saving afterwards would recreate it.
        let wipes = matches!(command, LedgerCommand::WipeAll { .. });

        let events = self.apply(command)?;
        for event in &events {
            log::info!("{event}");
        }
        if !wipes {
            self.persist()?;
        }
        Ok(events)
    }

    fn apply(&mut self, command: LedgerCommand) -> LedgerResult<Vec<LedgerEvent>> {
        let state = &mut self.state;
        let event = match command {
            LedgerCommand::SetClubName { name } => LedgerEvent::ClubNamed {
                name: state.set_club_name(&name)?,
            },
            LedgerCommand::AddPlayer { name } => LedgerEvent::PlayerAdded {
                name: state.roster.add(&name)?,
            },
            LedgerCommand::RenamePlayer { old, new } => {
                let old = normalize(&old);
                let new = state.rename_player(&old, &new)?;
                LedgerEvent::PlayerRenamed { old, new }
            }
            LedgerCommand::DeactivatePlayer { name } => {
                let name = normalize(&name);
                state.roster.deactivate(&name)?;
                LedgerEvent::PlayerDeactivated { name }
            }
            LedgerCommand::ReactivatePlayer { name } => {
                let name = normalize(&name);
                state.roster.reactivate(&name)?;
                LedgerEvent::PlayerReactivated { name }
            }
            LedgerCommand::AddFixture { opponent, date, fee, allow_duplicate } => {
                let id = state.fixtures.add(&opponent, &date, &fee, allow_duplicate)?;
                let fixture = state
                    .fixtures
                    .get(id)
                    .ok_or_else(|| LedgerError::fixture_not_found(id))?;
                let duplicate = state
                    .fixtures
                    .all()
                    .any(|f| f.id() != id && f.opponent() == fixture.opponent() && f.date() == fixture.date());
                LedgerEvent::FixtureAdded {
                    fixture: id,
                    opponent: fixture.opponent().to_string(),
                    date: fixture.date(),
                    fee: fixture.fee(),
                    duplicate,
                }
            }
            LedgerCommand::EditFixture { fixture, field, value } => {
                state.fixtures.edit(fixture, field, &value)?;
                let edited = state
                    .fixtures
                    .get(fixture)
                    .ok_or_else(|| LedgerError::fixture_not_found(fixture))?;
                let value = match field {
                    FixtureField::Opponent => edited.opponent().to_string(),
                    FixtureField::Date     => edited.date().to_string(),
                    FixtureField::Fee      => edited.fee().to_string(),
                };
                LedgerEvent::FixtureEdited { fixture, field, value }
            }
            LedgerCommand::DeleteFixture { fixture } => {
                let removed = state.fixtures.delete(fixture)?;
                LedgerEvent::FixtureDeleted {
                    fixture,
                    opponent: removed.opponent().to_string(),
                    date: removed.date(),
                    selected: removed.selected().len(),
                }
            }
            LedgerCommand::AddAttendance { fixture, player } => LedgerEvent::AttendanceAdded {
                fixture,
                player: attendance::add_attendance(state, fixture, &player)?,
            },
            LedgerCommand::RemoveAttendance { fixture, player } => {
                let payment_revoked = attendance::remove_attendance(state, fixture, &player)?;
                LedgerEvent::AttendanceRemoved {
                    fixture,
                    player: normalize(&player),
                    payment_revoked,
                }
            }
            LedgerCommand::Assign { players, fixtures, mode } => {
                let report = attendance::assign(state, &players, &fixtures, mode)?;
                LedgerEvent::AttendanceAssigned {
                    mode,
                    changed: report.changed,
                    skipped: report.skipped,
                    revoked_payments: report.revoked_payments,
                }
            }
            LedgerCommand::AllocatePayment { player, amount } => {
                let fixtures = allocator::allocate_payment(state, &player, amount)?;
                let player = normalize(&player);
                let remaining_due = balance::balance_of(&state.fixtures, &player).due;
                LedgerEvent::PaymentAllocated { player, amount, fixtures, remaining_due }
            }
            LedgerCommand::WipeAll { confirmation } => {
                self.wipe_all(&confirmation)?;
                LedgerEvent::DataWiped
            }
        };
        Ok(vec![event])
    }

    /// Save the whole state now.
    pub fn persist(&mut self) -> LedgerResult<()> {
        let snapshot = ClubSnapshot::from_state(&self.state);
        match self.store.save(&snapshot) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                log::error!("Changes NOT saved to {}: {e}", self.store.describe());
                Err(e)
            }
        }
    }

    /// Delete the snapshot and clear memory. Irreversible.
    pub fn wipe_all(&mut self, confirmation: &str) -> LedgerResult<()> {
        if confirmation != self.config.wipe_confirmation {
            return Err(LedgerError::WipeNotConfirmed);
        }
        self.store.wipe()?;
        self.state.clear();
        self.dirty = false;
        log::warn!("All club data wiped from {}", self.store.describe());
        Ok(())
    }

    /// True when the last save failed and memory holds unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn state(&self) -> &ClubState {
        &self.state
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn fixtures_in_window(&self, window: DateWindow) -> Vec<&Fixture> {
        window::filter(self.state.fixtures.all(), self.today(), window)
    }

    pub fn balances(&self) -> IndexMap<PlayerName, Balance> {
        balance::balances(&self.state.roster, &self.state.fixtures)
    }

    pub fn outstanding(&self) -> Vec<(PlayerName, Balance)> {
        balance::outstanding(&self.state.roster, &self.state.fixtures)
    }

    pub fn totals(&self) -> Balance {
        balance::totals(&self.state.roster, &self.state.fixtures)
    }

    pub fn balance_of(&self, player: &str) -> LedgerResult<Balance> {
        let name = normalize(player);
        if !self.state.roster.contains(&name) {
            return Err(LedgerError::player_not_found(&name));
        }
        Ok(balance::balance_of(&self.state.fixtures, &name))
    }

    pub fn valid_amounts(&self, player: &str) -> Vec<Money> {
        allocator::valid_amounts(&self.state, player)
    }

    pub fn unpaid_fixtures(&self, player: &str) -> Vec<&Fixture> {
        allocator::unpaid_fixtures(&self.state, &normalize(player))
    }
}
