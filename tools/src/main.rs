//! fees-runner: headless front end for the match fees ledger.
//!
//! Usage:
//!   fees-runner --data club.json                    # print a summary
//!   fees-runner --data club.json --window all
//!   fees-runner --data club.json --ipc-mode         # JSON lines on stdin/stdout
//!   fees-runner --config ledger.json --today 2025-06-15

use anyhow::Result;
use chrono::NaiveDate;
use matchfees_core::{
    clock::{Clock, FixedClock, SystemClock},
    command::LedgerCommand,
    config::LedgerConfig,
    fixture::Fixture,
    roster::PlayerStatus,
    store::JsonFileStore,
    types::{FixtureId, Money, PlayerName},
    window::DateWindow,
    Ledger, LedgerError,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    State,
    Balances,
    Outstanding,
    Fixtures {
        #[serde(default)]
        window: DateWindow,
    },
    ValidAmounts {
        player: String,
    },
    Command {
        command: LedgerCommand,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct FixtureView {
    id: FixtureId,
    opponent: String,
    date: NaiveDate,
    fee: Money,
    selected: Vec<PlayerName>,
    paid: Vec<PlayerName>,
}

impl From<&Fixture> for FixtureView {
    fn from(f: &Fixture) -> Self {
        Self {
            id: f.id(),
            opponent: f.opponent().to_string(),
            date: f.date(),
            fee: f.fee(),
            selected: f.selected().iter().cloned().collect(),
            paid: f.paid().iter().cloned().collect(),
        }
    }
}

#[derive(serde::Serialize)]
struct PlayerView {
    name: PlayerName,
    status: PlayerStatus,
}

#[derive(serde::Serialize)]
struct UiState {
    club_name: String,
    today: NaiveDate,
    dirty: bool,
    players: Vec<PlayerView>,
    fixtures: Vec<FixtureView>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match arg_value(&args, "--config") {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::default(),
    };
    if let Some(path) = arg_value(&args, "--data") {
        config.snapshot_path = path.into();
    }
    let window: DateWindow = match arg_value(&args, "--window") {
        Some(w) => serde_json::from_value(serde_json::Value::String(w.to_string()))?,
        None => DateWindow::RecentAndUpcoming,
    };
    let clock: Box<dyn Clock> = match arg_value(&args, "--today") {
        Some(d) => Box::new(FixedClock::new(d.parse::<NaiveDate>()?)),
        None => Box::new(SystemClock),
    };

    log::info!("fees-runner using {}", config.snapshot_path.display());
    let store = JsonFileStore::open(config.snapshot_path.clone());
    let mut ledger = Ledger::with_store(config, Box::new(store), clock);

    if ipc_mode {
        run_ipc_loop(&mut ledger)?;
    } else {
        print_summary(&ledger, window);
    }

    Ok(())
}

fn run_ipc_loop(ledger: &mut Ledger) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match request {
            IpcRequest::Quit => break,
            IpcRequest::State => serde_json::json!({ "ok": build_ui_state(ledger) }),
            IpcRequest::Balances => serde_json::json!({ "ok": ledger.balances() }),
            IpcRequest::Outstanding => serde_json::json!({ "ok": ledger.outstanding() }),
            IpcRequest::Fixtures { window } => {
                let fixtures: Vec<FixtureView> = ledger
                    .fixtures_in_window(window)
                    .into_iter()
                    .map(FixtureView::from)
                    .collect();
                serde_json::json!({ "ok": fixtures })
            }
            IpcRequest::ValidAmounts { player } => {
                serde_json::json!({ "ok": ledger.valid_amounts(&player) })
            }
            IpcRequest::Command { command } => match ledger.execute(command) {
                Ok(events) => serde_json::json!({ "ok": events }),
                Err(e) => error_reply(&e),
            },
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn error_reply(error: &LedgerError) -> serde_json::Value {
    match error {
        LedgerError::Allocation(rejection) => serde_json::json!({
            "error": error.to_string(),
            "payable_fixtures": rejection.payable_fixtures,
            "remainder": rejection.remainder,
            "valid_amounts": rejection.valid_amounts,
        }),
        LedgerError::DuplicateFixture { .. } => serde_json::json!({
            "error": error.to_string(),
            "confirm_with": "allow_duplicate",
        }),
        _ => serde_json::json!({
            "error": error.to_string(),
            "recoverable": error.is_recoverable(),
        }),
    }
}

fn build_ui_state(ledger: &Ledger) -> UiState {
    let state = ledger.state();
    UiState {
        club_name: state.club_name.clone(),
        today: ledger.today(),
        dirty: ledger.is_dirty(),
        players: state
            .roster
            .all_players()
            .map(|p| PlayerView { name: p.name.clone(), status: p.status })
            .collect(),
        fixtures: state.fixtures.sorted_by_date().into_iter().map(FixtureView::from).collect(),
    }
}

fn print_summary(ledger: &Ledger, window: DateWindow) {
    let state = ledger.state();
    let currency = &ledger.config().currency_symbol;
    let club = if state.club_name.is_empty() { "(unnamed club)" } else { state.club_name.as_str() };

    println!("=== {club}: match fees ===");
    println!("  today:    {}", ledger.today());
    println!("  players:  {} ({} active)", state.roster.len(), state.roster.active_players().count());
    println!("  fixtures: {}", state.fixtures.len());
    println!();

    println!("=== Fixtures ({}) ===", window.label());
    let fixtures = ledger.fixtures_in_window(window);
    if fixtures.is_empty() {
        println!("  (No fixtures in this window)");
    }
    for f in fixtures {
        println!(
            "  {} {club} vs {} {} Match Fee {currency}{:.2} ({} selected, {} paid)",
            f.id(),
            f.opponent(),
            f.date().format("%d-%b-%Y"),
            f.fee(),
            f.selected().len(),
            f.paid().len(),
        );
    }
    println!();

    println!("=== Outstanding ===");
    let outstanding = ledger.outstanding();
    if outstanding.is_empty() {
        println!("  (Nobody owes anything)");
    }
    for (name, balance) in &outstanding {
        println!(
            "  {name:<24} owed {currency}{:.2}  paid {currency}{:.2}  due {currency}{:.2}",
            balance.owed, balance.paid, balance.due
        );
    }
    let totals = ledger.totals();
    println!();
    println!(
        "  club total: owed {currency}{:.2}  paid {currency}{:.2}  due {currency}{:.2}",
        totals.owed, totals.paid, totals.due
    );
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
