//! Match fees ledger for a single sports club.
//!
//! The roster, fixtures, attendance and the payment allocator live here.
//! Rendering and prompting belong to the caller; persistence sits behind
//! the `StateStore` trait.

pub mod allocator;
pub mod attendance;
pub mod balance;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod fixture;
pub mod normalize;
pub mod roster;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod types;
pub mod window;

pub use engine::Ledger;
pub use error::{LedgerError, LedgerResult};
pub use normalize::normalize;
pub use state::ClubState;
