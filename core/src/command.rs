use crate::{
    attendance::AssignMode,
    fixture::FixtureField,
    types::{FixtureId, Money, PlayerName},
};
use serde::{Deserialize, Deserializer, Serialize};

/// Every mutation the operator can request.
/// Each one is applied whole and followed by a snapshot save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum LedgerCommand {
    // ── Club & roster ─────────────────────────────
    SetClubName { name: String },
    AddPlayer { name: String },
    RenamePlayer { old: PlayerName, new: String },
    DeactivatePlayer { name: PlayerName },
    ReactivatePlayer { name: PlayerName },

    // ── Fixtures ──────────────────────────────────
    AddFixture {
        opponent: String,
        /// DD/MM/YY or DD/MM/YYYY.
        date: String,
        #[serde(deserialize_with = "text_or_number")]
        fee: String,
        #[serde(default)]
        allow_duplicate: bool,
    },
    EditFixture {
        fixture: FixtureId,
        field: FixtureField,
        #[serde(deserialize_with = "text_or_number")]
        value: String,
    },
    DeleteFixture { fixture: FixtureId },

    // ── Attendance ────────────────────────────────
    AddAttendance { fixture: FixtureId, player: PlayerName },
    RemoveAttendance { fixture: FixtureId, player: PlayerName },
    Assign {
        players: Vec<PlayerName>,
        fixtures: Vec<FixtureId>,
        mode: AssignMode,
    },

    // ── Payments ──────────────────────────────────
    AllocatePayment { player: PlayerName, amount: Money },

    // ── Irreversible ──────────────────────────────
    WipeAll { confirmation: String },
}

impl LedgerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetClubName { .. }      => "set_club_name",
            Self::AddPlayer { .. }        => "add_player",
            Self::RenamePlayer { .. }     => "rename_player",
            Self::DeactivatePlayer { .. } => "deactivate_player",
            Self::ReactivatePlayer { .. } => "reactivate_player",
            Self::AddFixture { .. }       => "add_fixture",
            Self::EditFixture { .. }      => "edit_fixture",
            Self::DeleteFixture { .. }    => "delete_fixture",
            Self::AddAttendance { .. }    => "add_attendance",
            Self::RemoveAttendance { .. } => "remove_attendance",
            Self::Assign { .. }           => "assign",
            Self::AllocatePayment { .. }  => "allocate_payment",
            Self::WipeAll { .. }          => "wipe_all",
        }
    }
}

/// Operator input arrives as text, but JSON clients often send fees as numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
