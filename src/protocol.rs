// Intents and updates exchanged between the driver surface and the
// application loop. Everything here is serde-serializable so a surface can
// speak JSON lines without knowing any core types.

use serde::{Deserialize, Serialize};

use crate::chemistry::ChemistryGrid;
use crate::draft::condition::Condition;
use crate::draft::lineup::SlotRef;
use crate::draft::session::Phase;

/// What the surface asks the core to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserIntent {
    /// Pick one of the offered condition candidates by index.
    SelectCondition { participant: usize, candidate: usize },
    /// Choose (or re-choose) the slot the next player will occupy.
    ChooseSlot {
        participant: usize,
        row: usize,
        index: usize,
    },
    /// Abandon the in-flight pick.
    AbandonPick { participant: usize },
    /// Ask for player-name suggestions for a search prefix.
    QueryPlayers { participant: usize, prefix: String },
    /// Resolve a player by name and place them into the pending slot.
    ConfirmPlayer { participant: usize, name: String },
    /// End a single-player draft early.
    Finish,
    Quit,
}

/// What the core pushes back to the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiUpdate {
    /// Fresh state after a mutation (or on startup).
    Snapshot(GameSnapshot),
    /// Player-name suggestions for the latest search.
    Suggestions {
        participant: usize,
        names: Vec<String>,
    },
    /// An intent was rejected; state is unchanged.
    Rejected { message: String },
}

/// One participant's visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub name: String,
    /// Player names per slot; `None` for empty slots.
    pub lineup: Vec<Vec<Option<String>>>,
    pub chemistry: ChemistryGrid,
    pub filled: usize,
    pub total_slots: usize,
    pub phase: Phase,
    pub pending_slot: Option<SlotRef>,
}

/// The whole game's visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub participants: Vec<ParticipantSnapshot>,
    pub current_turn: usize,
    pub picker_index: usize,
    /// Condition candidates on offer for the current round.
    pub candidates: Vec<Condition>,
    pub active_condition: Option<Condition>,
    pub complete: bool,
}
