// Drafting core: lineup bookkeeping, conditions and the session state
// machines for single- and multi-participant drafts.

pub mod condition;
pub mod lineup;
pub mod multi;
pub mod player;
pub mod session;

use thiserror::Error;

/// Rejections surfaced by the drafting core.
///
/// All variants are recoverable: the session stays in its current state and
/// the caller is free to retry with a different intent. Nothing in here
/// corrupts an existing lineup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("a condition must be selected before choosing a slot")]
    ConditionRequired,

    #[error("`{name}` does not match the active condition ({condition})")]
    ConditionMismatch { name: String, condition: String },

    #[error("`{name}` has already been drafted")]
    PlayerUnavailable { name: String },

    #[error("slot ({row}, {index}) is outside the formation")]
    SlotOutOfBounds { row: usize, index: usize },

    #[error("choose a slot before confirming a player")]
    SlotNotChosen,

    #[error("it is not participant {participant}'s turn")]
    NotYourTurn { participant: usize },

    #[error("the draft is complete")]
    DraftComplete,

    #[error("no condition candidates could be drawn from the pools")]
    EmptyCandidatePools,
}
