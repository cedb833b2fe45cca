// Multiplayer turn and condition orchestration.
//
// Participants draft in list order against one shared condition per round.
// The current picker selects that condition; when the turn wraps back
// around to them, the picker role advances, the condition clears and a
// fresh candidate set is drawn. One used-name set spans all participants.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info};

use crate::canon::canonicalize;
use super::condition::{pick_candidates, CandidatePools, Condition};
use super::lineup::{Formation, SlotRef};
use super::player::PlayerRecord;
use super::session::{DraftSession, Phase};
use super::DraftError;

/// What a successful multiplayer confirm did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPickOutcome {
    /// The displaced occupant, if the slot was already filled.
    pub replaced: Option<PlayerRecord>,
    /// Whether every participant's lineup is now full.
    pub complete: bool,
    /// Whether the turn wrapped and a new picker/condition round began.
    pub round_rotated: bool,
}

/// A draft shared by two or more participants.
#[derive(Debug, Clone)]
pub struct MultiDraft {
    participants: Vec<String>,
    sessions: Vec<DraftSession>,
    turn_index: usize,
    picker_index: usize,
    shared_condition: Option<Condition>,
    candidates: Vec<Condition>,
    /// The current round waives conditions because the pools are dry.
    unconditioned_round: bool,
    /// Canonical names currently occupying a slot anywhere in the draft.
    used_names: HashSet<String>,
    pools: CandidatePools,
    complete: bool,
}

impl MultiDraft {
    /// Start a multiplayer draft. Every participant gets an empty lineup of
    /// the same formation; participant 0 opens as both picker and first to
    /// pick.
    pub fn new(participants: Vec<String>, formation: Formation, pools: CandidatePools) -> Self {
        let sessions = participants
            .iter()
            .map(|_| DraftSession::for_participant(formation.clone()))
            .collect();
        MultiDraft {
            participants,
            sessions,
            turn_index: 0,
            picker_index: 0,
            shared_condition: None,
            candidates: Vec::new(),
            unconditioned_round: false,
            used_names: HashSet::new(),
            pools,
            complete: false,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Index of the participant whose turn it is to pick a player.
    pub fn current_turn(&self) -> usize {
        self.turn_index
    }

    /// Index of the participant who selects this round's condition.
    pub fn picker_index(&self) -> usize {
        self.picker_index
    }

    pub fn shared_condition(&self) -> Option<&Condition> {
        self.shared_condition.as_ref()
    }

    /// The condition candidates offered to the current picker.
    pub fn candidates(&self) -> &[Condition] {
        &self.candidates
    }

    pub fn session(&self, participant: usize) -> Option<&DraftSession> {
        self.sessions.get(participant)
    }

    pub fn sessions(&self) -> &[DraftSession] {
        &self.sessions
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether a player name is held by any slot in the draft.
    pub fn is_used(&self, name: &str) -> bool {
        self.used_names.contains(&canonicalize(name))
    }

    // -- transitions --------------------------------------------------------

    /// Draw the candidate set for a new round. A no-op mid-round (the
    /// shared condition is already fixed).
    pub fn roll_candidates<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&[Condition], DraftError> {
        if self.complete {
            return Err(DraftError::DraftComplete);
        }
        if self.shared_condition.is_some() {
            return Ok(&self.candidates);
        }
        self.candidates = pick_candidates(&self.pools, rng);
        if self.candidates.is_empty() {
            self.unconditioned_round = true;
            Err(DraftError::EmptyCandidatePools)
        } else {
            self.unconditioned_round = false;
            Ok(&self.candidates)
        }
    }

    /// The round picker fixes the shared condition.
    ///
    /// Silent no-op when the draft is complete, the caller is not the
    /// picker, or a condition is already in force — mirroring the session's
    /// tolerance for stray condition clicks.
    pub fn select_condition(&mut self, participant: usize, condition: Condition) {
        if self.complete || participant != self.picker_index || self.shared_condition.is_some() {
            return;
        }
        debug!(participant, condition = %condition, "shared condition selected");
        self.shared_condition = Some(condition);
    }

    /// The current participant chooses (or re-chooses) a slot.
    pub fn choose_slot(&mut self, participant: usize, slot: SlotRef) -> Result<(), DraftError> {
        self.check_turn(participant)?;
        if self.shared_condition.is_none() && !self.unconditioned_round {
            return Err(DraftError::ConditionRequired);
        }
        let session = &mut self.sessions[participant];
        if session.phase() == Phase::AwaitingCondition {
            session.set_round(self.shared_condition.clone());
        }
        session.choose_slot(slot)
    }

    /// The current participant abandons their in-flight pick. Out-of-turn
    /// calls are ignored.
    pub fn abandon_pick(&mut self, participant: usize) {
        if self.complete || participant != self.turn_index {
            return;
        }
        self.sessions[participant].abandon_pick();
    }

    /// Validate and place a player for the current participant, then
    /// advance the turn (and, on wrap-around, the picker and condition).
    ///
    /// `rng` draws the next round's candidates when the rotation happens.
    pub fn confirm_player<R: Rng + ?Sized>(
        &mut self,
        participant: usize,
        record: PlayerRecord,
        rng: &mut R,
    ) -> Result<MultiPickOutcome, DraftError> {
        self.check_turn(participant)?;

        let key = canonicalize(&record.name);
        if self.used_names.contains(&key) {
            return Err(DraftError::PlayerUnavailable { name: record.name });
        }

        let outcome = self.sessions[participant].confirm_player(record)?;
        if let Some(previous) = &outcome.replaced {
            self.used_names.remove(&canonicalize(&previous.name));
        }
        self.used_names.insert(key);

        if self.sessions.iter().all(|s| s.lineup().is_full()) {
            info!("draft complete: every lineup is full");
            self.complete = true;
            for session in &mut self.sessions {
                session.finish();
            }
            return Ok(MultiPickOutcome {
                replaced: outcome.replaced,
                complete: true,
                round_rotated: false,
            });
        }

        let next = (self.turn_index + 1) % self.sessions.len();
        let mut round_rotated = false;
        if next == self.picker_index {
            self.picker_index = (self.picker_index + 1) % self.sessions.len();
            self.shared_condition = None;
            round_rotated = true;
            self.candidates = pick_candidates(&self.pools, rng);
            self.unconditioned_round = self.candidates.is_empty();
            debug!(picker = self.picker_index, "round rotated");
        }
        self.turn_index = next;

        Ok(MultiPickOutcome {
            replaced: outcome.replaced,
            complete: false,
            round_rotated,
        })
    }

    fn check_turn(&self, participant: usize) -> Result<(), DraftError> {
        if self.complete {
            return Err(DraftError::DraftComplete);
        }
        if participant >= self.sessions.len() || participant != self.turn_index {
            return Err(DraftError::NotYourTurn { participant });
        }
        Ok(())
    }
}
