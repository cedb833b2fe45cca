// Single-participant drafting state machine.
//
// A session cycles through condition selection, slot choice and player
// confirmation until every slot is filled. The same type backs each
// participant of a multiplayer draft, where round conditions and completion
// are driven by `MultiDraft` instead of the session itself.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chemistry::{compute_chemistry, ChemistryGrid};
use super::condition::{pick_candidates, CandidatePools, Condition};
use super::lineup::{Formation, Lineup, SlotRef};
use super::player::PlayerRecord;
use super::DraftError;

/// Where a session is in the pick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingCondition,
    AwaitingSlot,
    AwaitingPlayer,
    Complete,
}

/// One successful pick, for the draft log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickEvent {
    pub slot: SlotRef,
    pub player_name: String,
    /// The condition the pick was made under, if any.
    pub condition: Option<Condition>,
    /// Name of the player the pick displaced, if the slot was occupied.
    pub replaced: Option<String>,
    pub at: DateTime<Utc>,
}

/// What a successful confirm did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOutcome {
    /// The displaced occupant, if the slot was already filled.
    pub replaced: Option<PlayerRecord>,
    /// Whether this pick completed the draft.
    pub complete: bool,
}

/// Per-participant draft state.
#[derive(Debug, Clone)]
pub struct DraftSession {
    formation: Formation,
    lineup: Lineup,
    chemistry: ChemistryGrid,
    filled_count: usize,
    phase: Phase,
    active_condition: Option<Condition>,
    pending_slot: Option<SlotRef>,
    candidates: Vec<Condition>,
    /// Conditions are waived for the current round (empty pools) or for the
    /// whole session (free play).
    unconditioned: bool,
    conditions_enabled: bool,
    /// Standalone sessions complete themselves when the lineup fills;
    /// multiplayer completion is decided across all participants instead.
    auto_complete: bool,
    picks: Vec<PickEvent>,
}

impl DraftSession {
    /// A standalone session with rotating pick conditions.
    pub fn new(formation: Formation) -> Self {
        Self::build(formation, true, true)
    }

    /// A standalone session with conditions disabled ("free play").
    pub fn free_play(formation: Formation) -> Self {
        Self::build(formation, false, true)
    }

    /// A session owned by a multiplayer draft: round conditions and
    /// completion are managed by the caller.
    pub(crate) fn for_participant(formation: Formation) -> Self {
        Self::build(formation, true, false)
    }

    fn build(formation: Formation, conditions_enabled: bool, auto_complete: bool) -> Self {
        let lineup = Lineup::new(&formation);
        let chemistry = ChemistryGrid::zeroed(&formation);
        DraftSession {
            phase: if conditions_enabled {
                Phase::AwaitingCondition
            } else {
                Phase::AwaitingSlot
            },
            unconditioned: !conditions_enabled,
            formation,
            lineup,
            chemistry,
            filled_count: 0,
            active_condition: None,
            pending_slot: None,
            candidates: Vec::new(),
            conditions_enabled,
            auto_complete,
            picks: Vec::new(),
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn lineup(&self) -> &Lineup {
        &self.lineup
    }

    /// Chemistry grid derived from the current lineup.
    pub fn chemistry(&self) -> &ChemistryGrid {
        &self.chemistry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn filled_count(&self) -> usize {
        self.filled_count
    }

    pub fn total_slots(&self) -> usize {
        self.formation.total_slots()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn active_condition(&self) -> Option<&Condition> {
        self.active_condition.as_ref()
    }

    pub fn pending_slot(&self) -> Option<SlotRef> {
        self.pending_slot
    }

    /// The condition candidates offered for the current round.
    pub fn candidates(&self) -> &[Condition] {
        &self.candidates
    }

    /// Whether the current round accepts picks without a condition.
    pub fn is_unconditioned(&self) -> bool {
        self.unconditioned
    }

    /// All successful picks, in order.
    pub fn picks(&self) -> &[PickEvent] {
        &self.picks
    }

    // -- transitions --------------------------------------------------------

    /// Draw a fresh candidate set for the round.
    ///
    /// Only meaningful while awaiting a condition; mid-pick the round's
    /// existing set is returned unchanged. When every pool is empty the
    /// round becomes unconditioned and `EmptyCandidatePools` is surfaced —
    /// a recoverable signal, not a dead session.
    pub fn roll_candidates<R: Rng + ?Sized>(
        &mut self,
        pools: &CandidatePools,
        rng: &mut R,
    ) -> Result<&[Condition], DraftError> {
        match self.phase {
            Phase::Complete => Err(DraftError::DraftComplete),
            Phase::AwaitingCondition => {
                self.candidates = pick_candidates(pools, rng);
                if self.candidates.is_empty() {
                    self.unconditioned = true;
                    Err(DraftError::EmptyCandidatePools)
                } else {
                    self.unconditioned = false;
                    Ok(&self.candidates)
                }
            }
            _ => Ok(&self.candidates),
        }
    }

    /// Record the condition for this round and move on to slot choice.
    ///
    /// A silent no-op outside the condition phase (in particular once the
    /// draft is complete).
    pub fn select_condition(&mut self, condition: Condition) {
        self.set_round(Some(condition));
    }

    /// Install the round's condition (or the lack of one) and advance to
    /// slot choice. Shared with `MultiDraft`, which distributes one
    /// condition across all participants.
    pub(crate) fn set_round(&mut self, condition: Option<Condition>) {
        if self.phase != Phase::AwaitingCondition {
            return;
        }
        match condition {
            Some(c) => {
                debug!(condition = %c, "condition selected");
                self.active_condition = Some(c);
            }
            None => self.unconditioned = true,
        }
        self.phase = Phase::AwaitingSlot;
    }

    /// Choose (or re-choose) the slot the next player will occupy.
    pub fn choose_slot(&mut self, slot: SlotRef) -> Result<(), DraftError> {
        if self.phase == Phase::Complete {
            return Err(DraftError::DraftComplete);
        }
        if !self.lineup.contains(slot) {
            return Err(DraftError::SlotOutOfBounds {
                row: slot.row,
                index: slot.index,
            });
        }
        if self.active_condition.is_none() && !self.unconditioned {
            return Err(DraftError::ConditionRequired);
        }
        self.pending_slot = Some(slot);
        self.phase = Phase::AwaitingPlayer;
        Ok(())
    }

    /// Abandon the in-flight pick: back to slot choice, nothing mutated.
    pub fn abandon_pick(&mut self) {
        if self.phase != Phase::AwaitingPlayer {
            return;
        }
        self.pending_slot = None;
        self.phase = Phase::AwaitingSlot;
    }

    /// Validate and place a player into the pending slot.
    ///
    /// On a condition mismatch the session is left exactly as it was. On
    /// success the lineup is updated, chemistry recomputed, and the session
    /// either completes (standalone, lineup full) or starts the next round
    /// with condition, pending slot and candidates cleared.
    pub fn confirm_player(&mut self, record: PlayerRecord) -> Result<PickOutcome, DraftError> {
        if self.phase == Phase::Complete {
            return Err(DraftError::DraftComplete);
        }
        let slot = self.pending_slot.ok_or(DraftError::SlotNotChosen)?;
        if let Some(condition) = &self.active_condition {
            if !condition.accepts(&record) {
                return Err(DraftError::ConditionMismatch {
                    name: record.name,
                    condition: condition.to_string(),
                });
            }
        }

        let name = record.name.clone();
        let replaced = self.lineup.place(slot, record)?;
        self.filled_count = self.lineup.filled_count();
        self.chemistry = compute_chemistry(&self.lineup);
        self.picks.push(PickEvent {
            slot,
            player_name: name,
            condition: self.active_condition.clone(),
            replaced: replaced.as_ref().map(|p| p.name.clone()),
            at: Utc::now(),
        });

        let complete = self.auto_complete && self.lineup.is_full();
        if complete {
            self.finish();
        } else {
            self.next_round();
        }
        Ok(PickOutcome { replaced, complete })
    }

    /// End the draft now. The single-player "finish" affordance; also used
    /// by the multiplayer orchestrator once every lineup is full.
    pub fn finish(&mut self) {
        self.phase = Phase::Complete;
        self.active_condition = None;
        self.pending_slot = None;
        self.candidates.clear();
    }

    fn next_round(&mut self) {
        self.active_condition = None;
        self.pending_slot = None;
        self.candidates.clear();
        if self.conditions_enabled {
            self.phase = Phase::AwaitingCondition;
            self.unconditioned = false;
        } else {
            self.phase = Phase::AwaitingSlot;
            self.unconditioned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::condition::ConditionKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gunner(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.into(),
            club: Some("Arsenal".into()),
            league: Some("English Premier League".into()),
            nationality: Some("England".into()),
            photo: None,
        }
    }

    fn arsenal_pools() -> CandidatePools {
        CandidatePools {
            clubs: vec!["Arsenal".into()],
            leagues: vec![],
            nationalities: vec![],
        }
    }

    fn small_session() -> DraftSession {
        DraftSession::new(Formation::new(&[1, 1]).unwrap())
    }

    #[test]
    fn new_session_awaits_condition() {
        let session = small_session();
        assert_eq!(session.phase(), Phase::AwaitingCondition);
        assert_eq!(session.filled_count(), 0);
        assert_eq!(session.total_slots(), 2);
        assert_eq!(session.chemistry().total, 0);
    }

    #[test]
    fn slot_choice_requires_a_condition() {
        let mut session = small_session();
        assert_eq!(
            session.choose_slot(SlotRef::new(0, 0)),
            Err(DraftError::ConditionRequired)
        );
        assert_eq!(session.phase(), Phase::AwaitingCondition);
    }

    #[test]
    fn full_pick_cycle() {
        let mut session = small_session();
        let mut rng = StdRng::seed_from_u64(1);
        let cands = session.roll_candidates(&arsenal_pools(), &mut rng).unwrap();
        let condition = cands[0].clone();
        assert_eq!(condition.value, "Arsenal");

        session.select_condition(condition);
        assert_eq!(session.phase(), Phase::AwaitingSlot);

        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        assert_eq!(session.phase(), Phase::AwaitingPlayer);

        let outcome = session.confirm_player(gunner("Bukayo Saka")).unwrap();
        assert!(outcome.replaced.is_none());
        assert!(!outcome.complete);
        assert_eq!(session.filled_count(), 1);
        assert_eq!(session.phase(), Phase::AwaitingCondition);
        assert!(session.active_condition().is_none());
        assert!(session.pending_slot().is_none());
        assert!(session.candidates().is_empty());
        assert_eq!(session.picks().len(), 1);
    }

    #[test]
    fn mismatch_rejects_and_leaves_state_unchanged() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        session.choose_slot(SlotRef::new(0, 0)).unwrap();

        let outsider = PlayerRecord {
            name: "Jude Bellingham".into(),
            club: Some("Real Madrid".into()),
            league: Some("Spanish La Liga".into()),
            nationality: Some("England".into()),
            photo: None,
        };
        let err = session.confirm_player(outsider).unwrap_err();
        assert!(matches!(err, DraftError::ConditionMismatch { .. }));

        // Still mid-pick on the same slot, lineup untouched.
        assert_eq!(session.phase(), Phase::AwaitingPlayer);
        assert_eq!(session.pending_slot(), Some(SlotRef::new(0, 0)));
        assert_eq!(session.filled_count(), 0);
        assert!(session.picks().is_empty());
    }

    #[test]
    fn mismatch_is_canonicalization_aware() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "ARSENAL"));
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        // Case difference alone is not a mismatch.
        session.confirm_player(gunner("Declan Rice")).unwrap();
        assert_eq!(session.filled_count(), 1);
    }

    #[test]
    fn confirm_without_slot_is_rejected() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        assert_eq!(
            session.confirm_player(gunner("Saka")),
            Err(DraftError::SlotNotChosen)
        );
    }

    #[test]
    fn rechoosing_a_slot_overwrites_the_pending_one() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        session.choose_slot(SlotRef::new(1, 0)).unwrap();
        assert_eq!(session.pending_slot(), Some(SlotRef::new(1, 0)));

        session.confirm_player(gunner("Saka")).unwrap();
        assert!(session.lineup().get(SlotRef::new(1, 0)).is_some());
        assert!(session.lineup().get(SlotRef::new(0, 0)).is_none());
    }

    #[test]
    fn out_of_bounds_slot_is_rejected() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        assert_eq!(
            session.choose_slot(SlotRef::new(2, 0)),
            Err(DraftError::SlotOutOfBounds { row: 2, index: 0 })
        );
    }

    #[test]
    fn abandoning_a_pick_returns_to_slot_choice() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        let before = session.lineup().clone();

        session.abandon_pick();
        assert_eq!(session.phase(), Phase::AwaitingSlot);
        assert!(session.pending_slot().is_none());
        assert_eq!(session.lineup(), &before);
        // The condition survives; only the slot choice was abandoned.
        assert!(session.active_condition().is_some());
    }

    #[test]
    fn standalone_session_completes_when_full() {
        let mut session = small_session();
        for (row, name) in [(0, "Saka"), (1, "Rice")] {
            session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
            session.choose_slot(SlotRef::new(row, 0)).unwrap();
            let outcome = session.confirm_player(gunner(name)).unwrap();
            assert_eq!(outcome.complete, row == 1);
        }
        assert!(session.is_complete());

        // Terminal: further intents are rejected or ignored.
        assert_eq!(
            session.choose_slot(SlotRef::new(0, 0)),
            Err(DraftError::DraftComplete)
        );
        assert_eq!(
            session.confirm_player(gunner("Late Pick")),
            Err(DraftError::DraftComplete)
        );
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        assert!(session.active_condition().is_none());
    }

    #[test]
    fn chemistry_updates_after_each_pick() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        session.confirm_player(gunner("Saka")).unwrap();
        assert_eq!(session.chemistry().total, 0);

        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        session.choose_slot(SlotRef::new(1, 0)).unwrap();
        session.confirm_player(gunner("Rice")).unwrap();
        // Club pair (1) + nationality pair (1) = 2 per slot.
        assert_eq!(session.chemistry().total, 4);
    }

    #[test]
    fn empty_pools_enable_unconditioned_round() {
        let mut session = small_session();
        let mut rng = StdRng::seed_from_u64(3);
        let err = session
            .roll_candidates(&CandidatePools::default(), &mut rng)
            .unwrap_err();
        assert_eq!(err, DraftError::EmptyCandidatePools);
        assert!(session.is_unconditioned());

        // Picks proceed without a condition.
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        session.confirm_player(gunner("Saka")).unwrap();
        assert_eq!(session.filled_count(), 1);
    }

    #[test]
    fn free_play_never_asks_for_conditions() {
        let mut session = DraftSession::free_play(Formation::new(&[1, 1]).unwrap());
        assert_eq!(session.phase(), Phase::AwaitingSlot);
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        session.confirm_player(gunner("Saka")).unwrap();
        assert_eq!(session.phase(), Phase::AwaitingSlot);
        assert!(session.is_unconditioned());
    }

    #[test]
    fn finish_early_is_terminal() {
        let mut session = small_session();
        session.finish();
        assert!(session.is_complete());
        assert_eq!(
            session.choose_slot(SlotRef::new(0, 0)),
            Err(DraftError::DraftComplete)
        );
    }

    #[test]
    fn roll_mid_pick_keeps_the_current_set() {
        let mut session = small_session();
        let mut rng = StdRng::seed_from_u64(5);
        session.roll_candidates(&arsenal_pools(), &mut rng).unwrap();
        let before = session.candidates().to_vec();

        session.select_condition(before[0].clone());
        let during = session
            .roll_candidates(&arsenal_pools(), &mut rng)
            .unwrap()
            .to_vec();
        assert_eq!(during, before);
    }

    #[test]
    fn replacement_is_recorded_in_the_log() {
        let mut session = small_session();
        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        session.confirm_player(gunner("Saka")).unwrap();

        session.select_condition(Condition::new(ConditionKind::Club, "Arsenal"));
        session.choose_slot(SlotRef::new(0, 0)).unwrap();
        let outcome = session.confirm_player(gunner("Martinelli")).unwrap();
        assert_eq!(outcome.replaced.unwrap().name, "Saka");
        assert_eq!(session.filled_count(), 1);
        assert_eq!(session.picks()[1].replaced.as_deref(), Some("Saka"));
    }
}
