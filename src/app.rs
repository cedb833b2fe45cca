// Application state and orchestration logic.
//
// The event loop that coordinates surface intents with asynchronous player
// lookups. Session mutations happen only here, on one task, so at most one
// confirm can commit at a time. Lookups run as spawned tasks; each carries
// a generation number and events from superseded generations are discarded,
// so only the response to the most recent request for a pending slot can
// mutate state.

use std::sync::Arc;

use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{Config, GameMode};
use crate::draft::condition::CandidatePools;
use crate::draft::lineup::SlotRef;
use crate::draft::multi::MultiDraft;
use crate::draft::player::PlayerRecord;
use crate::draft::session::DraftSession;
use crate::draft::DraftError;
use crate::protocol::{GameSnapshot, ParticipantSnapshot, UiUpdate, UserIntent};
use crate::provider::{LookupError, PlayerLookup};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Events sent back from spawned lookup tasks.
#[derive(Debug)]
pub enum LookupEvent {
    /// Result of a `search_players` call.
    Suggestions {
        generation: u64,
        participant: usize,
        result: Result<Vec<String>, LookupError>,
    },
    /// Result of a `lookup_player` call made to confirm a pick.
    Resolved {
        generation: u64,
        participant: usize,
        result: Result<PlayerRecord, LookupError>,
    },
}

/// The running draft, solo or multiplayer.
pub enum GameSession {
    Solo(DraftSession),
    Multi(MultiDraft),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    participants: Vec<String>,
    session: GameSession,
    pools: CandidatePools,
    rng: StdRng,
    provider: Arc<dyn PlayerLookup>,
    /// Sender lookup tasks use to report back into the event loop.
    lookup_tx: mpsc::Sender<LookupEvent>,
    /// Monotonically increasing counter identifying lookup tasks. Events
    /// from earlier generations are stale and ignored.
    lookup_generation: u64,
    /// The search allowed to publish suggestions, if any.
    current_search: Option<(usize, u64)>,
    /// The confirm lookup allowed to mutate state, if any.
    current_confirm: Option<(usize, u64)>,
}

impl AppState {
    /// Build the session from config and draw the opening candidate set.
    pub fn new(
        config: &Config,
        pools: CandidatePools,
        provider: Arc<dyn PlayerLookup>,
        lookup_tx: mpsc::Sender<LookupEvent>,
        mut rng: StdRng,
    ) -> Self {
        let session = match config.mode {
            GameMode::Single => {
                let mut session = DraftSession::new(config.formation.clone());
                if let Err(e) = session.roll_candidates(&pools, &mut rng) {
                    warn!("starting without conditions: {e}");
                }
                GameSession::Solo(session)
            }
            GameMode::Free => GameSession::Solo(DraftSession::free_play(config.formation.clone())),
            GameMode::Multi => {
                let mut draft = MultiDraft::new(
                    config.participants.clone(),
                    config.formation.clone(),
                    pools.clone(),
                );
                if let Err(e) = draft.roll_candidates(&mut rng) {
                    warn!("starting without conditions: {e}");
                }
                GameSession::Multi(draft)
            }
        };

        AppState {
            participants: config.participants.clone(),
            session,
            pools,
            rng,
            provider,
            lookup_tx,
            lookup_generation: 0,
            current_search: None,
            current_confirm: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Build a snapshot of everything the surface renders.
    pub fn snapshot(&self) -> GameSnapshot {
        fn participant_snapshot(name: &str, session: &DraftSession) -> ParticipantSnapshot {
            ParticipantSnapshot {
                name: name.to_string(),
                lineup: session
                    .lineup()
                    .rows()
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|cell| cell.as_ref().map(|p| p.name.clone()))
                            .collect()
                    })
                    .collect(),
                chemistry: session.chemistry().clone(),
                filled: session.filled_count(),
                total_slots: session.total_slots(),
                phase: session.phase(),
                pending_slot: session.pending_slot(),
            }
        }

        match &self.session {
            GameSession::Solo(session) => GameSnapshot {
                participants: vec![participant_snapshot(&self.participants[0], session)],
                current_turn: 0,
                picker_index: 0,
                candidates: session.candidates().to_vec(),
                active_condition: session.active_condition().cloned(),
                complete: session.is_complete(),
            },
            GameSession::Multi(draft) => GameSnapshot {
                participants: self
                    .participants
                    .iter()
                    .zip(draft.sessions())
                    .map(|(name, session)| participant_snapshot(name, session))
                    .collect(),
                current_turn: draft.current_turn(),
                picker_index: draft.picker_index(),
                candidates: draft.candidates().to_vec(),
                active_condition: draft.shared_condition().cloned(),
                complete: draft.is_complete(),
            },
        }
    }

    /// Whether `participant` currently has a pending slot awaiting a player.
    fn has_pending_slot(&self, participant: usize) -> bool {
        match &self.session {
            GameSession::Solo(session) => participant == 0 && session.pending_slot().is_some(),
            GameSession::Multi(draft) => draft
                .session(participant)
                .is_some_and(|s| s.pending_slot().is_some()),
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.lookup_generation += 1;
        self.lookup_generation
    }
}

// ---------------------------------------------------------------------------
// Intent handling
// ---------------------------------------------------------------------------

/// Apply one surface intent to the state, pushing resulting updates.
pub async fn handle_intent(state: &mut AppState, intent: UserIntent, ui_tx: &mpsc::Sender<UiUpdate>) {
    match intent {
        UserIntent::SelectCondition {
            participant,
            candidate,
        } => {
            let chosen = match &state.session {
                GameSession::Solo(session) => session.candidates().get(candidate).cloned(),
                GameSession::Multi(draft) => draft.candidates().get(candidate).cloned(),
            };
            let Some(condition) = chosen else {
                reject(ui_tx, format!("no condition candidate #{candidate}")).await;
                return;
            };
            match &mut state.session {
                GameSession::Solo(session) => {
                    if participant == 0 {
                        session.select_condition(condition);
                    }
                }
                GameSession::Multi(draft) => draft.select_condition(participant, condition),
            }
            push_snapshot(state, ui_tx).await;
        }

        UserIntent::ChooseSlot {
            participant,
            row,
            index,
        } => {
            let slot = SlotRef::new(row, index);
            let result = match &mut state.session {
                GameSession::Solo(session) => {
                    if participant == 0 {
                        session.choose_slot(slot)
                    } else {
                        Err(DraftError::NotYourTurn { participant })
                    }
                }
                GameSession::Multi(draft) => draft.choose_slot(participant, slot),
            };
            match result {
                Ok(()) => {
                    // A re-chosen slot supersedes any in-flight confirm.
                    state.current_confirm = None;
                    push_snapshot(state, ui_tx).await;
                }
                Err(e) => reject(ui_tx, e.to_string()).await,
            }
        }

        UserIntent::AbandonPick { participant } => {
            match &mut state.session {
                GameSession::Solo(session) => {
                    if participant == 0 {
                        session.abandon_pick();
                    }
                }
                GameSession::Multi(draft) => draft.abandon_pick(participant),
            }
            state.current_confirm = None;
            push_snapshot(state, ui_tx).await;
        }

        UserIntent::QueryPlayers {
            participant,
            prefix,
        } => {
            let generation = state.next_generation();
            state.current_search = Some((participant, generation));
            let provider = Arc::clone(&state.provider);
            let tx = state.lookup_tx.clone();
            debug!(participant, generation, %prefix, "spawning player search");
            tokio::spawn(async move {
                let result = provider.search_players(&prefix).await;
                let _ = tx
                    .send(LookupEvent::Suggestions {
                        generation,
                        participant,
                        result,
                    })
                    .await;
            });
        }

        UserIntent::ConfirmPlayer { participant, name } => {
            if !state.has_pending_slot(participant) {
                reject(ui_tx, DraftError::SlotNotChosen.to_string()).await;
                return;
            }
            let generation = state.next_generation();
            state.current_confirm = Some((participant, generation));
            let provider = Arc::clone(&state.provider);
            let tx = state.lookup_tx.clone();
            debug!(participant, generation, %name, "spawning player lookup");
            tokio::spawn(async move {
                let result = provider.lookup_player(&name).await;
                let _ = tx
                    .send(LookupEvent::Resolved {
                        generation,
                        participant,
                        result,
                    })
                    .await;
            });
        }

        UserIntent::Finish => {
            match &mut state.session {
                GameSession::Solo(session) => {
                    info!("draft finished early");
                    session.finish();
                    push_snapshot(state, ui_tx).await;
                }
                GameSession::Multi(_) => {
                    reject(
                        ui_tx,
                        "a multiplayer draft runs until every lineup is full".into(),
                    )
                    .await;
                }
            }
        }

        // Handled by the event loop before we get here.
        UserIntent::Quit => {}
    }
}

// ---------------------------------------------------------------------------
// Lookup event handling
// ---------------------------------------------------------------------------

/// Apply a lookup task's result. Events whose generation does not match the
/// current search/confirm are stale (superseded or cancelled) and ignored.
pub async fn handle_lookup_event(
    state: &mut AppState,
    event: LookupEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match event {
        LookupEvent::Suggestions {
            generation,
            participant,
            result,
        } => {
            if state.current_search != Some((participant, generation)) {
                debug!(generation, "discarding stale search result");
                return;
            }
            state.current_search = None;
            match result {
                Ok(mut names) => {
                    // Names already on a lineup are not offered again.
                    if let GameSession::Multi(draft) = &state.session {
                        names.retain(|n| !draft.is_used(n));
                    }
                    let _ = ui_tx
                        .send(UiUpdate::Suggestions { participant, names })
                        .await;
                }
                Err(e) => reject(ui_tx, e.to_string()).await,
            }
        }

        LookupEvent::Resolved {
            generation,
            participant,
            result,
        } => {
            if state.current_confirm != Some((participant, generation)) {
                debug!(generation, "discarding stale lookup result");
                return;
            }
            state.current_confirm = None;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    // Lookup failed; the session is untouched.
                    reject(ui_tx, e.to_string()).await;
                    return;
                }
            };
            apply_confirm(state, participant, record, ui_tx).await;
        }
    }
}

/// Commit a resolved player into the pending slot.
async fn apply_confirm(
    state: &mut AppState,
    participant: usize,
    record: PlayerRecord,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let name = record.name.clone();
    let AppState {
        session,
        pools,
        rng,
        ..
    } = &mut *state;
    let result = match session {
        GameSession::Solo(session) => match session.confirm_player(record) {
            Ok(outcome) => {
                if !outcome.complete {
                    // Fresh candidates for the next round.
                    if let Err(e) = session.roll_candidates(pools, rng) {
                        warn!("next round has no conditions: {e}");
                    }
                }
                Ok(outcome.complete)
            }
            Err(e) => Err(e),
        },
        GameSession::Multi(draft) => match draft.confirm_player(participant, record, rng) {
            Ok(outcome) => {
                if outcome.round_rotated && draft.candidates().is_empty() {
                    warn!("next round has no conditions: the pools are empty");
                }
                Ok(outcome.complete)
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(complete) => {
            info!(participant, %name, complete, "pick confirmed");
            push_snapshot(state, ui_tx).await;
        }
        Err(e) => reject(ui_tx, e.to_string()).await,
    }
}

async fn push_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::Snapshot(state.snapshot())).await;
}

async fn reject(ui_tx: &mpsc::Sender<UiUpdate>, message: String) {
    debug!(%message, "intent rejected");
    let _ = ui_tx.send(UiUpdate::Rejected { message }).await;
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Listens on the intent channel from the surface and the internal lookup
/// channel, pushing `UiUpdate`s out. Exits on `Quit` or when the intent
/// channel closes.
pub async fn run(
    mut intent_rx: mpsc::Receiver<UserIntent>,
    mut lookup_rx: mpsc::Receiver<LookupEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("application event loop started");
    push_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            intent = intent_rx.recv() => {
                match intent {
                    Some(UserIntent::Quit) | None => {
                        info!("intent channel closed, shutting down");
                        break;
                    }
                    Some(intent) => handle_intent(&mut state, intent, &ui_tx).await,
                }
            }
            event = lookup_rx.recv() => {
                // The state holds a sender, so this channel cannot close
                // while the loop is alive.
                if let Some(event) = event {
                    handle_lookup_event(&mut state, event, &ui_tx).await;
                }
            }
        }
    }

    info!("application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
