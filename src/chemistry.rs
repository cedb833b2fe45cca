// Team chemistry scoring.
//
// A pure function over the lineup: three frequency tables (club, league,
// nationality) over canonicalized values, fixed thresholds per table, and a
// per-slot score capped at 3. Recomputed from scratch after every lineup
// mutation; lineups are small, so there is no incremental update path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::canon::canonicalize;
use crate::draft::condition::ConditionKind;
use crate::draft::lineup::{Formation, Lineup, SlotRef};

/// Highest score a single slot can reach.
pub const MAX_SLOT_SCORE: u8 = 3;

/// Per-slot chemistry scores, shaped like the lineup, plus the lineup-wide
/// total. The total is an uncapped sum; display conventions (e.g. "out of
/// 33" for an 11-slot formation) live in the surface, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemistryGrid {
    pub scores: Vec<Vec<u8>>,
    pub total: u32,
}

impl ChemistryGrid {
    /// An all-zero grid shaped by the given formation.
    pub fn zeroed(formation: &Formation) -> Self {
        ChemistryGrid {
            scores: formation.rows().iter().map(|&c| vec![0; c]).collect(),
            total: 0,
        }
    }

    /// The score at `slot`, or 0 for coordinates outside the grid.
    pub fn score(&self, slot: SlotRef) -> u8 {
        self.scores
            .get(slot.row)
            .and_then(|row| row.get(slot.index))
            .copied()
            .unwrap_or(0)
    }
}

/// Compute per-slot chemistry and the lineup total.
///
/// Pure and deterministic: identical lineups always produce identical
/// grids. Empty slots score 0; a missing or blank club/league/nationality
/// never enters the frequency tables.
pub fn compute_chemistry(lineup: &Lineup) -> ChemistryGrid {
    let mut clubs: HashMap<String, u32> = HashMap::new();
    let mut leagues: HashMap<String, u32> = HashMap::new();
    let mut nations: HashMap<String, u32> = HashMap::new();

    for player in lineup.filled() {
        tally(&mut clubs, player.attribute(ConditionKind::Club));
        tally(&mut leagues, player.attribute(ConditionKind::League));
        tally(&mut nations, player.attribute(ConditionKind::Nationality));
    }

    let mut total = 0u32;
    let scores = lineup
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let Some(player) = cell else { return 0 };
                    let chem = club_contribution(count(&clubs, player.attribute(ConditionKind::Club)))
                        + league_contribution(count(&leagues, player.attribute(ConditionKind::League)))
                        + nation_contribution(count(&nations, player.attribute(ConditionKind::Nationality)));
                    let score = chem.min(MAX_SLOT_SCORE);
                    total += u32::from(score);
                    score
                })
                .collect()
        })
        .collect();

    ChemistryGrid { scores, total }
}

fn tally(table: &mut HashMap<String, u32>, value: Option<&str>) {
    if let Some(v) = value {
        let key = canonicalize(v);
        if !key.is_empty() {
            *table.entry(key).or_insert(0) += 1;
        }
    }
}

fn count(table: &HashMap<String, u32>, value: Option<&str>) -> u32 {
    value
        .map(canonicalize)
        .filter(|key| !key.is_empty())
        .and_then(|key| table.get(&key).copied())
        .unwrap_or(0)
}

fn club_contribution(count: u32) -> u8 {
    match count {
        c if c >= 7 => 3,
        c if c >= 4 => 2,
        c if c >= 2 => 1,
        _ => 0,
    }
}

fn league_contribution(count: u32) -> u8 {
    match count {
        c if c >= 8 => 3,
        c if c >= 5 => 2,
        c if c >= 3 => 1,
        _ => 0,
    }
}

fn nation_contribution(count: u32) -> u8 {
    match count {
        c if c >= 8 => 3,
        c if c >= 5 => 2,
        c if c >= 2 => 1,
        _ => 0,
    }
}
