// Pick conditions and candidate generation.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::canon::canonicalize;
use super::player::PlayerRecord;

/// How many condition candidates a round offers.
pub const CANDIDATES_PER_ROUND: usize = 3;

/// Sampling retry budget. Guards against pools whose combined distinct
/// values cannot fill a candidate set; when exhausted, fewer than
/// [`CANDIDATES_PER_ROUND`] candidates are returned.
const MAX_SAMPLE_ATTEMPTS: usize = 50;

/// The attribute a condition filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Club,
    League,
    Nationality,
}

impl ConditionKind {
    /// Display label, matching the setup screen's wording.
    pub fn label(&self) -> &'static str {
        match self {
            ConditionKind::Club => "Team",
            ConditionKind::League => "League",
            ConditionKind::Nationality => "Nation",
        }
    }
}

/// An eligibility filter the next picked player must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub value: String,
}

impl Condition {
    pub fn new(kind: ConditionKind, value: impl Into<String>) -> Self {
        Condition {
            kind,
            value: value.into(),
        }
    }

    /// Whether `player` satisfies this condition. Comparison goes through
    /// canonicalization on both sides; a player missing the attribute never
    /// matches.
    pub fn accepts(&self, player: &PlayerRecord) -> bool {
        match player.attribute(self.kind) {
            Some(attr) => canonicalize(attr) == canonicalize(&self.value),
            None => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.value)
    }
}

/// The value pools conditions are drawn from, assembled from the metadata
/// service (all clubs across all leagues, the leagues themselves, and the
/// known nationalities).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePools {
    pub clubs: Vec<String>,
    pub leagues: Vec<String>,
    pub nationalities: Vec<String>,
}

impl CandidatePools {
    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty() && self.leagues.is_empty() && self.nationalities.is_empty()
    }

    fn pool(&self, kind: ConditionKind) -> &[String] {
        match kind {
            ConditionKind::Club => &self.clubs,
            ConditionKind::League => &self.leagues,
            ConditionKind::Nationality => &self.nationalities,
        }
    }
}

/// Draw up to [`CANDIDATES_PER_ROUND`] distinct conditions.
///
/// Uniformly samples a category, then a value from that category's pool.
/// Exact `(kind, value)` duplicates are rejected and re-drawn; an attempt
/// that lands on an empty pool is consumed like any other. Returns an empty
/// set when all pools are empty.
pub fn pick_candidates<R: Rng + ?Sized>(pools: &CandidatePools, rng: &mut R) -> Vec<Condition> {
    const KINDS: [ConditionKind; 3] = [
        ConditionKind::Club,
        ConditionKind::League,
        ConditionKind::Nationality,
    ];

    let mut candidates: Vec<Condition> = Vec::new();
    if pools.is_empty() {
        return candidates;
    }

    let mut attempts = 0;
    while candidates.len() < CANDIDATES_PER_ROUND && attempts < MAX_SAMPLE_ATTEMPTS {
        attempts += 1;
        let kind = KINDS[rng.gen_range(0..KINDS.len())];
        let pool = pools.pool(kind);
        if pool.is_empty() {
            continue;
        }
        let value = pool[rng.gen_range(0..pool.len())].clone();
        let candidate = Condition::new(kind, value);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}
