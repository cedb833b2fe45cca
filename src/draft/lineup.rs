// Formations and lineup slot bookkeeping.

use serde::{Deserialize, Serialize};

use super::player::PlayerRecord;
use super::DraftError;

/// Named formation presets offered by the setup screen.
const NAMED_FORMATIONS: &[(&str, &[usize])] = &[
    ("4-4-2", &[1, 4, 4, 2]),
    ("4-2-3-1", &[1, 4, 2, 3, 1]),
    ("3-5-2", &[1, 3, 5, 2]),
    ("3-4-3", &[1, 3, 4, 3]),
    ("4-3-3", &[1, 4, 3, 3]),
];

/// Row sizes from the goalkeeper line forward, e.g. `[1, 4, 4, 2]`.
///
/// Fixed for the life of a session; changing formation means starting a new
/// session with a fresh lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    rows: Vec<usize>,
}

impl Formation {
    /// Build a formation from explicit row sizes. Returns `None` when the
    /// layout is empty or contains a zero-size row.
    pub fn new(rows: &[usize]) -> Option<Self> {
        if rows.is_empty() || rows.iter().any(|&c| c == 0) {
            return None;
        }
        Some(Formation {
            rows: rows.to_vec(),
        })
    }

    /// Look up a named preset such as `"4-4-2"`.
    pub fn named(name: &str) -> Option<Self> {
        NAMED_FORMATIONS
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, rows)| Formation::new(rows))
    }

    /// The names of all built-in presets, for setup screens and diagnostics.
    pub fn preset_names() -> Vec<&'static str> {
        NAMED_FORMATIONS.iter().map(|(n, _)| *n).collect()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Total number of slots across all rows.
    pub fn total_slots(&self) -> usize {
        self.rows.iter().sum()
    }

    /// Whether `(row, index)` addresses a slot of this formation.
    pub fn contains(&self, slot: SlotRef) -> bool {
        self.rows.get(slot.row).is_some_and(|&count| slot.index < count)
    }
}

/// A stable slot address within a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub row: usize,
    pub index: usize,
}

impl SlotRef {
    pub fn new(row: usize, index: usize) -> Self {
        SlotRef { row, index }
    }
}

/// The grid of picked players, shaped by a formation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    rows: Vec<Vec<Option<PlayerRecord>>>,
}

impl Lineup {
    /// An all-empty lineup shaped by the given formation.
    pub fn new(formation: &Formation) -> Self {
        Lineup {
            rows: formation.rows().iter().map(|&c| vec![None; c]).collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<Option<PlayerRecord>>] {
        &self.rows
    }

    /// Whether `slot` addresses a real position in this lineup.
    pub fn contains(&self, slot: SlotRef) -> bool {
        self.rows.get(slot.row).is_some_and(|row| slot.index < row.len())
    }

    /// The player at `slot`, if the slot exists and is filled.
    pub fn get(&self, slot: SlotRef) -> Option<&PlayerRecord> {
        self.rows.get(slot.row)?.get(slot.index)?.as_ref()
    }

    /// Place a player into `slot`, returning the previous occupant.
    pub fn place(
        &mut self,
        slot: SlotRef,
        player: PlayerRecord,
    ) -> Result<Option<PlayerRecord>, DraftError> {
        let cell = self
            .rows
            .get_mut(slot.row)
            .and_then(|row| row.get_mut(slot.index))
            .ok_or(DraftError::SlotOutOfBounds {
                row: slot.row,
                index: slot.index,
            })?;
        Ok(cell.replace(player))
    }

    /// Number of filled slots.
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }

    pub fn total_slots(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_some())
    }

    /// Iterate over all filled slots, row order first.
    pub fn filled(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.rows.iter().flatten().filter_map(|cell| cell.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.into(),
            club: None,
            league: None,
            nationality: None,
            photo: None,
        }
    }

    #[test]
    fn formation_rejects_degenerate_layouts() {
        assert!(Formation::new(&[]).is_none());
        assert!(Formation::new(&[1, 0, 4]).is_none());
        assert!(Formation::new(&[1, 4, 4, 2]).is_some());
    }

    #[test]
    fn named_presets_resolve() {
        let f = Formation::named("4-4-2").unwrap();
        assert_eq!(f.rows(), &[1, 4, 4, 2]);
        assert_eq!(f.total_slots(), 11);
        assert!(Formation::named("9-9-9").is_none());
        assert_eq!(Formation::preset_names().len(), 5);
    }

    #[test]
    fn slot_bounds() {
        let f = Formation::new(&[1, 4, 4, 2]).unwrap();
        assert!(f.contains(SlotRef::new(0, 0)));
        assert!(f.contains(SlotRef::new(3, 1)));
        assert!(!f.contains(SlotRef::new(0, 1)));
        assert!(!f.contains(SlotRef::new(4, 0)));
    }

    #[test]
    fn new_lineup_is_empty() {
        let f = Formation::new(&[1, 4, 4, 2]).unwrap();
        let lineup = Lineup::new(&f);
        assert_eq!(lineup.filled_count(), 0);
        assert_eq!(lineup.total_slots(), 11);
        assert!(!lineup.is_full());
        assert!(lineup.get(SlotRef::new(1, 2)).is_none());
    }

    #[test]
    fn place_returns_previous_occupant() {
        let f = Formation::new(&[1, 1]).unwrap();
        let mut lineup = Lineup::new(&f);
        let slot = SlotRef::new(1, 0);

        assert_eq!(lineup.place(slot, player("First")).unwrap(), None);
        assert_eq!(lineup.filled_count(), 1);

        let prev = lineup.place(slot, player("Second")).unwrap().unwrap();
        assert_eq!(prev.name, "First");
        assert_eq!(lineup.filled_count(), 1);
        assert_eq!(lineup.get(slot).unwrap().name, "Second");
    }

    #[test]
    fn place_out_of_bounds_is_rejected() {
        let f = Formation::new(&[1, 1]).unwrap();
        let mut lineup = Lineup::new(&f);
        let err = lineup.place(SlotRef::new(5, 0), player("X")).unwrap_err();
        assert_eq!(err, DraftError::SlotOutOfBounds { row: 5, index: 0 });
    }

    #[test]
    fn is_full_after_filling_every_slot() {
        let f = Formation::new(&[1, 2]).unwrap();
        let mut lineup = Lineup::new(&f);
        lineup.place(SlotRef::new(0, 0), player("A")).unwrap();
        lineup.place(SlotRef::new(1, 0), player("B")).unwrap();
        assert!(!lineup.is_full());
        lineup.place(SlotRef::new(1, 1), player("C")).unwrap();
        assert!(lineup.is_full());
        assert_eq!(lineup.filled().count(), 3);
    }
}
