// Player records as returned by the sports database.

use serde::{Deserialize, Serialize};

use super::condition::ConditionKind;

/// A player as resolved by the lookup service.
///
/// Immutable once fetched. Identity is the name, compared through
/// [`crate::canon::canonicalize`] wherever the core needs equality. Club,
/// league and nationality are optional because the upstream database does
/// not always know them; an absent field never satisfies a condition and
/// never contributes to chemistry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub club: Option<String>,
    pub league: Option<String>,
    pub nationality: Option<String>,
    pub photo: Option<String>,
}

impl PlayerRecord {
    /// The attribute a condition of the given kind filters on.
    pub fn attribute(&self, kind: ConditionKind) -> Option<&str> {
        match kind {
            ConditionKind::Club => self.club.as_deref(),
            ConditionKind::League => self.league.as_deref(),
            ConditionKind::Nationality => self.nationality.as_deref(),
        }
    }
}
