// External collaborators: player lookup and draft metadata.
//
// The core consumes these as request/response services; implementations
// live behind the traits so the drafting logic never knows whether it is
// talking to the live sports database, the embedded fallback tables or a
// test double.

use async_trait::async_trait;
use thiserror::Error;

use crate::draft::condition::CandidatePools;
use crate::draft::player::PlayerRecord;

/// Failures surfaced by the lookup services. Both leave session state
/// untouched; the caller reports them and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no player found for `{name}`")]
    NotFound { name: String },

    #[error("lookup service unavailable: {message}")]
    Unavailable { message: String },
}

/// Resolves player names to full records.
#[async_trait]
pub trait PlayerLookup: Send + Sync {
    /// Resolve a single player by name.
    async fn lookup_player(&self, name: &str) -> Result<PlayerRecord, LookupError>;

    /// Candidate names for a search prefix, to populate the pick list.
    async fn search_players(&self, prefix: &str) -> Result<Vec<String>, LookupError>;
}

/// Supplies the league/club/nationality universe conditions are drawn from.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn leagues(&self) -> Result<Vec<String>, LookupError>;

    /// Clubs of one league.
    async fn teams(&self, league: &str) -> Result<Vec<String>, LookupError>;

    async fn nationalities(&self) -> Result<Vec<String>, LookupError>;
}

/// Assemble candidate pools from a metadata source: every club across every
/// league, the leagues themselves, and the known nationalities.
pub async fn load_pools(meta: &dyn MetadataSource) -> Result<CandidatePools, LookupError> {
    let leagues = meta.leagues().await?;
    let mut clubs = Vec::new();
    for league in &leagues {
        clubs.extend(meta.teams(league).await?);
    }
    let nationalities = meta.nationalities().await?;
    Ok(CandidatePools {
        clubs,
        leagues,
        nationalities,
    })
}
