// Embedded fallback metadata and the offline demo player pool.
//
// Mirrors the fallback tables the web client ships for when the sports
// database is unreachable: five top leagues, ten clubs each, sixteen
// nationalities. The demo squad is a small hand-picked player set so the
// binary and the tests can run a full draft without any network.

use async_trait::async_trait;

use crate::canon::canonicalize;
use crate::draft::player::PlayerRecord;
use crate::provider::{LookupError, MetadataSource, PlayerLookup};

pub const DEFAULT_LEAGUES: &[&str] = &[
    "English Premier League",
    "Spanish La Liga",
    "Italian Serie A",
    "German Bundesliga",
    "French Ligue 1",
];

pub const DEFAULT_NATIONALITIES: &[&str] = &[
    "Brazil",
    "Spain",
    "Italy",
    "France",
    "Germany",
    "Argentina",
    "Portugal",
    "The Netherlands",
    "England",
    "Belgium",
    "Croatia",
    "Uruguay",
    "Mexico",
    "United States",
    "Japan",
    "South Korea",
];

/// Clubs of a default league; empty for unknown leagues.
pub fn default_teams(league: &str) -> &'static [&'static str] {
    match league {
        "English Premier League" => &[
            "Arsenal",
            "Chelsea",
            "Liverpool",
            "Manchester City",
            "Manchester United",
            "Tottenham",
            "Newcastle",
            "Everton",
            "Aston Villa",
            "Leeds",
        ],
        "Spanish La Liga" => &[
            "Real Madrid",
            "Barcelona",
            "Atlético Madrid",
            "Sevilla",
            "Valencia",
            "Villarreal",
            "Real Sociedad",
            "Athletic Bilbao",
            "Real Betis",
            "Celta Vigo",
        ],
        "Italian Serie A" => &[
            "Juventus",
            "AC Milan",
            "Inter",
            "Roma",
            "Lazio",
            "Napoli",
            "Fiorentina",
            "Atalanta",
            "Torino",
            "Sampdoria",
        ],
        "German Bundesliga" => &[
            "Bayern Munich",
            "Borussia Dortmund",
            "RB Leipzig",
            "Bayer Leverkusen",
            "Schalke 04",
            "VfL Wolfsburg",
            "Borussia Mönchengladbach",
            "Eintracht Frankfurt",
            "Hertha Berlin",
            "Werder Bremen",
        ],
        "French Ligue 1" => &[
            "Paris Saint-Germain",
            "Marseille",
            "Lyon",
            "Monaco",
            "Lille",
            "Nice",
            "Rennes",
            "Bordeaux",
            "Saint-Étienne",
            "Nantes",
        ],
        _ => &[],
    }
}

/// Metadata source backed by the embedded tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMetadata;

#[async_trait]
impl MetadataSource for StaticMetadata {
    async fn leagues(&self) -> Result<Vec<String>, LookupError> {
        Ok(DEFAULT_LEAGUES.iter().map(|s| s.to_string()).collect())
    }

    async fn teams(&self, league: &str) -> Result<Vec<String>, LookupError> {
        Ok(default_teams(league).iter().map(|s| s.to_string()).collect())
    }

    async fn nationalities(&self) -> Result<Vec<String>, LookupError> {
        Ok(DEFAULT_NATIONALITIES.iter().map(|s| s.to_string()).collect())
    }
}

/// In-memory player pool implementing [`PlayerLookup`].
///
/// Name resolution and prefix search both go through canonicalization, so
/// "saka" finds "Bukayo Saka" and "atletico" players match their accented
/// club spelling elsewhere in the system.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayers {
    players: Vec<PlayerRecord>,
}

impl InMemoryPlayers {
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        InMemoryPlayers { players }
    }

    /// The built-in demo squad.
    pub fn demo_squad() -> Self {
        fn p(name: &str, club: &str, league: &str, nation: &str) -> PlayerRecord {
            PlayerRecord {
                name: name.into(),
                club: Some(club.into()),
                league: Some(league.into()),
                nationality: Some(nation.into()),
                photo: None,
            }
        }

        InMemoryPlayers::new(vec![
            p("Bukayo Saka", "Arsenal", "English Premier League", "England"),
            p("Declan Rice", "Arsenal", "English Premier League", "England"),
            p("Martin Odegaard", "Arsenal", "English Premier League", "Norway"),
            p("Gabriel Martinelli", "Arsenal", "English Premier League", "Brazil"),
            p("Cole Palmer", "Chelsea", "English Premier League", "England"),
            p("Mohamed Salah", "Liverpool", "English Premier League", "Egypt"),
            p("Virgil van Dijk", "Liverpool", "English Premier League", "The Netherlands"),
            p("Erling Haaland", "Manchester City", "English Premier League", "Norway"),
            p("Phil Foden", "Manchester City", "English Premier League", "England"),
            p("Bruno Fernandes", "Manchester United", "English Premier League", "Portugal"),
            p("Jude Bellingham", "Real Madrid", "Spanish La Liga", "England"),
            p("Vinícius Júnior", "Real Madrid", "Spanish La Liga", "Brazil"),
            p("Kylian Mbappé", "Real Madrid", "Spanish La Liga", "France"),
            p("Robert Lewandowski", "Barcelona", "Spanish La Liga", "Poland"),
            p("Pedri", "Barcelona", "Spanish La Liga", "Spain"),
            p("Lamine Yamal", "Barcelona", "Spanish La Liga", "Spain"),
            p("Antoine Griezmann", "Atlético Madrid", "Spanish La Liga", "France"),
            p("Lautaro Martínez", "Inter", "Italian Serie A", "Argentina"),
            p("Rafael Leão", "AC Milan", "Italian Serie A", "Portugal"),
            p("Khvicha Kvaratskhelia", "Napoli", "Italian Serie A", "Georgia"),
            p("Harry Kane", "Bayern Munich", "German Bundesliga", "England"),
            p("Jamal Musiala", "Bayern Munich", "German Bundesliga", "Germany"),
            p("Florian Wirtz", "Bayer Leverkusen", "German Bundesliga", "Germany"),
            p("Ousmane Dembélé", "Paris Saint-Germain", "French Ligue 1", "France"),
            p("Achraf Hakimi", "Paris Saint-Germain", "French Ligue 1", "Morocco"),
        ])
    }
}

#[async_trait]
impl PlayerLookup for InMemoryPlayers {
    async fn lookup_player(&self, name: &str) -> Result<PlayerRecord, LookupError> {
        let key = canonicalize(name);
        self.players
            .iter()
            .find(|p| canonicalize(&p.name) == key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound { name: name.into() })
    }

    async fn search_players(&self, prefix: &str) -> Result<Vec<String>, LookupError> {
        let key = canonicalize(prefix);
        Ok(self
            .players
            .iter()
            .filter(|p| canonicalize(&p.name).starts_with(&key))
            .map(|p| p.name.clone())
            .collect())
    }
}
