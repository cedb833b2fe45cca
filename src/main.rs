// Squad draft entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not the terminal)
// 2. Load config
// 3. Build providers and the condition candidate pools
// 4. Create the application state for the configured mode
// 5. Create mpsc channels and spawn the app event loop
// 6. Read intents from stdin lines, print updates as JSON lines
// 7. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

use squad_draft::app;
use squad_draft::config;
use squad_draft::data::{InMemoryPlayers, StaticMetadata};
use squad_draft::protocol::UserIntent;
use squad_draft::provider::{self, PlayerLookup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not the terminal)
    init_tracing()?;
    info!("squad draft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: mode={:?}, formation={:?}, {} participant(s)",
        config.mode,
        config.formation.rows(),
        config.participants.len()
    );

    // 3. Build providers and the condition candidate pools
    let pools = provider::load_pools(&StaticMetadata)
        .await
        .context("failed to load metadata pools")?;
    info!(
        "Pools loaded: {} clubs, {} leagues, {} nationalities",
        pools.clubs.len(),
        pools.leagues.len(),
        pools.nationalities.len()
    );
    let players: Arc<dyn PlayerLookup> = Arc::new(InMemoryPlayers::demo_squad());

    // 4. Create the application state
    let (lookup_tx, lookup_rx) = mpsc::channel(256);
    let state = app::AppState::new(
        &config,
        pools,
        players,
        lookup_tx,
        StdRng::from_entropy(),
    );

    // 5. Create the remaining channels and spawn the app event loop
    let (intent_tx, intent_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(intent_rx, lookup_rx, ui_tx, state).await {
            error!("application loop error: {}", e);
        }
    });

    // Updates go to stdout as JSON lines; any renderer can sit on top.
    let printer = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            match serde_json::to_string(&update) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("failed to serialize update: {}", e),
            }
        }
    });

    // 6. Read intents from stdin lines
    info!("ready; reading commands from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line == "help" {
            eprintln!(
                "commands: cond <p> <n> | slot <p> <row> <idx> | find <p> <prefix> | \
                 pick <p> <name> | back <p> | finish | quit"
            );
            continue;
        }
        match parse_intent(&line) {
            Some(UserIntent::Quit) => {
                let _ = intent_tx.send(UserIntent::Quit).await;
                break;
            }
            Some(intent) => {
                if intent_tx.send(intent).await.is_err() {
                    break;
                }
            }
            None => eprintln!("unrecognized command: {line} (try `help`)"),
        }
    }

    // 7. Cleanup: let the app loop drain, then stop printing
    drop(intent_tx);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;
    printer.abort();

    info!("squad draft shut down cleanly");
    Ok(())
}

/// Parse one stdin line into an intent.
///
/// Grammar (participant is the zero-based index from the config order):
///   cond <participant> <candidate>
///   slot <participant> <row> <index>
///   find <participant> <prefix...>
///   pick <participant> <name...>
///   back <participant>
///   finish | quit
fn parse_intent(line: &str) -> Option<UserIntent> {
    let mut words = line.split_whitespace();
    let command = words.next()?;
    match command {
        "cond" => Some(UserIntent::SelectCondition {
            participant: words.next()?.parse().ok()?,
            candidate: words.next()?.parse().ok()?,
        }),
        "slot" => Some(UserIntent::ChooseSlot {
            participant: words.next()?.parse().ok()?,
            row: words.next()?.parse().ok()?,
            index: words.next()?.parse().ok()?,
        }),
        "find" => {
            let participant = words.next()?.parse().ok()?;
            let prefix = words.collect::<Vec<_>>().join(" ");
            Some(UserIntent::QueryPlayers { participant, prefix })
        }
        "pick" => {
            let participant = words.next()?.parse().ok()?;
            let name = words.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return None;
            }
            Some(UserIntent::ConfirmPlayer { participant, name })
        }
        "back" => Some(UserIntent::AbandonPick {
            participant: words.next()?.parse().ok()?,
        }),
        "finish" => Some(UserIntent::Finish),
        "quit" | "exit" => Some(UserIntent::Quit),
        _ => None,
    }
}

/// Initialize tracing to log to a file (stdout carries the JSON updates).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("squaddraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("squad_draft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
