// Configuration loading and parsing (game.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::lineup::Formation;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Public config
// ---------------------------------------------------------------------------

/// How the draft is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// One participant, rotating conditions.
    Single,
    /// Two or more participants, shared conditions, turn order.
    Multi,
    /// One participant, no conditions.
    Free,
}

/// The assembled, validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: GameMode,
    pub formation: Formation,
    /// Participant display names. Always non-empty; single-participant
    /// modes get a default name when none is configured.
    pub participants: Vec<String>,
}

// ---------------------------------------------------------------------------
// game.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[game]` table in game.toml.
#[derive(Debug, Clone, Deserialize)]
struct GameFile {
    game: GameSection,
}

#[derive(Debug, Clone, Deserialize)]
struct GameSection {
    mode: String,
    /// Named preset such as "4-4-2". Ignored when `formation_rows` is set.
    formation: Option<String>,
    /// Explicit row sizes from the goalkeeper line forward.
    formation_rows: Option<Vec<usize>>,
    #[serde(default)]
    participants: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/game.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let game_path = base_dir.join("config").join("game.toml");
    let game_text = read_file(&game_path)?;
    let game_file: GameFile = toml::from_str(&game_text).map_err(|e| ConfigError::ParseError {
        path: game_path.clone(),
        source: e,
    })?;

    assemble(game_file.game)
}

fn assemble(section: GameSection) -> Result<Config, ConfigError> {
    let mode = match section.mode.as_str() {
        "single" => GameMode::Single,
        "multi" => GameMode::Multi,
        "free" => GameMode::Free,
        other => {
            return Err(ConfigError::ValidationError {
                field: "game.mode".into(),
                message: format!("must be `single`, `multi` or `free`, got `{other}`"),
            })
        }
    };

    let formation = match (&section.formation_rows, &section.formation) {
        (Some(rows), _) => Formation::new(rows).ok_or_else(|| ConfigError::ValidationError {
            field: "game.formation_rows".into(),
            message: "rows must be non-empty and every row size > 0".into(),
        })?,
        (None, Some(name)) => {
            Formation::named(name).ok_or_else(|| ConfigError::ValidationError {
                field: "game.formation".into(),
                message: format!(
                    "unknown preset `{name}`; known presets: {}",
                    Formation::preset_names().join(", ")
                ),
            })?
        }
        (None, None) => Formation::named("4-4-2").expect("built-in preset"),
    };

    let mut participants: Vec<String> = section
        .participants
        .iter()
        .map(|n| n.trim().to_string())
        .collect();

    if participants.iter().any(|n| n.is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "game.participants".into(),
            message: "participant names must not be blank".into(),
        });
    }

    for (i, name) in participants.iter().enumerate() {
        if participants[..i].contains(name) {
            return Err(ConfigError::ValidationError {
                field: "game.participants".into(),
                message: format!("name taken: `{name}`"),
            });
        }
    }

    match mode {
        GameMode::Multi => {
            if participants.len() < 2 {
                return Err(ConfigError::ValidationError {
                    field: "game.participants".into(),
                    message: "multiplayer needs at least two participants".into(),
                });
            }
        }
        GameMode::Single | GameMode::Free => {
            if participants.is_empty() {
                participants.push("Player 1".into());
            } else if participants.len() > 1 {
                return Err(ConfigError::ValidationError {
                    field: "game.participants".into(),
                    message: "single-participant modes take at most one name".into(),
                });
            }
        }
    }

    Ok(Config {
        mode,
        formation,
        participants,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // Without defaults/ the app can still run from an existing config/.
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, keep the user's copy
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
