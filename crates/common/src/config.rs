//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Playback session defaults.
    #[serde(default)]
    pub playback: PlaybackDefaults,

    /// Planner behavior switches.
    #[serde(default)]
    pub planning: PlanningConfig,

    /// Export hand-off defaults.
    #[serde(default)]
    pub export: ExportDefaults,
}

/// Playback session parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackDefaults {
    /// Maximum rate (Hz) at which position updates are published to
    /// listeners. Frame evaluation itself is not throttled.
    pub notify_hz: u32,

    /// How far ahead of its start (ms) a layer is reported as premounted.
    pub premount_ms: u64,
}

/// Planner behavior switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Accept overlapping keyframes on video/audio tracks instead of
    /// rejecting the composition.
    pub allow_overlaps: bool,
}

/// Export hand-off defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Directory where dispatch payloads are written.
    pub output_dir: PathBuf,

    /// Pretty-print the dispatch payload.
    pub pretty_json: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "reelplan=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            playback: PlaybackDefaults::default(),
            planning: PlanningConfig::default(),
            export: ExportDefaults::default(),
        }
    }
}

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            // ~64ms between published positions
            notify_hz: 15,
            premount_ms: 3000,
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            pretty_json: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("reelplan").join("config.json")
}
