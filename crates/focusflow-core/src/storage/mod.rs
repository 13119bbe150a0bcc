mod config;
pub mod database;
pub mod history;
pub mod migrations;

pub use config::{AssistantConfig, Config, HistoryConfig, TimerConfig, UserConfig};
pub use database::Database;
pub use history::{MemoryStore, NewStudySession, SessionStore, StudySession, GENERAL_FOCUS_SUBJECT};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Overrides the data directory outright when set.
pub const HOME_ENV: &str = "FOCUSFLOW_HOME";
/// `dev` selects the `focusflow-dev` directory.
pub const PROFILE_ENV: &str = "FOCUSFLOW_ENV";

/// Directory holding `config.toml` and `focusflow.db`, created on first use.
///
/// `FOCUSFLOW_HOME` wins; otherwise `~/.config/focusflow`, or
/// `~/.config/focusflow-dev` with `FOCUSFLOW_ENV=dev`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = resolve_data_dir(
        std::env::var_os(HOME_ENV).map(PathBuf::from),
        std::env::var(PROFILE_ENV).ok().as_deref(),
        &home,
    );
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

fn resolve_data_dir(override_dir: Option<PathBuf>, profile: Option<&str>, home: &Path) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    let name = match profile {
        Some("dev") => "focusflow-dev",
        _ => "focusflow",
    };
    home.join(".config").join(name)
}
