use clap::Subcommand;
use focusflow_core::assistant::credentials;
use focusflow_core::Config;

use super::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.focus_duration", "user.id")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Store the Gemini API key in the OS keyring
    SetKey {
        key: String,
    },
    /// Remove the Gemini API key from the OS keyring
    ClearKey,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let mut config = Config::load()?;
            if !config.assistant.api_key.is_empty() {
                config.assistant.api_key = "********".into();
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::SetKey { key } => {
            credentials::store_api_key(&key)?;
            println!("ok");
        }
        ConfigAction::ClearKey => {
            credentials::clear_api_key()?;
            println!("ok");
        }
    }
    Ok(())
}
