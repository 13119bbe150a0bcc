pub mod chat;
pub mod config;
pub mod log;
pub mod plan;
pub mod pomodoro;
pub mod session;
pub mod stats;

use focusflow_core::storage::Database;
use focusflow_core::{ActiveTimerSession, Config, SessionManager, StudyPlan};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

const PLAN_KEY: &str = "current_plan";
const ACTIVE_KEY: &str = "active_session";

/// Everything a command needs: configuration plus a manager restored from
/// the database.
pub struct App {
    pub config: Config,
    pub manager: SessionManager<Database>,
}

impl App {
    pub fn load() -> CliResult<Self> {
        let config = Config::load()?;
        let db = Database::open()?;

        let plan = load_json::<StudyPlan>(&db, PLAN_KEY);
        let active = load_json::<ActiveTimerSession>(&db, ACTIVE_KEY);

        let mut manager = SessionManager::new(db, config.user.id.clone());
        manager.set_plan(plan);
        if let Some(active) = active {
            manager.restore_active(active)?;
        }
        manager.load_history()?;
        Ok(Self { config, manager })
    }

    /// Persist the plan and the active session for the next invocation.
    pub fn save(&self) -> CliResult {
        let db = self.manager.store();
        save_json(db, PLAN_KEY, self.manager.plan())?;
        save_json(db, ACTIVE_KEY, self.manager.active())?;
        Ok(())
    }
}

fn load_json<T: serde::de::DeserializeOwned>(db: &Database, key: &str) -> Option<T> {
    let json = db.kv_get(key).ok().flatten()?;
    match serde_json::from_str(&json) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable saved state");
            None
        }
    }
}

fn save_json<T: serde::Serialize>(db: &Database, key: &str, value: Option<&T>) -> CliResult {
    match value {
        Some(v) => db.kv_set(key, &serde_json::to_string(v)?)?,
        None => db.kv_delete(key)?,
    }
    Ok(())
}

/// Runtime for the commands that drive timers or talk to the network.
pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
