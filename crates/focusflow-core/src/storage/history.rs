//! Session history records and the append-only store abstraction.

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Subject used for free-standing Pomodoro focus blocks.
pub const GENERAL_FOCUS_SUBJECT: &str = "General Focus";

/// A persisted block of study time. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    /// Hours, fractional.
    pub duration: f64,
    pub date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`SessionStore::insert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudySession {
    pub user_id: String,
    pub subject: String,
    pub duration: f64,
    pub date: NaiveDate,
    pub completed: bool,
}

impl NewStudySession {
    /// Build a record from a duration in minutes, dated `date`.
    pub fn from_minutes(
        user_id: impl Into<String>,
        subject: impl Into<String>,
        minutes: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            subject: subject.into(),
            duration: minutes / 60.0,
            date,
            completed: true,
        }
    }
}

/// Append-only history of study sessions, keyed by owner.
pub trait SessionStore {
    /// Append a record and return it with its storage identity filled in.
    fn insert(&self, session: NewStudySession) -> Result<StudySession>;

    /// All records for `user_id`, most recent date first.
    fn list(&self, user_id: &str) -> Result<Vec<StudySession>>;
}

/// Volatile store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<Vec<StudySession>>,
    fail_with: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following insert fail with `message`.
    pub fn fail_inserts(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.fail_with.lock() {
            *guard = Some(message.into());
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, session: NewStudySession) -> Result<StudySession> {
        if let Some(message) = self.fail_with.lock().ok().and_then(|g| g.clone()) {
            return Err(CoreError::Custom(message));
        }
        let record = StudySession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: session.user_id,
            subject: session.subject,
            duration: session.duration,
            date: session.date,
            completed: session.completed,
            created_at: Utc::now(),
        };
        self.sessions
            .lock()
            .map_err(|_| CoreError::Custom("session store poisoned".into()))?
            .push(record.clone());
        Ok(record)
    }

    fn list(&self, user_id: &str) -> Result<Vec<StudySession>> {
        let guard = self
            .sessions
            .lock()
            .map_err(|_| CoreError::Custom("session store poisoned".into()))?;
        let mut out: Vec<_> = guard.iter().filter(|s| s.user_id == user_id).cloned().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(out)
    }
}
