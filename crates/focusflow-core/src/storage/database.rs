//! SQLite-based session history.
//!
//! Provides persistent storage for:
//! - Study session records (append-only)
//! - Key-value store for CLI state (current plan, active session)

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use super::data_dir;
use super::history::{NewStudySession, SessionStore, StudySession};
use super::migrations;
use crate::error::{DatabaseError, Result};

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/focusflow/focusflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("focusflow.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)?;
        Ok(())
    }

    /// Records for `user_id` on a single calendar day.
    pub fn list_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<StudySession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, subject, duration, date, completed, created_at
             FROM study_sessions
             WHERE user_id = ?1 AND date = ?2
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id, date], session_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store. Missing keys are not an error.
    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn insert(&self, session: NewStudySession) -> Result<StudySession> {
        let record = StudySession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: session.user_id,
            subject: session.subject,
            duration: session.duration,
            date: session.date,
            completed: session.completed,
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO study_sessions (id, user_id, subject, duration, date, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.user_id,
                record.subject,
                record.duration,
                record.date,
                record.completed,
                record.created_at,
            ],
        )?;
        Ok(record)
    }

    fn list(&self, user_id: &str) -> Result<Vec<StudySession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, subject, duration, date, completed, created_at
             FROM study_sessions
             WHERE user_id = ?1
             ORDER BY date DESC, created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], session_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<StudySession> {
    Ok(StudySession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        subject: row.get(2)?,
        duration: row.get(3)?,
        date: row.get::<_, NaiveDate>(4)?,
        completed: row.get(5)?,
        created_at: row.get::<_, DateTime<Utc>>(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn insert_and_list() {
        let db = Database::open_memory().unwrap();
        db.insert(NewStudySession::from_minutes("u1", "Math", 45.0, day(14)))
            .unwrap();
        db.insert(NewStudySession::from_minutes("u1", "Physics", 90.0, day(16)))
            .unwrap();
        db.insert(NewStudySession::from_minutes("u2", "Art", 30.0, day(16)))
            .unwrap();

        let listed = db.list("u1").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].subject, "Physics");
        assert_eq!(listed[0].duration, 1.5);
        assert_eq!(listed[0].date, day(16));
        assert!(listed[0].completed);
        assert_eq!(listed[1].subject, "Math");
    }

    #[test]
    fn list_on_filters_by_day() {
        let db = Database::open_memory().unwrap();
        db.insert(NewStudySession::from_minutes("u1", "Math", 45.0, day(14)))
            .unwrap();
        db.insert(NewStudySession::from_minutes("u1", "Math", 45.0, day(15)))
            .unwrap();
        assert_eq!(db.list_on("u1", day(15)).unwrap().len(), 1);
    }

    #[test]
    fn incomplete_flag_round_trips() {
        let db = Database::open_memory().unwrap();
        let mut s = NewStudySession::from_minutes("u1", "Math", 10.0, day(1));
        s.completed = false;
        let stored = db.insert(s).unwrap();
        let listed = db.list("u1").unwrap();
        assert_eq!(listed, vec![stored]);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn missing_table_maps_to_setup_error() {
        let db = Database::open_memory().unwrap();
        db.conn().execute_batch("DROP TABLE study_sessions;").unwrap();
        let err = db.list("u1").unwrap_err();
        assert!(err.to_string().contains("'study_sessions' table was not found"));
    }
}
