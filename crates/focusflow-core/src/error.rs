//! Core error types for focusflow-core.
//!
//! This module defines the error hierarchy using thiserror. Every fallible
//! operation in the library returns [`Result`], so callers can surface a
//! user-visible message without the conversation or timer becoming unusable.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Conversational service errors
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A plan-driven session is already running.
    #[error("Another session is already in progress: {subject}")]
    SessionActive { subject: String },

    /// No plan-driven session is running.
    #[error("No active session")]
    NoActiveSession,

    /// No study plan has been produced yet.
    #[error("No study plan yet -- ask the assistant for one first")]
    NoPlan,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The session table does not exist.
    #[error(
        "Database Connection Error: The 'study_sessions' table was not found. \
         This is a setup issue. If you are the administrator, please ensure the \
         database schema is correctly initialized."
    )]
    MissingTable,

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors from the conversational service.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// No API key is configured
    #[error("Gemini API key not configured (set GEMINI_API_KEY or `assistant.api_key`)")]
    MissingApiKey,

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the service
    #[error("Gemini API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Response did not contain a usable candidate
    #[error("Empty response from model")]
    EmptyResponse,

    /// Credential storage failure
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else if msg.as_deref().is_some_and(is_missing_table) {
                    DatabaseError::MissingTable
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<keyring::Error> for AssistantError {
    fn from(err: keyring::Error) -> Self {
        AssistantError::Keyring(err.to_string())
    }
}

fn is_missing_table(msg: &str) -> bool {
    msg.contains("no such table") && msg.contains("study_sessions")
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_message_is_setup_hint() {
        let err = DatabaseError::MissingTable;
        assert!(err.to_string().contains("'study_sessions' table was not found"));
    }

    #[test]
    fn session_active_names_subject() {
        let err = CoreError::SessionActive {
            subject: "Physics".into(),
        };
        assert_eq!(err.to_string(), "Another session is already in progress: Physics");
    }

    #[test]
    fn missing_table_detection() {
        assert!(is_missing_table("no such table: study_sessions"));
        assert!(!is_missing_table("no such table: kv"));
    }
}
