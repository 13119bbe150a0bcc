//! # FocusFlow Core Library
//!
//! This library provides the core logic for FocusFlow, a study planner with a
//! conversational coach. It follows a CLI-first philosophy: every operation is
//! available through the standalone CLI binary, which is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Plan**: Extracts a structured [`StudyPlan`] from a markdown chat reply
//! - **Timer**: Pure countdown state machines advanced by `tick()`, plus a
//!   [`Ticker`] that drives them once per second
//! - **Manager**: [`SessionManager`] owns the current plan, the single active
//!   session, and the cached history
//! - **Storage**: SQLite session history and TOML configuration
//! - **Assistant**: Gemini-backed chat that can log sessions via tool calls
//!
//! ## Key Components
//!
//! - [`parse_study_plan`]: Markdown plan extraction
//! - [`ActiveTimerSession`]: Plan-driven countdown
//! - [`PomodoroTimer`]: Focus/break cycle timer
//! - [`Database`]: Session persistence
//! - [`Config`]: Application configuration management

pub mod assistant;
pub mod error;
pub mod events;
pub mod manager;
pub mod plan;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod transcript;

pub use assistant::{Assistant, AssistantReply, ChatService, GeminiClient, Message, Role, ToolCall};
pub use error::{AssistantError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use manager::{SessionManager, SessionOutcome};
pub use plan::{parse_duration_secs, parse_study_plan, StudyPlan, StudyPlanSubject};
pub use stats::{compute_streak, study_streak, StudyOverview};
pub use storage::{Config, Database, MemoryStore, NewStudySession, SessionStore, StudySession};
pub use timer::{ActiveTimerSession, PomodoroConfig, PomodoroMode, PomodoroTimer, Ticker, TickerHandle, TimerState};
pub use transcript::{TranscriptBuffer, TranscriptionEntry};
