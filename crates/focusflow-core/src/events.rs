use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::PomodoroMode;

/// Every timer transition produces an Event.
/// The CLI prints them; the session manager reacts to the terminal ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        label: String,
        duration_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: PomodoroMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A plan-driven session reached a terminal state.
    /// `completed` is true when it ran to zero, false when stopped early.
    SessionEnded {
        subject: String,
        topic: String,
        time_left: u64,
        completed: bool,
        at: DateTime<Utc>,
    },
    /// A Pomodoro focus interval elapsed; `minutes` is the focus time to log.
    FocusCompleted {
        minutes: u64,
        sessions_completed: u32,
        next_mode: PomodoroMode,
        at: DateTime<Utc>,
    },
    /// A Pomodoro break elapsed and the cycle returned to focus.
    BreakCompleted {
        mode: PomodoroMode,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event ends a plan-driven session.
    pub fn is_session_end(&self) -> bool {
        matches!(self, Event::SessionEnded { .. })
    }
}
