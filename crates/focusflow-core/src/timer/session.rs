//! Plan-driven countdown.
//!
//! One [`ActiveTimerSession`] times one subject from a study plan. It is a
//! pure state machine: the caller (usually a [`Ticker`](super::Ticker))
//! invokes `tick()` once per elapsed second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running -> Completed   (time_left reached zero)
//! Idle | Running | Paused -> Cancelled   (stop)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Tickable;
use crate::events::Event;
use crate::plan::StudyPlanSubject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl TimerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TimerState::Completed | TimerState::Cancelled)
    }
}

/// The in-progress countdown for one plan subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimerSession {
    pub subject: String,
    pub topic: String,
    /// Total length in seconds, fixed at creation.
    pub duration: u64,
    /// Seconds remaining.
    pub time_left: u64,
    state: TimerState,
}

impl ActiveTimerSession {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>, duration: u64) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            duration,
            time_left: duration,
            state: TimerState::Idle,
        }
    }

    /// Session for a plan entry, length taken from its duration label.
    pub fn for_subject(entry: &StudyPlanSubject) -> Self {
        Self::new(entry.subject.clone(), entry.topic.clone(), entry.duration_secs())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.duration.saturating_sub(self.time_left)
    }

    /// 0.0 .. 1.0 share of the session already elapsed.
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        self.elapsed_secs() as f64 / self.duration as f64
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                tracing::debug!(subject = %self.subject, duration = self.duration, "session started");
                Some(Event::TimerStarted {
                    label: self.subject.clone(),
                    duration_secs: self.duration,
                    remaining_secs: self.time_left,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => self.resume(),
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.time_left,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_secs: self.time_left,
            at: Utc::now(),
        })
    }

    /// End the session early. Reports the time still left and `completed = false`.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state.is_terminal() {
            return None;
        }
        self.state = TimerState::Cancelled;
        tracing::debug!(subject = %self.subject, time_left = self.time_left, "session stopped early");
        Some(self.ended_event(false))
    }

    /// Advance by one second. Returns the end event when the countdown hits zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.state = TimerState::Completed;
            tracing::debug!(subject = %self.subject, "session completed");
            return Some(self.ended_event(true));
        }
        None
    }

    fn ended_event(&self, completed: bool) -> Event {
        Event::SessionEnded {
            subject: self.subject.clone(),
            topic: self.topic.clone(),
            time_left: if completed { 0 } else { self.time_left },
            completed,
            at: Utc::now(),
        }
    }
}

impl Tickable for ActiveTimerSession {
    fn tick(&mut self) -> Option<Event> {
        ActiveTimerSession::tick(self)
    }

    fn is_active(&self) -> bool {
        self.state == TimerState::Running
    }
}
