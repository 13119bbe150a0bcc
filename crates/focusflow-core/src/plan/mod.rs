//! Study plans produced by the assistant.
//!
//! A plan is extracted from one markdown chat reply by [`parse_study_plan`]
//! and then drives plan-based timer sessions. Subjects are kept in the order
//! the assistant wrote them, which is the order they are meant to be studied.

mod duration;
mod parser;

use serde::{Deserialize, Serialize};

pub use duration::{parse_duration_secs, DEFAULT_SESSION_SECS};
pub use parser::{parse_study_plan, PLAN_MARKER};

/// Placeholder used for any field the assistant left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// One scheduled block within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlanSubject {
    pub subject: String,
    /// Free text such as "45 min" or "1.5 hours".
    pub duration: String,
    pub topic: String,
    #[serde(default)]
    pub completed: bool,
}

impl StudyPlanSubject {
    pub fn new(subject: impl Into<String>, duration: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            duration: duration.into(),
            topic: topic.into(),
            completed: false,
        }
    }

    /// Planned length in seconds, see [`parse_duration_secs`].
    pub fn duration_secs(&self) -> u64 {
        parse_duration_secs(&self.duration)
    }
}

/// Structured study schedule parsed from a chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub total_time: String,
    pub subjects: Vec<StudyPlanSubject>,
    pub study_tip: String,
    pub motivation: String,
}

impl StudyPlan {
    /// Mark the first incomplete subject matching `(subject, topic)` as completed.
    ///
    /// Plans may repeat a `(subject, topic)` pair; only the earliest entry that
    /// is still pending is marked, so repeated blocks complete in plan order.
    /// Returns `false` when no pending entry matches.
    pub fn mark_completed(&mut self, subject: &str, topic: &str) -> bool {
        match self
            .subjects
            .iter_mut()
            .find(|s| !s.completed && s.subject == subject && s.topic == topic)
        {
            Some(entry) => {
                entry.completed = true;
                true
            }
            None => false,
        }
    }

    /// First subject that has not been completed yet.
    pub fn next_pending(&self) -> Option<(usize, &StudyPlanSubject)> {
        self.subjects.iter().enumerate().find(|(_, s)| !s.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.subjects.iter().filter(|s| s.completed).count()
    }

    /// 0.0 .. 100.0 share of subjects completed.
    pub fn completion_pct(&self) -> f64 {
        if self.subjects.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.subjects.len() as f64 * 100.0
    }
}
