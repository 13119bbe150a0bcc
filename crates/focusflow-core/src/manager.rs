//! Owner of the current plan, the active plan-driven session, and history.
//!
//! A [`SessionManager`] is created once per user and handed to whatever needs
//! to start or end study sessions. It enforces the single-active-session rule
//! with a presence check; all mutation happens on the caller's thread.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::plan::{parse_study_plan, StudyPlan, StudyPlanSubject};
use crate::stats::{study_streak, StudyOverview};
use crate::storage::{NewStudySession, SessionStore, StudySession, GENERAL_FOCUS_SUBJECT};
use crate::timer::ActiveTimerSession;

/// Sessions at or below this many hours (36 seconds) are not recorded.
pub const MIN_LOGGED_HOURS: f64 = 0.01;

/// What happened when a plan-driven session ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub subject: String,
    pub topic: String,
    pub completed: bool,
    pub elapsed_secs: u64,
    /// The appended history record, if the session was long enough and the write succeeded.
    pub record: Option<StudySession>,
    /// User-visible message when the history write failed.
    pub log_error: Option<String>,
    /// Whether a plan entry was marked completed.
    pub marked_completed: bool,
}

pub struct SessionManager<S> {
    store: S,
    user_id: String,
    plan: Option<StudyPlan>,
    active: Option<ActiveTimerSession>,
    /// Cached history, most recent first.
    history: Vec<StudySession>,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(store: S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            plan: None,
            active: None,
            history: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn plan(&self) -> Option<&StudyPlan> {
        self.plan.as_ref()
    }

    pub fn active(&self) -> Option<&ActiveTimerSession> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveTimerSession> {
        self.active.as_mut()
    }

    pub fn history(&self) -> &[StudySession] {
        &self.history
    }

    pub fn streak(&self, today: NaiveDate) -> u32 {
        study_streak(&self.history, today)
    }

    pub fn overview(&self, today: NaiveDate, recent_limit: usize) -> StudyOverview {
        StudyOverview::compute(&self.history, today, recent_limit)
    }

    // ── History ──────────────────────────────────────────────────────

    /// Reload the cached history from the store.
    ///
    /// On failure the cache is left as it was.
    pub fn load_history(&mut self) -> Result<()> {
        self.history = self.store.list(&self.user_id)?;
        Ok(())
    }

    /// Append a record and cache it on success.
    pub fn log_session(&mut self, session: NewStudySession) -> Result<StudySession> {
        match self.store.insert(session) {
            Ok(record) => {
                tracing::debug!(subject = %record.subject, hours = record.duration, "session logged");
                self.history.insert(0, record.clone());
                Ok(record)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to log study session");
                Err(e)
            }
        }
    }

    /// Record a finished Pomodoro focus block.
    pub fn record_focus(&mut self, minutes: u64) -> Result<StudySession> {
        let session = NewStudySession::from_minutes(
            self.user_id.clone(),
            GENERAL_FOCUS_SUBJECT,
            minutes as f64,
            today(),
        );
        self.log_session(session)
    }

    // ── Plan ─────────────────────────────────────────────────────────

    pub fn set_plan(&mut self, plan: Option<StudyPlan>) {
        self.plan = plan;
    }

    /// Parse an assistant reply and replace the plan if it contained one.
    pub fn apply_reply(&mut self, text: &str) -> bool {
        match parse_study_plan(text) {
            Some(plan) => {
                self.plan = Some(plan);
                true
            }
            None => false,
        }
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Start timing the plan entry at `index`.
    pub fn start_plan_subject(&mut self, index: usize) -> Result<&ActiveTimerSession> {
        let plan = self.plan.as_ref().ok_or(CoreError::NoPlan)?;
        let entry = plan
            .subjects
            .get(index)
            .cloned()
            .ok_or_else(|| ValidationError::OutOfBounds {
                collection: "plan subjects".into(),
                index,
                len: plan.subjects.len(),
            })?;
        self.start_session(&entry)
    }

    /// Start timing `entry`. Rejected while another session is active.
    pub fn start_session(&mut self, entry: &StudyPlanSubject) -> Result<&ActiveTimerSession> {
        if let Some(active) = &self.active {
            tracing::warn!(active = %active.subject, requested = %entry.subject, "session start rejected");
            return Err(CoreError::SessionActive {
                subject: active.subject.clone(),
            });
        }
        let mut session = ActiveTimerSession::for_subject(entry);
        session.start();
        Ok(self.active.insert(session))
    }

    /// Reinstate a session persisted by an earlier process.
    pub fn restore_active(&mut self, session: ActiveTimerSession) -> Result<()> {
        if let Some(active) = &self.active {
            return Err(CoreError::SessionActive {
                subject: active.subject.clone(),
            });
        }
        self.active = Some(session);
        Ok(())
    }

    /// React to a timer event; only [`Event::SessionEnded`] has an effect.
    ///
    /// An end event for a subject and topic other than the active session's
    /// is stale and ignored.
    pub fn handle_event(&mut self, event: &Event) -> Result<Option<SessionOutcome>> {
        let Event::SessionEnded {
            subject,
            topic,
            time_left,
            completed,
            ..
        } = event
        else {
            return Ok(None);
        };
        match &self.active {
            Some(active) if active.subject == *subject && active.topic == *topic => {
                self.end_session(*time_left, *completed).map(Some)
            }
            Some(active) => {
                tracing::warn!(
                    active = %active.subject,
                    ended = %subject,
                    "ignoring end event for another session"
                );
                Ok(None)
            }
            None => Err(CoreError::NoActiveSession),
        }
    }

    /// Close the active session.
    ///
    /// Appends a history record when more than [`MIN_LOGGED_HOURS`] elapsed,
    /// and on normal completion marks the first pending plan entry with the
    /// same subject and topic. A failed history write is reported in the
    /// outcome without undoing the rest. The active slot is always cleared.
    pub fn end_session(&mut self, time_left: u64, completed: bool) -> Result<SessionOutcome> {
        let session = self.active.take().ok_or(CoreError::NoActiveSession)?;
        let elapsed_secs = session.duration.saturating_sub(time_left);
        let hours = elapsed_secs as f64 / 3600.0;

        let mut record = None;
        let mut log_error = None;
        if hours > MIN_LOGGED_HOURS {
            let entry = NewStudySession {
                user_id: self.user_id.clone(),
                subject: session.subject.clone(),
                duration: hours,
                date: today(),
                completed,
            };
            match self.log_session(entry) {
                Ok(r) => record = Some(r),
                Err(e) => {
                    log_error = Some(format!(
                        "Failed to save your session: {e}. Please check your database setup."
                    ))
                }
            }
        } else {
            tracing::debug!(elapsed_secs, "session too short to record");
        }

        let marked_completed = completed
            && self
                .plan
                .as_mut()
                .is_some_and(|p| p.mark_completed(&session.subject, &session.topic));

        Ok(SessionOutcome {
            subject: session.subject,
            topic: session.topic,
            completed,
            elapsed_secs,
            record,
            log_error,
            marked_completed,
        })
    }
}

/// The calendar day sessions are dated with (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
