//! Conversational study coach.
//!
//! [`Assistant`] owns the visible chat log and turns service replies into
//! actions: plain text may carry a new study plan, and `logStudySession`
//! tool calls append records to the session history.

pub mod credentials;
mod gemini;

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AssistantError;
use crate::manager::{today, SessionManager};
use crate::storage::{NewStudySession, SessionStore};

pub use gemini::GeminiClient;

/// Name of the history-logging tool the model may call.
pub const LOG_STUDY_SESSION: &str = "logStudySession";

pub const WELCOME_MESSAGE: &str =
    "Welcome to FocusFlow. How can I help you optimize your study session today?";
pub const MISSING_DETAILS_MESSAGE: &str = "I couldn't log that session because some details were missing. \
     Please make sure to specify both the subject and duration.";
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

/// One line of the chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: Value,
}

/// What the service answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

/// A remote conversational model.
pub trait ChatService {
    fn send_message(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<AssistantReply, AssistantError>> + Send;

    /// Report the outcome of a tool call from the last reply, so the next
    /// request carries it.
    fn record_tool_result(&mut self, name: &str, response: Value);
}

/// Validated `logStudySession` arguments.
#[derive(Debug, Clone, PartialEq)]
struct LogArgs {
    subject: String,
    minutes: f64,
    date: Option<NaiveDate>,
}

impl LogArgs {
    fn from_value(args: &Value) -> Option<Self> {
        let subject = args.get("subject")?.as_str()?.to_string();
        let minutes = args.get("duration")?.as_f64().filter(|m| *m > 0.0)?;
        let date = args
            .get("date")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .and_then(|d| match NaiveDate::parse_from_str(d, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!(date = d, error = %e, "ignoring unparseable session date");
                    None
                }
            });
        Some(Self {
            subject,
            minutes,
            date,
        })
    }
}

pub struct Assistant<C> {
    service: C,
    messages: Vec<Message>,
    next_id: u64,
}

impl<C: ChatService> Assistant<C> {
    /// Start a conversation, seeded with the welcome line.
    pub fn new(service: C) -> Self {
        let mut assistant = Self {
            service,
            messages: Vec::new(),
            next_id: 0,
        };
        assistant.push(Role::Model, WELCOME_MESSAGE.to_string());
        assistant
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn service(&self) -> &C {
        &self.service
    }

    fn push(&mut self, role: Role, text: String) {
        self.next_id += 1;
        self.messages.push(Message {
            id: self.next_id,
            role,
            text,
        });
    }

    /// Send one user message and apply the reply.
    ///
    /// Returns the model messages appended by this turn. Whitespace-only input
    /// is ignored and returns nothing. Service failures become an apology and
    /// leave the conversation usable.
    pub async fn handle_message<S: SessionStore>(
        &mut self,
        text: &str,
        manager: &mut SessionManager<S>,
    ) -> &[Message] {
        let start = self.messages.len();
        if text.trim().is_empty() {
            return &self.messages[start..];
        }
        self.push(Role::User, text.to_string());
        let replies_from = self.messages.len();

        match self.service.send_message(text).await {
            Ok(AssistantReply::ToolCalls(calls)) => {
                for call in calls {
                    if call.name != LOG_STUDY_SESSION {
                        tracing::debug!(tool = %call.name, "ignoring unknown tool call");
                        self.service
                            .record_tool_result(&call.name, json!({ "error": "unknown tool" }));
                        continue;
                    }
                    let (reply, response) = log_study_session(&call.args, manager);
                    self.service.record_tool_result(&call.name, response);
                    self.push(Role::Model, reply);
                }
            }
            Ok(AssistantReply::Text(reply)) => {
                if manager.apply_reply(&reply) {
                    tracing::debug!("study plan updated from reply");
                }
                self.push(Role::Model, reply);
            }
            Err(e) => {
                tracing::error!(error = %e, "error sending message");
                self.push(Role::Model, GENERIC_ERROR_MESSAGE.to_string());
            }
        }

        &self.messages[replies_from..]
    }
}

/// Returns the chat line for the user and the function response for the model.
fn log_study_session<S: SessionStore>(args: &Value, manager: &mut SessionManager<S>) -> (String, Value) {
    let Some(args) = LogArgs::from_value(args) else {
        return (
            MISSING_DETAILS_MESSAGE.to_string(),
            json!({ "error": "subject and a positive duration are required" }),
        );
    };
    let session = NewStudySession::from_minutes(
        manager.user_id().to_string(),
        args.subject.clone(),
        args.minutes,
        args.date.unwrap_or_else(today),
    );
    match manager.log_session(session) {
        Ok(record) => (
            format!(
                "Great work! I've logged a {}-minute session for **{}** in your tracker.",
                args.minutes, args.subject
            ),
            json!({ "result": "logged", "id": record.id, "date": record.date }),
        ),
        Err(e) => (
            format!("I tried to log your session, but a database error occurred: {e}"),
            json!({ "error": e.to_string() }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::collections::VecDeque;

    /// Replays canned replies in order.
    struct Scripted {
        replies: VecDeque<Result<AssistantReply, AssistantError>>,
        sent: Vec<String>,
        tool_results: Vec<(String, Value)>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<AssistantReply, AssistantError>>) -> Self {
            Self {
                replies: replies.into(),
                sent: Vec::new(),
                tool_results: Vec::new(),
            }
        }
    }

    impl ChatService for Scripted {
        async fn send_message(&mut self, text: &str) -> Result<AssistantReply, AssistantError> {
            self.sent.push(text.to_string());
            self.replies.pop_front().unwrap_or(Err(AssistantError::EmptyResponse))
        }

        fn record_tool_result(&mut self, name: &str, response: Value) {
            self.tool_results.push((name.to_string(), response));
        }
    }

    fn tool(args: Value) -> Result<AssistantReply, AssistantError> {
        Ok(AssistantReply::ToolCalls(vec![ToolCall {
            name: LOG_STUDY_SESSION.into(),
            args,
        }]))
    }

    fn manager() -> SessionManager<MemoryStore> {
        SessionManager::new(MemoryStore::new(), "u1")
    }

    const PLAN: &str = "📅 **Daily Study Plan — Mon**\n\
        🕒 **Total Study Time:** 1 hour\n\
        📚 **Subjects:**\n\
        1️⃣ **Math** — 45 min — Algebra\n\
        ☕ **Breaks:**\n";

    #[tokio::test]
    async fn starts_with_welcome() {
        let a = Assistant::new(Scripted::new(vec![]));
        assert_eq!(a.messages().len(), 1);
        assert_eq!(a.messages()[0].text, WELCOME_MESSAGE);
        assert_eq!(a.messages()[0].role, Role::Model);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut a = Assistant::new(Scripted::new(vec![]));
        let mut m = manager();
        assert!(a.handle_message("   ", &mut m).await.is_empty());
        assert_eq!(a.messages().len(), 1);
        assert!(a.service().sent.is_empty());
    }

    #[tokio::test]
    async fn valid_tool_call_logs_hours() {
        let mut a = Assistant::new(Scripted::new(vec![tool(json!({
            "subject": "Math",
            "duration": 90,
            "date": "2026-10-15"
        }))]));
        let mut m = manager();
        let replies = a.handle_message("studied math 90 minutes", &mut m).await;
        assert_eq!(
            replies[0].text,
            "Great work! I've logged a 90-minute session for **Math** in your tracker."
        );

        let record = &m.history()[0];
        assert_eq!(record.duration, 1.5);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        assert!(record.completed);
        assert_eq!(m.store().len(), 1);

        let results = &a.service().tool_results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, LOG_STUDY_SESSION);
        assert_eq!(results[0].1["result"], "logged");
    }

    #[tokio::test]
    async fn every_tool_call_gets_a_result() {
        let mut a = Assistant::new(Scripted::new(vec![
            Ok(AssistantReply::ToolCalls(vec![
                ToolCall {
                    name: "setAlarm".into(),
                    args: json!({}),
                },
                ToolCall {
                    name: LOG_STUDY_SESSION.into(),
                    args: json!({ "duration": 20 }),
                },
            ])),
            Ok(AssistantReply::Text("Noted.".into())),
        ]));
        let mut m = manager();
        a.handle_message("log it", &mut m).await;

        let results = &a.service().tool_results;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "setAlarm");
        assert!(results[0].1.get("error").is_some());
        assert!(results[1].1.get("error").is_some());

        let replies = a.handle_message("ok", &mut m).await;
        assert_eq!(replies[0].text, "Noted.");
    }

    #[tokio::test]
    async fn date_defaults_to_today() {
        let mut a = Assistant::new(Scripted::new(vec![tool(json!({
            "subject": "Art",
            "duration": 30
        }))]));
        let mut m = manager();
        a.handle_message("art for half an hour", &mut m).await;
        assert_eq!(m.history()[0].date, today());
        assert_eq!(m.history()[0].duration, 0.5);
    }

    #[tokio::test]
    async fn malformed_args_write_nothing() {
        let mut a = Assistant::new(Scripted::new(vec![
            tool(json!({ "subject": "Math", "duration": "60" })),
            tool(json!({ "duration": 60 })),
        ]));
        let mut m = manager();
        let replies = a.handle_message("one", &mut m).await;
        assert_eq!(replies[0].text, MISSING_DETAILS_MESSAGE);
        let replies = a.handle_message("two", &mut m).await;
        assert_eq!(replies[0].text, MISSING_DETAILS_MESSAGE);
        assert!(m.store().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let mut a = Assistant::new(Scripted::new(vec![tool(json!({
            "subject": "Math",
            "duration": 60
        }))]));
        let mut m = manager();
        m.store().fail_inserts("disk full");
        let replies = a.handle_message("logged?", &mut m).await;
        assert_eq!(
            replies[0].text,
            "I tried to log your session, but a database error occurred: disk full"
        );
        assert!(m.history().is_empty());
        assert_eq!(a.service().tool_results[0].1["error"], "disk full");
    }

    #[tokio::test]
    async fn text_with_plan_replaces_plan() {
        let mut a = Assistant::new(Scripted::new(vec![
            Ok(AssistantReply::Text(PLAN.into())),
            Ok(AssistantReply::Text("Stay consistent.".into())),
        ]));
        let mut m = manager();
        a.handle_message("plan my day", &mut m).await;
        assert_eq!(m.plan().unwrap().subjects[0].subject, "Math");

        a.handle_message("thanks", &mut m).await;
        assert!(m.plan().is_some());
        assert_eq!(a.messages().len(), 5);
        assert_eq!(a.messages()[4].text, "Stay consistent.");
    }

    #[tokio::test]
    async fn service_error_becomes_apology() {
        let mut a = Assistant::new(Scripted::new(vec![Err(AssistantError::EmptyResponse)]));
        let mut m = manager();
        let replies = a.handle_message("hello", &mut m).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text, GENERIC_ERROR_MESSAGE);

        // still usable afterwards
        let replies = a.handle_message("again", &mut m).await;
        assert_eq!(replies[0].text, GENERIC_ERROR_MESSAGE);
        assert_eq!(a.service().sent, vec!["hello", "again"]);
    }

    #[tokio::test]
    async fn unknown_tools_are_skipped() {
        let mut a = Assistant::new(Scripted::new(vec![Ok(AssistantReply::ToolCalls(vec![
            ToolCall {
                name: "setAlarm".into(),
                args: json!({}),
            },
        ]))]));
        let mut m = manager();
        assert!(a.handle_message("wake me", &mut m).await.is_empty());
    }

    #[test]
    fn log_args_validation() {
        assert!(LogArgs::from_value(&json!({ "subject": "Math", "duration": 0 })).is_none());
        assert!(LogArgs::from_value(&json!({ "subject": 3, "duration": 10 })).is_none());
        let args = LogArgs::from_value(&json!({ "subject": "Math", "duration": 10, "date": "yesterday" })).unwrap();
        assert_eq!(args.date, None);
        assert_eq!(args.minutes, 10.0);
    }
}
