//! Gemini `generateContent` client.
//!
//! Keeps the running conversation so each request carries the full history,
//! along with the coaching system instruction and the `logStudySession`
//! function declaration.

use indoc::indoc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::credentials;
use super::{AssistantReply, ChatService, ToolCall, LOG_STUDY_SESSION};
use crate::error::AssistantError;
use crate::storage::AssistantConfig;

const SYSTEM_INSTRUCTION: &str = indoc! {"
    You are FocusFlow, a study planner and productivity coach. You help students
    organize, track and improve their study sessions. Be calm, concise and motivating.

    When a user asks for a study plan, do not produce one straight away. First ask,
    in a single message, for the subjects or topics to cover, the total hours
    available, and which subjects are a priority or feel difficult. Once you have
    those details, build a strategic plan: put demanding subjects first, explain
    the reasoning in a sentence or two, and use Pomodoro-style focus blocks.

    Always format plans exactly like this markdown:
    📅 **Daily Study Plan — [Date/Day]**
    ------------------------------------
    🕒 **Total Study Time:** [x hours]
    📈 **Strategy:** [1-2 sentences on the plan's logic]

    📚 **Subjects:**
    1️⃣ **[Subject 1]** — [Duration] — [Topic/Task]
    2️⃣ **[Subject 2]** — [Duration] — [Topic/Task]
    3️⃣ **[Subject 3]** — [Duration] — [Topic/Task]

    ☕ **Breaks:**
    - Short break after each session.
    - Long break after [hours] or 2-3 sessions.

    💡 **Study Tip:**
    - [one productivity or focus tip]

    💬 **Motivation:**
    - [one motivational line or quote]

    When the user says they finished studying something (for example \"I just
    studied math for 1 hour\"), call the `logStudySession` tool with the subject
    and the duration in minutes.

    Keep replies short and purposeful, use emojis sparingly, and end with a brief
    motivational tagline.
"};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

impl Part {
    fn is_function_response(&self) -> bool {
        self.function_response.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn log_study_session_declaration() -> Value {
    json!({
        "name": LOG_STUDY_SESSION,
        "description": "Logs a completed study session to the user's study tracker. \
                        Use this when the user indicates they have finished studying \
                        a particular subject for a certain amount of time.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "subject": {
                    "type": "STRING",
                    "description": "The subject the user studied, e.g. \"Mathematics\"."
                },
                "duration": {
                    "type": "NUMBER",
                    "description": "The duration of the study session in minutes."
                },
                "date": {
                    "type": "STRING",
                    "description": "The date of the session in YYYY-MM-DD format. Defaults to today."
                }
            },
            "required": ["subject", "duration"]
        }
    })
}

pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
    history: Vec<Content>,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            history: Vec::new(),
        }
    }

    /// Build a client from configuration, resolving the API key.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = credentials::resolve_api_key(&config.api_key)?;
        Ok(Self::new(&config.endpoint, &config.model, api_key))
    }

    /// Number of turns in the conversation so far.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&mut self, text: &str) -> Result<Content, AssistantError> {
        let user = Content {
            role: "user".into(),
            parts: vec![Part {
                text: Some(text.to_string()),
                ..Part::default()
            }],
        };
        let mut contents = self.history.clone();
        contents.push(user.clone());

        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": contents,
            "tools": [{ "functionDeclarations": [log_study_session_declaration()] }],
        });

        tracing::debug!(model = %self.model, turns = contents.len(), "sending generateContent");
        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        let mut content = parsed
            .candidates
            .into_iter()
            .find_map(|c| c.content)
            .filter(|c| !c.parts.is_empty())
            .ok_or(AssistantError::EmptyResponse)?;
        content.role = "model".into();

        self.history.push(user);
        self.history.push(content.clone());
        Ok(content)
    }
}

fn reply_from(content: Content) -> Result<AssistantReply, AssistantError> {
    let mut calls = Vec::new();
    let mut text = String::new();
    for part in content.parts {
        if let Some(call) = part.function_call {
            calls.push(ToolCall {
                name: call.name,
                args: call.args,
            });
        } else if let Some(t) = part.text {
            text.push_str(&t);
        }
    }

    if !calls.is_empty() {
        Ok(AssistantReply::ToolCalls(calls))
    } else if text.trim().is_empty() {
        Err(AssistantError::EmptyResponse)
    } else {
        Ok(AssistantReply::Text(text))
    }
}

impl ChatService for GeminiClient {
    async fn send_message(&mut self, text: &str) -> Result<AssistantReply, AssistantError> {
        let content = self.generate(text).await?;
        reply_from(content)
    }

    /// Answer a `functionCall` turn.
    ///
    /// Responses to the same model turn share one `user` turn, which must sit
    /// directly after the call or the API rejects the next request.
    fn record_tool_result(&mut self, name: &str, response: Value) {
        let part = Part {
            function_response: Some(FunctionResponse {
                name: name.to_string(),
                response,
            }),
            ..Part::default()
        };
        match self.history.last_mut() {
            Some(last) if last.role == "user" && last.parts.iter().all(Part::is_function_response) => {
                last.parts.push(part);
            }
            _ => self.history.push(Content {
                role: "user".into(),
                parts: vec![part],
            }),
        }
    }
}
