//! Turn-based transcription log for voice conversations.
//!
//! Fragments stream in for both speakers; a turn-complete signal folds the
//! pending fragments into one [`TranscriptionEntry`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionEntry {
    /// Position in the conversation, starting at 1.
    pub id: u64,
    pub user: String,
    pub agent: String,
}

#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    input: String,
    output: String,
    entries: Vec<TranscriptionEntry>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment of what the user said.
    pub fn push_input(&mut self, fragment: &str) {
        self.input.push_str(fragment);
    }

    /// Append a fragment of what the model said.
    pub fn push_output(&mut self, fragment: &str) {
        self.output.push_str(fragment);
    }

    /// Close the current turn.
    ///
    /// Records an entry if either side said anything, then clears both
    /// pending buffers. Returns the recorded entry.
    pub fn turn_complete(&mut self) -> Option<&TranscriptionEntry> {
        if self.input.is_empty() && self.output.is_empty() {
            return None;
        }
        self.entries.push(TranscriptionEntry {
            id: self.entries.len() as u64 + 1,
            user: std::mem::take(&mut self.input),
            agent: std::mem::take(&mut self.output),
        });
        self.entries.last()
    }

    pub fn pending_input(&self) -> &str {
        &self.input
    }

    pub fn pending_output(&self) -> &str {
        &self.output
    }

    pub fn entries(&self) -> &[TranscriptionEntry] {
        &self.entries
    }

    /// Drop everything, e.g. when a voice session ends.
    pub fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
        self.entries.clear();
    }
}
