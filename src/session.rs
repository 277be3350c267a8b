//! Conversation session state
//!
//! A session is the process-wide unit of conversation identity: a stable
//! id, the ordered message transcript, the most recent dataset, the chart
//! collection, and the advisory progress text for the in-flight request.
//! It is created at conversation start and lives until the process ends;
//! nothing here persists.

use crate::charts::ChartCollection;
use crate::dataset::RawDataset;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human asking questions
    User,
    /// The analysis assistant
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a bot message
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

/// Request lifecycle phase
///
/// `Idle → Sending → AwaitingResponse → {Applying | Failed} → Idle`.
/// Any phase other than `Idle` means a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    /// No request in flight
    #[default]
    Idle,
    /// Submission accepted, request being composed
    Sending,
    /// Backend call issued, waiting on the response
    AwaitingResponse,
    /// Successful response being applied to session state
    Applying,
    /// Transport failure being handled
    Failed,
}

/// The state of one conversation
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: String,
    messages: Vec<ChatMessage>,
    phase: RequestPhase,
    dataset: Option<RawDataset>,
    charts: ChartCollection,
    progress_text: String,
}

impl Session {
    /// Create a session with a fresh random id
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Create a session with an explicit id
    ///
    /// Mostly useful in tests that need to match progress events against a
    /// known id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The stable session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The transcript, in display order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a message; the transcript is append-only
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// True while a request is in flight
    pub fn in_flight(&self) -> bool {
        self.phase != RequestPhase::Idle
    }

    /// Current request phase
    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Transition to a new request phase
    pub fn set_phase(&mut self, phase: RequestPhase) {
        tracing::debug!(session_id = %self.id, ?phase, "request phase transition");
        self.phase = phase;
    }

    /// The most recent dataset, if any response has carried one
    pub fn dataset(&self) -> Option<&RawDataset> {
        self.dataset.as_ref()
    }

    /// Replace the dataset wholesale; never merged
    pub fn set_dataset(&mut self, dataset: RawDataset) {
        self.dataset = Some(dataset);
    }

    /// The chart collection
    pub fn charts(&self) -> &ChartCollection {
        &self.charts
    }

    /// Mutable access to the chart collection
    pub fn charts_mut(&mut self) -> &mut ChartCollection {
        &mut self.charts
    }

    /// Advisory progress text for the current request; empty when idle
    pub fn progress_text(&self) -> &str {
        &self.progress_text
    }

    /// Overwrite the progress text (last write wins)
    pub fn set_progress_text(&mut self, text: impl Into<String>) {
        self.progress_text = text.into();
    }

    /// Clear the progress text; done at the end of every request cycle
    pub fn clear_progress_text(&mut self) {
        self.progress_text.clear();
    }
}
