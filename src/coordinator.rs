//! Single-flight request lifecycle coordination
//!
//! The coordinator owns the request state machine:
//!
//! `Idle → Sending → AwaitingResponse → {Applying | Failed} → Idle`
//!
//! At most one request is in flight per session. Submissions while busy
//! are refused outright (no queuing, no cancellation), and whitespace-only
//! submissions are ignored. Whatever happens to the backend call, the
//! cleanup step (phase back to idle, progress text cleared) runs
//! unconditionally.
//!
//! Progress events reach the session only through [`RequestCoordinator::
//! apply_progress`], which discards events for foreign sessions and events
//! arriving after the request already resolved. Progress is advisory UI
//! state, never authoritative.

use crate::backend::{AnalysisBackend, ChatRequest, ChatResponse};
use crate::charts::{ChartDescriptor, ChartEntry};
use crate::config::DisplayConfig;
use crate::dataset::RawDataset;
use crate::error::Result;
use crate::progress::ProgressEvent;
use crate::session::{ChatMessage, RequestPhase, Session};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fixed user-visible reply appended when the backend call fails
pub const FAILURE_MESSAGE: &str =
    "Sorry, something went wrong while processing your request. Please try again.";

/// Outcome of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The request was issued and its cycle completed (success or failure)
    Accepted,
    /// Ignored: the text was empty after trimming
    RejectedEmpty,
    /// Ignored: a request was already in flight
    RejectedBusy,
}

/// How incoming chart descriptors combine with the existing collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartUpdate {
    /// Replace per kind: a new histogram overwrites the prior histogram
    /// but leaves an existing pie chart intact
    #[default]
    Merge,
    /// Drop every existing chart and keep only the incoming set
    Replace,
}

/// Coordinates one session's requests against the analysis backend
///
/// The session lives behind a shared async mutex so the progress pump can
/// update it while a request is awaiting its response. Each state change
/// is applied within a single lock scope, so a message, dataset, and chart
/// update land together, never interleaved with a progress write.
pub struct RequestCoordinator<B: AnalysisBackend> {
    session: Arc<Mutex<Session>>,
    backend: B,
    display: DisplayConfig,
}

impl<B: AnalysisBackend> RequestCoordinator<B> {
    /// Create a coordinator for a session
    ///
    /// # Arguments
    ///
    /// * `session` - Shared session state
    /// * `backend` - The analysis backend seam
    /// * `display` - Settings governing chart derivation (default bucket
    ///   count, columns barred from derivation)
    pub fn new(session: Arc<Mutex<Session>>, backend: B, display: DisplayConfig) -> Self {
        Self {
            session,
            backend,
            display,
        }
    }

    /// Shared handle to the session state
    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }

    /// Submit a user message with the default merge policy
    pub async fn submit(&self, text: &str) -> Result<Submission> {
        self.submit_with(text, ChartUpdate::Merge).await
    }

    /// Submit a user message with an explicit chart update policy
    ///
    /// Runs the full request cycle: guard, send, await, apply, cleanup.
    /// Backend failures are recovered locally (fixed apology message,
    /// prior dataset and charts untouched) and still count as `Accepted`.
    pub async fn submit_with(&self, text: &str, policy: ChartUpdate) -> Result<Submission> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Submission::RejectedEmpty);
        }

        // Guard and transition to Sending atomically
        let request = {
            let mut session = self.session.lock().await;
            if session.in_flight() {
                tracing::debug!(session_id = %session.id(), "Submission refused: request in flight");
                return Ok(Submission::RejectedBusy);
            }
            session.set_phase(RequestPhase::Sending);
            session.clear_progress_text();
            session.push_message(ChatMessage::user(trimmed));
            ChatRequest {
                message: trimmed.to_string(),
                session_id: session.id().to_string(),
            }
        };

        {
            let mut session = self.session.lock().await;
            session.set_phase(RequestPhase::AwaitingResponse);
        }

        let outcome = self.backend.analyze(&request).await;

        // Apply the outcome and clean up in one lock scope
        let mut session = self.session.lock().await;
        match outcome {
            Ok(response) => {
                session.set_phase(RequestPhase::Applying);
                apply_response(&mut session, response, policy, &self.display);
            }
            Err(e) => {
                session.set_phase(RequestPhase::Failed);
                tracing::warn!(session_id = %session.id(), error = %e, "Analysis request failed");
                session.push_message(ChatMessage::bot(FAILURE_MESSAGE));
            }
        }

        // Cleanup runs on both paths
        session.clear_progress_text();
        session.set_phase(RequestPhase::Idle);

        Ok(Submission::Accepted)
    }

    /// Apply a progress event to the session
    ///
    /// Foreign-session events and events arriving while idle are
    /// discarded; a stale event must not resurrect a progress display.
    /// Matching events overwrite the progress text, last write wins.
    pub async fn apply_progress(&self, event: &ProgressEvent) {
        let mut session = self.session.lock().await;
        if event.session_id != session.id() {
            tracing::trace!(
                event_session = %event.session_id,
                "Discarding progress event for foreign session"
            );
            return;
        }
        if !session.in_flight() {
            tracing::trace!("Discarding stale progress event");
            return;
        }
        session.set_progress_text(event.message.clone());
    }
}

/// Apply a successful response to session state
///
/// The bot reply always lands. The dataset is replaced wholesale when the
/// response carries one. Chart descriptors are parsed into typed entries;
/// descriptors that fail to parse or reference an excluded column are
/// skipped without affecting the rest. A response carrying data but no
/// descriptors leaves charts untouched; there is no implicit re-derivation.
fn apply_response(
    session: &mut Session,
    response: ChatResponse,
    policy: ChartUpdate,
    display: &DisplayConfig,
) {
    session.push_message(ChatMessage::bot(response.response));

    if let Some(data) = response.data {
        session.set_dataset(RawDataset::new(data));
    }

    if let Some(infos) = response.charts_info {
        let entries: Vec<ChartEntry> = infos
            .into_iter()
            .filter_map(|info| {
                match ChartDescriptor::from_wire(
                    &info.chart_type,
                    &info.visualization,
                    display.histogram_bins,
                    &display.excluded_columns,
                ) {
                    Some(descriptor) => Some(ChartEntry::new(info.chart_data, descriptor)),
                    None => {
                        tracing::debug!(kind = %info.chart_type, "Skipping unusable chart descriptor");
                        None
                    }
                }
            })
            .collect();

        match policy {
            ChartUpdate::Merge => {
                for entry in entries {
                    session.charts_mut().insert(entry);
                }
            }
            ChartUpdate::Replace => session.charts_mut().replace_all(entries),
        }
    }
}
