//! PaperAssistantShell: the session owner
//!
//! The shell wraps a [`SessionState`] together with the reply and ingestion
//! providers. Session operations run synchronously against the state; any
//! [`ShellEffect::ScheduleReply`] or [`ShellEffect::ScheduleDocumentLoad`]
//! they return is turned into a one-shot tokio task. Finished tasks report
//! back over an unbounded channel as [`ShellEvent`]s, which the driver
//! applies with [`PaperAssistantShell::next_event`] or
//! [`PaperAssistantShell::drain_ready_events`]. State is therefore only
//! ever touched from the driver's task.
//!
//! All spawned tasks share one [`CancellationToken`]. [`shutdown`] and
//! `Drop` cancel it, so no reply or document is applied after the session
//! is torn down.
//!
//! [`shutdown`]: PaperAssistantShell::shutdown

use crate::config::Config;
use crate::error::{Result, ValidationError};
use crate::panel::Panel;
use crate::providers::{create_document_provider, create_reply_provider};
use crate::providers::{DocumentProvider, ReplyProvider};
use crate::session::{
    Document, MessageId, OptionId, PollDraft, PollId, SessionState, ShellEffect,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Result of a background task, applied by the driver
#[derive(Debug)]
pub enum ShellEvent {
    /// The reply provider finished
    Reply {
        /// User message being answered
        in_reply_to: MessageId,
        /// Reply text or failure reason
        outcome: std::result::Result<String, String>,
    },
    /// The ingestion provider finished
    DocumentLoaded(std::result::Result<Document, String>),
}

/// Delivers exactly one event per spawned task
///
/// If the task unwinds before sending (a provider panicked), dropping the
/// report sends the failure event instead, so the shell's in-flight
/// counters always come back down.
struct TaskReport {
    tx: mpsc::UnboundedSender<ShellEvent>,
    on_abort: Option<ShellEvent>,
}

impl TaskReport {
    fn new(tx: mpsc::UnboundedSender<ShellEvent>, on_abort: ShellEvent) -> Self {
        Self {
            tx,
            on_abort: Some(on_abort),
        }
    }

    fn send(mut self, event: ShellEvent) {
        self.on_abort = None;
        if self.tx.send(event).is_err() {
            tracing::debug!("Shell gone before task result arrived");
        }
    }

    /// Cancelled tasks report nothing
    fn disarm(mut self) {
        self.on_abort = None;
    }
}

impl Drop for TaskReport {
    fn drop(&mut self) {
        if let Some(event) = self.on_abort.take() {
            tracing::warn!(?event, "Background task ended without a result");
            let _ = self.tx.send(event);
        }
    }
}

/// Owner of one copilot session
pub struct PaperAssistantShell {
    state: SessionState,
    replies: Arc<dyn ReplyProvider>,
    documents: Arc<dyn DocumentProvider>,
    events_tx: mpsc::UnboundedSender<ShellEvent>,
    events_rx: mpsc::UnboundedReceiver<ShellEvent>,
    cancellation: CancellationToken,
    in_flight: usize,
    pending_replies: usize,
    closed: bool,
}

impl std::fmt::Debug for PaperAssistantShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperAssistantShell")
            .field("session", &self.state.id())
            .field("replies", &self.replies.name())
            .field("documents", &self.documents.name())
            .field("in_flight", &self.in_flight)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl PaperAssistantShell {
    /// Create a shell around `state` with explicit providers
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use papercopilot::providers::{CannedReplyProvider, MockDocumentProvider};
    /// use papercopilot::session::SessionState;
    /// use papercopilot::shell::PaperAssistantShell;
    ///
    /// let shell = PaperAssistantShell::new(
    ///     SessionState::default(),
    ///     Arc::new(CannedReplyProvider::new(Duration::ZERO)),
    ///     Arc::new(MockDocumentProvider::new(Duration::ZERO)),
    /// );
    /// assert_eq!(shell.pending_replies(), 0);
    /// ```
    pub fn new(
        state: SessionState,
        replies: Arc<dyn ReplyProvider>,
        documents: Arc<dyn DocumentProvider>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tracing::info!(
            session = %state.id(),
            replies = replies.name(),
            documents = documents.name(),
            "Session started"
        );
        Self {
            state,
            replies,
            documents,
            events_tx,
            events_rx,
            cancellation: CancellationToken::new(),
            in_flight: 0,
            pending_replies: 0,
            closed: false,
        }
    }

    /// Create a shell with providers and snippet defaults from `config`
    ///
    /// # Errors
    ///
    /// Returns error if a configured provider type is unknown
    pub fn from_config(config: &Config) -> Result<Self> {
        let replies = create_reply_provider(&config.assistant)?;
        let documents = create_document_provider(&config.document)?;
        let state = SessionState::new(config.snippets.to_defaults());
        Ok(Self::new(state, replies, documents))
    }

    /// Read access to the session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Replies scheduled but not yet applied
    pub fn pending_replies(&self) -> usize {
        self.pending_replies
    }

    /// True when any background task has not reported back yet
    pub fn has_pending_work(&self) -> bool {
        self.in_flight > 0
    }

    /// True once [`PaperAssistantShell::shutdown`] has run
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn spawn_reply(&mut self, message_id: MessageId, text: String) {
        let provider = Arc::clone(&self.replies);
        let transcript = self.state.messages().to_vec();
        let token = self.cancellation.clone();
        let report = TaskReport::new(
            self.events_tx.clone(),
            ShellEvent::Reply {
                in_reply_to: message_id,
                outcome: Err("the reply task stopped unexpectedly".to_string()),
            },
        );
        self.in_flight += 1;
        self.pending_replies += 1;

        tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    report.disarm();
                    tracing::debug!(%message_id, "Pending reply cancelled");
                }

                outcome = provider.reply(&transcript, &text) => {
                    let outcome = outcome.map_err(|e| e.to_string());
                    report.send(ShellEvent::Reply { in_reply_to: message_id, outcome });
                }
            }
        });
    }

    fn spawn_load(&mut self) {
        let provider = Arc::clone(&self.documents);
        let token = self.cancellation.clone();
        let report = TaskReport::new(
            self.events_tx.clone(),
            ShellEvent::DocumentLoaded(Err(
                "the document load stopped unexpectedly".to_string()
            )),
        );
        self.in_flight += 1;

        tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    report.disarm();
                    tracing::debug!("Pending document load cancelled");
                }

                outcome = provider.load() => {
                    let outcome = outcome.map_err(|e| e.to_string());
                    report.send(ShellEvent::DocumentLoaded(outcome));
                }
            }
        });
    }

    /// Start background work for scheduling effects
    ///
    /// Returns the effects meant for the presentation layer.
    fn run_effects(&mut self, effects: Vec<ShellEffect>) -> Vec<ShellEffect> {
        let mut view = Vec::new();
        for effect in effects {
            match effect {
                ShellEffect::ScheduleReply { message_id, text } => {
                    if self.closed {
                        tracing::debug!(%message_id, "Shell closed, reply not scheduled");
                    } else {
                        self.spawn_reply(message_id, text);
                    }
                }
                ShellEffect::ScheduleDocumentLoad => {
                    if !self.closed {
                        self.spawn_load();
                    }
                }
                other => view.push(other),
            }
        }
        view
    }

    // ---------------------------------------------------------------------
    // Operations. Each must be called from inside a tokio runtime.
    // ---------------------------------------------------------------------

    /// Replace the chat input field contents
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.set_input(text);
    }

    /// Submit chat text; blank text is ignored
    ///
    /// Ignored after shutdown, since the message could never be answered.
    pub fn submit(&mut self, text: &str) -> Vec<ShellEffect> {
        if self.closed {
            tracing::debug!("Shell closed, submission ignored");
            return Vec::new();
        }
        let effects = self.state.submit(text);
        self.run_effects(effects)
    }

    /// Submit the input field contents
    pub fn submit_input(&mut self) -> Vec<ShellEffect> {
        if self.closed {
            return Vec::new();
        }
        let effects = self.state.submit_input();
        self.run_effects(effects)
    }

    /// Append a structured summary (or the upload notice)
    pub fn request_summary(&mut self) -> Vec<ShellEffect> {
        let effects = self.state.request_summary();
        self.run_effects(effects)
    }

    /// Start loading the document; ignored after shutdown
    pub fn load_document(&mut self) -> Vec<ShellEffect> {
        if self.closed {
            return Vec::new();
        }
        let effects = self.state.begin_load();
        self.run_effects(effects)
    }

    /// Report the current text selection
    pub fn on_selection_change(&mut self, text: &str) -> Vec<ShellEffect> {
        let effects = self.state.on_selection_change(text);
        self.run_effects(effects)
    }

    /// Store a pending capture directly
    pub fn begin_capture(&mut self, text: impl Into<String>) {
        self.state.begin_capture(text);
    }

    /// Save the pending capture as a snippet
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the capture or the title is empty
    pub fn save_snippet(
        &mut self,
        title: &str,
    ) -> std::result::Result<Vec<ShellEffect>, ValidationError> {
        let effects = self.state.save_snippet(title)?;
        Ok(self.run_effects(effects))
    }

    /// Discard the pending capture
    pub fn cancel_capture(&mut self) {
        self.state.cancel_capture();
    }

    /// Create a poll
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank question or fewer than two options
    pub fn create_poll<S: AsRef<str>>(
        &mut self,
        question: &str,
        options: &[S],
    ) -> std::result::Result<Vec<ShellEffect>, ValidationError> {
        let effects = self.state.create_poll(question, options)?;
        Ok(self.run_effects(effects))
    }

    /// Start composing a poll
    pub fn start_draft(&mut self, question: impl Into<String>) {
        self.state.start_draft(question);
    }

    /// Mutable access to the poll being composed
    pub fn draft_mut(&mut self) -> Option<&mut PollDraft> {
        self.state.draft_mut()
    }

    /// Throw away the poll being composed
    pub fn discard_draft(&mut self) {
        self.state.discard_draft();
    }

    /// Create a poll from the draft
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if there is no valid draft
    pub fn create_poll_from_draft(
        &mut self,
    ) -> std::result::Result<Vec<ShellEffect>, ValidationError> {
        let effects = self.state.create_poll_from_draft()?;
        Ok(self.run_effects(effects))
    }

    /// Record a vote; false when nothing was counted
    pub fn vote(&mut self, poll_id: PollId, option_id: OptionId) -> bool {
        self.state.vote(poll_id, option_id)
    }

    /// Stop accepting votes on a poll
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPoll`] if the id does not resolve
    pub fn close_poll(&mut self, poll_id: PollId) -> std::result::Result<(), ValidationError> {
        self.state.close_poll(poll_id)
    }

    /// Switch the visible side panel, returning the previous one
    pub fn switch_panel(&mut self, panel: Panel) -> Panel {
        self.state.switch_panel(panel)
    }

    // ---------------------------------------------------------------------
    // Event handling
    // ---------------------------------------------------------------------

    fn apply_event(&mut self, event: ShellEvent) -> Vec<ShellEffect> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let effects = match event {
            ShellEvent::Reply {
                in_reply_to,
                outcome,
            } => {
                self.pending_replies = self.pending_replies.saturating_sub(1);
                match outcome {
                    Ok(text) => {
                        tracing::debug!(%in_reply_to, "Assistant reply applied");
                        self.state.push_assistant(text)
                    }
                    Err(reason) => {
                        tracing::warn!(%in_reply_to, %reason, "Assistant reply failed");
                        self.state.push_assistant(format!(
                            "Sorry, I couldn't answer that right now: {}",
                            reason
                        ))
                    }
                }
            }
            ShellEvent::DocumentLoaded(outcome) => self.state.finish_load(outcome),
        };
        self.run_effects(effects)
    }

    /// Wait for the next background task to finish and apply it
    ///
    /// Returns `None` immediately when nothing is pending or the shell is
    /// closed.
    pub async fn next_event(&mut self) -> Option<Vec<ShellEffect>> {
        if self.closed || self.in_flight == 0 {
            return None;
        }
        let event = self.events_rx.recv().await?;
        Some(self.apply_event(event))
    }

    /// Apply every event that has already arrived, without waiting
    pub fn drain_ready_events(&mut self) -> Vec<ShellEffect> {
        let mut effects = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if self.closed {
                tracing::debug!(?event, "Discarding event after shutdown");
                continue;
            }
            effects.extend(self.apply_event(event));
        }
        effects
    }

    /// Wait until all pending work has been applied
    pub async fn settle(&mut self) -> Vec<ShellEffect> {
        let mut effects = Vec::new();
        while let Some(batch) = self.next_event().await {
            effects.extend(batch);
        }
        effects
    }

    /// Cancel all pending work; later results are discarded
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.cancellation.cancel();
        self.closed = true;
        self.in_flight = 0;
        self.pending_replies = 0;
        tracing::info!(session = %self.state.id(), "Session closed");
    }
}

impl Drop for PaperAssistantShell {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
