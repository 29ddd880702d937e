//! Session state container
//!
//! [`SessionState`] owns every piece of session data: the transcript,
//! snippets, polls, the loaded document, and the in-progress forms. All
//! mutation goes through its methods, which return the [`ShellEffect`]s the
//! caller must carry out (schedule a reply, scroll the transcript, ...).
//! Nothing in here is asynchronous; the shell drives the effects.

use crate::error::{Result, ValidationError};
use crate::panel::Panel;
use crate::session::model::{
    Document, IdSequence, Message, MessageId, OptionId, Poll, PollId, Snippet, SnippetId,
};
use crate::session::poll::{announcement, validate_poll, PollDraft};
use crate::session::snippet::{SnippetCapture, SnippetDefaults};
use crate::session::summary::{structured_summary, UPLOAD_FIRST_NOTICE};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Work the caller must perform after a state update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEffect {
    /// Bring `message_id` into view; emitted for every transcript append
    ScrollToLatest {
        /// The newest message
        message_id: MessageId,
    },
    /// Ask the reply provider for an answer to a user message
    ScheduleReply {
        /// The user message being answered
        message_id: MessageId,
        /// The text the user submitted
        text: String,
    },
    /// Ask the ingestion provider for the document
    ScheduleDocumentLoad,
    /// Offer to save the current selection as a snippet
    PromptSnippetSave {
        /// The pending selection
        preview: String,
    },
}

/// Progress of document ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Nothing requested yet
    Empty,
    /// Ingestion in flight
    Loading,
    /// Document available
    Loaded,
    /// Last ingestion attempt failed
    Failed(String),
}

impl DocumentStatus {
    /// True when a new load may be started
    pub fn can_load(&self) -> bool {
        matches!(self, Self::Empty | Self::Failed(_))
    }
}

/// All state of one copilot session
///
/// Serializes for export only. The id sequences are not part of the
/// export, so a session cannot be rebuilt from it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    id: Uuid,
    messages: Vec<Message>,
    snippets: Vec<Snippet>,
    polls: Vec<Poll>,
    document: Option<Document>,
    document_status: DocumentStatus,
    active_panel: Panel,
    input: String,
    capture: SnippetCapture,
    draft: Option<PollDraft>,
    #[serde(skip)]
    snippet_defaults: SnippetDefaults,
    #[serde(skip)]
    message_ids: IdSequence,
    #[serde(skip)]
    snippet_ids: IdSequence,
    #[serde(skip)]
    poll_ids: IdSequence,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SnippetDefaults::default())
    }
}

impl SessionState {
    /// Create an empty session
    ///
    /// # Arguments
    ///
    /// * `snippet_defaults` - Tags, source label, and selection threshold for snippets
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::session::{SessionState, SnippetDefaults};
    ///
    /// let state = SessionState::new(SnippetDefaults::default());
    /// assert!(state.messages().is_empty());
    /// ```
    pub fn new(snippet_defaults: SnippetDefaults) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            snippets: Vec::new(),
            polls: Vec::new(),
            document: None,
            document_status: DocumentStatus::Empty,
            active_panel: Panel::Chat,
            input: String::new(),
            capture: SnippetCapture::default(),
            draft: None,
            snippet_defaults,
            message_ids: IdSequence::default(),
            snippet_ids: IdSequence::default(),
            poll_ids: IdSequence::default(),
        }
    }

    /// Session identifier, used in share links and log spans
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The transcript in append order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Saved snippets in creation order
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Polls in creation order
    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    /// Look up a poll by id
    pub fn poll(&self, poll_id: PollId) -> Option<&Poll> {
        self.polls.iter().find(|p| p.id == poll_id)
    }

    /// The loaded document, if ingestion has finished
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Current ingestion status
    pub fn document_status(&self) -> &DocumentStatus {
        &self.document_status
    }

    /// Panel currently shown next to the document
    pub fn active_panel(&self) -> Panel {
        self.active_panel
    }

    /// Current contents of the chat input field
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Selection waiting for a snippet title
    pub fn pending_capture(&self) -> Option<&str> {
        self.capture.pending()
    }

    /// Poll being composed, if any
    pub fn draft(&self) -> Option<&PollDraft> {
        self.draft.as_ref()
    }

    /// Mutable access to the poll being composed
    pub fn draft_mut(&mut self) -> Option<&mut PollDraft> {
        self.draft.as_mut()
    }

    /// Snippet defaults in effect for this session
    pub fn snippet_defaults(&self) -> &SnippetDefaults {
        &self.snippet_defaults
    }

    /// Switch the visible side panel, returning the previous one
    pub fn switch_panel(&mut self, panel: Panel) -> Panel {
        let previous = self.active_panel;
        self.active_panel = panel;
        previous
    }

    fn append(&mut self, message: Message) -> ShellEffect {
        let message_id = message.id;
        self.messages.push(message);
        ShellEffect::ScrollToLatest { message_id }
    }

    fn next_message_id(&mut self) -> MessageId {
        MessageId(self.message_ids.next_value())
    }

    /// Append an assistant message
    pub fn push_assistant(&mut self, text: impl Into<String>) -> Vec<ShellEffect> {
        let id = self.next_message_id();
        vec![self.append(Message::assistant(id, text))]
    }

    // ---------------------------------------------------------------------
    // Chat
    // ---------------------------------------------------------------------

    /// Replace the chat input field contents
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submit free text to the assistant
    ///
    /// Blank text is ignored and returns no effects. Otherwise the user
    /// message is appended, the input field is cleared, and a reply is
    /// scheduled.
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::session::{SessionState, ShellEffect};
    ///
    /// let mut state = SessionState::default();
    /// assert!(state.submit("   ").is_empty());
    ///
    /// let effects = state.submit("What is attention?");
    /// assert_eq!(state.messages().len(), 1);
    /// assert!(matches!(effects[1], ShellEffect::ScheduleReply { .. }));
    /// ```
    pub fn submit(&mut self, text: &str) -> Vec<ShellEffect> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let id = self.next_message_id();
        let scroll = self.append(Message::user(id, text));
        self.input.clear();
        tracing::debug!(message_id = %id, "User message appended, reply scheduled");

        vec![
            scroll,
            ShellEffect::ScheduleReply {
                message_id: id,
                text: text.to_string(),
            },
        ]
    }

    /// Submit whatever is in the input field
    pub fn submit_input(&mut self) -> Vec<ShellEffect> {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Append a structured summary of the loaded document
    ///
    /// Without a document exactly one upload notice is appended instead.
    pub fn request_summary(&mut self) -> Vec<ShellEffect> {
        let text = match &self.document {
            Some(document) => structured_summary(document),
            None => {
                tracing::debug!("Summary requested without a document");
                UPLOAD_FIRST_NOTICE.to_string()
            }
        };
        self.push_assistant(text)
    }

    // ---------------------------------------------------------------------
    // Document
    // ---------------------------------------------------------------------

    /// Start document ingestion
    ///
    /// No-op while a load is in flight or once a document is loaded.
    pub fn begin_load(&mut self) -> Vec<ShellEffect> {
        if !self.document_status.can_load() {
            tracing::debug!(status = ?self.document_status, "Ignoring load request");
            return Vec::new();
        }
        self.document_status = DocumentStatus::Loading;
        vec![ShellEffect::ScheduleDocumentLoad]
    }

    /// Apply the outcome of document ingestion
    ///
    /// Success stores the document and appends a ready notice; failure
    /// appends a visible error message and allows a retry.
    pub fn finish_load(&mut self, outcome: std::result::Result<Document, String>) -> Vec<ShellEffect> {
        match outcome {
            Ok(document) => {
                let notice = format!(
                    "Loaded **{}**. Select text to save snippets, or ask me anything about the paper.",
                    document.title
                );
                tracing::info!(title = %document.title, "Document loaded");
                self.document = Some(document);
                self.document_status = DocumentStatus::Loaded;
                self.push_assistant(notice)
            }
            Err(reason) => {
                tracing::warn!(%reason, "Document load failed");
                self.document_status = DocumentStatus::Failed(reason.clone());
                self.push_assistant(format!(
                    "I couldn't load the paper: {}. Try /load again.",
                    reason
                ))
            }
        }
    }

    /// Report the user's current text selection
    ///
    /// Selections at or below the configured threshold are ignored.
    /// Longer selections become the pending capture.
    pub fn on_selection_change(&mut self, text: &str) -> Vec<ShellEffect> {
        if !self.snippet_defaults.accepts_selection(text) {
            return Vec::new();
        }
        let preview = text.trim().to_string();
        self.capture.begin(preview.clone());
        vec![ShellEffect::PromptSnippetSave { preview }]
    }

    // ---------------------------------------------------------------------
    // Snippets
    // ---------------------------------------------------------------------

    /// Store `text` as the pending capture
    pub fn begin_capture(&mut self, text: impl Into<String>) {
        self.capture.begin(text);
    }

    /// Discard the pending capture
    pub fn cancel_capture(&mut self) {
        self.capture.cancel();
    }

    /// Save the pending capture as a snippet titled `title`
    ///
    /// Appends a snippet notice to the transcript on success.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the capture or the title is empty;
    /// no state changes in that case.
    pub fn save_snippet(&mut self, title: &str) -> std::result::Result<Vec<ShellEffect>, ValidationError> {
        let (title, content) = self.capture.commit(title).map_err(|e| {
            tracing::warn!(error = %e, "Snippet save rejected");
            e
        })?;

        let snippet = Snippet {
            id: SnippetId(self.snippet_ids.next_value()),
            title: title.clone(),
            content,
            created_at: Utc::now(),
            tags: self.snippet_defaults.tags.clone(),
            source: self.snippet_defaults.source.clone(),
        };
        tracing::debug!(snippet_id = %snippet.id, "Snippet saved");
        self.snippets.push(snippet);

        let id = self.next_message_id();
        Ok(vec![self.append(Message::snippet_notice(id, title))])
    }

    // ---------------------------------------------------------------------
    // Polls
    // ---------------------------------------------------------------------

    /// Create a poll and announce it in the transcript
    ///
    /// Blank options are dropped; the question must be non-empty and at
    /// least two options must remain.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] and leaves the poll list unchanged
    /// when validation fails.
    pub fn create_poll<S: AsRef<str>>(
        &mut self,
        question: &str,
        options: &[S],
    ) -> std::result::Result<Vec<ShellEffect>, ValidationError> {
        let (question, options) = validate_poll(question, options).map_err(|e| {
            tracing::warn!(error = %e, "Poll creation rejected");
            e
        })?;

        let poll_id = PollId(self.poll_ids.next_value());
        let text = format!("{}\n\n(poll {})", announcement(&question, &options), poll_id.0);
        self.polls.push(Poll::new(poll_id, question, options));
        tracing::debug!(%poll_id, "Poll created");

        let id = self.next_message_id();
        Ok(vec![self.append(Message::assistant(id, text))])
    }

    /// Start composing a poll, replacing any existing draft
    pub fn start_draft(&mut self, question: impl Into<String>) {
        self.draft = Some(PollDraft::with_question(question));
    }

    /// Throw away the poll being composed
    pub fn discard_draft(&mut self) {
        self.draft = None;
    }

    /// Create a poll from the current draft
    ///
    /// The draft is cleared on success and kept for correction on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPollQuestion`] when there is no draft,
    /// or any error from [`SessionState::create_poll`].
    pub fn create_poll_from_draft(&mut self) -> std::result::Result<Vec<ShellEffect>, ValidationError> {
        let draft = self
            .draft
            .clone()
            .ok_or(ValidationError::EmptyPollQuestion)?;
        let effects = self.create_poll(&draft.question, &draft.options)?;
        self.draft = None;
        Ok(effects)
    }

    /// Record a vote
    ///
    /// Returns false, changing nothing, when the poll is inactive or either
    /// id does not resolve.
    pub fn vote(&mut self, poll_id: PollId, option_id: OptionId) -> bool {
        let counted = self
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .map(|poll| poll.record_vote(option_id))
            .unwrap_or(false);
        tracing::debug!(%poll_id, %option_id, counted, "Vote");
        counted
    }

    /// Stop accepting votes on a poll
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPoll`] if the id does not resolve.
    pub fn close_poll(&mut self, poll_id: PollId) -> std::result::Result<(), ValidationError> {
        let poll = self
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .ok_or_else(|| ValidationError::UnknownPoll(poll_id.to_string()))?;
        poll.is_active = false;
        Ok(())
    }

    /// Serialize the session for inspection
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
