//! Session entities: messages, snippets, polls, and the loaded document
//!
//! Every entity is created by an explicit user action and lives only in
//! memory for the lifetime of the session. Identifiers are typed newtypes
//! issued by a per-collection [`IdSequence`], so creation order and id
//! order agree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

sequential_id!(
    /// Identifier of a transcript message
    MessageId,
    "msg"
);
sequential_id!(
    /// Identifier of a saved snippet
    SnippetId,
    "snippet"
);
sequential_id!(
    /// Identifier of a poll
    PollId,
    "poll"
);

/// Identifier of a poll option, derived from its position in the poll
///
/// Option ids are 1-based so they match the numbering shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub usize);

impl OptionId {
    /// Build the id for the option at `index` (0-based)
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::session::OptionId;
    ///
    /// assert_eq!(OptionId::from_position(0), OptionId(1));
    /// ```
    pub fn from_position(index: usize) -> Self {
        Self(index + 1)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opt-{}", self.0)
    }
}

/// Monotonic id source for one collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    /// Issue the next id value, starting at 1
    pub fn next_value(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

/// A single transcript entry
///
/// Messages are immutable once appended to the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id
    pub id: MessageId,
    /// Message body, possibly containing markup
    pub text: String,
    /// True when the user wrote the message
    pub is_from_user: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// True for the notice appended when a snippet is saved
    #[serde(default)]
    pub is_snippet_notice: bool,
    /// Title of the saved snippet, for snippet notices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_title: Option<String>,
}

impl Message {
    /// Creates a message written by the user
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_from_user: true,
            created_at: Utc::now(),
            is_snippet_notice: false,
            snippet_title: None,
        }
    }

    /// Creates a message written by the assistant
    pub fn assistant(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_from_user: false,
            created_at: Utc::now(),
            is_snippet_notice: false,
            snippet_title: None,
        }
    }

    /// Creates the notice announcing a saved snippet
    pub fn snippet_notice(id: MessageId, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            text: format!("Saved snippet: **{}**", title),
            is_from_user: false,
            created_at: Utc::now(),
            is_snippet_notice: true,
            snippet_title: Some(title),
        }
    }
}

/// A titled excerpt captured from the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique snippet id
    pub id: SnippetId,
    /// User supplied title, never empty
    pub title: String,
    /// Captured excerpt, never empty
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Tags attached at creation
    pub tags: BTreeSet<String>,
    /// Where the excerpt came from
    pub source: String,
}

/// One answer of a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Position-derived id
    pub id: OptionId,
    /// Option text, never empty
    pub text: String,
    /// Votes recorded for this option
    pub votes: u64,
}

/// A multiple-choice question with live tallies
///
/// `total_votes` always equals the sum of the option votes. Both are only
/// changed together through [`Poll::record_vote`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    /// Unique poll id
    pub id: PollId,
    /// Question text, never empty
    pub question: String,
    /// Options in display order, at least two
    pub options: Vec<PollOption>,
    /// Sum of all option votes
    pub total_votes: u64,
    /// Inactive polls ignore votes
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Build an active poll with zeroed tallies
    ///
    /// Callers validate the question and option texts beforehand.
    pub(crate) fn new(id: PollId, question: String, option_texts: Vec<String>) -> Self {
        let options = option_texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| PollOption {
                id: OptionId::from_position(index),
                text,
                votes: 0,
            })
            .collect();

        Self {
            id,
            question,
            options,
            total_votes: 0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Look up an option by id
    pub fn option(&self, option_id: OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Record one vote for `option_id`
    ///
    /// Returns false without changing anything when the poll is inactive or
    /// the option does not exist.
    pub fn record_vote(&mut self, option_id: OptionId) -> bool {
        if !self.is_active {
            return false;
        }
        match self.options.iter_mut().find(|o| o.id == option_id) {
            Some(option) => {
                option.votes += 1;
                self.total_votes += 1;
                true
            }
            None => false,
        }
    }

    /// Share of the total votes held by `option`, as a percentage
    ///
    /// Returns 0.0 when no votes have been cast.
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::session::SessionState;
    /// use papercopilot::session::OptionId;
    ///
    /// let mut state = SessionState::default();
    /// state.create_poll("Q", &["A", "B"]).unwrap();
    /// let poll_id = state.polls()[0].id;
    /// state.vote(poll_id, OptionId(1));
    /// let poll = &state.polls()[0];
    /// assert_eq!(poll.percentage(&poll.options[0]), 100.0);
    /// assert_eq!(poll.percentage(&poll.options[1]), 0.0);
    /// ```
    pub fn percentage(&self, option: &PollOption) -> f64 {
        if self.total_votes == 0 {
            0.0
        } else {
            option.votes as f64 / self.total_votes as f64 * 100.0
        }
    }

    /// True when `total_votes` matches the option tallies
    pub fn tallies_consistent(&self) -> bool {
        self.total_votes == self.options.iter().map(|o| o.votes).sum::<u64>()
    }
}

/// A titled section of the loaded paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading
    pub title: String,
    /// Section body
    pub content: String,
}

/// The loaded research paper, read-only after ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Paper title
    pub title: String,
    /// Authors in byline order
    pub authors: Vec<String>,
    /// Paper abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Full body with lightweight markup
    pub content: String,
    /// Sections in reading order
    pub sections: Vec<Section>,
}
