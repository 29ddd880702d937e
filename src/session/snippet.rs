//! Snippet capture
//!
//! A selection in the document becomes a pending capture. Saving commits it
//! under a title; cancelling discards it.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Defaults applied to every saved snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetDefaults {
    /// Tags attached to new snippets
    pub tags: BTreeSet<String>,
    /// Source label attached to new snippets
    pub source: String,
    /// Selections must be longer than this many characters to prompt a save
    pub min_selection_chars: usize,
}

impl Default for SnippetDefaults {
    fn default() -> Self {
        Self {
            tags: ["research", "important"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            source: "Research Paper".to_string(),
            min_selection_chars: 10,
        }
    }
}

impl SnippetDefaults {
    /// True when `selection` is long enough to offer a snippet save
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::session::SnippetDefaults;
    ///
    /// let defaults = SnippetDefaults::default();
    /// assert!(!defaults.accepts_selection("too short"));
    /// assert!(defaults.accepts_selection("long enough text"));
    /// ```
    pub fn accepts_selection(&self, selection: &str) -> bool {
        selection.trim().chars().count() > self.min_selection_chars
    }
}

/// Pending selection awaiting a title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetCapture {
    pending: Option<String>,
}

impl SnippetCapture {
    /// Store `text` as the pending capture, replacing any previous one
    pub fn begin(&mut self, text: impl Into<String>) {
        self.pending = Some(text.into());
    }

    /// Currently pending text, if any
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Discard the pending capture
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Validate `title` against the pending capture and take both
    ///
    /// The pending capture is only consumed on success.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySnippetContent`] when nothing
    /// non-blank is pending and [`ValidationError::EmptySnippetTitle`] when
    /// the title is blank.
    pub fn commit(&mut self, title: &str) -> Result<(String, String), ValidationError> {
        let content = match self.pending.as_deref().map(str::trim) {
            Some(content) if !content.is_empty() => content.to_string(),
            _ => return Err(ValidationError::EmptySnippetContent),
        };
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptySnippetTitle);
        }
        self.pending = None;
        Ok((title.to_string(), content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tags_and_source() {
        let defaults = SnippetDefaults::default();
        assert!(defaults.tags.contains("research"));
        assert!(defaults.tags.contains("important"));
        assert_eq!(defaults.tags.len(), 2);
        assert_eq!(defaults.source, "Research Paper");
    }

    #[test]
    fn test_selection_threshold_is_exclusive() {
        let defaults = SnippetDefaults::default();
        assert!(!defaults.accepts_selection("0123456789"));
        assert!(defaults.accepts_selection("0123456789a"));
        assert!(!defaults.accepts_selection("   0123456789   "));
    }

    #[test]
    fn test_commit_without_pending_is_rejected() {
        let mut capture = SnippetCapture::default();
        assert_eq!(
            capture.commit("Title"),
            Err(ValidationError::EmptySnippetContent)
        );
    }

    #[test]
    fn test_commit_with_blank_title_keeps_pending() {
        let mut capture = SnippetCapture::default();
        capture.begin("attention is all you need");
        assert_eq!(capture.commit("  "), Err(ValidationError::EmptySnippetTitle));
        assert_eq!(capture.pending(), Some("attention is all you need"));
    }

    #[test]
    fn test_commit_consumes_pending() {
        let mut capture = SnippetCapture::default();
        capture.begin("  sparse attention  ");
        let (title, content) = capture.commit(" Idea ").unwrap();
        assert_eq!(title, "Idea");
        assert_eq!(content, "sparse attention");
        assert!(capture.pending().is_none());
    }

    #[test]
    fn test_cancel_twice_is_same_as_once() {
        let mut capture = SnippetCapture::default();
        capture.begin("something selected");
        capture.cancel();
        let after_once = capture.clone();
        capture.cancel();
        assert_eq!(capture, after_once);
        assert!(capture.pending().is_none());
    }
}
