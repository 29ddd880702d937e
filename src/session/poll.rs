//! Poll composition and validation
//!
//! A [`PollDraft`] is the editable form behind `/poll new`. It always holds
//! at least two option slots; blank slots are allowed while composing and
//! filtered out by [`validate_poll`] when the poll is created.

use crate::error::ValidationError;
use crate::markup::escape_markup;
use serde::{Deserialize, Serialize};

/// Minimum number of options a poll (or draft) may hold
pub const MIN_POLL_OPTIONS: usize = 2;

/// Editable poll form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDraft {
    /// Question being composed
    pub question: String,
    /// Option slots, possibly blank
    pub options: Vec<String>,
}

impl Default for PollDraft {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![String::new(); MIN_POLL_OPTIONS],
        }
    }
}

impl PollDraft {
    /// Start a draft for `question` with two blank options
    pub fn with_question(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// Replace the question text
    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    /// Replace the text of the option at `index` (0-based)
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OptionIndexOutOfRange`] if the slot does
    /// not exist.
    pub fn set_option(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let len = self.options.len();
        match self.options.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                Ok(())
            }
            None => Err(ValidationError::OptionIndexOutOfRange {
                number: index + 1,
                len,
            }),
        }
    }

    /// Append one blank option slot
    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Remove the option at `index` (0-based)
    ///
    /// The draft never drops below [`MIN_POLL_OPTIONS`] slots.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MinimumOptions`] when removal would leave
    /// fewer than two options, or [`ValidationError::OptionIndexOutOfRange`]
    /// when the slot does not exist. The draft is unchanged in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::session::PollDraft;
    ///
    /// let mut draft = PollDraft::default();
    /// assert!(draft.remove_option(0).is_err());
    /// assert_eq!(draft.options.len(), 2);
    /// ```
    pub fn remove_option(&mut self, index: usize) -> Result<(), ValidationError> {
        if self.options.len() <= MIN_POLL_OPTIONS {
            return Err(ValidationError::MinimumOptions);
        }
        if index >= self.options.len() {
            return Err(ValidationError::OptionIndexOutOfRange {
                number: index + 1,
                len: self.options.len(),
            });
        }
        self.options.remove(index);
        Ok(())
    }
}

/// Check a poll question and options, returning the cleaned values
///
/// Blank options are dropped before counting; surviving texts are trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyPollQuestion`] or
/// [`ValidationError::TooFewPollOptions`].
pub fn validate_poll<S: AsRef<str>>(
    question: &str,
    options: &[S],
) -> Result<(String, Vec<String>), ValidationError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ValidationError::EmptyPollQuestion);
    }

    let options: Vec<String> = options
        .iter()
        .map(|o| o.as_ref().trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if options.len() < MIN_POLL_OPTIONS {
        return Err(ValidationError::TooFewPollOptions {
            found: options.len(),
        });
    }

    Ok((question.to_string(), options))
}

/// Announcement text appended to the transcript for a new poll
///
/// The question and options are user text and are escaped.
pub fn announcement(question: &str, options: &[String]) -> String {
    let mut text = format!("**New poll:** {}\n", escape_markup(question));
    for (index, option) in options.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", index + 1, escape_markup(option)));
    }
    text.push_str("Vote with /vote <poll> <option>.");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_keeps_user_markup_literal() {
        let text = announcement("Is **this** # real?", &["**A**".to_string(), "# B".to_string()]);
        let plain = crate::markup::render_plain(&text);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines[0], "New poll: Is **this** # real?");
        assert_eq!(lines[1], "1. **A**");
        assert_eq!(lines[2], "2. # B");
    }

    #[test]
    fn test_announcement_flattens_multiline_question() {
        let text = announcement("Line one\n# Heading", &["A".to_string(), "B".to_string()]);
        assert!(crate::markup::parse(&text)
            .iter()
            .all(|block| !matches!(block, crate::markup::Block::Heading { .. })));
    }

    #[test]
    fn test_default_draft_has_two_blank_options() {
        let draft = PollDraft::default();
        assert!(draft.question.is_empty());
        assert_eq!(draft.options, vec![String::new(), String::new()]);
    }

    #[test]
    fn test_add_then_remove_option() {
        let mut draft = PollDraft::with_question("Q");
        draft.add_option();
        assert_eq!(draft.options.len(), 3);
        draft.remove_option(1).unwrap();
        assert_eq!(draft.options.len(), 2);
    }

    #[test]
    fn test_remove_option_at_minimum_is_rejected() {
        let mut draft = PollDraft::with_question("Q");
        draft.set_option(0, "A").unwrap();
        draft.set_option(1, "B").unwrap();
        assert_eq!(draft.remove_option(0), Err(ValidationError::MinimumOptions));
        assert_eq!(draft.options, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_remove_option_out_of_range() {
        let mut draft = PollDraft::default();
        draft.add_option();
        assert_eq!(
            draft.remove_option(3),
            Err(ValidationError::OptionIndexOutOfRange { number: 4, len: 3 })
        );
        assert_eq!(draft.options.len(), 3);
    }

    #[test]
    fn test_set_option_out_of_range() {
        let mut draft = PollDraft::default();
        assert!(matches!(
            draft.set_option(2, "C"),
            Err(ValidationError::OptionIndexOutOfRange { number: 3, len: 2 })
        ));
    }

    #[test]
    fn test_validate_poll_filters_blank_options() {
        let (question, options) = validate_poll("  Which? ", &["A", "  ", "", " B "]).unwrap();
        assert_eq!(question, "Which?");
        assert_eq!(options, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_validate_poll_all_blank_options_rejected() {
        assert_eq!(
            validate_poll("Q", &["", ""]),
            Err(ValidationError::TooFewPollOptions { found: 0 })
        );
    }

    #[test]
    fn test_validate_poll_single_option_rejected() {
        assert_eq!(
            validate_poll("Q", &["A", " "]),
            Err(ValidationError::TooFewPollOptions { found: 1 })
        );
    }

    #[test]
    fn test_validate_poll_empty_question_rejected() {
        assert_eq!(
            validate_poll("   ", &["A", "B"]),
            Err(ValidationError::EmptyPollQuestion)
        );
    }

    #[test]
    fn test_announcement_numbers_options() {
        let text = announcement("Q?", &["Yes".to_string(), "No".to_string()]);
        assert!(text.contains("**New poll:** Q?"));
        assert!(text.contains("1. Yes"));
        assert!(text.contains("2. No"));
    }
}
