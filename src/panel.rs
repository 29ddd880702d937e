//! Side panel selection
//!
//! The document viewer is always visible; next to it the shell shows one of
//! three panels:
//! - Chat: the transcript and input field
//! - Snippets: saved excerpts
//! - Polls: polls with live tallies

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Panel shown next to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    /// Transcript and chat input
    #[default]
    Chat,

    /// Saved snippets
    Snippets,

    /// Polls and voting
    Polls,
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "CHAT"),
            Self::Snippets => write!(f, "SNIPPETS"),
            Self::Polls => write!(f, "POLLS"),
        }
    }
}

impl Panel {
    /// Parse a panel from a string
    ///
    /// # Arguments
    ///
    /// * `s` - Panel name ("chat", "snippets", "polls"; singular forms accepted)
    ///
    /// # Returns
    ///
    /// Returns the parsed Panel or an error if the string is invalid
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::panel::Panel;
    ///
    /// let panel = Panel::parse_str("polls").unwrap();
    /// assert_eq!(panel, Panel::Polls);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(Self::Chat),
            "snippets" | "snippet" => Ok(Self::Snippets),
            "polls" | "poll" => Ok(Self::Polls),
            other => Err(format!("Unknown panel: {}", other)),
        }
    }

    /// Get a user-friendly description of this panel
    pub fn description(&self) -> &'static str {
        match self {
            Self::Chat => "Conversation with the research assistant",
            Self::Snippets => "Excerpts saved from the paper",
            Self::Polls => "Polls and live vote tallies",
        }
    }

    /// Get a colored tag representation of this panel
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Chat => format!("[{}]", "CHAT".purple()),
            Self::Snippets => format!("[{}]", "SNIPPETS".green()),
            Self::Polls => format!("[{}]", "POLLS".cyan()),
        }
    }
}

/// Format the readline prompt for the active panel
///
/// A pending reply count is shown while the assistant is "typing".
///
/// # Examples
///
/// ```
/// use papercopilot::panel::{format_prompt, Panel};
///
/// assert_eq!(format_prompt(Panel::Chat, 0), "[CHAT] >> ");
/// assert_eq!(format_prompt(Panel::Polls, 2), "[POLLS][typing x2] >> ");
/// ```
pub fn format_prompt(panel: Panel, pending_replies: usize) -> String {
    if pending_replies == 0 {
        format!("[{}] >> ", panel)
    } else {
        format!("[{}][typing x{}] >> ", panel, pending_replies)
    }
}

/// Colored variant of [`format_prompt`]
pub fn format_colored_prompt(panel: Panel, pending_replies: usize) -> String {
    if pending_replies == 0 {
        format!("{} >> ", panel.colored_tag())
    } else {
        format!(
            "{}[{}] >> ",
            panel.colored_tag(),
            format!("typing x{}", pending_replies).yellow()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_display() {
        assert_eq!(Panel::Chat.to_string(), "CHAT");
        assert_eq!(Panel::Snippets.to_string(), "SNIPPETS");
        assert_eq!(Panel::Polls.to_string(), "POLLS");
    }

    #[test]
    fn test_panel_parse_case_insensitive() {
        assert_eq!(Panel::parse_str("CHAT").unwrap(), Panel::Chat);
        assert_eq!(Panel::parse_str(" Snippet ").unwrap(), Panel::Snippets);
        assert_eq!(Panel::parse_str("poll").unwrap(), Panel::Polls);
    }

    #[test]
    fn test_panel_parse_invalid() {
        assert!(Panel::parse_str("sidebar").is_err());
    }

    #[test]
    fn test_panel_default_is_chat() {
        assert_eq!(Panel::default(), Panel::Chat);
    }

    #[test]
    fn test_colored_tag_contains_name() {
        for panel in [Panel::Chat, Panel::Snippets, Panel::Polls] {
            assert!(panel.colored_tag().contains(&panel.to_string()));
        }
    }

    #[test]
    fn test_colored_prompt_ends_with_marker() {
        let prompt = format_colored_prompt(Panel::Snippets, 1);
        assert!(prompt.contains("SNIPPETS"));
        assert!(prompt.contains("typing x1"));
        assert!(prompt.ends_with(" >> "));
    }

    #[test]
    fn test_panel_serde_lowercase() {
        let json = serde_json::to_string(&Panel::Snippets).unwrap();
        assert_eq!(json, "\"snippets\"");
    }
}
