//! Share action
//!
//! Sharing a session means handing its link to the platform: copy it to the
//! system clipboard when one is available, otherwise print it so the user
//! can copy it by hand. Either way the user is told it worked.

use crate::error::{CopilotError, Result};
use uuid::Uuid;

/// What happened to the shared link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Link placed on the clipboard
    Copied(String),
    /// No clipboard; link shown to the user instead
    Displayed(String),
}

impl ShareOutcome {
    /// The shared link
    pub fn url(&self) -> &str {
        match self {
            Self::Copied(url) | Self::Displayed(url) => url,
        }
    }

    /// Message confirming the share to the user
    pub fn confirmation(&self) -> String {
        match self {
            Self::Copied(url) => format!("Link copied to clipboard: {}", url),
            Self::Displayed(url) => format!("Clipboard unavailable. Share this link: {}", url),
        }
    }
}

/// A platform capability able to share a link
pub trait ShareTarget {
    /// Share `url`
    ///
    /// # Errors
    ///
    /// Returns error if the platform capability is unavailable
    fn share(&mut self, url: &str) -> Result<ShareOutcome>;
}

/// Shares by copying to the system clipboard
#[derive(Debug, Default)]
pub struct ClipboardShare;

impl ShareTarget for ClipboardShare {
    fn share(&mut self, url: &str) -> Result<ShareOutcome> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| CopilotError::Share(format!("Clipboard unavailable: {}", e)))?;
        clipboard
            .set_text(url.to_string())
            .map_err(|e| CopilotError::Share(format!("Failed to copy link: {}", e)))?;
        Ok(ShareOutcome::Copied(url.to_string()))
    }
}

/// Build the share link for a session
///
/// # Examples
///
/// ```
/// use papercopilot::share::share_url;
/// use uuid::Uuid;
///
/// let id = Uuid::nil();
/// assert_eq!(
///     share_url("https://host/s/", id),
///     "https://host/s/00000000-0000-0000-0000-000000000000"
/// );
/// ```
pub fn share_url(base: &str, session_id: Uuid) -> String {
    format!("{}/{}", base.trim_end_matches('/'), session_id)
}

/// Share `url` through `target`, falling back to displaying it
pub fn share_with_fallback(target: &mut dyn ShareTarget, url: &str) -> ShareOutcome {
    let outcome = match target.share(url) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("Share target failed, displaying link instead: {}", e);
            ShareOutcome::Displayed(url.to_string())
        }
    };
    tracing::info!(
        url = outcome.url(),
        copied = matches!(outcome, ShareOutcome::Copied(_)),
        "Session link shared"
    );
    outcome
}
