//! Terminal rendering of the session
//!
//! Every view is a pure function from session data to a `String`, so the
//! shell decides when to print and tests can check the text. Styling uses
//! `colored`; assistant text goes through [`crate::markup`].

use crate::markup::render_terminal;
use crate::panel::Panel;
use crate::session::{
    DocumentStatus, Message, Poll, PollDraft, SessionState, Snippet,
};
use colored::Colorize;

const BAR_WIDTH: usize = 20;
const PREVIEW_CHARS: usize = 60;

fn banner(title: &str) -> String {
    format!(
        "╔══════════════════════════════════════════════════════════════╗\n║ {:<60} ║\n╚══════════════════════════════════════════════════════════════╝",
        title
    )
}

/// Shorten `text` to at most `max` characters, adding an ellipsis
pub fn preview(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut.trim_end())
    }
}

/// Horizontal bar for a percentage in `0.0..=100.0`
///
/// # Examples
///
/// ```
/// use papercopilot::views::percentage_bar;
///
/// assert_eq!(percentage_bar(50.0, 4), "██░░");
/// assert_eq!(percentage_bar(0.0, 3), "░░░");
/// ```
pub fn percentage_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// The document viewer
pub fn render_document(state: &SessionState) -> String {
    match state.document_status() {
        DocumentStatus::Empty => format!(
            "{}\n\n{}",
            banner("Document"),
            "No paper loaded. Type /load to open the sample paper.".dimmed()
        ),
        DocumentStatus::Loading => format!("{}\n\n{}", banner("Document"), "Loading paper…".cyan()),
        DocumentStatus::Failed(reason) => format!(
            "{}\n\n{}\n{}",
            banner("Document"),
            format!("Loading failed: {}", reason).red(),
            "Type /load to try again.".dimmed()
        ),
        DocumentStatus::Loaded => match state.document() {
            Some(document) => {
                let mut out = vec![banner(&preview(&document.title, 60))];
                out.push(String::new());
                out.push(document.authors.join(", ").italic().to_string());
                out.push(String::new());
                out.push("Abstract".bold().to_string());
                out.push(document.abstract_text.clone());
                out.push(String::new());
                out.push(render_terminal(&document.content));
                out.join("\n")
            }
            None => banner("Document"),
        },
    }
}

/// One transcript entry
pub fn render_message(message: &Message) -> String {
    if message.is_snippet_notice {
        let title = message.snippet_title.as_deref().unwrap_or_default();
        return format!("{} Saved snippet: {}", "✓".green(), title.bold());
    }

    let time = message.created_at.format("%H:%M");
    if message.is_from_user {
        format!("{} {}\n{}", "You".blue().bold(), time.to_string().dimmed(), message.text)
    } else {
        format!(
            "{} {}\n{}",
            "Assistant".purple().bold(),
            time.to_string().dimmed(),
            render_terminal(&message.text)
        )
    }
}

/// The whole chat transcript, with a typing indicator when replies are pending
pub fn render_transcript(messages: &[Message], pending_replies: usize) -> String {
    let mut out: Vec<String> = messages.iter().map(render_message).collect();
    if messages.is_empty() {
        out.push(
            "Ask about equations, definitions, or hard passages. Type /help for commands."
                .dimmed()
                .to_string(),
        );
    }
    if pending_replies > 0 {
        out.push(typing_indicator(pending_replies));
    }
    out.join("\n\n")
}

/// Indicator shown while assistant replies are pending
pub fn typing_indicator(pending_replies: usize) -> String {
    if pending_replies > 1 {
        format!("Assistant is typing… ({} replies pending)", pending_replies)
            .dimmed()
            .to_string()
    } else {
        "Assistant is typing…".dimmed().to_string()
    }
}

/// The snippet panel
pub fn render_snippets(snippets: &[Snippet]) -> String {
    let mut out = vec![banner(&format!("Snippets ({})", snippets.len()))];
    if snippets.is_empty() {
        out.push(
            "No snippets yet. Use /select <text> then /save <title>."
                .dimmed()
                .to_string(),
        );
        return out.join("\n");
    }

    for snippet in snippets {
        let tags: Vec<&str> = snippet.tags.iter().map(String::as_str).collect();
        out.push(format!(
            "{} {}  {}",
            format!("[{}]", snippet.id.0).dimmed(),
            snippet.title.bold(),
            snippet.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        ));
        out.push(format!("  \"{}\"", preview(&snippet.content, PREVIEW_CHARS)));
        out.push(format!(
            "  {} {} · {}",
            "source:".dimmed(),
            snippet.source,
            tags.join(", ").cyan()
        ));
    }
    out.join("\n")
}

/// A single poll with tallies
pub fn render_poll(poll: &Poll) -> String {
    let status = if poll.is_active {
        "open".green()
    } else {
        "closed".red()
    };
    let mut out = vec![format!(
        "{} {}  ({}, {} votes)",
        format!("Poll {}:", poll.id.0).bold(),
        poll.question,
        status,
        poll.total_votes
    )];
    for option in &poll.options {
        let pct = poll.percentage(option);
        out.push(format!(
            "  {}. {:<24} {} {:>5.1}% ({})",
            option.id.0,
            preview(&option.text, 24),
            percentage_bar(pct, BAR_WIDTH).cyan(),
            pct,
            option.votes
        ));
    }
    out.join("\n")
}

/// The poll being composed
pub fn render_draft(draft: &PollDraft) -> String {
    let question = if draft.question.trim().is_empty() {
        "(no question)".dimmed().to_string()
    } else {
        draft.question.clone()
    };
    let mut out = vec![format!("{} {}", "Draft poll:".yellow().bold(), question)];
    for (index, option) in draft.options.iter().enumerate() {
        let text = if option.trim().is_empty() {
            "(empty)".dimmed().to_string()
        } else {
            option.clone()
        };
        out.push(format!("  {}. {}", index + 1, text));
    }
    out.push(
        "Edit with /poll option <n> <text>, then /poll create."
            .dimmed()
            .to_string(),
    );
    out.join("\n")
}

/// The poll panel, including any draft
pub fn render_polls(polls: &[Poll], draft: Option<&PollDraft>) -> String {
    let mut out = vec![banner(&format!("Polls ({})", polls.len()))];
    if polls.is_empty() && draft.is_none() {
        out.push("No polls yet. Start one with /poll new <question>.".dimmed().to_string());
    }
    for poll in polls {
        out.push(render_poll(poll));
    }
    if let Some(draft) = draft {
        out.push(render_draft(draft));
    }
    out.join("\n\n")
}

/// The side panel currently selected in `state`
pub fn render_panel(state: &SessionState, pending_replies: usize) -> String {
    match state.active_panel() {
        Panel::Chat => render_transcript(state.messages(), pending_replies),
        Panel::Snippets => render_snippets(state.snippets()),
        Panel::Polls => render_polls(state.polls(), state.draft()),
    }
}

/// Status box shown by `/status`
pub fn render_status(state: &SessionState, pending_replies: usize) -> String {
    let document = match state.document_status() {
        DocumentStatus::Empty => "not loaded".to_string(),
        DocumentStatus::Loading => "loading".to_string(),
        DocumentStatus::Loaded => state
            .document()
            .map(|d| d.title.clone())
            .unwrap_or_default(),
        DocumentStatus::Failed(reason) => format!("failed ({})", reason),
    };
    let capture = state
        .pending_capture()
        .map(|c| format!("\"{}\"", preview(c, 40)))
        .unwrap_or_else(|| "none".to_string());

    [
        banner("PaperCopilot Session Status"),
        String::new(),
        format!("Session:           {}", state.id()),
        format!(
            "Panel:             {} ({})",
            state.active_panel().colored_tag(),
            state.active_panel().description()
        ),
        format!("Document:          {}", document),
        format!("Messages:          {}", state.messages().len()),
        format!("Pending Replies:   {}", pending_replies),
        format!("Snippets:          {}", state.snippets().len()),
        format!("Pending Selection: {}", capture),
        format!("Polls:             {}", state.polls().len()),
        format!(
            "Draft Poll:        {}",
            if state.draft().is_some() { "yes" } else { "no" }
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock_document;
    use crate::session::OptionId;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("ééééééé", 4), "ééé…");
    }

    #[test]
    fn test_percentage_bar_bounds() {
        assert_eq!(percentage_bar(100.0, 5), "█████");
        assert_eq!(percentage_bar(250.0, 2), "██");
        assert_eq!(percentage_bar(-5.0, 2), "░░");
    }

    #[test]
    fn test_document_view_follows_status() {
        plain();
        let mut state = SessionState::default();
        assert!(render_document(&state).contains("/load"));

        state.begin_load();
        assert!(render_document(&state).contains("Loading paper"));

        state.finish_load(Err("timeout".to_string()));
        assert!(render_document(&state).contains("Loading failed: timeout"));

        state.begin_load();
        state.finish_load(Ok(mock_document()));
        let view = render_document(&state);
        assert!(view.contains("Maya Chen"));
        assert!(view.contains("Abstract"));
        assert!(!view.contains("## "));
    }

    #[test]
    fn test_transcript_shows_typing_indicator() {
        plain();
        let mut state = SessionState::default();
        state.submit("What is an equation?");
        let view = render_transcript(state.messages(), 1);
        assert!(view.contains("You"));
        assert!(view.contains("What is an equation?"));
        assert!(view.contains("Assistant is typing"));
        assert!(!render_transcript(state.messages(), 0).contains("typing"));
    }

    #[test]
    fn test_snippet_notice_rendering() {
        plain();
        let mut state = SessionState::default();
        state.begin_capture("a captured passage");
        state.save_snippet("Key idea").unwrap();
        let view = render_message(state.messages().last().unwrap());
        assert_eq!(view, "✓ Saved snippet: Key idea");
    }

    #[test]
    fn test_snippet_panel_lists_tags_and_source() {
        plain();
        let mut state = SessionState::default();
        state.begin_capture("a captured passage");
        state.save_snippet("Key idea").unwrap();
        let view = render_snippets(state.snippets());
        assert!(view.contains("Key idea"));
        assert!(view.contains("Research Paper"));
        assert!(view.contains("important, research"));
    }

    #[test]
    fn test_poll_view_shows_percentages() {
        plain();
        let mut state = SessionState::default();
        state.create_poll("Best?", &["A", "B"]).unwrap();
        let id = state.polls()[0].id;
        state.vote(id, OptionId(1));
        state.vote(id, OptionId(1));
        state.vote(id, OptionId(2));
        state.vote(id, OptionId(1));

        let view = render_poll(state.poll(id).unwrap());
        assert!(view.contains("75.0%"));
        assert!(view.contains("25.0%"));
        assert!(view.contains("4 votes"));
        assert!(view.contains("open"));
    }

    #[test]
    fn test_polls_panel_includes_draft() {
        plain();
        let mut state = SessionState::default();
        state.start_draft("Next paper?");
        let view = render_polls(state.polls(), state.draft());
        assert!(view.contains("Draft poll: Next paper?"));
        assert!(view.contains("1. (empty)"));
    }

    #[test]
    fn test_render_panel_follows_active_panel() {
        plain();
        let mut state = SessionState::default();
        state.switch_panel(Panel::Snippets);
        assert!(render_panel(&state, 0).contains("Snippets (0)"));
        state.switch_panel(Panel::Polls);
        assert!(render_panel(&state, 0).contains("Polls (0)"));
    }

    #[test]
    fn test_status_view() {
        plain();
        let mut state = SessionState::default();
        state.on_selection_change("selected words here");
        let view = render_status(&state, 2);
        assert!(view.contains("Pending Replies:   2"));
        assert!(view.contains("\"selected words here\""));
        assert!(view.contains("not loaded"));
    }
}
