/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat`  — Interactive copilot shell
- `share` — Copy a share link for a fresh session

These handlers stay small and delegate to the library components:
the shell, the session views, and the share action.
*/

use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::{Result, ValidationError};
use crate::session::{OptionId, PollId, ShellEffect};
use crate::share::{share_url, share_with_fallback, ClipboardShare, ShareTarget};
use crate::shell::PaperAssistantShell;
use crate::views;
use colored::Colorize;

// Special commands parser for the shell
pub mod special_commands;

/// What the REPL should do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print these lines and read the next one
    Continue(Vec<String>),
    /// Leave the shell
    Exit,
}

/// Turn effects returned by the shell into printable lines
///
/// Scroll effects print the new message unless it is the user's own line,
/// which is already on screen. While another panel is active only a short
/// notice is shown.
pub fn present_effects(shell: &PaperAssistantShell, effects: &[ShellEffect]) -> Vec<String> {
    let state = shell.state();
    let mut lines = Vec::new();
    for effect in effects {
        match effect {
            ShellEffect::ScrollToLatest { message_id } => {
                let Some(message) = state.messages().iter().find(|m| m.id == *message_id) else {
                    continue;
                };
                if message.is_from_user {
                    continue;
                }
                if state.active_panel() == crate::panel::Panel::Chat {
                    lines.push(views::render_message(message));
                } else {
                    lines.push(
                        "New message in chat (/panel chat to view)"
                            .dimmed()
                            .to_string(),
                    );
                }
            }
            ShellEffect::PromptSnippetSave { preview } => {
                lines.push(format!(
                    "{} \"{}\"\n{}",
                    "Selected:".cyan().bold(),
                    views::preview(preview, 60),
                    "Save it with /save <title>, or /cancel.".dimmed()
                ));
            }
            ShellEffect::ScheduleReply { .. } | ShellEffect::ScheduleDocumentLoad => {}
        }
    }
    lines
}

/// Convert a 1-based option number to a draft index
fn draft_index(number: usize, len: usize) -> std::result::Result<usize, ValidationError> {
    number
        .checked_sub(1)
        .ok_or(ValidationError::OptionIndexOutOfRange { number, len })
}

const NO_DRAFT: &str = "No poll draft. Start one with /poll new <question>.";

fn warn_line(message: impl std::fmt::Display) -> String {
    format!("{}", message.to_string().yellow())
}

/// Execute one parsed special command against the shell
///
/// # Arguments
///
/// * `shell` - The session being driven
/// * `command` - The parsed command
/// * `config` - Configuration, used for the share link base
/// * `share_target` - Where `/share` sends the link
///
/// # Errors
///
/// Returns error if the session cannot be exported
pub fn dispatch(
    shell: &mut PaperAssistantShell,
    command: SpecialCommand,
    config: &Config,
    share_target: &mut dyn ShareTarget,
) -> Result<Outcome> {
    tracing::debug!(?command, "Dispatching command");
    let mut lines = Vec::new();

    match command {
        SpecialCommand::Exit => return Ok(Outcome::Exit),
        SpecialCommand::Help => print_help(),
        SpecialCommand::None => {}

        SpecialCommand::Load => {
            if shell.state().document_status().can_load() {
                let effects = shell.load_document();
                lines.push("Loading paper…".cyan().to_string());
                lines.extend(present_effects(shell, &effects));
            } else {
                lines.push(warn_line(format!(
                    "Nothing to load: the paper is {}.",
                    match shell.state().document_status() {
                        crate::session::DocumentStatus::Loading => "already loading",
                        _ => "already loaded",
                    }
                )));
            }
        }
        SpecialCommand::Summary => {
            let effects = shell.request_summary();
            lines.extend(present_effects(shell, &effects));
        }
        SpecialCommand::ShowDocument => lines.push(views::render_document(shell.state())),

        SpecialCommand::Select(text) => {
            let effects = shell.on_selection_change(&text);
            if effects.is_empty() {
                lines.push(warn_line(format!(
                    "Selection too short: select more than {} characters to save a snippet.",
                    shell.state().snippet_defaults().min_selection_chars
                )));
            }
            lines.extend(present_effects(shell, &effects));
        }
        SpecialCommand::SaveSnippet(title) => match shell.save_snippet(&title) {
            Ok(effects) => lines.extend(present_effects(shell, &effects)),
            Err(e) => lines.push(warn_line(e)),
        },
        SpecialCommand::CancelCapture => {
            shell.cancel_capture();
            lines.push("Selection discarded.".dimmed().to_string());
        }
        SpecialCommand::ListSnippets => {
            lines.push(views::render_snippets(shell.state().snippets()))
        }

        SpecialCommand::ShowDraft => match shell.state().draft() {
            Some(draft) => lines.push(views::render_draft(draft)),
            None => lines.push(warn_line(NO_DRAFT)),
        },
        SpecialCommand::PollNew(question) => {
            shell.start_draft(question);
            if let Some(draft) = shell.state().draft() {
                lines.push(views::render_draft(draft));
            }
        }
        SpecialCommand::PollOption { number, text } => {
            let edited = match shell.draft_mut() {
                Some(draft) => draft_index(number, draft.options.len())
                    .and_then(|index| draft.set_option(index, text))
                    .map(|_| true),
                None => Ok(false),
            };
            match edited {
                Ok(true) => {
                    if let Some(draft) = shell.state().draft() {
                        lines.push(views::render_draft(draft));
                    }
                }
                Ok(false) => lines.push(warn_line(NO_DRAFT)),
                Err(e) => lines.push(warn_line(e)),
            }
        }
        SpecialCommand::PollAddOption => match shell.draft_mut() {
            Some(draft) => {
                draft.add_option();
                if let Some(draft) = shell.state().draft() {
                    lines.push(views::render_draft(draft));
                }
            }
            None => lines.push(warn_line(NO_DRAFT)),
        },
        SpecialCommand::PollRemoveOption(number) => {
            let removed = match shell.draft_mut() {
                Some(draft) => draft_index(number, draft.options.len())
                    .and_then(|index| draft.remove_option(index))
                    .map(|_| true),
                None => Ok(false),
            };
            match removed {
                Ok(true) => {
                    if let Some(draft) = shell.state().draft() {
                        lines.push(views::render_draft(draft));
                    }
                }
                Ok(false) => lines.push(warn_line(NO_DRAFT)),
                Err(e) => lines.push(warn_line(e)),
            }
        }
        SpecialCommand::PollCreate => {
            if shell.state().draft().is_none() {
                lines.push(warn_line(NO_DRAFT));
            } else {
                match shell.create_poll_from_draft() {
                    Ok(effects) => lines.extend(present_effects(shell, &effects)),
                    Err(e) => lines.push(warn_line(e)),
                }
            }
        }
        SpecialCommand::PollDiscard => {
            shell.discard_draft();
            lines.push("Poll draft discarded.".dimmed().to_string());
        }
        SpecialCommand::Vote { poll, option } => {
            let poll_id = PollId(poll);
            if shell.vote(poll_id, OptionId(option)) {
                if let Some(poll) = shell.state().poll(poll_id) {
                    lines.push(views::render_poll(poll));
                }
            } else {
                lines.push(warn_line(format!(
                    "Vote not counted: poll {} is closed or has no option {}.",
                    poll, option
                )));
            }
        }
        SpecialCommand::ClosePoll(poll) => match shell.close_poll(PollId(poll)) {
            Ok(()) => lines.push(format!("Poll {} closed.", poll)),
            Err(e) => lines.push(warn_line(e)),
        },
        SpecialCommand::ListPolls => lines.push(views::render_polls(
            shell.state().polls(),
            shell.state().draft(),
        )),

        SpecialCommand::SwitchPanel(panel) => {
            let previous = shell.switch_panel(panel);
            tracing::debug!(%previous, %panel, "Panel switched");
            lines.push(views::render_panel(shell.state(), shell.pending_replies()));
        }

        SpecialCommand::Share => {
            let url = share_url(&config.share.url, shell.state().id());
            let outcome = share_with_fallback(share_target, &url);
            lines.push(outcome.confirmation().green().to_string());
        }
        SpecialCommand::Export => lines.push(shell.state().to_json()?),
        SpecialCommand::ShowStatus => {
            lines.push(views::render_status(shell.state(), shell.pending_replies()))
        }
    }

    Ok(Outcome::Continue(lines))
}

/// Handle one line typed at the prompt
///
/// # Errors
///
/// Returns error if a dispatched command fails
pub fn handle_line(
    shell: &mut PaperAssistantShell,
    line: &str,
    config: &Config,
    share_target: &mut dyn ShareTarget,
) -> Result<Outcome> {
    match parse_special_command(line) {
        Ok(SpecialCommand::None) => {
            let effects = shell.submit(line);
            let mut lines = present_effects(shell, &effects);
            if shell.pending_replies() > 0 {
                lines.push(views::typing_indicator(shell.pending_replies()));
            }
            Ok(Outcome::Continue(lines))
        }
        Ok(command) => dispatch(shell, command, config, share_target),
        Err(e) => Ok(Outcome::Continue(vec![warn_line(e)])),
    }
}

// Interactive shell handler
pub mod chat {
    //! Interactive copilot shell.
    //!
    //! Builds a [`PaperAssistantShell`] from configuration and runs a
    //! readline loop. The line editor lives on its own thread so assistant
    //! replies and document loads can be printed while the user is typing.

    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use tokio::sync::mpsc;

    /// Handle to the thread that owns the line editor
    struct LineReader {
        prompts: std::sync::mpsc::Sender<String>,
        lines: mpsc::UnboundedReceiver<rustyline::Result<String>>,
    }

    impl LineReader {
        fn spawn() -> Self {
            let (prompt_tx, prompt_rx) = std::sync::mpsc::channel::<String>();
            let (line_tx, line_rx) = mpsc::unbounded_channel();

            std::thread::spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => editor,
                    Err(e) => {
                        let _ = line_tx.send(Err(e));
                        return;
                    }
                };
                // Ends when the shell drops its prompt sender
                while let Ok(prompt) = prompt_rx.recv() {
                    let read = editor.readline(&prompt);
                    if let Ok(line) = &read {
                        let trimmed = line.trim();
                        if !trimmed.is_empty() {
                            if let Err(e) = editor.add_history_entry(trimmed) {
                                tracing::warn!("Failed to record history: {}", e);
                            }
                        }
                    }
                    if line_tx.send(read).is_err() {
                        break;
                    }
                }
            });

            Self {
                prompts: prompt_tx,
                lines: line_rx,
            }
        }

        fn request(&self, prompt: String) -> bool {
            self.prompts.send(prompt).is_ok()
        }
    }

    fn print_lines(lines: &[String]) {
        for line in lines {
            println!("{}\n", line);
        }
    }

    fn prompt(shell: &PaperAssistantShell) -> String {
        crate::panel::format_colored_prompt(shell.state().active_panel(), shell.pending_replies())
    }

    /// Start the interactive shell
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `autoload` - Start loading the paper right away
    ///
    /// # Examples
    ///
    /// ```
    /// use papercopilot::commands::chat;
    /// use papercopilot::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default(), false).await?;
    /// ```
    pub async fn run_chat(config: Config, autoload: bool) -> Result<()> {
        let mut shell = PaperAssistantShell::from_config(&config)?;
        let mut share_target = ClipboardShare;

        print_welcome_banner(&shell);
        if autoload {
            shell.load_document();
            println!("{}\n", "Loading paper…".cyan());
        }

        let mut reader = LineReader::spawn();
        reader.request(prompt(&shell));

        loop {
            tokio::select! {
                Some(effects) = shell.next_event() => {
                    let lines = present_effects(&shell, &effects);
                    if !lines.is_empty() {
                        println!();
                        print_lines(&lines);
                    }
                }

                read = reader.lines.recv() => {
                    match read {
                        Some(Ok(line)) => {
                            let trimmed = line.trim();
                            if !trimmed.is_empty() {
                                let ready = shell.drain_ready_events();
                                print_lines(&present_effects(&shell, &ready));
                                match handle_line(&mut shell, trimmed, &config, &mut share_target)? {
                                    Outcome::Continue(lines) => print_lines(&lines),
                                    Outcome::Exit => break,
                                }
                            }
                            if !reader.request(prompt(&shell)) {
                                break;
                            }
                        }
                        Some(Err(ReadlineError::Interrupted)) => {
                            println!("CTRL-C");
                            break;
                        }
                        Some(Err(ReadlineError::Eof)) | None => {
                            println!("CTRL-D");
                            break;
                        }
                        Some(Err(err)) => {
                            tracing::error!("Readline error: {:?}", err);
                            break;
                        }
                    }
                }
            }
        }

        shell.shutdown();
        println!("Goodbye!");
        Ok(())
    }

    /// Display welcome banner at the start of the shell
    fn print_welcome_banner(shell: &PaperAssistantShell) {
        let panel = shell.state().active_panel();
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║        PaperCopilot Research Shell - Welcome!                ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Panel:   {} ({})", panel.colored_tag(), panel.description());
        println!("Session: {}\n", shell.state().id());
        println!("Type '/load' to open the paper, '/help' for commands, 'exit' to quit\n");
    }
}

// Share command handler
pub mod share {
    //! Copy a share link for a fresh session.

    use super::*;
    use uuid::Uuid;

    /// Share a link for a new session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `target` - Where to send the link
    ///
    /// # Returns
    ///
    /// Returns the confirmation shown to the user
    pub fn run_share(config: &Config, target: &mut dyn ShareTarget) -> String {
        let url = share_url(&config.share.url, Uuid::new_v4());
        share_with_fallback(target, &url).confirmation()
    }

    /// Share through the system clipboard and print the confirmation
    pub fn run_share_clipboard(config: &Config) -> Result<()> {
        let confirmation = run_share(config, &mut ClipboardShare);
        println!("{}", confirmation.green());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CopilotError;
    use crate::panel::Panel;
    use crate::share::ShareOutcome;
    use crate::test_utils::{instant_shell, test_config};

    #[derive(Default)]
    struct RecordingShare {
        shared: Vec<String>,
    }

    impl ShareTarget for RecordingShare {
        fn share(&mut self, url: &str) -> Result<ShareOutcome> {
            self.shared.push(url.to_string());
            Ok(ShareOutcome::Copied(url.to_string()))
        }
    }

    struct Headless;

    impl ShareTarget for Headless {
        fn share(&mut self, _url: &str) -> Result<ShareOutcome> {
            Err(CopilotError::Share("no display".to_string()).into())
        }
    }

    fn shell() -> PaperAssistantShell {
        instant_shell()
    }

    fn run(shell: &mut PaperAssistantShell, line: &str) -> Vec<String> {
        colored::control::set_override(false);
        match handle_line(shell, line, &test_config(), &mut RecordingShare::default()) {
            Ok(Outcome::Continue(lines)) => lines,
            Ok(Outcome::Exit) => panic!("unexpected exit"),
            Err(e) => panic!("command failed: {}", e),
        }
    }

    #[tokio::test]
    async fn test_chat_text_schedules_reply() {
        let mut shell = shell();
        let lines = run(&mut shell, "what does this formula mean?");
        assert_eq!(lines, vec!["Assistant is typing…".to_string()]);
        assert_eq!(shell.pending_replies(), 1);

        let effects = shell.settle().await;
        let lines = present_effects(&shell, &effects);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Assistant"));
    }

    #[tokio::test]
    async fn test_exit_ends_session() {
        let mut shell = shell();
        let outcome = handle_line(
            &mut shell,
            "quit",
            &test_config(),
            &mut RecordingShare::default(),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Exit);
    }

    #[tokio::test]
    async fn test_unknown_command_prints_warning() {
        let mut shell = shell();
        let lines = run(&mut shell, "/upload");
        assert!(lines[0].contains("Unknown command: /upload"));
        assert!(shell.state().messages().is_empty());
    }

    #[tokio::test]
    async fn test_select_and_save_flow() {
        let mut shell = shell();
        let lines = run(&mut shell, "/select tiny");
        assert!(lines[0].contains("Selection too short"));

        let lines = run(&mut shell, "/select global anchor tokens");
        assert!(lines[0].contains("global anchor tokens"));

        let lines = run(&mut shell, "/save Anchors");
        assert_eq!(lines, vec!["✓ Saved snippet: Anchors".to_string()]);

        let lines = run(&mut shell, "/save Again");
        assert!(lines[0].contains("No text selected"));
        assert_eq!(shell.state().snippets().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_commands_end_to_end() {
        let mut shell = shell();
        run(&mut shell, "/poll new Which paper next?");
        run(&mut shell, "/poll option 1 Longformer");
        let lines = run(&mut shell, "/poll remove 1");
        assert!(lines[0].contains("at least"));

        run(&mut shell, "/poll option 2 Reformer");
        let lines = run(&mut shell, "/poll create");
        assert!(lines[0].contains("New poll:"));
        assert!(shell.state().draft().is_none());

        let lines = run(&mut shell, "/vote 1 2");
        assert!(lines[0].contains("100.0%"));

        let lines = run(&mut shell, "/vote 1 5");
        assert!(lines[0].contains("Vote not counted"));

        run(&mut shell, "/close 1");
        let lines = run(&mut shell, "/vote 1 1");
        assert!(lines[0].contains("Vote not counted"));
        assert_eq!(shell.state().polls()[0].total_votes, 1);
    }

    #[tokio::test]
    async fn test_option_errors_use_typed_numbers() {
        let mut shell = shell();
        run(&mut shell, "/poll new Which paper next?");

        let lines = run(&mut shell, "/poll option 5 x");
        assert_eq!(lines, vec!["Option 5 does not exist (draft has 2 options)".to_string()]);

        run(&mut shell, "/poll add");
        let lines = run(&mut shell, "/poll remove 4");
        assert_eq!(lines, vec!["Option 4 does not exist (draft has 3 options)".to_string()]);
    }

    #[tokio::test]
    async fn test_poll_option_without_draft() {
        let mut shell = shell();
        let lines = run(&mut shell, "/poll option 1 A");
        assert!(lines[0].contains("No poll draft"));
        let lines = run(&mut shell, "/poll create");
        assert!(lines[0].contains("No poll draft"));
    }

    #[tokio::test]
    async fn test_load_twice_reports_state() {
        let mut shell = shell();
        let lines = run(&mut shell, "/load");
        assert!(lines[0].contains("Loading paper"));
        let lines = run(&mut shell, "/load");
        assert!(lines[0].contains("already loading"));

        shell.settle().await;
        let lines = run(&mut shell, "/load");
        assert!(lines[0].contains("already loaded"));
    }

    #[tokio::test]
    async fn test_panel_switch_hides_new_messages() {
        let mut shell = shell();
        run(&mut shell, "/panel polls");
        assert_eq!(shell.state().active_panel(), Panel::Polls);
        let lines = run(&mut shell, "/summary");
        assert!(lines[0].contains("New message in chat"));
    }

    #[tokio::test]
    async fn test_share_uses_target_and_session_id() {
        colored::control::set_override(false);
        let mut shell = shell();
        let mut target = RecordingShare::default();
        let outcome = dispatch(
            &mut shell,
            SpecialCommand::Share,
            &test_config(),
            &mut target,
        )
        .unwrap();

        let expected = format!("https://papercopilot.local/session/{}", shell.state().id());
        assert_eq!(target.shared, vec![expected.clone()]);
        assert_eq!(
            outcome,
            Outcome::Continue(vec![format!("Link copied to clipboard: {}", expected)])
        );
    }

    #[tokio::test]
    async fn test_export_prints_json() {
        let mut shell = shell();
        run(&mut shell, "hello");
        let lines = run(&mut shell, "/export");
        let json: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(json["messages"][0]["text"], "hello");
    }

    #[test]
    fn test_run_share_falls_back_without_clipboard() {
        let confirmation = share::run_share(&test_config(), &mut Headless);
        assert!(confirmation.starts_with("Clipboard unavailable"));
        assert!(confirmation.contains("https://papercopilot.local/session/"));
    }
}
