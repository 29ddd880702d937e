//! Special commands parser for the copilot shell
//!
//! Anything typed at the prompt that starts with `/` is a special command;
//! everything else is chat text for the assistant. Special commands let users:
//! - Load and summarize the paper
//! - Capture selections and save them as snippets
//! - Compose, create, vote on, and close polls
//! - Switch the visible side panel
//! - Share or export the session
//! - Exit the session
//!
//! Command keywords are case-insensitive; arguments keep their case.

use crate::panel::Panel;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed in the shell
///
/// Numbers typed by the user (poll numbers, option numbers) are 1-based and
/// carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start loading the paper
    Load,

    /// Ask for a structured summary of the paper
    Summary,

    /// Print the document viewer
    ShowDocument,

    /// Report a text selection from the paper
    Select(String),

    /// Save the pending selection as a snippet with this title
    SaveSnippet(String),

    /// Discard the pending selection
    CancelCapture,

    /// Show saved snippets
    ListSnippets,

    /// Show the poll being composed
    ShowDraft,

    /// Start composing a poll with this question
    PollNew(String),

    /// Set the text of draft option `number`
    PollOption { number: usize, text: String },

    /// Append a blank option to the draft
    PollAddOption,

    /// Remove draft option `number`
    PollRemoveOption(usize),

    /// Create a poll from the draft
    PollCreate,

    /// Throw the draft away
    PollDiscard,

    /// Vote for `option` in `poll`
    Vote { poll: u64, option: usize },

    /// Stop accepting votes on a poll
    ClosePoll(u64),

    /// Show polls with tallies
    ListPolls,

    /// Switch the visible side panel
    SwitchPanel(Panel),

    /// Copy a share link for this session
    Share,

    /// Print the session as JSON
    Export,

    /// Display session status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the assistant as chat text.
    None,
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn unsupported(command: &str, arg: &str) -> CommandError {
    CommandError::UnsupportedArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    }
}

/// Parse a 1-based number argument
fn parse_number<T: std::str::FromStr + PartialEq + Default>(
    command: &str,
    arg: &str,
) -> Result<T, CommandError> {
    match arg.parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(unsupported(command, arg)),
    }
}

/// Split `text` at the first whitespace run
fn split_first(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    }
}

fn parse_poll_command(args: &str) -> Result<SpecialCommand, CommandError> {
    let (sub, rest) = split_first(args);
    match sub.to_lowercase().as_str() {
        "" => Ok(SpecialCommand::ShowDraft),
        "new" => {
            if rest.is_empty() {
                Err(missing("/poll new", "/poll new <question>"))
            } else {
                Ok(SpecialCommand::PollNew(rest.to_string()))
            }
        }
        "option" => {
            let (number, text) = split_first(rest);
            if number.is_empty() || text.is_empty() {
                return Err(missing("/poll option", "/poll option <n> <text>"));
            }
            let number = parse_number("/poll option", number)?;
            Ok(SpecialCommand::PollOption {
                number,
                text: text.to_string(),
            })
        }
        "add" => Ok(SpecialCommand::PollAddOption),
        "remove" => {
            if rest.is_empty() {
                return Err(missing("/poll remove", "/poll remove <n>"));
            }
            Ok(SpecialCommand::PollRemoveOption(parse_number(
                "/poll remove",
                rest,
            )?))
        }
        "create" => Ok(SpecialCommand::PollCreate),
        "discard" => Ok(SpecialCommand::PollDiscard),
        other => Err(unsupported("/poll", other)),
    }
}

/// Parse a user input string into a special command
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None for chat text.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use papercopilot::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/vote 1 2").unwrap();
/// assert_eq!(cmd, SpecialCommand::Vote { poll: 1, option: 2 });
///
/// let cmd = parse_special_command("/save Key Result").unwrap();
/// assert_eq!(cmd, SpecialCommand::SaveSnippet("Key Result".to_string()));
///
/// let cmd = parse_special_command("what is attention?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/upload").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') {
        return match lower.as_str() {
            "exit" | "quit" => Ok(SpecialCommand::Exit),
            _ => Ok(SpecialCommand::None),
        };
    }

    let (keyword, args) = split_first(trimmed);
    match keyword.to_lowercase().as_str() {
        "/load" => Ok(SpecialCommand::Load),
        "/summary" | "/summarize" => Ok(SpecialCommand::Summary),
        "/doc" | "/document" => Ok(SpecialCommand::ShowDocument),

        // Snippets
        "/select" => {
            if args.is_empty() {
                Err(missing("/select", "/select <text>"))
            } else {
                Ok(SpecialCommand::Select(args.to_string()))
            }
        }
        "/save" => {
            if args.is_empty() {
                Err(missing("/save", "/save <title>"))
            } else {
                Ok(SpecialCommand::SaveSnippet(args.to_string()))
            }
        }
        "/cancel" => Ok(SpecialCommand::CancelCapture),
        "/snippets" => Ok(SpecialCommand::ListSnippets),

        // Polls
        "/poll" => parse_poll_command(args),
        "/vote" => {
            let (poll, option) = split_first(args);
            if poll.is_empty() || option.is_empty() {
                return Err(missing("/vote", "/vote <poll> <option>"));
            }
            Ok(SpecialCommand::Vote {
                poll: parse_number("/vote", poll)?,
                option: parse_number("/vote", option)?,
            })
        }
        "/close" => {
            if args.is_empty() {
                return Err(missing("/close", "/close <poll>"));
            }
            Ok(SpecialCommand::ClosePoll(parse_number("/close", args)?))
        }
        "/polls" => Ok(SpecialCommand::ListPolls),

        // Panels
        "/panel" => {
            if args.is_empty() {
                return Err(missing("/panel", "/panel <chat|snippets|polls>"));
            }
            Panel::parse_str(args)
                .map(SpecialCommand::SwitchPanel)
                .map_err(|_| unsupported("/panel", args))
        }
        "/chat" => Ok(SpecialCommand::SwitchPanel(Panel::Chat)),

        // Session
        "/share" => Ok(SpecialCommand::Share),
        "/export" => Ok(SpecialCommand::Export),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Display help text for special commands
///
/// # Examples
///
/// ```
/// use papercopilot::commands::special_commands::print_help;
///
/// print_help();
/// ```
pub fn print_help() {
    println!(
        r#"
Special Commands for the Copilot Shell
======================================

DOCUMENT:
  /load             - Load the paper
  /doc              - Show the paper
  /summary          - Ask for a structured summary

SNIPPETS:
  /select <text>    - Select text from the paper (more than 10 characters)
  /save <title>     - Save the selection as a snippet
  /cancel           - Discard the selection
  /snippets         - Show saved snippets

POLLS:
  /poll new <question>     - Start composing a poll
  /poll option <n> <text>  - Set option n of the draft
  /poll add                - Add another option
  /poll remove <n>         - Remove option n (at least two remain)
  /poll create             - Create the poll from the draft
  /poll discard            - Throw the draft away
  /poll                    - Show the draft
  /vote <poll> <option>    - Vote, e.g. /vote 1 2
  /close <poll>            - Stop accepting votes
  /polls                   - Show polls and tallies

PANELS:
  /panel chat|snippets|polls - Switch the side panel

SESSION:
  /share            - Copy a share link for this session
  /export           - Print the session as JSON
  /status           - Show session status
  /help             - Show this help message
  /?                - Same as /help
  exit              - Exit the shell
  quit              - Same as exit

NOTES:
  - Command names are case-insensitive
  - Regular text (not starting with /) is sent to the assistant
  - Ask about equations, definitions, summaries, or hard passages
"#
    );
}
