//! Shell line commands

use thiserror::Error;

use crate::calendar::{FormError, FormField};
use crate::model::ActivityId;

/// Which view the shell is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Calendar,
    Chat,
}

/// One parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch between calendar and chat
    Toggle,
    Quit,
    Help,
    /// Blank line; just redraw
    Redraw,

    // Calendar
    Next,
    Prev,
    Day(u32),
    New,
    Edit(ActivityId),
    Delete(ActivityId),
    Set(FormField, String),
    Save,
    Cancel,
    Reload,

    // Chat
    Suggest(usize),
    Send,
    Say(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Form(#[from] FormError),
}

pub const HELP: &str = "\
Global:   tab (switch view), help, quit
Calendar: next, prev, day <n>, new, edit <id>, delete <id>,
          set <title|description|date|time|pillar> <value>, save, cancel, reload
Chat:     type a message and press enter, suggest <n>, send";

/// Parse a line typed while `view` is active
pub fn parse(line: &str, view: ActiveView) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Redraw),
        "tab" | "switch" => return Ok(Command::Toggle),
        "quit" | "exit" => return Ok(Command::Quit),
        "help" | "?" => return Ok(Command::Help),
        _ => {}
    }

    match view {
        ActiveView::Calendar => parse_calendar(word, rest),
        ActiveView::Chat => {
            Ok(parse_chat(word, rest).unwrap_or_else(|| Command::Say(line.to_string())))
        }
    }
}

fn parse_calendar(word: &str, rest: &str) -> Result<Command, CommandError> {
    match word.to_ascii_lowercase().as_str() {
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Prev),
        "new" | "today" => Ok(Command::New),
        "save" => Ok(Command::Save),
        "cancel" => Ok(Command::Cancel),
        "reload" => Ok(Command::Reload),
        "day" => rest
            .parse()
            .map(Command::Day)
            .map_err(|_| CommandError::Usage("day <n>")),
        "edit" => id_arg(rest, "edit <id>").map(Command::Edit),
        "delete" | "rm" => id_arg(rest, "delete <id>").map(Command::Delete),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(CommandError::Usage("set <field> <value>"));
            }
            Ok(Command::Set(field.parse()?, value.to_string()))
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Chat commands; anything else is a message
fn parse_chat(word: &str, rest: &str) -> Option<Command> {
    match word.to_ascii_lowercase().as_str() {
        "suggest" => rest
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| Command::Suggest(n - 1)),
        "send" if rest.is_empty() => Some(Command::Send),
        _ => None,
    }
}

fn id_arg(rest: &str, usage: &'static str) -> Result<ActivityId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    rest.parse().map_err(|_| CommandError::Usage(usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_commands_in_both_views() {
        for view in [ActiveView::Calendar, ActiveView::Chat] {
            assert_eq!(parse("tab", view), Ok(Command::Toggle));
            assert_eq!(parse("  quit ", view), Ok(Command::Quit));
            assert_eq!(parse("", view), Ok(Command::Redraw));
        }
    }

    #[test]
    fn test_calendar_commands() {
        let view = ActiveView::Calendar;
        assert_eq!(parse("day 10", view), Ok(Command::Day(10)));
        assert_eq!(parse("edit 7", view), Ok(Command::Edit(ActivityId::Int(7))));
        assert_eq!(
            parse("set title Morning run", view),
            Ok(Command::Set(FormField::Title, "Morning run".to_string()))
        );
        assert_eq!(
            parse("set time", view),
            Ok(Command::Set(FormField::Time, String::new()))
        );
        assert_eq!(parse("day", view), Err(CommandError::Usage("day <n>")));
        assert!(matches!(parse("dance", view), Err(CommandError::Unknown(_))));
        assert!(matches!(parse("set colour red", view), Err(CommandError::Form(_))));
    }

    #[test]
    fn test_chat_text_is_a_message() {
        let view = ActiveView::Chat;
        assert_eq!(
            parse("what is next today?", view),
            Ok(Command::Say("what is next today?".to_string()))
        );
        assert_eq!(parse("suggest 2", view), Ok(Command::Suggest(1)));
        assert_eq!(
            parse("suggest a dinner", view),
            Ok(Command::Say("suggest a dinner".to_string()))
        );
        assert_eq!(parse("send", view), Ok(Command::Send));
    }
}
