//! Shell
//!
//! Root of the interactive terminal client: a header, one active view
//! (calendar or chat), and a footer. Input arrives one line at a time and is
//! parsed against whichever view is active.

mod commands;
mod render;

pub use commands::{parse, ActiveView, Command, CommandError, HELP};
pub use render::{render_calendar, render_chat, render_day, render_form, render_grid};

use crate::calendar::{CalendarError, CalendarView};
use crate::chat::{ChatView, SubmitOutcome};
use crate::model::ActivityId;

pub const TITLE: &str = "Activity Calendar";
pub const SUBTITLE: &str = "Organize your activities by pillar";
pub const FOOTER: &str = "Activity Calendar - type 'help' for commands";

/// Result of handling one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    /// Keep reading; optionally print a notice first
    Continue(Option<String>),
    Quit,
}

pub struct Shell {
    active: ActiveView,
    calendar: CalendarView,
    chat: ChatView,
}

impl Shell {
    /// Start on the calendar view
    pub fn new(calendar: CalendarView, chat: ChatView) -> Self {
        Self {
            active: ActiveView::Calendar,
            calendar,
            chat,
        }
    }

    pub fn active(&self) -> ActiveView {
        self.active
    }

    pub fn calendar(&self) -> &CalendarView {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut CalendarView {
        &mut self.calendar
    }

    pub fn chat(&self) -> &ChatView {
        &self.chat
    }

    /// Switch between the calendar and the chat
    ///
    /// Each view keeps its state while hidden.
    pub fn toggle(&mut self) {
        self.active = match self.active {
            ActiveView::Calendar => ActiveView::Chat,
            ActiveView::Chat => ActiveView::Calendar,
        };
        tracing::debug!(view = ?self.active, "Switched view");
    }

    /// Label of the toggle control
    pub fn toggle_label(&self) -> &'static str {
        match self.active {
            ActiveView::Calendar => "Switch to assistant (tab)",
            ActiveView::Chat => "Switch to calendar (tab)",
        }
    }

    pub fn header(&self) -> String {
        format!("{} | {}    [{}]", TITLE, SUBTITLE, self.toggle_label())
    }

    /// Parse and run one line of input
    pub async fn handle_line(&mut self, line: &str) -> ShellOutcome {
        match parse(line, self.active) {
            Ok(command) => self.execute(command).await,
            Err(e) => ShellOutcome::Continue(Some(e.to_string())),
        }
    }

    pub async fn execute(&mut self, command: Command) -> ShellOutcome {
        let notice = match command {
            Command::Quit => return ShellOutcome::Quit,
            Command::Toggle => {
                self.toggle();
                None
            }
            Command::Help => Some(HELP.to_string()),
            Command::Redraw => None,

            Command::Next => {
                self.calendar.next_month();
                None
            }
            Command::Prev => {
                self.calendar.prev_month();
                None
            }
            Command::Day(day) => notice_of(self.calendar.select_day(day)),
            Command::New => {
                self.calendar.open_new_today();
                None
            }
            Command::Edit(id) => notice_of(self.calendar.open_edit(&id).await),
            Command::Delete(id) => self.delete(&id).await,
            Command::Set(field, value) => match self.calendar.form_mut() {
                Some(form) => form.set(field, &value).err().map(|e| e.to_string()),
                None => Some(CalendarError::NoForm.to_string()),
            },
            Command::Save => notice_of(self.calendar.submit().await),
            Command::Cancel => {
                self.calendar.close_modal();
                None
            }
            Command::Reload => notice_of(self.calendar.reload().await),

            Command::Suggest(index) => {
                if self.chat.apply_suggestion(index) {
                    None
                } else {
                    Some("No such suggestion".to_string())
                }
            }
            Command::Send => self.send().await,
            Command::Say(text) => {
                self.chat.set_input(text);
                self.send().await
            }
        };
        ShellOutcome::Continue(notice)
    }

    async fn delete(&mut self, id: &ActivityId) -> Option<String> {
        match self.calendar.delete(id).await {
            Ok(true) => None,
            Ok(false) => Some("Delete cancelled".to_string()),
            Err(e) => failure_notice(e),
        }
    }

    async fn send(&mut self) -> Option<String> {
        match self.chat.submit().await {
            SubmitOutcome::Ignored => Some("Nothing to send".to_string()),
            SubmitOutcome::Answered | SubmitOutcome::Failed => None,
        }
    }

    /// Header, the active view and the footer
    pub async fn render(&self) -> String {
        let body = match self.active {
            ActiveView::Calendar => render_calendar(&self.calendar).await,
            ActiveView::Chat => render_chat(&self.chat),
        };
        format!("{}\n\n{}\n{}", self.header(), body, FOOTER)
    }
}

fn notice_of(result: Result<(), CalendarError>) -> Option<String> {
    result.err().and_then(failure_notice)
}

/// Network failures already show in the banner; only other errors need a notice
fn failure_notice(err: CalendarError) -> Option<String> {
    match err {
        CalendarError::Load(_) | CalendarError::Save(_) | CalendarError::Delete(_) => None,
        other => Some(other.to_string()),
    }
}
