//! Plain-text rendering of the views

use chrono::NaiveDate;
use std::fmt::Write;

use crate::calendar::{ActivityForm, CalendarView, GridCell, MonthGrid, WEEKDAY_NAMES};
use crate::chat::ChatView;
use crate::model::{Activity, ChatRole, Pillar};

const CELL_WIDTH: usize = 14;

/// Pad or cut `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn join_row(cells: impl Iterator<Item = String>) -> String {
    let row: Vec<String> = cells.collect();
    format!("|{}|", row.join("|"))
}

/// Month grid, one block of lines per week
pub fn render_grid(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let rule = format!("+{}+", vec!["-".repeat(CELL_WIDTH); 7].join("+"));

    let _ = writeln!(out, "{:^width$}", grid.month.label(), width = rule.len());
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{}",
        join_row(WEEKDAY_NAMES.iter().map(|name| fit(name, CELL_WIDTH)))
    );
    let _ = writeln!(out, "{}", rule);

    for week in grid.weeks() {
        let cell_at = |i: usize| week.get(i).and_then(|cell| match cell {
            GridCell::Day(day) => Some(day),
            GridCell::Blank => None,
        });

        let heading = (0..7).map(|i| match cell_at(i) {
            Some(day) => {
                let number = if day.is_today {
                    format!("[{}]", day.day)
                } else {
                    format!(" {} ", day.day)
                };
                let marker = day.tag.map(|p| p.marker()).unwrap_or(' ');
                fit(&format!("{} {}", number, marker), CELL_WIDTH)
            }
            None => fit("", CELL_WIDTH),
        });
        let _ = writeln!(out, "{}", join_row(heading));

        let rows = (0..7)
            .filter_map(cell_at)
            .map(|day| day.chips.len())
            .max()
            .unwrap_or(0);
        for row in 0..rows {
            let line = (0..7).map(|i| {
                let label = cell_at(i)
                    .and_then(|day| day.chips.get(row))
                    .map(Activity::chip_label)
                    .unwrap_or_default();
                fit(&label, CELL_WIDTH)
            });
            let _ = writeln!(out, "{}", join_row(line));
        }

        if (0..7).filter_map(cell_at).any(|day| day.hidden > 0) {
            let line = (0..7).map(|i| match cell_at(i) {
                Some(day) if day.hidden > 0 => fit(&format!("+{} more", day.hidden), CELL_WIDTH),
                _ => fit("", CELL_WIDTH),
            });
            let _ = writeln!(out, "{}", join_row(line));
        }

        let _ = writeln!(out, "{}", rule);
    }

    let legend: Vec<String> = Pillar::all()
        .iter()
        .map(|p| format!("{} {}", p.marker(), p.label()))
        .collect();
    let _ = writeln!(out, "{}", legend.join("   "));
    out
}

/// Expanded list of one day's activities
pub fn render_day(date: NaiveDate, activities: &[Activity]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Activities on {}", date.format("%B %-d, %Y"));
    if activities.is_empty() {
        let _ = writeln!(out, "  No activities for this day");
        return out;
    }

    for activity in activities {
        let time = activity
            .time
            .map(|t| t.to_string())
            .unwrap_or_else(|| "--:--".to_string());
        let _ = writeln!(
            out,
            "  #{:<5} {} {} ({})",
            activity.id,
            time,
            activity.title,
            activity.pillar.label()
        );
        if let Some(description) = &activity.description {
            let _ = writeln!(out, "          {}", description);
        }
    }
    out
}

/// The create/edit modal
pub fn render_form(form: &ActivityForm) -> String {
    let mut out = String::new();
    let heading = match &form.editing {
        Some(id) => format!("Edit Activity #{}", id),
        None => "New Activity".to_string(),
    };
    let _ = writeln!(out, "== {} ==", heading);
    let _ = writeln!(out, "  title*       {}", form.title);
    let _ = writeln!(out, "  date*        {}", form.date);
    let _ = writeln!(out, "  time         {}", form.time);
    let _ = writeln!(out, "  pillar*      {} ({})", form.pillar, form.pillar.label());
    let _ = writeln!(out, "  description  {}", form.description);
    let action = if form.is_editing() { "update" } else { "create" };
    let _ = writeln!(out, "  'save' to {}, 'cancel' to close", action);
    out
}

/// Full calendar view: banner, grid, selected day and modal
pub async fn render_calendar(view: &CalendarView) -> String {
    let mut out = String::new();

    if let Some(error) = view.error() {
        let _ = writeln!(out, "! {}", error);
    }

    out.push_str(&render_grid(&view.grid().await));

    if let Some(date) = view.selected_date() {
        out.push('\n');
        out.push_str(&render_day(date, &view.selected_activities().await));
    }

    if let Some(form) = view.form() {
        out.push('\n');
        out.push_str(&render_form(form));
    }

    out
}

/// Transcript, suggestions and pending input
pub fn render_chat(view: &ChatView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Assistant");

    for message in view.transcript() {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "assistant",
            ChatRole::Error => "error",
        };
        let _ = writeln!(out, "{:>10} > {}", who, message.content);
    }

    let suggestions = view.suggestions();
    if !suggestions.is_empty() {
        let _ = writeln!(out, "\nSuggested questions:");
        for (i, question) in suggestions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, question);
        }
    }

    if !view.input().is_empty() {
        let _ = writeln!(out, "\ninput: {}", view.input());
    }
    out
}
