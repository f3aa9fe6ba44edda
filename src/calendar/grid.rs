//! Month Grid
//!
//! Pure date arithmetic and layout for the month view:
//! - `MonthCursor`: The displayed month, always anchored to its 1st
//! - `MonthGrid`: Leading blank cells followed by one cell per day
//! - `DayCell`: A day's time-sorted activities, first few shown as chips

use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::model::{sort_by_time, Activity, Pillar};

/// Activities shown inline per day before the "+N more" indicator
pub const VISIBLE_PER_DAY: usize = 3;

/// Column headers, Sunday first
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A calendar month, represented by its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// Month `month` (1-12) of `year`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month a date falls in
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// The following month; stays put at the end of the representable range
    pub fn next(self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    /// The preceding month; stays put at the start of the representable range
    pub fn prev(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if NaiveDate::from_ymd_opt(self.year(), 2, 29).is_some() => 29,
            _ => 28,
        }
    }

    /// Weekday of the 1st, Sunday = 0
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Date of day `day` in this month
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// e.g. `June 2024`
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

impl FromStr for MonthCursor {
    type Err = chrono::ParseError;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")?;
        Ok(Self { first })
    }
}

/// One day of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub is_today: bool,
    /// Pillar of the earliest activity, if any
    pub tag: Option<Pillar>,
    /// First activities in time order
    pub chips: Vec<Activity>,
    /// Activities not shown as chips
    pub hidden: usize,
}

impl DayCell {
    pub fn total(&self) -> usize {
        self.chips.len() + self.hidden
    }

    pub fn has_activities(&self) -> bool {
        !self.chips.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    /// Padding before the 1st
    Blank,
    Day(DayCell),
}

/// Layout of one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: MonthCursor,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    /// Lay out `month` with the given activities; days equal to `today` are marked
    pub fn build(month: MonthCursor, activities: &[Activity], today: NaiveDate) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
        for activity in activities.iter().filter(|a| month.contains(a.date)) {
            by_date.entry(activity.date).or_default().push(activity.clone());
        }

        let blanks = month.leading_blanks() as usize;
        let mut cells = Vec::with_capacity(blanks + month.days_in_month() as usize);
        cells.extend(std::iter::repeat_with(|| GridCell::Blank).take(blanks));

        for date in (1..=month.days_in_month()).filter_map(|day| month.date(day)) {
            let mut day_activities = by_date.remove(&date).unwrap_or_default();
            sort_by_time(&mut day_activities);

            let tag = day_activities.first().map(|a| a.pillar);
            let hidden = day_activities.len().saturating_sub(VISIBLE_PER_DAY);
            day_activities.truncate(VISIBLE_PER_DAY);

            cells.push(GridCell::Day(DayCell {
                date,
                day: date.day(),
                is_today: date == today,
                tag,
                chips: day_activities,
                hidden,
            }));
        }

        Self { month, cells }
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| matches!(cell, GridCell::Blank))
            .count()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|cell| match cell {
            GridCell::Day(day) => Some(day),
            GridCell::Blank => None,
        })
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.days().find(|cell| cell.day == day)
    }

    /// Rows of seven cells; the last row may be shorter
    pub fn weeks(&self) -> std::slice::Chunks<'_, GridCell> {
        self.cells.chunks(7)
    }
}

/// All activities on `date`, time-sorted
pub fn activities_on(activities: &[Activity], date: NaiveDate) -> Vec<Activity> {
    let mut day: Vec<Activity> = activities
        .iter()
        .filter(|a| a.date == date)
        .cloned()
        .collect();
    sort_by_time(&mut day);
    day
}
