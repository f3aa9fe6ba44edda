//! Activity Form
//!
//! The create/edit draft behind the calendar's modal. Fields are kept as the
//! user typed them and only checked when the form is submitted, the way a
//! browser checks `required`, `type="date"` and `type="time"` inputs.

use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{Activity, ActivityDraft, ActivityId, ClockTime, Pillar, UnknownPillar};

/// Errors raised while editing or submitting the form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Date is required")]
    MissingDate,

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error(transparent)]
    InvalidPillar(#[from] UnknownPillar),

    #[error("Unknown field '{0}' (expected title, description, date, time or pillar)")]
    UnknownField(String),
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Date,
    Time,
    Pillar,
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(FormField::Title),
            "description" | "desc" => Ok(FormField::Description),
            "date" => Ok(FormField::Date),
            "time" => Ok(FormField::Time),
            "pillar" => Ok(FormField::Pillar),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

/// In-progress create or edit draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityForm {
    /// Activity being edited; `None` when creating
    pub editing: Option<ActivityId>,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub pillar: Pillar,
}

impl ActivityForm {
    /// Blank create form for `date`
    pub fn new_on(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    /// Edit form pre-filled from an existing activity
    pub fn edit(activity: &Activity) -> Self {
        Self {
            editing: Some(activity.id.clone()),
            title: activity.title.clone(),
            description: activity.description.clone().unwrap_or_default(),
            date: activity.date.format("%Y-%m-%d").to_string(),
            time: activity.time.map(|t| t.to_string()).unwrap_or_default(),
            pillar: activity.pillar,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Set one field from text input
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        match field {
            FormField::Title => self.title = value.to_string(),
            FormField::Description => self.description = value.to_string(),
            FormField::Date => self.date = value.trim().to_string(),
            FormField::Time => self.time = value.trim().to_string(),
            FormField::Pillar => self.pillar = value.parse()?,
        }
        Ok(())
    }

    /// Validate and convert into the payload sent to the server
    pub fn to_draft(&self) -> Result<ActivityDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let date = self.date.trim();
        if date.is_empty() {
            return Err(FormError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(self.date.clone()))?;

        let time = match self.time.trim() {
            "" => None,
            raw => Some(
                raw.parse::<ClockTime>()
                    .map_err(|_| FormError::InvalidTime(self.time.clone()))?,
            ),
        };

        let description = match self.description.trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        Ok(ActivityDraft {
            title: title.to_string(),
            description,
            date,
            time,
            pillar: self.pillar,
        })
    }
}
