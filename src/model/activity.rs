//! Activity types
//!
//! This module defines the calendar entries exchanged with the remote service:
//! - `Activity`: A scheduled item as returned by the server
//! - `ActivityDraft`: The same fields without an id, sent on create/update
//! - `ActivityId`, `ClockTime` and `Pillar`: Field types with their wire formats

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque activity identifier assigned by the server
///
/// The service may use integer or string keys; both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityId::Int(id) => write!(f, "{}", id),
            ActivityId::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for ActivityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(id) => ActivityId::Int(id),
            Err(_) => ActivityId::Text(s.to_string()),
        })
    }
}

impl From<i64> for ActivityId {
    fn from(id: i64) -> Self {
        ActivityId::Int(id)
    }
}

/// The life area an activity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    /// Exercise, food, sleep
    VidaSana,
    /// Reading, courses, study
    CrecimientoIntelectual,
    /// Routines and everything else
    #[default]
    HabitosPersonales,
}

impl Pillar {
    /// All pillars in display order
    pub fn all() -> &'static [Pillar] {
        &[
            Pillar::VidaSana,
            Pillar::CrecimientoIntelectual,
            Pillar::HabitosPersonales,
        ]
    }

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Pillar::VidaSana => "vida_sana",
            Pillar::CrecimientoIntelectual => "crecimiento_intelectual",
            Pillar::HabitosPersonales => "habitos_personales",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Pillar::VidaSana => "Healthy living",
            Pillar::CrecimientoIntelectual => "Intellectual growth",
            Pillar::HabitosPersonales => "Personal habits",
        }
    }

    /// Single-character marker used in the month grid
    pub fn marker(&self) -> char {
        match self {
            Pillar::VidaSana => '+',
            Pillar::CrecimientoIntelectual => '*',
            Pillar::HabitosPersonales => '#',
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a pillar name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pillar '{0}' (expected vida_sana, crecimiento_intelectual or habitos_personales)")]
pub struct UnknownPillar(pub String);

impl FromStr for Pillar {
    type Err = UnknownPillar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pillar::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| UnknownPillar(s.to_string()))
    }
}

/// Wall-clock time of an activity, `HH:MM` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map(Self)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Blank form fields arrive as `""`; treat them like a missing time.
///
/// The server stores times as free text, so anything that is not `HH:MM` is
/// logged and dropped rather than failing the whole record.
fn optional_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ClockTime>, D::Error> {
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    match raw.parse() {
        Ok(time) => Ok(Some(time)),
        Err(e) => {
            tracing::warn!(time = %raw, error = %e, "Ignoring unparsable activity time");
            Ok(None)
        }
    }
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn default_pillar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pillar, D::Error> {
    Ok(Option::<Pillar>::deserialize(deserializer)?.unwrap_or_default())
}

/// A scheduled item as stored by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    /// Calendar day, `YYYY-MM-DD`
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "optional_time")]
    pub time: Option<ClockTime>,
    #[serde(default, deserialize_with = "default_pillar")]
    pub pillar: Pillar,
}

impl Activity {
    /// Ordering key within a day: timed activities ascending, untimed last
    pub fn time_sort_key(&self) -> (bool, Option<ClockTime>) {
        (self.time.is_none(), self.time)
    }

    /// Inline label shown in a grid cell, e.g. `07:00 Gym`
    pub fn chip_label(&self) -> String {
        match self.time {
            Some(time) => format!("{} {}", time, self.title),
            None => self.title.clone(),
        }
    }

    /// Editable copy of this activity's fields
    pub fn to_draft(&self) -> ActivityDraft {
        ActivityDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            time: self.time,
            pillar: self.pillar,
        }
    }
}

/// Activity fields without an id, as sent on create and update
///
/// Missing optional fields serialize as `null` so an update can clear them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<ClockTime>,
    pub pillar: Pillar,
}

impl ActivityDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            date,
            time: None,
            pillar: Pillar::default(),
        }
    }

    /// Builder method: set time
    pub fn time(mut self, time: ClockTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Builder method: set pillar
    pub fn pillar(mut self, pillar: Pillar) -> Self {
        self.pillar = pillar;
        self
    }

    /// Builder method: set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a server-assigned id
    pub fn into_activity(self, id: ActivityId) -> Activity {
        Activity {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            pillar: self.pillar,
        }
    }
}

/// Sort activities in place by time of day, untimed last; stable
pub fn sort_by_time(activities: &mut [Activity]) {
    activities.sort_by_key(Activity::time_sort_key);
}
