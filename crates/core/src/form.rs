//! New-row requests and their validation rules.

use crate::date::{format_date_indonesian, month_year, validate_date};
use crate::error::{Result, ScheduleError};
use crate::format::Rgb;
use crate::grid::ParsedSheet;
use crate::schema::SheetKind;
use serde::{Deserialize, Serialize};

/// Allowed theater show types.
pub const SHOW_TYPES: &[&str] = &["Trainee", "Reguler"];

/// Allowed theater setlists.
pub const SETLISTS: &[&str] = &["Aitakatta", "Pajama", "Ramune", "RKJ", "TWT"];

/// Allowed video call sessions.
pub const SESSIONS: &[&str] = &["sesi 1", "sesi 2", "sesi 3", "sesi 4", "sesi 5", "sesi 6"];

/// Allowed video call time slots.
pub const TIME_SLOTS: &[&str] = &[
    "11:15 WIB - 12:15 WIB",
    "13:15 WIB - 14:15 WIB",
    "14:45 WIB - 15:45 WIB",
    "16:30 WIB - 17:30 WIB",
    "18:00 WIB - 19:00 WIB",
    "19:30 WIB - 20:30 WIB",
];

fn required(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ScheduleError::MissingField { field });
    }
    Ok(())
}

fn one_of(field: &'static str, value: &str, allowed: &'static [&'static str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ScheduleError::InvalidOption {
            field,
            value: value.to_string(),
            allowed,
        })
    }
}

fn valid_date(field: &'static str, value: &str) -> Result<()> {
    if validate_date(value) {
        Ok(())
    } else {
        Err(ScheduleError::InvalidDate {
            field,
            value: value.to_string(),
        })
    }
}

/// A theater show to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterRow {
    pub no: String,
    pub date: String,
    pub show: String,
    pub setlist: String,
    pub unit_song: String,
}

impl TheaterRow {
    /// Check the row against the form rules and the rows already in the sheet.
    pub fn validate(&self, parsed: &ParsedSheet) -> Result<()> {
        required("NO", &self.no)?;
        required("Tanggal", &self.date)?;
        required("Show", &self.show)?;
        required("Setlist", &self.setlist)?;
        required("Unit Song", &self.unit_song)?;

        if !self.no.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScheduleError::NotANumber {
                field: "NO",
                value: self.no.clone(),
            });
        }
        if parsed.has_first_cell(&self.no) {
            return Err(ScheduleError::DuplicateNumber {
                value: self.no.clone(),
            });
        }
        valid_date("Tanggal", &self.date)?;
        one_of("Show", &self.show, SHOW_TYPES)?;
        one_of("Setlist", &self.setlist, SETLISTS)
    }

    /// Month section the row belongs to.
    pub fn section_key(&self) -> Result<String> {
        month_year(&self.date)
    }

    /// Cell values in schema order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        vec![
            self.no.clone(),
            self.date.clone(),
            self.show.clone(),
            self.setlist.clone(),
            self.unit_song.clone(),
        ]
    }
}

/// A video call session to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCallRow {
    pub session: String,
    pub time_slot: String,
    pub date: String,
    pub event: String,
    /// `#RRGGBB` to remember for this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl VideoCallRow {
    pub fn validate(&self) -> Result<()> {
        required("Sesi", &self.session)?;
        required("Waktu", &self.time_slot)?;
        required("Tanggal", &self.date)?;
        required("Nama Event", &self.event)?;
        valid_date("Tanggal", &self.date)?;
        one_of("Sesi", &self.session, SESSIONS)?;
        one_of("Waktu", &self.time_slot, TIME_SLOTS)?;
        if let Some(color) = &self.color {
            Rgb::from_hex(color)?;
        }
        Ok(())
    }

    /// Cell values in schema order, with the date spelled out.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        vec![
            self.session.clone(),
            self.time_slot.clone(),
            format_date_indonesian(&self.date),
            self.event.clone(),
        ]
    }
}

/// A row submitted for one of the schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NewRow {
    Theater(TheaterRow),
    VideoCall(VideoCallRow),
}

impl NewRow {
    #[must_use]
    pub fn kind(&self) -> SheetKind {
        match self {
            NewRow::Theater(_) => SheetKind::Theater,
            NewRow::VideoCall(_) => SheetKind::VideoCall,
        }
    }

    pub fn validate(&self, parsed: &ParsedSheet) -> Result<()> {
        match self {
            NewRow::Theater(row) => row.validate(parsed),
            NewRow::VideoCall(row) => row.validate(),
        }
    }

    /// Confirmation shown once the row has been written.
    #[must_use]
    pub fn success_message(&self) -> String {
        match self {
            NewRow::Theater(row) => format!(
                "Successfully added new row with NO '{}' under {}.",
                row.no,
                row.section_key().unwrap_or_else(|_| row.date.clone())
            ),
            NewRow::VideoCall(row) => format!(
                "Successfully added new row for {} on {}.",
                row.session,
                format_date_indonesian(&row.date)
            ),
        }
    }
}
