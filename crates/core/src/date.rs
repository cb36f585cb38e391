//! `DD/MM/YYYY` date checks and Indonesian month naming.

use crate::error::{Result, ScheduleError};
use regex::Regex;
use std::sync::OnceLock;

/// Month names in Bahasa Indonesia, January first.
pub const MONTH_NAMES_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid regex"))
}

/// Check that `text` is a `DD/MM/YYYY` date.
///
/// Day must be 1-31, month 1-12 and year 2000-9999. Days are not checked
/// against the month, so `31/02/2025` is accepted.
pub fn validate_date(text: &str) -> bool {
    if !date_pattern().is_match(text) {
        return false;
    }
    match split_date(text) {
        Some((day, month, year)) => {
            (1..=31).contains(&day) && (1..=12).contains(&month) && (2000..=9999).contains(&year)
        }
        None => false,
    }
}

/// Split `D/M/Y` into its numeric parts. Digit width is not enforced.
fn split_date(text: &str) -> Option<(i64, i64, i64)> {
    let mut parts = text.split('/');
    let day = parts.next()?.trim().parse().ok()?;
    let month = parts.next()?.trim().parse().ok()?;
    let year = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((day, month, year))
}

/// Indonesian name of a 1-based month.
#[must_use]
pub fn month_name(month: i64) -> Option<&'static str> {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTH_NAMES_ID.get(i).copied())
}

/// Section key for a theater date: `"Januari 2025"` for `"14/01/2025"`.
pub fn month_year(date: &str) -> Result<String> {
    let (_, month, year) = split_date(date)
        .ok_or_else(|| ScheduleError::section_key(date, "expected DD/MM/YYYY"))?;
    let name = month_name(month)
        .ok_or_else(|| ScheduleError::section_key(date, format!("no month {month}")))?;
    Ok(format!("{name} {year}"))
}

/// Long form used in the video call sheet: `"5, Maret 2025"` for
/// `"05/03/2025"`. Unparsable input is returned unchanged.
#[must_use]
pub fn format_date_indonesian(date: &str) -> String {
    split_date(date)
        .and_then(|(day, month, year)| {
            month_name(month).map(|name| format!("{day}, {name} {year}"))
        })
        .unwrap_or_else(|| date.to_string())
}
