//! Row background colors.

use crate::error::{Result, ScheduleError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Event label to `#RRGGBB` color, owned by the caller's session.
pub type EventColors = IndexMap<String, String>;

/// Color used for labels that have no entry in [`EventColors`].
pub const DEFAULT_EVENT_COLOR: &str = "#FFFFFF";

/// A color in the 0.0-1.0 channel form the spreadsheet API expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ScheduleError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| ScheduleError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as uppercase `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }
}

/// Fixed formatting roles for structural rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowRole {
    /// Month marker opening a section.
    SectionTitle,
    /// Column header row.
    Header,
    /// Title row at the top of a sheet. Title rows are maintained by hand,
    /// so no planner emits this role.
    SheetTitle,
}

impl RowRole {
    /// Background for the role.
    #[must_use]
    pub fn color(self) -> Rgb {
        match self {
            RowRole::SectionTitle => Rgb::new(0.0, 1.0, 1.0),
            RowRole::Header => Rgb::new(0.8, 0.0, 0.8),
            RowRole::SheetTitle => Rgb::new(1.0, 0.4, 0.8),
        }
    }
}

/// How a formatted row is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Fill {
    /// Structural row: role color, bold and centered.
    Role { role: RowRole },
    /// Data row colored by its event label. Background only.
    Label { label: String, color: Rgb },
}

impl Fill {
    /// Returns true if the row text is also bolded and centered.
    #[must_use]
    pub fn emphasized(&self) -> bool {
        matches!(self, Fill::Role { .. })
    }
}

/// Background color for a fill.
#[must_use]
pub fn format_for(fill: &Fill) -> Rgb {
    match fill {
        Fill::Role { role } => role.color(),
        Fill::Label { color, .. } => *color,
    }
}

/// Color recorded for `label`, white when there is none.
pub fn event_color(colors: &EventColors, label: &str) -> Result<Rgb> {
    let hex = colors
        .get(label)
        .map_or(DEFAULT_EVENT_COLOR, String::as_str);
    Rgb::from_hex(hex)
}
