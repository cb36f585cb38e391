//! Sheet kinds, their column schemas and grid layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Columns of the theater show schedule.
pub const THEATER_COLUMNS: [&str; 5] = ["NO", "Tanggal", "Show", "Setlist", "Unit Song"];

/// Columns of the video call schedule.
pub const VIDEO_CALL_COLUMNS: [&str; 4] = ["Sesi", "Waktu", "Tanggal", "Nama Event"];

/// The schedules this crate knows how to read and extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetKind {
    /// Theater shows, grouped into month sections.
    Theater,
    /// Video call sessions, one flat list.
    VideoCall,
}

impl SheetKind {
    /// All kinds, in display order.
    pub const ALL: [SheetKind; 2] = [SheetKind::Theater, SheetKind::VideoCall];

    /// The column schema for this kind.
    #[must_use]
    pub fn schema(self) -> Schema {
        match self {
            SheetKind::Theater => Schema::theater(),
            SheetKind::VideoCall => Schema::video_call(),
        }
    }

    /// Stable identifier used in URLs and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SheetKind::Theater => "theater",
            SheetKind::VideoCall => "video-call",
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SheetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "theater" => Ok(SheetKind::Theater),
            "video-call" | "video_call" | "videocall" => Ok(SheetKind::VideoCall),
            other => Err(format!("Unknown sheet kind: {other}")),
        }
    }
}

/// Expected header of a sheet kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub kind: SheetKind,
    /// Column names, in order. The parsed header must equal this exactly.
    pub columns: Vec<String>,
    /// Number of columns covered by row formatting.
    pub format_width: usize,
    /// Whether rows are grouped under section marker rows.
    pub sectioned: bool,
}

impl Schema {
    /// Theater show schema: five columns, month sections.
    #[must_use]
    pub fn theater() -> Self {
        Self {
            kind: SheetKind::Theater,
            columns: THEATER_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            format_width: 5,
            sectioned: true,
        }
    }

    /// Video call schema: four columns, no sections.
    #[must_use]
    pub fn video_call() -> Self {
        Self {
            kind: SheetKind::VideoCall,
            columns: VIDEO_CALL_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            format_width: 4,
            sectioned: false,
        }
    }

    /// Number of columns in the schema.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if `value` is one of the column names.
    #[must_use]
    pub fn is_column_name(&self, value: &str) -> bool {
        self.columns.iter().any(|c| c == value)
    }

    /// Position of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check a header row against the schema.
    pub(crate) fn matches(&self, header: &[String]) -> bool {
        header == self.columns.as_slice()
    }
}

/// What to do with rows that appear before the first section marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadingRows {
    /// Ignore them.
    #[default]
    Drop,
    /// Hold them and file them under the first section that opens.
    Buffer,
}

/// Where the header sits and where scanning starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LayoutFields")]
pub struct GridLayout {
    /// 0-based index of the header row.
    pub header_row: usize,
    /// 0-based index of the first scanned row. Defaults to the header row
    /// itself, so flat sheets report their header as the first row.
    pub data_start_row: usize,
    pub leading_rows: LeadingRows,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            header_row: 2,
            data_start_row: 2,
            leading_rows: LeadingRows::Drop,
        }
    }
}

/// Layout as written in config. An omitted `data_start_row` follows
/// `header_row`.
#[derive(Deserialize)]
struct LayoutFields {
    #[serde(default = "default_header_row")]
    header_row: usize,
    #[serde(default)]
    data_start_row: Option<usize>,
    #[serde(default)]
    leading_rows: LeadingRows,
}

fn default_header_row() -> usize {
    GridLayout::default().header_row
}

impl From<LayoutFields> for GridLayout {
    fn from(fields: LayoutFields) -> Self {
        Self {
            header_row: fields.header_row,
            data_start_row: fields.data_start_row.unwrap_or(fields.header_row),
            leading_rows: fields.leading_rows,
        }
    }
}
