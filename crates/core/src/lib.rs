//! Schedule parsing and append planning for sheetform
//!
//! Reads the theater show and video call schedules out of a raw cell grid,
//! checks their headers, groups theater rows into month sections and plans
//! the writes needed to add a new row. Nothing here performs I/O; the
//! resulting [`WritePlan`] is executed by a spreadsheet client.
//!
//! # Examples
//!
//! ## Parsing a sectioned sheet
//!
//! ```
//! use sheetform_core::{parse, CellGrid, GridLayout, Schema};
//!
//! let grid = CellGrid::from_data(vec![
//!     vec!["JADWAL"],
//!     vec![""],
//!     vec!["NO", "Tanggal", "Show", "Setlist", "Unit Song"],
//!     vec!["Januari 2025"],
//!     vec!["1", "03/01/2025", "Reguler", "RKJ", "- A"],
//! ]);
//!
//! let parsed = parse(&grid, &Schema::theater(), &GridLayout::default()).unwrap();
//! assert_eq!(parsed.rows.len(), 1);
//! assert_eq!(parsed.section("Januari 2025").unwrap().start_row, 4);
//! ```
//!
//! ## Planning a new row
//!
//! ```
//! use sheetform_core::{
//!     parse, plan_new_row, CellGrid, EventColors, GridLayout, NewRow, Schema, TheaterRow,
//! };
//!
//! let grid = CellGrid::from_data(vec![
//!     vec!["JADWAL"],
//!     vec![""],
//!     vec!["NO", "Tanggal", "Show", "Setlist", "Unit Song"],
//! ]);
//! let schema = Schema::theater();
//! let parsed = parse(&grid, &schema, &GridLayout::default()).unwrap();
//!
//! let row = NewRow::Theater(TheaterRow {
//!     no: "1".into(),
//!     date: "07/02/2025".into(),
//!     show: "Reguler".into(),
//!     setlist: "RKJ".into(),
//!     unit_song: "- Song".into(),
//! });
//! let plan = plan_new_row(&parsed, &schema, &row, &mut EventColors::new()).unwrap();
//!
//! // Marker, header and data row for the new "Februari 2025" section.
//! assert_eq!(plan.appends().count(), 3);
//! ```

mod date;
mod error;
mod form;
mod format;
mod grid;
mod plan;
mod schema;

/// Re-export date helpers.
pub use date::{format_date_indonesian, month_name, month_year, validate_date, MONTH_NAMES_ID};
/// Re-export error types.
pub use error::{Result, ScheduleError};
/// Re-export row requests and their choice lists.
pub use form::{NewRow, TheaterRow, VideoCallRow, SESSIONS, SETLISTS, SHOW_TYPES, TIME_SLOTS};
/// Re-export color types.
pub use format::{event_color, format_for, EventColors, Fill, Rgb, RowRole, DEFAULT_EVENT_COLOR};
/// Re-export grid parsing.
pub use grid::{parse, CellGrid, ParsedSheet, Section};
/// Re-export write planning.
pub use plan::{
    plan_flat_append, plan_new_row, plan_sectioned_append, AppendMode, WritePlan, WriteStep,
};
/// Re-export schemas.
pub use schema::{
    GridLayout, LeadingRows, Schema, SheetKind, THEATER_COLUMNS, VIDEO_CALL_COLUMNS,
};
