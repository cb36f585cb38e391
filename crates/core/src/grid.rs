//! Raw cell grids and the schedule parser.

use crate::error::{Result, ScheduleError};
use crate::schema::{GridLayout, LeadingRows, Schema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Formatted cell values of one sheet, row by row.
///
/// Rows may be ragged; a missing cell reads as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellGrid {
    rows: Vec<Vec<String>>,
}

impl CellGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from anything string-like.
    pub fn from_data<R, C>(data: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            rows: data
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Number of rows, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row by 0-based index.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Insert a row before the 0-based `index`, growing the grid with empty
    /// rows if `index` is past the end.
    pub fn insert_row(&mut self, index: usize, values: Vec<String>) {
        while self.rows.len() < index {
            self.rows.push(Vec::new());
        }
        self.rows.insert(index, values);
    }

    /// Overwrite the row at the 0-based `index`, growing the grid if needed.
    pub fn set_row(&mut self, index: usize, values: Vec<String>) {
        while self.rows.len() <= index {
            self.rows.push(Vec::new());
        }
        self.rows[index] = values;
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

impl From<Vec<Vec<String>>> for CellGrid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// A named run of rows in a sectioned sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Scan index of the latest marker row for this section plus one. New
    /// rows for the section are positioned from here.
    pub start_row: usize,
    /// Every row filed under the section, including rows under earlier
    /// markers with the same name and buffered leading rows.
    pub rows: Vec<Vec<String>>,
    /// Rows that sit below the latest marker.
    #[serde(default)]
    pub anchor_rows: usize,
}

impl Section {
    /// 1-based row used as the append anchor for the section.
    #[must_use]
    pub fn anchor_row(&self) -> usize {
        self.start_row + self.anchor_rows
    }
}

/// Result of parsing a grid against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    /// Data rows in grid order, each padded to the header width.
    pub rows: Vec<Vec<String>>,
    /// Sections in the order their markers first appeared. `None` for flat
    /// sheets.
    pub sections: Option<IndexMap<String, Section>>,
    /// Length of the fetched grid, used as the append anchor.
    pub total_rows: usize,
}

impl ParsedSheet {
    /// Look up a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.as_ref().and_then(|s| s.get(name))
    }

    /// Returns true if some row has `value` in its first column.
    #[must_use]
    pub fn has_first_cell(&self, value: &str) -> bool {
        self.rows
            .iter()
            .any(|row| row.first().is_some_and(|c| c == value))
    }

    /// Next show number: one past the largest all-digit first cell, or 1.
    #[must_use]
    pub fn next_number(&self) -> u64 {
        self.rows
            .iter()
            .filter_map(|row| row.first())
            .filter(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|c| c.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Read a row, padding it on the right with empty cells up to `width`.
fn padded(row: &[String], width: usize) -> Vec<String> {
    let mut values = row.to_vec();
    if values.len() < width {
        values.resize(width, String::new());
    }
    values
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

/// A marker row has a value in its first cell and nothing else.
pub(crate) fn is_marker(row: &[String]) -> bool {
    match row.split_first() {
        Some((first, rest)) => !first.is_empty() && rest.iter().all(String::is_empty),
        None => false,
    }
}

/// Parse `grid` against `schema`.
///
/// The header is read from `layout.header_row` and must equal the schema
/// columns. Rows are then scanned from `layout.data_start_row`. For
/// sectioned schemas a marker row opens a section, rows starting with a
/// column name are skipped as repeated headers and every other non-blank
/// row is filed under the open section.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptyHeader`] when the header row is missing or
/// blank and [`ScheduleError::HeaderMismatch`] when it differs from the
/// schema.
pub fn parse(grid: &CellGrid, schema: &Schema, layout: &GridLayout) -> Result<ParsedSheet> {
    let headers = grid
        .row(layout.header_row)
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    if headers.is_empty() {
        return Err(ScheduleError::EmptyHeader {
            row: layout.header_row,
        });
    }
    if !schema.matches(&headers) {
        return Err(ScheduleError::HeaderMismatch {
            found: headers,
            expected: schema.columns.clone(),
        });
    }

    let width = headers.len();
    let scanned = grid
        .rows()
        .enumerate()
        .skip(layout.data_start_row)
        .map(|(i, row)| (i, padded(row, width)));

    let (rows, sections) = if schema.sectioned {
        let (rows, sections) = scan_sections(scanned, schema, layout.leading_rows);
        (rows, Some(sections))
    } else {
        let rows = scanned
            .filter(|(_, row)| !is_blank(row))
            .map(|(_, row)| row)
            .collect();
        (rows, None)
    };

    tracing::debug!(
        kind = %schema.kind,
        rows = grid.len(),
        data_rows = rows.len(),
        sections = sections.as_ref().map_or(0, IndexMap::len),
        "parsed sheet"
    );

    Ok(ParsedSheet {
        headers,
        rows,
        sections,
        total_rows: grid.len(),
    })
}

fn scan_sections(
    scanned: impl Iterator<Item = (usize, Vec<String>)>,
    schema: &Schema,
    leading: LeadingRows,
) -> (Vec<Vec<String>>, IndexMap<String, Section>) {
    let mut rows = Vec::new();
    let mut sections: IndexMap<String, Section> = IndexMap::new();
    let mut current: Option<String> = None;
    let mut pending: Vec<Vec<String>> = Vec::new();

    for (index, row) in scanned {
        if is_marker(&row) {
            let name = row[0].clone();
            match sections.get_mut(&name) {
                Some(section) => {
                    tracing::warn!(section = %name, row = index, "section marker repeated, anchoring at the later block");
                    section.start_row = index + 1;
                    section.anchor_rows = 0;
                }
                None => {
                    sections.insert(
                        name.clone(),
                        Section {
                            start_row: index + 1,
                            rows: Vec::new(),
                            anchor_rows: 0,
                        },
                    );
                }
            }
            if current.is_none() && !pending.is_empty() {
                if let Some(section) = sections.get_mut(&name) {
                    section.rows.extend(pending.iter().cloned());
                }
                rows.append(&mut pending);
            }
            current = Some(name);
        } else if schema.is_column_name(&row[0]) {
            continue;
        } else if !is_blank(&row) {
            match current.as_ref().and_then(|name| sections.get_mut(name)) {
                Some(section) => {
                    section.rows.push(row.clone());
                    section.anchor_rows += 1;
                    rows.push(row);
                }
                None => match leading {
                    LeadingRows::Drop => {
                        tracing::debug!(row = index, "dropping row before first section");
                    }
                    LeadingRows::Buffer => pending.push(row),
                },
            }
        }
    }

    (rows, sections)
}
