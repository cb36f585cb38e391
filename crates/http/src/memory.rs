//! In-memory spreadsheet used for dry runs and tests.

use crate::api::SheetsApi;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use sheetform_core::{AppendMode, CellGrid, Fill};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A formatting call recorded by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCall {
    pub sheet_id: i64,
    pub row: usize,
    pub width: usize,
    pub fill: Fill,
}

#[derive(Debug, Default)]
struct MemoryState {
    sheets: IndexMap<String, (Option<i64>, CellGrid)>,
    formats: Vec<FormatCall>,
    writes: usize,
    fail_after: Option<usize>,
}

/// Sheets held in memory.
///
/// Appends follow the spreadsheet API's table rule: starting at the anchor
/// row, the new row goes after the run of non-blank rows, which ends at a
/// blank row, at a section marker or at the end of the sheet.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

fn is_marker(row: &[String]) -> bool {
    match row.split_first() {
        Some((first, rest)) => !first.is_empty() && rest.iter().all(String::is_empty),
        None => false,
    }
}

/// 0-based index where an append anchored at the 1-based `row` lands.
fn append_position(grid: &CellGrid, row: usize) -> usize {
    let anchor = row.saturating_sub(1);
    let mut index = anchor;
    while let Some(current) = grid.row(index) {
        if is_blank(current) || (index > anchor && is_marker(current)) {
            break;
        }
        index += 1;
    }
    index
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a sheet, builder style.
    #[must_use]
    pub fn with_sheet(self, title: impl Into<String>, sheet_id: i64, grid: CellGrid) -> Self {
        self.insert_sheet(title, sheet_id, grid);
        self
    }

    /// Add a sheet whose numeric id cannot be resolved, builder style.
    #[must_use]
    pub fn with_unidentified_sheet(self, title: impl Into<String>, grid: CellGrid) -> Self {
        self.lock().sheets.insert(title.into(), (None, grid));
        self
    }

    /// Add or replace a sheet.
    pub fn insert_sheet(&self, title: impl Into<String>, sheet_id: i64, grid: CellGrid) {
        self.lock().sheets.insert(title.into(), (Some(sheet_id), grid));
    }

    /// Current content of a sheet.
    #[must_use]
    pub fn grid(&self, title: &str) -> Option<CellGrid> {
        self.lock().sheets.get(title).map(|(_, grid)| grid.clone())
    }

    /// Formatting calls applied so far, oldest first.
    #[must_use]
    pub fn formats(&self) -> Vec<FormatCall> {
        self.lock().formats.clone()
    }

    /// Let `writes` more appends or formatting calls succeed, then fail the
    /// rest.
    pub fn fail_after(&self, writes: usize) {
        let mut state = self.lock();
        state.fail_after = Some(state.writes + writes);
    }

    /// Count a write, failing it when the failure point is reached.
    fn begin_write(state: &mut MemoryState) -> Result<(), String> {
        if state.fail_after.is_some_and(|limit| state.writes >= limit) {
            return Err("injected failure".to_string());
        }
        state.writes += 1;
        Ok(())
    }
}

#[async_trait]
impl SheetsApi for MemoryBackend {
    async fn fetch_grid(&self, title: &str) -> ClientResult<CellGrid> {
        self.grid(title)
            .ok_or_else(|| ClientError::Fetch(format!("Unable to parse range: {title}")))
    }

    async fn append_row(
        &self,
        title: &str,
        row: usize,
        values: &[String],
        mode: AppendMode,
    ) -> ClientResult<()> {
        let mut state = self.lock();
        Self::begin_write(&mut state).map_err(ClientError::Append)?;
        let (_, grid) = state
            .sheets
            .get_mut(title)
            .ok_or_else(|| ClientError::Append(format!("Unable to parse range: {title}")))?;

        let index = append_position(grid, row);
        let overwrite = mode == AppendMode::Overwrite && grid.row(index).map_or(true, is_blank);
        if overwrite {
            grid.set_row(index, values.to_vec());
        } else {
            grid.insert_row(index, values.to_vec());
        }
        Ok(())
    }

    async fn apply_formatting(
        &self,
        sheet_id: i64,
        row: usize,
        width: usize,
        fill: &Fill,
    ) -> ClientResult<()> {
        let mut state = self.lock();
        Self::begin_write(&mut state).map_err(ClientError::Format)?;
        if !state.sheets.values().any(|(id, _)| *id == Some(sheet_id)) {
            return Err(ClientError::Format(format!("No grid with id: {sheet_id}")));
        }
        state.formats.push(FormatCall {
            sheet_id,
            row,
            width,
            fill: fill.clone(),
        });
        Ok(())
    }

    async fn resolve_sheet_id(&self, title: &str) -> ClientResult<Option<i64>> {
        Ok(self.lock().sheets.get(title).and_then(|(id, _)| *id))
    }
}
