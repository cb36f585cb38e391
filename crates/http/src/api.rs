//! The spreadsheet operations the executor depends on.

use crate::error::ClientResult;
use async_trait::async_trait;
use sheetform_core::{AppendMode, CellGrid, Fill};

/// Calls made against one spreadsheet document.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Formatted cell values of the sheet named `title`.
    async fn fetch_grid(&self, title: &str) -> ClientResult<CellGrid>;

    /// Append `values` anchored at the 1-based `row`.
    async fn append_row(
        &self,
        title: &str,
        row: usize,
        values: &[String],
        mode: AppendMode,
    ) -> ClientResult<()>;

    /// Fill the first `width` cells of the 1-based `row`.
    async fn apply_formatting(
        &self,
        sheet_id: i64,
        row: usize,
        width: usize,
        fill: &Fill,
    ) -> ClientResult<()>;

    /// Numeric id of the sheet named `title`, if it exists.
    async fn resolve_sheet_id(&self, title: &str) -> ClientResult<Option<i64>>;
}
