//! Reading schedules and applying write plans through a [`SheetsApi`].

use crate::api::SheetsApi;
use crate::error::{ClientError, ClientResult};
use crate::range::{row_anchor, row_span};
use serde::Serialize;
use sheetform_core::{
    parse, plan_new_row, EventColors, GridLayout, NewRow, ParsedSheet, Schema, WritePlan,
    WriteStep,
};

/// Outcome of a submitted row.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub message: String,
    pub plan: WritePlan,
    /// Number of plan steps applied.
    pub applied: usize,
}

/// Fetch the sheet `title` and parse it against `schema`.
pub async fn load_sheet<A>(
    api: &A,
    title: &str,
    schema: &Schema,
    layout: &GridLayout,
) -> ClientResult<ParsedSheet>
where
    A: SheetsApi + ?Sized,
{
    let grid = api.fetch_grid(title).await?;
    Ok(parse(&grid, schema, layout)?)
}

/// Apply `plan` to the sheet `title`, one step at a time, in order.
///
/// When the plan formats any row the sheet's numeric id is resolved before
/// anything is written. Optional formatting steps are skipped when the sheet
/// has no id. Execution stops at the first failing step. Returns the number
/// of steps applied.
///
/// # Errors
///
/// Returns [`ClientError::SheetNotFound`] when a required id cannot be
/// resolved and [`ClientError::PartialPlan`] wrapping the failure of a step.
pub async fn execute_plan<A>(api: &A, title: &str, plan: &WritePlan) -> ClientResult<usize>
where
    A: SheetsApi + ?Sized,
{
    let sheet_id = if plan.formats().next().is_some() {
        let id = api.resolve_sheet_id(title).await?;
        if id.is_none() && plan.needs_sheet_id() {
            return Err(ClientError::SheetNotFound {
                title: title.to_string(),
            });
        }
        id
    } else {
        None
    };

    let mut applied = 0;
    for (index, step) in plan.steps.iter().enumerate() {
        let result = match step {
            WriteStep::Append { row, values, mode } => {
                tracing::info!(range = %row_anchor(title, *row), ?mode, "appending row");
                api.append_row(title, *row, values, *mode).await
            }
            WriteStep::Format {
                row,
                width,
                fill,
                optional,
            } => match sheet_id {
                Some(id) => {
                    tracing::info!(range = %row_span(title, *row, *width), "formatting row");
                    api.apply_formatting(id, *row, *width, fill).await
                }
                None if *optional => {
                    tracing::warn!(sheet = title, row = *row, "no sheet id, skipping formatting");
                    continue;
                }
                None => Err(ClientError::SheetNotFound {
                    title: title.to_string(),
                }),
            },
        };

        if let Err(error) = result {
            tracing::warn!(step = index, %error, "write plan stopped");
            return Err(ClientError::PartialPlan {
                failed_step: index,
                source: Box::new(error),
            });
        }
        applied += 1;
    }

    Ok(applied)
}

/// Fetch, validate, plan and write one new row.
///
/// The schema follows the row's kind. `colors` is only updated once the plan
/// has been applied.
pub async fn submit_row<A>(
    api: &A,
    title: &str,
    layout: &GridLayout,
    row: &NewRow,
    colors: &mut EventColors,
) -> ClientResult<Submission>
where
    A: SheetsApi + ?Sized,
{
    let schema = row.kind().schema();
    let parsed = load_sheet(api, title, &schema, layout).await?;

    let mut next_colors = colors.clone();
    let plan = plan_new_row(&parsed, &schema, row, &mut next_colors)?;
    let applied = execute_plan(api, title, &plan).await?;
    *colors = next_colors;

    Ok(Submission {
        message: row.success_message(),
        plan,
        applied,
    })
}
