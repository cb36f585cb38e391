//! Write plans: where a new row goes and how it is colored.
//!
//! Rows are addressed by 1-based sheet row number, the way A1 ranges and
//! the formatting calls of the spreadsheet API count them.

use crate::error::{Result, ScheduleError};
use crate::format::{event_color, EventColors, Fill, RowRole};
use crate::form::NewRow;
use crate::grid::ParsedSheet;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// How an append treats existing cells at its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppendMode {
    /// Write into the rows after the detected table.
    #[default]
    Overwrite,
    /// Insert fresh rows for the new data.
    InsertRows,
}

/// One instruction for the spreadsheet client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum WriteStep {
    /// Append `values` using `row` as the range anchor.
    Append {
        row: usize,
        values: Vec<String>,
        mode: AppendMode,
    },
    /// Fill the first `width` cells of `row`.
    Format {
        row: usize,
        width: usize,
        fill: Fill,
        /// Skipped rather than failed when the sheet has no numeric id.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
    },
}

impl WriteStep {
    /// Target row of the step.
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            WriteStep::Append { row, .. } | WriteStep::Format { row, .. } => *row,
        }
    }
}

/// Ordered steps for one submission. Steps must be applied in order and
/// execution must stop at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WritePlan {
    pub steps: Vec<WriteStep>,
    /// Section the new row lands in, for sectioned sheets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl WritePlan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append steps as `(row, values)`.
    pub fn appends(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.steps.iter().filter_map(|step| match step {
            WriteStep::Append { row, values, .. } => Some((*row, values.as_slice())),
            WriteStep::Format { .. } => None,
        })
    }

    /// Format steps as `(row, fill)`.
    pub fn formats(&self) -> impl Iterator<Item = (usize, &Fill)> {
        self.steps.iter().filter_map(|step| match step {
            WriteStep::Format { row, fill, .. } => Some((*row, fill)),
            WriteStep::Append { .. } => None,
        })
    }

    /// Some formatting step cannot go ahead without the sheet's numeric id.
    #[must_use]
    pub fn needs_sheet_id(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, WriteStep::Format { optional: false, .. }))
    }
}

/// Plan a row for a sheet grouped into sections.
///
/// When the row's section exists the row is appended after the section's
/// current rows. Otherwise a marker row and a header row are appended after
/// the last grid row, followed by the data row.
///
/// # Errors
///
/// Returns whatever `section_key` fails with.
pub fn plan_sectioned_append<F>(
    parsed: &ParsedSheet,
    schema: &Schema,
    values: Vec<String>,
    section_key: F,
) -> Result<WritePlan>
where
    F: FnOnce(&[String]) -> Result<String>,
{
    let key = section_key(&values)?;

    if let Some(section) = parsed.section(&key) {
        let anchor = section.anchor_row();
        tracing::debug!(section = %key, anchor, "appending to existing section");
        return Ok(WritePlan {
            steps: vec![WriteStep::Append {
                row: anchor,
                values,
                mode: AppendMode::InsertRows,
            }],
            section: Some(key),
        });
    }

    let anchor = parsed.total_rows;
    tracing::debug!(section = %key, anchor, "opening new section");

    let mut marker = vec![String::new(); schema.width().max(1)];
    marker[0].clone_from(&key);

    Ok(WritePlan {
        steps: vec![
            WriteStep::Append {
                row: anchor + 1,
                values: marker,
                mode: AppendMode::Overwrite,
            },
            WriteStep::Format {
                row: anchor + 1,
                width: schema.format_width,
                fill: Fill::Role {
                    role: RowRole::SectionTitle,
                },
                optional: false,
            },
            WriteStep::Append {
                row: anchor + 2,
                values: schema.columns.clone(),
                mode: AppendMode::Overwrite,
            },
            WriteStep::Format {
                row: anchor + 2,
                width: schema.format_width,
                fill: Fill::Role {
                    role: RowRole::Header,
                },
                optional: false,
            },
            WriteStep::Append {
                row: anchor + 3,
                values,
                mode: AppendMode::InsertRows,
            },
        ],
        section: Some(key),
    })
}

/// Plan a row for a flat sheet, colored by its label.
///
/// The color step is optional: the row is still written when the sheet has
/// no numeric id.
pub fn plan_flat_append(
    parsed: &ParsedSheet,
    schema: &Schema,
    values: Vec<String>,
    label: &str,
    colors: &EventColors,
) -> Result<WritePlan> {
    let row = parsed.total_rows + 1;
    let color = event_color(colors, label)?;
    Ok(WritePlan {
        steps: vec![
            WriteStep::Append {
                row,
                values,
                mode: AppendMode::InsertRows,
            },
            WriteStep::Format {
                row,
                width: schema.format_width,
                fill: Fill::Label {
                    label: label.to_string(),
                    color,
                },
                optional: true,
            },
        ],
        section: None,
    })
}

/// Validate `row` and plan it against the parsed sheet.
///
/// A color given with a video call row is stored in `colors` first, so the
/// event keeps it for later rows.
pub fn plan_new_row(
    parsed: &ParsedSheet,
    schema: &Schema,
    row: &NewRow,
    colors: &mut EventColors,
) -> Result<WritePlan> {
    if row.kind() != schema.kind {
        return Err(ScheduleError::KindMismatch {
            row: row.kind().to_string(),
            sheet: schema.kind.to_string(),
        });
    }
    row.validate(parsed)?;

    match row {
        NewRow::Theater(theater) => {
            plan_sectioned_append(parsed, schema, theater.values(), |_| theater.section_key())
        }
        NewRow::VideoCall(call) => {
            if let Some(color) = &call.color {
                colors.insert(call.event.clone(), color.clone());
            }
            plan_flat_append(parsed, schema, call.values(), &call.event, colors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::month_year;
    use crate::form::{TheaterRow, VideoCallRow};
    use crate::format::Rgb;
    use crate::grid::Section;
    use indexmap::IndexMap;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    fn january_sheet(total_rows: usize) -> ParsedSheet {
        let r1 = row(&["1", "03/01/2025", "Reguler", "RKJ", "- A"]);
        let r2 = row(&["2", "10/01/2025", "Reguler", "RKJ", "- B"]);
        let mut sections = IndexMap::new();
        sections.insert(
            "Januari 2025".to_string(),
            Section {
                start_row: 5,
                rows: vec![r1.clone(), r2.clone()],
                anchor_rows: 2,
            },
        );
        ParsedSheet {
            headers: Schema::theater().columns,
            rows: vec![r1, r2],
            sections: Some(sections),
            total_rows,
        }
    }

    fn key_from_date(values: &[String]) -> Result<String> {
        month_year(&values[1])
    }

    #[test]
    fn test_existing_section_single_append() {
        let parsed = january_sheet(10);
        let values = row(&["3", "17/01/2025", "Trainee", "TWT", "- C"]);
        let plan =
            plan_sectioned_append(&parsed, &Schema::theater(), values.clone(), key_from_date)
                .unwrap();

        let appends: Vec<_> = plan.appends().collect();
        assert_eq!(appends, vec![(7, values.as_slice())]);
        assert_eq!(plan.formats().count(), 0);
        assert!(!plan.needs_sheet_id());
        assert_eq!(plan.section.as_deref(), Some("Januari 2025"));
    }

    #[test]
    fn test_new_section_three_appends() {
        let parsed = january_sheet(10);
        let values = row(&["3", "07/02/2025", "Trainee", "TWT", "- C"]);
        let plan =
            plan_sectioned_append(&parsed, &Schema::theater(), values.clone(), key_from_date)
                .unwrap();

        let anchors: Vec<_> = plan.appends().map(|(r, _)| r).collect();
        assert_eq!(anchors, vec![11, 12, 13]);

        let appends: Vec<_> = plan.appends().collect();
        assert_eq!(appends[0].1, row(&["Februari 2025", "", "", "", ""]).as_slice());
        assert_eq!(appends[1].1, Schema::theater().columns.as_slice());
        assert_eq!(appends[2].1, values.as_slice());

        let formats: Vec<_> = plan.formats().map(|(r, f)| (r, f.clone())).collect();
        assert_eq!(
            formats,
            vec![
                (
                    11,
                    Fill::Role {
                        role: RowRole::SectionTitle
                    }
                ),
                (
                    12,
                    Fill::Role {
                        role: RowRole::Header
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_new_section_step_order() {
        let parsed = january_sheet(10);
        let plan = plan_sectioned_append(
            &parsed,
            &Schema::theater(),
            row(&["3", "07/02/2025", "Trainee", "TWT", "- C"]),
            key_from_date,
        )
        .unwrap();
        let rows: Vec<_> = plan.steps.iter().map(WriteStep::row).collect();
        assert_eq!(rows, vec![11, 11, 12, 12, 13]);
        assert!(matches!(
            plan.steps[4],
            WriteStep::Append {
                mode: AppendMode::InsertRows,
                ..
            }
        ));
        assert!(matches!(
            plan.steps[1],
            WriteStep::Format { width: 5, .. }
        ));
        assert!(plan.needs_sheet_id());
    }

    #[test]
    fn test_section_key_error() {
        let parsed = january_sheet(10);
        let err = plan_sectioned_append(
            &parsed,
            &Schema::theater(),
            row(&["3", "07/13/2025", "Trainee", "TWT", "- C"]),
            key_from_date,
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::SectionKey { .. }));
    }

    #[test]
    fn test_flat_append_default_white() {
        let parsed = ParsedSheet {
            headers: Schema::video_call().columns,
            rows: Vec::new(),
            sections: None,
            total_rows: 20,
        };
        let plan = plan_flat_append(
            &parsed,
            &Schema::video_call(),
            row(&["sesi 1", "11:15 WIB - 12:15 WIB", "5, Maret 2025", "Launch"]),
            "Launch",
            &EventColors::new(),
        )
        .unwrap();

        assert_eq!(plan.appends().map(|(r, _)| r).collect::<Vec<_>>(), vec![21]);
        let formats: Vec<_> = plan.formats().collect();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].0, 21);
        assert_eq!(
            formats[0].1,
            &Fill::Label {
                label: "Launch".into(),
                color: Rgb::WHITE
            }
        );
        assert!(matches!(
            plan.steps[1],
            WriteStep::Format {
                width: 4,
                optional: true,
                ..
            }
        ));
        assert!(!plan.needs_sheet_id());
    }

    #[test]
    fn test_plan_new_row_records_color() {
        let parsed = ParsedSheet {
            headers: Schema::video_call().columns,
            rows: Vec::new(),
            sections: None,
            total_rows: 4,
        };
        let mut colors = EventColors::new();
        let request = NewRow::VideoCall(VideoCallRow {
            session: "sesi 3".into(),
            time_slot: "14:45 WIB - 15:45 WIB".into(),
            date: "09/04/2025".into(),
            event: "Fan Meeting".into(),
            color: Some("#000000".into()),
        });

        let plan = plan_new_row(&parsed, &Schema::video_call(), &request, &mut colors).unwrap();
        assert_eq!(colors.get("Fan Meeting").map(String::as_str), Some("#000000"));
        let (_, fill) = plan.formats().next().unwrap();
        assert_eq!(
            fill,
            &Fill::Label {
                label: "Fan Meeting".into(),
                color: Rgb::new(0.0, 0.0, 0.0)
            }
        );
        let (_, values) = plan.appends().next().unwrap();
        assert_eq!(values[2], "9, April 2025");
    }

    #[test]
    fn test_plan_new_row_theater() {
        let parsed = january_sheet(9);
        let request = NewRow::Theater(TheaterRow {
            no: "3".into(),
            date: "24/01/2025".into(),
            show: "Reguler".into(),
            setlist: "Ramune".into(),
            unit_song: "- D".into(),
        });
        let plan =
            plan_new_row(&parsed, &Schema::theater(), &request, &mut EventColors::new()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps[0].row(), 7);
    }

    #[test]
    fn test_plan_new_row_rejects_invalid() {
        let parsed = january_sheet(9);
        let request = NewRow::Theater(TheaterRow {
            no: "2".into(),
            date: "24/01/2025".into(),
            show: "Reguler".into(),
            setlist: "Ramune".into(),
            unit_song: "- D".into(),
        });
        assert!(matches!(
            plan_new_row(&parsed, &Schema::theater(), &request, &mut EventColors::new()),
            Err(ScheduleError::DuplicateNumber { .. })
        ));
    }

    #[test]
    fn test_plan_new_row_kind_mismatch() {
        let parsed = january_sheet(9);
        let request = NewRow::VideoCall(VideoCallRow {
            session: "sesi 3".into(),
            time_slot: "14:45 WIB - 15:45 WIB".into(),
            date: "09/04/2025".into(),
            event: "Fan Meeting".into(),
            color: None,
        });
        assert!(matches!(
            plan_new_row(&parsed, &Schema::theater(), &request, &mut EventColors::new()),
            Err(ScheduleError::KindMismatch { .. })
        ));
    }
}
