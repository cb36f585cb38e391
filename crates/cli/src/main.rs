//! # sheetform-cli
//!
//! Command-line interface for the theater and video call schedules.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use sheetform_core::{
    format_for, plan_new_row, EventColors, Fill, NewRow, ParsedSheet, SheetKind, TheaterRow,
    VideoCallRow, WritePlan, WriteStep,
};
use sheetform_http::range::{row_anchor, row_span};
use sheetform_http::{execute_plan, load_sheet, Config, SheetsClient};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// sheetform - read and extend schedules kept in Google Sheets
#[derive(Parser)]
#[command(name = "sheetform")]
#[command(author, version, about = "Theater and video call schedules in Google Sheets", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "SHEETFORM_CONFIG", default_value = "sheetform.yaml")]
    config: PathBuf,

    /// Output format (json, table)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Output format for results.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text output (default)
    #[default]
    Table,
}

#[derive(Subcommand)]
enum Command {
    /// Print a parsed schedule
    Show {
        /// theater or video-call
        kind: SheetKind,
    },
    /// Validate and append a row
    Add {
        /// Print the write plan without touching the spreadsheet
        #[arg(long, global = true)]
        dry_run: bool,

        #[command(subcommand)]
        row: AddRow,
    },
}

#[derive(Subcommand)]
enum AddRow {
    /// Add a theater show
    Theater(TheaterArgs),
    /// Add a video call session
    VideoCall(VideoCallArgs),
}

#[derive(Args)]
struct TheaterArgs {
    /// Show number (defaults to the next free number)
    #[arg(long)]
    no: Option<String>,
    /// Date as DD/MM/YYYY (defaults to today)
    #[arg(long)]
    date: Option<String>,
    /// Trainee or Reguler
    #[arg(long)]
    show: String,
    #[arg(long)]
    setlist: String,
    #[arg(long)]
    unit_song: String,
}

#[derive(Args)]
struct VideoCallArgs {
    /// sesi 1 to sesi 6
    #[arg(long)]
    session: String,
    /// e.g. "13:15 WIB - 14:15 WIB"
    #[arg(long)]
    time_slot: String,
    /// Date as DD/MM/YYYY (defaults to today)
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    event: String,
    /// Event color as #RRGGBB
    #[arg(long)]
    color: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?
        .with_env();
    let client = SheetsClient::from_config(&config).context("Failed to build sheets client")?;

    match cli.command {
        Command::Show { kind } => {
            let title = config.title(kind);
            let sheet = load_sheet(&client, title, &kind.schema(), &config.layout).await?;
            print_sheet(kind, title, &sheet, cli.format)
        }
        Command::Add { dry_run, row } => {
            let kind = match row {
                AddRow::Theater(_) => SheetKind::Theater,
                AddRow::VideoCall(_) => SheetKind::VideoCall,
            };
            let title = config.title(kind);
            let schema = kind.schema();
            let sheet = load_sheet(&client, title, &schema, &config.layout).await?;
            let row = build_row(row, &sheet, &today());

            let mut colors = EventColors::new();
            let plan = plan_new_row(&sheet, &schema, &row, &mut colors)?;

            if dry_run {
                return print_plan(title, &plan, cli.format);
            }
            execute_plan(&client, title, &plan).await?;
            println!("{}", row.success_message().green());
            Ok(())
        }
    }
}

/// Today's date as DD/MM/YYYY.
fn today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}

/// Fill in defaults and turn the arguments into a row to submit.
fn build_row(args: AddRow, sheet: &ParsedSheet, today: &str) -> NewRow {
    match args {
        AddRow::Theater(args) => NewRow::Theater(TheaterRow {
            no: args.no.unwrap_or_else(|| sheet.next_number().to_string()),
            date: args.date.unwrap_or_else(|| today.to_string()),
            show: args.show,
            setlist: args.setlist,
            unit_song: args.unit_song,
        }),
        AddRow::VideoCall(args) => NewRow::VideoCall(VideoCallRow {
            session: args.session,
            time_slot: args.time_slot,
            date: args.date.unwrap_or_else(|| today.to_string()),
            event: args.event,
            color: args.color,
        }),
    }
}

fn print_sheet(
    kind: SheetKind,
    title: &str,
    sheet: &ParsedSheet,
    format: OutputFormat,
) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(sheet)?);
        return Ok(());
    }

    println!("{} ({kind})", title.cyan().bold());
    println!("{}", sheet.headers.join(" | ").bold());
    match &sheet.sections {
        Some(sections) => {
            for (name, section) in sections {
                println!("\n{}", name.yellow().bold());
                for row in &section.rows {
                    println!("{}", row.join(" | "));
                }
            }
        }
        None => {
            for row in &sheet.rows {
                println!("{}", row.join(" | "));
            }
        }
    }

    if kind == SheetKind::Theater {
        println!("\nNext NO: {}", sheet.next_number().to_string().green());
    }
    Ok(())
}

fn print_plan(title: &str, plan: &WritePlan, format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    println!("{} {} steps", "Dry run:".yellow().bold(), plan.len());
    for (index, step) in plan.steps.iter().enumerate() {
        println!("  {}. {}", index + 1, describe_step(title, step));
    }
    Ok(())
}

/// One-line description of a write step.
fn describe_step(title: &str, step: &WriteStep) -> String {
    match step {
        WriteStep::Append { row, values, mode } => format!(
            "append at {} ({mode:?}): {}",
            row_anchor(title, *row),
            values.join(" | ")
        ),
        WriteStep::Format {
            row, width, fill, ..
        } => {
            let what = match fill {
                Fill::Role { role } => format!("{role:?}"),
                Fill::Label { label, .. } => format!("event '{label}'"),
            };
            format!(
                "color {} {} as {what}",
                row_span(title, *row, *width),
                format_for(fill).to_hex()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetform_core::{parse, AppendMode, CellGrid, GridLayout, RowRole, Schema};

    fn theater_sheet() -> ParsedSheet {
        let grid = CellGrid::from_data(vec![
            vec![""],
            vec![""],
            vec!["NO", "Tanggal", "Show", "Setlist", "Unit Song"],
            vec!["Januari 2025"],
            vec!["NO", "Tanggal", "Show", "Setlist", "Unit Song"],
            vec!["7", "03/01/2025", "Reguler", "RKJ", "- A"],
        ]);
        parse(&grid, &Schema::theater(), &GridLayout::default()).unwrap()
    }

    #[test]
    fn test_theater_defaults() {
        let args = AddRow::Theater(TheaterArgs {
            no: None,
            date: None,
            show: "Reguler".into(),
            setlist: "RKJ".into(),
            unit_song: String::new(),
        });
        match build_row(args, &theater_sheet(), "10/01/2025") {
            NewRow::Theater(row) => {
                assert_eq!(row.no, "8");
                assert_eq!(row.date, "10/01/2025");
            }
            NewRow::VideoCall(_) => panic!("expected a theater row"),
        }
    }

    #[test]
    fn test_explicit_values_win() {
        let args = AddRow::VideoCall(VideoCallArgs {
            session: "sesi 1".into(),
            time_slot: "11:15 WIB - 12:15 WIB".into(),
            date: Some("05/03/2025".into()),
            event: "Launch".into(),
            color: None,
        });
        match build_row(args, &theater_sheet(), "10/01/2025") {
            NewRow::VideoCall(row) => assert_eq!(row.date, "05/03/2025"),
            NewRow::Theater(_) => panic!("expected a video call row"),
        }
    }

    #[test]
    fn test_describe_steps() {
        let append = WriteStep::Append {
            row: 7,
            values: vec!["8".into(), "10/01/2025".into()],
            mode: AppendMode::InsertRows,
        };
        assert_eq!(
            describe_step("theater_test", &append),
            "append at theater_test!A7 (InsertRows): 8 | 10/01/2025"
        );

        let format = WriteStep::Format {
            row: 12,
            width: 5,
            fill: Fill::Role {
                role: RowRole::SectionTitle,
            },
            optional: false,
        };
        assert_eq!(
            describe_step("VC 2025_test", &format),
            "color 'VC 2025_test'!A12:E12 #00FFFF as SectionTitle"
        );
    }

    #[test]
    fn test_today_format() {
        assert!(sheetform_core::validate_date(&today()));
    }

    #[test]
    fn test_cli_parses_add_theater() {
        let cli = Cli::try_parse_from([
            "sheetform",
            "add",
            "--dry-run",
            "theater",
            "--show",
            "Trainee",
            "--setlist",
            "TWT",
            "--unit-song",
            "- Song",
        ])
        .unwrap();
        match cli.command {
            Command::Add {
                dry_run: true,
                row: AddRow::Theater(args),
            } => {
                assert_eq!(args.show, "Trainee");
                assert!(args.no.is_none());
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_cli_requires_unit_song() {
        let result = Cli::try_parse_from([
            "sheetform",
            "add",
            "theater",
            "--show",
            "Trainee",
            "--setlist",
            "TWT",
        ]);
        assert!(result.is_err());
    }
}
