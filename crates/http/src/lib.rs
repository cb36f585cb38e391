//! # sheetform-http
//!
//! Spreadsheet access for sheetform.
//!
//! [`SheetsClient`] talks to the Google Sheets v4 REST API and
//! [`MemoryBackend`] keeps sheets in memory; both implement [`SheetsApi`].
//! [`execute_plan`] applies a [`sheetform_core::WritePlan`] step by step and
//! reports how far it got when a step fails.

mod api;
mod client;
mod config;
mod error;
mod executor;
mod memory;
pub mod range;

pub use api::SheetsApi;
pub use client::SheetsClient;
pub use config::{Config, SheetTitles, ACCESS_TOKEN_ENV, DEFAULT_API_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use executor::{execute_plan, load_sheet, submit_row, Submission};
pub use memory::{FormatCall, MemoryBackend};
