//! Google Sheets v4 REST client.

use crate::api::SheetsApi;
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::range::row_anchor;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use sheetform_core::{format_for, AppendMode, CellGrid, Fill};
use std::time::Duration;

/// HTTP client bound to one spreadsheet document.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<SheetJson>,
}

#[derive(Debug, Default, Deserialize)]
struct SheetJson {
    #[serde(default)]
    properties: SheetProperties,
    #[serde(default)]
    data: Vec<GridData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    // Omitted by the API when it is 0.
    #[serde(default)]
    sheet_id: i64,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridData {
    #[serde(default)]
    row_data: Vec<RowData>,
}

#[derive(Debug, Default, Deserialize)]
struct RowData {
    #[serde(default)]
    values: Vec<CellData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellData {
    #[serde(default)]
    formatted_value: Option<String>,
}

impl SheetsClient {
    /// Constructs a client for `spreadsheet_id` with a 30-second timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, spreadsheet_id: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, spreadsheet_id, 30)
    }

    /// Constructs a client with a custom per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        timeout_secs: u64,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid API base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: spreadsheet_id.into(),
            access_token: None,
        })
    }

    /// Build a client from loaded configuration.
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let client = Self::with_timeout(
            &config.api_base_url,
            config.spreadsheet_id.clone(),
            config.timeout_secs,
        )?;
        Ok(match &config.access_token {
            Some(token) => client.with_access_token(token.clone()),
            None => client,
        })
    }

    /// Send `token` as a bearer credential on every request.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// `{base}/spreadsheets/{last}` with `last` percent-encoded as one segment.
    fn url(&self, extra: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Config(format!("cannot use '{}' as a base URL", self.base_url)))?
            .pop_if_empty()
            .push("spreadsheets")
            .extend(extra);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_spreadsheet(&self, query: &[(&str, &str)]) -> ClientResult<Spreadsheet> {
        let url = self.url(&[&self.spreadsheet_id])?;
        let response = self
            .authorize(self.client.get(url).query(query))
            .send()
            .await
            .map_err(|e| ClientError::Fetch(e.to_string()))?;
        let response = check_status(response).await.map_err(ClientError::Fetch)?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Fetch(format!("Failed to parse JSON: {e}")))
    }
}

/// Pass successful responses through; turn failures into a message with the
/// status and the response body.
async fn check_status(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let reason = status.canonical_reason().unwrap_or("Unknown");
    if body.is_empty() {
        Err(format!("HTTP {} - {reason}", status.as_u16()))
    } else {
        Err(format!("HTTP {} - {reason}: {body}", status.as_u16()))
    }
}

/// `repeatCell` request body for one formatted row.
pub(crate) fn repeat_cell_request(sheet_id: i64, row: usize, width: usize, fill: &Fill) -> JsonValue {
    let background = format_for(fill);
    let (format, fields) = if fill.emphasized() {
        (
            json!({
                "backgroundColor": background,
                "horizontalAlignment": "CENTER",
                "textFormat": { "bold": true }
            }),
            "userEnteredFormat(backgroundColor,horizontalAlignment,textFormat.bold)",
        )
    } else {
        (
            json!({ "backgroundColor": background }),
            "userEnteredFormat.backgroundColor",
        )
    };

    json!({
        "requests": [{
            "repeatCell": {
                "range": {
                    "sheetId": sheet_id,
                    "startRowIndex": row.saturating_sub(1),
                    "endRowIndex": row,
                    "startColumnIndex": 0,
                    "endColumnIndex": width
                },
                "cell": { "userEnteredFormat": format },
                "fields": fields
            }
        }]
    })
}

#[async_trait]
impl SheetsApi for SheetsClient {
    async fn fetch_grid(&self, title: &str) -> ClientResult<CellGrid> {
        let spreadsheet = self
            .get_spreadsheet(&[("ranges", title), ("includeGridData", "true")])
            .await?;

        let rows = spreadsheet
            .sheets
            .into_iter()
            .next()
            .and_then(|sheet| sheet.data.into_iter().next())
            .map(|data| data.row_data)
            .unwrap_or_default();

        tracing::debug!(sheet = title, rows = rows.len(), "fetched grid");

        Ok(CellGrid::from(
            rows.into_iter()
                .map(|row| {
                    row.values
                        .into_iter()
                        .map(|cell| cell.formatted_value.unwrap_or_default())
                        .collect()
                })
                .collect::<Vec<Vec<String>>>(),
        ))
    }

    async fn append_row(
        &self,
        title: &str,
        row: usize,
        values: &[String],
        mode: AppendMode,
    ) -> ClientResult<()> {
        let range = row_anchor(title, row);
        let url = self.url(&[&self.spreadsheet_id, "values", &format!("{range}:append")])?;

        let mut query = vec![("valueInputOption", "RAW")];
        if mode == AppendMode::InsertRows {
            query.push(("insertDataOption", "INSERT_ROWS"));
        }

        tracing::debug!(range = %range, ?mode, "appending row");
        let response = self
            .authorize(self.client.post(url).query(&query))
            .json(&json!({ "values": [values] }))
            .send()
            .await
            .map_err(|e| ClientError::Append(e.to_string()))?;
        check_status(response).await.map_err(ClientError::Append)?;
        Ok(())
    }

    async fn apply_formatting(
        &self,
        sheet_id: i64,
        row: usize,
        width: usize,
        fill: &Fill,
    ) -> ClientResult<()> {
        let url = self.url(&[&format!("{}:batchUpdate", self.spreadsheet_id)])?;
        let response = self
            .authorize(self.client.post(url))
            .json(&repeat_cell_request(sheet_id, row, width, fill))
            .send()
            .await
            .map_err(|e| ClientError::Format(e.to_string()))?;
        check_status(response).await.map_err(ClientError::Format)?;
        Ok(())
    }

    async fn resolve_sheet_id(&self, title: &str) -> ClientResult<Option<i64>> {
        let spreadsheet = self
            .get_spreadsheet(&[("fields", "sheets.properties")])
            .await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .find(|sheet| sheet.properties.title == title)
            .map(|sheet| sheet.properties.sheet_id))
    }
}
