//! Spreadsheet client tests against a mock API server.

use serde_json::json;
use sheetform_core::{AppendMode, Fill, Rgb, RowRole};
use sheetform_http::{ClientError, SheetsApi, SheetsClient};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SPREADSHEET: &str = "sheet-123";

fn client(server: &MockServer) -> SheetsClient {
    SheetsClient::new(&server.uri(), SPREADSHEET).expect("client")
}

fn cells(values: &[Option<&str>]) -> serde_json::Value {
    let values: Vec<_> = values
        .iter()
        .map(|v| match v {
            Some(text) => json!({ "formattedValue": text }),
            None => json!({}),
        })
        .collect();
    json!({ "values": values })
}

#[tokio::test]
async fn test_fetch_grid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/spreadsheets/{SPREADSHEET}")))
        .and(query_param("ranges", "theater_test"))
        .and(query_param("includeGridData", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [{
                "properties": { "sheetId": 5, "title": "theater_test" },
                "data": [{
                    "rowData": [
                        cells(&[Some("JADWAL")]),
                        {},
                        cells(&[Some("NO"), Some("Tanggal"), Some("Show"), Some("Setlist"), Some("Unit Song")]),
                        cells(&[Some("1"), None, Some("Reguler")]),
                    ]
                }]
            }]
        })))
        .mount(&server)
        .await;

    let grid = client(&server).fetch_grid("theater_test").await.unwrap();
    assert_eq!(grid.len(), 4);
    assert_eq!(grid.row(0).unwrap(), ["JADWAL".to_string()]);
    assert!(grid.row(1).unwrap().is_empty());
    assert_eq!(grid.row(2).unwrap().len(), 5);
    assert_eq!(
        grid.row(3).unwrap(),
        ["1".to_string(), String::new(), "Reguler".to_string()]
    );
}

#[tokio::test]
async fn test_fetch_grid_without_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/spreadsheets/{SPREADSHEET}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sheets": [{}] })))
        .mount(&server)
        .await;

    let grid = client(&server).fetch_grid("empty").await.unwrap();
    assert!(grid.is_empty());
}

#[tokio::test]
async fn test_bearer_token_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sheets": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).with_access_token("token-1");
    let grid = client.fetch_grid("theater_test").await.unwrap();
    assert!(grid.is_empty());
}

#[tokio::test]
async fn test_fetch_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("caller does not have permission"))
        .mount(&server)
        .await;

    match client(&server).fetch_grid("theater_test").await {
        Err(ClientError::Fetch(message)) => {
            assert!(message.contains("HTTP 403"));
            assert!(message.contains("caller does not have permission"));
        }
        other => panic!("Expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_bad_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).fetch_grid("theater_test").await,
        Err(ClientError::Fetch(_))
    ));
}

#[tokio::test]
async fn test_append_insert_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/spreadsheets/{SPREADSHEET}/values/theater_test!A7:append"
        )))
        .and(query_param("valueInputOption", "RAW"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(body_json(json!({
            "values": [["3", "17/01/2025", "Trainee", "TWT", "- C"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let values: Vec<String> = ["3", "17/01/2025", "Trainee", "TWT", "- C"]
        .iter()
        .map(|c| (*c).to_string())
        .collect();
    client(&server)
        .append_row("theater_test", 7, &values, AppendMode::InsertRows)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_append_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    match client(&server)
        .append_row("theater_test", 1, &[], AppendMode::Overwrite)
        .await
    {
        Err(ClientError::Append(message)) => assert_eq!(message, "HTTP 400 - Bad Request"),
        other => panic!("Expected append error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_apply_formatting() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/spreadsheets/{SPREADSHEET}:batchUpdate")))
        .and(body_partial_json(json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": 5,
                        "startRowIndex": 10,
                        "endRowIndex": 11,
                        "startColumnIndex": 0,
                        "endColumnIndex": 5
                    },
                    "fields": "userEnteredFormat(backgroundColor,horizontalAlignment,textFormat.bold)"
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "replies": [{}] })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .apply_formatting(
            5,
            11,
            5,
            &Fill::Role {
                role: RowRole::SectionTitle,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_apply_label_formatting_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fill = Fill::Label {
        label: "Launch".into(),
        color: Rgb::WHITE,
    };
    assert!(matches!(
        client(&server).apply_formatting(0, 3, 4, &fill).await,
        Err(ClientError::Format(_))
    ));
}

#[tokio::test]
async fn test_resolve_sheet_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/spreadsheets/{SPREADSHEET}")))
        .and(query_param("fields", "sheets.properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [
                { "properties": { "title": "theater_test" } },
                { "properties": { "sheetId": 1234, "title": "VC 2025_test" } }
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.resolve_sheet_id("theater_test").await.unwrap(), Some(0));
    assert_eq!(
        client.resolve_sheet_id("VC 2025_test").await.unwrap(),
        Some(1234)
    );
    assert_eq!(client.resolve_sheet_id("other").await.unwrap(), None);
}
