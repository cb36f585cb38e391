//! Connection and sheet settings, loaded from YAML.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use sheetform_core::{GridLayout, SheetKind};
use std::path::Path;

/// Environment variable that overrides the configured access token.
pub const ACCESS_TOKEN_ENV: &str = "SHEETFORM_ACCESS_TOKEN";

/// Default Google Sheets API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com/v4";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Titles of the sheet tabs holding each schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetTitles {
    pub theater: String,
    pub video_call: String,
}

impl Default for SheetTitles {
    fn default() -> Self {
        Self {
            theater: "theater_test".to_string(),
            video_call: "VC 2025_test".to_string(),
        }
    }
}

impl SheetTitles {
    #[must_use]
    pub fn title(&self, kind: SheetKind) -> &str {
        match kind {
            SheetKind::Theater => &self.theater,
            SheetKind::VideoCall => &self.video_call,
        }
    }
}

/// Settings shared by the server and the CLI.
///
/// ```yaml
/// spreadsheet_id: 1J8WJobKJSeDEybF7rdDAB6hoFQCyeKsd8TcgOsMCIlo
/// timeout_secs: 10
/// sheets:
///   theater: theater_test
///   video_call: VC 2025_test
/// layout:
///   header_row: 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub spreadsheet_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub sheets: SheetTitles,
    #[serde(default)]
    pub layout: GridLayout,
}

impl Config {
    /// Defaults for everything but the spreadsheet id.
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            api_base_url: default_api_base_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            sheets: SheetTitles::default(),
            layout: GridLayout::default(),
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(source: &str) -> ClientResult<Self> {
        let config: Self = serde_yaml::from_str(source)
            .map_err(|e| ClientError::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&source)
    }

    /// Take the access token from the environment when it is set.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.is_empty() {
                self.access_token = Some(token);
            }
        }
        self
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ClientError::Config("spreadsheet_id is empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Sheet title for a schedule kind.
    #[must_use]
    pub fn title(&self, kind: SheetKind) -> &str {
        self.sheets.title(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetform_core::LeadingRows;
    use std::io::Write;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_yaml_str("spreadsheet_id: abc").unwrap();
        assert_eq!(config, Config::new("abc"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.title(SheetKind::Theater), "theater_test");
        assert_eq!(config.title(SheetKind::VideoCall), "VC 2025_test");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_yaml_str(
            r"
spreadsheet_id: abc
api_base_url: http://localhost:8080/v4
timeout_secs: 5
sheets:
  theater: Theater1
layout:
  header_row: 1
  leading_rows: buffer
",
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080/v4");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.title(SheetKind::Theater), "Theater1");
        assert_eq!(config.title(SheetKind::VideoCall), "VC 2025_test");
        assert_eq!(config.layout.header_row, 1);
        assert_eq!(config.layout.data_start_row, 1);
        assert_eq!(config.layout.leading_rows, LeadingRows::Buffer);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::from_yaml_str("spreadsheet_id: ''"),
            Err(ClientError::Config(_))
        ));
        assert!(Config::from_yaml_str("timeout_secs: 3").is_err());
        assert!(Config::from_yaml_str("spreadsheet_id: abc\ntimeout_secs: 0").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spreadsheet_id: from-file").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.spreadsheet_id, "from-file");

        assert!(Config::from_file("/nonexistent/sheetform.yaml").is_err());
    }

    #[test]
    fn test_token_not_serialized() {
        let mut config = Config::new("abc");
        config.access_token = Some("secret".into());
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));
    }
}
