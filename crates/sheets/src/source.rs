use crate::error::{Result, SheetsError};
use crate::row::RawRow;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

pub const DEFAULT_SHEET_ID: &str = "1n9r5BUClyw1aj0S7Vbtam_5xgaQtRM0xYs4KIkJdTVc";
pub const DEFAULT_RANGE: &str = "A1:Z";

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Where raw card rows come from.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;

    async fn fetch_rows(&self) -> Result<Vec<RawRow>>;
}

/// Reads the public card sheet through the Sheets v4 `values` endpoint.
pub struct GoogleSheetsSource {
    client: reqwest::Client,
    sheet_id: String,
    range: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl GoogleSheetsSource {
    pub fn new(
        sheet_id: impl Into<String>,
        range: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SheetsError::Config(
                "GOOGLE_SHEETS_API_KEY is required to read the card sheet".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("eternal-sheets/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            sheet_id: sheet_id.into(),
            range: range.into(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!(
            "{SHEETS_API}/{}/values/{}",
            self.sheet_id,
            self.range.replace(' ', "%20")
        )
    }
}

/// Zips the header row with every following row. Short rows are padded with "".
pub fn rows_from_values(values: Vec<Vec<Value>>) -> Vec<RawRow> {
    let mut rows = values.into_iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = headers
        .into_iter()
        .map(|h| match h {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .collect();

    rows.map(|cells| {
        let mut cells = cells.into_iter();
        headers
            .iter()
            .map(|header| {
                let value = cells.next().unwrap_or_else(|| Value::String(String::new()));
                (header.clone(), value)
            })
            .collect()
    })
    .collect()
}

#[async_trait]
impl CardSource for GoogleSheetsSource {
    fn describe(&self) -> String {
        format!("Google Sheet {} ({})", self.sheet_id, self.range)
    }

    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let response = self
            .client
            .get(self.url())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(rows_from_values(range.values))
    }
}

/// Reads a local JSON export: an array of row objects keyed by column header.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CardSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }

    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let data = tokio::fs::read_to_string(&self.path).await?;
        let parsed: Value = serde_json::from_str(&data)?;
        let Value::Array(items) = parsed else {
            return Err(SheetsError::InvalidData(format!(
                "{} must contain a JSON array of rows",
                self.path.display()
            )));
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                _ => Err(SheetsError::InvalidData(format!(
                    "row {i} in {} is not an object",
                    self.path.display()
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn header_row_keys_the_rest() {
        let rows = rows_from_values(vec![
            vec![json!("Name"), json!("Cost"), json!("DeckBuildable")],
            vec![json!("Torch"), json!("1"), json!("TRUE")],
            vec![json!("Short")],
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Cost"], json!("1"));
        assert_eq!(rows[1]["DeckBuildable"], json!(""));
        assert!(rows_from_values(Vec::new()).is_empty());
    }

    #[test]
    fn api_key_is_required() {
        assert!(matches!(
            GoogleSheetsSource::new(DEFAULT_SHEET_ID, DEFAULT_RANGE, " "),
            Err(SheetsError::Config(_))
        ));
    }

    #[tokio::test]
    async fn json_file_source_reads_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        std::fs::write(&path, r#"[{"Name": "Torch", "Cost": 1}]"#).unwrap();

        let rows = JsonFileSource::new(&path).fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Name"], json!("Torch"));
    }

    #[tokio::test]
    async fn json_file_source_rejects_non_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        std::fs::write(&path, r#"{"Name": "Torch"}"#).unwrap();

        let err = JsonFileSource::new(&path).fetch_rows().await.unwrap_err();
        assert!(matches!(err, SheetsError::InvalidData(_)));
    }
}
