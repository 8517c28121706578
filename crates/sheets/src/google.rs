use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use dealflow_core::config::SheetsConfig;
use dealflow_core::{Deal, Field, PipelineError};

use crate::credentials::SheetsCredentials;
use crate::rows;
use crate::store::RowStore;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Google Sheets v4 values-API implementation of [`RowStore`].
///
/// Coordinates are `ColumnLetterRowNumber`; values are written with
/// `USER_ENTERED` interpretation so number- and date-looking text is
/// coerced by the store, not by this system. Every call carries the
/// configured request timeout and fails outright - no retry policy.
pub struct GoogleSheetsStore {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    credentials: SheetsCredentials,
}

impl GoogleSheetsStore {
    pub fn new(
        config: &SheetsConfig,
        credentials: SheetsCredentials,
    ) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| PipelineError::backend(format!("http client init: {error}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            credentials,
        })
    }

    /// Points the store at a different endpoint; test harnesses use this.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url, self.spreadsheet_id, range, suffix
        )
    }

    fn bearer(&self) -> &str {
        self.credentials.access_token().expose_secret()
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
struct AppendUpdates {
    #[serde(rename = "updatedRange")]
    updated_range: Option<String>,
}

fn transport_error(error: reqwest::Error) -> PipelineError {
    PipelineError::backend(format!("sheets API unreachable: {error}"))
}

fn status_error(status: StatusCode) -> PipelineError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        PipelineError::backend(format!(
            "sheets API rejected the credentials ({status}) - re-run the authorization flow"
        ))
    } else {
        PipelineError::backend(format!("sheets API returned {status}"))
    }
}

#[async_trait]
impl RowStore for GoogleSheetsStore {
    async fn fetch_all(&self) -> Result<Vec<Deal>, PipelineError> {
        let response = self
            .client
            .get(self.values_url(rows::DEAL_RANGE, ""))
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|error| PipelineError::backend(format!("sheets response body: {error}")))?;

        let deals = rows::deals_from_values(&range.values);
        debug!(deal_count = deals.len(), "fetched pipeline rows");
        Ok(deals)
    }

    async fn update_cell(
        &self,
        row_number: u32,
        field: Field,
        value: &str,
    ) -> Result<(), PipelineError> {
        let cell = rows::cell_reference(field, row_number);
        let response = self
            .client
            .put(self.values_url(&cell, "?valueInputOption=USER_ENTERED"))
            .bearer_auth(self.bearer())
            .json(&json!({ "values": [[value]] }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        debug!(cell = %cell, field = field.name(), "updated cell");
        Ok(())
    }

    async fn append_row(&self, fields: &BTreeMap<Field, String>) -> Result<u32, PipelineError> {
        let row = rows::row_from_fields(fields);
        let response = self
            .client
            .post(self.values_url(rows::DEAL_RANGE, ":append?valueInputOption=USER_ENTERED"))
            .bearer_auth(self.bearer())
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let appended: AppendResponse = response
            .json()
            .await
            .map_err(|error| PipelineError::backend(format!("sheets response body: {error}")))?;

        appended
            .updates
            .and_then(|updates| updates.updated_range)
            .as_deref()
            .and_then(rows::row_number_from_range)
            .ok_or_else(|| {
                PipelineError::backend("append response carried no updated range".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use dealflow_core::config::SheetsConfig;

    use super::{status_error, GoogleSheetsStore};
    use crate::credentials::SheetsCredentials;

    fn store() -> GoogleSheetsStore {
        let config = SheetsConfig {
            spreadsheet_id: "sheet-123".to_string(),
            token_path: "token.json".into(),
            timeout_secs: 5,
        };
        let blob =
            base64::engine::general_purpose::STANDARD.encode("{\"token\": \"ya29.test\"}");
        let credentials = SheetsCredentials::from_base64(&blob).expect("credentials");
        GoogleSheetsStore::new(&config, credentials).expect("store")
    }

    #[test]
    fn urls_address_the_values_api() {
        let store = store().with_base_url("http://localhost:9999");
        assert_eq!(
            store.values_url("A:N", ""),
            "http://localhost:9999/v4/spreadsheets/sheet-123/values/A:N"
        );
        assert_eq!(
            store.values_url("G17", "?valueInputOption=USER_ENTERED"),
            "http://localhost:9999/v4/spreadsheets/sheet-123/values/G17?valueInputOption=USER_ENTERED"
        );
    }

    #[test]
    fn auth_failures_mention_credentials() {
        let message = status_error(reqwest::StatusCode::UNAUTHORIZED).user_message();
        assert!(message.contains("credentials"));

        let message = status_error(reqwest::StatusCode::SERVICE_UNAVAILABLE).user_message();
        assert!(message.contains("503"));
    }
}
