//! Minimal PostgREST client.
//!
//! Every call maps failures onto [`AppError`]: transport problems become
//! `ExternalService`, non-2xx answers `Database`, undecodable bodies
//! `Internal`.

use std::time::Duration;

use finbot_shared::config::SupabaseConfig;
use finbot_shared::{AppError, AppResult};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Query pairs appended to a table URL.
pub type Query = Vec<(&'static str, String)>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
}

impl SupabaseClient {
    /// Builds a client sending the API key on every request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the key is not a valid header
    /// value or the client cannot be built.
    pub fn new(config: &SupabaseConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&config.key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", config.key))?);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
        })
    }

    /// URL of a table endpoint.
    #[must_use]
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    /// `GET` rows of `table` matching `query`.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> AppResult<Vec<T>> {
        let request = self.http.get(self.table_url(table)).query(query);
        let response = send(request, table).await?;
        decode(response, table).await
    }

    /// `POST` one row and return what the backend stored.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(row);
        let response = send(request, table).await?;
        decode::<T>(response, table)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal(format!("{table}: insert returned no rows")))
    }

    /// `POST` one row, merging with the existing row on `on_conflict`.
    pub async fn upsert<B: Serialize + Sync>(
        &self,
        table: &str,
        row: &B,
        on_conflict: &'static str,
    ) -> AppResult<()> {
        let request = self
            .http
            .post(self.table_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row);
        send(request, table).await.map(drop)
    }

    /// `DELETE` rows of `table` matching `query`.
    pub async fn delete(&self, table: &str, query: &Query) -> AppResult<()> {
        let request = self.http.delete(self.table_url(table)).query(query);
        send(request, table).await.map(drop)
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Configuration(format!("invalid storage key: {e}")))
}

async fn send(request: RequestBuilder, table: &str) -> AppResult<Response> {
    let response = request.send().await.map_err(|e| {
        warn!(table, error = %e, "Storage request failed");
        AppError::ExternalService(format!("storage request to {table} failed: {e}"))
    })?;

    let status = response.status();
    if status.is_success() {
        debug!(table, status = status.as_u16(), "Storage request succeeded");
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(table, status = status.as_u16(), body = %body, "Storage rejected request");
    Err(AppError::Database(format!("{table}: {status} {body}")))
}

async fn decode<T: DeserializeOwned>(response: Response, table: &str) -> AppResult<Vec<T>> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::ExternalService(format!("{table}: failed to read body: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Internal(format!("{table}: failed to decode rows: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, key: &str) -> SupabaseConfig {
        SupabaseConfig {
            url: url.to_string(),
            key: key.to_string(),
        }
    }

    #[test]
    fn test_table_url_ignores_trailing_slash() {
        let client = SupabaseClient::new(&config("https://db.example.com/", "k")).unwrap();
        assert_eq!(
            client.table_url("transactions"),
            "https://db.example.com/rest/v1/transactions"
        );
    }

    #[test]
    fn test_invalid_key_is_configuration_error() {
        let err = SupabaseClient::new(&config("https://db.example.com", "bad\nkey")).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
