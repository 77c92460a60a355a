//! D-ATIS HTTP adapter.
//!
//! Implements the `datis-core` [`AtisSource`] port with a plain reqwest client:
//! one GET per call, transport-default timeouts, no retries.

use async_trait::async_trait;
use serde_json::Value;

use datis_core::{
    config::DEFAULT_API_BASE_URL, domain::StationCode, errors::FetchError, ports::AtisSource,
    report::RawPayload, Error, Result,
};

#[derive(Clone, Debug)]
pub struct DatisClient {
    base_url: String,
    http: reqwest::Client,
}

impl DatisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("datis-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_json(&self, path: &str) -> std::result::Result<Value, FetchError> {
        let url = self.url(path);
        tracing::info!(%url, "datis request");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        tracing::info!(%url, status = status.as_u16(), "datis response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        decode_body(&body)
    }
}

impl Default for DatisClient {
    fn default() -> Self {
        Self::with_client(DEFAULT_API_BASE_URL, reqwest::Client::new())
    }
}

fn decode_body(body: &str) -> std::result::Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// String entries of a `/stations` body; anything else is skipped.
fn station_strings(v: Value) -> Vec<String> {
    match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl AtisSource for DatisClient {
    async fn fetch(&self, station: &StationCode) -> std::result::Result<RawPayload, FetchError> {
        self.get_json(station.as_str()).await.map(RawPayload::from)
    }

    async fn stations(&self) -> std::result::Result<Vec<String>, FetchError> {
        self.get_json("stations").await.map(station_strings)
    }

    async fn fetch_all(&self) -> std::result::Result<RawPayload, FetchError> {
        self.get_json("all").await.map(RawPayload::from)
    }
}
