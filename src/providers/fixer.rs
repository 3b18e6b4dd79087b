use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::core::error::RatesError;
use crate::core::rates::{FluctuationWindow, RateSnapshot, RatesClient, SymbolCatalogEntry};

pub const DEFAULT_BASE_URL: &str = "https://api.apilayer.com/fixer";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize, Debug)]
struct SymbolsResponse {
    #[allow(dead_code)]
    success: bool,
    symbols: HashMap<String, String>,
}

// FixerClient implementation for RatesClient
pub struct FixerClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl FixerClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, RatesError> {
        let client = Client::builder()
            .user_agent("btcwatch/1.0")
            .timeout(timeout)
            .build()?;
        Ok(FixerClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> Result<Url, RatesError> {
        let raw = format!("{}/{}", self.base_url, name);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| RatesError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Sends the request and returns the raw body, which must not be empty.
    async fn get_body(&self, url: Url) -> Result<Vec<u8>, RatesError> {
        debug!("Requesting {}", url);
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .send()
            .await?
            .error_for_status()?;

        debug!(status = %response.status(), "Received fixer response");
        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(RatesError::NoData);
        }
        Ok(body.to_vec())
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RatesError> {
        serde_json::from_slice(body).map_err(|e| {
            error!(
                error = ?e,
                response = %String::from_utf8_lossy(body),
                "Failed to parse fixer response"
            );
            RatesError::Decode(e)
        })
    }
}

#[async_trait]
impl RatesClient for FixerClient {
    #[instrument(name = "FixerSymbolsFetch", skip(self))]
    async fn fetch_symbols(&self) -> Result<Vec<SymbolCatalogEntry>, RatesError> {
        let url = self.endpoint("symbols", &[])?;
        let body = self.get_body(url).await?;
        let data: SymbolsResponse = Self::decode(&body)?;

        Ok(data
            .symbols
            .into_iter()
            .map(|(code, name)| SymbolCatalogEntry { code, name })
            .collect())
    }

    #[instrument(
        name = "FixerFluctuationFetch",
        skip(self),
        fields(base = %base, symbols = %symbols)
    )]
    async fn fetch_fluctuation(
        &self,
        base: &str,
        symbols: &str,
    ) -> Result<RateSnapshot, RatesError> {
        let window = FluctuationWindow::today();
        let start_date = window.start_param();
        let end_date = window.end_param();
        let url = self.endpoint(
            "fluctuation",
            &[
                ("symbols", symbols),
                ("base", base),
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
            ],
        )?;

        let body = self.get_body(url).await?;
        Self::decode(&body)
    }
}
