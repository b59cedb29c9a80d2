use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum BoxOfficeError {
    #[error("BOXOFFICE_URL or BOXOFFICE_API_KEY not set")]
    NotConfigured,

    #[error("box office request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("box office API returned status {0}")]
    Status(StatusCode),

    #[error("failed to parse box office response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Provider payload for a single title.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxOfficeRecord {
    #[serde(default)]
    pub distributor: Option<String>,
    #[serde(default)]
    pub budget: Option<i64>,
    pub revenue: ProviderRevenue,
    #[serde(default)]
    pub mpa_rating: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ProviderRevenue {
    pub worldwide: i64,
    #[serde(default, rename = "openingWeekendUSA")]
    pub opening_weekend_usa: Option<i64>,
}

pub struct BoxOfficeClient {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
}

impl BoxOfficeClient {
    pub fn new(
        client: reqwest::Client,
        base_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        if base_url.is_none() || api_key.is_none() {
            tracing::warn!("box office provider not configured; movies will not be enriched");
        }

        Self { client, base_url, api_key, timeout }
    }

    pub async fn fetch(&self, title: &str) -> Result<BoxOfficeRecord, BoxOfficeError> {
        let (Some(base_url), Some(api_key)) = (&self.base_url, &self.api_key) else {
            return Err(BoxOfficeError::NotConfigured);
        };

        let url = format!("{}/boxoffice", base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(url)
            .header("X-API-Key", api_key)
            .query(&[("title", title)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(BoxOfficeError::Request)?;

        if !resp.status().is_success() {
            return Err(BoxOfficeError::Status(resp.status()));
        }

        resp.json().await.map_err(BoxOfficeError::Decode)
    }
}
