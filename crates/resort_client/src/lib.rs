//! HTTP client for the upstream ski resort API.
//!
//! Covers the three endpoints the aggregator depends on: filtered resort
//! listings, per-resort detail with weather, and the country list. Every
//! call is one round trip bounded by the configured timeout, with bounded
//! retry on transient failures.

pub mod normalize;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use common::config::UpstreamConfig;
use common::{
    CountryInfo, Error, PageInfo, ResortApi, ResortFilter, ResortSummary, Result, WeatherSnapshot,
};

/// Async client for the resort/weather/country API.
#[derive(Debug, Clone)]
pub struct ResortClient {
    client: reqwest::Client,
    base_url: String,
    retry_attempts: u32,
    retry_backoff_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ListResortsResponse {
    #[serde(default)]
    resorts: Vec<ResortSummary>,
    #[serde(default)]
    pagination: Option<PaginationBlock>,
}

#[derive(Debug, Deserialize)]
struct PaginationBlock {
    #[serde(default)]
    total: u32,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    limit: u32,
}

impl ResortClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("slopescout/0.1")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build resort API HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_attempts: config.retry_attempts.max(1),
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// One GET round trip: timeout and transport errors become typed
    /// failures, non-2xx becomes `HttpStatus` with a body snippet.
    async fn get_value(&self, path: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = self.url(path);
        debug!("GET {} ({} query params)", url, query.len());

        let resp = self
            .client
            .get(&url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("GET {path}"))
                } else {
                    Error::Http(e.to_string())
                }
            })?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status,
                message: body[..body.len().min(500)].to_string(),
            });
        }

        resp.json()
            .await
            .map_err(|e| Error::Malformed(format!("GET {path}: {e}")))
    }

    /// Retry wrapper: transient failures get up to `retry_attempts` tries
    /// with linear backoff; permanent failures return immediately.
    async fn get_with_retry(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value> {
        let mut attempt = 1;
        loop {
            match self.get_value(path, query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    let backoff = self.retry_backoff_ms * attempt as u64;
                    warn!(
                        "GET {} attempt {}/{} failed ({}), retrying in {}ms",
                        path, attempt, self.retry_attempts, e, backoff
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl ResortApi for ResortClient {
    async fn list_resorts(
        &self,
        filter: &ResortFilter,
    ) -> Result<(Vec<ResortSummary>, PageInfo)> {
        let query = filter.query_pairs();
        let value = self.get_with_retry("/resorts", &query).await?;

        let body: ListResortsResponse =
            serde_json::from_value(value).map_err(|e| Error::Malformed(e.to_string()))?;

        // Recompute total_pages locally; the upstream block has been seen
        // with missing or inconsistent fields.
        let pagination = match body.pagination {
            Some(p) => PageInfo::new(
                p.total,
                if p.page > 0 { p.page } else { filter.effective_page() },
                if p.limit > 0 { p.limit } else { filter.effective_limit() },
            ),
            None => PageInfo::new(
                body.resorts.len() as u32,
                filter.effective_page(),
                filter.effective_limit(),
            ),
        };

        debug!(
            "listed {} resorts (total={}, page {}/{})",
            body.resorts.len(),
            pagination.total,
            pagination.page,
            pagination.total_pages
        );

        Ok((body.resorts, pagination))
    }

    async fn resort_detail(
        &self,
        id: &str,
    ) -> Result<(ResortSummary, Option<WeatherSnapshot>)> {
        let query = [("id", id.to_string())];
        let value = self.get_with_retry("/resort", &query).await?;

        let resort_value = match value.get("resort") {
            Some(v) if !v.is_null() => v.clone(),
            _ => return Err(Error::NotFound(id.to_string())),
        };
        let resort: ResortSummary =
            serde_json::from_value(resort_value).map_err(|e| Error::Malformed(e.to_string()))?;

        // Weather is enrichment: a payload that fails validation degrades
        // to "weather unavailable" rather than failing the lookup.
        let weather = normalize::normalize_weather(&value);
        if weather.is_none() {
            debug!("weather unavailable for resort {}", id);
        }

        Ok((resort, weather))
    }

    async fn list_countries(&self) -> Result<Vec<CountryInfo>> {
        let value = self.get_with_retry("/countries", &[]).await?;

        // The endpoint returns a bare array; tolerate a wrapped form too.
        let list = if value.is_array() {
            value
        } else {
            value
                .get("countries")
                .cloned()
                .ok_or_else(|| Error::Malformed("countries: expected an array".into()))?
        };

        serde_json::from_value(list).map_err(|e| Error::Malformed(e.to_string()))
    }
}
