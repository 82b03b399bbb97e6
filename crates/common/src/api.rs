//! The upstream API seam.
//!
//! The aggregator orchestrates against this trait rather than a concrete
//! HTTP client, so its partial-failure behavior can be exercised with an
//! in-memory fake.

use async_trait::async_trait;

use crate::{CountryInfo, PageInfo, ResortFilter, ResortSummary, Result, WeatherSnapshot};

#[async_trait]
pub trait ResortApi: Send + Sync {
    /// One page of resort summaries matching the filter.
    async fn list_resorts(
        &self,
        filter: &ResortFilter,
    ) -> Result<(Vec<ResortSummary>, PageInfo)>;

    /// A single resort with its normalized weather snapshot. The snapshot
    /// is `None` when the weather block failed validation; the resort
    /// itself missing is `Error::NotFound`.
    async fn resort_detail(
        &self,
        id: &str,
    ) -> Result<(ResortSummary, Option<WeatherSnapshot>)>;

    /// All countries known to the upstream.
    async fn list_countries(&self) -> Result<Vec<CountryInfo>>;
}
