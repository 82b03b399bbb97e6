//! The orchestration core.
//!
//! For a filtered listing: cache lookup, concurrent list + country fetch,
//! bounded per-resort detail fan-out, merge, write-through. One flaky
//! enrichment path never sinks a page: a resort whose detail fetch fails
//! is still returned with its summary fields and `weather: None`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use common::config::{AggregatorConfig, CacheConfig};
use common::{
    CountryInfo, EnrichedResort, Error, PageInfo, ResortApi, ResortFilter, ResortPage,
    Result, UserPreferences, WeatherSnapshot,
};
use recommend::ScoredResort;

use crate::cache::TtlCache;

const COUNTRIES_KEY: &str = "countries";

/// Cached aggregation service over an upstream `ResortApi`.
pub struct ResortAggregator {
    api: Arc<dyn ResortApi>,
    page_cache: TtlCache<ResortPage>,
    detail_cache: TtlCache<EnrichedResort>,
    country_cache: TtlCache<Vec<CountryInfo>>,
    detail_concurrency: usize,
    recommend_limit: u32,
}

impl ResortAggregator {
    pub fn new(
        api: Arc<dyn ResortApi>,
        cache_config: &CacheConfig,
        aggregator_config: &AggregatorConfig,
    ) -> Self {
        let ttl = Duration::from_secs(cache_config.ttl_secs);
        Self {
            api,
            page_cache: TtlCache::new(ttl),
            detail_cache: TtlCache::new(ttl),
            country_cache: TtlCache::new(ttl),
            detail_concurrency: aggregator_config.detail_concurrency.max(1),
            recommend_limit: aggregator_config.recommend_limit,
        }
    }

    /// One enriched page of resorts for a filter.
    ///
    /// A failed primary listing call yields an empty page rather than an
    /// error; callers see empty results and upstream outages identically
    /// at this layer. The failure is warn-logged for operators.
    pub async fn aggregate_resorts(&self, filter: &ResortFilter) -> ResortPage {
        let key = format!("resorts:{}", filter.canonical_query());
        if let Some(page) = self.page_cache.get(&key) {
            debug!("page cache hit for {key}");
            return page;
        }

        // Countries and the listing are independent; fetch both at once.
        let (countries, listed) = tokio::join!(self.countries(), self.api.list_resorts(filter));

        let (summaries, pagination) = match listed {
            Ok(page) => page,
            Err(e) => {
                warn!("resort listing failed, returning empty page: {e}");
                return ResortPage {
                    resorts: Vec::new(),
                    pagination: PageInfo::empty(filter.effective_limit()),
                };
            }
        };

        let agencies = match countries {
            Ok(list) => agency_map(list),
            Err(e) => {
                warn!("country lookup failed, omitting agency labels: {e}");
                HashMap::new()
            }
        };

        let resorts = self.enrich_page(summaries, &agencies).await;
        let page = ResortPage { resorts, pagination };
        self.page_cache.set(&key, page.clone());
        page
    }

    /// Fan out one detail fetch per resort, bounded by the configured
    /// concurrency. Results are reassembled in listing order; a failed or
    /// invalid detail fetch leaves that resort's weather `None`.
    async fn enrich_page(
        &self,
        summaries: Vec<common::ResortSummary>,
        agencies: &HashMap<String, String>,
    ) -> Vec<EnrichedResort> {
        let semaphore = Arc::new(Semaphore::new(self.detail_concurrency));
        let mut tasks: JoinSet<(usize, Option<WeatherSnapshot>)> = JoinSet::new();

        for (idx, summary) in summaries.iter().enumerate() {
            let api = Arc::clone(&self.api);
            let semaphore = Arc::clone(&semaphore);
            let resort_id = summary.resort_id.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let weather = match api.resort_detail(&resort_id).await {
                    Ok((_, weather)) => weather,
                    Err(e) => {
                        debug!("detail fetch failed for {resort_id}: {e}");
                        None
                    }
                };
                (idx, weather)
            });
        }

        let mut weather_slots: Vec<Option<WeatherSnapshot>> = vec![None; summaries.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, weather)) => weather_slots[idx] = weather,
                Err(e) => warn!("detail task failed to join: {e}"),
            }
        }

        summaries
            .into_iter()
            .zip(weather_slots)
            .map(|(summary, weather)| {
                let weather_agency = agencies.get(&summary.country_code).cloned();
                EnrichedResort {
                    summary,
                    weather,
                    weather_agency,
                }
            })
            .collect()
    }

    /// One enriched resort by id, or `None` when absent or unreachable.
    pub async fn aggregate_resort_detail(&self, id: &str) -> Option<EnrichedResort> {
        let key = format!("resort:{id}");
        if let Some(hit) = self.detail_cache.get(&key) {
            debug!("detail cache hit for {key}");
            return Some(hit);
        }

        match self.api.resort_detail(id).await {
            Ok((summary, weather)) => {
                let weather_agency = self.weather_agency_for(&summary.country_code).await;
                let enriched = EnrichedResort {
                    summary,
                    weather,
                    weather_agency,
                };
                self.detail_cache.set(&key, enriched.clone());
                Some(enriched)
            }
            Err(Error::NotFound(_)) => {
                debug!("resort {id} not found upstream");
                None
            }
            Err(e) => {
                warn!("resort detail failed for {id}: {e}");
                None
            }
        }
    }

    /// The country list, cached under the literal `"countries"` key.
    pub async fn countries(&self) -> Result<Vec<CountryInfo>> {
        if let Some(hit) = self.country_cache.get(COUNTRIES_KEY) {
            debug!("country cache hit");
            return Ok(hit);
        }

        let list = self.api.list_countries().await?;
        self.country_cache.set(COUNTRIES_KEY, list.clone());
        Ok(list)
    }

    /// Resorts ranked against the preferences, best match first. Equal
    /// scores keep their listing order.
    pub async fn recommend(&self, prefs: &UserPreferences) -> Vec<ScoredResort> {
        let filter = ResortFilter {
            country_codes: prefs.country.iter().cloned().collect(),
            page: Some(1),
            limit: Some(self.recommend_limit),
            ..Default::default()
        };

        let page = self.aggregate_resorts(&filter).await;
        recommend::rank(page.resorts, prefs)
    }

    async fn weather_agency_for(&self, country_code: &str) -> Option<String> {
        match self.countries().await {
            Ok(list) => list
                .into_iter()
                .find(|c| c.country_code == country_code)
                .map(|c| c.weather_agency),
            Err(e) => {
                debug!("agency lookup failed for {country_code}: {e}");
                None
            }
        }
    }
}

fn agency_map(countries: Vec<CountryInfo>) -> HashMap<String, String> {
    countries
        .into_iter()
        .map(|c| (c.country_code, c.weather_agency))
        .collect()
}
