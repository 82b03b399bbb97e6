//! Resort listing filters and their canonical query-string form.
//!
//! The canonical form serves double duty: it is what the upstream client
//! sends on the wire, and (prefixed) what the aggregator uses as a cache
//! key, so two equivalent filters always share one cache entry.

use serde::{Deserialize, Serialize};

/// Filters for GET /resorts. Absent fields are omitted from the query
/// string, never sent as zero values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResortFilter {
    #[serde(default)]
    pub name: Option<String>,
    /// Repeated `country_code` parameter for multi-select.
    #[serde(default)]
    pub country_codes: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub total_slopes_min: Option<u32>,
    #[serde(default)]
    pub total_slopes_max: Option<u32>,
    #[serde(default)]
    pub snow_parks_min: Option<u32>,
    #[serde(default)]
    pub snow_parks_max: Option<u32>,
    #[serde(default)]
    pub ski_lifts_min: Option<u32>,
    #[serde(default)]
    pub ski_lifts_max: Option<u32>,
    #[serde(default)]
    pub adult_day_pass_min: Option<f64>,
    #[serde(default)]
    pub adult_day_pass_max: Option<f64>,
    #[serde(default)]
    pub night_skiing: Option<bool>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ResortFilter {
    /// Query pairs in a fixed order. Country codes keep their selection
    /// order; everything else follows the upstream parameter list.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();

        if let Some(name) = &self.name {
            if !name.is_empty() {
                pairs.push(("name", name.clone()));
            }
        }
        for code in &self.country_codes {
            if !code.is_empty() {
                pairs.push(("country_code", code.clone()));
            }
        }
        if let Some(region) = &self.region {
            if !region.is_empty() {
                pairs.push(("region", region.clone()));
            }
        }

        push_num(&mut pairs, "total_slopes_min", self.total_slopes_min);
        push_num(&mut pairs, "total_slopes_max", self.total_slopes_max);
        push_num(&mut pairs, "snow_parks_min", self.snow_parks_min);
        push_num(&mut pairs, "snow_parks_max", self.snow_parks_max);
        push_num(&mut pairs, "ski_lifts_min", self.ski_lifts_min);
        push_num(&mut pairs, "ski_lifts_max", self.ski_lifts_max);

        if let Some(min) = self.adult_day_pass_min {
            pairs.push(("adult_day_pass_min", format_price(min)));
        }
        if let Some(max) = self.adult_day_pass_max {
            pairs.push(("adult_day_pass_max", format_price(max)));
        }
        if let Some(night) = self.night_skiing {
            pairs.push(("night_skiing", if night { "1" } else { "0" }.to_string()));
        }

        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);

        pairs
    }

    /// Canonical `k=v&k=v` form of the filter, used verbatim as the page
    /// cache key suffix.
    pub fn canonical_query(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Effective page size, falling back to the caller-layer default of 12.
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(12)
    }

    /// Effective page number, defaulting to the first page.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

fn push_num(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<u32>) {
    if let Some(v) = value {
        pairs.push((key, v.to_string()));
    }
}

fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_yields_empty_query() {
        assert_eq!(ResortFilter::default().canonical_query(), "");
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let filter = ResortFilter {
            name: Some("alta".into()),
            night_skiing: Some(false),
            page: Some(2),
            limit: Some(12),
            ..Default::default()
        };
        assert_eq!(
            filter.canonical_query(),
            "name=alta&night_skiing=0&page=2&limit=12"
        );
    }

    #[test]
    fn test_country_codes_repeat() {
        let filter = ResortFilter {
            country_codes: vec!["AT".into(), "CH".into()],
            ..Default::default()
        };
        assert_eq!(filter.canonical_query(), "country_code=AT&country_code=CH");
    }

    #[test]
    fn test_equivalent_filters_share_a_key() {
        let a = ResortFilter {
            adult_day_pass_max: Some(120.0),
            total_slopes_min: Some(10),
            ..Default::default()
        };
        let b = a.clone();
        assert_eq!(a.canonical_query(), b.canonical_query());
        assert_eq!(a.canonical_query(), "total_slopes_min=10&adult_day_pass_max=120");
    }

    #[test]
    fn test_effective_defaults() {
        let filter = ResortFilter::default();
        assert_eq!(filter.effective_page(), 1);
        assert_eq!(filter.effective_limit(), 12);
    }
}
