//! Domain types shared across the workspace.
//!
//! Wire-facing structs mirror the upstream resort API field names so they
//! deserialize straight off the JSON responses; unreliable fields carry
//! `#[serde(default)]` so one absent field does not reject a whole row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Resort types ──────────────────────────────────────────────────────

/// A ski resort as returned by GET /resorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortSummary {
    pub resort_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub beginner_percentage: f64,
    #[serde(default)]
    pub intermediate_percentage: f64,
    #[serde(default)]
    pub advanced_percentage: f64,
    #[serde(default)]
    pub total_slopes: u32,
    #[serde(default)]
    pub snow_parks: u32,
    #[serde(default)]
    pub ski_lifts: u32,
    /// Upstream encodes this as 0|1.
    #[serde(default, deserialize_with = "bool_from_int_or_bool")]
    pub night_skiing: bool,
    #[serde(default)]
    pub adult_day_pass: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub season_start: String,
    #[serde(default)]
    pub season_end: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A country as returned by GET /countries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryInfo {
    pub country_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weather_agency: String,
    #[serde(default)]
    pub total_resorts: u32,
}

// ── Weather types (canonical, post-normalization) ─────────────────────

/// Point-in-time current conditions for one resort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: f64,
    pub wind_gust: f64,
    #[serde(default)]
    pub cloudiness: f64,
    #[serde(default)]
    pub uv_index: f64,
    pub weather_description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// One future day in a forecast. `temp_min <= temp_max` is not guaranteed
/// upstream and is never assumed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: DateTime<Utc>,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub feels_like_day: f64,
    #[serde(default)]
    pub feels_like_night: f64,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_direction: f64,
    #[serde(default)]
    pub wind_gust: f64,
    #[serde(default)]
    pub precipitation_probability: f64,
    #[serde(default)]
    pub snow_amount: f64,
    #[serde(default)]
    pub rain_amount: f64,
    #[serde(default)]
    pub uv_index: f64,
    #[serde(default)]
    pub cloudiness: f64,
    #[serde(default)]
    pub conditions: String,
    #[serde(default)]
    pub description: String,
}

/// Canonical weather snapshot: current conditions plus an ordered forecast.
/// Always replaced wholesale, never merged across fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

// ── Aggregated output types ───────────────────────────────────────────

/// A resort summary joined with whatever enrichment succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedResort {
    #[serde(flatten)]
    pub summary: ResortSummary,
    pub weather: Option<WeatherSnapshot>,
    pub weather_agency: Option<String>,
}

/// Pagination block for a listing response. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PageInfo {
    /// Build from a total count, clamping page to 1 and computing
    /// `total_pages = ceil(total / limit)` (0 when the result set is empty).
    pub fn new(total: u32, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        Self {
            total,
            page: page.max(1),
            limit,
            total_pages,
        }
    }

    /// The empty page returned when a primary listing call fails.
    pub fn empty(limit: u32) -> Self {
        Self::new(0, 1, limit)
    }
}

/// One page of enriched resorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortPage {
    pub resorts: Vec<EnrichedResort>,
    pub pagination: PageInfo,
}

// ── Preference types ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainTag {
    Groomed,
    Powder,
    Park,
    Backcountry,
}

/// Day-pass budget in the upstream's listing currency. `min <= max` is the
/// caller's obligation, not checked here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub skill_level: SkillLevel,
    #[serde(default)]
    pub terrain: Vec<TerrainTag>,
    pub budget: BudgetRange,
    #[serde(default)]
    pub country: Option<String>,
}

// ── serde helpers ─────────────────────────────────────────────────────

/// Accept `true`/`false`, `0`/`1`, or absent for flag fields the upstream
/// encodes inconsistently.
fn bool_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Int(n) => n != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_arithmetic() {
        let info = PageInfo::new(25, 1, 12);
        assert_eq!(info.total_pages, 3);

        let empty = PageInfo::new(0, 0, 12);
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.page, 1, "page clamps to 1");

        let exact = PageInfo::new(24, 2, 12);
        assert_eq!(exact.total_pages, 2);
    }

    #[test]
    fn test_resort_summary_accepts_int_night_skiing() {
        let json = r#"{
            "resort_id": "r-1",
            "name": "Zermatt",
            "country_code": "CH",
            "night_skiing": 1,
            "adult_day_pass": 89.0
        }"#;
        let resort: ResortSummary = serde_json::from_str(json).expect("should deserialize");
        assert!(resort.night_skiing);
        assert_eq!(resort.total_slopes, 0, "absent counts default to zero");
    }

    #[test]
    fn test_resort_summary_accepts_bool_night_skiing() {
        let json = r#"{"resort_id": "r-2", "night_skiing": false}"#;
        let resort: ResortSummary = serde_json::from_str(json).expect("should deserialize");
        assert!(!resort.night_skiing);
    }

    #[test]
    fn test_skill_level_wire_names() {
        let level: SkillLevel = serde_json::from_str("\"beginner\"").expect("valid");
        assert_eq!(level, SkillLevel::Beginner);
        let tag: TerrainTag = serde_json::from_str("\"backcountry\"").expect("valid");
        assert_eq!(tag, TerrainTag::Backcountry);
    }
}
