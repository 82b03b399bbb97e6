//! Recommendation scoring and ranking.
//!
//! Pure functions only: no I/O, fully deterministic for a given resort
//! and preference vector.

pub mod scorer;

use serde::{Deserialize, Serialize};

use common::{EnrichedResort, UserPreferences};

pub use scorer::{budget_match, match_score, skill_match, terrain_match};

/// An enriched resort with its match score for one preference vector.
/// Derived per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResort {
    #[serde(flatten)]
    pub resort: EnrichedResort,
    pub score: u8,
}

/// Score and sort resorts, best match first. The sort is stable, so equal
/// scores keep their original fetch order.
pub fn rank(resorts: Vec<EnrichedResort>, prefs: &UserPreferences) -> Vec<ScoredResort> {
    let mut scored: Vec<ScoredResort> = resorts
        .into_iter()
        .map(|resort| {
            let score = match_score(&resort.summary, prefs);
            ScoredResort { resort, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{BudgetRange, ResortSummary, SkillLevel};

    fn resort(id: &str, beginner: f64, price: f64) -> EnrichedResort {
        EnrichedResort {
            summary: ResortSummary {
                resort_id: id.into(),
                name: id.into(),
                country_code: "AT".into(),
                region: String::new(),
                latitude: 0.0,
                longitude: 0.0,
                beginner_percentage: beginner,
                intermediate_percentage: 100.0 - beginner,
                advanced_percentage: 0.0,
                total_slopes: 30,
                snow_parks: 1,
                ski_lifts: 10,
                night_skiing: false,
                adult_day_pass: price,
                currency: "EUR".into(),
                season_start: String::new(),
                season_end: String::new(),
                image_url: None,
            },
            weather: None,
            weather_agency: None,
        }
    }

    fn prefs() -> UserPreferences {
        UserPreferences {
            skill_level: SkillLevel::Beginner,
            terrain: Vec::new(),
            budget: BudgetRange { min: 0.0, max: 100.0 },
            country: None,
        }
    }

    #[test]
    fn test_rank_sorts_descending() {
        let ranked = rank(
            vec![resort("weak", 10.0, 95.0), resort("strong", 80.0, 50.0)],
            &prefs(),
        );
        assert_eq!(ranked[0].resort.summary.resort_id, "strong");
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let ranked = rank(
            vec![
                resort("first", 50.0, 40.0),
                resort("second", 50.0, 40.0),
                resort("third", 50.0, 40.0),
            ],
            &prefs(),
        );
        let order: Vec<&str> = ranked
            .iter()
            .map(|s| s.resort.summary.resort_id.as_str())
            .collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }
}
