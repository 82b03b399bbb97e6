//! Match-score computation.
//!
//! Weighted sum of three sub-scores, each in [0, 1]:
//! skill 40 / budget 30 / terrain 30, rounded to an integer 0-100.

use common::{BudgetRange, ResortSummary, SkillLevel, TerrainTag, UserPreferences};

/// Slope-share threshold for the groomed terrain indicator.
const GROOMED_MIN_PCT: f64 = 60.0;
/// Advanced-share threshold for powder.
const POWDER_MIN_ADVANCED_PCT: f64 = 20.0;
/// Advanced-share threshold for backcountry.
const BACKCOUNTRY_MIN_ADVANCED_PCT: f64 = 25.0;
/// Snow-park count threshold for park terrain.
const PARK_MIN_COUNT: u32 = 3;

/// Composite 0-100 score for a resort against the preference vector.
pub fn match_score(resort: &ResortSummary, prefs: &UserPreferences) -> u8 {
    let skill = skill_match(resort, prefs.skill_level);
    let budget = budget_match(resort, &prefs.budget);
    let terrain = terrain_match(resort, &prefs.terrain);

    let total = skill * 40.0 + budget * 30.0 + terrain * 30.0;
    total.round().clamp(0.0, 100.0) as u8
}

/// How well the slope difficulty mix fits a skill level. Doubles the share
/// of the preferred difficulty and credits adjacent ones; percentages
/// summing to <=100 keep this in [0, 1], but clamp anyway since upstream
/// data is not validated.
pub fn skill_match(resort: &ResortSummary, level: SkillLevel) -> f64 {
    let b = resort.beginner_percentage;
    let i = resort.intermediate_percentage;
    let a = resort.advanced_percentage;

    let raw = match level {
        SkillLevel::Beginner => (b * 2.0 + i) / 200.0,
        SkillLevel::Intermediate => (i * 2.0 + b + a) / 300.0,
        SkillLevel::Advanced => (a * 2.0 + i) / 200.0,
    };
    raw.clamp(0.0, 1.0)
}

/// Day-pass price against the budget range. At or under the minimum scores
/// 0.8 (suspiciously cheap), over the maximum scores 0, up to the midpoint
/// scores 1.0, then linear decay from the midpoint down to 0 at the
/// maximum. The upper bound is exclusive: a price exactly at `max` gets
/// the decay value, not the over-budget zero.
pub fn budget_match(resort: &ResortSummary, budget: &BudgetRange) -> f64 {
    let price = resort.adult_day_pass;

    if price <= budget.min {
        return 0.8;
    }
    if price > budget.max {
        return 0.0;
    }

    let midpoint = (budget.min + budget.max) / 2.0;
    if price <= midpoint {
        return 1.0;
    }

    1.0 - (price - midpoint) / (budget.max - midpoint)
}

/// Average of per-tag indicators over the selected terrain tags: 1.0 when
/// the resort clears the tag's threshold, 0.5 otherwise (never 0; an
/// unmatched preference dampens rather than disqualifies). No selected tags
/// contributes the same neutral 0.5.
pub fn terrain_match(resort: &ResortSummary, tags: &[TerrainTag]) -> f64 {
    if tags.is_empty() {
        return 0.5;
    }

    let total: f64 = tags
        .iter()
        .map(|tag| {
            let met = match tag {
                TerrainTag::Groomed => {
                    resort.beginner_percentage + resort.intermediate_percentage > GROOMED_MIN_PCT
                }
                TerrainTag::Powder => resort.advanced_percentage > POWDER_MIN_ADVANCED_PCT,
                TerrainTag::Park => resort.snow_parks >= PARK_MIN_COUNT,
                TerrainTag::Backcountry => {
                    resort.advanced_percentage > BACKCOUNTRY_MIN_ADVANCED_PCT
                }
            };
            if met {
                1.0
            } else {
                0.5
            }
        })
        .sum();

    total / tags.len() as f64
}
