//! Team strength rating derivation.
//!
//! Attack and defense coefficients are simple ratios against the league
//! average, centered on 1.0, optionally reweighted by recent form.
//! Deterministic: consumes no randomness, so a batch computes ratings once
//! and shares them read-only across every trial.

use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::models::{FormRecord, TeamRating, TeamSeasonStats};

/// Season-long share of the form-adjusted rating.
const FORM_SEASON_WEIGHT: f64 = 0.7;
/// Recent-form share of the form-adjusted rating.
const FORM_RECENT_WEIGHT: f64 = 0.3;

/// Derives per-team attack/defense coefficients from season goal
/// statistics, optionally blended with last-5-match form.
///
/// Attack = (team GF per match) / (league-average GF per match), and the
/// same for defense over goals against. With a form record the rating pair
/// is scaled by `0.7 + 0.3 * (recent_ppg / season_ppg)`: good recent form
/// raises the attack coefficient and lowers the defense coefficient
/// (defense multiplies the opponent's expected goals, so lower is
/// stronger). Teams with zero season points keep their raw ratios; scaling
/// by recent form would divide by zero there.
pub fn compute_ratings(
    teams: &HashMap<String, TeamSeasonStats>,
    form: Option<&HashMap<String, FormRecord>>,
    matches_played: u32,
) -> Result<HashMap<String, TeamRating>> {
    if teams.is_empty() {
        return Err(SimError::EmptyLeague);
    }
    if matches_played == 0 {
        return Err(SimError::ZeroMatchesPlayed);
    }

    let mp = f64::from(matches_played);
    let team_count = teams.len() as f64;

    // Integer totals first: the mean must not depend on map iteration
    // order, and f64 summation is not associative.
    let total_gf: u64 = teams.values().map(|t| u64::from(t.goals_for)).sum();
    let total_ga: u64 = teams.values().map(|t| u64::from(t.goals_against)).sum();
    let league_avg_gf = total_gf as f64 / team_count;
    let league_avg_ga = total_ga as f64 / team_count;

    let mut ratings = HashMap::with_capacity(teams.len());
    for (name, stats) in teams {
        // A scoreless league carries no signal on that axis; everyone is
        // average rather than 0/0.
        let mut attack = if league_avg_gf > 0.0 {
            (stats.goals_for as f64 / mp) / (league_avg_gf / mp)
        } else {
            1.0
        };
        let mut defense = if league_avg_ga > 0.0 {
            (stats.goals_against as f64 / mp) / (league_avg_ga / mp)
        } else {
            1.0
        };

        if let Some(record) = form.and_then(|f| f.get(name)) {
            let season_ppg = stats.points as f64 / mp;
            if season_ppg > 0.0 {
                let multiplier = FORM_SEASON_WEIGHT
                    + FORM_RECENT_WEIGHT * (record.points_per_game() / season_ppg);
                attack *= multiplier;
                defense /= multiplier;
            }
        }

        ratings.insert(name.clone(), TeamRating::new(attack, defense));
    }

    Ok(ratings)
}
