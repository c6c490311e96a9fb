//! Single-match outcome generation.
//!
//! Goals are independent Poisson draws whose means combine the two teams'
//! strength ratings, the league scoring baselines, and one bounded uniform
//! noise factor per side (the chaos factor). The mean computation is a
//! separate pure function from the sampling so tests can pin the exact
//! Poisson means without touching randomness.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};

use crate::engine::config::SimConfig;
use crate::models::TeamRating;

/// Match-level tunables, extracted from [`SimConfig`] once per batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    pub chaos_factor: f64,
    pub avg_goals_home: f64,
    pub avg_goals_away: f64,
}

impl MatchParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            chaos_factor: config.chaos_factor,
            avg_goals_home: config.avg_goals_home,
            avg_goals_away: config.avg_goals_away,
        }
    }
}

/// Expected goal means for one fixture, given per-side noise factors.
///
/// Home mean = home attack x away defense x home baseline x home noise,
/// and symmetrically for the away side.
pub fn expected_goals(
    home: &TeamRating,
    away: &TeamRating,
    params: &MatchParams,
    home_noise: f64,
    away_noise: f64,
) -> (f64, f64) {
    let home_mean = home.attack * away.defense * params.avg_goals_home * home_noise;
    let away_mean = away.attack * home.defense * params.avg_goals_away * away_noise;
    (home_mean, away_mean)
}

/// Simulates one fixture: draws the two noise factors and the two goal
/// counts from `rng`, which must be the owning trial's private stream.
pub fn simulate_score<R: Rng>(
    home: &TeamRating,
    away: &TeamRating,
    params: &MatchParams,
    rng: &mut R,
) -> (u32, u32) {
    let c = params.chaos_factor;
    let home_noise = rng.gen_range(1.0 - c..=1.0 + c);
    let away_noise = rng.gen_range(1.0 - c..=1.0 + c);

    let (home_mean, away_mean) = expected_goals(home, away, params, home_noise, away_noise);
    (sample_goals(home_mean, rng), sample_goals(away_mean, rng))
}

/// One Poisson draw. A non-positive mean is the distribution's degenerate
/// limit and yields zero goals (a team with zero goals-for has attack 0).
fn sample_goals<R: Rng>(mean: f64, rng: &mut R) -> u32 {
    if mean <= 0.0 {
        return 0;
    }
    match Poisson::new(mean) {
        Ok(dist) => {
            let draw: f64 = dist.sample(rng);
            draw as u32
        }
        // Unreachable for positive finite means; zero is the safe floor.
        Err(_) => 0,
    }
}
