use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Tuning configuration for one simulation batch.
///
/// Everything the engine could otherwise be tempted to hard-code lives
/// here: the caller decides, the engine only validates. Defaults mirror a
/// 20-team league mid-season (Serie A, matchday 24).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Per-match performance volatility, one uniform factor in
    /// [1 - chaos, 1 + chaos] per side. Valid range [0.0, 0.5].
    pub chaos_factor: f64,
    /// Number of independent season replays in the batch.
    pub trials: u64,
    /// Trial i is seeded with `base_seed + i`, so a batch is reproducible
    /// end to end.
    pub base_seed: u64,
    /// League-wide matches-played denominator for rating derivation.
    /// Changes every matchday; never assume a constant.
    pub matches_played: u32,
    /// League average goals scored by the home side per match.
    pub avg_goals_home: f64,
    /// League average goals scored by the away side per match.
    pub avg_goals_away: f64,
    /// Fixed worker count for parallel dispatch. `None` uses the global
    /// rayon pool.
    pub workers: Option<usize>,
    pub points_win: u32,
    pub points_draw: u32,
    pub points_loss: u32,
    /// How many bottom-table teams go down.
    pub relegation_slots: usize,
    /// Batches smaller than this run sequentially; below it the dispatch
    /// overhead dominates the per-trial work.
    pub parallel_threshold: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            chaos_factor: 0.25,
            trials: 10_000,
            base_seed: 42,
            matches_played: 24,
            avg_goals_home: 1.45,
            avg_goals_away: 1.15,
            workers: None,
            points_win: 3,
            points_draw: 1,
            points_loss: 0,
            relegation_slots: 3,
            parallel_threshold: 100,
        }
    }
}

impl SimConfig {
    /// Checks every caller-facing bound. Violations are fatal to the
    /// request; none of them is ever silently defaulted.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=0.5).contains(&self.chaos_factor) {
            return Err(SimError::ChaosOutOfRange { value: self.chaos_factor });
        }
        if self.trials == 0 {
            return Err(SimError::ZeroTrials);
        }
        if self.matches_played == 0 {
            return Err(SimError::ZeroMatchesPlayed);
        }
        Ok(())
    }
}
