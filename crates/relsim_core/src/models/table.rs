use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Running table entry for one team inside a single trial. Initialized by
/// copy from the real standings and mutated match-by-match within that
/// trial only; never shared between trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStandingsRow {
    pub points: u32,
    pub goal_diff: i32,
}

/// Outcome of one fully replayed season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Teams in the relegation slots, worst-placed last.
    pub relegated: Vec<String>,
    /// Final points total per team.
    pub final_points: HashMap<String, u32>,
    /// Points of the lowest-placed team that stayed up.
    pub survival_points: u32,
}

/// Totals accumulated across a whole batch of trials.
///
/// `trials_completed` equals `trials_requested` unless the batch was
/// cancelled mid-flight, in which case the aggregate covers only the
/// trials that finished and [`AggregateResult::is_partial`] reports true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Number of trials in which each team finished in a relegation slot.
    pub relegation_counts: HashMap<String, u64>,
    /// Mean final points per team over the completed trials.
    pub average_points: HashMap<String, f64>,
    /// Mean points of the lowest-placed safe team over the completed trials.
    pub average_survival_points: f64,
    pub trials_requested: u64,
    pub trials_completed: u64,
}

impl AggregateResult {
    /// Relegation probability for one team, in percent. Unknown teams and
    /// empty batches report 0.0.
    pub fn relegation_probability(&self, team: &str) -> f64 {
        if self.trials_completed == 0 {
            return 0.0;
        }
        let count = self.relegation_counts.get(team).copied().unwrap_or(0);
        count as f64 / self.trials_completed as f64 * 100.0
    }

    /// True when the batch stopped before running every requested trial.
    /// Partial aggregates are valid degraded results but must never be
    /// presented as authoritative.
    pub fn is_partial(&self) -> bool {
        self.trials_completed < self.trials_requested
    }
}
