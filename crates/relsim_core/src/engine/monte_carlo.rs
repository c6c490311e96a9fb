//! Monte Carlo batch orchestration.
//!
//! Trials are embarrassingly parallel: each one owns a private seeded
//! stream and touches only shared read-only state, so the batch needs no
//! locks and no inter-trial communication. Aggregation is an integer sum,
//! which keeps the result independent of completion order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::engine::config::SimConfig;
use crate::engine::ratings::compute_ratings;
use crate::engine::season::{LeagueIndex, SeasonSimulator, TrialOutcome};
use crate::error::{Result, SimError};
use crate::models::{AggregateResult, Fixture, FormRecord, TeamSeasonStats};

/// Cooperative cancellation for an in-flight batch. Cancelling stops new
/// trials from starting; trials already past the check finish and count.
/// There is no per-trial state to undo, so cancellation has no side
/// effects beyond the smaller trial count, which the aggregate labels via
/// [`AggregateResult::is_partial`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Order-independent fold state for a batch. Sums stay in integer space
/// until the final division, so folding in any order produces bit-equal
/// aggregates.
#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
    relegation_counts: Vec<u64>,
    points_totals: Vec<u64>,
    survival_total: u64,
    trials: u64,
}

impl Accumulator {
    pub(crate) fn new(team_count: usize) -> Self {
        Self {
            relegation_counts: vec![0; team_count],
            points_totals: vec![0; team_count],
            survival_total: 0,
            trials: 0,
        }
    }

    pub(crate) fn fold(&mut self, outcome: &TrialOutcome) {
        for &idx in &outcome.relegated {
            self.relegation_counts[idx] += 1;
        }
        for (idx, &points) in outcome.points.iter().enumerate() {
            self.points_totals[idx] += u64::from(points);
        }
        self.survival_total += u64::from(outcome.survival_points);
        self.trials += 1;
    }

    pub(crate) fn finish(self, league: &LeagueIndex, trials_requested: u64) -> AggregateResult {
        let completed = self.trials;
        let divisor = if completed == 0 { 1.0 } else { completed as f64 };

        let mut relegation_counts = HashMap::with_capacity(league.len());
        let mut average_points = HashMap::with_capacity(league.len());
        for idx in 0..league.len() {
            let name = league.name(idx).to_string();
            relegation_counts.insert(name.clone(), self.relegation_counts[idx]);
            average_points.insert(name, self.points_totals[idx] as f64 / divisor);
        }

        AggregateResult {
            relegation_counts,
            average_points,
            average_survival_points: self.survival_total as f64 / divisor,
            trials_requested,
            trials_completed: completed,
        }
    }
}

/// Runs the full batch: ratings once, N independent trials, one aggregate.
///
/// Trial i is seeded `base_seed + i`, strictly increasing and never
/// reused, so no two trials share a random stream and the whole batch
/// replays identically for the same inputs.
pub fn run_simulation(
    teams: &HashMap<String, TeamSeasonStats>,
    fixtures: &[Fixture],
    form: Option<&HashMap<String, FormRecord>>,
    config: &SimConfig,
) -> Result<AggregateResult> {
    run_simulation_with_cancel(teams, fixtures, form, config, &CancelFlag::new())
}

/// [`run_simulation`] with a caller-held cancellation flag. A cancelled
/// batch returns the aggregate over the trials that completed, labeled
/// partial. Callers must treat a partial aggregate as a degraded result,
/// not an authoritative one.
pub fn run_simulation_with_cancel(
    teams: &HashMap<String, TeamSeasonStats>,
    fixtures: &[Fixture],
    form: Option<&HashMap<String, FormRecord>>,
    config: &SimConfig,
    cancel: &CancelFlag,
) -> Result<AggregateResult> {
    config.validate()?;
    let ratings = compute_ratings(teams, form, config.matches_played)?;
    let sim = SeasonSimulator::new(teams, &ratings, fixtures, config)?;

    info!(
        "starting batch: {} trials over {} fixtures, {} teams",
        config.trials,
        fixtures.len(),
        teams.len()
    );

    // Small batches run inline: dispatch overhead dominates the
    // per-trial work below the threshold.
    let outcomes = if config.trials >= config.parallel_threshold {
        match config.workers {
            Some(workers) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .map_err(|e| SimError::WorkerPool(e.to_string()))?;
                debug!("dispatching on dedicated pool of {} workers", workers);
                pool.install(|| run_parallel(&sim, config, cancel))
            }
            None => run_parallel(&sim, config, cancel),
        }
    } else {
        run_sequential(&sim, config, cancel)
    };

    let mut acc = Accumulator::new(sim.league().len());
    for outcome in &outcomes {
        acc.fold(outcome);
    }
    let aggregate = acc.finish(sim.league(), config.trials);

    if aggregate.is_partial() {
        warn!(
            "batch cancelled: aggregate covers {} of {} requested trials",
            aggregate.trials_completed, aggregate.trials_requested
        );
    } else {
        debug!("batch complete: {} trials", aggregate.trials_completed);
    }
    Ok(aggregate)
}

fn trial_seed(base: u64, trial_index: u64) -> u64 {
    base.wrapping_add(trial_index)
}

fn run_parallel(sim: &SeasonSimulator, config: &SimConfig, cancel: &CancelFlag) -> Vec<TrialOutcome> {
    (0..config.trials)
        .into_par_iter()
        .filter_map(|i| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(sim.run_trial(trial_seed(config.base_seed, i)))
        })
        .collect()
}

fn run_sequential(
    sim: &SeasonSimulator,
    config: &SimConfig,
    cancel: &CancelFlag,
) -> Vec<TrialOutcome> {
    let mut outcomes = Vec::with_capacity(config.trials as usize);
    for i in 0..config.trials {
        if cancel.is_cancelled() {
            break;
        }
        outcomes.push(sim.run_trial(trial_seed(config.base_seed, i)));
    }
    outcomes
}
