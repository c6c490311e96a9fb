//! # relsim_core - Monte Carlo Relegation Probability Engine
//!
//! This library estimates end-of-season relegation probabilities for a
//! football league by replaying the remaining fixtures many times with
//! randomized match outcomes and tallying how often each team finishes in
//! a relegation slot.
//!
//! ## Features
//! - 100% deterministic batches (same inputs + same base seed = same result)
//! - Poisson match scoring from attack/defense strength ratings
//! - Optional recent-form reweighting of team strength
//! - Embarrassingly parallel trial dispatch via rayon
//! - Cooperative cancellation with clearly labeled partial aggregates
//!
//! The crate is a pure computation over in-memory structures: no fetching,
//! no formatting, no persistence. Data providers and result consumers are
//! external collaborators exchanging the plain types in [`models`].

pub mod engine;
pub mod error;
pub mod models;

pub use engine::config::SimConfig;
pub use engine::match_sim::{expected_goals, simulate_score, MatchParams};
pub use engine::monte_carlo::{run_simulation, run_simulation_with_cancel, CancelFlag};
pub use engine::ratings::compute_ratings;
pub use engine::season::SeasonSimulator;
pub use error::{Result, SimError};
pub use models::{
    AggregateResult, Fixture, FormRecord, SimStandingsRow, TeamRating, TeamSeasonStats,
    TrialResult,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
