//! The simulation engine: ratings, match outcomes, season replay, and
//! Monte Carlo batch orchestration.
//!
//! Data flow: [`ratings::compute_ratings`] once per batch →
//! [`season::SeasonSimulator`] replayed N times, each replay driving
//! [`match_sim::simulate_score`] per fixture → order-independent
//! aggregation in [`monte_carlo`].

pub mod config;
pub mod match_sim;
pub mod monte_carlo;
pub mod ratings;
pub mod season;

pub use config::SimConfig;
pub use match_sim::{expected_goals, simulate_score, MatchParams};
pub use monte_carlo::{run_simulation, run_simulation_with_cancel, CancelFlag};
pub use ratings::compute_ratings;
pub use season::SeasonSimulator;
