use serde::{Deserialize, Serialize};

/// Team strength coefficients normalized to a league-average baseline of
/// 1.0. The defense coefficient multiplies the *opponent's* expected
/// goals, so a lower value means a stronger defense.
///
/// Ratings are computed once per simulation batch and shared read-only
/// across every trial; nothing in the replay path mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub attack: f64,
    pub defense: f64,
}

impl TeamRating {
    pub fn new(attack: f64, defense: f64) -> Self {
        Self { attack, defense }
    }

    /// The league-average rating on both axes.
    pub fn average() -> Self {
        Self { attack: 1.0, defense: 1.0 }
    }
}
