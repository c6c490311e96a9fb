use serde::{Deserialize, Serialize};

/// Season-to-date record for one team over a known number of played
/// matches. The matches-played denominator lives in the simulation config,
/// not here, because it is league-wide and changes weekly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSeasonStats {
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamSeasonStats {
    pub fn new(points: u32, goals_for: u32, goals_against: u32) -> Self {
        Self { points, goals_for, goals_against }
    }

    /// Signed goal difference (GF - GA), the standings baseline per trial.
    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }
}

/// Points earned in each of the last five played matches, oldest first.
/// Each entry is 0, 1 or 3; the provider validates this before handing
/// the record over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub last_five: [u8; 5],
}

impl FormRecord {
    pub fn new(last_five: [u8; 5]) -> Self {
        Self { last_five }
    }

    pub fn points_sum(&self) -> u32 {
        self.last_five.iter().map(|&p| u32::from(p)).sum()
    }

    /// Recent points per game over the five-match window.
    pub fn points_per_game(&self) -> f64 {
        self.points_sum() as f64 / self.last_five.len() as f64
    }
}

/// One unplayed match, home side first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self { home: home.into(), away: away.into() }
    }
}
