//! Full-season replay for one trial.
//!
//! A [`SeasonSimulator`] is built once per batch from validated inputs and
//! then replayed any number of times, each replay owning a private
//! ChaCha8 stream seeded from its trial seed. Identical seed, identical
//! outcome, byte for byte.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::config::SimConfig;
use crate::engine::match_sim::{simulate_score, MatchParams};
use crate::error::{Result, SimError};
use crate::models::{Fixture, SimStandingsRow, TeamRating, TeamSeasonStats, TrialResult};

/// Dense index over the league. Names are interned in ascending order, so
/// an index comparison doubles as the name-order tertiary tie-break of the
/// final table sort.
#[derive(Debug, Clone)]
pub(crate) struct LeagueIndex {
    names: Vec<String>,
}

impl LeagueIndex {
    fn build(teams: &HashMap<String, TeamSeasonStats>) -> Self {
        let mut names: Vec<String> = teams.keys().cloned().collect();
        names.sort_unstable();
        Self { names }
    }

    fn resolve(&self, name: &str) -> Option<usize> {
        self.names.binary_search_by(|probe| probe.as_str().cmp(name)).ok()
    }

    pub(crate) fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }
}

/// Compact outcome of one trial, in league-index space. The orchestrator
/// aggregates these directly; [`TrialResult`] is the name-keyed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrialOutcome {
    /// Indices of the relegated teams, worst-placed last.
    pub relegated: Vec<usize>,
    /// Final points per team, in league-index order.
    pub points: Vec<u32>,
    /// Points of the lowest-placed team that stayed up.
    pub survival_points: u32,
}

/// Replays the remaining season against shared read-only state.
///
/// Construction resolves every fixture against the league index and fails
/// fast on unknown teams; replays afterwards are infallible and touch no
/// shared mutable state, so a batch can run them from any thread.
#[derive(Debug)]
pub struct SeasonSimulator {
    index: LeagueIndex,
    baseline: Vec<SimStandingsRow>,
    ratings: Vec<TeamRating>,
    fixtures: Vec<(usize, usize)>,
    params: MatchParams,
    points_win: u32,
    points_draw: u32,
    points_loss: u32,
    relegation_slots: usize,
}

impl SeasonSimulator {
    /// Builds the shared per-batch state: interned names, baseline table
    /// copied from the current standings, fixture list resolved to
    /// indices, ratings in index order.
    pub fn new(
        teams: &HashMap<String, TeamSeasonStats>,
        ratings: &HashMap<String, TeamRating>,
        fixtures: &[Fixture],
        config: &SimConfig,
    ) -> Result<Self> {
        config.validate()?;
        if teams.is_empty() {
            return Err(SimError::EmptyLeague);
        }
        if config.relegation_slots >= teams.len() {
            return Err(SimError::TooManyRelegationSlots {
                slots: config.relegation_slots,
                teams: teams.len(),
            });
        }

        let index = LeagueIndex::build(teams);

        let mut baseline = Vec::with_capacity(index.len());
        let mut rating_table = Vec::with_capacity(index.len());
        for name in index.names() {
            let stats = &teams[name];
            baseline.push(SimStandingsRow {
                points: stats.points,
                goal_diff: stats.goal_difference(),
            });
            let rating = ratings
                .get(name)
                .copied()
                .ok_or_else(|| SimError::MissingRating { team: name.clone() })?;
            rating_table.push(rating);
        }

        let mut resolved = Vec::with_capacity(fixtures.len());
        for (i, fixture) in fixtures.iter().enumerate() {
            let home = index.resolve(&fixture.home).ok_or_else(|| SimError::UnknownTeam {
                team: fixture.home.clone(),
                index: i,
            })?;
            let away = index.resolve(&fixture.away).ok_or_else(|| SimError::UnknownTeam {
                team: fixture.away.clone(),
                index: i,
            })?;
            resolved.push((home, away));
        }

        Ok(Self {
            index,
            baseline,
            ratings: rating_table,
            fixtures: resolved,
            params: MatchParams::from_config(config),
            points_win: config.points_win,
            points_draw: config.points_draw,
            points_loss: config.points_loss,
            relegation_slots: config.relegation_slots,
        })
    }

    pub(crate) fn league(&self) -> &LeagueIndex {
        &self.index
    }

    /// One trial: private stream from the seed, fresh copy of the
    /// baseline table, every fixture applied in listed order, final sort
    /// by (points desc, goal-diff desc, name asc).
    pub(crate) fn run_trial(&self, seed: u64) -> TrialOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut table = self.baseline.clone();

        for &(home, away) in &self.fixtures {
            let (home_goals, away_goals) =
                simulate_score(&self.ratings[home], &self.ratings[away], &self.params, &mut rng);

            if home_goals > away_goals {
                table[home].points += self.points_win;
                table[away].points += self.points_loss;
            } else if away_goals > home_goals {
                table[away].points += self.points_win;
                table[home].points += self.points_loss;
            } else {
                table[home].points += self.points_draw;
                table[away].points += self.points_draw;
            }

            let margin = home_goals as i32 - away_goals as i32;
            table[home].goal_diff += margin;
            table[away].goal_diff -= margin;
        }

        let mut order: Vec<usize> = (0..table.len()).collect();
        order.sort_unstable_by(|&a, &b| {
            table[b]
                .points
                .cmp(&table[a].points)
                .then(table[b].goal_diff.cmp(&table[a].goal_diff))
                .then(a.cmp(&b))
        });

        let cut = order.len() - self.relegation_slots;
        TrialOutcome {
            relegated: order[cut..].to_vec(),
            points: table.iter().map(|row| row.points).collect(),
            survival_points: table[order[cut - 1]].points,
        }
    }

    /// One trial with names attached, for callers outside the batch loop.
    pub fn replay_season(&self, seed: u64) -> TrialResult {
        let outcome = self.run_trial(seed);
        TrialResult {
            relegated: outcome
                .relegated
                .iter()
                .map(|&idx| self.index.name(idx).to_string())
                .collect(),
            final_points: outcome
                .points
                .iter()
                .enumerate()
                .map(|(idx, &pts)| (self.index.name(idx).to_string(), pts))
                .collect(),
            survival_points: outcome.survival_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ratings::compute_ratings;

    fn league(entries: &[(&str, u32, u32, u32)]) -> HashMap<String, TeamSeasonStats> {
        entries
            .iter()
            .map(|&(name, pts, gf, ga)| {
                (name.to_string(), TeamSeasonStats::new(pts, gf, ga))
            })
            .collect()
    }

    fn simulator(
        teams: &HashMap<String, TeamSeasonStats>,
        fixtures: &[Fixture],
        config: &SimConfig,
    ) -> SeasonSimulator {
        let ratings = compute_ratings(teams, None, config.matches_played).unwrap();
        SeasonSimulator::new(teams, &ratings, fixtures, config).unwrap()
    }

    #[test]
    fn identical_seed_identical_outcome() {
        let teams = league(&[
            ("Genoa", 23, 29, 37),
            ("Lecce", 21, 15, 31),
            ("Pisa", 15, 19, 40),
            ("Verona", 15, 18, 41),
        ]);
        let fixtures = vec![
            Fixture::new("Genoa", "Lecce"),
            Fixture::new("Pisa", "Verona"),
            Fixture::new("Lecce", "Pisa"),
            Fixture::new("Verona", "Genoa"),
        ];
        let config = SimConfig { relegation_slots: 2, ..SimConfig::default() };
        let sim = simulator(&teams, &fixtures, &config);

        for seed in [0u64, 1, 42, u64::MAX] {
            assert_eq!(sim.replay_season(seed), sim.replay_season(seed));
        }
    }

    #[test]
    fn zero_baselines_make_every_match_a_draw() {
        // avg goals 0 forces 0-0 everywhere, so the replay is exact:
        // every team gains one point per fixture played.
        let teams = league(&[
            ("Cagliari", 28, 28, 33),
            ("Parma", 26, 16, 30),
            ("Torino", 27, 24, 42),
        ]);
        let fixtures = vec![
            Fixture::new("Cagliari", "Parma"),
            Fixture::new("Parma", "Torino"),
            Fixture::new("Torino", "Cagliari"),
        ];
        let config = SimConfig {
            avg_goals_home: 0.0,
            avg_goals_away: 0.0,
            relegation_slots: 1,
            ..SimConfig::default()
        };
        let sim = simulator(&teams, &fixtures, &config);
        let result = sim.replay_season(9);

        assert_eq!(result.final_points["Cagliari"], 30);
        assert_eq!(result.final_points["Torino"], 29);
        assert_eq!(result.final_points["Parma"], 28);
        assert_eq!(result.relegated, vec!["Parma".to_string()]);
        assert_eq!(result.survival_points, 29);
    }

    #[test]
    fn points_and_goal_difference_are_conserved() {
        let teams = league(&[
            ("Bologna", 30, 32, 31),
            ("Cagliari", 28, 28, 33),
            ("Sassuolo", 29, 27, 34),
            ("Udinese", 32, 27, 36),
        ]);
        let fixtures = vec![
            Fixture::new("Bologna", "Cagliari"),
            Fixture::new("Sassuolo", "Udinese"),
            Fixture::new("Cagliari", "Sassuolo"),
            Fixture::new("Udinese", "Bologna"),
            Fixture::new("Bologna", "Sassuolo"),
        ];
        let config = SimConfig { relegation_slots: 1, ..SimConfig::default() };
        let sim = simulator(&teams, &fixtures, &config);

        let initial_points: u32 = teams.values().map(|t| t.points).sum();
        let initial_gd: i32 = teams.values().map(|t| t.goal_difference()).sum();

        for seed in 0..200 {
            let result = sim.replay_season(seed);
            let total_points: u32 = result.final_points.values().sum();
            let awarded = total_points - initial_points;
            // Each fixture awards 3 (decisive) or 2 (draw) points.
            assert!(awarded >= 2 * fixtures.len() as u32);
            assert!(awarded <= 3 * fixtures.len() as u32);

            // Goal margins cancel pairwise, so league-wide goal
            // difference never moves. Replay the same stream against a
            // raw table to observe the rows directly.
            let mut table = sim.baseline.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for &(home, away) in &sim.fixtures {
                let (hg, ag) = simulate_score(
                    &sim.ratings[home],
                    &sim.ratings[away],
                    &sim.params,
                    &mut rng,
                );
                let margin = hg as i32 - ag as i32;
                table[home].goal_diff += margin;
                table[away].goal_diff -= margin;
            }
            let final_gd: i32 = table.iter().map(|row| row.goal_diff).sum();
            assert_eq!(final_gd, initial_gd);
        }
    }

    #[test]
    fn ties_break_by_team_name_ascending() {
        // Identical stats and no remaining fixtures: the table is decided
        // purely by the tertiary key.
        let teams = league(&[
            ("Milan", 30, 30, 30),
            ("Atalanta", 30, 30, 30),
            ("Roma", 30, 30, 30),
            ("Inter", 30, 30, 30),
        ]);
        let config = SimConfig { relegation_slots: 2, ..SimConfig::default() };
        let sim = simulator(&teams, &[], &config);
        let result = sim.replay_season(1);

        // Name-ascending order: Atalanta, Inter, Milan, Roma. Bottom two
        // of that order go down.
        assert_eq!(result.relegated, vec!["Milan".to_string(), "Roma".to_string()]);
        assert_eq!(result.survival_points, 30);
    }

    #[test]
    fn relegates_exactly_the_bottom_slots() {
        let teams = league(&[
            ("Inter", 58, 57, 19),
            ("Milan", 50, 38, 17),
            ("Lecce", 21, 15, 31),
            ("Pisa", 15, 19, 40),
            ("Verona", 15, 18, 41),
        ]);
        let fixtures = vec![Fixture::new("Inter", "Verona"), Fixture::new("Milan", "Pisa")];
        let config = SimConfig::default(); // 3 slots
        let sim = simulator(&teams, &fixtures, &config);

        for seed in 0..50 {
            let result = sim.replay_season(seed);
            assert_eq!(result.relegated.len(), 3);
            assert_eq!(result.final_points.len(), 5);
        }
    }

    #[test]
    fn unknown_fixture_team_is_rejected_with_index() {
        let teams = league(&[("Como", 41, 37, 16), ("Roma", 46, 29, 14)]);
        let ratings = compute_ratings(&teams, None, 24).unwrap();
        let fixtures =
            vec![Fixture::new("Como", "Roma"), Fixture::new("Como", "Spezia")];
        let config = SimConfig { relegation_slots: 1, ..SimConfig::default() };

        let err = SeasonSimulator::new(&teams, &ratings, &fixtures, &config).unwrap_err();
        assert_eq!(err, SimError::UnknownTeam { team: "Spezia".to_string(), index: 1 });
    }

    #[test]
    fn missing_rating_is_rejected() {
        let teams = league(&[("Como", 41, 37, 16), ("Roma", 46, 29, 14)]);
        let mut ratings = compute_ratings(&teams, None, 24).unwrap();
        ratings.remove("Roma");
        let config = SimConfig { relegation_slots: 1, ..SimConfig::default() };

        let err = SeasonSimulator::new(&teams, &ratings, &[], &config).unwrap_err();
        assert_eq!(err, SimError::MissingRating { team: "Roma".to_string() });
    }

    #[test]
    fn too_many_relegation_slots_is_rejected() {
        let teams = league(&[("Como", 41, 37, 16), ("Roma", 46, 29, 14)]);
        let ratings = compute_ratings(&teams, None, 24).unwrap();
        let config = SimConfig { relegation_slots: 2, ..SimConfig::default() };

        let err = SeasonSimulator::new(&teams, &ratings, &[], &config).unwrap_err();
        assert_eq!(err, SimError::TooManyRelegationSlots { slots: 2, teams: 2 });
    }
}
