//! Parameter sweep — independent optimiser runs over a weight grid, in parallel.
//!
//! Each combination gets its own projection table and model instance; the
//! shared player pool is read-only, so Rayon workers never contend.

use crate::config::PlannerConfig;
use crate::planner::{run_plan, RunError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use squadlab_core::domain::Gameweek;
use squadlab_core::projections::ForecastPlayer;

/// Grid of objective-weight combinations to evaluate.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    pub bench_weights: Vec<f64>,
    pub time_decays: Vec<f64>,
}

impl SweepGrid {
    /// A small default grid around the standard weights.
    pub fn default_grid() -> Self {
        Self { bench_weights: vec![0.3, 0.5, 0.7], time_decays: vec![0.85, 1.0] }
    }

    pub fn size(&self) -> usize {
        self.bench_weights.len() * self.time_decays.len()
    }

    fn combinations(&self) -> Vec<(f64, f64)> {
        let mut combos = Vec::with_capacity(self.size());
        for &bench_weight in &self.bench_weights {
            for &time_decay in &self.time_decays {
                combos.push((bench_weight, time_decay));
            }
        }
        combos
    }
}

/// One sweep result row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRow {
    pub bench_weight: f64,
    pub time_decay: f64,
    pub objective: f64,
}

/// Run the grid, returning rows sorted by objective descending.
pub fn sweep_weights(
    config: &PlannerConfig,
    players: &[ForecastPlayer],
    start: Gameweek,
    grid: &SweepGrid,
) -> Result<Vec<SweepRow>, RunError> {
    let mut rows: Vec<SweepRow> = grid
        .combinations()
        .par_iter()
        .map(|&(bench_weight, time_decay)| {
            let mut run_config = config.clone();
            run_config.plan.bench_weight = bench_weight;
            run_config.plan.time_decay = time_decay;
            let outcome = run_plan(&run_config, players, start, None)?;
            Ok(SweepRow { bench_weight, time_decay, objective: outcome.objective })
        })
        .collect::<Result<Vec<_>, RunError>>()?;

    rows.sort_by(|a, b| {
        b.objective.partial_cmp(&a.objective).unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use squadlab_core::synthetic::synthetic_universe;

    #[test]
    fn sweep_covers_the_grid_and_sorts_descending() {
        let mut config = PlannerConfig::default();
        config.plan.horizon = 1;
        let players = synthetic_universe(6, 10, 1, 13);
        let grid = SweepGrid { bench_weights: vec![0.2, 0.8], time_decays: vec![1.0] };

        let rows = sweep_weights(&config, &players, 1, &grid).unwrap();
        assert_eq!(rows.len(), grid.size());
        for pair in rows.windows(2) {
            assert!(pair[0].objective >= pair[1].objective);
        }
    }
}
