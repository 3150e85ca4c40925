//! The MILP squad optimiser.
//!
//! One sequential pipeline per invocation: validate the request, build the
//! variable/constraint system, hand it to the solver backend, and convert the
//! assignment back into a structured multi-gameweek plan. No shared mutable
//! state — independent runs (parameter sweeps) can execute in parallel on
//! separate model instances.

mod builder;
mod extract;
mod solver;

pub use builder::ObjectiveWeights;
pub use extract::{PeriodReport, PlanOutcome, SelectionRow, TransferDelta};
pub use solver::{SolveStatus, SolverOptions};

use crate::domain::{SquadRules, SquadSnapshot};
use crate::error::OptimiserError;
use crate::projections::ProjectionTable;

/// Solve for the optimal squad plan over the table's horizon.
///
/// Configuration and data errors are detected here, before any model is
/// constructed. Infeasibility and solver failures propagate unmodified.
pub fn optimise(
    table: &ProjectionTable,
    rules: &SquadRules,
    weights: &ObjectiveWeights,
    continuity: Option<&SquadSnapshot>,
    options: &SolverOptions,
) -> Result<PlanOutcome, OptimiserError> {
    validate_request(table, rules, weights, continuity)?;
    let built = builder::build_model(table, rules, weights, continuity)?;
    let (status, solution, index, objective) = solver::solve_model(built, options)?;
    extract::extract_outcome(&solution, &index, table, rules, status, objective)
}

fn validate_request(
    table: &ProjectionTable,
    rules: &SquadRules,
    weights: &ObjectiveWeights,
    continuity: Option<&SquadSnapshot>,
) -> Result<(), OptimiserError> {
    let invalid = |msg: String| Err(OptimiserError::InvalidConfiguration(msg));

    if !(0.0..=1.0).contains(&weights.bench_weight) {
        return invalid(format!("bench_weight {} outside [0, 1]", weights.bench_weight));
    }
    if !(0.0..=1.0).contains(&weights.gkp_bench_weight) {
        return invalid(format!("gkp_bench_weight {} outside [0, 1]", weights.gkp_bench_weight));
    }
    if !(weights.time_decay > 0.0 && weights.time_decay <= 1.0) {
        return invalid(format!("time_decay {} outside (0, 1]", weights.time_decay));
    }
    if rules.starting_size + rules.bench_size != rules.quotas.total() {
        return invalid(format!(
            "position quotas sum to {}, squad holds {}",
            rules.quotas.total(),
            rules.starting_size + rules.bench_size
        ));
    }

    if let Some(snapshot) = continuity {
        if table.start() <= 1 {
            return invalid(
                "continuity requested at the opening gameweek, but no prior squad can exist"
                    .into(),
            );
        }
        if snapshot.gameweek != table.start() - 1 {
            return invalid(format!(
                "snapshot is for gameweek {}, expected {} (immediately before the horizon)",
                snapshot.gameweek,
                table.start() - 1
            ));
        }
        let starting = snapshot.starting_ids().len();
        let bench = snapshot.bench_ids().len();
        if starting != rules.starting_size || bench != rules.bench_size {
            return invalid(format!(
                "snapshot holds {starting} starters and {bench} bench players, expected {} and {}",
                rules.starting_size, rules.bench_size
            ));
        }
        let captains = snapshot.entries.iter().filter(|e| e.is_captain).count();
        let vices = snapshot.entries.iter().filter(|e| e.is_vice_captain).count();
        if captains != 1 || vices != 1 {
            return invalid(format!(
                "snapshot names {captains} captains and {vices} vice-captains, expected one each"
            ));
        }
        if snapshot.captain() == snapshot.vice_captain() {
            return invalid("snapshot captain and vice-captain are the same player".into());
        }
    }

    Ok(())
}
