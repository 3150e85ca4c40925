//! Solver adapter — hands the assembled model to a MILP backend.
//!
//! The backend is opaque: it either returns an assignment or a failure status.
//! Infeasibility and backend failures surface as distinct errors; the adapter
//! never retries or relaxes constraints (that is a caller-level policy).
//!
//! The default backend is the pure-Rust microlp solver, which solves to
//! optimality. With the `coin_cbc` feature, CBC is used instead and honors the
//! caller-supplied time limit, returning its best incumbent when the limit
//! expires.

use super::builder::{BuiltModel, VarIndex};
use crate::error::OptimiserError;
use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the backend terminated when it produced an assignment.
///
/// Infeasible, unbounded, and backend-failure terminations do not produce an
/// assignment and are reported as [`OptimiserError`] values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Stopped at the time limit with a feasible incumbent (CBC backend only;
    /// the default backend always runs to optimality).
    TimeLimit,
}

/// Options threaded through to the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverOptions {
    /// Wall-clock budget for the solve. `None` means unlimited.
    pub time_limit: Option<Duration>,
}

/// Solve an assembled model, returning the termination status, the variable
/// assignment, the variable index, and the achieved objective value.
#[cfg_attr(not(feature = "coin_cbc"), allow(unused_variables))]
pub(crate) fn solve_model(
    built: BuiltModel,
    options: &SolverOptions,
) -> Result<(SolveStatus, impl Solution, VarIndex, f64), OptimiserError> {
    let BuiltModel { vars, objective, constraints, index } = built;
    let objective_expr = objective.clone();

    let mut model = vars.maximise(objective).using(default_solver);
    #[cfg(feature = "coin_cbc")]
    {
        model.set_parameter("log", "0");
        if let Some(limit) = options.time_limit {
            model.set_parameter("sec", &limit.as_secs().to_string());
        }
    }

    for constraint in constraints {
        model = model.with(constraint);
    }

    match model.solve() {
        Ok(solution) => {
            let achieved = objective_expr.eval_with(&solution);
            Ok((SolveStatus::Optimal, solution, index, achieved))
        }
        Err(ResolutionError::Infeasible) => Err(OptimiserError::InfeasibleModel),
        Err(ResolutionError::Unbounded) => {
            Err(OptimiserError::SolverError("model reported unbounded".into()))
        }
        Err(ResolutionError::Other(msg)) => Err(OptimiserError::SolverError(msg.to_string())),
        Err(ResolutionError::Str(msg)) => Err(OptimiserError::SolverError(msg)),
    }
}
