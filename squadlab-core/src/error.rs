//! Optimiser error taxonomy.
//!
//! Configuration and data errors are raised before the solver is invoked.
//! Infeasibility and solver failures propagate to the caller unmodified — the
//! core never relaxes constraints or retries.

use crate::domain::{Gameweek, PlayerId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimiserError {
    /// The run was configured in a way that cannot describe a valid model
    /// (horizon < 1, continuity at the opening gameweek, malformed snapshot).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A (player, gameweek) combination required by a constraint is missing
    /// from the projection table.
    #[error("missing projection for player {player} at gameweek {gameweek}")]
    InvalidProjectionData { player: PlayerId, gameweek: Gameweek },

    /// The solver proved no feasible squad exists under the given constraints.
    #[error("no feasible squad exists under the given constraints")]
    InfeasibleModel,

    /// The solver failed to return a usable status within resource limits.
    #[error("solver error: {0}")]
    SolverError(String),

    /// The extracted solution violates a structural invariant the builder
    /// should have enforced — a builder/solver-adapter bug, not bad input.
    #[error("internal inconsistency in gameweek {gameweek}: {detail}")]
    InternalInconsistency { gameweek: Gameweek, detail: String },
}
