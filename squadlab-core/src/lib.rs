//! SquadLab Core — the MILP squad-selection engine.
//!
//! This crate contains the whole optimisation pipeline:
//! - Domain types (players, formations, rules, squad snapshots)
//! - Price evolution model (sigmoid, bounded per-gameweek movement)
//! - Projection table unifying planning and actuals modes behind one lookup
//! - Problem builder (decision variables, constraints, objective)
//! - Solver adapter over a pluggable MILP backend
//! - Result extraction with structural validation
//!
//! Data acquisition, name reconciliation, configuration files, persistence,
//! and report rendering live in `squadlab-runner`.

pub mod domain;
pub mod error;
pub mod optimiser;
pub mod pricing;
pub mod projections;
pub mod synthetic;
