//! SquadLab Runner — everything around the optimiser core.
//!
//! This crate builds on `squadlab-core` to provide:
//! - TOML configuration with defaults and validation
//! - Official FPL API client (player pool, historic picks)
//! - Forecast CSV loading and API-identity joining
//! - Static name reconciliation
//! - CSV persistence for pools, snapshots, and plans
//! - Plan/backtest orchestration and report rendering
//! - Parallel parameter sweeps

pub mod config;
pub mod forecast;
pub mod fpl_api;
pub mod planner;
pub mod reconcile;
pub mod report;
pub mod store;
pub mod sweep;

pub use config::{ConfigError, PlannerConfig};
pub use forecast::{join_api_identities, load_forecast_csv, ForecastError};
pub use fpl_api::{ApiPlayerRow, DataError, FplClient};
pub use planner::{planning_rows_from_api, run_backtest, run_plan, RunError};
pub use report::render_outcome;
pub use store::{
    manifest_path, plan_path, players_path, read_manifest_json, read_players_csv,
    read_snapshot_csv, snapshot_path, write_manifest_json, write_plan_csv, write_players_csv,
    write_snapshot_csv, PlanManifest, StoreError,
};
pub use sweep::{sweep_weights, SweepGrid, SweepRow};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<PlannerConfig>();
        assert_sync::<PlannerConfig>();
    }

    #[test]
    fn sweep_row_is_send_sync() {
        assert_send::<SweepRow>();
        assert_sync::<SweepRow>();
    }

    #[test]
    fn run_error_is_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
