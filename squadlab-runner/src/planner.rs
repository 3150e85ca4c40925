//! Plan orchestration — assemble a projection table, run the optimiser, and
//! hand back the outcome. One synchronous pipeline per invocation; inputs are
//! read-only and safely shared across parallel sweep runs.

use crate::config::{ConfigError, PlannerConfig};
use crate::forecast::ForecastError;
use crate::fpl_api::{ApiPlayerRow, DataError};
use crate::store::StoreError;
use squadlab_core::domain::{Gameweek, PlayerPeriod, SquadSnapshot};
use squadlab_core::error::OptimiserError;
use squadlab_core::optimiser::{optimise, PlanOutcome};
use squadlab_core::projections::{ForecastPlayer, ProjectionTable};
use thiserror::Error;

/// Errors from the runner pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("forecast error: {0}")]
    Forecast(#[from] ForecastError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Optimiser(#[from] OptimiserError),
}

/// Planning mode: a forecast snapshot replicated over the horizon, with costs
/// optionally evolved by the price model.
pub fn run_plan(
    config: &PlannerConfig,
    players: &[ForecastPlayer],
    start: Gameweek,
    snapshot: Option<&SquadSnapshot>,
) -> Result<PlanOutcome, RunError> {
    config.validate()?;
    let continuity = continuity_snapshot(config, snapshot)?;
    let table = ProjectionTable::from_forecast(
        players,
        start,
        config.plan.horizon,
        config.price_params().as_ref(),
    )?;
    let outcome = optimise(
        &table,
        &config.squad_rules(),
        &config.weights(),
        continuity,
        &config.solver_options(),
    )?;
    Ok(outcome)
}

/// Actuals/backtest mode: genuinely distinct per-gameweek rows with observed
/// costs taken verbatim; the price model is bypassed.
pub fn run_backtest(
    config: &PlannerConfig,
    observed: Vec<(Gameweek, PlayerPeriod)>,
    start: Gameweek,
    snapshot: Option<&SquadSnapshot>,
) -> Result<PlanOutcome, RunError> {
    config.validate()?;
    let continuity = continuity_snapshot(config, snapshot)?;
    let table = ProjectionTable::from_observed(observed, start, config.plan.horizon)?;
    let outcome = optimise(
        &table,
        &config.squad_rules(),
        &config.weights(),
        continuity,
        &config.solver_options(),
    )?;
    Ok(outcome)
}

/// Build planning rows from official-API data alone: the single `ep_next`
/// projection is replicated across the horizon (the forecast file is the
/// richer source when available).
pub fn planning_rows_from_api(api_rows: &[ApiPlayerRow], horizon: u8) -> Vec<ForecastPlayer> {
    api_rows
        .iter()
        .map(|row| ForecastPlayer {
            player_id: row.player_id,
            name: row.name.clone(),
            position: row.position,
            club: row.club.clone(),
            expected_minutes: row.expected_minutes,
            cost: row.cost,
            expected_points: vec![row.expected_points; horizon as usize],
        })
        .collect()
}

fn continuity_snapshot<'a>(
    config: &PlannerConfig,
    snapshot: Option<&'a SquadSnapshot>,
) -> Result<Option<&'a SquadSnapshot>, RunError> {
    if !config.plan.enforce_continuity {
        return Ok(None);
    }
    match snapshot {
        Some(s) => Ok(Some(s)),
        None => Err(RunError::Config(ConfigError::Invalid(
            "enforce_continuity is set but no prior-squad snapshot was supplied".into(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_rows_replicate_points_across_horizon() {
        use squadlab_core::domain::{PlayerId, Position};
        let rows = vec![ApiPlayerRow {
            player_id: PlayerId(1),
            name: "Saka".into(),
            position: Position::Mid,
            club: "ARS".into(),
            expected_points: 6.0,
            expected_minutes: 85.0,
            cost: 8.7,
            prob_injury: 0.0,
        }];
        let players = planning_rows_from_api(&rows, 3);
        assert_eq!(players[0].expected_points, vec![6.0, 6.0, 6.0]);
    }

    #[test]
    fn continuity_without_snapshot_is_a_config_error() {
        let mut config = PlannerConfig::default();
        config.plan.enforce_continuity = true;
        let err = run_plan(&config, &[], 2, None).unwrap_err();
        assert!(matches!(err, RunError::Config(ConfigError::Invalid(_))));
    }
}
