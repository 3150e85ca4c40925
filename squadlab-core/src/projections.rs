//! Projection table — the per-gameweek data-lookup capability behind the builder.
//!
//! One table type serves both engines: planning mode replicates a single
//! snapshot of players across the horizon (optionally evolving costs through
//! the price model), while actuals mode holds genuinely distinct per-gameweek
//! rows with observed costs taken verbatim. The problem builder only ever sees
//! the table, so constraint construction is written once.
//!
//! A player with no row at some gameweek is simply absent from that gameweek's
//! selection — never treated as zero cost or zero points.

use crate::domain::{Gameweek, PlayerId, PlayerPeriod, Position};
use crate::error::OptimiserError;
use crate::pricing::{next_cost, PriceParams};
use std::collections::{BTreeMap, BTreeSet};

/// Planning-mode input row: one snapshot per player with projected points for
/// each gameweek of the horizon (index 0 = the start gameweek).
#[derive(Debug, Clone)]
pub struct ForecastPlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub club: String,
    pub expected_minutes: f64,
    pub cost: f64,
    pub expected_points: Vec<f64>,
}

/// Immutable per-gameweek projection data for one optimisation run.
#[derive(Debug, Clone)]
pub struct ProjectionTable {
    start: Gameweek,
    horizon: u8,
    rows: BTreeMap<Gameweek, BTreeMap<PlayerId, PlayerPeriod>>,
}

impl ProjectionTable {
    /// Build a planning-mode table from a single-gameweek forecast snapshot.
    ///
    /// Costs at the start gameweek come from the snapshot; later gameweeks
    /// either replicate them (`price: None`) or evolve them through the price
    /// model, with the start-gameweek projection as the fixed baseline.
    pub fn from_forecast(
        players: &[ForecastPlayer],
        start: Gameweek,
        horizon: u8,
        price: Option<&PriceParams>,
    ) -> Result<Self, OptimiserError> {
        validate_range(start, horizon)?;

        for player in players {
            if player.expected_points.len() < horizon as usize {
                return Err(OptimiserError::InvalidProjectionData {
                    player: player.player_id,
                    gameweek: start + player.expected_points.len() as Gameweek,
                });
            }
        }

        let mut rows: BTreeMap<Gameweek, BTreeMap<PlayerId, PlayerPeriod>> = BTreeMap::new();
        for player in players {
            let baseline = player.expected_points[0];
            let mut cost = player.cost;
            for offset in 0..horizon {
                let gameweek = start + offset;
                let points = player.expected_points[offset as usize];
                if offset > 0 {
                    if let Some(params) = price {
                        cost = next_cost(cost, points, baseline, params);
                    }
                }
                let inserted = rows.entry(gameweek).or_default().insert(
                    player.player_id,
                    PlayerPeriod {
                        player_id: player.player_id,
                        name: player.name.clone(),
                        position: player.position,
                        club: player.club.clone(),
                        expected_points: points,
                        expected_minutes: player.expected_minutes,
                        cost,
                    },
                );
                if inserted.is_some() {
                    return Err(OptimiserError::InvalidConfiguration(format!(
                        "duplicate forecast row for player {}",
                        player.player_id
                    )));
                }
            }
        }

        Ok(Self { start, horizon, rows })
    }

    /// Build an actuals-mode table from observed rows tagged with their gameweek.
    ///
    /// Costs are taken verbatim; the price model is bypassed entirely. Rows for
    /// the gameweek immediately before `start` are accepted to support
    /// continuity pinning; anything else outside `[start, start+horizon)` is a
    /// configuration error.
    pub fn from_observed(
        observed: Vec<(Gameweek, PlayerPeriod)>,
        start: Gameweek,
        horizon: u8,
    ) -> Result<Self, OptimiserError> {
        validate_range(start, horizon)?;

        let earliest = start.saturating_sub(1);
        let end = start + horizon;
        let mut rows: BTreeMap<Gameweek, BTreeMap<PlayerId, PlayerPeriod>> = BTreeMap::new();
        for (gameweek, row) in observed {
            if gameweek < earliest || gameweek >= end {
                return Err(OptimiserError::InvalidConfiguration(format!(
                    "observed row for player {} at gameweek {gameweek} outside [{earliest}, {end})",
                    row.player_id
                )));
            }
            if rows.entry(gameweek).or_default().insert(row.player_id, row).is_some() {
                return Err(OptimiserError::InvalidConfiguration(format!(
                    "duplicate observed row at gameweek {gameweek}"
                )));
            }
        }

        Ok(Self { start, horizon, rows })
    }

    pub fn start(&self) -> Gameweek {
        self.start
    }

    pub fn horizon(&self) -> u8 {
        self.horizon
    }

    /// The gameweeks covered by the horizon, ascending.
    pub fn gameweeks(&self) -> Vec<Gameweek> {
        (0..self.horizon).map(|offset| self.start + offset).collect()
    }

    pub fn get(&self, gameweek: Gameweek, player: PlayerId) -> Option<&PlayerPeriod> {
        self.rows.get(&gameweek).and_then(|m| m.get(&player))
    }

    /// Players available for selection at `gameweek`, in id order.
    pub fn players_at(&self, gameweek: Gameweek) -> impl Iterator<Item = &PlayerPeriod> {
        self.rows.get(&gameweek).into_iter().flat_map(|m| m.values())
    }

    /// Union of player ids across every covered gameweek, sorted.
    pub fn player_ids(&self) -> BTreeSet<PlayerId> {
        self.rows.values().flat_map(|m| m.keys().copied()).collect()
    }
}

fn validate_range(start: Gameweek, horizon: u8) -> Result<(), OptimiserError> {
    if horizon < 1 {
        return Err(OptimiserError::InvalidConfiguration(
            "planning horizon must be at least 1 gameweek".into(),
        ));
    }
    if start < 1 {
        return Err(OptimiserError::InvalidConfiguration(
            "gameweeks are numbered from 1".into(),
        ));
    }
    Ok(())
}
