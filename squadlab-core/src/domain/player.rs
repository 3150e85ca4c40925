//! Player identity and the per-gameweek projection record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete unit of the planning horizon (a scoring round).
pub type Gameweek = u8;

/// Stable player identifier, as assigned by the projection provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Squad position. The four positions partition every player pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Gkp,
    Def,
    Mid,
    Fwd,
}

impl Position {
    /// Canonical ordering used for report sorting: GKP, DEF, MID, FWD.
    pub const ALL: [Position; 4] = [Position::Gkp, Position::Def, Position::Mid, Position::Fwd];

    /// Sort rank within the canonical ordering.
    pub fn rank(self) -> usize {
        match self {
            Position::Gkp => 0,
            Position::Def => 1,
            Position::Mid => 2,
            Position::Fwd => 3,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Position::Gkp => "GKP",
            Position::Def => "DEF",
            Position::Mid => "MID",
            Position::Fwd => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Projection row for a single player in a single gameweek.
///
/// Built once before the optimiser runs and never mutated by it. Cost, position,
/// and club may vary across gameweeks in actuals mode; in planning mode they are
/// fixed (cost optionally evolved by the price model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPeriod {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Three-letter club code (e.g. "ARS").
    pub club: String,
    pub expected_points: f64,
    pub expected_minutes: f64,
    /// Market cost in the provider's currency units (e.g. 10.5 = £10.5m).
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_order_is_gkp_def_mid_fwd() {
        let ranks: Vec<usize> = Position::ALL.iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn position_serializes_to_provider_codes() {
        assert_eq!(serde_json::to_string(&Position::Gkp).unwrap(), "\"GKP\"");
        let pos: Position = serde_json::from_str("\"MID\"").unwrap();
        assert_eq!(pos, Position::Mid);
    }
}
