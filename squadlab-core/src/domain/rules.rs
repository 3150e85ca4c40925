//! Squad rules — the explicit rule configuration consumed by the problem builder.
//!
//! Every numeric limit that shapes the constraint system lives here rather than
//! as a literal inside constraint-construction code, so a season rule change is
//! a configuration edit, not a code edit.

use super::formation::Formation;
use super::player::Position;
use serde::{Deserialize, Serialize};

/// Per-position quotas over the full 15-player squad (starting + bench).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionQuotas {
    pub goalkeepers: usize,
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl PositionQuotas {
    pub fn quota(&self, position: Position) -> usize {
        match position {
            Position::Gkp => self.goalkeepers,
            Position::Def => self.defenders,
            Position::Mid => self.midfielders,
            Position::Fwd => self.forwards,
        }
    }

    pub fn total(&self) -> usize {
        self.goalkeepers + self.defenders + self.midfielders + self.forwards
    }
}

impl Default for PositionQuotas {
    fn default() -> Self {
        Self { goalkeepers: 2, defenders: 5, midfielders: 5, forwards: 3 }
    }
}

/// The full rule configuration for one optimisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadRules {
    /// Total cost cap over starting + bench, in currency units.
    pub budget: f64,
    /// Starting lineup size.
    pub starting_size: usize,
    /// Bench size.
    pub bench_size: usize,
    /// Squad-wide position quotas (starting + bench combined).
    pub quotas: PositionQuotas,
    /// Maximum players from any single club (starting + bench combined).
    pub club_limit: usize,
    /// Cost cap on the bench goalkeeper (cheap backup heuristic).
    pub bench_gkp_cost_cap: f64,
    /// Legal starting-lineup formations.
    pub formations: Vec<Formation>,
    /// Maximum transfers in (and, separately, out) per gameweek after the first.
    pub transfer_cap: u32,
}

impl Default for SquadRules {
    fn default() -> Self {
        Self {
            budget: 100.0,
            starting_size: 11,
            bench_size: 4,
            quotas: PositionQuotas::default(),
            club_limit: 3,
            bench_gkp_cost_cap: 4.0,
            formations: Formation::standard_set(),
            transfer_cap: 1,
        }
    }
}

impl SquadRules {
    /// Full squad size implied by the quotas.
    pub fn squad_size(&self) -> usize {
        self.starting_size + self.bench_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_describe_the_standard_game() {
        let rules = SquadRules::default();
        assert_eq!(rules.squad_size(), 15);
        assert_eq!(rules.quotas.total(), 15);
        assert_eq!(rules.quotas.quota(Position::Gkp), 2);
        assert_eq!(rules.quotas.quota(Position::Def), 5);
        assert_eq!(rules.formations.len(), 8);
        assert_eq!(rules.transfer_cap, 1);
    }
}
