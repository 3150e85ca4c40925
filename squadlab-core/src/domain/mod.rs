//! Domain types: players, formations, rules, and squad snapshots.

pub mod formation;
pub mod player;
pub mod rules;
pub mod squad;

pub use formation::Formation;
pub use player::{Gameweek, PlayerId, PlayerPeriod, Position};
pub use rules::{PositionQuotas, SquadRules};
pub use squad::{SnapshotEntry, SquadRole, SquadSnapshot};
