//! Squad snapshot — a previously-held squad at a single reference gameweek.

use super::player::{Gameweek, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Whether a squad member is in the starting lineup or on the bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquadRole {
    Starting,
    Bench,
}

/// One squad member in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub player_id: PlayerId,
    pub role: SquadRole,
    pub is_captain: bool,
    pub is_vice_captain: bool,
}

/// The full squad held at `gameweek`, read at model-build time when continuity
/// is requested and derived from the final period's solution as output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadSnapshot {
    pub gameweek: Gameweek,
    pub entries: Vec<SnapshotEntry>,
}

impl SquadSnapshot {
    pub fn new(gameweek: Gameweek, entries: Vec<SnapshotEntry>) -> Self {
        Self { gameweek, entries }
    }

    pub fn starting_ids(&self) -> BTreeSet<PlayerId> {
        self.ids_with_role(SquadRole::Starting)
    }

    pub fn bench_ids(&self) -> BTreeSet<PlayerId> {
        self.ids_with_role(SquadRole::Bench)
    }

    pub fn member_ids(&self) -> BTreeSet<PlayerId> {
        self.entries.iter().map(|e| e.player_id).collect()
    }

    pub fn captain(&self) -> Option<PlayerId> {
        self.entries.iter().find(|e| e.is_captain).map(|e| e.player_id)
    }

    pub fn vice_captain(&self) -> Option<PlayerId> {
        self.entries.iter().find(|e| e.is_vice_captain).map(|e| e.player_id)
    }

    fn ids_with_role(&self, role: SquadRole) -> BTreeSet<PlayerId> {
        self.entries
            .iter()
            .filter(|e| e.role == role)
            .map(|e| e.player_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_role_lookups() {
        let snapshot = SquadSnapshot::new(
            7,
            vec![
                SnapshotEntry {
                    player_id: PlayerId(1),
                    role: SquadRole::Starting,
                    is_captain: true,
                    is_vice_captain: false,
                },
                SnapshotEntry {
                    player_id: PlayerId(2),
                    role: SquadRole::Starting,
                    is_captain: false,
                    is_vice_captain: true,
                },
                SnapshotEntry {
                    player_id: PlayerId(3),
                    role: SquadRole::Bench,
                    is_captain: false,
                    is_vice_captain: false,
                },
            ],
        );

        assert_eq!(snapshot.captain(), Some(PlayerId(1)));
        assert_eq!(snapshot.vice_captain(), Some(PlayerId(2)));
        assert!(snapshot.starting_ids().contains(&PlayerId(2)));
        assert!(snapshot.bench_ids().contains(&PlayerId(3)));
        assert_eq!(snapshot.member_ids().len(), 3);
    }
}
