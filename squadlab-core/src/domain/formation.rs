//! Formation — the (DEF, MID, FWD) shape of the starting lineup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outfield shape of an 11-player starting lineup (the goalkeeper is implicit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formation {
    pub defenders: u8,
    pub midfielders: u8,
    pub forwards: u8,
}

impl Formation {
    pub const fn new(defenders: u8, midfielders: u8, forwards: u8) -> Self {
        Self { defenders, midfielders, forwards }
    }

    /// Total outfield starters implied by this formation.
    pub fn outfield(&self) -> u8 {
        self.defenders + self.midfielders + self.forwards
    }

    /// The eight formations allowed by the standard ruleset.
    pub fn standard_set() -> Vec<Formation> {
        vec![
            Formation::new(3, 4, 3),
            Formation::new(3, 5, 2),
            Formation::new(4, 4, 2),
            Formation::new(4, 3, 3),
            Formation::new(4, 5, 1),
            Formation::new(5, 3, 2),
            Formation::new(5, 4, 1),
            Formation::new(5, 2, 3),
        ]
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_formations_all_field_ten_outfielders() {
        for formation in Formation::standard_set() {
            assert_eq!(formation.outfield(), 10, "{formation}");
        }
    }

    #[test]
    fn formation_displays_as_triple() {
        assert_eq!(Formation::new(4, 4, 2).to_string(), "4-4-2");
    }
}
