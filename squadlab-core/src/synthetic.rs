//! Synthetic player universes — deterministic, seeded pools for tests and benches.

use crate::domain::Position;
use crate::domain::PlayerId;
use crate::projections::ForecastPlayer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The twenty club codes of a standard season.
pub const CLUB_CODES: [&str; 20] = [
    "ARS", "AST", "BOU", "BRE", "BRI", "CHE", "CRY", "EVE", "FUL", "IPS", "LEI", "LIV", "MCI",
    "MUN", "NEW", "NOT", "SOU", "TOT", "WHM", "WOL",
];

/// Generate a feasible universe of `clubs * players_per_club` players with
/// projected points for `horizon` gameweeks.
///
/// Positions cycle so that every club fields goalkeepers, defenders,
/// midfielders, and forwards in realistic proportions, and each club's first
/// goalkeeper costs exactly 4.0 so a legal cheap backup always exists. The
/// same seed always yields the same universe.
pub fn synthetic_universe(
    clubs: usize,
    players_per_club: usize,
    horizon: u8,
    seed: u64,
) -> Vec<ForecastPlayer> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut players = Vec::with_capacity(clubs * players_per_club);
    let mut next_id = 1u32;

    for club_idx in 0..clubs {
        let club = CLUB_CODES[club_idx % CLUB_CODES.len()];
        for slot in 0..players_per_club {
            let position = position_for_slot(slot);
            let cost = match position {
                Position::Gkp if slot == 0 => 4.0,
                Position::Gkp => 4.0 + rng.gen_range(0..=10) as f64 / 10.0,
                Position::Def => 4.0 + rng.gen_range(0..=30) as f64 / 10.0,
                Position::Mid => 4.5 + rng.gen_range(0..=45) as f64 / 10.0,
                Position::Fwd => 4.5 + rng.gen_range(0..=55) as f64 / 10.0,
            };
            let expected_points =
                (0..horizon).map(|_| rng.gen_range(10..=80) as f64 / 10.0).collect();

            players.push(ForecastPlayer {
                player_id: PlayerId(next_id),
                name: format!("{club} {slot:02}"),
                position,
                club: club.to_string(),
                expected_minutes: rng.gen_range(45.0..95.0),
                cost,
                expected_points,
            });
            next_id += 1;
        }
    }

    players
}

fn position_for_slot(slot: usize) -> Position {
    match slot % 10 {
        0 => Position::Gkp,
        1..=4 => Position::Def,
        5..=8 => Position::Mid,
        _ => Position::Fwd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_is_deterministic_per_seed() {
        let a = synthetic_universe(4, 10, 2, 7);
        let b = synthetic_universe(4, 10, 2, 7);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.player_id, y.player_id);
            assert_eq!(x.cost, y.cost);
            assert_eq!(x.expected_points, y.expected_points);
        }
    }

    #[test]
    fn every_club_has_a_four_million_goalkeeper() {
        let universe = synthetic_universe(20, 10, 1, 42);
        for club in CLUB_CODES {
            assert!(universe
                .iter()
                .any(|p| p.club == club && p.position == Position::Gkp && p.cost == 4.0));
        }
    }
}
