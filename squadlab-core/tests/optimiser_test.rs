//! End-to-end optimiser scenarios: build → solve → extract on synthetic pools.

use squadlab_core::domain::{Position, SquadRole, SquadRules};
use squadlab_core::error::OptimiserError;
use squadlab_core::optimiser::{optimise, ObjectiveWeights, SolveStatus, SolverOptions};
use squadlab_core::projections::ProjectionTable;
use squadlab_core::synthetic::synthetic_universe;
use std::collections::BTreeMap;

fn planning_table(clubs: usize, per_club: usize, start: u8, horizon: u8, seed: u64) -> ProjectionTable {
    let players = synthetic_universe(clubs, per_club, horizon, seed);
    ProjectionTable::from_forecast(&players, start, horizon, None).unwrap()
}

#[test]
fn full_universe_yields_legal_squad() {
    let table = planning_table(20, 20, 1, 1, 11);
    let rules = SquadRules::default();
    let outcome = optimise(
        &table,
        &rules,
        &ObjectiveWeights::default(),
        None,
        &SolverOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.periods.len(), 1);
    let period = &outcome.periods[0];

    assert_eq!(period.starting().count(), 11);
    assert_eq!(period.bench().count(), 4);

    let count = |pos: Position| period.rows.iter().filter(|r| r.position == pos).count();
    assert_eq!(count(Position::Gkp), 2);
    assert_eq!(count(Position::Def), 5);
    assert_eq!(count(Position::Mid), 5);
    assert_eq!(count(Position::Fwd), 3);
    assert_eq!(
        period.starting().filter(|r| r.position == Position::Gkp).count(),
        1,
        "exactly one goalkeeper starts"
    );

    let captain = period.captain().expect("captain chosen");
    let vice = period.vice_captain().expect("vice-captain chosen");
    assert_eq!(captain.role, SquadRole::Starting);
    assert_eq!(vice.role, SquadRole::Starting);
    assert_ne!(captain.player_id, vice.player_id);

    let mut clubs: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &period.rows {
        *clubs.entry(row.club.as_str()).or_default() += 1;
    }
    assert!(clubs.values().all(|&c| c <= 3));

    assert!(period.total_cost <= rules.budget + 1e-6);
    assert!(rules.formations.contains(&period.formation));

    // Captain doubling is the only difference between the two point totals.
    let expected_gap = captain.expected_points;
    assert!((period.points_with_captain - period.points_without_captain - expected_gap).abs() < 1e-9);
}

#[test]
fn multi_period_plan_respects_transfer_cap() {
    let table = planning_table(8, 10, 5, 3, 23);
    let rules = SquadRules::default();
    let outcome = optimise(
        &table,
        &rules,
        &ObjectiveWeights::default(),
        None,
        &SolverOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.periods.len(), 3);
    assert!(outcome.periods[0].deltas.is_none());
    for period in &outcome.periods[1..] {
        let deltas = period.deltas.as_ref().unwrap();
        assert!(deltas.transferred_in.len() <= rules.transfer_cap as usize);
        assert!(deltas.transferred_out.len() <= rules.transfer_cap as usize);
        assert!(period.total_cost <= rules.budget + 1e-6);
    }
}

#[test]
fn continuity_pins_prior_squad() {
    let rules = SquadRules::default();
    let weights = ObjectiveWeights::default();
    let options = SolverOptions::default();

    let opening = planning_table(8, 10, 1, 1, 3);
    let prior = optimise(&opening, &rules, &weights, None, &options).unwrap();
    let snapshot = prior.final_snapshot();
    assert_eq!(snapshot.gameweek, 1);

    let next = planning_table(8, 10, 2, 1, 4);
    let outcome = optimise(&next, &rules, &weights, Some(&snapshot), &options).unwrap();

    assert_eq!(outcome.periods.len(), 2);
    let pinned = &outcome.periods[0];
    assert!(pinned.pinned);
    assert_eq!(pinned.gameweek, 1);

    let pinned_starting: std::collections::BTreeSet<_> =
        pinned.starting().map(|r| r.player_id).collect();
    let pinned_bench: std::collections::BTreeSet<_> =
        pinned.bench().map(|r| r.player_id).collect();
    assert_eq!(pinned_starting, snapshot.starting_ids());
    assert_eq!(pinned_bench, snapshot.bench_ids());
    assert_eq!(pinned.captain().map(|r| r.player_id), snapshot.captain());
    assert_eq!(pinned.vice_captain().map(|r| r.player_id), snapshot.vice_captain());

    let deltas = outcome.periods[1].deltas.as_ref().unwrap();
    assert!(deltas.transferred_in.len() <= 1);
    assert!(deltas.transferred_out.len() <= 1);
}

#[test]
fn continuity_at_season_start_is_rejected() {
    let rules = SquadRules::default();
    let weights = ObjectiveWeights::default();
    let options = SolverOptions::default();

    let opening = planning_table(8, 10, 1, 1, 3);
    let snapshot = optimise(&opening, &rules, &weights, None, &options)
        .unwrap()
        .final_snapshot();

    // A fresh horizon that itself starts at gameweek 1 cannot carry a squad in.
    let err = optimise(&opening, &rules, &weights, Some(&snapshot), &options).unwrap_err();
    assert!(matches!(err, OptimiserError::InvalidConfiguration(_)), "{err}");
}

#[test]
fn budget_below_any_legal_squad_is_infeasible() {
    let table = planning_table(8, 10, 1, 1, 9);
    let rules = SquadRules { budget: 50.0, ..SquadRules::default() };
    let err = optimise(
        &table,
        &rules,
        &ObjectiveWeights::default(),
        None,
        &SolverOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OptimiserError::InfeasibleModel), "{err}");
}

#[test]
fn repeat_solves_reach_the_same_objective() {
    let table = planning_table(6, 10, 3, 2, 17);
    let rules = SquadRules::default();
    let weights = ObjectiveWeights::default();
    let options = SolverOptions::default();

    let first = optimise(&table, &rules, &weights, None, &options).unwrap();
    let second = optimise(&table, &rules, &weights, None, &options).unwrap();
    assert!((first.objective - second.objective).abs() < 1e-9);
}

#[test]
fn player_without_later_projection_leaves_the_squad() {
    // Actuals mode: a star player has a row at gameweek 10 only; at 11 they are
    // absent from the pool and must drop out of the plan.
    let players = synthetic_universe(8, 10, 1, 31);
    let star = players[0].player_id;
    let mut observed = Vec::new();
    for gw in [10u8, 11u8] {
        for player in &players {
            if gw == 11 && player.player_id == star {
                continue;
            }
            let points = if player.player_id == star { 25.0 } else { player.expected_points[0] };
            observed.push((
                gw,
                squadlab_core::domain::PlayerPeriod {
                    player_id: player.player_id,
                    name: player.name.clone(),
                    position: player.position,
                    club: player.club.clone(),
                    expected_points: points,
                    expected_minutes: player.expected_minutes,
                    cost: player.cost,
                },
            ));
        }
    }

    let table = ProjectionTable::from_observed(observed, 10, 2).unwrap();
    let outcome = optimise(
        &table,
        &SquadRules::default(),
        &ObjectiveWeights::default(),
        None,
        &SolverOptions::default(),
    )
    .unwrap();

    let first = &outcome.periods[0];
    let second = &outcome.periods[1];
    assert!(first.rows.iter().any(|r| r.player_id == star), "star is picked while available");
    assert!(second.rows.iter().all(|r| r.player_id != star), "star cannot be held unprojected");
}

#[test]
fn out_of_range_weights_are_rejected_before_solving() {
    let table = planning_table(6, 10, 1, 1, 2);
    let weights = ObjectiveWeights { bench_weight: 1.5, ..ObjectiveWeights::default() };
    let err = optimise(
        &table,
        &SquadRules::default(),
        &weights,
        None,
        &SolverOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OptimiserError::InvalidConfiguration(_)));
}
