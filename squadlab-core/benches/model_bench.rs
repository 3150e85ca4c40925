//! Benchmarks: projection-table assembly and a small end-to-end solve.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use squadlab_core::domain::SquadRules;
use squadlab_core::optimiser::{optimise, ObjectiveWeights, SolverOptions};
use squadlab_core::pricing::PriceParams;
use squadlab_core::projections::ProjectionTable;
use squadlab_core::synthetic::synthetic_universe;

fn bench_table_build(c: &mut Criterion) {
    let players = synthetic_universe(20, 20, 3, 7);
    let params = PriceParams::default();
    c.bench_function("table_from_forecast_400_players_3gw", |b| {
        b.iter(|| {
            ProjectionTable::from_forecast(black_box(&players), 1, 3, Some(&params)).unwrap()
        })
    });
}

fn bench_small_solve(c: &mut Criterion) {
    let players = synthetic_universe(6, 10, 1, 7);
    let table = ProjectionTable::from_forecast(&players, 1, 1, None).unwrap();
    let rules = SquadRules::default();
    let weights = ObjectiveWeights::default();
    let options = SolverOptions::default();
    c.bench_function("optimise_60_players_1gw", |b| {
        b.iter(|| optimise(black_box(&table), &rules, &weights, None, &options).unwrap())
    });
}

criterion_group!(benches, bench_table_build, bench_small_solve);
criterion_main!(benches);
