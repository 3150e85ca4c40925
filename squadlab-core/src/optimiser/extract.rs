//! Result extraction and validation.
//!
//! Converts the 0/1 assignment back into structured squad rows per gameweek,
//! computes captain-adjusted totals and period-over-period deltas, and
//! cross-checks every structural invariant the builder is supposed to enforce.
//! A violation here is a builder or solver-adapter bug, never bad input, and
//! is reported as [`OptimiserError::InternalInconsistency`].

use super::builder::VarIndex;
use super::solver::SolveStatus;
use crate::domain::{
    Formation, Gameweek, PlayerId, Position, SnapshotEntry, SquadRole, SquadRules, SquadSnapshot,
};
use crate::error::OptimiserError;
use crate::projections::ProjectionTable;
use good_lp::Solution;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const COST_EPSILON: f64 = 1e-6;

/// One selected player in one gameweek of the optimal plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRow {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub club: String,
    pub role: SquadRole,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub cost: f64,
    pub expected_points: f64,
    pub expected_minutes: f64,
}

/// Squad movements relative to the previous gameweek, by player name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferDelta {
    pub transferred_in: Vec<String>,
    pub transferred_out: Vec<String>,
    pub benched: Vec<String>,
    pub promoted: Vec<String>,
}

/// The resolved squad for one gameweek plus its summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub gameweek: Gameweek,
    /// True for the snapshot gameweek carried in under continuity; its squad
    /// was pinned, not optimised, and it is excluded from structural checks.
    pub pinned: bool,
    /// Starting rows first (position order), then bench rows.
    pub rows: Vec<SelectionRow>,
    pub formation: Formation,
    pub total_cost: f64,
    pub starting_cost: f64,
    pub bench_cost: f64,
    pub points_with_captain: f64,
    pub points_without_captain: f64,
    /// `None` for the first modeled gameweek (nothing to diff against).
    pub deltas: Option<TransferDelta>,
}

impl PeriodReport {
    pub fn starting(&self) -> impl Iterator<Item = &SelectionRow> {
        self.rows.iter().filter(|r| r.role == SquadRole::Starting)
    }

    pub fn bench(&self) -> impl Iterator<Item = &SelectionRow> {
        self.rows.iter().filter(|r| r.role == SquadRole::Bench)
    }

    pub fn captain(&self) -> Option<&SelectionRow> {
        self.rows.iter().find(|r| r.is_captain)
    }

    pub fn vice_captain(&self) -> Option<&SelectionRow> {
        self.rows.iter().find(|r| r.is_vice_captain)
    }
}

/// The full multi-gameweek result of one optimisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub status: SolveStatus,
    /// Achieved objective value (decay-weighted, bench-weighted points).
    pub objective: f64,
    pub periods: Vec<PeriodReport>,
}

impl PlanOutcome {
    /// Snapshot of the final gameweek's squad, suitable as the continuity
    /// input of the next invocation.
    pub fn final_snapshot(&self) -> SquadSnapshot {
        let last = self.periods.last().expect("a plan always covers at least one gameweek");
        let entries = last
            .rows
            .iter()
            .map(|row| SnapshotEntry {
                player_id: row.player_id,
                role: row.role,
                is_captain: row.is_captain,
                is_vice_captain: row.is_vice_captain,
            })
            .collect();
        SquadSnapshot::new(last.gameweek, entries)
    }
}

pub(crate) fn extract_outcome<S: Solution>(
    solution: &S,
    index: &VarIndex,
    table: &ProjectionTable,
    rules: &SquadRules,
    status: SolveStatus,
    objective: f64,
) -> Result<PlanOutcome, OptimiserError> {
    let mut periods: Vec<PeriodReport> = Vec::with_capacity(index.periods.len());

    for &t in &index.periods {
        let pinned = Some(t) == index.pinned;
        let mut rows = collect_rows(solution, index, table, t)?;
        rows.sort_by(|a, b| {
            let a_key = (role_rank(a.role), a.position.rank(), a.player_id);
            let b_key = (role_rank(b.role), b.position.rank(), b.player_id);
            a_key.cmp(&b_key)
        });

        let formation = realized_formation(&rows);
        let starting_cost: f64 =
            rows.iter().filter(|r| r.role == SquadRole::Starting).map(|r| r.cost).sum();
        let bench_cost: f64 =
            rows.iter().filter(|r| r.role == SquadRole::Bench).map(|r| r.cost).sum();
        let points_without_captain: f64 = rows
            .iter()
            .filter(|r| r.role == SquadRole::Starting)
            .map(|r| r.expected_points)
            .sum();
        let points_with_captain: f64 = rows
            .iter()
            .filter(|r| r.role == SquadRole::Starting)
            .map(|r| if r.is_captain { 2.0 * r.expected_points } else { r.expected_points })
            .sum();

        let deltas = periods.last().map(|prev| diff_periods(prev, &rows));

        let report = PeriodReport {
            gameweek: t,
            pinned,
            rows,
            formation,
            total_cost: starting_cost + bench_cost,
            starting_cost,
            bench_cost,
            points_with_captain,
            points_without_captain,
            deltas,
        };

        if !pinned {
            validate_period(&report, rules)?;
        }
        periods.push(report);
    }

    Ok(PlanOutcome { status, objective, periods })
}

fn collect_rows<S: Solution>(
    solution: &S,
    index: &VarIndex,
    table: &ProjectionTable,
    t: Gameweek,
) -> Result<Vec<SelectionRow>, OptimiserError> {
    let mut rows = Vec::new();
    for (&(player, gameweek), &starting_var) in &index.starting {
        if gameweek != t {
            continue;
        }
        let starting = is_set(solution.value(starting_var));
        let bench = is_set(solution.value(index.bench[&(player, gameweek)]));
        if !starting && !bench {
            continue;
        }
        if starting && bench {
            return Err(OptimiserError::InternalInconsistency {
                gameweek: t,
                detail: format!("player {player} is both starting and benched"),
            });
        }
        let projection = index.projection(table, t, player).ok_or_else(|| {
            OptimiserError::InternalInconsistency {
                gameweek: t,
                detail: format!("selected player {player} has no projection row"),
            }
        })?;
        rows.push(SelectionRow {
            player_id: player,
            name: projection.name.clone(),
            position: projection.position,
            club: projection.club.clone(),
            role: if starting { SquadRole::Starting } else { SquadRole::Bench },
            is_captain: is_set(solution.value(index.captain[&(player, gameweek)])),
            is_vice_captain: is_set(solution.value(index.vice_captain[&(player, gameweek)])),
            cost: projection.cost,
            expected_points: projection.expected_points,
            expected_minutes: projection.expected_minutes,
        });
    }
    Ok(rows)
}

/// Set differences between consecutive gameweeks' squads, reported by name.
fn diff_periods(prev: &PeriodReport, current: &[SelectionRow]) -> TransferDelta {
    let prev_members: BTreeSet<PlayerId> = prev.rows.iter().map(|r| r.player_id).collect();
    let prev_starting: BTreeSet<PlayerId> = prev.starting().map(|r| r.player_id).collect();
    let prev_bench: BTreeSet<PlayerId> = prev.bench().map(|r| r.player_id).collect();

    let members: BTreeSet<PlayerId> = current.iter().map(|r| r.player_id).collect();
    let starting: BTreeSet<PlayerId> = current
        .iter()
        .filter(|r| r.role == SquadRole::Starting)
        .map(|r| r.player_id)
        .collect();
    let bench: BTreeSet<PlayerId> = current
        .iter()
        .filter(|r| r.role == SquadRole::Bench)
        .map(|r| r.player_id)
        .collect();

    let mut names: BTreeMap<PlayerId, &str> = BTreeMap::new();
    for row in prev.rows.iter() {
        names.insert(row.player_id, row.name.as_str());
    }
    for row in current {
        names.insert(row.player_id, row.name.as_str());
    }
    let resolve = |ids: BTreeSet<PlayerId>| -> Vec<String> {
        let mut out: Vec<String> =
            ids.iter().filter_map(|id| names.get(id).map(|n| n.to_string())).collect();
        out.sort();
        out
    };

    TransferDelta {
        transferred_in: resolve(members.difference(&prev_members).copied().collect()),
        transferred_out: resolve(prev_members.difference(&members).copied().collect()),
        benched: resolve(prev_starting.intersection(&bench).copied().collect()),
        promoted: resolve(prev_bench.intersection(&starting).copied().collect()),
    }
}

/// Structural invariants every optimised gameweek must satisfy.
fn validate_period(report: &PeriodReport, rules: &SquadRules) -> Result<(), OptimiserError> {
    let t = report.gameweek;
    let fail = |detail: String| OptimiserError::InternalInconsistency { gameweek: t, detail };

    let starting_count = report.starting().count();
    let bench_count = report.bench().count();
    if starting_count != rules.starting_size {
        return Err(fail(format!("{starting_count} starters, expected {}", rules.starting_size)));
    }
    if bench_count != rules.bench_size {
        return Err(fail(format!("{bench_count} bench players, expected {}", rules.bench_size)));
    }

    for position in Position::ALL {
        let in_squad = report.rows.iter().filter(|r| r.position == position).count();
        let quota = rules.quotas.quota(position);
        if in_squad != quota {
            return Err(fail(format!("{in_squad} {position} in squad, quota is {quota}")));
        }
    }

    if !rules.formations.contains(&report.formation) {
        return Err(fail(format!("realized formation {} is not legal", report.formation)));
    }

    let captains: Vec<&SelectionRow> = report.rows.iter().filter(|r| r.is_captain).collect();
    let vices: Vec<&SelectionRow> = report.rows.iter().filter(|r| r.is_vice_captain).collect();
    match (captains.as_slice(), vices.as_slice()) {
        ([captain], [vice]) => {
            if captain.role != SquadRole::Starting || vice.role != SquadRole::Starting {
                return Err(fail("captaincy assigned to a non-starter".into()));
            }
            if captain.player_id == vice.player_id {
                return Err(fail("captain and vice-captain are the same player".into()));
            }
        }
        _ => {
            return Err(fail(format!(
                "{} captains and {} vice-captains, expected exactly one each",
                captains.len(),
                vices.len()
            )))
        }
    }

    let mut club_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in report.rows.iter().filter(|r| !r.club.is_empty()) {
        *club_counts.entry(row.club.as_str()).or_default() += 1;
    }
    if let Some((club, &count)) = club_counts.iter().find(|(_, &c)| c > rules.club_limit) {
        return Err(fail(format!("{count} players from {club}, limit is {}", rules.club_limit)));
    }

    if report.total_cost > rules.budget + COST_EPSILON {
        return Err(fail(format!(
            "squad cost {:.1} exceeds budget {:.1}",
            report.total_cost, rules.budget
        )));
    }

    Ok(())
}

fn realized_formation(rows: &[SelectionRow]) -> Formation {
    let count = |position: Position| {
        rows.iter()
            .filter(|r| r.role == SquadRole::Starting && r.position == position)
            .count() as u8
    };
    Formation::new(count(Position::Def), count(Position::Mid), count(Position::Fwd))
}

fn role_rank(role: SquadRole) -> usize {
    match role {
        SquadRole::Starting => 0,
        SquadRole::Bench => 1,
    }
}

fn is_set(value: f64) -> bool {
    value > 0.5
}
