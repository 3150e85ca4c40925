//! Problem builder — assembles the decision-variable set and constraint system.
//!
//! The builder consumes a [`ProjectionTable`] and, when continuity is
//! requested, a [`SquadSnapshot`] whose gameweek immediately precedes the
//! horizon. It produces an in-memory model only; it never invokes the solver.
//!
//! Variables exist only for (player, gameweek) pairs present in the table, so
//! a player with no projection for some gameweek simply cannot be selected
//! there. With continuity, the snapshot gameweek is modeled as an extra
//! leading period whose variables are pinned by equality constraints and which
//! contributes nothing to the objective; the transfer constraints between it
//! and the first optimised gameweek are what carry the prior squad forward.

use crate::domain::{Gameweek, PlayerId, PlayerPeriod, Position, SquadRules, SquadSnapshot};
use crate::error::OptimiserError;
use crate::projections::ProjectionTable;
use good_lp::{variable, variables, Constraint, Expression, ProblemVariables, Variable};
use std::collections::{BTreeSet, HashMap};

/// Objective weighting knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveWeights {
    /// Weight on expected points of outfield bench players, in [0, 1].
    pub bench_weight: f64,
    /// Weight on expected points of the bench goalkeeper, in [0, 1]. Lower than
    /// `bench_weight`, reflecting a backup keeper's near-zero chance of playing.
    pub gkp_bench_weight: f64,
    /// Per-gameweek discount in (0, 1]; each gameweek's contribution is scaled
    /// by `time_decay^offset` from the horizon start.
    pub time_decay: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self { bench_weight: 0.5, gkp_bench_weight: 0.1, time_decay: 1.0 }
    }
}

/// Variable handles for one assembled model, keyed by (player, gameweek).
pub(crate) struct VarIndex {
    /// Modeled gameweeks, ascending. The first entry is the pinned snapshot
    /// gameweek when continuity is active.
    pub periods: Vec<Gameweek>,
    pub start: Gameweek,
    pub pinned: Option<Gameweek>,
    pub starting: HashMap<(PlayerId, Gameweek), Variable>,
    pub bench: HashMap<(PlayerId, Gameweek), Variable>,
    pub captain: HashMap<(PlayerId, Gameweek), Variable>,
    pub vice_captain: HashMap<(PlayerId, Gameweek), Variable>,
    pub transfer_in: HashMap<(PlayerId, Gameweek), Variable>,
    pub transfer_out: HashMap<(PlayerId, Gameweek), Variable>,
}

impl VarIndex {
    /// Squad membership (starting + bench) as an expression; zero when the
    /// player has no variables at `gameweek` (absent from the pool).
    fn membership(&self, player: PlayerId, gameweek: Gameweek) -> Expression {
        let mut expr = Expression::default();
        if let Some(&var) = self.starting.get(&(player, gameweek)) {
            expr.add_mul(1.0, var);
        }
        if let Some(&var) = self.bench.get(&(player, gameweek)) {
            expr.add_mul(1.0, var);
        }
        expr
    }

    /// Projection row backing a (player, gameweek) pair, with the pinned
    /// gameweek falling back to the horizon-start row when the table carries
    /// no dedicated data for it.
    pub(crate) fn projection<'a>(
        &self,
        table: &'a ProjectionTable,
        gameweek: Gameweek,
        player: PlayerId,
    ) -> Option<&'a PlayerPeriod> {
        let direct = table.get(gameweek, player);
        if direct.is_none() && Some(gameweek) == self.pinned {
            return table.get(self.start, player);
        }
        direct
    }
}

/// An assembled model, ready to hand to the solver adapter.
pub(crate) struct BuiltModel {
    pub vars: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    pub index: VarIndex,
}

pub(crate) fn build_model(
    table: &ProjectionTable,
    rules: &SquadRules,
    weights: &ObjectiveWeights,
    continuity: Option<&SquadSnapshot>,
) -> Result<BuiltModel, OptimiserError> {
    let start = table.start();
    let pinned = continuity.map(|s| s.gameweek);
    let mut periods: Vec<Gameweek> = Vec::new();
    if let Some(p) = pinned {
        periods.push(p);
    }
    periods.extend(table.gameweeks());

    let mut vars = variables!();
    let mut index = VarIndex {
        periods: periods.clone(),
        start,
        pinned,
        starting: HashMap::new(),
        bench: HashMap::new(),
        captain: HashMap::new(),
        vice_captain: HashMap::new(),
        transfer_in: HashMap::new(),
        transfer_out: HashMap::new(),
    };

    // Selection and captaincy variables for every available (player, gameweek).
    for &t in &periods {
        for row in available_players(table, t, pinned) {
            let key = (row.player_id, t);
            index.starting.insert(key, vars.add(variable().binary()));
            index.bench.insert(key, vars.add(variable().binary()));
            index.captain.insert(key, vars.add(variable().binary()));
            index.vice_captain.insert(key, vars.add(variable().binary()));
        }
    }

    // Transfer variables between consecutive modeled gameweeks.
    for window in periods.windows(2) {
        let (prev, t) = (window[0], window[1]);
        let mut pool: BTreeSet<PlayerId> = BTreeSet::new();
        pool.extend(available_players(table, prev, pinned).iter().map(|r| r.player_id));
        pool.extend(available_players(table, t, pinned).iter().map(|r| r.player_id));
        for player in pool {
            index.transfer_in.insert((player, t), vars.add(variable().binary()));
            index.transfer_out.insert((player, t), vars.add(variable().binary()));
        }
    }

    let mut constraints: Vec<Constraint> = Vec::new();

    if let Some(snapshot) = continuity {
        pin_snapshot(&index, snapshot, rules, &mut constraints)?;
    }

    // Formation selector variables exist for optimised gameweeks only.
    let mut formation_vars: HashMap<Gameweek, Vec<Variable>> = HashMap::new();
    for &t in periods.iter().filter(|&&t| t >= start) {
        let selectors: Vec<Variable> =
            rules.formations.iter().map(|_| vars.add(variable().binary())).collect();
        formation_vars.insert(t, selectors);
    }

    for &t in periods.iter().filter(|&&t| t >= start) {
        add_period_constraints(table, rules, &index, &formation_vars[&t], t, &mut constraints);
    }

    add_transfer_constraints(rules, &index, &mut constraints);

    let objective = build_objective(table, weights, &index, start);

    Ok(BuiltModel { vars, objective, constraints, index })
}

/// Players selectable at `gameweek`. The pinned snapshot gameweek reuses the
/// horizon-start pool when the table has no dedicated rows for it (planning
/// mode replicates a single snapshot of data).
fn available_players<'a>(
    table: &'a ProjectionTable,
    gameweek: Gameweek,
    pinned: Option<Gameweek>,
) -> Vec<&'a PlayerPeriod> {
    let direct: Vec<&PlayerPeriod> = table.players_at(gameweek).collect();
    if direct.is_empty() && Some(gameweek) == pinned {
        return table.players_at(table.start()).collect();
    }
    direct
}

/// Equality-pin every variable of the snapshot gameweek to the recorded state.
/// Nothing at this gameweek is re-optimised.
fn pin_snapshot(
    index: &VarIndex,
    snapshot: &SquadSnapshot,
    rules: &SquadRules,
    constraints: &mut Vec<Constraint>,
) -> Result<(), OptimiserError> {
    let t = snapshot.gameweek;
    let starting = snapshot.starting_ids();
    let bench = snapshot.bench_ids();
    let captain = snapshot.captain();
    let vice_captain = snapshot.vice_captain();

    for member in snapshot.member_ids() {
        if !index.starting.contains_key(&(member, t)) {
            return Err(OptimiserError::InvalidProjectionData { player: member, gameweek: t });
        }
    }

    for (&(player, gameweek), &var) in &index.starting {
        if gameweek != t {
            continue;
        }
        let is_starting = starting.contains(&player);
        let is_bench = bench.contains(&player);
        constraints.push(var_expr(var).eq(bool_coeff(is_starting)));
        constraints.push(var_expr(index.bench[&(player, gameweek)]).eq(bool_coeff(is_bench)));
        constraints
            .push(var_expr(index.captain[&(player, gameweek)]).eq(bool_coeff(captain == Some(player))));
        constraints.push(
            var_expr(index.vice_captain[&(player, gameweek)])
                .eq(bool_coeff(vice_captain == Some(player))),
        );
    }

    // Lineup-size equalities for the pinned gameweek.
    let mut starting_count = Expression::default();
    let mut bench_count = Expression::default();
    for (&(_, gameweek), &var) in &index.starting {
        if gameweek == t {
            starting_count.add_mul(1.0, var);
        }
    }
    for (&(_, gameweek), &var) in &index.bench {
        if gameweek == t {
            bench_count.add_mul(1.0, var);
        }
    }
    constraints.push(starting_count.eq(rules.starting_size as f64));
    constraints.push(bench_count.eq(rules.bench_size as f64));

    Ok(())
}

/// All per-gameweek squad-shape constraints for one optimised gameweek.
fn add_period_constraints(
    table: &ProjectionTable,
    rules: &SquadRules,
    index: &VarIndex,
    formation_selectors: &[Variable],
    t: Gameweek,
    constraints: &mut Vec<Constraint>,
) {
    let pool: Vec<&PlayerPeriod> = table.players_at(t).collect();

    // Budget over the full squad.
    let mut squad_cost = Expression::default();
    for row in &pool {
        let key = (row.player_id, t);
        squad_cost.add_mul(row.cost, index.starting[&key]);
        squad_cost.add_mul(row.cost, index.bench[&key]);
    }
    constraints.push(squad_cost.leq(rules.budget));

    // Lineup sizes.
    let mut starting_count = Expression::default();
    let mut bench_count = Expression::default();
    for row in &pool {
        let key = (row.player_id, t);
        starting_count.add_mul(1.0, index.starting[&key]);
        bench_count.add_mul(1.0, index.bench[&key]);
    }
    constraints.push(starting_count.eq(rules.starting_size as f64));
    constraints.push(bench_count.eq(rules.bench_size as f64));

    // Per-player role exclusivity and captaincy membership.
    for row in &pool {
        let key = (row.player_id, t);
        let starting = index.starting[&key];
        let bench = index.bench[&key];
        let captain = index.captain[&key];
        let vice = index.vice_captain[&key];
        constraints.push((var_expr(starting) + bench).leq(1.0));
        constraints.push((var_expr(captain) - starting).leq(0.0));
        constraints.push((var_expr(vice) - starting).leq(0.0));
        constraints.push((var_expr(captain) + vice).leq(1.0));
    }

    // Exactly one captain and one vice-captain.
    let mut captain_count = Expression::default();
    let mut vice_count = Expression::default();
    for row in &pool {
        let key = (row.player_id, t);
        captain_count.add_mul(1.0, index.captain[&key]);
        vice_count.add_mul(1.0, index.vice_captain[&key]);
    }
    constraints.push(captain_count.eq(1.0));
    constraints.push(vice_count.eq(1.0));

    // Club limit over the full squad. Rows with no club code (forecast data
    // that never joined the official pool) are exempt rather than pooled into
    // one phantom club.
    let clubs: BTreeSet<&str> =
        pool.iter().map(|r| r.club.as_str()).filter(|c| !c.is_empty()).collect();
    for club in clubs {
        let mut club_count = Expression::default();
        for row in pool.iter().filter(|r| r.club == club) {
            let key = (row.player_id, t);
            club_count.add_mul(1.0, index.starting[&key]);
            club_count.add_mul(1.0, index.bench[&key]);
        }
        constraints.push(club_count.leq(rules.club_limit as f64));
    }

    // Exactly one formation; its triple lower-bounds the starting counts.
    let mut selector_sum = Expression::default();
    for &selector in formation_selectors {
        selector_sum.add_mul(1.0, selector);
    }
    constraints.push(selector_sum.eq(1.0));

    for (formation, &selector) in rules.formations.iter().zip(formation_selectors) {
        for (position, minimum) in [
            (Position::Def, formation.defenders),
            (Position::Mid, formation.midfielders),
            (Position::Fwd, formation.forwards),
        ] {
            let mut outfield = Expression::default();
            for row in pool.iter().filter(|r| r.position == position) {
                outfield.add_mul(1.0, index.starting[&(row.player_id, t)]);
            }
            outfield.add_mul(-(minimum as f64), selector);
            constraints.push(outfield.geq(0.0));
        }
    }

    // Goalkeepers: exactly one starting, the rest of the quota on the bench,
    // with the backup capped in cost.
    let goalkeepers: Vec<&&PlayerPeriod> =
        pool.iter().filter(|r| r.position == Position::Gkp).collect();
    let mut gkp_starting = Expression::default();
    let mut gkp_bench_cost = Expression::default();
    for row in &goalkeepers {
        let key = (row.player_id, t);
        gkp_starting.add_mul(1.0, index.starting[&key]);
        gkp_bench_cost.add_mul(row.cost, index.bench[&key]);
    }
    constraints.push(gkp_starting.eq(1.0));
    constraints.push(gkp_bench_cost.leq(rules.bench_gkp_cost_cap));

    // Squad-wide position quotas (starting + bench).
    for position in Position::ALL {
        let mut in_squad = Expression::default();
        for row in pool.iter().filter(|r| r.position == position) {
            let key = (row.player_id, t);
            in_squad.add_mul(1.0, index.starting[&key]);
            in_squad.add_mul(1.0, index.bench[&key]);
        }
        constraints.push(in_squad.eq(rules.quotas.quota(position) as f64));
    }
}

/// Transfer bookkeeping between consecutive modeled gameweeks: the binaries
/// must cover any membership change, and each direction is capped per gameweek.
fn add_transfer_constraints(
    rules: &SquadRules,
    index: &VarIndex,
    constraints: &mut Vec<Constraint>,
) {
    for window in index.periods.windows(2) {
        let (prev, t) = (window[0], window[1]);

        let mut in_sum = Expression::default();
        let mut out_sum = Expression::default();
        let players: Vec<PlayerId> = index
            .transfer_in
            .keys()
            .filter(|&&(_, gameweek)| gameweek == t)
            .map(|&(player, _)| player)
            .collect();

        for &player in &players {
            let transfer_in = index.transfer_in[&(player, t)];
            let transfer_out = index.transfer_out[&(player, t)];
            in_sum.add_mul(1.0, transfer_in);
            out_sum.add_mul(1.0, transfer_out);

            let before = index.membership(player, prev);
            let after = index.membership(player, t);
            constraints.push((var_expr(transfer_out) - before.clone() + after.clone()).geq(0.0));
            constraints.push((var_expr(transfer_in) - after + before).geq(0.0));
        }

        constraints.push(in_sum.leq(rules.transfer_cap as f64));
        constraints.push(out_sum.leq(rules.transfer_cap as f64));
    }
}

/// Decayed expected points over every optimised gameweek:
/// `decay^offset * pts * (starting + bench_weight*bench + captain + 0.1*vice)`.
fn build_objective(
    table: &ProjectionTable,
    weights: &ObjectiveWeights,
    index: &VarIndex,
    start: Gameweek,
) -> Expression {
    let mut objective = Expression::default();
    for &t in index.periods.iter().filter(|&&t| t >= start) {
        let decay = weights.time_decay.powi((t - start) as i32);
        for row in table.players_at(t) {
            let key = (row.player_id, t);
            let points = row.expected_points * decay;
            let bench_weight = match row.position {
                Position::Gkp => weights.gkp_bench_weight,
                _ => weights.bench_weight,
            };
            objective.add_mul(points, index.starting[&key]);
            objective.add_mul(points * bench_weight, index.bench[&key]);
            objective.add_mul(points, index.captain[&key]);
            objective.add_mul(points * 0.1, index.vice_captain[&key]);
        }
    }
    objective
}

fn var_expr(var: Variable) -> Expression {
    let mut expr = Expression::default();
    expr.add_mul(1.0, var);
    expr
}

fn bool_coeff(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
