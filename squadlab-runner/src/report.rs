//! Per-gameweek diagnostic report rendering.
//!
//! Pure string construction over a [`PlanOutcome`] — rendering can never touch
//! or mask the optimisation result itself. The carried-in snapshot gameweek
//! gets a one-line note rather than a full diagnostic block.

use squadlab_core::domain::SquadRole;
use squadlab_core::optimiser::{PeriodReport, PlanOutcome};
use std::fmt::Write;

/// Render the full plan, one block per gameweek.
pub fn render_outcome(outcome: &PlanOutcome) -> String {
    let mut out = String::new();
    for period in &outcome.periods {
        if period.pinned {
            let _ = writeln!(
                out,
                "Gameweek {} (carried squad, not re-optimised)\n",
                period.gameweek
            );
            continue;
        }
        out.push_str(&render_period(period));
        out.push('\n');
    }
    let _ = writeln!(out, "Objective value: {:.2}", outcome.objective);
    out
}

fn render_period(period: &PeriodReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Gameweek {}:", period.gameweek);

    for row in &period.rows {
        let marker = if row.is_captain {
            " (C)"
        } else if row.is_vice_captain {
            " (V)"
        } else {
            ""
        };
        let role = match row.role {
            SquadRole::Starting => "",
            SquadRole::Bench => " [bench]",
        };
        let _ = writeln!(
            out,
            "  {:<3} {:<22} {:<3} {:>5.1} {:>5.1}{}{}",
            row.position.code(),
            row.name,
            row.club,
            row.cost,
            row.expected_points,
            marker,
            role,
        );
    }

    let _ = writeln!(out, "Formation: {}", period.formation);
    let _ = writeln!(out, "Total squad cost: {:.1}", period.total_cost);
    let _ = writeln!(out, "   (o/w starting): {:.1}", period.starting_cost);
    let _ = writeln!(out, "   (o/w bench): {:.1}", period.bench_cost);
    let _ = writeln!(out, "Expected points (excl. captain): {:.2}", period.points_without_captain);
    let _ = writeln!(out, "Expected points (incl. captain): {:.2}", period.points_with_captain);
    let _ = writeln!(
        out,
        "Captain: {}",
        period.captain().map(|r| r.name.as_str()).unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "Vice-captain: {}",
        period.vice_captain().map(|r| r.name.as_str()).unwrap_or("-")
    );

    match &period.deltas {
        None => {
            let _ = writeln!(out, "Transferred out: N/A");
            let _ = writeln!(out, "Transferred in: N/A");
            let _ = writeln!(out, "Benched: N/A");
            let _ = writeln!(out, "Promoted: N/A");
        }
        Some(deltas) => {
            let _ = writeln!(out, "Transferred out: {}", join_or_dash(&deltas.transferred_out));
            let _ = writeln!(out, "Transferred in: {}", join_or_dash(&deltas.transferred_in));
            let _ = writeln!(out, "Benched: {}", join_or_dash(&deltas.benched));
            let _ = writeln!(out, "Promoted: {}", join_or_dash(&deltas.promoted));
        }
    }

    out
}

fn join_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
