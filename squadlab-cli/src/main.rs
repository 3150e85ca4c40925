//! SquadLab CLI — squad planning over the official API and forecast exports.
//!
//! Commands:
//! - `download` — fetch the player pool for a gameweek and cache it as CSV
//! - `team` — fetch the squad an entry fielded at a gameweek
//! - `plan` — solve a multi-gameweek plan from forecast or cached API data
//! - `backtest` — replay a plan over observed per-gameweek data
//! - `sweep` — compare objective values over a weight grid

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use squadlab_core::domain::{Gameweek, PlayerPeriod};
use squadlab_runner::{
    join_api_identities, load_forecast_csv, manifest_path, plan_path, planning_rows_from_api,
    players_path, read_players_csv, read_snapshot_csv, render_outcome, run_backtest, run_plan,
    snapshot_path, sweep_weights, write_manifest_json, write_plan_csv, write_players_csv,
    write_snapshot_csv, FplClient, PlanManifest, PlannerConfig, SweepGrid,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squadlab", about = "SquadLab CLI — multi-gameweek fantasy squad optimiser")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the player pool from the official API and cache it as CSV.
    Download {
        /// Gameweek the pool is fetched for (used in the filename).
        #[arg(long)]
        gameweek: Gameweek,
    },
    /// Fetch the squad your entry fielded at a (historic) gameweek.
    Team {
        #[arg(long)]
        gameweek: Gameweek,
    },
    /// Solve a plan starting at a gameweek.
    Plan {
        /// First gameweek of the horizon.
        #[arg(long)]
        start: Gameweek,

        /// Forecast CSV with per-gameweek expected points. Falls back to the
        /// cached API pool for the start gameweek when omitted.
        #[arg(long)]
        forecast: Option<PathBuf>,
    },
    /// Replay the optimiser over observed per-gameweek pools.
    Backtest {
        /// First gameweek of the horizon.
        #[arg(long)]
        start: Gameweek,
    },
    /// Compare objective values over a bench-weight / time-decay grid.
    Sweep {
        #[arg(long)]
        start: Gameweek,

        #[arg(long)]
        forecast: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PlannerConfig::default(),
    };

    match cli.command {
        Commands::Download { gameweek } => run_download(&config, gameweek),
        Commands::Team { gameweek } => run_team(&config, gameweek),
        Commands::Plan { start, forecast } => run_plan_cmd(&config, start, forecast),
        Commands::Backtest { start } => run_backtest_cmd(&config, start),
        Commands::Sweep { start, forecast } => run_sweep_cmd(&config, start, forecast),
    }
}

fn run_download(config: &PlannerConfig, gameweek: Gameweek) -> Result<()> {
    let client = FplClient::new(config.api.base_url.clone(), config.api.cookie.clone());
    let rows = client.bootstrap().context("fetching player pool")?;

    std::fs::create_dir_all(&config.data.dir)?;
    let path = players_path(&config.data.dir, &config.season_label(), gameweek);
    write_players_csv(&path, &rows)?;
    println!("Cached {} players to {}", rows.len(), path.display());
    Ok(())
}

fn run_team(config: &PlannerConfig, gameweek: Gameweek) -> Result<()> {
    let Some(team_id) = config.api.team_id else {
        bail!("api.team_id must be set in the config to fetch picks");
    };
    let client = FplClient::new(config.api.base_url.clone(), config.api.cookie.clone());
    let snapshot = client.entry_picks(team_id, gameweek).context("fetching picks")?;

    std::fs::create_dir_all(&config.data.dir)?;
    let path = snapshot_path(&config.data.dir, &config.season_label(), gameweek);
    write_snapshot_csv(&path, &snapshot)?;
    println!("Saved {}-player squad to {}", snapshot.entries.len(), path.display());
    Ok(())
}

fn run_plan_cmd(config: &PlannerConfig, start: Gameweek, forecast: Option<PathBuf>) -> Result<()> {
    let label = config.season_label();
    let players = match &forecast {
        Some(path) => {
            let mut players = load_forecast_csv(path, start, config.plan.horizon)?;
            // Join club codes and element ids when the API pool is cached.
            let api_path = players_path(&config.data.dir, &label, start);
            if api_path.exists() {
                let api_rows = read_players_csv(&api_path)?;
                let matched = join_api_identities(&mut players, &api_rows);
                println!("Joined {matched}/{} forecast rows to the API pool", players.len());
            }
            players
        }
        None => {
            let api_path = players_path(&config.data.dir, &label, start);
            let api_rows = read_players_csv(&api_path)
                .with_context(|| format!("no forecast given and {} not cached — run `squadlab download --gameweek {start}` first", api_path.display()))?;
            planning_rows_from_api(&api_rows, config.plan.horizon)
        }
    };

    let snapshot = if config.plan.enforce_continuity {
        let path = snapshot_path(&config.data.dir, &label, start.saturating_sub(1));
        Some(read_snapshot_csv(&path, start.saturating_sub(1)).with_context(|| {
            format!("continuity requires the prior squad at {}", path.display())
        })?)
    } else {
        None
    };

    let outcome = run_plan(config, &players, start, snapshot.as_ref())?;
    print!("{}", render_outcome(&outcome));

    std::fs::create_dir_all(&config.data.dir)?;
    let plan_file = plan_path(&config.data.dir, &label, start);
    write_plan_csv(&plan_file, &outcome)?;
    write_manifest_json(
        &manifest_path(&config.data.dir, &label, start),
        &PlanManifest {
            run_id: config.run_id(),
            start_gameweek: start,
            horizon: config.plan.horizon,
            objective: outcome.objective,
            generated_at: chrono::Local::now().naive_local(),
        },
    )?;

    let next_snapshot = outcome.final_snapshot();
    let snapshot_file = snapshot_path(&config.data.dir, &label, next_snapshot.gameweek);
    write_snapshot_csv(&snapshot_file, &next_snapshot)?;

    println!("Plan saved to {}", plan_file.display());
    println!("Final squad snapshot saved to {}", snapshot_file.display());
    Ok(())
}

fn run_backtest_cmd(config: &PlannerConfig, start: Gameweek) -> Result<()> {
    let label = config.season_label();
    let mut observed: Vec<(Gameweek, PlayerPeriod)> = Vec::new();
    for offset in 0..config.plan.horizon {
        let gameweek = start + offset;
        let path = players_path(&config.data.dir, &label, gameweek);
        let rows = read_players_csv(&path).with_context(|| {
            format!("backtest needs the observed pool at {}", path.display())
        })?;
        for row in rows {
            observed.push((
                gameweek,
                PlayerPeriod {
                    player_id: row.player_id,
                    name: row.name,
                    position: row.position,
                    club: row.club,
                    expected_points: row.expected_points,
                    expected_minutes: row.expected_minutes,
                    cost: row.cost,
                },
            ));
        }
    }

    let snapshot = if config.plan.enforce_continuity {
        let path = snapshot_path(&config.data.dir, &label, start.saturating_sub(1));
        Some(read_snapshot_csv(&path, start.saturating_sub(1)).with_context(|| {
            format!("continuity requires the prior squad at {}", path.display())
        })?)
    } else {
        None
    };

    let outcome = run_backtest(config, observed, start, snapshot.as_ref())?;
    print!("{}", render_outcome(&outcome));
    Ok(())
}

fn run_sweep_cmd(config: &PlannerConfig, start: Gameweek, forecast: Option<PathBuf>) -> Result<()> {
    let label = config.season_label();
    let players = match &forecast {
        Some(path) => load_forecast_csv(path, start, config.plan.horizon)?,
        None => {
            let api_path = players_path(&config.data.dir, &label, start);
            let api_rows = read_players_csv(&api_path)
                .with_context(|| format!("no forecast given and {} not cached", api_path.display()))?;
            planning_rows_from_api(&api_rows, config.plan.horizon)
        }
    };

    let grid = SweepGrid::default_grid();
    println!("Sweeping {} combinations...", grid.size());
    let rows = sweep_weights(config, &players, start, &grid)?;

    println!("{:<14} {:<12} {:>10}", "bench_weight", "time_decay", "objective");
    println!("{}", "-".repeat(38));
    for row in &rows {
        println!("{:<14} {:<12} {:>10.2}", row.bench_weight, row.time_decay, row.objective);
    }
    Ok(())
}
