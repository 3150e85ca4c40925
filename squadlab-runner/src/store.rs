//! CSV persistence: player pools, squad snapshots, and plan artifacts.
//!
//! Filenames follow the season-labelled convention of the upstream data drops
//! ("FPL 24_25 season - team GW7.csv"), so artifacts from consecutive runs
//! line up on disk and the final gameweek of one plan round-trips into the
//! continuity snapshot of the next.

use crate::fpl_api::ApiPlayerRow;
use serde::{Deserialize, Serialize};
use squadlab_core::domain::{
    Gameweek, PlayerId, Position, SnapshotEntry, SquadRole, SquadSnapshot,
};
use squadlab_core::optimiser::PlanOutcome;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{path} does not exist")]
    Missing { path: String },

    #[error("io error on {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot parse {path}: {detail}")]
    Parse { path: String, detail: String },
}

/// `data_dir/FPL {label} season - official API GW{gw} data.csv`
pub fn players_path(data_dir: &Path, season_label: &str, gameweek: Gameweek) -> PathBuf {
    data_dir.join(format!("FPL {season_label} season - official API GW{gameweek} data.csv"))
}

/// `data_dir/FPL {label} season - team GW{gw}.csv`
pub fn snapshot_path(data_dir: &Path, season_label: &str, gameweek: Gameweek) -> PathBuf {
    data_dir.join(format!("FPL {season_label} season - team GW{gameweek}.csv"))
}

/// `data_dir/FPL {label} season - plan GW{gw}.csv`
pub fn plan_path(data_dir: &Path, season_label: &str, gameweek: Gameweek) -> PathBuf {
    data_dir.join(format!("FPL {season_label} season - plan GW{gameweek}.csv"))
}

pub fn write_players_csv(path: &Path, rows: &[ApiPlayerRow]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

pub fn read_players_csv(path: &Path) -> Result<Vec<ApiPlayerRow>, StoreError> {
    ensure_exists(path)?;
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// One line of a persisted squad snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    element: u32,
    role: SquadRole,
    is_captain: bool,
    is_vice_captain: bool,
}

pub fn write_snapshot_csv(path: &Path, snapshot: &SquadSnapshot) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for entry in &snapshot.entries {
        writer.serialize(SnapshotRecord {
            element: entry.player_id.0,
            role: entry.role,
            is_captain: entry.is_captain,
            is_vice_captain: entry.is_vice_captain,
        })?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

pub fn read_snapshot_csv(path: &Path, gameweek: Gameweek) -> Result<SquadSnapshot, StoreError> {
    ensure_exists(path)?;
    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = Vec::new();
    for record in reader.deserialize() {
        let record: SnapshotRecord = record?;
        entries.push(SnapshotEntry {
            player_id: PlayerId(record.element),
            role: record.role,
            is_captain: record.is_captain,
            is_vice_captain: record.is_vice_captain,
        });
    }
    Ok(SquadSnapshot::new(gameweek, entries))
}

/// One line of a persisted plan: everything needed to rebuild a snapshot from
/// the final gameweek plus the projection data behind the pick.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanRecord {
    pub gameweek: Gameweek,
    pub element: u32,
    pub name: String,
    pub position: Position,
    pub club: String,
    pub role: SquadRole,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub cost: f64,
    pub expected_points: f64,
}

pub fn write_plan_csv(path: &Path, outcome: &PlanOutcome) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for period in &outcome.periods {
        for row in &period.rows {
            writer.serialize(PlanRecord {
                gameweek: period.gameweek,
                element: row.player_id.0,
                name: row.name.clone(),
                position: row.position,
                club: row.club.clone(),
                role: row.role,
                is_captain: row.is_captain,
                is_vice_captain: row.is_vice_captain,
                cost: row.cost,
                expected_points: row.expected_points,
            })?;
        }
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

/// Sidecar metadata written next to a plan CSV: enough to tell which
/// configuration produced it and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanManifest {
    /// Content hash of the effective configuration.
    pub run_id: String,
    pub start_gameweek: Gameweek,
    pub horizon: u8,
    pub objective: f64,
    pub generated_at: chrono::NaiveDateTime,
}

/// `data_dir/FPL {label} season - plan GW{gw} manifest.json`
pub fn manifest_path(data_dir: &Path, season_label: &str, gameweek: Gameweek) -> PathBuf {
    data_dir.join(format!("FPL {season_label} season - plan GW{gameweek} manifest.json"))
}

pub fn write_manifest_json(path: &Path, manifest: &PlanManifest) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(manifest).expect("PlanManifest serialization failed");
    std::fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_manifest_json(path: &Path) -> Result<PlanManifest, StoreError> {
    ensure_exists(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}

fn ensure_exists(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        return Err(StoreError::Missing { path: path.display().to_string() });
    }
    Ok(())
}
