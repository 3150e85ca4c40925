//! Forecast CSV loader — turns a cleaned xPts export into planning rows.
//!
//! The cleaned file carries one row per player: `name, position, cost, xmins`
//! followed by one `ep_gw{N}` column per forecast gameweek. Numeric cells that
//! fail to parse default to zero (the export leaves blanks for unprojected
//! gameweeks); a cost of 99.9 is the export's "not in the game" sentinel and
//! drops the row entirely.

use crate::fpl_api::ApiPlayerRow;
use crate::reconcile::canonical_forecast_name;
use squadlab_core::domain::{Gameweek, PlayerId, Position};
use squadlab_core::projections::ForecastPlayer;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Sentinel cost marking a player no longer in the game.
const UNAVAILABLE_COST: f64 = 99.9;

/// Synthetic ids for forecast rows start here so they can never collide with
/// official API element ids before the join.
const SYNTHETIC_ID_BASE: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("cannot read forecast file {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("forecast file is missing column '{0}'")]
    MissingColumn(String),

    #[error("unknown position code '{0}'")]
    UnknownPosition(String),
}

/// Load forecast rows covering `[start, start + horizon)`.
pub fn load_forecast_csv(
    path: &Path,
    start: Gameweek,
    horizon: u8,
) -> Result<Vec<ForecastPlayer>, ForecastError> {
    let file = std::fs::File::open(path).map_err(|source| ForecastError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize, ForecastError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    };

    let name_col = column("name")?;
    let position_col = column("position")?;
    let cost_col = column("cost")?;
    let xmins_col = column("xmins")?;
    let points_cols: Vec<usize> = (0..horizon)
        .map(|offset| column(&format!("ep_gw{}", start + offset)))
        .collect::<Result<_, _>>()?;

    let mut players = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let cost = parse_or_zero(cell(cost_col));
        if (cost - UNAVAILABLE_COST).abs() < 1e-9 {
            continue;
        }

        let position = parse_position(cell(position_col))?;
        let expected_points = points_cols.iter().map(|&idx| parse_or_zero(cell(idx))).collect();

        players.push(ForecastPlayer {
            player_id: PlayerId(SYNTHETIC_ID_BASE + row_idx as u32),
            name: canonical_forecast_name(cell(name_col), position),
            position,
            club: String::new(),
            expected_minutes: parse_or_zero(cell(xmins_col)),
            cost,
            expected_points,
        });
    }

    Ok(players)
}

/// Join forecast rows to official API rows by (canonical name, position),
/// replacing synthetic ids with real element ids and filling in club codes.
/// Returns how many rows matched.
pub fn join_api_identities(players: &mut [ForecastPlayer], api_rows: &[ApiPlayerRow]) -> usize {
    let by_name: HashMap<(&str, Position), &ApiPlayerRow> =
        api_rows.iter().map(|row| ((row.name.as_str(), row.position), row)).collect();

    let mut matched = 0;
    for player in players.iter_mut() {
        if let Some(api) = by_name.get(&(player.name.as_str(), player.position)) {
            player.player_id = api.player_id;
            player.club = api.club.clone();
            matched += 1;
        }
    }
    matched
}

fn parse_or_zero(cell: &str) -> f64 {
    cell.parse::<f64>().unwrap_or(0.0)
}

/// Accepts both the cleaned codes and the raw export's two-letter codes.
fn parse_position(code: &str) -> Result<Position, ForecastError> {
    match code {
        "GKP" | "GK" => Ok(Position::Gkp),
        "DEF" | "DF" => Ok(Position::Def),
        "MID" | "MD" => Ok(Position::Mid),
        "FWD" | "FW" => Ok(Position::Fwd),
        other => Err(ForecastError::UnknownPosition(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_and_defaults_blank_points() {
        let file = write_csv(
            "name,position,cost,xmins,ep_gw10,ep_gw11,ep_gw12\n\
             Haaland,FWD,14.1,88,7.8,,6.9\n\
             Raya,GKP,5.6,90,4.0,4.2,3.9\n",
        );
        let players = load_forecast_csv(file.path(), 10, 3).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Haaland");
        assert_eq!(players[0].expected_points, vec![7.8, 0.0, 6.9]);
        assert_eq!(players[1].position, Position::Gkp);
    }

    #[test]
    fn unavailable_sentinel_drops_the_row() {
        let file = write_csv(
            "name,position,cost,xmins,ep_gw1\n\
             Gone,MID,99.9,0,0\n\
             Here,MID,5.0,80,3.2\n",
        );
        let players = load_forecast_csv(file.path(), 1, 1).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Here");
    }

    #[test]
    fn missing_gameweek_column_is_reported() {
        let file = write_csv("name,position,cost,xmins,ep_gw1\nA,MID,5.0,80,3.2\n");
        let err = load_forecast_csv(file.path(), 1, 2).unwrap_err();
        assert!(matches!(err, ForecastError::MissingColumn(c) if c == "ep_gw2"));
    }

    #[test]
    fn join_replaces_synthetic_ids() {
        let file = write_csv("name,position,cost,xmins,ep_gw1\nSaka,MID,8.7,85,6.1\n");
        let mut players = load_forecast_csv(file.path(), 1, 1).unwrap();
        assert_eq!(players[0].player_id, PlayerId(SYNTHETIC_ID_BASE));

        let api_rows = vec![ApiPlayerRow {
            player_id: PlayerId(300),
            name: "Saka".into(),
            position: Position::Mid,
            club: "ARS".into(),
            expected_points: 6.0,
            expected_minutes: 85.0,
            cost: 8.7,
            prob_injury: 0.0,
        }];
        let matched = join_api_identities(&mut players, &api_rows);
        assert_eq!(matched, 1);
        assert_eq!(players[0].player_id, PlayerId(300));
        assert_eq!(players[0].club, "ARS");
    }
}
