//! Official FPL API client.
//!
//! Fetches the player pool from `/bootstrap-static/` and a held squad from
//! `/entry/{id}/event/{gw}/picks`. Responses are parsed through typed serde
//! structs so a format change fails loudly rather than producing garbage rows.
//! Transient network failures are retried a bounded number of times with
//! backoff; everything else surfaces as a structured [`DataError`].

use crate::reconcile::canonical_api_name;
use serde::{Deserialize, Serialize};
use squadlab_core::domain::{
    Gameweek, PlayerId, Position, SnapshotEntry, SquadRole, SquadSnapshot,
};
use std::time::Duration;
use thiserror::Error;

/// Three-letter club codes, indexed by the API's 1-based team id.
pub const CLUB_CODES: [&str; 20] = [
    "ARS", "AST", "BOU", "BRE", "BRI", "CHE", "CRY", "EVE", "FUL", "IPS", "LEI", "LIV", "MCI",
    "MUN", "NEW", "NOT", "SOU", "TOT", "WHM", "WOL",
];

/// Games in a season, used to spread season-to-date minutes per gameweek.
const SEASON_GAMES: f64 = 38.0;

/// Structured errors for data acquisition.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("no picks recorded for entry {team_id} at gameweek {gameweek}")]
    NoPicks { team_id: u64, gameweek: Gameweek },
}

/// One cleaned player row from the official API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPlayerRow {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub club: String,
    pub expected_points: f64,
    pub expected_minutes: f64,
    pub cost: f64,
    /// Probability the player misses the next round, from the API's
    /// chance-of-playing field.
    pub prob_injury: f64,
}

#[derive(Debug, Deserialize)]
struct BootstrapResponse {
    elements: Vec<ApiElement>,
}

#[derive(Debug, Deserialize)]
struct ApiElement {
    id: u32,
    web_name: String,
    element_type: u8,
    team: u8,
    /// Tenths of a currency unit (55 = 5.5).
    now_cost: u32,
    /// The API serializes this number as a string.
    ep_next: Option<String>,
    chance_of_playing_next_round: Option<f64>,
    minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PicksResponse {
    picks: Vec<ApiPick>,
}

#[derive(Debug, Deserialize)]
struct ApiPick {
    element: u32,
    multiplier: u8,
    is_captain: bool,
    is_vice_captain: bool,
}

/// Blocking client for the official API.
pub struct FplClient {
    client: reqwest::blocking::Client,
    base_url: String,
    cookie: Option<String>,
    max_retries: u32,
    base_delay: Duration,
}

impl FplClient {
    pub fn new(base_url: impl Into<String>, cookie: Option<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("squadlab/0.1")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            cookie,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Fetch and clean the full player pool.
    pub fn bootstrap(&self) -> Result<Vec<ApiPlayerRow>, DataError> {
        let endpoint = format!("{}/bootstrap-static/", self.base_url);
        let response: BootstrapResponse = self.get_json(&endpoint)?;

        let mut rows = Vec::with_capacity(response.elements.len());
        for element in response.elements {
            rows.push(clean_element(element)?);
        }
        rows.sort_by(|a, b| {
            b.expected_points
                .partial_cmp(&a.expected_points)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.cost.partial_cmp(&a.cost).unwrap_or(std::cmp::Ordering::Equal))
        });
        Ok(rows)
    }

    /// Fetch the squad an entry fielded at a (historic) gameweek.
    pub fn entry_picks(
        &self,
        team_id: u64,
        gameweek: Gameweek,
    ) -> Result<SquadSnapshot, DataError> {
        let endpoint = format!("{}/entry/{team_id}/event/{gameweek}/picks", self.base_url);
        let response: PicksResponse = self.get_json(&endpoint)?;

        if response.picks.is_empty() {
            return Err(DataError::NoPicks { team_id, gameweek });
        }

        let entries = response
            .picks
            .into_iter()
            .map(|pick| SnapshotEntry {
                player_id: PlayerId(pick.element),
                role: if pick.multiplier == 0 { SquadRole::Bench } else { SquadRole::Starting },
                is_captain: pick.is_captain,
                is_vice_captain: pick.is_vice_captain,
            })
            .collect();
        Ok(SquadSnapshot::new(gameweek, entries))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
            }

            let mut request = self.client.get(endpoint);
            if let Some(cookie) = &self.cookie {
                request = request.header(reqwest::header::COOKIE, cookie.clone());
            }

            match request.send() {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(DataError::HttpStatus {
                            status: status.as_u16(),
                            endpoint: endpoint.to_string(),
                        });
                    }
                    return response.json::<T>().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse {endpoint}: {e}"
                        ))
                    });
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DataError::NetworkUnreachable("max retries exceeded".into())))
    }
}

fn clean_element(element: ApiElement) -> Result<ApiPlayerRow, DataError> {
    let position = match element.element_type {
        1 => Position::Gkp,
        2 => Position::Def,
        3 => Position::Mid,
        4 => Position::Fwd,
        other => {
            return Err(DataError::ResponseFormatChanged(format!(
                "unknown element_type {other} for player {}",
                element.id
            )))
        }
    };

    let club = (element.team as usize)
        .checked_sub(1)
        .and_then(|idx| CLUB_CODES.get(idx))
        .ok_or_else(|| {
            DataError::ResponseFormatChanged(format!(
                "unknown team id {} for player {}",
                element.team, element.id
            ))
        })?
        .to_string();

    let id = PlayerId(element.id);
    let expected_points =
        element.ep_next.as_deref().and_then(|s| s.parse::<f64>().ok()).unwrap_or(0.0);
    let prob_injury = 1.0 - element.chance_of_playing_next_round.unwrap_or(100.0) / 100.0;

    Ok(ApiPlayerRow {
        name: canonical_api_name(id, &element.web_name),
        player_id: id,
        position,
        club,
        expected_points,
        expected_minutes: element.minutes.unwrap_or(0.0) / SEASON_GAMES,
        cost: element.now_cost as f64 / 10.0,
        prob_injury,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: u32, element_type: u8, team: u8) -> ApiElement {
        ApiElement {
            id,
            web_name: "Saka".into(),
            element_type,
            team,
            now_cost: 87,
            ep_next: Some("6.3".into()),
            chance_of_playing_next_round: Some(75.0),
            minutes: Some(1900.0),
        }
    }

    #[test]
    fn element_cleaning_maps_codes_and_scales() {
        let row = clean_element(element(100, 3, 1)).unwrap();
        assert_eq!(row.position, Position::Mid);
        assert_eq!(row.club, "ARS");
        assert_eq!(row.cost, 8.7);
        assert_eq!(row.expected_points, 6.3);
        assert!((row.prob_injury - 0.25).abs() < 1e-9);
        assert!((row.expected_minutes - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_position_or_team_is_a_format_change() {
        assert!(matches!(
            clean_element(element(1, 9, 1)),
            Err(DataError::ResponseFormatChanged(_))
        ));
        assert!(matches!(
            clean_element(element(1, 1, 21)),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn missing_ep_next_defaults_to_zero() {
        let mut e = element(1, 4, 5);
        e.ep_next = None;
        assert_eq!(clean_element(e).unwrap().expected_points, 0.0);
    }
}
