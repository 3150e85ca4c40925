//! Planner configuration — a TOML file with serde defaults for every knob.
//!
//! The recognized options mirror the optimiser's configuration surface; rule
//! constants live under `[rules]` so a season rule change is a config edit.

use serde::{Deserialize, Serialize};
use squadlab_core::domain::SquadRules;
use squadlab_core::optimiser::{ObjectiveWeights, SolverOptions};
use squadlab_core::pricing::PriceParams;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Full planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub plan: PlanSection,
    #[serde(default)]
    pub rules: RulesSection,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub data: DataSection,
}

/// Optimiser knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSection {
    /// Gameweeks to plan over.
    pub horizon: u8,
    pub bench_weight: f64,
    pub gkp_bench_weight: f64,
    pub time_decay: f64,
    pub max_price_step: f64,
    pub price_sensitivity: f64,
    pub use_price_model: bool,
    pub enforce_continuity: bool,
    pub transfer_cap: u32,
    /// Solver wall-clock budget in seconds (CBC backend only).
    pub time_limit_secs: Option<u64>,
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            horizon: 3,
            bench_weight: 0.5,
            gkp_bench_weight: 0.1,
            time_decay: 1.0,
            max_price_step: 0.3,
            price_sensitivity: 0.3,
            use_price_model: true,
            enforce_continuity: false,
            transfer_cap: 1,
            time_limit_secs: None,
        }
    }
}

/// Squad-rule constants (the rest of [`SquadRules`] keeps its defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSection {
    pub budget: f64,
    pub club_limit: usize,
    pub bench_gkp_cost_cap: f64,
}

impl Default for RulesSection {
    fn default() -> Self {
        Self { budget: 100.0, club_limit: 3, bench_gkp_cost_cap: 4.0 }
    }
}

/// Official-API access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    /// The entry (team) id used by the picks endpoint.
    pub team_id: Option<u64>,
    /// Season label, e.g. "24/25"; used in data filenames.
    pub season: String,
    /// Session cookie for authenticated endpoints.
    pub cookie: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "https://fantasy.premierleague.com/api".into(),
            team_id: None,
            season: "24/25".into(),
            cookie: None,
        }
    }
}

/// Where CSV artifacts live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    pub dir: PathBuf,
}

impl Default for DataSection {
    fn default() -> Self {
        Self { dir: PathBuf::from("data") }
    }
}

impl PlannerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let plan = &self.plan;
        if plan.horizon < 1 {
            return Err(ConfigError::Invalid("horizon must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&plan.bench_weight) {
            return Err(ConfigError::Invalid(format!(
                "bench_weight {} outside [0, 1]",
                plan.bench_weight
            )));
        }
        if !(0.0..=1.0).contains(&plan.gkp_bench_weight) {
            return Err(ConfigError::Invalid(format!(
                "gkp_bench_weight {} outside [0, 1]",
                plan.gkp_bench_weight
            )));
        }
        if !(plan.time_decay > 0.0 && plan.time_decay <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "time_decay {} outside (0, 1]",
                plan.time_decay
            )));
        }
        if plan.max_price_step < 0.0 {
            return Err(ConfigError::Invalid("max_price_step must be >= 0".into()));
        }
        if plan.price_sensitivity <= 0.0 {
            return Err(ConfigError::Invalid("price_sensitivity must be > 0".into()));
        }
        if self.rules.budget <= 0.0 {
            return Err(ConfigError::Invalid("budget must be positive".into()));
        }
        Ok(())
    }

    pub fn weights(&self) -> ObjectiveWeights {
        ObjectiveWeights {
            bench_weight: self.plan.bench_weight,
            gkp_bench_weight: self.plan.gkp_bench_weight,
            time_decay: self.plan.time_decay,
        }
    }

    pub fn squad_rules(&self) -> SquadRules {
        SquadRules {
            budget: self.rules.budget,
            club_limit: self.rules.club_limit,
            bench_gkp_cost_cap: self.rules.bench_gkp_cost_cap,
            transfer_cap: self.plan.transfer_cap,
            ..SquadRules::default()
        }
    }

    /// Price model parameters, or `None` when the model is switched off
    /// (costs then replicate the snapshot across the horizon).
    pub fn price_params(&self) -> Option<PriceParams> {
        self.plan.use_price_model.then(|| PriceParams {
            max_step: self.plan.max_price_step,
            sensitivity: self.plan.price_sensitivity,
        })
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions { time_limit: self.plan.time_limit_secs.map(Duration::from_secs) }
    }

    /// Season label for filenames: "24/25" → "24_25".
    pub fn season_label(&self) -> String {
        self.api.season.replace('/', "_")
    }

    /// Deterministic content hash of the effective configuration, used to name
    /// run directories so identical runs land in the same place.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("PlannerConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
