use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_PLANNER_CONFIG: &str = include_str!("data/planner_config.json");
pub const CONFIG_PATH_VAR: &str = "PLANNER_CONFIG";

#[derive(Debug,Clone,PartialEq,Eq,Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// None picks the first of several equally-near candidates; Some seeds a random choice among them
    pub tie_break_seed: Option<u64>,
    /// Expand scans rows and columns on alternate turns instead of rows only
    pub alternate_scan_axis: bool,
    pub defensive_builds: bool,
    pub reinforce_frontier: bool,
    /// Append a MESSAGE summarising the turn
    pub status_message: bool,
}
impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tie_break_seed: None,
            alternate_scan_axis: true,
            defensive_builds: true,
            reinforce_frontier: true,
            status_message: false,
        }
    }
}
impl PlannerConfig {
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_PLANNER_CONFIG).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "planner_config.builtin_invalid");
            Self::default()
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        let config = PlannerConfig::from_json_str(&contents)?;
        Ok(config)
    }

    /// The override named by `PLANNER_CONFIG` if there is one and it loads, otherwise the builtin
    pub fn load() -> Self {
        let path = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => return Self::builtin(),
        };

        match Self::from_file(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "planner_config.loaded=override");
                config
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "planner_config.load_failed");
                Self::builtin()
            },
        }
    }
}

#[derive(Debug,Error)]
pub enum ConfigError {
    #[error("failed to parse planner config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read planner config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
