//! Configuration for taskpilot

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PilotError, Result};
use crate::planner::PlanTemplate;
use crate::storage::Backend;

/// Environment variable that overrides the store path.
pub const DB_ENV: &str = "TASKPILOT_DB";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Durable JSON file or transient in-memory store
    #[serde(default)]
    pub backend: Backend,

    /// Location of the JSON database
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Plan shape used when none is given on the command line
    #[serde(default)]
    pub plan_template: PlanTemplate,
}

/// Returns the default database path.
///
/// 1. `~/.local/share/taskpilot/taskpilot.json` (on Linux).
/// 2. `./taskpilot.json` (fallback).
fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("taskpilot").join("taskpilot.json"))
        .unwrap_or_else(|| PathBuf::from("taskpilot.json"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            store_path: default_store_path(),
            plan_template: PlanTemplate::default(),
        }
    }
}

impl Config {
    /// Load config from `path`, or from the first default location that
    /// exists, or fall back to defaults. `TASKPILOT_DB` wins over any file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_paths = [
                    dirs::config_dir().map(|p| p.join("taskpilot").join("config.yml")),
                    Some(PathBuf::from("taskpilot.yml")),
                ];
                match default_paths.iter().flatten().find(|p| p.exists()) {
                    Some(p) => Self::from_file(p)?,
                    None => Config::default(),
                }
            }
        };

        if let Ok(db) = std::env::var(DB_ENV) {
            if !db.trim().is_empty() {
                config.store_path = PathBuf::from(db);
            }
        }
        debug!("using config {:?}", config);
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PilotError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| PilotError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }
}
