use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::ConfigError;
use crate::room_map::{RoomMap, RoomSpec};
use crate::rules::{ClueRule, ClueRules, DEFAULT_FALLBACK};

/// Where the mansion and the clue rules come from. `None` means built-in.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub map_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub fallback_suspect: Option<String>,
}

impl GameConfig {
    pub fn load_map(&self) -> Result<RoomMap, ConfigError> {
        let Some(path) = &self.map_path else {
            return Ok(RoomMap::mansion()?);
        };
        let layout: Vec<RoomSpec> = read_json(path)?;
        let map = RoomMap::from_layout(&layout)?;
        info!(path = %path.display(), rooms = map.len(), "loaded room layout");
        Ok(map)
    }

    pub fn load_rules(&self) -> Result<ClueRules, ConfigError> {
        let fallback = self.fallback_suspect.as_deref().unwrap_or(DEFAULT_FALLBACK);
        let Some(path) = &self.rules_path else {
            return Ok(ClueRules::default().with_fallback(fallback));
        };
        let rules: Vec<ClueRule> = read_json(path)?;
        info!(path = %path.display(), rules = rules.len(), "loaded clue rules");
        ClueRules::new(rules, fallback)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
