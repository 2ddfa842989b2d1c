//! Engine configuration loaded from JSON.

use std::path::PathBuf;

use rookery_core::{Tables, TableError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::search::MAX_PLY;

/// Tunable engine settings. Missing keys take their defaults and unknown keys
/// are ignored, so a partial file such as `{"hash_mb": 64}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Pawn hash table slots; rounded down to a power of two.
    pub pawn_hash_entries: usize,
    /// Iterative deepening stops after this depth.
    pub max_depth: u8,
    /// Check extensions allowed along one line.
    pub max_check_extensions: u8,
    /// Drop quiescence captures that lose material by static exchange.
    pub see_pruning: bool,
    /// Directory with `rook-magics.json` and `bishop-magics.json`. The JSON
    /// compiled into the core crate is used when unset.
    pub magics_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: 16,
            pawn_hash_entries: 16_384,
            max_depth: 64,
            max_check_extensions: 16,
            see_pruning: true,
            magics_dir: None,
        }
    }
}

/// Errors from reading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed engine config")]
    Json(#[from] serde_json::Error),
    #[error("hash_mb must be at least 1")]
    ZeroHash,
}

impl EngineConfig {
    /// Parse a JSON document, filling in defaults for missing keys.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: EngineConfig = serde_json::from_str(json)?;
        if config.hash_mb == 0 {
            return Err(ConfigError::ZeroHash);
        }
        let ceiling = (MAX_PLY - 1) as u8;
        if config.max_depth > ceiling {
            warn!(requested = config.max_depth, ceiling, "max_depth clamped");
            config.max_depth = ceiling;
        }
        if config.max_depth == 0 {
            config.max_depth = 1;
        }
        Ok(config)
    }

    /// Attack tables from `magics_dir`, or the embedded magics when unset.
    pub fn tables(&self) -> Result<Tables, TableError> {
        match &self.magics_dir {
            Some(dir) => Tables::load(dir),
            None => Tables::embedded(),
        }
    }
}
