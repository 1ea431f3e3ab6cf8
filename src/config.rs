use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SEARCH_DEPTH: u8 = 8;

/// How the searcher scores a node whose side to move has no legal move
/// while the game is still going.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassRule {
    /// Score the position statically. No depth is charged and the
    /// opponent does not move again at this node.
    #[default]
    Evaluate,
    /// Treat the pass as a move: the other side moves at depth - 1.
    ConsumePly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub depth: u8,
    /// Wall-clock budget per AI move. `None` runs one fixed-depth search.
    pub time_limit_ms: Option<u64>,
    pub pass_rule: PassRule,
}

impl SearchConfig {
    pub fn with_depth(depth: u8) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            time_limit_ms: None,
            pass_rule: PassRule::Evaluate,
        }
    }
}

/// Everything a host passes when opening a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub search: SearchConfig,
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.search.validate()?;
        Ok(config)
    }
}
