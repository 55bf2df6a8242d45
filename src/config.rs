//! Board configuration.
//!
//! Read from a TOML file; every field has a default so an empty file
//! (or no file) yields a working configuration.
//!
//! # Configuration File Format
//!
//! ```toml
//! [advisory]
//! optimize_url = "http://localhost:8000/optimize"
//! simulate_url = "http://localhost:8000/generate-scenarios"
//! timeout_secs = 60
//!
//! [engine]
//! reference_policy = "best_effort"   # or "strict"
//!
//! [layout]
//! nudge_step = 5.0
//! default_offset = 10.0
//! default_width = 20.0
//! shrink_factor = 0.6
//! # jitter_seed = 42               # seeded random nudges instead of alternating
//!
//! [cards]
//! reasoning_collapse_chars = 120
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::engine::{FixedLayout, LayoutPolicy, MutationEngine, ReferencePolicy, SeededJitter};

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse board config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize board config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Top-level board configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub cards: CardConfig,
}

/// Advisory service endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Optimizer endpoint.
    #[serde(default = "default_optimize_url")]
    pub optimize_url: String,
    /// Scenario simulator endpoint.
    #[serde(default = "default_simulate_url")]
    pub simulate_url: String,
    /// Transport timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_optimize_url() -> String {
    "http://localhost:8000/optimize".to_string()
}

fn default_simulate_url() -> String {
    "http://localhost:8000/generate-scenarios".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            optimize_url: default_optimize_url(),
            simulate_url: default_simulate_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AdvisoryConfig {
    /// Transport timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Mutation engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// What to do when an operation references a missing strip or line.
    #[serde(default)]
    pub reference_policy: ReferencePolicy,
}

/// Presentation-only layout heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Offset change applied by a move (percent).
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f64,
    /// Offset assumed for a strip that has none.
    #[serde(default = "default_offset")]
    pub default_offset: f64,
    /// Width assumed for a strip that has none.
    #[serde(default = "default_width")]
    pub default_width: f64,
    /// Width multiplier applied to a split parent.
    #[serde(default = "default_shrink_factor")]
    pub shrink_factor: f64,
    /// Seed for random nudges. `None` = deterministic alternation.
    #[serde(default)]
    pub jitter_seed: Option<u64>,
}

fn default_nudge_step() -> f64 {
    5.0
}

fn default_offset() -> f64 {
    10.0
}

fn default_width() -> f64 {
    20.0
}

fn default_shrink_factor() -> f64 {
    0.6
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            nudge_step: default_nudge_step(),
            default_offset: default_offset(),
            default_width: default_width(),
            shrink_factor: default_shrink_factor(),
            jitter_seed: None,
        }
    }
}

/// Action card presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Reasoning longer than this is shown collapsed.
    #[serde(default = "default_collapse_chars")]
    pub reasoning_collapse_chars: usize,
}

fn default_collapse_chars() -> usize {
    120
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            reasoning_collapse_chars: default_collapse_chars(),
        }
    }
}

impl BoardConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads configuration from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if !(layout.shrink_factor > 0.0 && layout.shrink_factor <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "layout.shrink_factor",
                message: format!("must be in (0, 1], got {}", layout.shrink_factor),
            });
        }
        if !layout.nudge_step.is_finite() || layout.nudge_step < 0.0 {
            return Err(ConfigError::Invalid {
                field: "layout.nudge_step",
                message: format!("must be a non-negative number, got {}", layout.nudge_step),
            });
        }
        if self.advisory.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "advisory.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Layout policy described by the `[layout]` section.
    pub fn layout_policy(&self) -> Arc<dyn LayoutPolicy> {
        let fixed = FixedLayout::from_config(&self.layout);
        match self.layout.jitter_seed {
            Some(seed) => Arc::new(SeededJitter::new(fixed, seed)),
            None => Arc::new(fixed),
        }
    }

    /// Mutation engine described by this configuration.
    pub fn engine(&self) -> MutationEngine {
        MutationEngine::from_layout(self.layout_policy())
            .with_reference_policy(self.engine.reference_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BoardConfig::from_toml_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.layout.shrink_factor, 0.6);
        assert_eq!(config.cards.reasoning_collapse_chars, 120);
        assert_eq!(config.engine.reference_policy, ReferencePolicy::BestEffort);
    }

    #[test]
    fn test_partial_sections() {
        let config = BoardConfig::from_toml_str(
            r#"
            [engine]
            reference_policy = "strict"

            [layout]
            jitter_seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.reference_policy, ReferencePolicy::Strict);
        assert_eq!(config.layout.jitter_seed, Some(42));
        assert_eq!(config.layout.nudge_step, 5.0);
        assert_eq!(config.advisory.timeout_secs, 60);
    }

    #[test]
    fn test_invalid_shrink_factor() {
        let err = BoardConfig::from_toml_str("[layout]\nshrink_factor = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "layout.shrink_factor",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = BoardConfig::from_toml_str("[advisory]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = BoardConfig::from_toml_str("[engine\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file_and_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[advisory]\noptimize_url = \"http://planner/opt\"").unwrap();

        let config = BoardConfig::load(file.path()).unwrap();
        assert_eq!(config.advisory.optimize_url, "http://planner/opt");

        let text = config.to_toml_string().unwrap();
        assert_eq!(BoardConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig::load_or_default(&dir.path().join("board.toml")).unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BoardConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
