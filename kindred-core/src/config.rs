//! Configuration for the companion memory core.
//!
//! Maps directly to `kindred.toml`. Every knob has a default matching the
//! engine's reference tuning, so an empty config is a valid config.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[derive(Default)]
pub struct KindredConfig {
    /// Action parser settings.
    #[serde(default)]
    pub parser: ParserConfig,
    /// Memory crystallization settings.
    #[serde(default)]
    pub crystallizer: CrystallizerConfig,
    /// Per-companion memory list and decay settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Gravitational retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl KindredConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `KindredError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::KindredError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Action parser tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Characters around a companion mention searched for action patterns.
    #[serde(default = "default_150")]
    pub proximity_window: usize,
    /// Characters around a mention kept as the action's context snippet.
    #[serde(default = "default_50")]
    pub context_window: usize,
    /// Characters around a mention kept as a memory's journal excerpt.
    #[serde(default = "default_100")]
    pub excerpt_window: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            proximity_window: 150,
            context_window: 50,
            excerpt_window: 100,
        }
    }
}

/// Memory crystallization tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrystallizerConfig {
    /// Minimum emotional velocity (delta magnitude) that forms a memory.
    #[serde(default = "default_threshold")]
    pub crystallization_threshold: f32,
}

impl Default for CrystallizerConfig {
    fn default() -> Self {
        Self {
            crystallization_threshold: 0.35,
        }
    }
}

/// Per-companion memory list and emotional decay tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Hard cap on core memories kept per companion.
    #[serde(default = "default_5_usize")]
    pub max_memories_per_companion: usize,
    /// Multiplier applied to every emotional axis per elapsed day.
    #[serde(default = "default_daily_decay")]
    pub daily_decay: f32,
    /// Velocity tolerance under which a same-timestamp, same-location
    /// memory counts as a duplicate.
    #[serde(default = "default_dup_tolerance")]
    pub duplicate_velocity_tolerance: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_memories_per_companion: 5,
            daily_decay: 0.97,
            duplicate_velocity_tolerance: 0.01,
        }
    }
}

/// Gravitational retrieval tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum pull for a memory to be considered relevant.
    #[serde(default = "default_pull_floor")]
    pub pull_floor: f32,
    /// Number of memories retrieved per query.
    #[serde(default = "default_3_usize")]
    pub top_k: usize,
    /// Cosine similarity above which a memory resonates with a state.
    #[serde(default = "default_resonance")]
    pub resonance_threshold: f32,
    /// Cosine similarity linking consecutive memories into a chain.
    #[serde(default = "default_chain_similarity")]
    pub chain_similarity: f32,
    /// Maximum memories per detected chain.
    #[serde(default = "default_3_usize")]
    pub max_chain_length: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            pull_floor: 0.1,
            top_k: 3,
            resonance_threshold: 0.6,
            chain_similarity: 0.5,
            max_chain_length: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_threshold() -> f32 { 0.35 }
fn default_daily_decay() -> f32 { 0.97 }
fn default_dup_tolerance() -> f32 { 0.01 }
fn default_pull_floor() -> f32 { 0.1 }
fn default_resonance() -> f32 { 0.6 }
fn default_chain_similarity() -> f32 { 0.5 }
fn default_3_usize() -> usize { 3 }
fn default_5_usize() -> usize { 5 }
fn default_50() -> usize { 50 }
fn default_100() -> usize { 100 }
fn default_150() -> usize { 150 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = KindredConfig::from_toml("").expect("parse");
        assert!((config.crystallizer.crystallization_threshold - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.memory.max_memories_per_companion, 5);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.parser.proximity_window, 150);
    }

    #[test]
    fn partial_toml_overrides_one_field() {
        let config = KindredConfig::from_toml(
            "[crystallizer]\ncrystallization_threshold = 0.5\n",
        )
        .expect("parse");
        assert!((config.crystallizer.crystallization_threshold - 0.5).abs() < f32::EPSILON);
        assert!((config.retrieval.pull_floor - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = KindredConfig::from_toml("[[[").expect_err("must fail");
        assert!(matches!(err, crate::KindredError::Config(_)));
    }
}
