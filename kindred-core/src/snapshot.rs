//! Persistence records for companion session state.
//!
//! The core does no I/O itself. A host application persists one
//! [`CompanionRecord`] per companion however it likes (JSON on disk in
//! the reference setup) and hands records back on load. Bounded values
//! re-clamp on deserialization, so a hand-edited or stale save file can
//! never smuggle an out-of-range axis into a live session.

use serde::{Deserialize, Serialize};

use crate::behavior::BehavioralModel;
use crate::crystallizer::CoreMemory;
use crate::types::EmotionalVector;

/// Serialized session state for one companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionRecord {
    /// Companion name.
    pub companion: String,
    /// The crystallized memory list, in stored order.
    #[serde(default)]
    pub core_memories: Vec<CoreMemory>,
    /// Running emotional state at save time.
    #[serde(default)]
    pub emotional_state: EmotionalVector,
    /// Behavioral trait model at save time.
    #[serde(default)]
    pub behavioral_model: BehavioralModel,
    /// Total entries that mentioned this companion.
    #[serde(default)]
    pub interaction_count: u64,
}

impl CompanionRecord {
    /// Serialize to a JSON string.
    ///
    /// # Errors
    /// Returns `KindredError::Serialization` when encoding fails.
    pub fn to_json(&self) -> crate::error::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::KindredError::Serialization(e.to_string()))
    }

    /// Deserialize from a JSON string, re-clamping bounded values.
    ///
    /// # Errors
    /// Returns `KindredError::Serialization` when decoding fails.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::KindredError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionAxis;

    #[test]
    fn json_roundtrip_preserves_record() {
        let record = CompanionRecord {
            companion: "Kira".to_string(),
            core_memories: Vec::new(),
            emotional_state: EmotionalVector::from_axes(&[(EmotionAxis::Trust, 0.4)]),
            behavioral_model: BehavioralModel::new(),
            interaction_count: 7,
        };
        let json = record.to_json().expect("encode");
        let restored = CompanionRecord::from_json(&json).expect("decode");
        assert_eq!(record, restored);
    }

    #[test]
    fn out_of_range_save_is_clamped_on_load() {
        let json = r#"{
            "companion": "Kira",
            "emotional_state": {"trust": 3.0, "power": 0.0, "intimacy": -1.0, "fear": 0.2, "respect": 0.0},
            "behavioral_model": {"protector_vs_exploiter": -5.0},
            "interaction_count": 1
        }"#;
        let record = CompanionRecord::from_json(json).expect("decode");
        assert!((record.emotional_state.get(EmotionAxis::Trust) - 1.0).abs() < f32::EPSILON);
        assert!(record.emotional_state.get(EmotionAxis::Intimacy).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_fields_default() {
        let record = CompanionRecord::from_json(r#"{"companion": "Elen"}"#).expect("decode");
        assert!(record.core_memories.is_empty());
        assert_eq!(record.interaction_count, 0);
        assert!(record.emotional_state.magnitude().abs() < f32::EPSILON);
    }
}
