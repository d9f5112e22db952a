//! Gravitational retrieval — memories pull on the current situation.
//!
//! Every stored memory exerts a scalar pull on a situation descriptor:
//!
//! ```text
//! pull = mass × max(0, cos(memory, situation)) × temporal_weight
//!             × (1 + location_bonus) × context_multiplier
//! ```
//!
//! Negative emotional similarity never produces negative pull. Retrieval
//! ranks memories by descending pull (stable, so ties keep input order)
//! and drops anything at or below the configured floor.

use chrono::{Days, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::config::RetrievalConfig;
use crate::crystallizer::CoreMemory;
use crate::types::{EmotionalVector, PullScore};

/// Coarse location categories used for the partial location bonus.
const LOCATION_TYPES: [&str; 6] = ["dungeon", "tavern", "town", "forest", "cave", "catacomb"];

/// A descriptor of the current situation a companion finds itself in.
#[derive(Debug, Clone, Default)]
pub struct Situation {
    /// Explicit emotional hints. When present they define the situation
    /// vector outright and no keyword derivation runs.
    pub emotions: Option<EmotionalVector>,
    /// Free-form tag of what is happening ("healing", "combat", ...).
    pub action_type: Option<String>,
    /// How dangerous the situation is, 0.0 to 1.0.
    pub danger_level: f32,
    /// Whether this is a social scene.
    pub social_context: bool,
    /// Current location label.
    pub location: Option<String>,
    /// Whether combat is underway.
    pub in_combat: bool,
    /// Overall emotional intensity of the scene, 0.0 to 1.0.
    pub emotional_intensity: f32,
}

impl Situation {
    /// Derive the situation's emotional vector.
    ///
    /// Explicit hints take precedence; otherwise the vector is nudged
    /// from the action-type keywords, danger level, and social flag.
    #[must_use]
    pub fn emotional_vector(&self) -> EmotionalVector {
        if let Some(hints) = self.emotions {
            return hints;
        }

        let mut vector = EmotionalVector::new();
        use crate::types::EmotionAxis::{Fear, Intimacy, Respect, Trust};

        if let Some(action) = &self.action_type {
            let action = action.to_lowercase();
            if action.contains("heal") || action.contains("help") {
                vector.add(Trust, 0.3);
                vector.add(Intimacy, 0.1);
            } else if action.contains("fight") || action.contains("combat") {
                vector.add(Trust, 0.2);
                vector.add(Respect, 0.2);
            } else if action.contains("talk") || action.contains("convers") {
                vector.add(Intimacy, 0.2);
            } else if action.contains("threat") || action.contains("danger") {
                vector.add(Fear, 0.3);
                vector.add(Trust, 0.2);
            }
        }

        if self.danger_level > 0.5 {
            vector.add(Fear, 0.2);
            vector.add(Trust, 0.1);
        }

        if self.social_context {
            vector.add(Intimacy, 0.1);
            vector.add(Respect, 0.1);
        }

        vector
    }
}

/// A memory paired with the pull it exerted on a situation.
#[derive(Debug, Clone)]
pub struct ScoredMemory {
    /// The retrieved memory.
    pub memory: CoreMemory,
    /// Its gravitational pull on the queried situation.
    pub pull: PullScore,
}

/// Gravitational view of one memory.
#[derive(Debug, Clone, Copy)]
pub struct MemoryGravity<'a> {
    memory: &'a CoreMemory,
}

impl<'a> MemoryGravity<'a> {
    /// Wrap a memory for pull calculations.
    #[must_use]
    pub fn new(memory: &'a CoreMemory) -> Self {
        Self { memory }
    }

    /// Scalar pull of this memory on `situation`.
    ///
    /// Without a reference clock the temporal weight is neutral (1.0).
    #[must_use]
    pub fn pull(&self, situation: &Situation, now: Option<NaiveDateTime>) -> f32 {
        let situation_vector = situation.emotional_vector();
        let similarity = self.memory.emotional_delta.resonance(&situation_vector);

        self.memory.mass
            * similarity.max(0.0)
            * self.temporal_weight(now)
            * (1.0 + self.location_bonus(situation))
            * self.context_multiplier(situation)
    }

    /// Weight from memory age: older memories weigh more, scaled by the
    /// memory's own decay resistance and clamped to [0.5, 2.0].
    fn temporal_weight(&self, now: Option<NaiveDateTime>) -> f32 {
        let Some(now) = now else {
            return 1.0;
        };
        let Some(memory_time) = parse_game_timestamp(&self.memory.timestamp) else {
            return 1.0;
        };

        let days_old = (now - memory_time).num_days().max(0) as f32;
        let weight = (days_old + 1.0).ln() * self.memory.decay_resistance;
        weight.clamp(0.5, 2.0)
    }

    /// +0.5 for an exact location match, +0.2 for the same coarse
    /// location category, else 0.
    fn location_bonus(&self, situation: &Situation) -> f32 {
        let Some(current) = situation.location.as_deref() else {
            return 0.0;
        };
        if current.is_empty() {
            return 0.0;
        }

        let current = current.to_lowercase();
        let stored = self.memory.location.to_lowercase();
        if current == stored {
            return 0.5;
        }
        for location_type in LOCATION_TYPES {
            if current.contains(location_type) && stored.contains(location_type) {
                return 0.2;
            }
        }
        0.0
    }

    /// Compounding contextual multipliers: combat affinity, cascade
    /// weight under emotional intensity, and a small recency factor from
    /// the memory's interaction index.
    fn context_multiplier(&self, situation: &Situation) -> f32 {
        let mut multiplier = 1.0;

        if situation.in_combat && self.memory.context.to_lowercase().contains("combat") {
            multiplier *= 1.3;
        }

        if self.memory.cascade.is_some() && situation.emotional_intensity > 0.5 {
            multiplier *= 1.4;
        }

        if self.memory.interaction_number > 0 {
            let capped = self.memory.interaction_number.min(10) as f32;
            multiplier *= 1.0 + 0.01 * capped;
        }

        multiplier
    }
}

/// System for retrieving memories by gravitational pull.
#[derive(Debug, Clone)]
pub struct GravitationalRetrieval {
    pull_floor: f32,
    resonance_threshold: f32,
    chain_similarity: f32,
    max_chain_length: usize,
}

impl GravitationalRetrieval {
    /// Create a retrieval system with the given configuration.
    #[must_use]
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            pull_floor: config.pull_floor,
            resonance_threshold: config.resonance_threshold,
            chain_similarity: config.chain_similarity,
            max_chain_length: config.max_chain_length,
        }
    }

    /// The minimum pull for a memory to count as relevant.
    #[must_use]
    pub fn pull_floor(&self) -> f32 {
        self.pull_floor
    }

    /// The most relevant memories for `situation`, strongest pull first.
    ///
    /// Only memories whose pull strictly exceeds the floor are returned,
    /// at most `max_memories` of them. The sort is stable: equal pulls
    /// keep their input order.
    #[must_use]
    pub fn retrieve(
        &self,
        memories: &[CoreMemory],
        situation: &Situation,
        now: Option<NaiveDateTime>,
        max_memories: usize,
    ) -> Vec<ScoredMemory> {
        let mut scored: Vec<ScoredMemory> = memories
            .iter()
            .filter_map(|memory| {
                let pull = MemoryGravity::new(memory).pull(situation, now);
                (pull > self.pull_floor).then(|| ScoredMemory {
                    memory: memory.clone(),
                    pull: PullScore::new(pull),
                })
            })
            .collect();

        scored.sort_by_key(|entry| std::cmp::Reverse(entry.pull));
        scored.truncate(max_memories);
        scored
    }

    /// All memories whose emotional direction resonates with `state`
    /// above the resonance threshold. No ordering beyond the filter.
    #[must_use]
    pub fn resonant_memories(
        &self,
        memories: &[CoreMemory],
        state: &EmotionalVector,
    ) -> Vec<CoreMemory> {
        memories
            .iter()
            .filter(|memory| memory.emotional_delta.resonance(state) > self.resonance_threshold)
            .cloned()
            .collect()
    }

    /// Greedily group memories into ordered runs where each consecutive
    /// pair's cosine similarity exceeds the chain threshold. Each memory
    /// joins at most one chain; single-element runs are dropped.
    #[must_use]
    pub fn memory_chains(&self, memories: &[CoreMemory]) -> Vec<Vec<CoreMemory>> {
        let mut chains = Vec::new();
        let mut used: HashSet<&str> = HashSet::new();

        for (i, memory) in memories.iter().enumerate() {
            if used.contains(memory.id.as_str()) {
                continue;
            }

            let mut chain = vec![memory.clone()];
            used.insert(memory.id.as_str());
            let mut current = memory.emotional_delta;

            for other in &memories[i + 1..] {
                if used.contains(other.id.as_str()) {
                    continue;
                }
                if current.cosine_similarity(&other.emotional_delta) > self.chain_similarity {
                    chain.push(other.clone());
                    used.insert(other.id.as_str());
                    current = other.emotional_delta;
                    if chain.len() >= self.max_chain_length {
                        break;
                    }
                }
            }

            if chain.len() > 1 {
                chains.push(chain);
            }
        }

        chains
    }
}

impl Default for GravitationalRetrieval {
    fn default() -> Self {
        Self::new(&RetrievalConfig::default())
    }
}

/// Parse a game timestamp like `"1492 Springmonth 1 10:36:00"` into a
/// relative point on an arbitrary base date: days since campaign start at
/// 365 days per game year. Returns `None` for anything else, which
/// degrades the temporal weight to neutral.
#[must_use]
pub fn parse_game_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = timestamp.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    let year: i64 = parts[0].parse().unwrap_or(1492);
    let day: u64 = parts[2].parse().unwrap_or(1);

    let base = NaiveDate::from_ymd_opt(2024, 1, 1)?;
    let offset_days = (year - 1492).max(0) as u64 * 365 + day;
    base.checked_add_days(Days::new(offset_days))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
