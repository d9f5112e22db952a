//! Memory crystallization — when a moment becomes permanent.
//!
//! A batch of parsed actions is summed into one raw emotional delta. If
//! the delta's magnitude (its *velocity*) reaches the configured
//! threshold, the moment crystallizes into a [`CoreMemory`] carrying mass,
//! decay resistance, and a cascade classification against the companion's
//! recent history. Below the threshold nothing is created — there are no
//! partial memories.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::debug;

use crate::catalogue::Polarity;
use crate::config::CrystallizerConfig;
use crate::parser::{ActionParser, ParsedAction};
use crate::types::EmotionalDelta;

/// How a new memory's emotional direction relates to recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeKind {
    /// Same axes, opposite sign — betrayal after trust.
    Reversal,
    /// Amplification of an existing pattern.
    Confirmation,
    /// A strong push along an unexpected, orthogonal dimension.
    Complexity,
}

impl fmt::Display for CascadeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reversal => "REVERSAL",
            Self::Confirmation => "CONFIRMATION",
            Self::Complexity => "COMPLEXITY",
        };
        f.write_str(name)
    }
}

/// A crystallized, persistent memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreMemory {
    /// Identifier, unique across all companions.
    pub id: String,
    /// Display timestamp of the triggering journal entry.
    pub timestamp: String,
    /// Location label of the triggering journal entry.
    pub location: String,
    /// Companion the memory belongs to.
    pub companion: String,
    /// Deduplicated readable descriptions of the triggering actions.
    pub trigger_actions: Vec<String>,
    /// The raw emotional delta that formed the memory.
    pub emotional_delta: EmotionalDelta,
    /// Magnitude of the delta at crystallization time.
    pub velocity: f32,
    /// Journal excerpt around the companion mention.
    pub excerpt: String,
    /// One-line mechanical context summary.
    pub context: String,
    /// Significance weight for gravitational retrieval.
    pub mass: f32,
    /// How well the memory resists pruning and fading, in (0, 1].
    pub decay_resistance: f32,
    /// Cascade classification against recent history, if any.
    pub cascade: Option<CascadeKind>,
    /// Sequential per-companion interaction index.
    pub interaction_number: u64,
}

impl CoreMemory {
    /// Ranking key used by pruning: stronger and more durable wins.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.velocity * self.decay_resistance
    }
}

/// Running statistics of the crystallization process.
#[derive(Debug, Clone, Serialize)]
pub struct CrystallizationStats {
    /// The configured velocity threshold.
    pub threshold: f32,
    /// Memories created across all companions.
    pub total_memories_created: u64,
    /// Crystallization attempts per companion.
    pub interaction_counts: BTreeMap<String, u64>,
}

/// Crystallizes high-velocity emotional moments into permanent memories.
#[derive(Debug, Clone)]
pub struct MemoryCrystallizer {
    threshold: f32,
    memory_counter: u64,
    interaction_counts: HashMap<String, u64>,
}

impl MemoryCrystallizer {
    /// Create a crystallizer with the given configuration.
    #[must_use]
    pub fn new(config: &CrystallizerConfig) -> Self {
        Self {
            threshold: config.crystallization_threshold,
            memory_counter: 0,
            interaction_counts: HashMap::new(),
        }
    }

    /// The configured velocity threshold.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Evaluate one interaction's actions and crystallize a memory if the
    /// summed delta's velocity reaches the threshold.
    ///
    /// `existing` is the companion's current memory list, used for cascade
    /// detection against the most recent entries.
    pub fn crystallize(
        &mut self,
        actions: &[ParsedAction],
        companion: &str,
        location: &str,
        timestamp: &str,
        excerpt: &str,
        existing: &[CoreMemory],
    ) -> Option<CoreMemory> {
        if actions.is_empty() {
            return None;
        }

        let interaction_number = {
            let count = self
                .interaction_counts
                .entry(companion.to_string())
                .or_insert(0);
            *count += 1;
            *count
        };

        let delta = ActionParser::summarize_impact(actions);
        let velocity = delta.magnitude();

        if velocity < self.threshold {
            debug!(
                companion,
                velocity,
                threshold = self.threshold,
                "below crystallization threshold"
            );
            return None;
        }

        let cascade = detect_cascade(&delta, existing);
        let mass = memory_mass(velocity, cascade);
        let decay_resistance = decay_resistance(velocity, actions.len(), cascade);

        // First-occurrence order keeps the list deterministic.
        let mut seen = HashSet::new();
        let trigger_actions: Vec<String> = actions
            .iter()
            .map(|action| action.description.to_string())
            .filter(|description| seen.insert(description.clone()))
            .collect();

        self.memory_counter += 1;
        let id = format!(
            "{}_mem_{:03}",
            companion.to_lowercase().replace(' ', "_"),
            self.memory_counter
        );

        let mut excerpt = excerpt.to_string();
        if excerpt.len() > 200 {
            excerpt.truncate(floor_boundary(&excerpt, 200));
        }

        Some(CoreMemory {
            id,
            timestamp: timestamp.to_string(),
            location: location.to_string(),
            companion: companion.to_string(),
            trigger_actions,
            emotional_delta: delta,
            velocity,
            excerpt,
            context: build_context(actions, location),
            mass,
            decay_resistance,
            cascade,
            interaction_number,
        })
    }

    /// Keep only the strongest memories, ranked by velocity × decay
    /// resistance. Lists within capacity are left untouched, order
    /// included.
    pub fn prune_memories(memories: &mut Vec<CoreMemory>, max_count: usize) {
        if memories.len() <= max_count {
            return;
        }
        memories.sort_by_key(|memory| std::cmp::Reverse(OrderedFloat(memory.strength())));
        memories.truncate(max_count);
    }

    /// Snapshot of crystallization statistics.
    #[must_use]
    pub fn stats(&self) -> CrystallizationStats {
        CrystallizationStats {
            threshold: self.threshold,
            total_memories_created: self.memory_counter,
            interaction_counts: self
                .interaction_counts
                .iter()
                .map(|(name, count)| (name.clone(), *count))
                .collect(),
        }
    }

    /// Restore the global memory counter, e.g. after loading persisted
    /// state, so new ids keep increasing.
    pub fn restore_counter(&mut self, total_memories_created: u64) {
        self.memory_counter = self.memory_counter.max(total_memories_created);
    }
}

impl Default for MemoryCrystallizer {
    fn default() -> Self {
        Self::new(&CrystallizerConfig::default())
    }
}

/// Compare the new delta against the most recent (up to 3) memories,
/// most recent first; the first match decides.
fn detect_cascade(delta: &EmotionalDelta, existing: &[CoreMemory]) -> Option<CascadeKind> {
    for memory in existing.iter().rev().take(3) {
        let similarity = delta.cosine_similarity(&memory.emotional_delta);
        if similarity < -0.7 {
            return Some(CascadeKind::Reversal);
        }
        if similarity > 0.8 {
            return Some(CascadeKind::Confirmation);
        }
        if similarity.abs() < 0.2 && delta.magnitude() > 0.3 {
            return Some(CascadeKind::Complexity);
        }
    }
    None
}

/// Mass for the gravitational system. Cascades create heavier memories.
fn memory_mass(velocity: f32, cascade: Option<CascadeKind>) -> f32 {
    let multiplier = match cascade {
        Some(CascadeKind::Reversal) => 1.5,
        Some(CascadeKind::Complexity) => 1.3,
        Some(CascadeKind::Confirmation) => 1.2,
        None => 1.0,
    };
    velocity * multiplier
}

/// How well the memory resists fading, in [0, 1].
fn decay_resistance(velocity: f32, action_count: usize, cascade: Option<CascadeKind>) -> f32 {
    let mut resistance = (velocity * 1.5).min(1.0);
    resistance += (action_count as f32 * 0.05).min(0.2);
    if matches!(cascade, Some(CascadeKind::Reversal | CascadeKind::Complexity)) {
        resistance += 0.2;
    }
    resistance.clamp(0.0, 1.0)
}

fn build_context(actions: &[ParsedAction], location: &str) -> String {
    let has_positive = actions.iter().any(|a| a.polarity == Polarity::Positive);
    let has_negative = actions.iter().any(|a| a.polarity == Polarity::Negative);
    match (has_positive, has_negative) {
        (true, true) => format!("Mixed interactions at {location}"),
        (true, false) => format!("Positive interaction at {location}"),
        (false, true) => format!("Negative encounter at {location}"),
        (false, false) => format!("Interaction at {location}"),
    }
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionAxis;

    fn action(description: &'static str, impact: &[(EmotionAxis, f32)]) -> ParsedAction {
        ParsedAction {
            pattern: description,
            description,
            impact: EmotionalDelta::from_axes(impact),
            context: String::new(),
            companion: "Kira".to_string(),
            polarity: Polarity::Positive,
        }
    }

    fn negative_action(description: &'static str, impact: &[(EmotionAxis, f32)]) -> ParsedAction {
        ParsedAction {
            polarity: Polarity::Negative,
            ..action(description, impact)
        }
    }

    fn crystallize_one(
        crystallizer: &mut MemoryCrystallizer,
        actions: &[ParsedAction],
        existing: &[CoreMemory],
    ) -> Option<CoreMemory> {
        crystallizer.crystallize(actions, "Kira", "Market", "Day1 08:00", "excerpt", existing)
    }

    #[test]
    fn velocity_at_threshold_crystallizes() {
        let mut crystallizer = MemoryCrystallizer::default();
        let actions = [action("built trust", &[(EmotionAxis::Trust, 0.35)])];
        let memory = crystallize_one(&mut crystallizer, &actions, &[]);
        assert!(memory.is_some(), "velocity exactly at threshold must crystallize");
    }

    #[test]
    fn velocity_below_threshold_does_not() {
        let mut crystallizer = MemoryCrystallizer::default();
        let actions = [action("built trust", &[(EmotionAxis::Trust, 0.349)])];
        assert!(crystallize_one(&mut crystallizer, &actions, &[]).is_none());
    }

    #[test]
    fn empty_actions_yield_nothing() {
        let mut crystallizer = MemoryCrystallizer::default();
        assert!(crystallize_one(&mut crystallizer, &[], &[]).is_none());
        assert_eq!(crystallizer.stats().total_memories_created, 0);
    }

    #[test]
    fn reversal_detected_against_recent_memory() {
        let mut crystallizer = MemoryCrystallizer::default();
        let prior_actions = [action("built trust", &[(EmotionAxis::Trust, 0.6)])];
        let prior = crystallize_one(&mut crystallizer, &prior_actions, &[]).expect("prior");

        let betrayal = [negative_action("betrayed trust", &[(EmotionAxis::Trust, -0.5)])];
        let memory = crystallize_one(&mut crystallizer, &betrayal, &[prior]).expect("memory");

        assert_eq!(memory.cascade, Some(CascadeKind::Reversal));
        assert!((memory.mass - memory.velocity * 1.5).abs() < 1e-6);
    }

    #[test]
    fn confirmation_detected_for_aligned_delta() {
        let mut crystallizer = MemoryCrystallizer::default();
        let prior_actions = [action("built trust", &[(EmotionAxis::Trust, 0.5)])];
        let prior = crystallize_one(&mut crystallizer, &prior_actions, &[]).expect("prior");

        let repeat = [action("kept a promise", &[(EmotionAxis::Trust, 0.4)])];
        let memory = crystallize_one(&mut crystallizer, &repeat, &[prior]).expect("memory");
        assert_eq!(memory.cascade, Some(CascadeKind::Confirmation));
        assert!((memory.mass - memory.velocity * 1.2).abs() < 1e-6);
    }

    #[test]
    fn complexity_requires_orthogonality_and_magnitude() {
        let mut crystallizer = MemoryCrystallizer::default();
        let prior_actions = [action("built trust", &[(EmotionAxis::Trust, 0.6)])];
        let prior = crystallize_one(&mut crystallizer, &prior_actions, &[]).expect("prior");

        let orthogonal = [action("made threats", &[(EmotionAxis::Fear, 0.5)])];
        let memory = crystallize_one(&mut crystallizer, &orthogonal, &[prior]).expect("memory");
        assert_eq!(memory.cascade, Some(CascadeKind::Complexity));
    }

    #[test]
    fn most_recent_memory_decides_cascade() {
        let mut crystallizer = MemoryCrystallizer::default();
        let old = crystallize_one(
            &mut crystallizer,
            &[action("built trust", &[(EmotionAxis::Trust, 0.6)])],
            &[],
        )
        .expect("old");
        let recent = crystallize_one(
            &mut crystallizer,
            &[negative_action("betrayed trust", &[(EmotionAxis::Trust, -0.6)])],
            &[],
        )
        .expect("recent");

        // New positive trust delta: REVERSAL against the most recent
        // (negative) memory, even though it confirms the older one.
        let new = crystallize_one(
            &mut crystallizer,
            &[action("kept a promise", &[(EmotionAxis::Trust, 0.5)])],
            &[old, recent],
        )
        .expect("new");
        assert_eq!(new.cascade, Some(CascadeKind::Reversal));
    }

    #[test]
    fn trigger_actions_are_deduplicated() {
        let mut crystallizer = MemoryCrystallizer::default();
        let actions = [
            action("kept watch", &[(EmotionAxis::Trust, 0.2)]),
            action("kept watch", &[(EmotionAxis::Trust, 0.2)]),
            action("tended wounds", &[(EmotionAxis::Trust, 0.3)]),
        ];
        let memory = crystallize_one(&mut crystallizer, &actions, &[]).expect("memory");
        assert_eq!(memory.trigger_actions, vec!["kept watch", "tended wounds"]);
    }

    #[test]
    fn context_reflects_polarities() {
        let mut crystallizer = MemoryCrystallizer::default();
        let mixed = [
            action("tended wounds", &[(EmotionAxis::Trust, 0.3)]),
            negative_action("made threats", &[(EmotionAxis::Fear, 0.4)]),
        ];
        let memory = crystallize_one(&mut crystallizer, &mixed, &[]).expect("memory");
        assert_eq!(memory.context, "Mixed interactions at Market");

        let positive = [action("performed rescue", &[(EmotionAxis::Trust, 0.6)])];
        let memory = crystallize_one(&mut crystallizer, &positive, &[]).expect("memory");
        assert_eq!(memory.context, "Positive interaction at Market");
    }

    #[test]
    fn decay_resistance_is_capped() {
        let mut crystallizer = MemoryCrystallizer::default();
        let actions: Vec<ParsedAction> = (0..8)
            .map(|_| action("performed rescue", &[(EmotionAxis::Trust, 0.6), (EmotionAxis::Respect, 0.5)]))
            .collect();
        let memory = crystallize_one(&mut crystallizer, &actions, &[]).expect("memory");
        assert!(memory.decay_resistance <= 1.0);
        assert!(memory.decay_resistance > 0.0);
    }

    #[test]
    fn ids_increase_across_companions() {
        let mut crystallizer = MemoryCrystallizer::default();
        let actions = [action("performed rescue", &[(EmotionAxis::Trust, 0.6)])];
        let first = crystallizer
            .crystallize(&actions, "Kira", "Market", "Day1 08:00", "e", &[])
            .expect("first");
        let second = crystallizer
            .crystallize(&actions, "Thane", "Market", "Day1 09:00", "e", &[])
            .expect("second");
        assert_eq!(first.id, "kira_mem_001");
        assert_eq!(second.id, "thane_mem_002");
        assert_eq!(first.interaction_number, 1);
        assert_eq!(second.interaction_number, 1, "interaction index is per companion");
    }

    #[test]
    fn prune_keeps_strongest() {
        let mut crystallizer = MemoryCrystallizer::default();
        let mut memories = Vec::new();
        for i in 0..6 {
            let impact = 0.36 + 0.05 * i as f32;
            let actions = [action("built trust", &[(EmotionAxis::Trust, impact)])];
            let memory = crystallizer
                .crystallize(&actions, "Kira", "Market", &format!("Day{i} 08:00"), "e", &memories)
                .expect("memory");
            memories.push(memory);
        }
        let weakest = memories
            .iter()
            .min_by_key(|m| OrderedFloat(m.strength()))
            .expect("weakest")
            .id
            .clone();

        MemoryCrystallizer::prune_memories(&mut memories, 5);
        assert_eq!(memories.len(), 5);
        assert!(memories.iter().all(|m| m.id != weakest));
    }

    #[test]
    fn prune_within_capacity_preserves_order() {
        let mut crystallizer = MemoryCrystallizer::default();
        let mut memories = Vec::new();
        for i in 0..3 {
            let actions = [action("built trust", &[(EmotionAxis::Trust, 0.4 + 0.1 * i as f32)])];
            memories.push(
                crystallizer
                    .crystallize(&actions, "Kira", "Market", &format!("Day{i} 08:00"), "e", &[])
                    .expect("memory"),
            );
        }
        let ids: Vec<String> = memories.iter().map(|m| m.id.clone()).collect();
        MemoryCrystallizer::prune_memories(&mut memories, 5);
        let after: Vec<String> = memories.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, after);
    }
}
