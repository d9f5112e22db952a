//! Companion memory manager — per-companion orchestration of parsing,
//! crystallization, state decay, and retrieval.
//!
//! The manager owns all per-companion session state in an explicit store
//! keyed by companion name. Journal entries are ingested idempotently: an
//! entry is fingerprinted by date, time, and location, and a repeated
//! fingerprint is skipped with no side effects at all. Degenerate inputs
//! (no summary, no companions, nobody mentioned) degrade to empty
//! results, never errors.

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

use crate::behavior::BehavioralModel;
use crate::config::KindredConfig;
use crate::crystallizer::{CoreMemory, CrystallizationStats, MemoryCrystallizer};
use crate::gravity::{GravitationalRetrieval, Situation};
use crate::parser::ActionParser;
use crate::snapshot::CompanionRecord;
use crate::types::EmotionalVector;

/// One journal entry, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JournalEntry {
    /// Calendar date label ("Day1", "1492 Springmonth 1", ...).
    #[serde(default)]
    pub date: String,
    /// Time-of-day label.
    #[serde(default)]
    pub time: String,
    /// Location label.
    #[serde(default)]
    pub location: String,
    /// Narrative summary to scan for companion actions.
    #[serde(default)]
    pub summary: String,
}

impl JournalEntry {
    fn fingerprint(&self) -> String {
        format!("{}|{}|{}", self.date, self.time, self.location)
    }

    fn timestamp(&self) -> String {
        format!("{} {}", self.date, self.time)
    }
}

/// Everything a caller needs to render one companion's disposition.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompanionProfile {
    /// Companion name.
    pub name: String,
    /// How many entries mentioned this companion.
    pub interaction_count: u64,
    /// Core memories currently held.
    pub memory_count: usize,
    /// Running emotional state.
    pub emotional_state: EmotionalVector,
    /// Behavioral trait model.
    pub behavioral_model: BehavioralModel,
    /// Threshold-derived relationship labels, "Neutral" when none apply.
    pub relationship: Vec<String>,
    /// The highest-velocity memory, if any exist.
    pub strongest_memory: Option<CoreMemory>,
}

/// Per-companion session state. Created lazily on first mention.
#[derive(Debug, Clone, Default)]
struct CompanionState {
    emotional_state: EmotionalVector,
    behavior: BehavioralModel,
    memories: Vec<CoreMemory>,
    interactions: u64,
    last_memory_day: Option<u32>,
}

/// Orchestrates the full memory pipeline for a set of companions.
#[derive(Debug)]
pub struct CompanionMemoryManager {
    config: KindredConfig,
    parser: ActionParser,
    crystallizer: MemoryCrystallizer,
    retrieval: GravitationalRetrieval,
    companions: HashMap<String, CompanionState>,
    processed_entries: HashSet<String>,
    day_counter: u32,
    last_date: Option<String>,
}

impl CompanionMemoryManager {
    /// Create a manager with the given configuration.
    #[must_use]
    pub fn new(config: KindredConfig) -> Self {
        let parser = ActionParser::new(&config.parser);
        let crystallizer = MemoryCrystallizer::new(&config.crystallizer);
        let retrieval = GravitationalRetrieval::new(&config.retrieval);
        Self {
            config,
            parser,
            crystallizer,
            retrieval,
            companions: HashMap::new(),
            processed_entries: HashSet::new(),
            day_counter: 0,
            last_date: None,
        }
    }

    /// The current relative day counter.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.day_counter
    }

    /// Ingest one journal entry for the given companions.
    ///
    /// The only mutating entry point. Returns the newly crystallized
    /// memories keyed by companion name; persistence of those memories is
    /// the caller's concern. Replaying an already-seen entry (same
    /// fingerprint) is a no-op returning an empty map.
    pub fn process_entry(
        &mut self,
        entry: &JournalEntry,
        companion_names: &[String],
    ) -> BTreeMap<String, CoreMemory> {
        let mut created = BTreeMap::new();

        if entry.summary.is_empty() || companion_names.is_empty() {
            return created;
        }

        let fingerprint = entry.fingerprint();
        if self.processed_entries.contains(&fingerprint) {
            info!(%fingerprint, "entry already processed, skipping");
            return created;
        }
        self.processed_entries.insert(fingerprint);

        // The day counter advances once per new calendar date, not once
        // per entry.
        if self.last_date.as_deref() != Some(entry.date.as_str()) {
            if self.last_date.is_some() {
                self.day_counter += 1;
            }
            self.last_date = Some(entry.date.clone());
        }

        for name in companion_names {
            if !self.parser.is_mentioned(&entry.summary, name) {
                continue;
            }

            let state = self.companions.entry(name.clone()).or_default();
            state.interactions += 1;

            let actions = self.parser.parse(&entry.summary, name);
            if actions.is_empty() {
                continue;
            }

            let excerpt = self.parser.excerpt(&entry.summary, name);
            let Some(memory) = self.crystallizer.crystallize(
                &actions,
                name,
                &entry.location,
                &entry.timestamp(),
                &excerpt,
                &state.memories,
            ) else {
                continue;
            };

            if is_duplicate(
                &state.memories,
                &memory,
                self.config.memory.duplicate_velocity_tolerance,
            ) {
                info!(
                    companion = name.as_str(),
                    timestamp = memory.timestamp.as_str(),
                    "duplicate memory signature, skipping"
                );
                continue;
            }

            // Emotions fade between memorable days; decay the whole state
            // before layering the new delta on top.
            if let Some(last_day) = state.last_memory_day {
                let days_passed = self.day_counter.saturating_sub(last_day);
                if days_passed > 0 {
                    let factor = self.config.memory.daily_decay.powi(days_passed as i32);
                    state.emotional_state.scale(factor);
                    debug!(
                        companion = name.as_str(),
                        days_passed,
                        factor,
                        "applied emotional decay"
                    );
                }
            }

            state.emotional_state.apply_delta(&memory.emotional_delta);
            state.behavior.observe_actions(&actions);
            state.memories.push(memory.clone());
            MemoryCrystallizer::prune_memories(
                &mut state.memories,
                self.config.memory.max_memories_per_companion,
            );
            state.last_memory_day = Some(self.day_counter);

            info!(
                companion = name.as_str(),
                velocity = memory.velocity,
                triggers = ?memory.trigger_actions,
                "crystallized memory"
            );
            created.insert(name.clone(), memory);
        }

        created
    }

    /// The most relevant memories for `companion` in `situation`,
    /// strongest pull first, at most `max_memories` of them.
    #[must_use]
    pub fn relevant_memories(
        &self,
        companion: &str,
        situation: &Situation,
        max_memories: usize,
    ) -> Vec<CoreMemory> {
        let Some(state) = self.companions.get(companion) else {
            return Vec::new();
        };
        self.retrieval
            .retrieve(&state.memories, situation, None, max_memories)
            .into_iter()
            .map(|scored| scored.memory)
            .collect()
    }

    /// All of `companion`'s memories that resonate with its current
    /// emotional state.
    #[must_use]
    pub fn resonant_memories(&self, companion: &str) -> Vec<CoreMemory> {
        let Some(state) = self.companions.get(companion) else {
            return Vec::new();
        };
        self.retrieval
            .resonant_memories(&state.memories, &state.emotional_state)
    }

    /// Complete emotional and behavioral profile for one companion.
    ///
    /// Unknown companions get a neutral profile rather than an error.
    #[must_use]
    pub fn profile(&self, companion: &str) -> CompanionProfile {
        let default = CompanionState::default();
        let state = self.companions.get(companion).unwrap_or(&default);

        let strongest_memory = state
            .memories
            .iter()
            .max_by_key(|memory| ordered_float::OrderedFloat(memory.velocity))
            .cloned();

        CompanionProfile {
            name: companion.to_string(),
            interaction_count: state.interactions,
            memory_count: state.memories.len(),
            emotional_state: state.emotional_state,
            behavioral_model: state.behavior,
            relationship: relationship_labels(&state.emotional_state),
            strongest_memory,
        }
    }

    /// Wipe one companion's session state entirely. Returns whether the
    /// companion was known.
    pub fn clear_companion(&mut self, companion: &str) -> bool {
        let existed = self.companions.remove(companion).is_some();
        if existed {
            info!(companion, "cleared companion memories");
        }
        existed
    }

    /// Companion names with live session state.
    #[must_use]
    pub fn tracked_companions(&self) -> Vec<&str> {
        self.companions.keys().map(String::as_str).collect()
    }

    /// Crystallization statistics across all companions.
    #[must_use]
    pub fn crystallization_stats(&self) -> CrystallizationStats {
        self.crystallizer.stats()
    }

    /// Export one companion's state as a persistence record, if known.
    #[must_use]
    pub fn export_companion(&self, companion: &str) -> Option<CompanionRecord> {
        self.companions.get(companion).map(|state| CompanionRecord {
            companion: companion.to_string(),
            core_memories: state.memories.clone(),
            emotional_state: state.emotional_state,
            behavioral_model: state.behavior,
            interaction_count: state.interactions,
        })
    }

    /// Restore a companion's state from a persistence record, replacing
    /// any existing state for that name.
    pub fn restore_companion(&mut self, record: CompanionRecord) {
        debug!(
            companion = record.companion.as_str(),
            memories = record.core_memories.len(),
            "restored companion state"
        );
        let max_id = record
            .core_memories
            .iter()
            .filter_map(|memory| memory.id.rsplit('_').next())
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.crystallizer.restore_counter(max_id);

        self.companions.insert(
            record.companion,
            CompanionState {
                emotional_state: record.emotional_state,
                behavior: record.behavioral_model,
                memories: record.core_memories,
                interactions: record.interaction_count,
                last_memory_day: None,
            },
        );
    }
}

impl Default for CompanionMemoryManager {
    fn default() -> Self {
        Self::new(KindredConfig::default())
    }
}

/// A new memory is a duplicate when an existing one shares its timestamp
/// and location with a velocity inside the tolerance.
fn is_duplicate(existing: &[CoreMemory], candidate: &CoreMemory, tolerance: f32) -> bool {
    existing.iter().any(|memory| {
        memory.timestamp == candidate.timestamp
            && memory.location == candidate.location
            && (memory.velocity - candidate.velocity).abs() < tolerance
    })
}

/// Deterministic threshold labels over the emotional state. Independent
/// axes append independently; an unremarkable state is simply "Neutral".
fn relationship_labels(state: &EmotionalVector) -> Vec<String> {
    use crate::types::EmotionAxis::{Fear, Intimacy, Power, Respect, Trust};
    let mut labels = Vec::new();

    let trust = state.get(Trust);
    if trust > 0.5 {
        labels.push("Trusted Ally".to_string());
    } else if trust > 0.3 {
        labels.push("Friend".to_string());
    } else if trust < -0.3 {
        labels.push("Distrusted".to_string());
    }

    let respect = state.get(Respect);
    if respect > 0.4 {
        labels.push("Respected".to_string());
    } else if respect < -0.3 {
        labels.push("Disrespected".to_string());
    }

    let intimacy = state.get(Intimacy);
    if intimacy > 0.5 {
        labels.push("Close Bond".to_string());
    } else if intimacy > 0.3 {
        labels.push("Growing Closeness".to_string());
    }

    if state.get(Fear) > 0.4 {
        labels.push("Feared".to_string());
    }

    let power = state.get(Power);
    if power > 0.4 {
        labels.push("Leader".to_string());
    } else if power < -0.4 {
        labels.push("Follower".to_string());
    }

    if labels.is_empty() {
        labels.push("Neutral".to_string());
    }
    labels
}
