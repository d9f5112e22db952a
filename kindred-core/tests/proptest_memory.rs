//! Property-based tests for the companion memory core.
//!
//! Uses `proptest` to verify the engine's structural invariants under
//! random inputs: clamping is never violated, the pipeline is
//! deterministic, retrieval ordering holds for arbitrary memory sets, and
//! decay only ever shrinks emotional magnitudes.

use proptest::prelude::*;

use kindred_core::config::KindredConfig;
use kindred_core::gravity::{GravitationalRetrieval, Situation};
use kindred_core::manager::{CompanionMemoryManager, JournalEntry};
use kindred_core::types::{EmotionAxis, EmotionalVector};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_axis() -> impl Strategy<Value = EmotionAxis> {
    prop::sample::select(EmotionAxis::ALL.to_vec())
}

fn arb_mutation() -> impl Strategy<Value = (EmotionAxis, f32, bool)> {
    (arb_axis(), -10.0..10.0f32, any::<bool>())
}

/// Narrative fragments that hit the action catalogue.
fn arb_summary() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Kira tended wounds carefully.".to_string(),
        "Kira stood guard and kept watch.".to_string(),
        "Kira took the blow for me when the ogre charged.".to_string(),
        "Kira betrayed us at the gate.".to_string(),
        "Kira shared stories by the fire.".to_string(),
        "Kira walked on in silence.".to_string(),
        "The rain fell all day.".to_string(),
    ])
}

// ---------------------------------------------------------------------------
// Property: every axis stays within its declared bounds under any
// sequence of add/set calls
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn emotional_axes_always_clamped(
        mutations in prop::collection::vec(arb_mutation(), 1..50),
    ) {
        let mut vector = EmotionalVector::new();
        for (axis, value, use_set) in mutations {
            if use_set {
                vector.set(axis, value);
            } else {
                vector.add(axis, value);
            }
            for checked in EmotionAxis::ALL {
                let (min, max) = checked.bounds();
                let current = vector.get(checked);
                prop_assert!(current >= min, "{checked} = {current} < {min}");
                prop_assert!(current <= max, "{checked} = {current} > {max}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: vector operators preserve bounds
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn vector_operators_preserve_bounds(
        a in prop::collection::vec(-2.0..2.0f32, 5),
        b in prop::collection::vec(-2.0..2.0f32, 5),
        scalar in -5.0..5.0f32,
    ) {
        let lhs = EmotionalVector::from_axes(
            &EmotionAxis::ALL.into_iter().zip(a.iter().copied()).collect::<Vec<_>>(),
        );
        let rhs = EmotionalVector::from_axes(
            &EmotionAxis::ALL.into_iter().zip(b.iter().copied()).collect::<Vec<_>>(),
        );

        for result in [lhs + rhs, lhs - rhs, lhs * scalar] {
            for axis in EmotionAxis::ALL {
                let (min, max) = axis.bounds();
                prop_assert!(result.get(axis) >= min);
                prop_assert!(result.get(axis) <= max);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: cosine similarity is bounded and symmetric, never NaN
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cosine_similarity_is_sane(
        a in prop::collection::vec(-1.0..1.0f32, 5),
        b in prop::collection::vec(-1.0..1.0f32, 5),
    ) {
        let lhs = EmotionalVector::from_axes(
            &EmotionAxis::ALL.into_iter().zip(a.iter().copied()).collect::<Vec<_>>(),
        );
        let rhs = EmotionalVector::from_axes(
            &EmotionAxis::ALL.into_iter().zip(b.iter().copied()).collect::<Vec<_>>(),
        );

        let similarity = lhs.cosine_similarity(&rhs);
        prop_assert!(!similarity.is_nan());
        prop_assert!(similarity >= -1.0001);
        prop_assert!(similarity <= 1.0001);
        prop_assert!((similarity - rhs.cosine_similarity(&lhs)).abs() < 1e-5);
    }
}

// ---------------------------------------------------------------------------
// Property: the pipeline is deterministic — identical journals produce
// identical state
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn identical_journals_produce_identical_state(
        summaries in prop::collection::vec(arb_summary(), 1..10),
    ) {
        let companions = vec!["Kira".to_string()];
        let run = |summaries: &[String]| {
            let mut manager = CompanionMemoryManager::new(KindredConfig::default());
            for (i, summary) in summaries.iter().enumerate() {
                let entry = JournalEntry {
                    date: format!("Day{i}"),
                    time: "08:00".to_string(),
                    location: "Market".to_string(),
                    summary: summary.clone(),
                };
                manager.process_entry(&entry, &companions);
            }
            manager.profile("Kira")
        };

        let first = run(&summaries);
        let second = run(&summaries);

        prop_assert_eq!(first.memory_count, second.memory_count);
        prop_assert_eq!(first.interaction_count, second.interaction_count);
        prop_assert_eq!(first.emotional_state, second.emotional_state);
        prop_assert_eq!(first.behavioral_model, second.behavioral_model);
        prop_assert_eq!(first.relationship, second.relationship);
    }
}

// ---------------------------------------------------------------------------
// Property: memory capacity is never exceeded
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn memory_capacity_is_never_exceeded(
        summaries in prop::collection::vec(arb_summary(), 1..20),
    ) {
        let companions = vec!["Kira".to_string()];
        let mut manager = CompanionMemoryManager::new(KindredConfig::default());
        for (i, summary) in summaries.iter().enumerate() {
            let entry = JournalEntry {
                date: format!("Day{i}"),
                time: "08:00".to_string(),
                location: "Market".to_string(),
                summary: summary.clone(),
            };
            manager.process_entry(&entry, &companions);
            prop_assert!(manager.profile("Kira").memory_count <= 5);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: retrieval pulls are non-increasing and above the floor
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn retrieval_ordering_holds(
        summaries in prop::collection::vec(arb_summary(), 1..12),
        danger in 0.0..1.0f32,
        in_combat in any::<bool>(),
    ) {
        let companions = vec!["Kira".to_string()];
        let mut manager = CompanionMemoryManager::new(KindredConfig::default());
        for (i, summary) in summaries.iter().enumerate() {
            let entry = JournalEntry {
                date: format!("Day{i}"),
                time: "08:00".to_string(),
                location: "Market".to_string(),
                summary: summary.clone(),
            };
            manager.process_entry(&entry, &companions);
        }

        let situation = Situation {
            action_type: Some("combat".to_string()),
            danger_level: danger,
            in_combat,
            ..Default::default()
        };

        // Score through the retrieval engine directly to see the pulls.
        let retrieval = GravitationalRetrieval::default();
        let memories: Vec<_> = manager
            .relevant_memories("Kira", &situation, usize::MAX)
            .into_iter()
            .collect();
        let scored = retrieval.retrieve(&memories, &situation, None, memories.len().max(1));

        for pair in scored.windows(2) {
            prop_assert!(pair[0].pull >= pair[1].pull);
        }
        for entry in &scored {
            prop_assert!(entry.pull.value() > retrieval.pull_floor());
        }
    }
}

// ---------------------------------------------------------------------------
// Property: decay strictly shrinks non-zero axes, and zero days of decay
// changes nothing
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decay_monotonically_shrinks_state(
        values in prop::collection::vec(-1.0..1.0f32, 5),
        days in 1..50u32,
    ) {
        let mut state = EmotionalVector::from_axes(
            &EmotionAxis::ALL.into_iter().zip(values.iter().copied()).collect::<Vec<_>>(),
        );
        let before = state;

        state.scale(0.97f32.powi(days as i32));

        for axis in EmotionAxis::ALL {
            let old = before.get(axis);
            let new = state.get(axis);
            if old.abs() > 0.0 {
                prop_assert!(new.abs() < old.abs(), "{axis}: |{new}| !< |{old}|");
            } else {
                prop_assert!(new.abs() < f32::EPSILON);
            }
        }

        let mut unchanged = before;
        unchanged.scale(0.97f32.powi(0));
        prop_assert_eq!(unchanged, before);
    }
}

// ---------------------------------------------------------------------------
// Property: serialization round-trip preserves companion records
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn companion_record_roundtrip(
        summaries in prop::collection::vec(arb_summary(), 1..8),
    ) {
        let companions = vec!["Kira".to_string()];
        let mut manager = CompanionMemoryManager::new(KindredConfig::default());
        for (i, summary) in summaries.iter().enumerate() {
            let entry = JournalEntry {
                date: format!("Day{i}"),
                time: "08:00".to_string(),
                location: "Market".to_string(),
                summary: summary.clone(),
            };
            manager.process_entry(&entry, &companions);
        }

        if let Some(record) = manager.export_companion("Kira") {
            let json = record.to_json().expect("encode");
            let restored = kindred_core::CompanionRecord::from_json(&json).expect("decode");
            prop_assert_eq!(record, restored);
        }
    }
}
