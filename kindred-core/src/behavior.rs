//! Behavioral model — five bipolar trait axes shaped by observed actions.
//!
//! Each axis is a scalar in [-1, 1] nudged by fixed keyword-presence
//! rules matched against an action's readable description. Positive
//! keywords nudge by +0.1, negative ones by -0.2, and every axis is
//! re-clamped after a full batch of actions has been applied.

use serde::{Deserialize, Serialize};

use crate::parser::ParsedAction;

/// One bipolar trait axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitAxis {
    /// Do they protect the companion, or use them?
    ProtectorVsExploiter,
    /// Are their actions predictable?
    ConsistentVsChaotic,
    /// Do they share resources?
    GenerousVsGreedy,
    /// Do they keep their word?
    TruthfulVsDeceptive,
    /// Do they resort to violence?
    ViolentVsPeaceful,
}

impl TraitAxis {
    /// Every trait axis, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::ProtectorVsExploiter,
        Self::ConsistentVsChaotic,
        Self::GenerousVsGreedy,
        Self::TruthfulVsDeceptive,
        Self::ViolentVsPeaceful,
    ];

    /// Canonical snake_case name, as used in serialized records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProtectorVsExploiter => "protector_vs_exploiter",
            Self::ConsistentVsChaotic => "consistent_vs_chaotic",
            Self::GenerousVsGreedy => "generous_vs_greedy",
            Self::TruthfulVsDeceptive => "truthful_vs_deceptive",
            Self::ViolentVsPeaceful => "violent_vs_peaceful",
        }
    }
}

struct NudgeRule {
    axis: TraitAxis,
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

const NUDGE_RULES: &[NudgeRule] = &[
    NudgeRule {
        axis: TraitAxis::ProtectorVsExploiter,
        positive: &["protect", "defend", "heal", "rescue"],
        negative: &["abandon", "betray", "exploit"],
    },
    NudgeRule {
        axis: TraitAxis::ConsistentVsChaotic,
        positive: &["trust", "promise", "reliable"],
        negative: &["betray", "unpredictable"],
    },
    NudgeRule {
        axis: TraitAxis::GenerousVsGreedy,
        positive: &["share", "give", "generous"],
        negative: &["steal", "hoard", "greedy"],
    },
    NudgeRule {
        axis: TraitAxis::TruthfulVsDeceptive,
        positive: &["honest", "truth", "confide"],
        negative: &["lie", "deceive", "mislead"],
    },
    NudgeRule {
        axis: TraitAxis::ViolentVsPeaceful,
        positive: &["peaceful", "calm", "gentle"],
        negative: &["violent", "aggressive", "cruel"],
    },
];

const POSITIVE_NUDGE: f32 = 0.1;
const NEGATIVE_NUDGE: f32 = -0.2;

/// Five independent bipolar trait axes, each in [-1, 1].
///
/// Mutated only through [`observe_actions`](Self::observe_actions);
/// deserialization re-clamps every axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawBehavioralModel")]
pub struct BehavioralModel {
    protector_vs_exploiter: f32,
    consistent_vs_chaotic: f32,
    generous_vs_greedy: f32,
    truthful_vs_deceptive: f32,
    violent_vs_peaceful: f32,
}

#[derive(Deserialize)]
struct RawBehavioralModel {
    #[serde(default)]
    protector_vs_exploiter: f32,
    #[serde(default)]
    consistent_vs_chaotic: f32,
    #[serde(default)]
    generous_vs_greedy: f32,
    #[serde(default)]
    truthful_vs_deceptive: f32,
    #[serde(default)]
    violent_vs_peaceful: f32,
}

impl From<RawBehavioralModel> for BehavioralModel {
    fn from(raw: RawBehavioralModel) -> Self {
        Self {
            protector_vs_exploiter: raw.protector_vs_exploiter.clamp(-1.0, 1.0),
            consistent_vs_chaotic: raw.consistent_vs_chaotic.clamp(-1.0, 1.0),
            generous_vs_greedy: raw.generous_vs_greedy.clamp(-1.0, 1.0),
            truthful_vs_deceptive: raw.truthful_vs_deceptive.clamp(-1.0, 1.0),
            violent_vs_peaceful: raw.violent_vs_peaceful.clamp(-1.0, 1.0),
        }
    }
}

impl BehavioralModel {
    /// A fresh model with every axis neutral.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of one trait axis.
    #[must_use]
    pub fn get(&self, axis: TraitAxis) -> f32 {
        match axis {
            TraitAxis::ProtectorVsExploiter => self.protector_vs_exploiter,
            TraitAxis::ConsistentVsChaotic => self.consistent_vs_chaotic,
            TraitAxis::GenerousVsGreedy => self.generous_vs_greedy,
            TraitAxis::TruthfulVsDeceptive => self.truthful_vs_deceptive,
            TraitAxis::ViolentVsPeaceful => self.violent_vs_peaceful,
        }
    }

    fn slot(&mut self, axis: TraitAxis) -> &mut f32 {
        match axis {
            TraitAxis::ProtectorVsExploiter => &mut self.protector_vs_exploiter,
            TraitAxis::ConsistentVsChaotic => &mut self.consistent_vs_chaotic,
            TraitAxis::GenerousVsGreedy => &mut self.generous_vs_greedy,
            TraitAxis::TruthfulVsDeceptive => &mut self.truthful_vs_deceptive,
            TraitAxis::ViolentVsPeaceful => &mut self.violent_vs_peaceful,
        }
    }

    /// Apply the nudge rules for one batch of actions, clamping every
    /// axis once at the end of the batch.
    pub fn observe_actions(&mut self, actions: &[ParsedAction]) {
        for action in actions {
            let description = action.description.to_lowercase();
            for rule in NUDGE_RULES {
                if rule.positive.iter().any(|word| description.contains(word)) {
                    *self.slot(rule.axis) += POSITIVE_NUDGE;
                } else if rule.negative.iter().any(|word| description.contains(word)) {
                    *self.slot(rule.axis) += NEGATIVE_NUDGE;
                }
            }
        }
        for axis in TraitAxis::ALL {
            let slot = self.slot(axis);
            *slot = slot.clamp(-1.0, 1.0);
        }
    }

    /// Named trait leanings where the model has moved off neutral:
    /// `("protector_vs_exploiter", value)` for every axis with |value|
    /// above 0.1.
    #[must_use]
    pub fn pronounced_traits(&self) -> Vec<(&'static str, f32)> {
        TraitAxis::ALL
            .into_iter()
            .map(|axis| (axis.name(), self.get(axis)))
            .filter(|&(_, value)| value.abs() > 0.1)
            .collect()
    }
}
