//! Core type definitions for the companion memory system.
//!
//! The affective model is a 5-axis vector space. Two of the axes are
//! unipolar (`intimacy`, `fear` in [0, 1]), the rest bipolar ([-1, 1]).
//! [`EmotionalVector`] is the *bounded* running state of a companion;
//! [`EmotionalDelta`] is the *raw* change produced by one interaction and
//! is deliberately unclamped — a delta is added to a vector, it is not a
//! vector itself.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// One of the five emotional axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionAxis {
    /// Betrayal (-1) to loyalty (+1).
    Trust,
    /// Submission (-1) to dominance (+1).
    Power,
    /// Stranger (0) to lover (1).
    Intimacy,
    /// Safety (0) to terror (1).
    Fear,
    /// Contempt (-1) to admiration (+1).
    Respect,
}

impl EmotionAxis {
    /// Every axis, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Trust,
        Self::Power,
        Self::Intimacy,
        Self::Fear,
        Self::Respect,
    ];

    /// Declared (min, max) bounds for this axis.
    #[must_use]
    pub const fn bounds(self) -> (f32, f32) {
        match self {
            Self::Trust | Self::Power | Self::Respect => (-1.0, 1.0),
            Self::Intimacy | Self::Fear => (0.0, 1.0),
        }
    }

    /// Canonical lowercase name, as used in serialized records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trust => "trust",
            Self::Power => "power",
            Self::Intimacy => "intimacy",
            Self::Fear => "fear",
            Self::Respect => "respect",
        }
    }

    /// Parse a canonical axis name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.name() == name)
    }
}

impl fmt::Display for EmotionAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values with absolute magnitude below this are treated as neutral.
pub const NEUTRAL_EPSILON: f32 = 0.01;

fn cosine(a: [f32; 5], b: [f32; 5]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

// ---------------------------------------------------------------------------
// EmotionalVector — bounded running state
// ---------------------------------------------------------------------------

/// A bounded 5-axis emotional state.
///
/// Every mutation re-clamps the touched axis to its declared bounds, so a
/// value outside range is never observable. Deserialization goes through
/// the same [`set`](Self::set) semantics, which means persisted states are
/// re-clamped on load.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawEmotionalVector")]
pub struct EmotionalVector {
    trust: f32,
    power: f32,
    intimacy: f32,
    fear: f32,
    respect: f32,
}

/// Unclamped mirror used only as a deserialization staging area.
#[derive(Deserialize)]
struct RawEmotionalVector {
    #[serde(default)]
    trust: f32,
    #[serde(default)]
    power: f32,
    #[serde(default)]
    intimacy: f32,
    #[serde(default)]
    fear: f32,
    #[serde(default)]
    respect: f32,
}

impl From<RawEmotionalVector> for EmotionalVector {
    fn from(raw: RawEmotionalVector) -> Self {
        let mut vector = Self::default();
        vector.set(EmotionAxis::Trust, raw.trust);
        vector.set(EmotionAxis::Power, raw.power);
        vector.set(EmotionAxis::Intimacy, raw.intimacy);
        vector.set(EmotionAxis::Fear, raw.fear);
        vector.set(EmotionAxis::Respect, raw.respect);
        vector
    }
}

impl EmotionalVector {
    /// The neutral (all-zero) state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from per-axis values, clamping each.
    #[must_use]
    pub fn from_axes(values: &[(EmotionAxis, f32)]) -> Self {
        let mut vector = Self::default();
        for &(axis, value) in values {
            Self::add(&mut vector, axis, value);
        }
        vector
    }

    /// Current value of one axis.
    #[must_use]
    pub fn get(&self, axis: EmotionAxis) -> f32 {
        match axis {
            EmotionAxis::Trust => self.trust,
            EmotionAxis::Power => self.power,
            EmotionAxis::Intimacy => self.intimacy,
            EmotionAxis::Fear => self.fear,
            EmotionAxis::Respect => self.respect,
        }
    }

    fn slot(&mut self, axis: EmotionAxis) -> &mut f32 {
        match axis {
            EmotionAxis::Trust => &mut self.trust,
            EmotionAxis::Power => &mut self.power,
            EmotionAxis::Intimacy => &mut self.intimacy,
            EmotionAxis::Fear => &mut self.fear,
            EmotionAxis::Respect => &mut self.respect,
        }
    }

    /// Add to one axis, then clamp it to its declared bounds.
    pub fn add(&mut self, axis: EmotionAxis, value: f32) {
        let (min, max) = axis.bounds();
        let slot = self.slot(axis);
        *slot = (*slot + value).clamp(min, max);
    }

    /// Reset one axis to zero, then add with clamping.
    ///
    /// Routing `set` through `add` keeps the clamp in exactly one place.
    pub fn set(&mut self, axis: EmotionAxis, value: f32) {
        *self.slot(axis) = 0.0;
        self.add(axis, value);
    }

    /// Apply a raw delta axis-wise, clamping each axis.
    pub fn apply_delta(&mut self, delta: &EmotionalDelta) {
        for axis in EmotionAxis::ALL {
            self.add(axis, delta.get(axis));
        }
    }

    /// Multiply every axis by `factor`, re-clamping.
    ///
    /// With `factor` in (0, 1] this only shrinks magnitudes, so the bounds
    /// stay satisfied; the clamp still runs for uniformity.
    pub fn scale(&mut self, factor: f32) {
        for axis in EmotionAxis::ALL {
            let value = self.get(axis);
            self.set(axis, value * factor);
        }
    }

    /// All five values in canonical axis order.
    #[must_use]
    pub fn components(&self) -> [f32; 5] {
        [self.trust, self.power, self.intimacy, self.fear, self.respect]
    }

    /// Euclidean norm over all five axes.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.components().iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Dot product with another state.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.components()
            .iter()
            .zip(other.components().iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Cosine similarity with another state.
    ///
    /// Returns 0.0 (not NaN) when either operand is the zero vector.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        cosine(self.components(), other.components())
    }

    /// Euclidean distance to another state.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        self.components()
            .iter()
            .zip(other.components().iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }

    /// Unit-length copy of this state; the zero vector normalizes to itself.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Self::default();
        }
        let mut result = Self::default();
        for axis in EmotionAxis::ALL {
            result.set(axis, self.get(axis) / mag);
        }
        result
    }

    /// The axis with the largest absolute value, or `None` if every axis
    /// is within [`NEUTRAL_EPSILON`] of zero.
    #[must_use]
    pub fn dominant_axis(&self) -> Option<(EmotionAxis, f32)> {
        if self
            .components()
            .iter()
            .all(|v| v.abs() <= NEUTRAL_EPSILON)
        {
            return None;
        }
        EmotionAxis::ALL
            .into_iter()
            .map(|axis| (axis, self.get(axis)))
            .max_by_key(|&(_, value)| OrderedFloat(value.abs()))
    }

    /// Readable signature of up to the three strongest significant axes,
    /// e.g. `"trust: +0.60, respect: +0.50"`. Returns `"neutral"` when no
    /// axis exceeds 0.1 in magnitude.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut significant: Vec<(EmotionAxis, f32)> = EmotionAxis::ALL
            .into_iter()
            .map(|axis| (axis, self.get(axis)))
            .filter(|&(_, value)| value.abs() > 0.1)
            .collect();
        significant.sort_by_key(|&(_, value)| std::cmp::Reverse(OrderedFloat(value.abs())));
        if significant.is_empty() {
            return "neutral".to_string();
        }
        significant
            .iter()
            .take(3)
            .map(|(axis, value)| format!("{axis}: {value:+.2}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Add for EmotionalVector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let mut result = self;
        for axis in EmotionAxis::ALL {
            EmotionalVector::add(&mut result, axis, other.get(axis));
        }
        result
    }
}

impl Sub for EmotionalVector {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        let mut result = self;
        for axis in EmotionAxis::ALL {
            EmotionalVector::add(&mut result, axis, -other.get(axis));
        }
        result
    }
}

impl Mul<f32> for EmotionalVector {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        let mut result = Self::default();
        for axis in EmotionAxis::ALL {
            result.set(axis, self.get(axis) * scalar);
        }
        result
    }
}

impl fmt::Display for EmotionalVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let non_zero: Vec<String> = EmotionAxis::ALL
            .into_iter()
            .map(|axis| (axis, self.get(axis)))
            .filter(|&(_, value)| value.abs() > NEUTRAL_EPSILON)
            .map(|(axis, value)| format!("{axis}={value:.2}"))
            .collect();
        if non_zero.is_empty() {
            write!(f, "EmotionalVector(neutral)")
        } else {
            write!(f, "EmotionalVector({})", non_zero.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// EmotionalDelta — raw, unclamped change
// ---------------------------------------------------------------------------

/// The raw emotional change produced by one interaction.
///
/// Deltas sum action impacts without clamping — a batch of strong actions
/// may legitimately exceed the per-axis bounds of a state vector. The
/// magnitude of a delta is the "velocity" that gates crystallization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionalDelta {
    /// Change along the trust axis.
    #[serde(default)]
    pub trust: f32,
    /// Change along the power axis.
    #[serde(default)]
    pub power: f32,
    /// Change along the intimacy axis.
    #[serde(default)]
    pub intimacy: f32,
    /// Change along the fear axis.
    #[serde(default)]
    pub fear: f32,
    /// Change along the respect axis.
    #[serde(default)]
    pub respect: f32,
}

impl EmotionalDelta {
    /// Build a delta from per-axis values.
    #[must_use]
    pub fn from_axes(values: &[(EmotionAxis, f32)]) -> Self {
        let mut delta = Self::default();
        for &(axis, value) in values {
            delta.accumulate(axis, value);
        }
        delta
    }

    /// Value of one axis.
    #[must_use]
    pub fn get(&self, axis: EmotionAxis) -> f32 {
        match axis {
            EmotionAxis::Trust => self.trust,
            EmotionAxis::Power => self.power,
            EmotionAxis::Intimacy => self.intimacy,
            EmotionAxis::Fear => self.fear,
            EmotionAxis::Respect => self.respect,
        }
    }

    /// Add to one axis without clamping.
    pub fn accumulate(&mut self, axis: EmotionAxis, value: f32) {
        let slot = match axis {
            EmotionAxis::Trust => &mut self.trust,
            EmotionAxis::Power => &mut self.power,
            EmotionAxis::Intimacy => &mut self.intimacy,
            EmotionAxis::Fear => &mut self.fear,
            EmotionAxis::Respect => &mut self.respect,
        };
        *slot += value;
    }

    /// Merge another delta into this one, axis-wise.
    pub fn merge(&mut self, other: &Self) {
        for axis in EmotionAxis::ALL {
            self.accumulate(axis, other.get(axis));
        }
    }

    /// All five values in canonical axis order.
    #[must_use]
    pub fn components(&self) -> [f32; 5] {
        [self.trust, self.power, self.intimacy, self.fear, self.respect]
    }

    /// Euclidean magnitude — the emotional velocity of the change.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.components().iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Cosine similarity with another delta; 0.0 when either is zero.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        cosine(self.components(), other.components())
    }

    /// Cosine similarity between this delta's direction and a bounded
    /// emotional state; 0.0 when either operand is zero.
    #[must_use]
    pub fn resonance(&self, state: &EmotionalVector) -> f32 {
        cosine(self.components(), state.components())
    }
}

// ---------------------------------------------------------------------------
// Pull score
// ---------------------------------------------------------------------------

/// Scalar gravitational pull used to rank memories during retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PullScore(pub OrderedFloat<f32>);

impl PullScore {
    /// Create a pull score from a raw f32.
    #[must_use]
    pub fn new(score: f32) -> Self {
        Self(OrderedFloat(score))
    }

    /// Get the raw score value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0.into_inner()
    }
}
