//! Action parsing — turning narrative text into emotional events.
//!
//! The parser scans a journal summary for a named companion and collects
//! every catalogue pattern that occurs within a bounded window around a
//! mention of that companion. Each pattern contributes at most once per
//! call; the first mention it lands near wins.

use regex::Regex;

use crate::catalogue::{self, Polarity};
use crate::config::ParserConfig;
use crate::types::EmotionalDelta;

/// One detected narrative event.
///
/// Immutable record: the matched pattern identifier, its unclamped
/// per-axis impact, a short context snippet around the companion mention,
/// and a readable description taken from the catalogue (never free text).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAction {
    /// Identifier of the catalogue pattern that matched (its regex source).
    pub pattern: &'static str,
    /// Readable description of the action.
    pub description: &'static str,
    /// Raw per-axis emotional impact.
    pub impact: EmotionalDelta,
    /// Text window around the companion mention the match was anchored to.
    pub context: String,
    /// Companion the action concerns.
    pub companion: String,
    /// Whether the source pattern is bonding or damaging.
    pub polarity: Polarity,
}

/// Scans narrative text for a companion's emotionally significant actions.
#[derive(Debug, Clone)]
pub struct ActionParser {
    proximity_window: usize,
    context_window: usize,
    excerpt_window: usize,
}

impl ActionParser {
    /// Create a parser with the given window configuration.
    #[must_use]
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            proximity_window: config.proximity_window,
            context_window: config.context_window,
            excerpt_window: config.excerpt_window,
        }
    }

    /// Whether `companion` appears in `text` as a whole word,
    /// case-insensitively.
    #[must_use]
    pub fn is_mentioned(&self, text: &str, companion: &str) -> bool {
        mention_regex(companion).is_some_and(|regex| regex.is_match(text))
    }

    /// Extract all actions involving `companion` from `text`.
    ///
    /// Returns an empty list without scanning when the companion is not
    /// mentioned at all. Patterns are tried in catalogue order and each
    /// contributes at most one action per call.
    #[must_use]
    pub fn parse(&self, text: &str, companion: &str) -> Vec<ParsedAction> {
        let Some(mention) = mention_regex(companion) else {
            return Vec::new();
        };

        let mentions: Vec<(usize, usize)> = mention
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();
        if mentions.is_empty() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        for entry in catalogue::compiled() {
            // Cheap whole-text check before windowing.
            if !entry.regex.is_match(text) {
                continue;
            }

            for &(start, end) in &mentions {
                let window = slice_window(text, start, end, self.proximity_window);
                if entry.regex.is_match(window) {
                    let context = slice_window(text, start, end, self.context_window)
                        .trim()
                        .to_string();
                    actions.push(ParsedAction {
                        pattern: entry.source.pattern,
                        description: entry.source.label,
                        impact: EmotionalDelta::from_axes(entry.source.impact),
                        context,
                        companion: companion.to_string(),
                        polarity: entry.source.polarity,
                    });
                    break;
                }
            }
        }

        actions
    }

    /// Excerpt of `text` around the first mention of `companion`,
    /// ellipsized where truncated. Falls back to the head of the text when
    /// the companion is not found.
    #[must_use]
    pub fn excerpt(&self, text: &str, companion: &str) -> String {
        if let Some(m) = mention_regex(companion).and_then(|regex| regex.find(text).map(|m| (m.start(), m.end()))) {
            let (start, end) = m;
            let lo = floor_char_boundary(text, start.saturating_sub(self.excerpt_window));
            let hi = ceil_char_boundary(text, (end + self.excerpt_window).min(text.len()));
            let mut excerpt = text[lo..hi].trim().to_string();
            if lo > 0 {
                excerpt.insert_str(0, "...");
            }
            if hi < text.len() {
                excerpt.push_str("...");
            }
            return excerpt;
        }
        if text.len() > 200 {
            let hi = floor_char_boundary(text, 200);
            format!("{}...", &text[..hi])
        } else {
            text.to_string()
        }
    }

    /// Sum the impacts of a batch of actions into one raw delta.
    #[must_use]
    pub fn summarize_impact(actions: &[ParsedAction]) -> EmotionalDelta {
        let mut delta = EmotionalDelta::default();
        for action in actions {
            delta.merge(&action.impact);
        }
        delta
    }
}

impl Default for ActionParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

fn mention_regex(companion: &str) -> Option<Regex> {
    if companion.trim().is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(companion))).ok()
}

/// `text[start-window .. end+window]`, clamped to char boundaries.
fn slice_window(text: &str, start: usize, end: usize, window: usize) -> &str {
    let lo = floor_char_boundary(text, start.saturating_sub(window));
    let hi = ceil_char_boundary(text, (end + window).min(text.len()));
    &text[lo..hi]
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
