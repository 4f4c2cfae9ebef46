// matcher/mod.rs
//
// Streaming script matchers.
// A matcher turns noisy transcript fragments into a monotonic position in the
// normalized script. Two strategies share one cursor shape and one contract.

pub mod anchor;
pub mod fuzzy;
pub mod transcript;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::text::normalize_chars;

pub use anchor::AnchorMatcher;
pub use fuzzy::FuzzyMatcher;
pub use transcript::TranscriptDelta;

/// Which alignment algorithm a session uses in Follow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherStrategy {
    /// Suffix-in-window search with length-scaled jump limits.
    #[default]
    Anchor,
    /// Greedy character-coverage scoring. More tolerant, less precise.
    Fuzzy,
}

/// Maximum accepted jump for suffixes of at least `min_len` chars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceTier {
    pub min_len: usize,
    pub max_distance: f32,
}

/// Matcher tuning. Window and thresholds are tunables, not fixed behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Algorithm used by `build` (default: Anchor).
    pub strategy: MatcherStrategy,
    /// Lookahead past the last matched index, in normalized chars (default: 150).
    pub window: usize,
    /// Trailing chars of recent input kept for suffix search (default: 60).
    pub buffer_capacity: usize,
    /// Longest suffix tried (default: 20).
    pub max_suffix_len: usize,
    /// Shortest suffix tried (default: 2).
    pub min_suffix_len: usize,
    /// Suffixes without ideographs shorter than this are skipped... (default: 4)
    pub min_latin_suffix: usize,
    /// ...unless at least this long and found right at the last index (default: 3).
    pub contiguous_latin_suffix: usize,
    /// Jump limits; the largest one whose `min_len` fits the suffix applies.
    pub distance_tiers: Vec<DistanceTier>,
    /// Multiplier on the jump limit for suffixes containing ideographs (default: 1.5).
    pub cjk_distance_scale: f32,
    /// Fuzzy: required matched/fragment ratio, exclusive (default: 0.6).
    pub fuzzy_threshold: f32,
    /// Fuzzy: shortest cleaned fragment scored at all (default: 2).
    pub fuzzy_min_len: usize,
    /// Fold ASCII case on script and fragments (default: true).
    pub fold_ascii_case: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            strategy: MatcherStrategy::Anchor,
            window: 150,
            buffer_capacity: 60,
            max_suffix_len: 20,
            min_suffix_len: 2,
            min_latin_suffix: 4,
            contiguous_latin_suffix: 3,
            distance_tiers: vec![
                DistanceTier { min_len: 8, max_distance: 150.0 },
                DistanceTier { min_len: 5, max_distance: 80.0 },
                DistanceTier { min_len: 3, max_distance: 30.0 },
                DistanceTier { min_len: 0, max_distance: 10.0 },
            ],
            cjk_distance_scale: 1.5,
            fuzzy_threshold: 0.6,
            fuzzy_min_len: 2,
            fold_ascii_case: true,
        }
    }
}

impl MatcherConfig {
    /// Build the configured strategy over `script`, anchored at `start_fraction`.
    pub fn build(&self, script: &str, start_fraction: f32) -> Box<dyn StreamMatcher> {
        match self.strategy {
            MatcherStrategy::Anchor => Box::new(AnchorMatcher::new(script, start_fraction, self.clone())),
            MatcherStrategy::Fuzzy => Box::new(FuzzyMatcher::new(script, start_fraction, self.clone())),
        }
    }

    /// Largest accepted jump for a suffix of `len` chars.
    pub fn max_allowed_distance(&self, len: usize, is_cjk: bool) -> f32 {
        let base = self
            .distance_tiers
            .iter()
            .filter(|tier| len >= tier.min_len)
            .map(|tier| tier.max_distance)
            .fold(0.0_f32, f32::max);
        if is_cjk {
            base * self.cjk_distance_scale
        } else {
            base
        }
    }
}

/// Position state shared by every strategy.
#[derive(Debug, Clone)]
pub struct MatchCursor {
    script: Vec<char>,
    last_index: usize,
    recent: Vec<char>,
    buffer_capacity: usize,
    last_fraction: Option<f32>,
}

impl MatchCursor {
    pub fn new(script: &str, start_fraction: f32, config: &MatcherConfig) -> Self {
        let script = normalize_chars(script, config.fold_ascii_case);
        let mut cursor = Self {
            script,
            last_index: 0,
            recent: Vec::with_capacity(config.buffer_capacity + 16),
            buffer_capacity: config.buffer_capacity,
            last_fraction: None,
        };
        cursor.resync(start_fraction);
        debug!(
            "matcher: script len {} start index {}",
            cursor.script.len(),
            cursor.last_index
        );
        cursor
    }

    pub fn script_len(&self) -> usize {
        self.script.len()
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn recent(&self) -> &[char] {
        &self.recent
    }

    /// `last_index / script_len`, or 0 for an empty script.
    pub fn progress(&self) -> f32 {
        if self.script.is_empty() {
            0.0
        } else {
            self.last_index as f32 / self.script.len() as f32
        }
    }

    /// Script slice starting at the last index, at most `size` chars long.
    pub fn window(&self, size: usize) -> &[char] {
        let end = self.last_index.saturating_add(size).min(self.script.len());
        &self.script[self.last_index..end]
    }

    /// Append cleaned input, keeping only the trailing `buffer_capacity` chars.
    pub fn push_recent(&mut self, chars: &[char]) {
        self.recent.extend_from_slice(chars);
        if self.recent.len() > self.buffer_capacity {
            let excess = self.recent.len() - self.buffer_capacity;
            self.recent.drain(..excess);
        }
    }

    /// Move to `new_index` if it strictly advances both index and fraction.
    pub fn commit(&mut self, new_index: usize) -> Option<f32> {
        if new_index <= self.last_index || new_index > self.script.len() {
            debug!(
                "matcher: rejected non-advancing index {} (last {})",
                new_index, self.last_index
            );
            return None;
        }
        let fraction = new_index as f32 / self.script.len() as f32;
        if self.last_fraction.is_some_and(|prev| fraction <= prev) {
            return None;
        }
        self.last_index = new_index;
        self.last_fraction = Some(fraction);
        Some(fraction)
    }

    /// Re-anchor at `fraction` of the script, dropping recent input.
    /// The only way the index can move backward.
    pub fn resync(&mut self, fraction: f32) {
        let f = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        let len = self.script.len();
        self.last_index = ((len as f32 * f).floor() as usize).min(len);
        self.recent.clear();
        self.last_fraction = if len == 0 {
            None
        } else {
            Some(self.last_index as f32 / len as f32)
        };
    }
}

/// Streaming alignment contract.
///
/// `feed` is synchronous and cheap; it never blocks and never errors.
/// A returned fraction is always strictly greater than any earlier one.
pub trait StreamMatcher {
    /// Consume one raw transcript fragment. `None` means "no update".
    fn feed(&mut self, fragment: &str) -> Option<f32>;

    fn cursor(&self) -> &MatchCursor;

    fn cursor_mut(&mut self) -> &mut MatchCursor;

    /// Re-anchor after the user scrolled manually.
    fn resync(&mut self, fraction: f32) {
        self.cursor_mut().resync(fraction);
    }

    fn last_index(&self) -> usize {
        self.cursor().last_index()
    }

    fn progress(&self) -> f32 {
        self.cursor().progress()
    }
}

/// Nearest occurrence of `needle` in `haystack`.
pub(crate) fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
