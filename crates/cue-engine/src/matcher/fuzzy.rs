// matcher/fuzzy.rs
//
// Fuzzy strategy: exact fragment search first, then an in-order greedy
// coverage score against the lookahead window. Tolerates recognizer
// substitutions at the cost of advancing on coincidence more often.

use log::debug;

use super::{find_chars, MatchCursor, MatcherConfig, StreamMatcher};
use crate::text::normalize_chars;

pub struct FuzzyMatcher {
    cursor: MatchCursor,
    config: MatcherConfig,
}

impl FuzzyMatcher {
    pub fn new(script: &str, start_fraction: f32, config: MatcherConfig) -> Self {
        Self {
            cursor: MatchCursor::new(script, start_fraction, &config),
            config,
        }
    }

    /// Greedy in-order coverage of `fragment` over `window`.
    /// Returns the matched char count and the window offset of the last hit.
    fn coverage(window: &[char], fragment: &[char]) -> (usize, Option<usize>) {
        let mut pos = 0usize;
        let mut matched = 0usize;
        let mut last_hit = None;

        for &ch in fragment {
            if pos >= window.len() {
                break;
            }
            if let Some(off) = window[pos..].iter().position(|&c| c == ch) {
                matched += 1;
                last_hit = Some(pos + off);
                pos += off + 1;
            }
        }

        (matched, last_hit)
    }

    fn locate(&self, clean: &[char]) -> Option<usize> {
        let window = self.cursor.window(self.config.window);
        let base = self.cursor.last_index();

        if let Some(idx) = find_chars(window, clean) {
            return Some(base + idx + clean.len());
        }

        let (matched, last_hit) = Self::coverage(window, clean);
        let ratio = matched as f32 / clean.len() as f32;
        if ratio > self.config.fuzzy_threshold {
            last_hit.map(|hit| base + hit + 1)
        } else {
            debug!("fuzzy: coverage {:.2} below threshold", ratio);
            None
        }
    }
}

impl StreamMatcher for FuzzyMatcher {
    fn feed(&mut self, fragment: &str) -> Option<f32> {
        let clean = normalize_chars(fragment, self.config.fold_ascii_case);
        if clean.is_empty() || self.cursor.script_len() == 0 {
            return None;
        }
        self.cursor.push_recent(&clean);
        if clean.len() < self.config.fuzzy_min_len {
            return None;
        }

        let new_index = self.locate(&clean)?;
        self.cursor.commit(new_index)
    }

    fn cursor(&self) -> &MatchCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut MatchCursor {
        &mut self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatcherStrategy;

    fn matcher(script: &str) -> FuzzyMatcher {
        FuzzyMatcher::new(
            script,
            0.0,
            MatcherConfig { strategy: MatcherStrategy::Fuzzy, ..MatcherConfig::default() },
        )
    }

    #[test]
    fn exact_fragment_fast_path() {
        let mut m = matcher("hello world and goodbye");
        assert!(m.feed("hello world").is_some());
        assert_eq!(m.last_index(), 10);
    }

    #[test]
    fn tolerates_substituted_chars() {
        let mut m = matcher("helloworld and more text");
        assert!(m.feed("hellq world").is_some());
        assert_eq!(m.last_index(), 10);
    }

    #[test]
    fn rejects_low_coverage() {
        let mut m = matcher("helloworld");
        assert_eq!(m.feed("zzzzqqqq"), None);
        assert_eq!(m.feed("a"), None);
        assert_eq!(m.last_index(), 0);
    }

    #[test]
    fn coverage_is_in_order() {
        let window: Vec<char> = "abcdef".chars().collect();
        let frag: Vec<char> = "fa".chars().collect();
        // 'f' consumes up to the end, 'a' cannot be matched afterwards
        assert_eq!(FuzzyMatcher::coverage(&window, &frag), (1, Some(5)));
    }

    #[test]
    fn never_moves_backward() {
        let mut m = matcher("one two three four five six seven eight");
        let mut last = 0.0;
        for frag in ["one two", "three", "one two", "fuor", "five six", "two", "seven eight"] {
            if let Some(p) = m.feed(frag) {
                assert!(p > last);
                last = p;
            }
        }
        assert!(last > 0.5);
    }
}
