// matcher/anchor.rs
//
// Anchor strategy: search the longest suffix of recent input inside a window
// ahead of the last matched index. Short suffixes may only jump short distances;
// longer ones are trusted further.

use log::debug;

use super::{find_chars, MatchCursor, MatcherConfig, StreamMatcher};
use crate::text::{is_ideograph, normalize_chars};

pub struct AnchorMatcher {
    cursor: MatchCursor,
    config: MatcherConfig,
}

impl AnchorMatcher {
    pub fn new(script: &str, start_fraction: f32, config: MatcherConfig) -> Self {
        Self {
            cursor: MatchCursor::new(script, start_fraction, &config),
            config,
        }
    }

    /// Index just past the best accepted suffix hit, if any.
    fn locate(&self) -> Option<usize> {
        let config = &self.config;
        let window = self.cursor.window(config.window);
        let recent = self.cursor.recent();
        let max_len = recent.len().min(config.max_suffix_len);
        let min_len = config.min_suffix_len.max(1);

        for len in (min_len..=max_len).rev() {
            let suffix = &recent[recent.len() - len..];
            let is_cjk = suffix.iter().any(|&c| is_ideograph(c));
            let short_latin = !is_cjk && len < config.min_latin_suffix;
            if short_latin && len < config.contiguous_latin_suffix {
                continue;
            }

            let Some(distance) = find_chars(window, suffix) else {
                continue;
            };
            if short_latin && distance != 0 {
                continue;
            }

            let max_distance = config.max_allowed_distance(len, is_cjk);
            if distance as f32 > max_distance {
                debug!(
                    "anchor: suffix len {} at distance {} exceeds {}",
                    len, distance, max_distance
                );
                continue;
            }

            return Some(self.cursor.last_index() + distance + len);
        }

        None
    }
}

impl StreamMatcher for AnchorMatcher {
    fn feed(&mut self, fragment: &str) -> Option<f32> {
        let clean = normalize_chars(fragment, self.config.fold_ascii_case);
        if clean.is_empty() || self.cursor.script_len() == 0 {
            return None;
        }
        self.cursor.push_recent(&clean);

        let new_index = self.locate()?;
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

    fn matcher(script: &str, window: usize) -> AnchorMatcher {
        AnchorMatcher::new(
            script,
            0.0,
            MatcherConfig { window, ..MatcherConfig::default() },
        )
    }

    #[test]
    fn contiguous_fragments_advance_in_order() {
        let mut m = matcher("ABCDEFGHIJ", 10);
        assert_eq!(m.feed("ABC"), Some(0.3));
        assert_eq!(m.feed("DEF"), Some(0.6));
        assert_eq!(m.feed("GHI"), Some(0.9));
        assert_eq!(m.last_index(), 9);
    }

    #[test]
    fn short_suffix_too_far_does_not_advance() {
        // 2-char CJK suffix: limit is 10 * 1.5 = 15
        let filler: String = std::iter::repeat('一').take(16).collect();
        let mut m = matcher(&format!("{}你好世界", filler), 150);
        assert_eq!(m.feed("你好"), None);
        assert_eq!(m.last_index(), 0);

        let filler: String = std::iter::repeat('一').take(15).collect();
        let mut m = matcher(&format!("{}你好世界", filler), 150);
        assert_eq!(m.feed("你好"), Some(17.0 / 19.0));
    }

    #[test]
    fn short_latin_suffix_needs_contiguity() {
        let filler = "0123456789abcde";
        let mut m = matcher(&format!("{}qz{}", filler, filler), 150);
        assert_eq!(m.feed("qz"), None);
        assert_eq!(m.feed("..."), None);
        assert_eq!(m.last_index(), 0);

        let mut m = matcher(&format!("{}xyz", filler), 150);
        assert_eq!(m.feed("xyz"), None, "3-char latin hit at distance 15 must be ignored");
    }

    #[test]
    fn long_match_may_jump_far() {
        let filler: String = "0123456789".repeat(10);
        let script = format!("{}helloworld{}", filler, "tail");
        let mut m = matcher(&script, 150);
        let p = m.feed("hello world").expect("long match should be accepted");
        assert_eq!(m.last_index(), 110);
        assert!((p - 110.0 / 114.0).abs() < 1e-6);
    }

    #[test]
    fn falls_back_to_shorter_suffix_nearby() {
        let filler: String = "0123456789".repeat(20);
        let script = format!("efgh{}abcdefgh", filler);
        let mut m = matcher(&script, 300);
        assert!(m.feed("abcdefgh").is_some());
        assert_eq!(m.last_index(), 4);
    }

    #[test]
    fn empty_and_noise_fragments_are_ignored() {
        let mut m = matcher("The quick brown fox jumps", 150);
        assert_eq!(m.feed(""), None);
        assert_eq!(m.feed("  ,,, !!"), None);
        assert_eq!(m.feed("zzzzzzzz"), None);
        assert_eq!(m.last_index(), 0);
        assert!(m.feed("the quick").is_some());
    }

    #[test]
    fn repeated_fragment_does_not_move_twice() {
        let mut m = matcher("ABCDEFGHIJ", 10);
        assert_eq!(m.feed("ABC"), Some(0.3));
        assert_eq!(m.feed("ABC"), None);
        assert_eq!(m.last_index(), 3);
    }

    #[test]
    fn cjk_stream_advances() {
        let mut m = matcher("今天天气很好，我们去公园散步吧。", 150);
        let a = m.feed("今天天气").unwrap();
        let b = m.feed("很好").unwrap();
        let c = m.feed("我们去公园").unwrap();
        assert!(a < b && b < c);
        assert_eq!(m.last_index(), 11);
    }

    #[test]
    fn last_index_never_decreases() {
        let script = "Four score and seven years ago our fathers brought forth on this continent a new nation";
        let fragments = [
            "four score", "", "and", "seven years", "???", "ago our", "fathers", "four score",
            "brought", "forth on", "xyzzy plugh", "this continent", "a new", "nation", "nation",
        ];
        let mut m = matcher(script, 150);
        let mut last_index = m.last_index();
        let mut last_fraction = 0.0;
        // Cycle through twice, interleaving with a deterministic shuffle
        let mut seed = 7u32;
        for _ in 0..60 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let frag = fragments[(seed >> 16) as usize % fragments.len()];
            if let Some(p) = m.feed(frag) {
                assert!(p > last_fraction, "fraction went from {} to {}", last_fraction, p);
                last_fraction = p;
            }
            assert!(m.last_index() >= last_index);
            assert!(m.last_index() <= m.cursor().script_len());
            last_index = m.last_index();
        }
    }

    #[test]
    fn empty_script_never_matches() {
        let mut m = matcher("!!!", 150);
        assert_eq!(m.feed("anything"), None);
        assert_eq!(m.progress(), 0.0);
    }

    #[test]
    fn resync_reanchors_search_window() {
        let mut m = matcher("alpha bravo charlie delta echo foxtrot", 150);
        m.resync(0.5);
        let start = m.last_index();
        // "alpha" is now behind the window
        assert_eq!(m.feed("alpha"), None);
        assert!(m.feed("echo").is_some());
        assert!(m.last_index() > start);
    }
}
