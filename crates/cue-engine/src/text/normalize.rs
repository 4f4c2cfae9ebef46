// text/normalize.rs
//
// Alignment alphabet for scripts and transcript fragments.
// Pure functions only; both the matcher and the progress math go through here.

/// Whether `ch` is a CJK ideograph.
///
/// Covers the Unified Ideographs block, Extension A, the compatibility block
/// and Extension B.
#[inline]
pub fn is_ideograph(ch: char) -> bool {
    matches!(
        ch as u32,
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF | 0x20000..=0x2A6DF
    )
}

/// Whether `ch` belongs to the alignment alphabet (letters, digits, ideographs).
#[inline]
pub fn is_alignment_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Strip `text` down to its alignment alphabet, preserving order.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|&c| is_alignment_char(c)).collect()
}

/// Normalize into a char vector, optionally folding ASCII case.
///
/// Only ASCII is folded so the result stays one char per input char.
pub fn normalize_chars(text: &str, fold_ascii_case: bool) -> Vec<char> {
    text.chars()
        .filter(|&c| is_alignment_char(c))
        .map(|c| if fold_ascii_case { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Number of reading units in `text`: one per alphanumeric word run, one per ideograph.
///
/// Used to estimate reading time at a words-per-minute pace for mixed scripts.
pub fn reading_units(text: &str) -> usize {
    let mut units = 0usize;
    let mut in_word = false;

    for ch in text.chars() {
        if is_ideograph(ch) {
            units += 1;
            in_word = false;
        } else if is_alignment_char(ch) {
            if !in_word {
                units += 1;
                in_word = true;
            }
        } else {
            in_word = false;
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_whitespace() {
        assert_eq!(normalize("Hello, world! 123"), "Helloworld123");
        assert_eq!(normalize("你好，世界。"), "你好世界");
        assert_eq!(normalize("  \n\t.,;:!?"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Good evening — and welcome.",
            "大家好，欢迎收看今天的节目！",
            "Mixed 中英 text, with 42 numbers.",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
            assert!(once.chars().all(is_alignment_char));
        }
    }

    #[test]
    fn ideograph_detection() {
        assert!(is_ideograph('中'));
        assert!(is_ideograph('㐀'));
        assert!(!is_ideograph('a'));
        assert!(!is_ideograph('，'));
        assert!(!is_ideograph('か'));
    }

    #[test]
    fn case_folding_only_touches_ascii() {
        let chars = normalize_chars("AbC Ünï 中", true);
        let s: String = chars.iter().collect();
        assert_eq!(s, "abcÜnï中");
    }

    #[test]
    fn reading_units_count_words_and_ideographs() {
        assert_eq!(reading_units("one two, three"), 3);
        assert_eq!(reading_units("你好世界"), 4);
        assert_eq!(reading_units("hello 世界 again"), 4);
        assert_eq!(reading_units("...!"), 0);
    }
}
