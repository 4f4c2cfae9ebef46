use super::normalize::{normalize, reading_units};

/// A loaded script: raw text plus its derived normalized form.
/// Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    raw: String,
    normalized: String,
    normalized_len: usize,
    reading_units: usize,
}

impl Script {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        let normalized_len = normalized.chars().count();
        let reading_units = reading_units(&raw);
        Self {
            raw,
            normalized,
            normalized_len,
            reading_units,
        }
    }

    /// The text as supplied by the loader.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Alignment-alphabet form of the script.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Length of the normalized form, in chars.
    pub fn normalized_len(&self) -> usize {
        self.normalized_len
    }

    /// Words plus ideographs, for words-per-minute pacing.
    pub fn reading_units(&self) -> usize {
        self.reading_units
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_normalized_form() {
        let script = Script::new("Hi there, 你好!");
        assert_eq!(script.normalized(), "Hithere你好");
        assert_eq!(script.normalized_len(), 9);
        assert_eq!(script.reading_units(), 4);
        assert!(!script.is_empty());
    }

    #[test]
    fn punctuation_only_script_is_empty() {
        assert!(Script::new("... !!!").is_empty());
    }
}
