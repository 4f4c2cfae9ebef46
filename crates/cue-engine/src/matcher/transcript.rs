/// Turns cumulative recognizer results into appended deltas.
///
/// Streaming recognizers usually report the whole utterance so far on every
/// update. The matcher wants only what is new. When the recognizer revises its
/// tail, the delta starts at the first changed char.
#[derive(Debug, Default, Clone)]
pub struct TranscriptDelta {
    previous: String,
}

impl TranscriptDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// New text in `cumulative` since the last call, or `None` when nothing was added.
    pub fn delta(&mut self, cumulative: &str) -> Option<String> {
        let shared = common_prefix_bytes(&self.previous, cumulative);
        let fresh = &cumulative[shared..];
        let out = (!fresh.is_empty()).then(|| fresh.to_string());
        self.previous.clear();
        self.previous.push_str(cumulative);
        out
    }

    /// Forget the previous result; call when the recognizer restarts.
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

/// Byte length of the longest common char prefix, always a char boundary of `b`.
fn common_prefix_bytes(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}
