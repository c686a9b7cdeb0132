//! Trigger scanning (input pre-classification).
//!
//! Before each stage the engine looks at the text once and records coarse signals:
//!
//! - **Letters** (`LetterMask`): which letters occur, used to gate rules (see `compiled_rules.rs`).
//! - **Markers**: whether the skip and localized opening delimiters occur at all. Without them the
//!   corresponding masking regex is not run.
//!
//! The scan is a heuristic: a present marker does not mean a span will match.

use super::compiled_rules::LetterMask;
use super::masking::MarkerSpec;

/// Input characteristics detected from the text.
#[derive(Debug, Clone, Copy)]
pub struct TriggerInfo {
    pub letters: LetterMask,
    pub has_skip_marker: bool,
    pub has_local_marker: bool,
}

impl TriggerInfo {
    pub fn scan(text: &str, markers: &MarkerSpec) -> Self {
        TriggerInfo {
            letters: LetterMask::of(text),
            has_skip_marker: text.contains(markers.skip_open.as_str()),
            has_local_marker: text.contains(markers.local_open.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_detects_markers() {
        let info = TriggerInfo::scan("%Nomo% kaj amiko", &MarkerSpec::default());
        assert!(info.has_skip_marker);
        assert!(!info.has_local_marker);
        assert!(info.letters.contains(LetterMask::of("nomkaji")));
    }
}
