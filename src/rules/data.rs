//! Fixed morphological data.
//!
//! The word lists for the `-an` / `-on` ambiguity and the stems excluded from derivation ship as
//! `data/suffix_ambiguity.json` and are parsed once on first use.

use once_cell::sync::OnceCell;
use serde::Deserialize;

/// Verb endings appended by `verbo_s1` and by the derivation of verb roots.
pub const VERB_ENDINGS: [&str; 13] = ["as", "is", "os", "us", "at", "it", "ot", "ad", "iĝ", "ig", "ant", "int", "ont"];

/// Imperative/infinitive markers appended by `verbo_s2`. The spaced forms only match at a word end.
pub const IMPERATIVE_ENDINGS: [&str; 4] = ["u ", "i ", "u", "i"];

pub const NOUN_ENDINGS: [&str; 3] = ["o", "on", "oj"];
pub const ADJECTIVE_ENDINGS: [&str; 3] = ["a", "aj", "an"];
pub const ADVERB_ENDINGS: [&str; 1] = ["e"];

/// Two-letter roots that may follow another root.
pub const SUFFIX_ROOTS: [&str; 42] = [
    "ad", "ag", "am", "ar", "as", "at", "av", "di", "ec", "eg", "ej", "em", "er", "et", "id", "ig", "il", "in", "ir",
    "is", "it", "lu", "nj", "op", "or", "os", "ot", "ov", "pi", "te", "uj", "ul", "um", "us", "uz", "ĝu", "aĵ", "iĝ",
    "aĉ", "aĝ", "ŝu", "eĥ",
];

/// Two-letter roots that may precede another root.
pub const PREFIX_ROOTS: [&str; 26] = [
    "al", "am", "av", "bo", "di", "du", "ek", "el", "en", "fi", "ge", "ir", "lu", "ne", "ok", "or", "ov", "pi", "re",
    "te", "uz", "ĝu", "aĉ", "aĝ", "ŝu", "eĥ",
];

/// Two-letter words that stand alone between spaces.
pub const STANDALONE_ROOTS: [&str; 40] = [
    "al", "ci", "da", "de", "di", "do", "du", "el", "en", "fi", "ha", "he", "ho", "ia", "ie", "io", "iu", "ja", "je",
    "ju", "ke", "la", "li", "mi", "ne", "ni", "nu", "ok", "ol", "po", "se", "si", "ve", "vi", "ŭa", "aŭ", "ĉe", "ĝi",
    "ŝi", "ĉu",
];

/// Placeholder index offsets of the prefix and standalone groups inside the two-char pool.
pub const PREFIX_OFFSET: usize = 1000;
pub const STANDALONE_OFFSET: usize = 2000;

/// Two-char pool tokens a build consumes.
pub const TWO_CHAR_POOL_NEEDED: usize = STANDALONE_OFFSET + STANDALONE_ROOTS.len();

/// Priority sentinels meaning "remove this word". The integer `-1` is accepted as well.
pub const EXCLUSION_SENTINELS: [&str; 6] = ["-1", "ー１", "ー1", "-１", "－１", "－1"];

/// `[word, endorsed split, alternative split]`. Only the endorsed split drives derivation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct AmbiguityEntry {
    pub word: String,
    pub endorsed: String,
    pub alternative: String,
}

impl From<(String, String, String)> for AmbiguityEntry {
    fn from((word, endorsed, alternative): (String, String, String)) -> Self {
        Self { word, endorsed, alternative }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuffixAmbiguity {
    /// Words ending in `-an` (member-of suffix versus accusative adjective).
    #[serde(default)]
    pub an: Vec<AmbiguityEntry>,
    /// Words ending in `-on` (fraction suffix versus accusative noun).
    #[serde(default)]
    pub on: Vec<AmbiguityEntry>,
    /// Dictionary stems never derived from.
    #[serde(default)]
    pub excluded_stems: Vec<String>,
}

const BUNDLED: &str = include_str!("../../data/suffix_ambiguity.json");

static AMBIGUITY: OnceCell<SuffixAmbiguity> = OnceCell::new();

/// The bundled ambiguity tables.
pub fn bundled_ambiguity() -> Result<&'static SuffixAmbiguity, serde_json::Error> {
    AMBIGUITY.get_or_try_init(|| serde_json::from_str(BUNDLED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_asset_parses() {
        let data = bundled_ambiguity().unwrap();
        assert_eq!(data.an.len(), 55);
        assert_eq!(data.on.len(), 69);
        assert_eq!(data.excluded_stems, vec!["domen", "teren", "posten"]);
        let urban = data.an.iter().find(|e| e.word == "urban").unwrap();
        assert_eq!(urban.endorsed, "/urb/an/");
    }

    #[test]
    fn two_char_offsets_do_not_overlap() {
        assert!(SUFFIX_ROOTS.len() <= PREFIX_OFFSET);
        assert!(PREFIX_OFFSET + PREFIX_ROOTS.len() <= STANDALONE_OFFSET);
    }
}
