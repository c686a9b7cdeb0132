//! Builder inputs and their loaders.
//!
//! Each loader has a `parse_*` form over text and a `read_*` form over a path. Malformed rows are
//! skipped; a malformed document is an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::data::SuffixAmbiguity;
use crate::error::{Error, Result};
use crate::script;

bitflags::bitflags! {
    /// Part-of-speech tags of a dictionary stem. A stem may carry several.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct PartOfSpeech: u8 {
        const NOUN      = 1 << 0;
        const ADJECTIVE = 1 << 1;
        const ADVERB    = 1 << 2;
        const VERB      = 1 << 3;
        /// Any tag not listed above.
        const OTHER     = 1 << 4;
    }
}

impl PartOfSpeech {
    /// Parse a comma-separated tag list. Chinese (`名词`, `形容词`, `副词`, `动词`) and English tags are
    /// both understood.
    pub fn parse(tags: &str) -> Self {
        tags.split(',').map(str::trim).filter(|t| !t.is_empty()).fold(PartOfSpeech::empty(), |acc, tag| {
            acc | match tag.to_lowercase().as_str() {
                "名词" | "noun" => PartOfSpeech::NOUN,
                "形容词" | "adjective" => PartOfSpeech::ADJECTIVE,
                "副词" | "adverb" => PartOfSpeech::ADVERB,
                "动词" | "verb" => PartOfSpeech::VERB,
                _ => PartOfSpeech::OTHER,
            }
        })
    }
}

/// A root and its gloss from the gloss table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossPair {
    pub root: String,
    pub gloss: String,
}

impl GlossPair {
    pub fn new(root: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self { root: root.into(), gloss: gloss.into() }
    }
}

/// A dictionary stem (possibly `/`-segmented) with its part-of-speech tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct DictionaryEntry {
    pub stem: String,
    pub pos: PartOfSpeech,
}

impl DictionaryEntry {
    pub fn new(stem: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self { stem: stem.into(), pos }
    }
}

impl From<(String, String)> for DictionaryEntry {
    fn from((stem, tags): (String, String)) -> Self {
        Self { stem, pos: PartOfSpeech::parse(&tags) }
    }
}

/// Everything the rule builder consumes.
#[derive(Debug, Clone, Default)]
pub struct RankerInputs {
    /// Every known root, one per entry.
    pub roots: Vec<String>,
    pub glosses: Vec<GlossPair>,
    pub dictionary: Vec<DictionaryEntry>,
    /// Raw `[root, priority, flags]` rows.
    pub stem_overrides: Vec<Value>,
    /// Raw `[rootPattern, priority, flags, replacementPattern]` rows.
    pub replacement_overrides: Vec<Value>,
    /// Replaces the bundled ambiguity tables when set.
    pub ambiguity: Option<SuffixAmbiguity>,
}

/// Paths of the builder input files.
#[derive(Debug, Clone, Default)]
pub struct InputFiles {
    pub roots: PathBuf,
    pub glosses: PathBuf,
    pub dictionary: PathBuf,
    pub stem_overrides: Option<PathBuf>,
    pub replacement_overrides: Option<PathBuf>,
    pub ambiguity: Option<PathBuf>,
}

impl RankerInputs {
    pub fn read(files: &InputFiles) -> Result<Self> {
        let stem_overrides = match &files.stem_overrides {
            Some(path) => read_directives(path)?,
            None => Vec::new(),
        };
        let replacement_overrides = match &files.replacement_overrides {
            Some(path) => read_directives(path)?,
            None => Vec::new(),
        };
        let ambiguity = match &files.ambiguity {
            Some(path) => Some(serde_json::from_str(&read_text(path)?)?),
            None => None,
        };
        Ok(Self {
            roots: read_roots(&files.roots)?,
            glosses: read_glosses(&files.glosses)?,
            dictionary: read_dictionary(&files.dictionary)?,
            stem_overrides,
            replacement_overrides,
            ambiguity,
        })
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| Error::io(path, err))
}

/// One root per line. Blank and digit-only lines are skipped.
pub fn parse_roots(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.chars().all(char::is_numeric))
        .map(str::to_string)
        .collect()
}

pub fn read_roots(path: impl AsRef<Path>) -> Result<Vec<String>> {
    Ok(parse_roots(&read_text(path.as_ref())?))
}

/// Two-column CSV with a header row. The text is folded to circumflex letters first; rows with an
/// empty field or a `#` in the root are skipped.
pub fn parse_glosses(text: &str) -> Result<Vec<GlossPair>> {
    let text = script::to_circumflex(text);
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(text.as_bytes());
    let mut pairs = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(root), Some(gloss)) if !root.is_empty() && !gloss.is_empty() && !root.contains('#') => {
                pairs.push(GlossPair::new(root, gloss));
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("gloss table: skipped {skipped} rows");
    }
    Ok(pairs)
}

pub fn read_glosses(path: impl AsRef<Path>) -> Result<Vec<GlossPair>> {
    parse_glosses(&read_text(path.as_ref())?)
}

/// A JSON array of `[stem, tags]` pairs. Entries of any other shape are skipped.
pub fn parse_dictionary(text: &str) -> Result<Vec<DictionaryEntry>> {
    let rows: Vec<Value> = serde_json::from_str(text)?;
    let total = rows.len();
    let entries: Vec<DictionaryEntry> =
        rows.into_iter().filter_map(|row| serde_json::from_value::<DictionaryEntry>(row).ok()).collect();
    if entries.len() < total {
        log::debug!("dictionary: skipped {} malformed entries", total - entries.len());
    }
    Ok(entries)
}

pub fn read_dictionary(path: impl AsRef<Path>) -> Result<Vec<DictionaryEntry>> {
    parse_dictionary(&read_text(path.as_ref())?)
}

/// A JSON array of directive rows. Rows are interpreted later, one at a time.
pub fn parse_directives(text: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(rows) => Ok(rows),
        other => Err(Error::InvalidInput(format!("directive list must be a JSON array, found {}", kind_of(&other)))),
    }
}

pub fn read_directives(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    parse_directives(&read_text(path.as_ref())?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
