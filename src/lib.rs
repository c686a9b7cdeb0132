use serde::{Deserialize, Serialize};

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
pub mod placeholder;
mod rules;
pub mod script;

pub use api::{
    BuildOutput, ConvertDetails, ConvertResult, Converter, MarkerSpec, Options, StageSummary, build_rules,
    parallel_substitute, substitute,
};
pub use error::{Error, Result};
pub use placeholder::{PlaceholderPool, Placeholders, PoolKind, import_placeholders};
pub use rules::{
    AmbiguityEntry, AnnotationFormat, BuildReport, DictionaryEntry, Directive, DirectiveList, DirectivePriority,
    GlossPair, GlossSource, InputFiles, PartOfSpeech, RankerInputs, RankerOptions, RuleDatabase, SkippedDirective,
    SuffixAmbiguity, SuffixGroup, bundled_ambiguity,
};
pub use script::LetterForm;

// --- Core types -------------------------------------------------------------

type RuleTuple = (String, String, String);

/// One rewrite: every occurrence of `pattern` becomes `replacement`, routed through `placeholder` so
/// the replacement text is never rescanned.
///
/// Serialized as the 3-element array `[pattern, replacement, placeholder]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleTuple", into = "RuleTuple")]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
    pub placeholder: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), replacement: replacement.into(), placeholder: placeholder.into() }
    }
}

impl From<RuleTuple> for Rule {
    fn from((pattern, replacement, placeholder): RuleTuple) -> Self {
        Self { pattern, replacement, placeholder }
    }
}

impl From<Rule> for RuleTuple {
    fn from(rule: Rule) -> Self {
        (rule.pattern, rule.replacement, rule.placeholder)
    }
}

/// An ordered list of rules. The order is the priority order: earlier rules win.
///
/// Tables are built once and never mutated afterwards; every engine run borrows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn get(&self, pattern: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.pattern == pattern)
    }

    /// Apply every rule in order, hiding each replacement behind its placeholder until all rules have
    /// run. A replacement therefore never feeds a later pattern.
    ///
    /// ```text
    /// "amiko"  --[amik -> $1$]-->  "$1$o"  --[am: no match]-->  "$1$o"  --restore-->  "<amik>o"
    /// ```
    pub fn safe_replace(&self, text: &str) -> String {
        let mut out = text.to_string();
        let mut applied: Vec<&Rule> = Vec::new();
        for rule in &self.rules {
            if out.contains(rule.pattern.as_str()) {
                out = out.replace(rule.pattern.as_str(), &rule.placeholder);
                applied.push(rule);
            }
        }
        for rule in applied {
            out = out.replace(rule.placeholder.as_str(), &rule.replacement);
        }
        out
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self { rules: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Number of characters (not bytes) in `s`. Every length in rule priorities counts characters.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
