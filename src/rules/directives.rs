//! User override directives.
//!
//! Two lists, both JSON arrays of rows:
//!
//! ```text
//! stem overrides         [root, priority, flags]
//! replacement overrides  [rootPattern, priority, flags, replacementPattern]
//! ```
//!
//! `priority` is `"dflt"` (length * 10000), an integer or digit string, or an exclusion sentinel
//! (`-1` and its full-width spellings). `flags` is a list of strings: `ne` (the bare word),
//! `verbo_s1` (verb endings), `verbo_s2` (imperative/infinitive markers), anything else is a literal
//! suffix.
//!
//! A first row whose arity does not match the list is a header and is dropped. Any other row that
//! cannot be interpreted becomes a [`SkippedDirective`]; the build carries on without it.

use std::fmt;

use serde_json::Value;

use super::data::{EXCLUSION_SENTINELS, IMPERATIVE_ENDINGS, VERB_ENDINGS};
use super::ranker::{Resolver, WorkingMap, strip_slashes};
use crate::char_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectivePriority {
    /// Length of the word times 10000.
    Default,
    Explicit(i64),
    /// Remove the named forms instead of adding them.
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuffixGroup {
    /// `ne`: the bare word.
    Bare,
    /// `verbo_s1`: the word plus each verb ending.
    VerbEndings,
    /// `verbo_s2`: the word plus `u `, `i `, `u`, `i`.
    ImperativeEndings,
    /// Any other flag: the word plus this literal suffix (which may carry `/` segmentation).
    Explicit(String),
}

impl SuffixGroup {
    pub fn parse(flag: &str) -> Self {
        match flag {
            "ne" => SuffixGroup::Bare,
            "verbo_s1" => SuffixGroup::VerbEndings,
            "verbo_s2" => SuffixGroup::ImperativeEndings,
            other => SuffixGroup::Explicit(other.to_string()),
        }
    }
}

/// Where the replacement of a directive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlossSource {
    /// Resolve the root through the base rules.
    Resolved,
    /// Explicit `(root segment, gloss segment)` pairs, formatted one by one.
    Segments(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// The root as written, possibly `/`-segmented.
    pub root: String,
    pub priority: DirectivePriority,
    pub groups: Vec<SuffixGroup>,
    pub source: GlossSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveList {
    StemOverrides,
    ReplacementOverrides,
}

impl DirectiveList {
    pub fn arity(self) -> usize {
        match self {
            DirectiveList::StemOverrides => 3,
            DirectiveList::ReplacementOverrides => 4,
        }
    }
}

impl fmt::Display for DirectiveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveList::StemOverrides => f.write_str("stem overrides"),
            DirectiveList::ReplacementOverrides => f.write_str("replacement overrides"),
        }
    }
}

/// A directive row that was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDirective {
    pub list: DirectiveList,
    /// Position of the row in its list, header included.
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for SkippedDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row {}: {}", self.list, self.index, self.reason)
    }
}

/// Interpret every row of `list`, keeping the good ones in order.
pub fn parse_directives(list: DirectiveList, rows: &[Value]) -> (Vec<Directive>, Vec<SkippedDirective>) {
    let mut directives = Vec::new();
    let mut skipped = Vec::new();
    let header = rows.first().is_some_and(|row| row.as_array().is_none_or(|a| a.len() != list.arity()));
    if header {
        log::debug!("{list}: dropping header row");
    }
    for (index, row) in rows.iter().enumerate().skip(usize::from(header)) {
        match parse_row(list, row) {
            Ok(directive) => directives.push(directive),
            Err(reason) => skipped.push(SkippedDirective { list, index, reason }),
        }
    }
    (directives, skipped)
}

fn parse_row(list: DirectiveList, row: &Value) -> Result<Directive, String> {
    let fields = row.as_array().ok_or_else(|| "row is not an array".to_string())?;
    if fields.len() != list.arity() {
        return Err(format!("expected {} fields, found {}", list.arity(), fields.len()));
    }
    let root = fields[0].as_str().ok_or_else(|| "root is not a string".to_string())?.to_string();
    if strip_slashes(&root).is_empty() {
        return Err("root is empty".to_string());
    }
    let priority = parse_priority(&fields[1])?;
    let groups = parse_groups(&fields[2])?;
    let source = match list {
        DirectiveList::StemOverrides => GlossSource::Resolved,
        DirectiveList::ReplacementOverrides => {
            let replacement = fields[3].as_str().ok_or_else(|| "replacement is not a string".to_string())?;
            let roots: Vec<&str> = root.trim_matches('/').split('/').collect();
            let glosses: Vec<&str> = replacement.trim_matches('/').split('/').collect();
            if roots.len() != glosses.len() {
                return Err(format!(
                    "{} root segments but {} replacement segments in '{root}' / '{replacement}'",
                    roots.len(),
                    glosses.len()
                ));
            }
            GlossSource::Segments(roots.into_iter().zip(glosses).map(|(r, g)| (r.to_string(), g.to_string())).collect())
        }
    };
    Ok(Directive { root, priority, groups, source })
}

fn parse_priority(value: &Value) -> Result<DirectivePriority, String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(-1) => Ok(DirectivePriority::Exclude),
            Some(p) => Ok(DirectivePriority::Explicit(p)),
            None => Err(format!("priority {n} is not an integer")),
        },
        Value::String(s) if s == "dflt" => Ok(DirectivePriority::Default),
        Value::String(s) if EXCLUSION_SENTINELS.contains(&s.as_str()) => Ok(DirectivePriority::Exclude),
        Value::String(s) => {
            parse_digits(s).map(DirectivePriority::Explicit).ok_or_else(|| format!("unrecognized priority '{s}'"))
        }
        other => Err(format!("unrecognized priority {other}")),
    }
}

/// ASCII or full-width decimal digits.
fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    s.chars().try_fold(0i64, |acc, c| {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        acc.checked_mul(10)?.checked_add(i64::from(digit))
    })
}

fn parse_groups(value: &Value) -> Result<Vec<SuffixGroup>, String> {
    let flags = value.as_array().ok_or_else(|| "flags are not a list".to_string())?;
    let mut groups = Vec::with_capacity(flags.len());
    for flag in flags {
        let flag = flag.as_str().ok_or_else(|| format!("flag {flag} is not a string"))?;
        let group = SuffixGroup::parse(flag);
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    Ok(groups)
}

impl Directive {
    /// Add (or, for exclusions, remove) this directive's forms in `working`.
    ///
    /// Groups are applied in a fixed order: bare word, verb endings, imperative endings, explicit
    /// suffixes. Without any explicit suffix the bare word is added as well.
    pub(crate) fn apply(&self, working: &mut WorkingMap, resolver: &Resolver<'_>) {
        let word = strip_slashes(&self.root);
        let has = |g: &SuffixGroup| self.groups.contains(g);
        let explicit: Vec<&str> = self
            .groups
            .iter()
            .filter_map(|g| match g {
                SuffixGroup::Explicit(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();

        let priority = match self.priority {
            DirectivePriority::Exclude => {
                working.shift_remove(&word);
                if has(&SuffixGroup::VerbEndings) {
                    for ending in VERB_ENDINGS {
                        working.shift_remove(&format!("{word}{ending}"));
                    }
                }
                if has(&SuffixGroup::ImperativeEndings) {
                    for ending in IMPERATIVE_ENDINGS {
                        working.shift_remove(&format!("{word}{ending}"));
                    }
                }
                for suffix in explicit {
                    working.shift_remove(&format!("{word}{}", strip_slashes(suffix)));
                }
                return;
            }
            DirectivePriority::Default => (char_len(&word) * 10000) as i64,
            DirectivePriority::Explicit(p) => p,
        };

        let gloss = match &self.source {
            GlossSource::Resolved => resolver.resolve(&self.root),
            GlossSource::Segments(segments) => {
                segments.iter().map(|(root, gloss)| resolver.format().annotate(root, gloss)).collect()
            }
        };

        if has(&SuffixGroup::Bare) {
            working.insert(word.clone(), (gloss.clone(), priority).into());
        }
        if has(&SuffixGroup::VerbEndings) {
            for (ending, ending_gloss) in resolver.verb_endings() {
                let p = priority + (char_len(ending) * 10000) as i64;
                working.insert(format!("{word}{ending}"), (format!("{gloss}{ending_gloss}"), p).into());
            }
        }
        if has(&SuffixGroup::ImperativeEndings) {
            for ending in IMPERATIVE_ENDINGS {
                let p = priority + (char_len(ending) * 10000) as i64;
                working.insert(format!("{word}{ending}"), (format!("{gloss}{ending}"), p).into());
            }
        }
        if explicit.is_empty() {
            working.insert(word, (gloss, priority).into());
        } else {
            for suffix in explicit {
                let plain = strip_slashes(suffix);
                let p = priority + (char_len(&plain) * 10000) as i64;
                working.insert(format!("{word}{plain}"), (format!("{gloss}{}", resolver.resolve(suffix)), p).into());
            }
        }
    }
}
