//! Rule ranking: from roots, glosses and a part-of-speech dictionary to the three rule tables.
//!
//! The build is a pipeline of stages, each consuming the previous stage's map:
//!
//! ```text
//! roots + glosses ── seed ──> base rules (longest root first, global placeholders)
//!                                 │ resolve = safe_replace through the base rules
//!                                 v
//! dictionary ── resolve_stems ──> stems ── weigh ──> weighted ── derive ──> working map
//!                                                                   │
//!                               -an / -on ambiguity tables ─────────┤
//!                               stem overrides ─────────────────────┤
//!                               replacement overrides ──────────────┤
//!                                                                   v
//!                                          collapse (sort by priority, case-expand) = global table
//! two-letter roots ── two_char_table                                               = two-char table
//! glosses ── local_table                                                           = local table
//! ```
//!
//! Priorities are `length * 10000` plus fixed offsets. A derived form is always scored below a
//! genuine entry of the same visible length (`-2000`, `-3000`, `-5000`), and a curated `-an` / `-on`
//! split is scored above the generic parse of the same word (`(length - 1) * 10000 + 3000`).
//!
//! Insertion order matters: a later insertion of an existing pattern overwrites its value but keeps
//! its position, and the final sort is stable.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use rayon::prelude::*;

use super::data::{
    ADJECTIVE_ENDINGS, ADVERB_ENDINGS, IMPERATIVE_ENDINGS, NOUN_ENDINGS, PREFIX_OFFSET, PREFIX_ROOTS,
    STANDALONE_OFFSET, STANDALONE_ROOTS, SUFFIX_ROOTS, SuffixAmbiguity, TWO_CHAR_POOL_NEEDED, VERB_ENDINGS,
    bundled_ambiguity,
};
use super::directives::{DirectiveList, SkippedDirective, parse_directives};
use super::format::{self, AnnotationFormat, capitalize_annotation, strip_redundant};
use super::inputs::{DictionaryEntry, GlossPair, PartOfSpeech, RankerInputs};
use crate::error::{Error, Result};
use crate::placeholder::{PlaceholderPool, Placeholders, PoolKind};
use crate::{Rule, RuleTable, char_len};

/// Priorities of unchanged-length genuine roots of two to six letters.
const GENUINE_SHORT: [i64; 5] = [20000, 30000, 40000, 50000, 60000];

#[derive(Debug, Clone)]
pub struct RankerOptions {
    pub format: AnnotationFormat,
    /// Threads used to resolve dictionary stems. `0` and `1` resolve on the calling thread.
    pub workers: usize,
    pub placeholders: Placeholders,
}

impl Default for RankerOptions {
    fn default() -> Self {
        Self { format: AnnotationFormat::default(), workers: 1, placeholders: Placeholders::default() }
    }
}

/// What a build produced, stage by stage.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// `(stage, entries in the working map after it)`, in pipeline order.
    pub stages: Vec<(&'static str, usize)>,
    pub skipped: Vec<SkippedDirective>,
    pub global_rules: usize,
    pub two_char_rules: usize,
    pub local_rules: usize,
    pub elapsed: Duration,
}

impl BuildReport {
    fn stage(&mut self, name: &'static str, entries: usize) {
        log::debug!("{name}: {entries} entries");
        self.stages.push((name, entries));
    }
}

/// A pattern's replacement and priority while the global table is being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub replacement: String,
    pub priority: i64,
}

impl From<(String, i64)> for Candidate {
    fn from((replacement, priority): (String, i64)) -> Self {
        Self { replacement, priority }
    }
}

pub(crate) type WorkingMap = IndexMap<String, Candidate>;

pub(crate) fn strip_slashes(text: &str) -> String {
    text.replace('/', "")
}

/// Drop `/` segmentation marks while keeping the slash of closing `</rt></ruby>` tags.
pub(crate) fn strip_segmentation(text: &str) -> String {
    const CLOSE: &str = "</rt></ruby>";
    text.split(CLOSE).map(strip_slashes).collect::<Vec<_>>().join(CLOSE)
}

/// Resolves text through the base rules.
pub(crate) struct Resolver<'a> {
    base: &'a RuleTable,
    format: AnnotationFormat,
    verb_endings: Vec<(&'static str, String)>,
}

impl<'a> Resolver<'a> {
    pub fn new(base: &'a RuleTable, format: AnnotationFormat) -> Self {
        let verb_endings = VERB_ENDINGS.iter().map(|&e| (e, base.safe_replace(e))).collect();
        Self { base, format, verb_endings }
    }

    /// The annotated form of `text` with segmentation marks removed.
    pub fn resolve(&self, text: &str) -> String {
        strip_segmentation(&self.base.safe_replace(text))
    }

    pub fn resolve_raw(&self, text: &str) -> String {
        self.base.safe_replace(text)
    }

    pub fn format(&self) -> AnnotationFormat {
        self.format
    }

    /// Each verb ending with its own annotated form.
    pub fn verb_endings(&self) -> &[(&'static str, String)] {
        &self.verb_endings
    }
}

/// Build the three tables.
pub fn build(inputs: &RankerInputs, options: &RankerOptions) -> Result<(super::RuleDatabase, BuildReport)> {
    let start = Instant::now();
    let ambiguity: &SuffixAmbiguity = match &inputs.ambiguity {
        Some(custom) => custom,
        None => bundled_ambiguity()?,
    };
    let mut report = BuildReport::default();

    let seeded = seed(&inputs.roots, &inputs.glosses, options.format);
    report.stage("seeded roots", seeded.len());

    let base_pool = options.placeholders.pool(PoolKind::Global, seeded.len())?;
    let base = base_rules(seeded, &base_pool)?;
    let resolver = Resolver::new(&base, options.format);

    let stems = resolve_stems(&inputs.dictionary, &resolver, &ambiguity.excluded_stems, options.workers)?;
    report.stage("dictionary stems", stems.len());

    let mut working = derive(weigh(stems), &resolver);
    report.stage("derived forms", working.len());

    apply_ambiguity(&mut working, ambiguity, &resolver);
    report.stage("after -an/-on tables", working.len());

    for (list, rows, stage) in [
        (DirectiveList::StemOverrides, &inputs.stem_overrides, "after stem overrides"),
        (DirectiveList::ReplacementOverrides, &inputs.replacement_overrides, "after replacement overrides"),
    ] {
        let (directives, skipped) = parse_directives(list, rows);
        for directive in &directives {
            directive.apply(&mut working, &resolver);
        }
        for skip in &skipped {
            log::warn!("skipped {skip}");
        }
        report.skipped.extend(skipped);
        report.stage(stage, working.len());
    }

    let global_pool = options.placeholders.pool(PoolKind::Global, working.len())?;
    let global = collapse(working, options.format, &global_pool)?;
    let two_char_pool = options.placeholders.pool(PoolKind::TwoChar, TWO_CHAR_POOL_NEEDED)?;
    let two_char = two_char_table(&resolver, &two_char_pool)?;
    let local_pool = options.placeholders.pool(PoolKind::Local, inputs.glosses.len() * 3)?;
    let local = local_table(&inputs.glosses, options.format, &local_pool)?;

    report.global_rules = global.len();
    report.two_char_rules = two_char.len();
    report.local_rules = local.len();
    report.elapsed = start.elapsed();
    log::info!(
        "built {} global, {} two-char and {} local rules in {:?} ({} directives skipped)",
        report.global_rules,
        report.two_char_rules,
        report.local_rules,
        report.elapsed,
        report.skipped.len()
    );

    Ok((super::RuleDatabase { global, two_char, local }, report))
}

// --- Stage 1-3: base rules ----------------------------------------------------

/// Every root maps to itself; glossed roots map to their annotation. Priority is the root length.
fn seed(roots: &[String], glosses: &[GlossPair], format: AnnotationFormat) -> IndexMap<String, (String, usize)> {
    let mut map = IndexMap::with_capacity(roots.len());
    for root in roots {
        map.insert(root.clone(), (root.clone(), char_len(root)));
    }
    for pair in glosses {
        map.insert(pair.root.clone(), (format.annotate(&pair.root, &pair.gloss), char_len(&pair.root)));
    }
    map
}

/// Longest root first, one global placeholder per rule.
fn base_rules(seeded: IndexMap<String, (String, usize)>, pool: &PlaceholderPool) -> Result<RuleTable> {
    let mut entries: Vec<(String, (String, usize))> = seeded.into_iter().collect();
    entries.sort_by(|a, b| b.1.1.cmp(&a.1.1));
    pool.ensure(entries.len())?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, (pattern, (replacement, _)))| Ok(Rule::new(pattern, replacement, pool.get(index)?)))
        .collect()
}

// --- Stage 4: dictionary ------------------------------------------------------

#[derive(Debug, Clone)]
struct Stem {
    resolved: String,
    pos: PartOfSpeech,
}

/// Merge duplicate stems, then resolve each one. Resolution is the expensive step and runs on a
/// dedicated pool when `workers > 1`; results keep dictionary order either way.
fn resolve_stems(
    dictionary: &[DictionaryEntry],
    resolver: &Resolver<'_>,
    excluded: &[String],
    workers: usize,
) -> Result<IndexMap<String, Stem>> {
    let mut merged: IndexMap<&str, PartOfSpeech> = IndexMap::new();
    for entry in dictionary.iter().filter(|e| char_len(&e.stem) >= 2) {
        *merged.entry(entry.stem.as_str()).or_insert(PartOfSpeech::empty()) |= entry.pos;
    }
    let stems: Vec<&str> = merged.keys().copied().collect();

    let resolved: Vec<String> = if workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|err| Error::Worker(err.to_string()))?;
        log::debug!("resolving {} stems on {workers} threads", stems.len());
        pool.install(|| stems.par_iter().map(|s| resolver.resolve_raw(s)).collect())
    } else {
        stems.iter().map(|s| resolver.resolve_raw(s)).collect()
    };

    let mut out: IndexMap<String, Stem> = merged
        .into_iter()
        .zip(resolved)
        .map(|((stem, pos), resolved)| (stem.to_string(), Stem { resolved, pos }))
        .collect();
    for stem in excluded {
        out.shift_remove(stem);
    }
    Ok(out)
}

#[derive(Debug, Clone)]
struct Weighted {
    replacement: String,
    pos: PartOfSpeech,
    priority: i64,
}

/// Strip segmentation and score: `length * 10000`, minus 3000 when the stem resolved to itself.
fn weigh(stems: IndexMap<String, Stem>) -> IndexMap<String, Weighted> {
    let mut out = IndexMap::with_capacity(stems.len());
    for (stem, Stem { resolved, pos }) in stems {
        let key = strip_slashes(&stem);
        let mut priority = (char_len(&key) * 10000) as i64;
        if stem == resolved {
            priority -= 3000;
        }
        out.insert(key, Weighted { replacement: strip_segmentation(&resolved), pos, priority });
    }
    out
}

/// Adds derived forms to the working map. Forms derived with a differing parse from an existing
/// dictionary entry are locked so the entry cannot overwrite them later.
struct Derivation<'a> {
    weighted: &'a IndexMap<String, Weighted>,
    working: WorkingMap,
    locked: HashSet<String>,
}

impl Derivation<'_> {
    fn insert(&mut self, pattern: String, replacement: String, priority: i64) {
        self.working.insert(pattern, Candidate { replacement, priority });
    }

    /// Add `form` unless the dictionary already has it. `pattern` may differ from `form` by a
    /// leading space.
    fn add_if_absent(&mut self, form: &str, pattern: String, replacement: String, priority: i64) {
        if !self.weighted.contains_key(form) {
            self.insert(pattern, replacement, priority);
        }
    }

    /// Add `form`, overriding and locking a dictionary entry whose parse differs.
    fn add_or_override(&mut self, form: String, replacement: String, priority: i64) {
        match self.weighted.get(&form) {
            None => self.insert(form, replacement, priority),
            Some(existing) if existing.replacement != replacement => {
                self.locked.insert(form.clone());
                self.insert(form, replacement, priority);
            }
            Some(_) => {}
        }
    }
}

fn ending_priority(base: i64, ending: &str, offset: i64) -> i64 {
    base + (char_len(ending) * 10000) as i64 + offset
}

fn derive(mut weighted: IndexMap<String, Weighted>, resolver: &Resolver<'_>) -> WorkingMap {
    let an_gloss = resolver.resolve_raw("an");
    let mut working = WorkingMap::new();

    // Nouns ending in a glossed `-an` whose stem is itself a root, and short unchanged nouns, are
    // replaced by their ending-bearing forms.
    let mut retired: HashSet<String> = HashSet::new();
    for (stem, w) in &weighted {
        let an_stem = stem.strip_suffix("an");
        if let Some(bare) = an_stem {
            let glossed = w.replacement.contains(&an_gloss) && w.pos.contains(PartOfSpeech::NOUN);
            if glossed && weighted.contains_key(bare) {
                retired.insert(stem.clone());
                for k in ["o", "a", "e"] {
                    let form = format!("{stem}{k}");
                    if !weighted.contains_key(&form) {
                        let priority = ending_priority(w.priority, k, -2000);
                        working.insert(form, (format!("{}{k}", w.replacement), priority).into());
                    }
                }
                continue;
            }
        }
        if w.pos == PartOfSpeech::NOUN && char_len(stem) <= 6 && !GENUINE_SHORT.contains(&w.priority) {
            let form = format!("{stem}o");
            if !weighted.contains_key(&form) {
                working.insert(form, (format!("{}o", w.replacement), ending_priority(w.priority, "o", -2000)).into());
            }
            retired.insert(stem.clone());
        }
    }
    weighted.retain(|stem, _| !retired.contains(stem));

    let mut d = Derivation { weighted: &weighted, working, locked: HashSet::new() };
    for (stem, w) in &weighted {
        let (p, pos, repl) = (w.priority, w.pos, &w.replacement);

        if p == 20000 {
            // Genuine two-letter roots only derive word-initial (space-anchored) forms and verb forms;
            // the bare root is left to the two-char table.
            if pos.contains(PartOfSpeech::NOUN) {
                for k in NOUN_ENDINGS {
                    let form = format!("{stem}{k}");
                    d.add_if_absent(&form, format!(" {form}"), format!(" {repl}{k}"), ending_priority(p, k, 5000));
                }
            }
            if pos.contains(PartOfSpeech::ADJECTIVE) {
                for k in ADJECTIVE_ENDINGS {
                    let form = format!("{stem}{k}");
                    if d.weighted.contains_key(&form) {
                        d.insert(form.clone(), format!("{repl}{k}"), ending_priority(p, k, -5000));
                        d.locked.insert(form);
                    } else {
                        d.insert(format!(" {form}"), format!(" {repl}{k}"), ending_priority(p, k, 5000));
                    }
                }
            }
            if pos.contains(PartOfSpeech::ADVERB) {
                for k in ADVERB_ENDINGS {
                    d.insert(format!(" {stem}{k}"), format!(" {repl}{k}"), ending_priority(p, k, 5000));
                }
            }
            if pos.contains(PartOfSpeech::VERB) {
                for (k, gloss) in resolver.verb_endings() {
                    d.add_or_override(format!("{stem}{k}"), format!("{repl}{gloss}"), ending_priority(p, k, -3000));
                }
                for k in IMPERATIVE_ENDINGS {
                    let form = format!("{stem}{k}");
                    d.add_if_absent(&form, form.clone(), format!("{repl}{k}"), ending_priority(p, k, -3000));
                }
            }
            continue;
        }

        if !d.locked.contains(stem) {
            d.insert(stem.clone(), repl.clone(), p);
        }

        if GENUINE_SHORT[1..].contains(&p) {
            // Glossed roots of three to six letters: every inflected form, the new parse winning over a
            // differing dictionary parse.
            let mut endings: Vec<(&str, String)> = Vec::new();
            if pos.contains(PartOfSpeech::NOUN) {
                endings.extend(NOUN_ENDINGS.iter().map(|&k| (k, k.to_string())));
            }
            if pos.contains(PartOfSpeech::ADJECTIVE) {
                endings.extend(ADJECTIVE_ENDINGS.iter().map(|&k| (k, k.to_string())));
            }
            if pos.contains(PartOfSpeech::ADVERB) {
                endings.extend(ADVERB_ENDINGS.iter().map(|&k| (k, k.to_string())));
            }
            if pos.contains(PartOfSpeech::VERB) {
                endings.extend(resolver.verb_endings().iter().map(|(k, g)| (*k, g.clone())));
                endings.extend(IMPERATIVE_ENDINGS.iter().map(|&k| (k, k.to_string())));
            }
            for (k, gloss) in endings {
                d.add_or_override(format!("{stem}{k}"), format!("{repl}{gloss}"), ending_priority(p, k, -3000));
            }
        } else if (3..=6).contains(&char_len(stem)) {
            // Short roots that stay unannotated still get their most common ending.
            for (flag, k) in
                [(PartOfSpeech::NOUN, "o"), (PartOfSpeech::ADJECTIVE, "a"), (PartOfSpeech::ADVERB, "e")]
            {
                if pos.contains(flag) {
                    let form = format!("{stem}{k}");
                    d.add_if_absent(&form, form.clone(), format!("{repl}{k}"), ending_priority(p, k, -5000));
                }
            }
        }
    }
    d.working
}

// --- Stage 5: -an / -on ---------------------------------------------------------

/// For every curated word take the endorsed split and add its `+o`, `+a`, `+e` forms and the
/// accusative-adjective reading (`/a/n/`, `/o/n/`).
fn apply_ambiguity(working: &mut WorkingMap, ambiguity: &SuffixAmbiguity, resolver: &Resolver<'_>) {
    for (entries, suffix) in [(&ambiguity.an, "an"), (&ambiguity.on, "on")] {
        let mut letters = suffix.chars();
        let (vowel, n) = (letters.next().unwrap_or('a'), letters.next().unwrap_or('n'));
        let accusative = format!("/{vowel}/{n}/");
        let marked = format!("/{suffix}/");
        let trailing = format!("{suffix}/");

        for entry in entries {
            let split = entry.endorsed.as_str();
            let forms: [String; 4] = match split.strip_suffix(marked.as_str()) {
                Some(stem) => [
                    format!("{stem}/{suffix}/o"),
                    format!("{stem}/{suffix}/a"),
                    format!("{stem}/{suffix}/e"),
                    format!("{stem}{accusative}"),
                ],
                None => {
                    let stem = split.strip_suffix(suffix).unwrap_or(split);
                    let stem = stem.strip_suffix(trailing.as_str()).unwrap_or(stem);
                    [
                        format!("{stem}{suffix}/o"),
                        format!("{stem}{suffix}/a"),
                        format!("{stem}{suffix}/e"),
                        format!("{stem}{accusative}"),
                    ]
                }
            };
            for form in forms {
                let key = strip_slashes(&form);
                let priority = (char_len(&key) as i64 - 1) * 10000 + 3000;
                working.insert(key, (resolver.resolve(&form), priority).into());
            }
        }
    }
}

// --- Stage 8-9: global table ------------------------------------------------------

/// `$20987$` -> `$20987up$`.
fn tagged(placeholder: &str, tag: &str) -> String {
    let mut chars = placeholder.chars();
    chars.next_back();
    format!("{}{tag}$", chars.as_str())
}

fn split_first(text: &str) -> (&str, &str) {
    match text.chars().next() {
        Some(c) => text.split_at(c.len_utf8()),
        None => ("", ""),
    }
}

/// The rule as given plus its upper-case and capitalized variants.
fn case_variants(format: AnnotationFormat, pattern: &str, replacement: &str, placeholder: &str) -> [Rule; 3] {
    let capitalized = if pattern.starts_with(' ') {
        let (_, rest) = split_first(pattern);
        let (lead, tail) = split_first(replacement);
        Rule::new(
            format!(" {}", format::capitalize(rest)),
            format!("{lead}{}", format.capitalize(tail)),
            tagged(placeholder, "cap"),
        )
    } else {
        Rule::new(format::capitalize(pattern), format.capitalize(replacement), tagged(placeholder, "cap"))
    };
    [
        Rule::new(pattern, replacement, placeholder),
        Rule::new(pattern.to_uppercase(), format.upper(replacement), tagged(placeholder, "up")),
        capitalized,
    ]
}

/// A pattern's leading or trailing space is carried by its placeholder and replacement too, so the
/// space survives the round trip through the placeholder.
fn mirror_spaces(mut rule: Rule) -> Rule {
    if rule.pattern.starts_with(' ') {
        rule.placeholder.insert(0, ' ');
        if !rule.replacement.starts_with(' ') {
            rule.replacement.insert(0, ' ');
        }
    }
    if rule.pattern.ends_with(' ') {
        rule.placeholder.push(' ');
        if !rule.replacement.ends_with(' ') {
            rule.replacement.push(' ');
        }
    }
    rule
}

/// Sort by descending priority (stable), drop patterns under three characters, case-expand.
fn collapse(working: WorkingMap, format: AnnotationFormat, pool: &PlaceholderPool) -> Result<RuleTable> {
    let mut ranked: Vec<(String, Candidate)> = working.into_iter().collect();
    ranked.sort_by(|a, b| b.1.priority.cmp(&a.1.priority));
    pool.ensure(ranked.len())?;

    let mut rules = Vec::with_capacity(ranked.len() * 3);
    for (index, (pattern, candidate)) in ranked.into_iter().enumerate() {
        if char_len(&pattern) < 3 {
            continue;
        }
        let replacement = strip_redundant(&candidate.replacement);
        let placeholder = pool.get(index)?;
        rules.extend(case_variants(format, &pattern, &replacement, placeholder).into_iter().map(mirror_spaces));
    }
    Ok(RuleTable::new(rules))
}

// --- Stage 10: two-char and local tables -----------------------------------------

/// Standalone (` la `), suffix (`$ad`) and prefix (`al$`) rules, in that order. The `$` anchors
/// match the closing `$` of a global placeholder, so these rules only fire next to an already
/// replaced root.
fn two_char_table(resolver: &Resolver<'_>, pool: &PlaceholderPool) -> Result<RuleTable> {
    pool.ensure(TWO_CHAR_POOL_NEEDED)?;
    let format = resolver.format();
    let mut rules = Vec::with_capacity(3 * (STANDALONE_ROOTS.len() + SUFFIX_ROOTS.len() + PREFIX_ROOTS.len()));

    let mut push_group = |roots: &[&str], offset: usize, wrap: &dyn Fn(&str) -> String| -> Result<()> {
        for (i, &root) in roots.iter().enumerate() {
            let gloss = strip_redundant(&resolver.resolve_raw(root));
            let placeholder = pool.get(i + offset)?;
            rules.push(Rule::new(wrap(root), wrap(&gloss), wrap(placeholder)));
            rules.push(Rule::new(
                wrap(&root.to_uppercase()),
                wrap(&format.upper(&gloss)),
                wrap(&tagged(placeholder, "up")),
            ));
            rules.push(Rule::new(
                wrap(&format::capitalize(root)),
                wrap(&capitalize_annotation(&gloss)),
                wrap(&tagged(placeholder, "cap")),
            ));
        }
        Ok(())
    };
    push_group(&STANDALONE_ROOTS, STANDALONE_OFFSET, &|s| format!(" {s} "))?;
    push_group(&SUFFIX_ROOTS, 0, &|s| format!("${s}"))?;
    push_group(&PREFIX_ROOTS, PREFIX_OFFSET, &|s| format!("{s}$"))?;
    Ok(RuleTable::new(rules))
}

/// Every gloss pair in three casings, longest root first. Used only inside `@...@` spans.
fn local_table(glosses: &[GlossPair], format: AnnotationFormat, pool: &PlaceholderPool) -> Result<RuleTable> {
    let mut entries: Vec<(String, String, usize)> = Vec::with_capacity(glosses.len() * 3);
    for GlossPair { root, gloss } in glosses {
        let len = char_len(root);
        let upper = (root.to_uppercase(), gloss.to_uppercase());
        let capital = (format::capitalize(root), format::capitalize(gloss));
        if root == gloss {
            entries.push((root.clone(), gloss.clone(), len));
            entries.push((upper.0, upper.1, len));
            entries.push((capital.0, capital.1, len));
        } else {
            entries.push((root.clone(), format.annotate(root, gloss), len));
            entries.push((upper.0.clone(), format.annotate(&upper.0, &upper.1), len));
            entries.push((capital.0.clone(), format.annotate(&capital.0, &capital.1), len));
        }
    }
    entries.sort_by(|a, b| b.2.cmp(&a.2));
    pool.ensure(entries.len())?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, (pattern, replacement, _))| Ok(Rule::new(pattern, replacement, pool.get(index)?)))
        .collect()
}
