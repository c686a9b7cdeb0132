use std::collections::HashSet;

use serde_json::json;

use super::*;
use crate::{PlaceholderPool, Placeholders, PoolKind, Rule};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn inputs() -> RankerInputs {
    RankerInputs {
        roots: strings(&["am", "amik", "an", "hund", "kat", "lern", "ej"]),
        glosses: vec![
            GlossPair::new("am", "愛"),
            GlossPair::new("amik", "友"),
            GlossPair::new("an", "員"),
            GlossPair::new("kat", "猫"),
        ],
        dictionary: vec![
            DictionaryEntry::new("am", PartOfSpeech::NOUN | PartOfSpeech::VERB),
            DictionaryEntry::new("amik", PartOfSpeech::NOUN),
            DictionaryEntry::new("amik/an", PartOfSpeech::NOUN),
            DictionaryEntry::new("hund", PartOfSpeech::NOUN),
            DictionaryEntry::new("kat", PartOfSpeech::NOUN),
        ],
        ambiguity: Some(SuffixAmbiguity::default()),
        ..RankerInputs::default()
    }
}

fn options() -> RankerOptions {
    RankerOptions { format: AnnotationFormat::Bracket, ..RankerOptions::default() }
}

fn global(inputs: &RankerInputs) -> RuleDatabase {
    build(inputs, &options()).unwrap().0
}

fn replacement<'a>(db: &'a RuleDatabase, pattern: &str) -> Option<&'a str> {
    db.global.get(pattern).map(|r| r.replacement.as_str())
}

#[test]
fn two_letter_root_gets_word_initial_noun_forms() {
    let db = global(&inputs());
    assert_eq!(replacement(&db, " amo"), Some(" am(愛)o"));
    assert_eq!(replacement(&db, " Amo"), Some(" Am(愛)o"));
    assert_eq!(replacement(&db, " AMO"), Some(" AM(愛)O"));
    assert!(db.global.get("amo").is_none());
    assert!(db.global.get(" amo").unwrap().placeholder.starts_with(" $"));
}

#[test]
fn verb_directive_adds_every_ending() {
    let mut inputs = inputs();
    inputs.dictionary[0] = DictionaryEntry::new("am", PartOfSpeech::NOUN);
    assert!(global(&inputs).global.get("amas").is_none());

    inputs.stem_overrides = vec![json!(["am", "dflt", ["verbo_s1"]])];
    let db = global(&inputs);
    for ending in ["as", "is", "os", "us", "at", "it", "ot"] {
        assert_eq!(replacement(&db, &format!("am{ending}")), Some(format!("am(愛){ending}").as_str()), "{ending}");
    }
    assert_eq!(replacement(&db, "Amas"), Some("Am(愛)as"));
}

#[test]
fn exclusion_directive_removes_the_word() {
    let mut inputs = inputs();
    assert_eq!(replacement(&global(&inputs), "kat"), Some("kat(猫)"));

    inputs.stem_overrides = vec![json!(["kat", -1, ["ne"]])];
    let db = global(&inputs);
    for pattern in ["kat", "KAT", "Kat"] {
        assert!(db.global.get(pattern).is_none(), "{pattern}");
    }
    assert_eq!(replacement(&db, "kato"), Some("kat(猫)o"));
}

#[test]
fn glossed_short_root_derives_every_noun_form() {
    let db = global(&inputs());
    assert_eq!(replacement(&db, "amiko"), Some("amik(友)o"));
    assert_eq!(replacement(&db, "amikon"), Some("amik(友)on"));
    assert_eq!(replacement(&db, "amikoj"), Some("amik(友)oj"));
}

#[test]
fn member_nouns_in_an_become_their_inflected_forms() {
    let db = global(&inputs());
    assert!(db.global.get("amikan").is_none());
    assert_eq!(replacement(&db, "amikano"), Some("amik(友)an(員)o"));
    assert_eq!(replacement(&db, "amikana"), Some("amik(友)an(員)a"));
}

#[test]
fn unglossed_short_noun_keeps_only_its_o_form() {
    let db = global(&inputs());
    assert!(db.global.get("hund").is_none());
    assert_eq!(replacement(&db, "hundo"), Some("hundo"));
}

#[test]
fn explicit_priority_moves_a_rule_to_the_front() {
    let mut inputs = inputs();
    inputs.replacement_overrides = vec![json!(["lern/ej", 999999, ["o"], "学/場"])];
    let db = global(&inputs);
    assert_eq!(db.global.rules()[0].pattern, "lernejo");
    assert_eq!(db.global.rules()[0].replacement, "lern(学)ej(場)o");
    assert!(db.global.get("lernej").is_none());
}

#[test]
fn global_rules_are_in_priority_order() {
    let db = global(&inputs());
    let position = |pattern: &str| db.global.iter().position(|r| r.pattern == pattern).unwrap();
    // amikano (68000) > amikon (57000) > amiko (47000) > kat (30000)
    assert!(position("amikano") < position("amikon"));
    assert!(position("amikon") < position("amiko"));
    assert!(position("amiko") < position("kat"));
}

#[test]
fn skipped_directives_do_not_stop_the_build() {
    let mut inputs = inputs();
    inputs.stem_overrides = vec![json!(["am", "dflt", ["ne"]]), json!(["kat", "soon", []])];
    let (_, report) = build(&inputs, &options()).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].list, DirectiveList::StemOverrides);
    assert_eq!(report.skipped[0].index, 1);
}

#[test]
fn bundled_ambiguity_tables_feed_the_build() {
    let mut inputs = inputs();
    inputs.ambiguity = None;
    let db = global(&inputs);
    assert_eq!(replacement(&db, "urbano"), Some("urban(員)o"));
    assert!(db.global.get("URBANO").is_some());
}

#[test]
fn report_counts_match_the_tables() {
    let (db, report) = build(&inputs(), &options()).unwrap();
    assert_eq!(report.global_rules, db.global.len());
    assert_eq!(report.two_char_rules, 3 * (40 + 42 + 26));
    assert_eq!(report.local_rules, 12);
    assert_eq!(report.stages[0], ("seeded roots", 7));
}

#[test]
fn global_placeholders_are_unique() {
    let db = global(&inputs());
    let placeholders: HashSet<&str> = db.global.iter().map(|r| r.placeholder.as_str()).collect();
    assert_eq!(placeholders.len(), db.global.len());
}

#[test]
fn parallel_resolution_matches_sequential() {
    let sequential = global(&inputs());
    let parallel = build(&inputs(), &RankerOptions { workers: 4, ..options() }).unwrap().0;
    assert_eq!(parallel, sequential);
}

#[test]
fn too_small_pool_is_an_error() {
    let tokens = (0..3).map(|i| format!("$x{i}$")).collect();
    let tiny = Placeholders::default().with_pool(PlaceholderPool::new(PoolKind::Global, tokens));
    let options = RankerOptions { placeholders: tiny, ..options() };
    let err = build(&inputs(), &options).unwrap_err();
    assert!(matches!(err, crate::Error::PlaceholdersExhausted { .. }));
}

#[test]
fn ruby_output_drops_redundant_annotations() {
    let mut inputs = inputs();
    inputs.glosses.push(GlossPair::new("lern", "lern"));
    inputs.dictionary.push(DictionaryEntry::new("lern", PartOfSpeech::NOUN));
    let db = build(&inputs, &RankerOptions::default()).unwrap().0;
    assert_eq!(replacement(&db, "lerno"), Some("lerno"));
    assert_eq!(replacement(&db, "kato"), Some("<ruby>kat<rt>猫</rt></ruby>o"));
    assert!(db.global.iter().all(|r: &Rule| !r.replacement.contains("<rt>lern</rt>")));
}
