use super::*;
use crate::rules::{self, SuffixAmbiguity};
use crate::{
    AnnotationFormat, DictionaryEntry, GlossPair, LetterForm, PartOfSpeech, Placeholders, RankerInputs, RankerOptions,
    RuleDatabase,
};

fn database(format: AnnotationFormat) -> RuleDatabase {
    let inputs = RankerInputs {
        roots: ["am", "amik", "ad", "kat", "hund", "la"].iter().map(|s| s.to_string()).collect(),
        glosses: vec![
            GlossPair::new("am", "愛"),
            GlossPair::new("amik", "友"),
            GlossPair::new("ad", "為"),
            GlossPair::new("kat", "猫"),
            GlossPair::new("la", "定"),
        ],
        dictionary: vec![
            DictionaryEntry::new("am", PartOfSpeech::NOUN | PartOfSpeech::VERB),
            DictionaryEntry::new("amik", PartOfSpeech::NOUN),
            DictionaryEntry::new("kat", PartOfSpeech::NOUN),
            DictionaryEntry::new("hund", PartOfSpeech::NOUN),
        ],
        ambiguity: Some(SuffixAmbiguity::default()),
        ..RankerInputs::default()
    };
    rules::build(&inputs, &RankerOptions { format, ..RankerOptions::default() }).unwrap().0
}

fn engine(db: &RuleDatabase, settings: OutputSettings) -> Substitution<'_> {
    Substitution::new(db, &MarkerSpec::default(), &Placeholders::default(), settings).unwrap()
}

fn bracket(db: &RuleDatabase) -> Substitution<'_> {
    engine(db, OutputSettings { format: AnnotationFormat::Bracket, ..OutputSettings::default() })
}

#[test]
fn skip_span_is_left_unannotated() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    assert_eq!(sub.run("%Nomo%").unwrap(), "Nomo");
    assert_eq!(sub.run("%amo% amo").unwrap(), "amo am(愛)o");
}

#[test]
fn skip_span_content_is_byte_identical() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    assert_eq!(sub.run("%cxu%").unwrap(), "cxu");
    assert_eq!(sub.run("%s^ipo% sxipo").unwrap(), "s^ipo ŝipo");
    assert_eq!(sub.run("%a\u{3000}b% a\u{3000}b").unwrap(), "a\u{3000}b a b");
    assert_eq!(sub.run("%ĉu amo% amo").unwrap(), "ĉu amo am(愛)o");

    let settings =
        OutputSettings { format: AnnotationFormat::Bracket, letters: LetterForm::X, ..OutputSettings::default() };
    assert_eq!(engine(&db, settings).run("%ŝipo% ŝipo").unwrap(), "ŝipo sxipo");

    let settings =
        OutputSettings { format: AnnotationFormat::Ruby, html_line_breaks: true, ..OutputSettings::default() };
    assert_eq!(engine(&db, settings).run("%a  b% x  y").unwrap(), "a  b x&nbsp;&nbsp;y");
}

#[test]
fn ending_follows_the_annotated_root() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    assert_eq!(sub.run("amo").unwrap(), "am(愛)o");
    assert_eq!(sub.run("Amo").unwrap(), "Am(愛)o");
    assert_eq!(sub.run("AMO").unwrap(), "AM(愛)O");
    assert_eq!(sub.run("la kato").unwrap(), "la(定) kat(猫)o");
}

#[test]
fn suffix_next_to_a_replaced_root() {
    let db = database(AnnotationFormat::Bracket);
    assert_eq!(bracket(&db).run("amikado").unwrap(), "amik(友)ad(為)o");
}

#[test]
fn localized_span_uses_the_local_table() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    assert_eq!(sub.run("@amo@").unwrap(), "am(愛)o");
    assert_eq!(sub.run("x@la@y").unwrap(), "xla(定)y");
}

#[test]
fn skip_wins_over_localized() {
    let db = database(AnnotationFormat::Bracket);
    assert_eq!(bracket(&db).run("%a@amo@b%").unwrap(), "a@amo@b");
}

#[test]
fn unterminated_markers_are_literal() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    assert_eq!(sub.run("100% kato").unwrap(), "100% kat(猫)o");
    assert_eq!(sub.run("retpoŝto@ kato").unwrap(), "retpoŝto@ kat(猫)o");
}

#[test]
fn unknown_text_passes_through() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    for text in ["", "xyz qrs", "123 456", "漢字"] {
        assert_eq!(sub.run(text).unwrap(), text);
    }
}

#[test]
fn line_structure_is_preserved() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    assert_eq!(sub.run("amo\r\nkato\r\n").unwrap(), "am(愛)o\r\nkat(猫)o\r\n");
    assert_eq!(sub.run("  amo  \n\nkato").unwrap(), "  am(愛)o  \n\nkat(猫)o");
}

#[test]
fn input_letter_forms_are_folded_and_output_converted() {
    let db = database(AnnotationFormat::Bracket);
    let settings =
        OutputSettings { format: AnnotationFormat::Bracket, letters: LetterForm::X, ..OutputSettings::default() };
    let sub = engine(&db, settings);
    assert_eq!(sub.run("ŝipo").unwrap(), "sxipo");
    let sub = bracket(&db);
    assert_eq!(sub.run("sxipo cxu").unwrap(), "ŝipo ĉu");
    assert_eq!(sub.run("s^ipo").unwrap(), "ŝipo");
}

#[test]
fn html_line_breaks_and_spaces() {
    let db = database(AnnotationFormat::Ruby);
    let settings =
        OutputSettings { format: AnnotationFormat::Ruby, html_line_breaks: true, ..OutputSettings::default() };
    let sub = engine(&db, settings);
    assert_eq!(
        sub.run("amo\nkato").unwrap(),
        "<ruby>am<rt>愛</rt></ruby>o<br>\n<ruby>kat<rt>猫</rt></ruby>o"
    );
    assert_eq!(sub.run("x  y").unwrap(), "x&nbsp;&nbsp;y");
    let plain = engine(&db, OutputSettings { format: AnnotationFormat::Ruby, ..OutputSettings::default() });
    assert_eq!(plain.run("x  y\nz").unwrap(), "x  y\nz");
}

#[test]
fn gloss_only_output_is_stable_under_reconversion() {
    let db = database(AnnotationFormat::GlossOnly);
    let sub = engine(&db, OutputSettings { format: AnnotationFormat::GlossOnly, ..OutputSettings::default() });
    for text in ["la kato", "amo kaj amikado", "%Nomo% @amo@", "AMO Amo amo"] {
        let once = sub.run(text).unwrap();
        assert_eq!(sub.run(&once).unwrap(), once, "{text}");
        assert!(!once.contains('$'), "{text}: {once}");
    }
    assert_eq!(sub.run("la kato").unwrap(), "定 猫o");
}

#[test]
fn no_placeholder_survives() {
    let db = database(AnnotationFormat::Bracket);
    let sub = bracket(&db);
    let out = sub.run("%a% @b@ la amikado AMIKO Kato amas").unwrap();
    assert!(!out.contains('$'), "{out}");
    assert!(!out.contains("%18"), "{out}");
    assert!(!out.contains("@51"), "{out}");
}

#[test]
fn metrics_count_applied_rules() {
    let db = database(AnnotationFormat::Bracket);
    let run = bracket(&db).run_with_metrics("amo kato %x%").unwrap();
    assert_eq!(run.output, "am(愛)o kat(猫)o x");
    assert_eq!(run.metrics.chunks, 1);
    assert_eq!(run.metrics.masking.skip_spans, 1);
    assert_eq!(run.metrics.global.applied, 2);
    assert!(run.metrics.global.considered < db.global.len());
}

#[test]
fn parallel_matches_sequential() {
    let db = database(AnnotationFormat::Ruby);
    let sub = engine(&db, OutputSettings { html_line_breaks: true, ..OutputSettings::default() });
    let text = "la kato\namo kaj amikado\n%Nomo% @amo@\n\nAMO  Amo\r\nhundo\nlasta linio";
    let sequential = sub.run(text).unwrap();
    for workers in [2, 3, 4, 16] {
        let parallel = run_parallel(&sub, text, workers).unwrap();
        assert_eq!(parallel.output, sequential, "{workers} workers");
        assert!(parallel.metrics.chunks > 1);
    }
}

#[test]
fn exhausted_skip_pool_fails_the_run() {
    let db = database(AnnotationFormat::Bracket);
    let pool = crate::PlaceholderPool::new(crate::PoolKind::Skip, vec!["%1%".to_string()]);
    let placeholders = Placeholders::default().with_pool(pool);
    let sub = Substitution::new(&db, &MarkerSpec::default(), &placeholders, OutputSettings::default()).unwrap();
    assert!(sub.run("%a%").is_ok());
    assert!(matches!(sub.run("%a% %b%"), Err(crate::Error::PlaceholdersExhausted { .. })));
}
