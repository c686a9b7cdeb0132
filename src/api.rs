use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::{self, OutputSettings, RunMetrics, Substitution};
use crate::error::{Error, Result};
use crate::placeholder::Placeholders;
use crate::rules::{self, InputFiles, RankerInputs};
use crate::{AnnotationFormat, BuildReport, LetterForm, RankerOptions, RuleDatabase};

pub use crate::engine::MarkerSpec;

/// Conversion options.
///
/// Every field has a default, so a JSON file only needs the fields it changes:
///
/// ```text
/// { "format": "bracket", "letters": "x", "workers": 4 }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Format the database was built for. Only decides whether HTML line breaks apply.
    pub format: AnnotationFormat,
    /// Spelling of ĉ ĝ ĥ ĵ ŝ ŭ in the output.
    pub letters: LetterForm,
    pub markers: MarkerSpec,
    /// `0` and `1` convert on the calling thread.
    pub workers: usize,
    /// Emit `<br>` and `&nbsp;` for the HTML formats.
    pub html_line_breaks: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: AnnotationFormat::default(),
            letters: LetterForm::default(),
            markers: MarkerSpec::default(),
            workers: 1,
            html_line_breaks: true,
        }
    }
}

impl Options {
    /// Read options from a JSON file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn settings(&self) -> OutputSettings {
        OutputSettings { format: self.format, letters: self.letters, html_line_breaks: self.html_line_breaks }
    }
}

/// Result from [`Converter::convert`].
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The input text.
    pub text: String,
    /// The annotated text.
    pub output: String,
    pub elapsed: Duration,
}

/// Timing and rule counts of one stage of a conversion.
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub name: &'static str,
    pub duration: Duration,
    /// Rules that passed the letter gate. Zero for stages that apply no rules.
    pub considered: usize,
    /// Rules whose pattern occurred in the text, or spans masked.
    pub applied: usize,
}

/// Result from [`Converter::convert_verbose`].
///
/// With several workers the stage values are summed over chunks, so they can add up to more than
/// `elapsed`.
#[derive(Debug, Clone)]
pub struct ConvertDetails {
    pub text: String,
    pub output: String,
    pub elapsed: Duration,
    pub stages: Vec<StageSummary>,
    pub chunks: usize,
    pub skip_spans: usize,
    pub local_spans: usize,
}

/// A reusable converter over one rule database.
///
/// Building one compiles the span patterns and the rule gates; reuse it for many texts.
///
/// # Example
/// ```
/// use glosilo::{Converter, Options, RuleDatabase};
///
/// let db = RuleDatabase::default();
/// let converter = Converter::new(&db, &Options::default()).unwrap();
/// assert_eq!(converter.convert("%Nomo% saluton").unwrap().output, "Nomo saluton");
/// ```
#[derive(Debug)]
pub struct Converter<'a> {
    substitution: Substitution<'a>,
    workers: usize,
}

impl<'a> Converter<'a> {
    pub fn new(database: &'a RuleDatabase, options: &Options) -> Result<Self> {
        Self::with_placeholders(database, options, &Placeholders::default())
    }

    /// Like [`Converter::new`], with user-supplied placeholder pools for span masking.
    pub fn with_placeholders(
        database: &'a RuleDatabase,
        options: &Options,
        placeholders: &Placeholders,
    ) -> Result<Self> {
        let substitution = Substitution::new(database, &options.markers, placeholders, options.settings())?;
        Ok(Self { substitution, workers: options.workers })
    }

    pub fn convert(&self, text: &str) -> Result<ConvertResult> {
        let run = self.run(text)?;
        Ok(ConvertResult { text: text.to_string(), output: run.output, elapsed: run.metrics.total })
    }

    /// Convert `text` and return per-stage timings and counts.
    pub fn convert_verbose(&self, text: &str) -> Result<ConvertDetails> {
        let run = self.run(text)?;
        let metrics = &run.metrics;
        Ok(ConvertDetails {
            text: text.to_string(),
            elapsed: metrics.total,
            stages: stage_summaries(metrics),
            chunks: metrics.chunks,
            skip_spans: metrics.masking.skip_spans,
            local_spans: metrics.masking.local_spans,
            output: run.output,
        })
    }

    fn run(&self, text: &str) -> Result<engine::RunResult> {
        if self.workers > 1 {
            engine::run_parallel(&self.substitution, text, self.workers)
        } else {
            self.substitution.run_with_metrics(text)
        }
    }
}

fn stage_summaries(metrics: &RunMetrics) -> Vec<StageSummary> {
    let timed = |name, duration| StageSummary { name, duration, considered: 0, applied: 0 };
    let masking = &metrics.masking;
    let pass = |name, m: &engine::PassMetrics| StageSummary {
        name,
        duration: m.duration,
        considered: m.considered,
        applied: m.applied,
    };
    vec![
        timed("normalize", metrics.normalize),
        StageSummary {
            name: "masking",
            duration: masking.duration,
            considered: 0,
            applied: masking.skip_spans + masking.local_spans,
        },
        pass("global", &metrics.global),
        pass("two-char 1", &metrics.two_char[0]),
        pass("two-char 2", &metrics.two_char[1]),
        timed("restore", metrics.restore),
    ]
}

/// Convert `text` on the calling thread, ignoring `options.workers`.
pub fn substitute(text: &str, database: &RuleDatabase, options: &Options) -> Result<String> {
    let options = Options { workers: 1, ..options.clone() };
    Ok(Converter::new(database, &options)?.convert(text)?.output)
}

/// Convert `text` on `options.workers` threads. The output is identical to [`substitute`].
pub fn parallel_substitute(text: &str, database: &RuleDatabase, options: &Options) -> Result<String> {
    Ok(Converter::new(database, options)?.convert(text)?.output)
}

/// Result from [`build_rules`].
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub database: RuleDatabase,
    pub report: BuildReport,
}

/// Read the builder inputs from disk and build a rule database.
pub fn build_rules(files: &InputFiles, options: &RankerOptions) -> Result<BuildOutput> {
    let inputs = RankerInputs::read(files)?;
    log::info!(
        "read {} roots, {} glosses, {} dictionary stems",
        inputs.roots.len(),
        inputs.glosses.len(),
        inputs.dictionary.len()
    );
    let (database, report) = rules::build(&inputs, options)?;
    Ok(BuildOutput { database, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    fn files(dir: &Path) -> InputFiles {
        InputFiles {
            roots: write(dir, "roots.txt", "am\nkat\nla\n"),
            glosses: write(dir, "gloss.csv", "root,gloss\nam,愛\nkat,猫\nla,定\n"),
            dictionary: write(dir, "dictionary.json", r#"[["am", "动词"], ["kat", "名词"]]"#),
            ..InputFiles::default()
        }
    }

    fn bracket_db() -> RuleDatabase {
        let dir = tempfile::tempdir().unwrap();
        let options = RankerOptions { format: AnnotationFormat::Bracket, ..RankerOptions::default() };
        build_rules(&files(dir.path()), &options).unwrap().database
    }

    fn bracket_options() -> Options {
        Options { format: AnnotationFormat::Bracket, ..Options::default() }
    }

    #[test]
    fn build_rules_reads_inputs_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let out = build_rules(&files(dir.path()), &RankerOptions::default()).unwrap();
        assert!(out.database.global.get("kato").is_some());
        assert_eq!(out.report.global_rules, out.database.global.len());
        assert!(out.report.skipped.is_empty());
    }

    #[test]
    fn build_rules_reports_missing_files() {
        let files = InputFiles { roots: PathBuf::from("/nonexistent/roots.txt"), ..InputFiles::default() };
        let err = build_rules(&files, &RankerOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn substitute_annotates_text() {
        let db = bracket_db();
        assert_eq!(substitute("la kato amas", &db, &bracket_options()).unwrap(), "la(定) kat(猫)o am(愛)as");
    }

    #[test]
    fn parallel_substitute_matches_substitute() {
        let db = bracket_db();
        let options = Options { workers: 3, ..bracket_options() };
        let text = "la kato\namas\n%la% kato\n@kato@\nlasta";
        assert_eq!(parallel_substitute(text, &db, &options).unwrap(), substitute(text, &db, &options).unwrap());
    }

    #[test]
    fn convert_verbose_reports_every_stage() {
        let db = bracket_db();
        let converter = Converter::new(&db, &bracket_options()).unwrap();
        let details = converter.convert_verbose("%x% kato").unwrap();
        assert_eq!(details.output, "x kat(猫)o");
        assert_eq!(details.chunks, 1);
        assert_eq!(details.skip_spans, 1);
        let names: Vec<_> = details.stages.iter().map(|s| s.name).collect();
        assert_eq!(names, ["normalize", "masking", "global", "two-char 1", "two-char 2", "restore"]);
        assert_eq!(details.stages[2].applied, 1);
    }

    #[test]
    fn options_json_overrides_only_named_fields() {
        let options: Options = serde_json::from_str(r#"{"letters": "x", "markers": {"skip_max": 10}}"#).unwrap();
        assert_eq!(options.letters, LetterForm::X);
        assert_eq!(options.markers.skip_max, 10);
        assert_eq!(options.markers.skip_open, "%");
        assert_eq!(options.format, AnnotationFormat::Ruby);
        assert_eq!(options.workers, 1);
    }

    #[test]
    fn invalid_markers_are_rejected() {
        let db = RuleDatabase::default();
        let markers = MarkerSpec { local_open: String::new(), ..MarkerSpec::default() };
        let options = Options { markers, ..Options::default() };
        assert!(matches!(Converter::new(&db, &options), Err(Error::InvalidInput(_))));
    }
}
