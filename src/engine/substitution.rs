//! The substitution pipeline.
//!
//! ```text
//! (1) skip masking     %...%  -> skip placeholder, on the raw input   (masking.rs)
//! (2) normalize        exotic spaces -> ' ', x / ^ letters -> circumflex
//! (3) local masking    @...@  -> capture placeholder, content rewritten by the local table
//! (4) pad lines        " line "
//! (5) global pass      pattern -> placeholder, table order   (letter-gated, compiled_rules.rs)
//! (6) two-char pass 1  pattern -> placeholder
//!     two-char pass 2  pattern -> !placeholder!
//! (7) restore          pass 2 reversed, pass 1 reversed, global       (restore.rs)
//! (8) unpad, restore local spans
//! (9) output           letter form, <br> and &nbsp; for HTML formats
//! (10) restore skip spans
//! ```
//!
//! Every rule replaces all non-overlapping occurrences of its pattern at once, and only ever with
//! its placeholder, so no replacement text is scanned by a later rule. Skip span content never
//! passes through stages 2-9 and comes out byte-identical.

use std::borrow::Cow;
use std::time::Instant;

use super::compiled_rules::{CompiledRules, CompiledTable, LetterMask};
use super::masking::{MarkerSpec, Markers, Vault, mask};
use super::metrics::{MaskingMetrics, PassMetrics, RunMetrics, RunResult};
use super::restore::{Ledger, pad_lines, unpad_lines};
use super::trigger::TriggerInfo;
use crate::error::Result;
use crate::placeholder::{PlaceholderPool, Placeholders, PoolKind};
use crate::script::{self, LetterForm};
use crate::{AnnotationFormat, RuleDatabase};

/// Output settings of a [`Substitution`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: AnnotationFormat,
    pub letters: LetterForm,
    /// Turn `\n` into `<br>\n` and space runs into `&nbsp;` for the HTML formats.
    pub html_line_breaks: bool,
}

/// A reusable substitution engine over one rule database.
///
/// Holds no per-run state: runs borrow it immutably, so one instance serves any number of threads.
#[derive(Debug)]
pub struct Substitution<'a> {
    rules: CompiledRules<'a>,
    markers: Markers,
    skip_pool: PlaceholderPool,
    capture_pool: PlaceholderPool,
    settings: OutputSettings,
}

impl<'a> Substitution<'a> {
    pub fn new(
        database: &'a RuleDatabase,
        markers: &MarkerSpec,
        placeholders: &Placeholders,
        settings: OutputSettings,
    ) -> Result<Self> {
        Ok(Self {
            rules: CompiledRules::new(database),
            markers: Markers::compile(markers)?,
            skip_pool: placeholders.full_pool(PoolKind::Skip),
            capture_pool: placeholders.full_pool(PoolKind::Capture),
            settings,
        })
    }

    pub fn settings(&self) -> OutputSettings {
        self.settings
    }

    pub fn run(&self, text: &str) -> Result<String> {
        Ok(self.run_with_metrics(text)?.output)
    }

    pub fn run_with_metrics(&self, text: &str) -> Result<RunResult> {
        let total_start = Instant::now();
        let mut metrics = RunMetrics { chunks: 1, ..RunMetrics::default() };

        let start = Instant::now();
        let trigger = TriggerInfo::scan(text, &self.markers.spec);
        let (text, skipped) = if trigger.has_skip_marker {
            mask(text, &self.markers.skip, &self.skip_pool, str::to_string)?
        } else {
            (text.to_string(), Vault::default())
        };
        let mut masking = start.elapsed();

        let start = Instant::now();
        let text = script::to_circumflex(&script::normalize_spaces(&text));
        metrics.normalize = start.elapsed();

        let start = Instant::now();
        let (text, localized) = if trigger.has_local_marker {
            mask(&text, &self.markers.local, &self.capture_pool, |span| self.rules.local.safe_replace(span))?
        } else {
            (text, Vault::default())
        };
        masking += start.elapsed();
        metrics.masking = MaskingMetrics { duration: masking, skip_spans: skipped.len(), local_spans: localized.len() };
        if skipped.len() + localized.len() > 0 {
            log::debug!("masked {} skip and {} local spans", skipped.len(), localized.len());
        }

        let mut text = pad_lines(&text);

        let mut global = Ledger::default();
        metrics.global = replace_pass(&mut text, &self.rules.global, &mut global, |ph| Cow::Borrowed(ph));
        let mut first = Ledger::default();
        metrics.two_char[0] = replace_pass(&mut text, &self.rules.two_char, &mut first, |ph| Cow::Borrowed(ph));
        let mut second = Ledger::default();
        metrics.two_char[1] =
            replace_pass(&mut text, &self.rules.two_char, &mut second, |ph| Cow::Owned(format!("!{ph}!")));
        log::debug!(
            "applied {} global and {} + {} two-char rules",
            global.len(),
            first.len(),
            second.len()
        );

        let start = Instant::now();
        let text = second.restore_reversed(text);
        let text = first.restore_reversed(text);
        let text = global.restore(text);
        let text = unpad_lines(&text);
        let text = localized.restore(text);
        let output = skipped.restore(self.finish(&text));
        metrics.restore = start.elapsed();

        metrics.total = total_start.elapsed();
        Ok(RunResult { output, metrics })
    }

    fn finish(&self, text: &str) -> String {
        let text = script::convert(text, self.settings.letters);
        if self.settings.format.is_html() && self.settings.html_line_breaks {
            let text = text.replace('\n', "<br>\n");
            regex!(r" {2,}")
                .replace_all(&text, |caps: &regex::Captures<'_>| "&nbsp;".repeat(caps[0].len()))
                .into_owned()
        } else {
            text
        }
    }
}

/// Replace every rule of `table` that occurs in `text` with its (possibly wrapped) placeholder.
fn replace_pass<'r>(
    text: &mut String,
    table: &CompiledTable<'r>,
    ledger: &mut Ledger<'r>,
    wrap: impl Fn(&'r str) -> Cow<'r, str>,
) -> PassMetrics {
    let start = Instant::now();
    let mut metrics = PassMetrics::default();
    for rule in table.active(LetterMask::of(text)) {
        metrics.considered += 1;
        if text.contains(rule.pattern.as_str()) {
            let placeholder = wrap(rule.placeholder.as_str());
            *text = text.replace(rule.pattern.as_str(), &placeholder);
            ledger.record(placeholder, rule.replacement.as_str());
            metrics.applied += 1;
        }
    }
    metrics.duration = start.elapsed();
    metrics
}
