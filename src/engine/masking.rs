//! Span masking: `%...%` (skip) and `@...@` (localized) spans.
//!
//! ```text
//! "la %Nomo% kaj @amiko@"
//!    │ skip:  %Nomo%  -> %1854%   vault: %1854% = "Nomo"
//!    │ local: @amiko@ -> @5134@   vault: @5134@ = local_table.safe_replace("amiko")
//!    v
//! "la %1854% kaj @5134@"
//! ```
//!
//! Spans are single-line, lazily matched and bounded in length. Skip masking runs first, so a
//! localized marker inside a skip span is protected text. A marker without a partner within the
//! length bound is left in the text as is. Identical spans share one placeholder.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placeholder::PlaceholderPool;

/// Span delimiters and maximum span lengths (in characters, markers excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSpec {
    pub skip_open: String,
    pub skip_close: String,
    pub skip_max: usize,
    pub local_open: String,
    pub local_close: String,
    pub local_max: usize,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            skip_open: "%".into(),
            skip_close: "%".into(),
            skip_max: 50,
            local_open: "@".into(),
            local_close: "@".into(),
            local_max: 18,
        }
    }
}

/// The compiled span patterns of a [`MarkerSpec`].
#[derive(Debug, Clone)]
pub struct Markers {
    pub spec: MarkerSpec,
    pub skip: Regex,
    pub local: Regex,
}

impl Markers {
    pub fn compile(spec: &MarkerSpec) -> Result<Self> {
        Ok(Self {
            skip: span_regex("skip", &spec.skip_open, &spec.skip_close, spec.skip_max)?,
            local: span_regex("local", &spec.local_open, &spec.local_close, spec.local_max)?,
            spec: spec.clone(),
        })
    }
}

fn span_regex(name: &str, open: &str, close: &str, max: usize) -> Result<Regex> {
    if open.is_empty() || close.is_empty() {
        return Err(Error::InvalidInput(format!("{name} span delimiters must not be empty")));
    }
    if max == 0 {
        return Err(Error::InvalidInput(format!("{name} span maximum length must be at least 1")));
    }
    let pattern = format!("{}(.{{1,{max}}}?){}", regex::escape(open), regex::escape(close));
    Regex::new(&pattern).map_err(|err| Error::InvalidInput(format!("{name} span pattern: {err}")))
}

/// Placeholders handed out by one masking pass, with the text each one stands for.
#[derive(Debug, Default, Clone)]
pub struct Vault {
    entries: Vec<(String, String)>,
}

impl Vault {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Put every stored text back in place of its placeholder.
    pub fn restore(&self, mut text: String) -> String {
        for (placeholder, content) in &self.entries {
            if text.contains(placeholder.as_str()) {
                text = text.replace(placeholder.as_str(), content);
            }
        }
        text
    }
}

/// Replace each span matched by `pattern` with a placeholder from `pool`; the vault keeps
/// `rewrite(span content)`, markers excluded.
pub fn mask(
    text: &str,
    pattern: &Regex,
    pool: &PlaceholderPool,
    rewrite: impl Fn(&str) -> String,
) -> Result<(String, Vault)> {
    let mut vault = Vault::default();
    let mut by_content: HashMap<&str, usize> = HashMap::new();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else { continue };
        let index = match by_content.get(inner.as_str()) {
            Some(&index) => index,
            None => {
                let index = vault.entries.len();
                let placeholder = pool.get(index)?.to_string();
                vault.entries.push((placeholder, rewrite(inner.as_str())));
                by_content.insert(inner.as_str(), index);
                index
            }
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&vault.entries[index].0);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok((out, vault))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::PoolKind;

    fn markers() -> Markers {
        Markers::compile(&MarkerSpec::default()).unwrap()
    }

    fn skip_pool() -> PlaceholderPool {
        PlaceholderPool::generate(PoolKind::Skip, 10).unwrap()
    }

    #[test]
    fn skip_spans_are_masked_and_restored() {
        let (masked, vault) = mask("la %Nomo% kaj %Nomo%", &markers().skip, &skip_pool(), str::to_string).unwrap();
        assert_eq!(masked, "la %1854% kaj %1854%");
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.restore(masked), "la Nomo kaj Nomo");
    }

    #[test]
    fn spans_are_lazy_and_single_line() {
        let (masked, vault) = mask("%a% b %c\nd %e%", &markers().skip, &skip_pool(), str::to_string).unwrap();
        assert_eq!(masked, "%1854% b %c\nd %1855%");
        assert_eq!(vault.len(), 2);
    }

    #[test]
    fn over_long_or_unterminated_spans_stay_literal() {
        let long = format!("@{}@", "x".repeat(19));
        let (masked, vault) = mask(&long, &markers().local, &skip_pool(), str::to_string).unwrap();
        assert_eq!(masked, long);
        assert_eq!(vault.len(), 0);

        let (masked, _) = mask("100% sure", &markers().skip, &skip_pool(), str::to_string).unwrap();
        assert_eq!(masked, "100% sure");
    }

    #[test]
    fn rewrite_is_applied_to_the_content() {
        let (_, vault) = mask("@amo@", &markers().local, &skip_pool(), str::to_uppercase).unwrap();
        assert_eq!(vault.restore("%1854%".to_string()), "AMO");
    }

    #[test]
    fn exhausted_pool_is_an_error() {
        let pool = PlaceholderPool::generate(PoolKind::Skip, 1).unwrap();
        let err = mask("%a% %b%", &markers().skip, &pool, str::to_string).unwrap_err();
        assert!(matches!(err, Error::PlaceholdersExhausted { .. }));
    }

    #[test]
    fn custom_markers() {
        let spec = MarkerSpec { skip_open: "[[".into(), skip_close: "]]".into(), ..MarkerSpec::default() };
        let markers = Markers::compile(&spec).unwrap();
        let (masked, _) = mask("a [[b.c]] d", &markers.skip, &skip_pool(), str::to_string).unwrap();
        assert_eq!(masked, "a %1854% d");
        assert!(Markers::compile(&MarkerSpec { local_open: String::new(), ..MarkerSpec::default() }).is_err());
    }
}
