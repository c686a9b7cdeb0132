//! Placeholder bookkeeping for the replacement passes, and line padding.

use std::borrow::Cow;

/// Placeholders inserted by one pass, in insertion order, with the replacement each stands for.
#[derive(Debug, Default)]
pub struct Ledger<'a> {
    entries: Vec<(Cow<'a, str>, &'a str)>,
}

impl<'a> Ledger<'a> {
    pub fn record(&mut self, placeholder: Cow<'a, str>, replacement: &'a str) {
        self.entries.push((placeholder, replacement));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn restore(&self, text: String) -> String {
        self.entries
            .iter()
            .fold(text, |text, (placeholder, replacement)| text.replace(placeholder.as_ref(), replacement))
    }

    /// Restore the last insertion first. Needed when a later placeholder was inserted over part of
    /// an earlier one.
    pub fn restore_reversed(&self, text: String) -> String {
        self.entries
            .iter()
            .rev()
            .fold(text, |text, (placeholder, replacement)| text.replace(placeholder.as_ref(), replacement))
    }
}

/// Surround every line with one space so word-initial and word-final patterns match at line edges.
/// A trailing `\r` stays outside the padding.
pub fn pad_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2 * text.lines().count() + 2);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let (body, cr) = match line.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (line, ""),
        };
        out.push(' ');
        out.push_str(body);
        out.push(' ');
        out.push_str(cr);
    }
    out
}

/// Inverse of [`pad_lines`].
pub fn unpad_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let (body, cr) = match line.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (line, ""),
        };
        let body = body.strip_prefix(' ').unwrap_or(body);
        let body = body.strip_suffix(' ').unwrap_or(body);
        out.push_str(body);
        out.push_str(cr);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_round_trips() {
        for text in ["", "amo", "la\nhundo\n", "a\r\nb\r\n", "  two  spaces  "] {
            let padded = pad_lines(text);
            assert_eq!(unpad_lines(&padded), text, "{text:?}");
        }
        assert_eq!(pad_lines("a\r\nb"), " a \r\n b ");
    }

    #[test]
    fn reversed_restore_unwinds_nested_placeholders() {
        let mut ledger = Ledger::default();
        ledger.record(Cow::Borrowed("$1$"), "X");
        ledger.record(Cow::Borrowed("$$2$"), "$Y");
        // "$1$ad" -> "$1" + "$$2$" once the `$ad` rule consumed the closing `$`
        let text = "$1$$2$".to_string();
        assert_eq!(ledger.restore_reversed(text), "XY");
        assert_eq!(ledger.len(), 2);
    }
}
