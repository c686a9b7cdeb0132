//! Esperanto letter forms.
//!
//! The six accented letters (ĉ ĝ ĥ ĵ ŝ ŭ) circulate in three spellings:
//!
//! ```text
//! circumflex   ĉ  Ĉ
//! x-digraph    cx Cx   (cX / CX are read, never written)
//! caret        c^ C^
//! ```
//!
//! Every conversion here is a pure, idempotent string function that only touches those letters; the
//! case of each letter is preserved. The substitution engine works on circumflex text and converts to
//! the requested [`LetterForm`] on the way out.

use serde::Deserialize;

/// Output spelling of the accented letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterForm {
    #[default]
    Circumflex,
    X,
    Hat,
}

impl LetterForm {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "circumflex" | "supersign" | "ĉ" => Some(LetterForm::Circumflex),
            "x" | "x-form" | "cx" => Some(LetterForm::X),
            "hat" | "caret" | "^" | "c^" => Some(LetterForm::Hat),
            _ => None,
        }
    }
}

/// (lowercase accented, lowercase base, uppercase accented, uppercase base)
const LETTERS: [(char, char, char, char); 6] = [
    ('ĉ', 'c', 'Ĉ', 'C'),
    ('ĝ', 'g', 'Ĝ', 'G'),
    ('ĥ', 'h', 'Ĥ', 'H'),
    ('ĵ', 'j', 'Ĵ', 'J'),
    ('ŝ', 's', 'Ŝ', 'S'),
    ('ŭ', 'u', 'Ŭ', 'U'),
];

fn accent_of(base: char) -> Option<char> {
    LETTERS.iter().find_map(|&(lower, lower_base, upper, upper_base)| {
        if base == lower_base {
            Some(lower)
        } else if base == upper_base {
            Some(upper)
        } else {
            None
        }
    })
}

fn base_of(accented: char) -> Option<char> {
    LETTERS.iter().find_map(|&(lower, lower_base, upper, upper_base)| {
        if accented == lower {
            Some(lower_base)
        } else if accented == upper {
            Some(upper_base)
        } else {
            None
        }
    })
}

/// Fold `<base><marker>` pairs into accented letters. `markers` lists the accepted second characters.
fn fold_digraphs(text: &str, markers: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(accented) = accent_of(c) {
            if chars.peek().is_some_and(|next| markers.contains(next)) {
                chars.next();
                out.push(accented);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Expand accented letters into `<base><marker>`.
fn unfold(text: &str, marker: char) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match base_of(c) {
            Some(base) => {
                out.push(base);
                out.push(marker);
            }
            None => out.push(c),
        }
    }
    out
}

pub fn x_to_circumflex(text: &str) -> String {
    fold_digraphs(text, &['x', 'X'])
}

pub fn circumflex_to_x(text: &str) -> String {
    unfold(text, 'x')
}

pub fn hat_to_circumflex(text: &str) -> String {
    fold_digraphs(text, &['^'])
}

pub fn circumflex_to_hat(text: &str) -> String {
    unfold(text, '^')
}

// Precomposed letters are left alone: only the marker of an existing pair is swapped.
pub fn x_to_hat(text: &str) -> String {
    convert_pairs(text, &['x', 'X'], '^')
}

pub fn hat_to_x(text: &str) -> String {
    convert_pairs(text, &['^'], 'x')
}

/// Rewrite `<base><from>` pairs as `<base><to>` without touching precomposed letters.
fn convert_pairs(text: &str, from: &[char], to: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if accent_of(c).is_some() && chars.peek().is_some_and(|next| from.contains(next)) {
            chars.next();
            out.push(c);
            out.push(to);
            continue;
        }
        out.push(c);
    }
    out
}

/// Both the x-digraph and the caret form folded into circumflex letters.
pub fn to_circumflex(text: &str) -> String {
    hat_to_circumflex(&x_to_circumflex(text))
}

/// Convert circumflex text into the requested output form.
pub fn convert(text: &str, form: LetterForm) -> String {
    match form {
        LetterForm::Circumflex => to_circumflex(text),
        LetterForm::X => circumflex_to_x(&to_circumflex(text)),
        LetterForm::Hat => circumflex_to_hat(&to_circumflex(text)),
    }
}

/// Map the Unicode space variants users paste from word processors onto ASCII space.
pub fn normalize_spaces(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2004}' | '\u{2005}' | '\u{2006}' | '\u{2007}'
            | '\u{2008}' | '\u{2009}' | '\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => ' ',
            other => other,
        })
        .collect()
}
