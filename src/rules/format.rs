//! Annotation formats and the case transforms that must respect them.
//!
//! ```text
//! ruby               <ruby>am<rt>愛</rt></ruby>
//! ruby-gloss-base    <ruby>愛<rt>am</rt></ruby>
//! bracket            am(愛)
//! bracket-gloss-base 愛(am)
//! gloss-only         愛
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationFormat {
    #[default]
    Ruby,
    RubyGlossBase,
    Bracket,
    BracketGlossBase,
    GlossOnly,
}

impl AnnotationFormat {
    pub const ALL: [AnnotationFormat; 5] = [
        AnnotationFormat::Ruby,
        AnnotationFormat::RubyGlossBase,
        AnnotationFormat::Bracket,
        AnnotationFormat::BracketGlossBase,
        AnnotationFormat::GlossOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnnotationFormat::Ruby => "ruby",
            AnnotationFormat::RubyGlossBase => "ruby-gloss-base",
            AnnotationFormat::Bracket => "bracket",
            AnnotationFormat::BracketGlossBase => "bracket-gloss-base",
            AnnotationFormat::GlossOnly => "gloss-only",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "html" => Some(AnnotationFormat::Ruby),
            "html-gloss-base" => Some(AnnotationFormat::RubyGlossBase),
            "parentheses" => Some(AnnotationFormat::Bracket),
            "plain" => Some(AnnotationFormat::GlossOnly),
            other => Self::ALL.into_iter().find(|f| f.name() == other),
        }
    }

    pub fn is_html(self) -> bool {
        matches!(self, AnnotationFormat::Ruby | AnnotationFormat::RubyGlossBase)
    }

    /// Render `root` annotated with `gloss`.
    pub fn annotate(self, root: &str, gloss: &str) -> String {
        match self {
            AnnotationFormat::Ruby => format!("<ruby>{root}<rt>{gloss}</rt></ruby>"),
            AnnotationFormat::RubyGlossBase => format!("<ruby>{gloss}<rt>{root}</rt></ruby>"),
            AnnotationFormat::Bracket => format!("{root}({gloss})"),
            AnnotationFormat::BracketGlossBase => format!("{gloss}({root})"),
            AnnotationFormat::GlossOnly => gloss.to_string(),
        }
    }

    /// Upper-case variant of an annotated string. Markup is left intact for the HTML formats.
    pub fn upper(self, text: &str) -> String {
        if self.is_html() { upper_outside_tags(text) } else { text.to_uppercase() }
    }

    /// Title-case variant of an annotated string.
    ///
    /// HTML annotations get the first letter of the ruby base and of its reading capitalized; the
    /// plain formats follow the usual first-upper, rest-lower rule.
    pub fn capitalize(self, text: &str) -> String {
        if self.is_html() { capitalize_annotation(text) } else { capitalize(text) }
    }
}

/// First character upper case, the rest lower case.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_outside_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(c);
            }
            '>' => {
                in_tag = false;
                out.push(c);
            }
            _ if in_tag => out.push(c),
            _ => out.extend(c.to_uppercase()),
        }
    }
    out
}

/// Capitalize the leading ruby element's base and reading; text that does not start with a ruby
/// element just gets its first character upper-cased.
pub fn capitalize_annotation(text: &str) -> String {
    let re = regex!(r"^<ruby>([^<]*)<rt([^>]*)>([^<]*)</rt></ruby>");
    match re.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            format!(
                "<ruby>{}<rt{}>{}</rt></ruby>{}",
                upper_first(&caps[1]),
                &caps[2],
                upper_first(&caps[3]),
                &text[whole..]
            )
        }
        None => upper_first(text),
    }
}

/// Collapse `<ruby>X<rt>X</rt></ruby>` into plain `X`.
pub fn strip_redundant(text: &str) -> String {
    let re = regex!(r"<ruby>([^<]+)<rt[^>]*>([^<]+)</rt></ruby>");
    re.replace_all(text, |caps: &regex::Captures<'_>| {
        if caps[1] == caps[2] { caps[1].to_string() } else { caps[0].to_string() }
    })
    .into_owned()
}
