//! Rule compilation and letter gating.
//!
//! This module holds the *static* side of the engine: per-rule metadata derived once from the rule
//! tables so that a run can skip rules that cannot possibly match.
//!
//! A run is split into two phases:
//!
//! 1. **Compile** (this module): borrow each [`RuleTable`] and record, per rule, the set of letters
//!    its pattern uses (`LetterMask`).
//! 2. **Run** (see `substitution.rs`): scan the text for the letters it contains (`trigger.rs`) and
//!    consider only the rules whose letters are all present.
//!
//! ## Invariants
//!
//! - `CompiledTable::masks[i]` describes `CompiledTable::rules[i]`; the two stay aligned.
//! - Gating never changes the result, only the work: a rule is skipped only when its pattern
//!   contains a letter the text lacks, so the pattern cannot occur in the text.

use crate::{Rule, RuleDatabase, RuleTable};

bitflags::bitflags! {
    /// One bit per lower-cased letter: `a`-`z` then `ĉ ĝ ĥ ĵ ŝ ŭ`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct LetterMask: u32 {
        const _ = !0;
    }
}

impl LetterMask {
    fn bit(c: char) -> Option<u32> {
        match c {
            'a'..='z' => Some(c as u32 - 'a' as u32),
            'ĉ' => Some(26),
            'ĝ' => Some(27),
            'ĥ' => Some(28),
            'ĵ' => Some(29),
            'ŝ' => Some(30),
            'ŭ' => Some(31),
            _ => None,
        }
    }

    /// Letters used by `text`, case-folded. Other characters are ignored.
    pub fn of(text: &str) -> Self {
        let mut bits = 0u32;
        for c in text.chars() {
            if c.is_ascii() {
                if let Some(bit) = Self::bit(c.to_ascii_lowercase()) {
                    bits |= 1 << bit;
                }
            } else {
                for lower in c.to_lowercase() {
                    if let Some(bit) = Self::bit(lower) {
                        bits |= 1 << bit;
                    }
                }
            }
        }
        LetterMask::from_bits_retain(bits)
    }
}

/// A borrowed rule table with one [`LetterMask`] per rule.
#[derive(Debug)]
pub struct CompiledTable<'a> {
    rules: &'a [Rule],
    masks: Vec<LetterMask>,
}

impl<'a> CompiledTable<'a> {
    pub fn new(table: &'a RuleTable) -> Self {
        let rules = table.rules();
        let masks = rules.iter().map(|r| LetterMask::of(&r.pattern)).collect();
        Self { rules, masks }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Rules, in table order, whose letters all occur in a text with letters `present`.
    pub fn active(&self, present: LetterMask) -> impl Iterator<Item = &'a Rule> + '_ {
        self.rules.iter().zip(&self.masks).filter(move |(_, mask)| present.contains(**mask)).map(|(rule, _)| rule)
    }

    /// [`RuleTable::safe_replace`], restricted to the rules that can match `text`.
    pub fn safe_replace(&self, text: &str) -> String {
        let mut out = text.to_string();
        let mut applied: Vec<&Rule> = Vec::new();
        for rule in self.active(LetterMask::of(text)) {
            if out.contains(rule.pattern.as_str()) {
                out = out.replace(rule.pattern.as_str(), &rule.placeholder);
                applied.push(rule);
            }
        }
        for rule in applied {
            out = out.replace(rule.placeholder.as_str(), &rule.replacement);
        }
        out
    }
}

/// The three tables of a [`RuleDatabase`], compiled.
#[derive(Debug)]
pub struct CompiledRules<'a> {
    pub global: CompiledTable<'a>,
    pub two_char: CompiledTable<'a>,
    pub local: CompiledTable<'a>,
}

impl<'a> CompiledRules<'a> {
    pub fn new(database: &'a RuleDatabase) -> Self {
        let compiled = CompiledRules {
            global: CompiledTable::new(&database.global),
            two_char: CompiledTable::new(&database.two_char),
            local: CompiledTable::new(&database.local),
        };
        log::debug!(
            "compiled {} global, {} two-char, {} local rules",
            compiled.global.len(),
            compiled.two_char.len(),
            compiled.local.len()
        );
        compiled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_folds_case_and_ignores_non_letters() {
        assert_eq!(LetterMask::of("Ŝipo $20987$"), LetterMask::of("ŝpio"));
        assert!(LetterMask::of("").is_empty());
        assert!(LetterMask::of("ĈU").contains(LetterMask::of("ĉ")));
        assert!(!LetterMask::of("cu").contains(LetterMask::of("ĉ")));
    }

    #[test]
    fn active_rules_keep_table_order() {
        let table = RuleTable::new(vec![
            Rule::new("amiko", "A", "$1$"),
            Rule::new("ŝip", "B", "$2$"),
            Rule::new("kat", "C", "$3$"),
            Rule::new("AMO", "D", "$4$"),
        ]);
        let compiled = CompiledTable::new(&table);
        let present = LetterMask::of("la amiko kaj la kato");
        let active: Vec<&str> = compiled.active(present).map(|r| r.pattern.as_str()).collect();
        assert_eq!(active, vec!["amiko", "kat", "AMO"]);
    }

    #[test]
    fn gated_safe_replace_matches_the_table() {
        let table = RuleTable::new(vec![Rule::new("amik", "[amik]", "$1$"), Rule::new("am", "[am]", "$2$")]);
        let compiled = CompiledTable::new(&table);
        for text in ["amiko amo", "ŝipo", "AMIKO"] {
            assert_eq!(compiled.safe_replace(text), table.safe_replace(text), "{text}");
        }
    }
}
