//! Rule building.
//!
//! ```text
//! roots.txt ─────┐
//! glosses.csv ───┤  RankerInputs::read          (inputs.rs)
//! dictionary.json┤
//! overrides.json ┘
//!                   │
//!                   v
//!            ranker::build                      (ranker.rs)
//!              - base rules, stem resolution, derivation
//!              - -an / -on tables               (data.rs, data/suffix_ambiguity.json)
//!              - directives                     (directives.rs)
//!              - collapse + case expansion      (format.rs)
//!                   │
//!                   v
//!            RuleDatabase { global, two_char, local }   (database.rs)
//! ```

#[path = "rules/data.rs"]
mod data;
#[path = "rules/database.rs"]
mod database;
#[path = "rules/directives.rs"]
mod directives;
#[path = "rules/format.rs"]
mod format;
#[path = "rules/inputs.rs"]
mod inputs;
#[path = "rules/ranker.rs"]
mod ranker;

#[cfg(test)]
#[path = "rules/tests.rs"]
mod tests;

pub use data::{AmbiguityEntry, SuffixAmbiguity, bundled_ambiguity};
pub use database::RuleDatabase;
pub use directives::{Directive, DirectiveList, DirectivePriority, GlossSource, SkippedDirective, SuffixGroup};
pub use format::AnnotationFormat;
pub use inputs::{DictionaryEntry, GlossPair, InputFiles, PartOfSpeech, RankerInputs};
pub use ranker::{BuildReport, RankerOptions, build};
