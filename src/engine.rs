//! Substitution engine.
//!
//! This module is the *public entry point* for converting text with a built [`RuleDatabase`]. It is
//! split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! RuleDatabase ──┐
//!                │  CompiledRules::new            (compiled_rules.rs)
//!                └──────────────┬───────────────
//!                               │
//! text ── TriggerInfo::scan ────┼─ letters present, markers present   (trigger.rs)
//!                               v
//!                     Substitution::run           (substitution.rs)
//!                       - mask %...% and @...@    (masking.rs)
//!                       - global + two-char passes, letter-gated
//!                       - restore placeholders    (restore.rs)
//!                               │
//!                               v
//!                        annotated text
//!
//! large text ── split_chunks ── Substitution::run per chunk on a rayon pool ── concat   (dispatch.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: per-rule `LetterMask`s over borrowed tables.
//! - `trigger.rs`: one scan of the text for letters and span markers.
//! - `masking.rs`: `MarkerSpec`, span regexes and the placeholder vaults for skip/local spans.
//! - `substitution.rs`: the stage pipeline.
//! - `restore.rs`: placeholder ledgers and line padding.
//! - `dispatch.rs`: line-boundary chunking and the worker pool.
//! - `metrics.rs`: timing and rule counts per stage.
//!
//! ## Debugging
//!
//! Set `RUST_LOG=glosilo=debug` to log masking, pass and dispatch traces.
//!
//! [`RuleDatabase`]: crate::RuleDatabase

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dispatch.rs"]
mod dispatch;
#[path = "engine/masking.rs"]
mod masking;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/restore.rs"]
mod restore;
#[path = "engine/substitution.rs"]
mod substitution;
#[path = "engine/trigger.rs"]
mod trigger;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use dispatch::run_parallel;
pub use masking::MarkerSpec;
pub use metrics::{PassMetrics, RunMetrics, RunResult};
pub use substitution::{OutputSettings, Substitution};
