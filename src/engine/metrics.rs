//! Engine run metrics.
//!
//! The intended usage is:
//!
//! - `Substitution::run` for normal operation.
//! - `Substitution::run_with_metrics` for profiling and for the CLI report.
//!
//! Metrics are cheap to collect (a few `Instant`s and counters per stage), so the parallel
//! dispatcher always collects them and sums the per-chunk values.

use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Wall-clock time of the whole run.
    pub total: Duration,
    /// Space and letter-form normalization.
    pub normalize: Duration,
    pub masking: MaskingMetrics,
    pub global: PassMetrics,
    /// Both two-char passes, in order.
    pub two_char: [PassMetrics; 2],
    /// Placeholder restoration, unmasking and output conversion.
    pub restore: Duration,
    /// Chunks the text was split into; `1` for a sequential run.
    pub chunks: usize,
}

#[derive(Debug, Default, Clone)]
pub struct MaskingMetrics {
    pub duration: Duration,
    /// Distinct `%...%` spans protected.
    pub skip_spans: usize,
    /// Distinct `@...@` spans rewritten with the local table.
    pub local_spans: usize,
}

/// Timing and rule counts for one replacement pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    pub duration: Duration,
    /// Rules that passed the letter gate.
    pub considered: usize,
    /// Rules whose pattern occurred in the text.
    pub applied: usize,
}

impl PassMetrics {
    fn absorb(&mut self, other: &PassMetrics) {
        self.duration += other.duration;
        self.considered += other.considered;
        self.applied += other.applied;
    }
}

impl RunMetrics {
    /// Add a chunk's metrics to these. `total` is left to the caller, which measures wall-clock time.
    pub fn absorb(&mut self, other: &RunMetrics) {
        self.normalize += other.normalize;
        self.masking.duration += other.masking.duration;
        self.masking.skip_spans += other.masking.skip_spans;
        self.masking.local_spans += other.masking.local_spans;
        self.global.absorb(&other.global);
        for (mine, theirs) in self.two_char.iter_mut().zip(&other.two_char) {
            mine.absorb(theirs);
        }
        self.restore += other.restore;
        self.chunks += other.chunks;
    }
}

/// Engine output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub output: String,
    pub metrics: RunMetrics,
}
