//! Parallel dispatch: split at line boundaries, run chunks on a dedicated pool, reassemble in order.
//!
//! Every stage of a run is line-local (spans never cross a newline), so running chunks
//! independently and concatenating the outputs gives the same text as one sequential run.

use std::time::Instant;

use rayon::prelude::*;

use super::metrics::{RunMetrics, RunResult};
use super::substitution::Substitution;
use crate::error::{Error, Result};

/// Split `text` into at most `parts` contiguous runs of whole lines. Each line keeps its `\n`; the
/// last chunk takes the remainder.
pub fn split_chunks(text: &str, parts: usize) -> Vec<&str> {
    let ends: Vec<usize> = text.split_inclusive('\n').scan(0, |end, line| {
        *end += line.len();
        Some(*end)
    })
    .collect();
    if parts <= 1 || ends.len() <= 1 {
        return vec![text];
    }

    let per_chunk = (ends.len() / parts).max(1);
    let mut chunks = Vec::with_capacity(parts);
    let mut start = 0;
    for part in 0..parts {
        let first_line = part * per_chunk;
        if first_line >= ends.len() {
            break;
        }
        let end = if part + 1 == parts { text.len() } else { ends[(first_line + per_chunk).min(ends.len()) - 1] };
        if end > start {
            chunks.push(&text[start..end]);
        }
        start = end;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Run `substitution` over `text` on `workers` threads. Any failing chunk fails the whole run.
pub fn run_parallel(substitution: &Substitution<'_>, text: &str, workers: usize) -> Result<RunResult> {
    let chunks = split_chunks(text, workers);
    if chunks.len() <= 1 {
        return substitution.run_with_metrics(text);
    }

    let start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|err| Error::Worker(err.to_string()))?;
    log::debug!("dispatching {} chunks to {workers} workers", chunks.len());
    let results: Vec<RunResult> = pool.install(|| {
        chunks.par_iter().map(|chunk| substitution.run_with_metrics(chunk)).collect::<Result<Vec<_>>>()
    })?;

    let mut output = String::with_capacity(results.iter().map(|r| r.output.len()).sum());
    let mut metrics = RunMetrics::default();
    for result in &results {
        output.push_str(&result.output);
        metrics.absorb(&result.metrics);
    }
    metrics.total = start.elapsed();
    Ok(RunResult { output, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_cover_the_text_in_order() {
        let text = "a\nb\nc\nd\ne\n";
        for parts in 1..8 {
            let chunks = split_chunks(text, parts);
            assert!(chunks.len() <= parts.max(1), "{parts}: {chunks:?}");
            assert_eq!(chunks.concat(), text);
            assert!(chunks.iter().all(|c| !c.is_empty()));
        }
        assert_eq!(split_chunks(text, 2), vec!["a\nb\n", "c\nd\ne\n"]);
    }

    #[test]
    fn chunks_end_on_line_boundaries() {
        let chunks = split_chunks("la\nhundo\nkaj\nla kato", 3);
        assert_eq!(chunks, vec!["la\n", "hundo\n", "kaj\nla kato"]);
    }

    #[test]
    fn single_line_is_one_chunk() {
        assert_eq!(split_chunks("amo", 4), vec!["amo"]);
        assert_eq!(split_chunks("", 4), vec![""]);
    }
}
