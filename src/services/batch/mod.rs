//! Batch orchestration: one at-most-once detection pass over a whole
//! collection, with progress reporting and per-book error containment.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::services::detector::normalizer;
use crate::services::detector::{DetectionResult, SeriesDetector};
use crate::types::errors::EngineResult;
use crate::types::models::BookRecord;

/// Options for a batch pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Overrides the detector's mask threshold when set.
    pub min_confidence: Option<u8>,
    /// Cooperative rate limit between evaluations. Only honored when the
    /// evaluation step is remote (`analyze_all_with`); the in-process
    /// detector ignores it.
    pub delay_between_calls_ms: Option<u64>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            min_confidence: None,
            delay_between_calls_ms: None,
        }
    }
}

/// Aggregated counters for one batch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub books_analyzed: usize,
    /// Distinct series detected (by normalized key).
    pub series_detected: usize,
    pub standalone_books: usize,
    /// Books whose evaluation failed; each is counted and treated as
    /// standalone, never aborting the batch.
    pub errors: usize,
}

/// Progress callback: `(current, total, percent)` after each book.
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize, u8);

/// Run the in-process detector over the whole collection.
///
/// `delay_between_calls_ms` is inert here: nothing remote is being rate
/// limited.
pub fn analyze_all(
    books: &[BookRecord],
    detector: &SeriesDetector<'_>,
    options: &AnalyzeOptions,
    on_progress: Option<ProgressFn<'_>>,
) -> BatchSummary {
    if options.delay_between_calls_ms.is_some() {
        log::debug!("delay_between_calls_ms ignored for in-process evaluation");
    }

    let threshold = options
        .min_confidence
        .unwrap_or(detector.config().mask_threshold);

    let inert = AnalyzeOptions {
        min_confidence: options.min_confidence,
        delay_between_calls_ms: None,
    };
    analyze_all_with(books, &inert, on_progress, |book| {
        Ok(detector.detect_with_threshold(book, threshold))
    })
}

/// Run a pluggable, possibly remote evaluator over the whole collection.
///
/// A failed evaluation is logged, counted in `errors`, and the book is
/// treated as standalone; the batch always completes. The configured
/// inter-call delay is honored between evaluations.
pub fn analyze_all_with<F>(
    books: &[BookRecord],
    options: &AnalyzeOptions,
    mut on_progress: Option<ProgressFn<'_>>,
    mut evaluate: F,
) -> BatchSummary
where
    F: FnMut(&BookRecord) -> EngineResult<DetectionResult>,
{
    let total = books.len();
    let delay = options.delay_between_calls_ms.map(Duration::from_millis);

    let mut series_keys: HashSet<String> = HashSet::new();
    let mut standalone_books = 0;
    let mut errors = 0;

    for (index, book) in books.iter().enumerate() {
        if index > 0 {
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }
        }

        match evaluate(book) {
            Ok(result) => match (result.belongs_to_series, result.series_name) {
                (true, Some(series_name)) => {
                    series_keys.insert(normalizer::normalize(&series_name));
                }
                _ => standalone_books += 1,
            },
            Err(error) => {
                log::warn!("evaluation failed for \"{}\": {error}", book.title);
                errors += 1;
                standalone_books += 1;
            }
        }

        if let Some(callback) = on_progress.as_mut() {
            let current = index + 1;
            let percent = ((100.0 * current as f64) / total as f64).round() as u8;
            callback(current, total, percent);
        }
    }

    BatchSummary {
        books_analyzed: total,
        series_detected: series_keys.len(),
        standalone_books,
        errors,
    }
}

#[cfg(test)]
#[path = "tests/batch_tests.rs"]
mod tests;
