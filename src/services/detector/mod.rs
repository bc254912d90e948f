//! Series detection arbiter: runs the strategy pipeline over one book and
//! yields a single deterministic `DetectionResult`.

pub mod normalizer;
pub mod strategies;
pub mod types;

pub use strategies::{
    default_strategies, ExplicitFieldStrategy, KeywordMatchStrategy, MatchStrategy,
    NumberingPatternStrategy, VariationMatchStrategy,
};
pub use types::{DetectionMethod, DetectionResult, MatchCandidate};

use serde::{Deserialize, Serialize};

use crate::services::catalog::SeriesCatalog;
use crate::types::models::BookRecord;
use crate::DEFAULT_MASK_THRESHOLD;

/// Arbiter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum winning confidence for a book to be masked into a series.
    pub mask_threshold: u8,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            mask_threshold: DEFAULT_MASK_THRESHOLD,
        }
    }
}

/// Stateless (per call) classifier binding a catalog to the strategy
/// pipeline. One instance may be shared by concurrent callers; nothing in
/// here mutates after construction.
pub struct SeriesDetector<'c> {
    catalog: &'c SeriesCatalog,
    config: DetectorConfig,
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl<'c> SeriesDetector<'c> {
    pub fn new(catalog: &'c SeriesCatalog) -> Self {
        Self::with_config(catalog, DetectorConfig::default())
    }

    pub fn with_config(catalog: &'c SeriesCatalog, config: DetectorConfig) -> Self {
        if catalog.is_empty() {
            log::warn!("series catalog is empty; every detection degrades to no-match");
        }

        Self {
            catalog,
            config,
            strategies: default_strategies(),
        }
    }

    pub fn catalog(&self) -> &SeriesCatalog {
        self.catalog
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Classify one book with the configured mask threshold.
    pub fn detect(&self, book: &BookRecord) -> DetectionResult {
        self.detect_with_threshold(book, self.config.mask_threshold)
    }

    /// Classify one book with an explicit mask threshold (used by the batch
    /// orchestrator's `min_confidence` override).
    pub fn detect_with_threshold(&self, book: &BookRecord, threshold: u8) -> DetectionResult {
        let threshold = threshold.min(100);

        if book.title.trim().is_empty() {
            return DetectionResult::unmatched("empty title");
        }
        if self.catalog.is_empty() {
            return DetectionResult::unmatched("catalog empty, detection degraded to no-match");
        }

        let mut candidates: Vec<MatchCandidate> = Vec::new();
        for strategy in &self.strategies {
            let Some(candidate) = strategy.evaluate(book, self.catalog) else {
                continue;
            };

            #[cfg(feature = "debug_detector")]
            log::debug!(
                "candidate for \"{}\": {} \"{}\" ({})",
                book.title,
                candidate.method,
                candidate.series_name,
                candidate.confidence
            );

            // The explicit field is authoritative: no other signal is
            // allowed to override it.
            if candidate.method == DetectionMethod::ExplicitField {
                return resolve(candidate, threshold);
            }
            candidates.push(candidate);
        }

        let mut winner: Option<MatchCandidate> = None;
        for candidate in candidates {
            // Strictly greater: exact ties keep the earlier strategy
            // (variation > keyword > numbering).
            if winner
                .as_ref()
                .is_none_or(|best| candidate.confidence > best.confidence)
            {
                winner = Some(candidate);
            }
        }

        match winner {
            Some(candidate) => resolve(candidate, threshold),
            None => DetectionResult::unmatched("no strategy matched"),
        }
    }
}

/// Apply the mask threshold to the winning candidate.
fn resolve(candidate: MatchCandidate, threshold: u8) -> DetectionResult {
    let mut match_reasons = candidate.reasons;

    if candidate.confidence >= threshold {
        DetectionResult {
            belongs_to_series: true,
            series_name: Some(candidate.series_name),
            confidence: candidate.confidence,
            method: candidate.method,
            match_reasons,
        }
    } else {
        match_reasons.push(format!(
            "below threshold ({} < {threshold})",
            candidate.confidence
        ));
        DetectionResult {
            belongs_to_series: false,
            series_name: None,
            confidence: candidate.confidence,
            method: candidate.method,
            match_reasons,
        }
    }
}

#[cfg(test)]
#[path = "tests/arbiter_tests.rs"]
mod tests;
