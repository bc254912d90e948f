//! Match strategies: each turns a (book, catalog) pair into at most one
//! candidate. Strategies are independent and individually testable; the
//! arbiter owns ordering and tie-breaking.

use regex::Regex;
use std::sync::LazyLock;

use super::normalizer;
use super::types::{DetectionMethod, MatchCandidate};
use crate::services::catalog::SeriesCatalog;
use crate::types::models::BookRecord;

/// Volume markers recognized in titles: "tome 3", "Volume 12", "#7".
static RE_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:tome|volume)\s*(\d+)|#(\d+)").expect("Invalid regex"));

/// Minimum trimmed prefix length for the numbering strategy to fire.
const MIN_NUMBERING_PREFIX_LEN: usize = 4;

/// A single detection rule.
pub trait MatchStrategy: Send + Sync {
    fn method(&self) -> DetectionMethod;

    /// Zero or one candidate for this book. Must be pure: same inputs,
    /// same output.
    fn evaluate(&self, book: &BookRecord, catalog: &SeriesCatalog) -> Option<MatchCandidate>;
}

/// The default strategy pipeline, in arbitration order.
pub fn default_strategies() -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(ExplicitFieldStrategy),
        Box::new(VariationMatchStrategy),
        Box::new(KeywordMatchStrategy),
        Box::new(NumberingPatternStrategy),
    ]
}

/// Trusts a pre-existing series assignment on the book unconditionally.
pub struct ExplicitFieldStrategy;

impl MatchStrategy for ExplicitFieldStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::ExplicitField
    }

    fn evaluate(&self, book: &BookRecord, _catalog: &SeriesCatalog) -> Option<MatchCandidate> {
        let series = book
            .explicit_series
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;

        Some(MatchCandidate {
            series_name: series.to_string(),
            confidence: 100,
            method: DetectionMethod::ExplicitField,
            reasons: vec![format!("explicit series field \"{series}\"")],
        })
    }
}

/// Substring match between the normalized title and the catalog's known
/// name variations. Confidence 80-95, scaled by how much of the title the
/// matched variation covers.
pub struct VariationMatchStrategy;

impl MatchStrategy for VariationMatchStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::VariationMatch
    }

    fn evaluate(&self, book: &BookRecord, catalog: &SeriesCatalog) -> Option<MatchCandidate> {
        let title_key = normalizer::normalize(&book.title);
        if title_key.is_empty() {
            return None;
        }

        let hit = catalog.find_by_variation(&title_key)?;
        let ratio = (hit.length as f64 / title_key.len() as f64).min(1.0);
        let confidence = (80.0 + (15.0 * ratio).round()) as u8;

        Some(MatchCandidate {
            series_name: hit.entry.name.clone(),
            confidence,
            method: DetectionMethod::VariationMatch,
            reasons: vec![
                format!(
                    "title matches catalog variation \"{}\" of series \"{}\"",
                    hit.variation, hit.entry.name
                ),
                format!(
                    "variation covers {} of {} normalized chars",
                    hit.length.min(title_key.len()),
                    title_key.len()
                ),
            ],
        })
    }
}

/// Whole-token overlap between the title and a series' keyword set.
/// Needs at least two keywords; confidence 60-75, scaled by the proportion
/// of the series' keywords present.
pub struct KeywordMatchStrategy;

impl MatchStrategy for KeywordMatchStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::KeywordMatch
    }

    fn evaluate(&self, book: &BookRecord, catalog: &SeriesCatalog) -> Option<MatchCandidate> {
        let tokens = normalizer::tokenize(&book.title);
        if tokens.is_empty() {
            return None;
        }

        // Hits come back ranked, so the first one is the best overlap.
        let best = catalog
            .find_by_keywords(&tokens)
            .into_iter()
            .next()
            .filter(|hit| hit.matched.len() >= 2)?;

        let proportion = best.matched.len() as f64 / best.total as f64;
        let confidence = (60.0 + (15.0 * proportion).round()) as u8;

        Some(MatchCandidate {
            series_name: best.entry.name.clone(),
            confidence,
            method: DetectionMethod::KeywordMatch,
            reasons: vec![
                format!("keywords matched: {}", best.matched.join(", ")),
                format!(
                    "{} of {} series keywords present",
                    best.matched.len(),
                    best.total
                ),
            ],
        })
    }
}

/// Titles carrying a volume marker ("tome N", "volume N", "#N"), with the
/// series name taken from the prefix before the marker. Confidence 70-85:
/// base 80, +5 when the catalog's canonical volume count admits the parsed
/// number, -10 when the prefix is unknown to the catalog.
pub struct NumberingPatternStrategy;

impl MatchStrategy for NumberingPatternStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::NumberingPattern
    }

    fn evaluate(&self, book: &BookRecord, catalog: &SeriesCatalog) -> Option<MatchCandidate> {
        let title = book.title.trim();
        let captures = RE_NUMBERING.captures(title)?;
        let marker = captures.get(0)?;
        let volume: u32 = captures
            .get(1)
            .or_else(|| captures.get(2))?
            .as_str()
            .parse()
            .ok()?;

        let prefix = trim_prefix(&title[..marker.start()]);
        if prefix.chars().count() < MIN_NUMBERING_PREFIX_LEN {
            return None;
        }

        let mut reasons = vec![format!(
            "numbering marker \"{}\" with prefix \"{prefix}\"",
            marker.as_str()
        )];
        if book.explicit_volume_number == Some(volume) {
            reasons.push(format!("volume number {volume} corroborated by record"));
        }

        let prefix_key = normalizer::normalize(prefix);
        match catalog.find_by_variation(&prefix_key) {
            Some(hit) => {
                let mut confidence = 80;
                reasons.push(format!("prefix resolves to catalog series \"{}\"", hit.entry.name));
                if hit
                    .entry
                    .canonical_volumes
                    .is_some_and(|total| volume >= 1 && volume <= total)
                {
                    confidence += 5;
                    reasons.push(format!(
                        "volume {volume} within canonical count {}",
                        hit.entry.canonical_volumes.unwrap_or_default()
                    ));
                }

                Some(MatchCandidate {
                    series_name: hit.entry.name.clone(),
                    confidence,
                    method: DetectionMethod::NumberingPattern,
                    reasons,
                })
            }
            None => {
                reasons.push("prefix not present in catalog".to_string());
                Some(MatchCandidate {
                    series_name: prefix.to_string(),
                    confidence: 70,
                    method: DetectionMethod::NumberingPattern,
                    reasons,
                })
            }
        }
    }
}

/// Strip the separators that conventionally sit between a series name and
/// its volume marker ("Malaussène - Tome 3", "Berserk, volume 2").
fn trim_prefix(prefix: &str) -> &str {
    prefix
        .trim()
        .trim_end_matches(|c: char| matches!(c, '-' | ':' | ',' | '.' | '(' | '['))
        .trim_end()
}

#[cfg(test)]
#[path = "tests/strategy_tests.rs"]
mod tests;
