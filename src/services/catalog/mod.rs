//! Reference series catalog: loading, validation, and the query surface.
//!
//! The catalog is loaded once at startup, validated, and treated as
//! read-only for the rest of the process lifetime. Matching keys are
//! precomputed here so per-book evaluation never re-normalizes catalog
//! data.

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::services::detector::normalizer;
use crate::types::errors::{EngineError, EngineResult};
use crate::types::models::{BookCategory, SeriesEntity};

/// Minimum normalized length for a variation to participate in substring
/// matching. Shorter variations match too many unrelated titles.
pub const MIN_VARIATION_LEN: usize = 4;

/// Maximum number of results returned by the discovery `search` surface.
const SEARCH_RESULT_CAP: usize = 20;

/// Fuzzy score floor below which a search candidate is dropped.
const SEARCH_FUZZY_THRESHOLD: f32 = 0.2;

/// A variation hit: which series matched and through which rendering.
#[derive(Debug, Clone)]
pub struct VariationMatch<'a> {
    pub entry: &'a SeriesEntity,
    /// The normalized variation text that matched.
    pub variation: String,
    /// Normalized length of the matched variation.
    pub length: usize,
}

/// A keyword-overlap hit against one series' keyword set.
#[derive(Debug, Clone)]
pub struct KeywordMatch<'a> {
    pub entry: &'a SeriesEntity,
    /// Matched keyword tokens, sorted for deterministic output.
    pub matched: Vec<String>,
    /// Size of the series' full keyword token set.
    pub total: usize,
}

/// One scored result from the discovery search surface.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchResultEntry {
    pub item: SeriesEntity,
    pub score: f32,
}

/// The static reference catalog of known multi-volume series.
#[derive(Debug, Clone)]
pub struct SeriesCatalog {
    entries: Vec<SeriesEntity>,
    /// Pre-computed: (normalized variation key, entry id). The canonical
    /// name participates as an implicit variation of its own entry.
    variation_keys: Vec<(String, usize)>,
    /// Pre-computed: for each entry, its normalized keyword token set.
    keywords: Vec<(usize, HashSet<String>)>,
}

impl SeriesCatalog {
    /// Build a catalog from raw entries, validating that no two series
    /// share a normalized name or variation.
    pub fn new(entries: Vec<SeriesEntity>) -> EngineResult<Self> {
        let mut variation_keys: Vec<(String, usize)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (entry_id, entry) in entries.iter().enumerate() {
            let mut entry_keys: HashSet<String> = HashSet::new();
            let name_key = normalizer::normalize(&entry.name);
            if !name_key.is_empty() {
                entry_keys.insert(name_key);
            }
            for variation in &entry.variations {
                let key = normalizer::normalize(variation);
                if !key.is_empty() {
                    entry_keys.insert(key);
                }
            }

            // Duplicates within one entry collapse silently; across entries
            // they violate the uniqueness invariant.
            let mut sorted_keys: Vec<String> = entry_keys.into_iter().collect();
            sorted_keys.sort();
            for key in sorted_keys {
                if !seen.insert(key.clone()) {
                    return Err(EngineError::DuplicateVariation(key));
                }
                variation_keys.push((key, entry_id));
            }
        }

        let keywords = entries
            .iter()
            .enumerate()
            .map(|(entry_id, entry)| {
                let mut tokens: HashSet<String> = HashSet::new();
                for keyword in &entry.keywords {
                    tokens.extend(normalizer::tokenize(keyword));
                }
                (entry_id, tokens)
            })
            .collect();

        Ok(Self {
            entries,
            variation_keys,
            keywords,
        })
    }

    /// Load from a JSON document whose root is either a bare array of
    /// series objects or an object with an `entries` key.
    pub fn from_json(json_str: &str) -> EngineResult<Self> {
        let parsed: Value = serde_json::from_str(json_str)?;

        let entries: Vec<SeriesEntity> = match parsed {
            Value::Object(ref map) if map.contains_key("entries") => {
                serde_json::from_value(map["entries"].clone())?
            }
            Value::Array(_) => serde_json::from_value(parsed)?,
            _ => {
                return Err(EngineError::Catalog(
                    "Invalid catalog format: expected array or object with 'entries' key"
                        .to_string(),
                ))
            }
        };

        Self::new(entries)
    }

    /// Load the catalog dataset from disk. A missing file is degraded mode
    /// (empty catalog), not an error.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        if !path.exists() {
            log::warn!("Series catalog not found: {}", path.display());
            return Self::new(Vec::new());
        }

        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Catalog(format!("Failed to read catalog: {e}")))?;
        Self::from_json(&json)
    }

    /// An empty catalog (degraded mode).
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            variation_keys: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[SeriesEntity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the series whose variation matches the normalized title,
    /// preferring the longest matching variation. Containment goes both
    /// ways, but a title shorter than `MIN_VARIATION_LEN` only matches
    /// forward (variation inside title).
    pub fn find_by_variation(&self, normalized_title: &str) -> Option<VariationMatch<'_>> {
        if normalized_title.is_empty() {
            return None;
        }

        let mut best: Option<&(String, usize)> = None;
        for candidate in &self.variation_keys {
            let (key, _) = candidate;
            if key.len() < MIN_VARIATION_LEN {
                continue;
            }

            let forward = normalized_title.contains(key.as_str());
            let reverse =
                normalized_title.len() >= MIN_VARIATION_LEN && key.contains(normalized_title);
            if !forward && !reverse {
                continue;
            }

            // Strictly longer wins; ties keep the earlier catalog entry.
            if best.is_none_or(|(best_key, _)| key.len() > best_key.len()) {
                best = Some(candidate);
            }
        }

        best.map(|(key, entry_id)| VariationMatch {
            entry: &self.entries[*entry_id],
            variation: key.clone(),
            length: key.len(),
        })
    }

    /// Resolve a normalized key to the canonical display name, if any
    /// catalog entry's name or variation normalizes to exactly that key.
    pub fn canonical_name(&self, normalized_key: &str) -> Option<&str> {
        self.variation_keys
            .iter()
            .find(|(key, _)| key == normalized_key)
            .map(|(_, entry_id)| self.entries[*entry_id].name.as_str())
    }

    /// Rank series by whole-token overlap between the given token set and
    /// each series' keywords. Entries with no overlap are omitted.
    pub fn find_by_keywords(&self, tokens: &HashSet<String>) -> Vec<KeywordMatch<'_>> {
        let mut hits: Vec<KeywordMatch<'_>> = Vec::new();

        for (entry_id, keyword_set) in &self.keywords {
            if keyword_set.is_empty() {
                continue;
            }

            let mut matched: Vec<String> =
                keyword_set.intersection(tokens).cloned().collect();
            if matched.is_empty() {
                continue;
            }
            matched.sort();

            hits.push(KeywordMatch {
                entry: &self.entries[*entry_id],
                matched,
                total: keyword_set.len(),
            });
        }

        // Stable sort: catalog order breaks count ties.
        hits.sort_by(|a, b| b.matched.len().cmp(&a.matched.len()));
        hits
    }

    /// Free-text discovery search across name, authors, keywords, and
    /// localized names. Direct substring hits score 1.0; otherwise a fuzzy
    /// score over name and variations applies. Never consulted by the
    /// masking path.
    pub fn search(&self, query: &str) -> Vec<SearchResultEntry> {
        let query_lower = query.trim().to_lowercase();

        let mut results = Vec::new();
        for entry in &self.entries {
            if query_lower.is_empty() {
                results.push(SearchResultEntry {
                    item: entry.clone(),
                    score: 1.0,
                });
                continue;
            }

            let mut is_direct_match = entry.name.to_lowercase().contains(&query_lower);
            if !is_direct_match {
                is_direct_match = entry
                    .authors
                    .iter()
                    .chain(entry.keywords.iter())
                    .chain(entry.translations.values())
                    .any(|s| s.to_lowercase().contains(&query_lower));
            }

            let score = if is_direct_match {
                1.0
            } else if query_lower.len() < 3 {
                0.0
            } else {
                let mut max_score =
                    strsim::normalized_levenshtein(&query_lower, &entry.name.to_lowercase()) as f32;
                for variation in &entry.variations {
                    let variation_score =
                        strsim::normalized_levenshtein(&query_lower, &variation.to_lowercase())
                            as f32;
                    if variation_score > max_score {
                        max_score = variation_score;
                    }
                }
                max_score
            };

            if score >= SEARCH_FUZZY_THRESHOLD {
                results.push(SearchResultEntry {
                    item: entry.clone(),
                    score,
                });
            }
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.item.name.cmp(&b.item.name))
        });

        results.into_iter().take(SEARCH_RESULT_CAP).collect()
    }

    /// All series in the given category, in catalog order.
    pub fn by_category(&self, category: BookCategory) -> Vec<&SeriesEntity> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// All series with an author matching the fragment, case-insensitive.
    pub fn by_author(&self, fragment: &str) -> Vec<&SeriesEntity> {
        let fragment_lower = fragment.trim().to_lowercase();
        if fragment_lower.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .authors
                    .iter()
                    .any(|author| author.to_lowercase().contains(&fragment_lower))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
