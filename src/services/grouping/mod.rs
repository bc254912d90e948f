//! Grouping & masking: partitions a whole collection into visible series
//! groups and standalone books. Grouped books are marked hidden so the
//! default view renders the series entity instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::services::detector::normalizer;
use crate::services::detector::{DetectionResult, SeriesDetector};
use crate::types::models::BookRecord;

/// External read-state collaborator: maps book identity to a "completed"
/// flag. This core only counts; it does not own read-state.
pub trait ReadStateSource {
    fn is_completed(&self, book: &BookRecord) -> bool;
}

/// Read-state keyed by exact title, for collaborators without richer
/// identities.
impl ReadStateSource for HashMap<String, bool> {
    fn is_completed(&self, book: &BookRecord) -> bool {
        self.get(&book.title).copied().unwrap_or(false)
    }
}

/// One detected series with its member books and reading progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGroup {
    /// Normalized grouping key ("Astérix" and "ASTERIX" share one).
    pub series_key: String,
    pub display_name: String,
    /// Member titles in input order.
    pub member_titles: Vec<String>,
    pub read_count: u32,
    pub total_count: u32,
    /// 0-100, integer rounding.
    pub completion_percentage: u8,
}

/// Per-book outcome of a partition run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetection {
    /// Index of the book in the input sequence.
    pub index: usize,
    pub title: String,
    pub result: DetectionResult,
    /// True when the book was grouped into a series and masked from the
    /// default view.
    pub hidden: bool,
}

/// The two-way partition of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionOutcome {
    pub series_groups: Vec<SeriesGroup>,
    /// Books below the mask threshold, unmodified, in input order.
    pub standalone_books: Vec<BookRecord>,
    pub per_book_results: Vec<BookDetection>,
}

/// Partition a collection into series groups and standalone books.
///
/// Every book appears exactly once: either inside one group's
/// `member_titles` or in `standalone_books`. Re-running over the same
/// input and catalog yields an identical outcome; groups appear in order
/// of first detection, members in input order.
pub fn partition(
    books: &[BookRecord],
    detector: &SeriesDetector<'_>,
    read_state: Option<&dyn ReadStateSource>,
) -> PartitionOutcome {
    let mut per_book_results: Vec<BookDetection> = Vec::with_capacity(books.len());
    let mut standalone_books: Vec<BookRecord> = Vec::new();

    // Group key to position in `groups`; insertion order is first-detection
    // order, which keeps the output stable across runs.
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupDraft<'_>> = Vec::new();

    for (index, book) in books.iter().enumerate() {
        let result = detector.detect(book);

        let grouped = match (result.belongs_to_series, &result.series_name) {
            (true, Some(series_name)) => {
                let key = normalizer::normalize(series_name);
                let position = *group_index.entry(key.clone()).or_insert_with(|| {
                    groups.push(GroupDraft {
                        key,
                        first_detected_name: series_name.clone(),
                        members: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[position].members.push(book);
                true
            }
            _ => {
                standalone_books.push(book.clone());
                false
            }
        };

        per_book_results.push(BookDetection {
            index,
            title: book.title.clone(),
            result,
            hidden: grouped,
        });
    }

    let series_groups = groups
        .into_iter()
        .map(|draft| draft.finish(detector, read_state))
        .collect();

    PartitionOutcome {
        series_groups,
        standalone_books,
        per_book_results,
    }
}

struct GroupDraft<'b> {
    key: String,
    first_detected_name: String,
    members: Vec<&'b BookRecord>,
}

impl GroupDraft<'_> {
    fn finish(
        self,
        detector: &SeriesDetector<'_>,
        read_state: Option<&dyn ReadStateSource>,
    ) -> SeriesGroup {
        // Canonical catalog name when the key resolves there, otherwise the
        // first detected literal.
        let display_name = detector
            .catalog()
            .canonical_name(&self.key)
            .unwrap_or(&self.first_detected_name)
            .to_string();

        let total_count = self.members.len() as u32;
        let read_count = match read_state {
            Some(source) => self
                .members
                .iter()
                .filter(|book| source.is_completed(book))
                .count() as u32,
            None => 0,
        };

        // Members guarantee total_count >= 1.
        let completion_percentage =
            ((100.0 * f64::from(read_count)) / f64::from(total_count)).round() as u8;

        SeriesGroup {
            series_key: self.key,
            display_name,
            member_titles: self
                .members
                .iter()
                .map(|book| book.title.clone())
                .collect(),
            read_count,
            total_count,
            completion_percentage,
        }
    }
}

#[cfg(test)]
#[path = "tests/grouping_tests.rs"]
mod tests;
