//! Domain models: the reference series entity and the external book record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Publication category shared by books and series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookCategory {
    #[default]
    Novel,
    Comic,
    Manga,
}

impl std::fmt::Display for BookCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookCategory::Novel => write!(f, "novel"),
            BookCategory::Comic => write!(f, "comic"),
            BookCategory::Manga => write!(f, "manga"),
        }
    }
}

/// Publication status of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    #[default]
    Ongoing,
    Completed,
}

/// Provenance of a catalog entry. Informational only: matching confidence
/// never depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesSource {
    #[default]
    Manual,
    ExternalSearch,
}

/// A single known multi-volume series from the reference catalog dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesEntity {
    pub name: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub category: BookCategory,
    /// Total number of volumes when the series is closed-ended.
    #[serde(default)]
    pub canonical_volumes: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Alternate renderings of the name: translations, article variants,
    /// abbreviations. Matched by substring containment after normalization.
    #[serde(default)]
    pub variations: Vec<String>,
    #[serde(default)]
    pub status: SeriesStatus,
    #[serde(default)]
    pub first_published: Option<i32>,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Language code to localized display name. Searchable, but never used
    /// by the masking path (put localized names in `variations` for that).
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub source: SeriesSource,
}

/// External book record, read-only to this core. Identity is whatever the
/// providing collaborator says it is; this engine only reads the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: BookCategory,
    /// Pre-assigned series label, trusted unconditionally when present.
    #[serde(default)]
    pub explicit_series: Option<String>,
    #[serde(default)]
    pub explicit_volume_number: Option<u32>,
}

impl BookRecord {
    /// Convenience constructor for the common title/author/category triple.
    pub fn new(title: impl Into<String>, author: impl Into<String>, category: BookCategory) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category,
            explicit_series: None,
            explicit_volume_number: None,
        }
    }
}
