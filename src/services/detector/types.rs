//! Detection result types shared by strategies, arbiter, and consumers.

use serde::{Deserialize, Serialize};

/// Which strategy produced the winning match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    ExplicitField,
    VariationMatch,
    KeywordMatch,
    NumberingPattern,
    None,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMethod::ExplicitField => write!(f, "explicit_field"),
            DetectionMethod::VariationMatch => write!(f, "variation_match"),
            DetectionMethod::KeywordMatch => write!(f, "keyword_match"),
            DetectionMethod::NumberingPattern => write!(f, "numbering_pattern"),
            DetectionMethod::None => write!(f, "none"),
        }
    }
}

/// One strategy's candidate match for a single book.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub series_name: String,
    pub confidence: u8,
    pub method: DetectionMethod,
    pub reasons: Vec<String>,
}

/// Final classification of one book against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub belongs_to_series: bool,
    /// Present iff `belongs_to_series`.
    pub series_name: Option<String>,
    /// 0-100. Reported as computed even when below the mask threshold.
    pub confidence: u8,
    pub method: DetectionMethod,
    /// Every signal that contributed to the winning candidate, in order.
    pub match_reasons: Vec<String>,
}

impl DetectionResult {
    /// A "no match" result with a single explanatory reason.
    pub fn unmatched(reason: impl Into<String>) -> Self {
        Self {
            belongs_to_series: false,
            series_name: None,
            confidence: 0,
            method: DetectionMethod::None,
            match_reasons: vec![reason.into()],
        }
    }
}
