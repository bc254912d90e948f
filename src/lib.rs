pub mod services;
pub mod types;

/// Default confidence threshold for masking a book into a series group.
/// Shared default between the detector config and batch options.
pub const DEFAULT_MASK_THRESHOLD: u8 = 70;

pub use services::batch::{analyze_all, analyze_all_with, AnalyzeOptions, BatchSummary};
pub use services::catalog::{SearchResultEntry, SeriesCatalog};
pub use services::detector::normalizer;
pub use services::detector::{DetectionMethod, DetectionResult, DetectorConfig, SeriesDetector};
pub use services::grouping::{
    partition, BookDetection, PartitionOutcome, ReadStateSource, SeriesGroup,
};
pub use types::errors::{EngineError, EngineResult};
pub use types::models::{BookCategory, BookRecord, SeriesEntity, SeriesSource, SeriesStatus};
