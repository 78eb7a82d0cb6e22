//! Insight engine: filtering, ranking and display enrichment.

/// Display-enriched result types.
pub mod display;
/// The engine itself.
pub mod engine;
/// Filter criteria.
pub mod filter;

pub use display::{CertaintyCounts, DisplayFields, InsightWithDisplay};
pub use engine::{InsightEngine, PERSONALIZED_THRESHOLD};
pub use filter::InsightFilter;
