//! Checklist module
//!
//! - Merge: climate item routing and keyword-based deduplication
//! - Timeline: lead-time tags, deadlines and preparation windows
//! - Stats: summary counts
//! - Generator: the end-to-end pipeline

pub mod generator;
pub mod merge;
pub mod stats;
pub mod timeline;

pub use generator::ChecklistGenerator;
pub use merge::{
    KeywordConfig, KeywordTables, deduplicate_across_sections, deduplicate_within_section,
    merge_climate_items_into_sections,
};
pub use stats::compute_stats;
pub use timeline::{
    LeadTime, Timeline, TimelineBucket, TimelineEntry, TimelineWindow, build_timeline,
    resolve_deadline,
};
