//! `TravelPrep` - Personalized, climate-aware travel preparation checklists
//!
//! This library derives a packing and preparation checklist from a trip:
//! climate detection across destinations and months, catalog filtering,
//! deduplication, and a deadline timeline.

pub mod catalog;
pub mod checklist;
pub mod climate;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reference;

// Re-export core types for public API
pub use checklist::{ChecklistGenerator, Timeline, TimelineWindow, resolve_deadline};
pub use climate::{ClimateCondition, ClimateDetection, ClimateTable, Season, TemperatureBand};
pub use config::TravelPrepConfig;
pub use error::TravelPrepError;
pub use models::{
    Destinations, DurationBucket, GeneratedChecklist, GeneratedItem, GeneratedSection, Priority,
    SkippedReference, Statistics, TripContext,
};
pub use reference::ReferenceData;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
