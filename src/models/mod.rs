//! Data models for the `TravelPrep` engine
//!
//! This module contains the core domain models organized by concern:
//! - Trip: the trip context supplied by the questionnaire
//! - Item: catalog items, their filters and generated copies
//! - Checklist: generated sections, statistics and the final checklist

pub mod checklist;
pub mod item;
pub mod trip;

// Re-export all public types for convenient access
pub use checklist::{
    GeneratedChecklist, GeneratedSection, PriorityCounts, SkippedReference, Statistics,
    TripSummary,
};
pub use item::{CandidateItem, CatalogKind, GeneratedItem, ItemFilter, Moment, Priority};
pub use trip::{Destinations, DurationBucket, TripContext};
