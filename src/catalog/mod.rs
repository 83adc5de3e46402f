//! Catalog module
//!
//! Read-only item catalogs (core, profile, activity, climate) and the filter
//! engine deciding which of their items apply to a trip.

pub mod data;
pub mod filter;

pub use data::{Catalog, CatalogSection, Catalogs};
pub use filter::{FilterContext, filter_section, matches, normalize_age};
