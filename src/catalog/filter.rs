//! Catalog Filter Engine
//!
//! Every declared filter dimension must pass (AND across dimensions); within a
//! dimension one matching trip value is enough (OR within the dimension). An
//! absent or empty dimension always passes.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use super::data::{CatalogSection, normalize_key};
use crate::climate::ResolvedDestination;
use crate::models::{
    CatalogKind, DurationBucket, GeneratedItem, GeneratedSection, ItemFilter, TripContext,
};

/// Unit suffixes stripped from age-bracket labels before comparison
const AGE_SUFFIXES: [&str; 6] = ["-ans", " ans", "ans", "-years", " years", "years"];

/// Trip values the filters are evaluated against
#[derive(Debug, Clone)]
pub struct FilterContext<'a> {
    pub trip: &'a TripContext,
    /// Destinations with climate data; unresolved codes are absent on purpose
    pub destinations: &'a [ResolvedDestination<'a>],
    pub duration: Option<DurationBucket>,
}

impl<'a> FilterContext<'a> {
    #[must_use]
    pub fn new(trip: &'a TripContext, destinations: &'a [ResolvedDestination<'a>]) -> Self {
        Self {
            trip,
            destinations,
            duration: trip.duration_bucket(),
        }
    }
}

/// Age bracket without unit suffix ("3-5-ans" and "3-5 years" both become "3-5")
#[must_use]
pub fn normalize_age(label: &str) -> String {
    let label = normalize_key(label);
    AGE_SUFFIXES
        .iter()
        .find_map(|suffix| label.strip_suffix(suffix))
        .map_or(label.clone(), |stripped| stripped.trim().to_string())
}

/// Active constraint of a dimension: `None` when absent or empty
fn constraint(allowed: Option<&BTreeSet<String>>) -> Option<&BTreeSet<String>> {
    allowed.filter(|set| !set.is_empty())
}

fn tag_allowed(allowed: Option<&BTreeSet<String>>, value: Option<&str>) -> bool {
    match constraint(allowed) {
        None => true,
        Some(set) => value.is_some_and(|value| {
            let value = normalize_key(value);
            set.iter().any(|allowed| normalize_key(allowed) == value)
        }),
    }
}

fn any_tag_allowed(allowed: Option<&BTreeSet<String>>, values: &[String]) -> bool {
    match constraint(allowed) {
        None => true,
        Some(_) => values.iter().any(|value| tag_allowed(allowed, Some(value))),
    }
}

fn ages_allowed(allowed: Option<&BTreeSet<String>>, ages: &[String]) -> bool {
    match constraint(allowed) {
        None => true,
        Some(set) => {
            let allowed: BTreeSet<String> = set.iter().map(|age| normalize_age(age)).collect();
            ages.iter().any(|age| allowed.contains(&normalize_age(age)))
        }
    }
}

fn destinations_allowed(
    allowed: Option<&BTreeSet<String>>,
    destinations: &[ResolvedDestination<'_>],
) -> bool {
    match constraint(allowed) {
        None => true,
        Some(set) => destinations
            .iter()
            .any(|destination| set.iter().any(|value| destination.matches_zone(value))),
    }
}

fn durations_allowed(
    allowed: Option<&BTreeSet<DurationBucket>>,
    duration: Option<DurationBucket>,
) -> bool {
    match allowed.filter(|set| !set.is_empty()) {
        None => true,
        Some(set) => duration.is_some_and(|bucket| set.contains(&bucket)),
    }
}

/// Whether an item's filter accepts the trip
#[must_use]
pub fn matches(filter: &ItemFilter, ctx: &FilterContext<'_>) -> bool {
    let trip = ctx.trip;

    tag_allowed(filter.profiles.as_ref(), trip.profile.as_deref())
        && any_tag_allowed(filter.activities.as_ref(), &trip.activities)
        && tag_allowed(filter.comfort.as_ref(), trip.comfort.as_deref())
        && ages_allowed(filter.ages.as_ref(), &trip.child_ages)
        && destinations_allowed(filter.destinations.as_ref(), ctx.destinations)
        && durations_allowed(filter.durations.as_ref(), ctx.duration)
        && tag_allowed(filter.trip_types.as_ref(), trip.trip_type.as_deref())
}

/// Items of a catalog section accepted by the trip, copied into a generated section
#[must_use]
pub fn filter_section(
    section: &CatalogSection,
    kind: CatalogKind,
    ctx: &FilterContext<'_>,
    departure: NaiveDate,
) -> GeneratedSection {
    let mut generated = GeneratedSection::new(&section.id, &section.title, kind);

    for item in &section.items {
        if matches(&item.filter, ctx) {
            generated
                .items
                .push(GeneratedItem::from_candidate(item, kind, departure, ctx.duration));
        } else {
            debug!("Filtered out '{}' from {} section {}", item.label, kind, section.id);
        }
    }

    generated
}
