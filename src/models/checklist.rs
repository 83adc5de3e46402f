//! Generated checklist: the read-only result handed to renderers

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::item::{CatalogKind, GeneratedItem, Priority};
use super::trip::{Destinations, DurationBucket};
use crate::checklist::timeline::Timeline;
use crate::climate::{ClimateCondition, ClimateDetection, Season, TemperatureBand};

/// A named, ordered bucket of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSection {
    pub id: String,
    pub title: String,
    /// Catalog that created the section
    pub provenance: CatalogKind,
    pub items: Vec<GeneratedItem>,
}

impl GeneratedSection {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, provenance: CatalogKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            provenance,
            items: Vec::new(),
        }
    }
}

/// Item counts per priority tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn record(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

/// Summary figures of a generated checklist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_items: usize,
    pub total_sections: usize,
    pub by_priority: PriorityCounts,
    /// Items carrying a resolved deadline
    pub dated_items: usize,
}

/// A cross-reference the engine could not resolve and skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "kebab-case")]
pub enum SkippedReference {
    UnknownDestination(String),
    UnknownRegion(String),
    UnknownProfile(String),
    UnknownActivity(String),
}

impl fmt::Display for SkippedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkippedReference::UnknownDestination(code) => {
                write!(f, "Destination '{code}' has no climate data and was skipped")
            }
            SkippedReference::UnknownRegion(code) => {
                write!(f, "Region '{code}' has no climate data and was skipped")
            }
            SkippedReference::UnknownProfile(key) => {
                write!(f, "No checklist exists for traveler profile '{key}'")
            }
            SkippedReference::UnknownActivity(key) => {
                write!(f, "No checklist exists for activity '{key}'")
            }
        }
    }
}

/// Trip metadata echoed on the checklist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub destinations: Destinations,
    pub departure: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub duration: Option<DurationBucket>,
    pub profile: Option<String>,
    pub activities: Vec<String>,
    pub comfort: Option<String>,
    pub trip_type: Option<String>,
    pub seasons: ClimateDetection<Season>,
    pub temperatures: ClimateDetection<TemperatureBand>,
    /// Conditions that drove the climate catalog
    pub climate_conditions: Vec<ClimateCondition>,
    /// Distinct calendar months sampled during detection
    pub months_sampled: usize,
}

/// Final output of one generation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedChecklist {
    pub summary: TripSummary,
    pub sections: Vec<GeneratedSection>,
    pub timeline: Timeline,
    pub statistics: Statistics,
    pub skipped: Vec<SkippedReference>,
}

impl GeneratedChecklist {
    /// Iterate over every item of every section
    pub fn items(&self) -> impl Iterator<Item = (&GeneratedSection, &GeneratedItem)> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter().map(move |item| (section, item)))
    }

    /// Section by id
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&GeneratedSection> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Human-readable notes for skipped references
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.skipped.iter().map(ToString::to_string).collect()
    }
}
