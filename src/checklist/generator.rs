//! Checklist generation pipeline
//!
//! Destinations → climate detection → catalog filtering (core, profile,
//! activity, climate) → climate merge → deduplication → timeline → statistics.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::merge::{
    deduplicate_across_sections, deduplicate_within_section, merge_climate_items_into_sections,
};
use super::stats::compute_stats;
use super::timeline::build_timeline;
use crate::catalog::data::normalize_key;
use crate::catalog::{FilterContext, filter_section};
use crate::climate::detector::detect_for_destinations;
use crate::climate::{
    ClimateCondition, ClimateDetection, DetectedClimate, Season, TemperatureBand, months_spanned,
};
use crate::config::EngineConfig;
use crate::models::{
    CatalogKind, GeneratedChecklist, GeneratedItem, GeneratedSection, SkippedReference,
    TripContext, TripSummary,
};
use crate::reference::ReferenceData;
use crate::{Result, TravelPrepError};

/// Generates checklists from shared reference data
#[derive(Debug, Clone)]
pub struct ChecklistGenerator<'a> {
    reference: &'a ReferenceData,
    settings: EngineConfig,
}

/// Conditions taken from the trip instead of detection, without repeats
fn preselected(conditions: &[ClimateCondition]) -> DetectedClimate {
    let mut seen = BTreeSet::new();
    let unique: Vec<ClimateCondition> = conditions
        .iter()
        .copied()
        .filter(|condition| seen.insert(*condition))
        .collect();

    let seasons: BTreeSet<Season> = unique
        .iter()
        .filter_map(|condition| match condition {
            ClimateCondition::Season(season) => Some(*season),
            ClimateCondition::Temperature(_) => None,
        })
        .collect();
    let temperatures: BTreeSet<TemperatureBand> = unique
        .iter()
        .filter_map(|condition| match condition {
            ClimateCondition::Temperature(band) => Some(*band),
            ClimateCondition::Season(_) => None,
        })
        .collect();

    DetectedClimate {
        seasons: ClimateDetection::Detected(seasons),
        temperatures: ClimateDetection::Detected(temperatures),
        months: Vec::new(),
        skipped: Vec::new(),
    }
}

impl<'a> ChecklistGenerator<'a> {
    #[must_use]
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self {
            reference,
            settings: EngineConfig::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: EngineConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Generate the checklist of a trip.
    ///
    /// Unknown destinations, profiles and activities are skipped and listed on
    /// the result. The only error is a return date before the departure date.
    #[tracing::instrument(name = "generate_checklist", skip(self, trip), fields(departure = %trip.departure))]
    pub fn generate(&self, trip: &TripContext) -> Result<GeneratedChecklist> {
        if let Some(return_date) = trip.return_date {
            if return_date < trip.departure {
                return Err(TravelPrepError::validation(format!(
                    "Return date {return_date} is before departure date {}",
                    trip.departure
                )));
            }
        }

        let catalogs = &self.reference.catalogs;
        let resolution = self.reference.climate.resolve_destinations(&trip.destinations);
        let mut skipped = resolution.skipped.clone();

        let months = months_spanned(trip.departure, trip.end_date());
        let climate = if trip.climate_conditions.is_empty() {
            let (seasons, temperatures) = detect_for_destinations(&resolution.resolved, &months);
            DetectedClimate {
                seasons,
                temperatures,
                months: months.clone(),
                skipped: Vec::new(),
            }
        } else {
            debug!("Using {} pre-selected climate conditions", trip.climate_conditions.len());
            preselected(&trip.climate_conditions)
        };
        let conditions = climate.conditions();

        let ctx = FilterContext::new(trip, &resolution.resolved);
        let mut sections: Vec<GeneratedSection> = catalogs
            .core
            .sections()
            .iter()
            .map(|section| filter_section(section, CatalogKind::Core, &ctx, trip.departure))
            .collect();

        if let Some(profile) = &trip.profile {
            match catalogs.profiles.section_for(profile) {
                Some(section) => sections.push(filter_section(
                    section,
                    CatalogKind::Profile,
                    &ctx,
                    trip.departure,
                )),
                None => skipped.push(SkippedReference::UnknownProfile(profile.clone())),
            }
        }

        let mut seen_activities = BTreeSet::new();
        for activity in &trip.activities {
            if !seen_activities.insert(normalize_key(activity)) {
                continue;
            }
            match catalogs.activities.section_for(activity) {
                Some(section) => sections.push(filter_section(
                    section,
                    CatalogKind::Activity,
                    &ctx,
                    trip.departure,
                )),
                None => skipped.push(SkippedReference::UnknownActivity(activity.clone())),
            }
        }

        let climate_items: Vec<GeneratedItem> = catalogs
            .climate_sections_for(&conditions)
            .into_iter()
            .flat_map(|section| {
                filter_section(section, CatalogKind::Climate, &ctx, trip.departure).items
            })
            .collect();

        let keywords = &self.reference.keywords;
        let sections = merge_climate_items_into_sections(
            sections,
            climate_items,
            keywords,
            self.settings.similarity_threshold,
        );
        let sections: Vec<GeneratedSection> = deduplicate_across_sections(sections, keywords)
            .into_iter()
            .map(|section| deduplicate_within_section(section, keywords))
            .filter(|section| !section.items.is_empty())
            .collect();

        let timeline = build_timeline(trip.departure, &sections);
        let statistics = compute_stats(&sections);

        for note in &skipped {
            warn!("{}", note);
        }
        info!(
            "Generated {} items in {} sections ({} climate conditions, {} skipped references)",
            statistics.total_items,
            statistics.total_sections,
            conditions.len(),
            skipped.len()
        );

        Ok(GeneratedChecklist {
            summary: TripSummary {
                destinations: trip.destinations.clone(),
                departure: trip.departure,
                return_date: trip.return_date,
                duration: ctx.duration,
                profile: trip.profile.clone(),
                activities: trip.activities.clone(),
                comfort: trip.comfort.clone(),
                trip_type: trip.trip_type.clone(),
                seasons: climate.seasons,
                temperatures: climate.temperatures,
                climate_conditions: conditions,
                months_sampled: months.len(),
            },
            sections,
            timeline,
            statistics,
            skipped,
        })
    }
}
