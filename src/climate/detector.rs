//! Season/Temperature Auto-Detector
//!
//! Walks every calendar month a trip touches and unions the seasons and
//! temperature bands of each destination for that month.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use tracing::debug;

use super::resolver::{
    ClimateCondition, ClimateTable, ResolvedDestination, Season, TemperatureBand,
};
use crate::models::{SkippedReference, TripContext};

/// Detection outcome: either an acknowledged "unknown" or the detected set.
///
/// Unknown differs from an empty set: it means no destination could be
/// sampled at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClimateDetection<T: Ord> {
    Unknown,
    Detected(BTreeSet<T>),
}

impl<T: Ord> ClimateDetection<T> {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, ClimateDetection::Unknown)
    }

    /// Whether the detected set contains `value`; always false when unknown
    pub fn contains(&self, value: &T) -> bool {
        match self {
            ClimateDetection::Unknown => false,
            ClimateDetection::Detected(set) => set.contains(value),
        }
    }

    /// Detected values, empty when unknown
    pub fn values(&self) -> impl Iterator<Item = &T> {
        let set = match self {
            ClimateDetection::Unknown => None,
            ClimateDetection::Detected(set) => Some(set),
        };
        set.into_iter().flatten()
    }
}

impl<T: Ord + Serialize> Serialize for ClimateDetection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClimateDetection::Unknown => serializer.serialize_str("unknown"),
            ClimateDetection::Detected(set) => set.serialize(serializer),
        }
    }
}

/// A (year, month) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

/// Every distinct calendar month from `start` to `end`, both inclusive.
/// An `end` before `start` yields only the start month.
#[must_use]
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> Vec<YearMonth> {
    let first = YearMonth::of(start);
    let last = YearMonth::of(end).max(first);

    let mut months = vec![first];
    let mut current = first;
    while current < last {
        current = current.next();
        months.push(current);
    }
    months
}

/// Seasons and temperature bands detected for a trip
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedClimate {
    pub seasons: ClimateDetection<Season>,
    pub temperatures: ClimateDetection<TemperatureBand>,
    pub months: Vec<YearMonth>,
    pub skipped: Vec<SkippedReference>,
}

impl DetectedClimate {
    /// Climate conditions implied by the detection, seasons first
    #[must_use]
    pub fn conditions(&self) -> Vec<ClimateCondition> {
        self.seasons
            .values()
            .map(|season| ClimateCondition::Season(*season))
            .chain(
                self.temperatures
                    .values()
                    .map(|band| ClimateCondition::Temperature(*band)),
            )
            .collect()
    }
}

/// Union of seasons and bands over every (month, destination) sample
#[must_use]
pub fn detect_for_destinations(
    destinations: &[ResolvedDestination<'_>],
    months: &[YearMonth],
) -> (ClimateDetection<Season>, ClimateDetection<TemperatureBand>) {
    if destinations.is_empty() {
        return (ClimateDetection::Unknown, ClimateDetection::Unknown);
    }

    let mut seasons = BTreeSet::new();
    let mut temperatures = BTreeSet::new();

    for year_month in months {
        for destination in destinations {
            if let Some(climate) = destination.profile.month(year_month.month) {
                debug!(
                    "{} {}-{:02}: {:.1}°C, seasons {:?}, bands {:?}",
                    destination.code,
                    year_month.year,
                    year_month.month,
                    climate.average_temperature,
                    climate.seasons,
                    climate.temperature_bands
                );
                seasons.extend(climate.seasons);
                temperatures.extend(climate.temperature_bands);
            }
        }
    }

    (
        ClimateDetection::Detected(seasons),
        ClimateDetection::Detected(temperatures),
    )
}

/// Detects trip-level climate from a climate table
pub struct ClimateDetector<'a> {
    table: &'a ClimateTable,
}

impl<'a> ClimateDetector<'a> {
    #[must_use]
    pub fn new(table: &'a ClimateTable) -> Self {
        Self { table }
    }

    /// Resolve the trip's destinations and sample every month it spans
    #[must_use]
    pub fn detect(&self, trip: &TripContext) -> DetectedClimate {
        let resolution = self.table.resolve_destinations(&trip.destinations);
        let months = months_spanned(trip.departure, trip.end_date());
        let (seasons, temperatures) = detect_for_destinations(&resolution.resolved, &months);

        DetectedClimate {
            seasons,
            temperatures,
            months,
            skipped: resolution.skipped,
        }
    }

    #[must_use]
    pub fn auto_detect_seasons(&self, trip: &TripContext) -> ClimateDetection<Season> {
        self.detect(trip).seasons
    }

    #[must_use]
    pub fn auto_detect_temperatures(&self, trip: &TripContext) -> ClimateDetection<TemperatureBand> {
        self.detect(trip).temperatures
    }
}
