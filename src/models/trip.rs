//! Trip context: the immutable input of one checklist generation

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::climate::ClimateCondition;

/// Where the traveler is going
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destinations {
    /// Explicit ISO 3166-1 alpha-2 country codes. An empty list is the
    /// multi-destination placeholder: destinations not decided yet.
    Countries(Vec<String>),
    /// Broad region code (e.g. "europe", "asie") used when no country is selected
    Region(String),
}

impl Default for Destinations {
    fn default() -> Self {
        Self::Countries(Vec::new())
    }
}

/// Coarse trip length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
    VeryLong,
}

impl DurationBucket {
    /// Bucket for an inclusive day count
    #[must_use]
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d <= 7 => DurationBucket::Short,
            d if d <= 21 => DurationBucket::Medium,
            d if d <= 90 => DurationBucket::Long,
            _ => DurationBucket::VeryLong,
        }
    }

    /// Nominal trip length in days, used when no return date is known
    #[must_use]
    pub fn nominal_days(self) -> u64 {
        match self {
            DurationBucket::Short => 7,
            DurationBucket::Medium => 14,
            DurationBucket::Long => 30,
            DurationBucket::VeryLong => 120,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DurationBucket::Short => "short",
            DurationBucket::Medium => "medium",
            DurationBucket::Long => "long",
            DurationBucket::VeryLong => "very-long",
        }
    }
}

/// Trip parameters collected by the questionnaire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripContext {
    #[serde(default)]
    pub destinations: Destinations,
    /// Departure date
    pub departure: NaiveDate,
    /// Return date, when known
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    /// Duration bucket, used when no return date is known
    #[serde(default)]
    pub duration: Option<DurationBucket>,
    #[serde(default)]
    pub activities: Vec<String>,
    /// Traveler profile tag (e.g. "famille", "solo")
    #[serde(default)]
    pub profile: Option<String>,
    /// Comfort tag (e.g. "routard", "standard", "confort")
    #[serde(default)]
    pub comfort: Option<String>,
    /// Trip type tag (e.g. "loisirs", "business")
    #[serde(default)]
    pub trip_type: Option<String>,
    /// Age brackets of travelling children (e.g. "0-2-ans")
    #[serde(default)]
    pub child_ages: Vec<String>,
    /// Pre-selected climate conditions; when present they replace auto-detection
    #[serde(default)]
    pub climate_conditions: Vec<ClimateCondition>,
}

impl TripContext {
    /// Minimal trip to a list of countries
    #[must_use]
    pub fn new(countries: &[&str], departure: NaiveDate) -> Self {
        Self {
            destinations: Destinations::Countries(
                countries.iter().map(|c| (*c).to_string()).collect(),
            ),
            departure,
            return_date: None,
            duration: None,
            activities: Vec::new(),
            profile: None,
            comfort: None,
            trip_type: None,
            child_ages: Vec::new(),
            climate_conditions: Vec::new(),
        }
    }

    /// Inclusive number of days between departure and return
    #[must_use]
    pub fn length_in_days(&self) -> Option<i64> {
        self.return_date
            .map(|ret| (ret - self.departure).num_days() + 1)
    }

    /// Duration bucket, derived from the dates when a return date is known
    #[must_use]
    pub fn duration_bucket(&self) -> Option<DurationBucket> {
        self.length_in_days()
            .map(DurationBucket::from_days)
            .or(self.duration)
    }

    /// Last day of the trip: the return date, or the nominal end derived from the
    /// duration bucket, or the departure date itself.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        if let Some(ret) = self.return_date {
            return ret;
        }
        self.duration
            .and_then(|bucket| {
                self.departure
                    .checked_add_days(Days::new(bucket.nominal_days().saturating_sub(1)))
            })
            .unwrap_or(self.departure)
    }
}
