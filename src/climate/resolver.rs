//! Climate Resolver
//!
//! Looks up per-country (or per-region) climate profiles and classifies a
//! calendar month of a profile into seasons and temperature bands.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Destinations, SkippedReference};
use crate::{Result, TravelPrepError};

/// Hemisphere of a country; `Both` marks equator-straddling countries whose
/// season data is intentionally blended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
    Both,
}

/// Local season
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Winter,
    Spring,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Summer, Season::Winter, Season::Spring, Season::Autumn];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Autumn => "autumn",
        }
    }
}

/// Temperature band of a monthly average, ordered from coldest to hottest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureBand {
    VeryCold,
    Cold,
    Temperate,
    Hot,
    VeryHot,
    ExtremeHeat,
}

impl TemperatureBand {
    pub const ALL: [TemperatureBand; 6] = [
        TemperatureBand::VeryCold,
        TemperatureBand::Cold,
        TemperatureBand::Temperate,
        TemperatureBand::Hot,
        TemperatureBand::VeryHot,
        TemperatureBand::ExtremeHeat,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TemperatureBand::VeryCold => "very-cold",
            TemperatureBand::Cold => "cold",
            TemperatureBand::Temperate => "temperate",
            TemperatureBand::Hot => "hot",
            TemperatureBand::VeryHot => "very-hot",
            TemperatureBand::ExtremeHeat => "extreme-heat",
        }
    }
}

/// A climate condition selecting items from the climate catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClimateCondition {
    Season(Season),
    Temperature(TemperatureBand),
}

impl ClimateCondition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClimateCondition::Season(season) => season.as_str(),
            ClimateCondition::Temperature(band) => band.as_str(),
        }
    }
}

impl fmt::Display for ClimateCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClimateCondition {
    type Err = TravelPrepError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_lowercase();
        if let Some(season) = Season::ALL.into_iter().find(|season| season.as_str() == tag) {
            return Ok(ClimateCondition::Season(season));
        }
        TemperatureBand::ALL
            .into_iter()
            .find(|band| band.as_str() == tag)
            .map(ClimateCondition::Temperature)
            .ok_or_else(|| TravelPrepError::validation(format!("Unknown climate condition '{s}'")))
    }
}

impl TryFrom<String> for ClimateCondition {
    type Error = TravelPrepError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClimateCondition> for String {
    fn from(value: ClimateCondition) -> Self {
        value.as_str().to_string()
    }
}

/// Temperature bands of a monthly average temperature (°C).
///
/// Bands overlap on purpose around 15-25°C (temperate and hot) and 28-33°C
/// (hot and very hot) so filters written against either neighbour still match
/// borderline climates. Below 0°C is both very cold and cold.
#[must_use]
pub fn temperature_bands_for(celsius: f64) -> BTreeSet<TemperatureBand> {
    let mut bands = BTreeSet::new();

    if celsius.is_nan() {
        // Missing data: treat as a neutral climate
        bands.insert(TemperatureBand::Temperate);
        return bands;
    }

    let base = match celsius {
        t if t < 0.0 => {
            bands.insert(TemperatureBand::Cold);
            TemperatureBand::VeryCold
        }
        t if t < 10.0 => TemperatureBand::Cold,
        t if t < 20.0 => TemperatureBand::Temperate,
        t if t < 30.0 => TemperatureBand::Hot,
        t if t < 38.0 => TemperatureBand::VeryHot,
        _ => TemperatureBand::ExtremeHeat,
    };
    bands.insert(base);

    if (15.0..25.0).contains(&celsius) {
        bands.insert(TemperatureBand::Temperate);
        bands.insert(TemperatureBand::Hot);
    }
    if (28.0..33.0).contains(&celsius) {
        bands.insert(TemperatureBand::Hot);
        bands.insert(TemperatureBand::VeryHot);
    }

    bands
}

/// Months (1-12) counted as each local season. Sets are pairwise disjoint and
/// may be empty (no meaningful season distinction).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonMonths {
    pub summer: BTreeSet<u32>,
    pub winter: BTreeSet<u32>,
    pub spring: BTreeSet<u32>,
    pub autumn: BTreeSet<u32>,
}

impl SeasonMonths {
    fn months(&self, season: Season) -> &BTreeSet<u32> {
        match season {
            Season::Summer => &self.summer,
            Season::Winter => &self.winter,
            Season::Spring => &self.spring,
            Season::Autumn => &self.autumn,
        }
    }

    /// Check month ranges and pairwise disjointness
    pub fn validate(&self, owner: &str) -> Result<()> {
        let mut seen: HashMap<u32, Season> = HashMap::new();
        for season in Season::ALL {
            for &month in self.months(season) {
                if !(1..=12).contains(&month) {
                    return Err(TravelPrepError::reference_data(format!(
                        "{owner}: month {month} in {} is outside 1-12",
                        season.as_str()
                    )));
                }
                if let Some(other) = seen.insert(month, season) {
                    return Err(TravelPrepError::reference_data(format!(
                        "{owner}: month {month} is both {} and {}",
                        other.as_str(),
                        season.as_str()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Seasons a month belongs to; empty when no set contains it
#[must_use]
pub fn seasons_for(month: u32, seasons: &SeasonMonths) -> BTreeSet<Season> {
    Season::ALL
        .into_iter()
        .filter(|season| seasons.months(*season).contains(&month))
        .collect()
}

/// Climate shape shared by countries and regional fallbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProfile {
    pub hemisphere: Hemisphere,
    #[serde(default)]
    pub climate_zones: BTreeSet<String>,
    /// Average temperature per month, January first
    pub monthly_temperatures: [f64; 12],
    #[serde(default)]
    pub seasons: SeasonMonths,
}

/// Classified climate of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyClimate {
    pub month: u32,
    pub average_temperature: f64,
    pub temperature_bands: BTreeSet<TemperatureBand>,
    pub seasons: BTreeSet<Season>,
    pub hemisphere: Hemisphere,
    pub climate_zones: BTreeSet<String>,
}

impl ClimateProfile {
    /// Average temperature of a month (1-12)
    #[must_use]
    pub fn average_temperature(&self, month: u32) -> Option<f64> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.monthly_temperatures.get(index).copied()
    }

    /// Seasons and temperature bands of a month; `None` for an invalid month
    #[must_use]
    pub fn month(&self, month: u32) -> Option<MonthlyClimate> {
        let average_temperature = self.average_temperature(month)?;
        Some(MonthlyClimate {
            month,
            average_temperature,
            temperature_bands: temperature_bands_for(average_temperature),
            seasons: seasons_for(month, &self.seasons),
            hemisphere: self.hemisphere,
            climate_zones: self.climate_zones.clone(),
        })
    }
}

/// Climate of a single country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryClimate {
    /// ISO 3166-1 alpha-2 code
    pub code: String,
    pub name: String,
    /// Broad destination zones ("europe", "schengen", "hors-europe-emergent", ...)
    #[serde(default)]
    pub destination_zones: BTreeSet<String>,
    #[serde(flatten)]
    pub profile: ClimateProfile,
}

/// Averaged climate of a broad region, used when no country is selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalClimate {
    pub code: String,
    pub name: String,
    #[serde(flatten)]
    pub profile: ClimateProfile,
}

/// A destination with climate data
#[derive(Debug, Clone)]
pub struct ResolvedDestination<'a> {
    /// Country code (upper case) or region code (lower case)
    pub code: String,
    pub name: &'a str,
    pub profile: &'a ClimateProfile,
    /// Destination and climate zone tags, lower case
    pub zones: BTreeSet<String>,
}

impl ResolvedDestination<'_> {
    /// Whether a filter value names this destination, by exact code or zone tag
    #[must_use]
    pub fn matches_zone(&self, value: &str) -> bool {
        let value = value.trim();
        value.eq_ignore_ascii_case(&self.code) || self.zones.contains(&value.to_lowercase())
    }
}

/// Outcome of resolving a trip's destinations
#[derive(Debug, Clone, Default)]
pub struct DestinationResolution<'a> {
    pub resolved: Vec<ResolvedDestination<'a>>,
    pub skipped: Vec<SkippedReference>,
}

/// Immutable lookup table of country and regional climates
#[derive(Debug, Clone, Default)]
pub struct ClimateTable {
    countries: HashMap<String, CountryClimate>,
    regions: HashMap<String, RegionalClimate>,
}

impl ClimateTable {
    /// Build a table, validating season sets and code uniqueness
    pub fn new(countries: Vec<CountryClimate>, regions: Vec<RegionalClimate>) -> Result<Self> {
        let mut table = Self::default();

        for country in countries {
            country.profile.seasons.validate(&country.code)?;
            let code = country.code.trim().to_uppercase();
            if table.countries.insert(code.clone(), country).is_some() {
                return Err(TravelPrepError::reference_data(format!(
                    "Duplicate country code {code}"
                )));
            }
        }

        for region in regions {
            region.profile.seasons.validate(&region.code)?;
            let code = region.code.trim().to_lowercase();
            if table.regions.insert(code.clone(), region).is_some() {
                return Err(TravelPrepError::reference_data(format!(
                    "Duplicate region code {code}"
                )));
            }
        }

        Ok(table)
    }

    /// Country climate by code; `None` when the code is unknown
    #[must_use]
    pub fn resolve_climate(&self, country_code: &str) -> Option<&CountryClimate> {
        self.countries.get(&country_code.trim().to_uppercase())
    }

    /// Regional climate by code; `None` when the code is unknown
    #[must_use]
    pub fn resolve_regional_climate(&self, region_code: &str) -> Option<&RegionalClimate> {
        self.regions.get(&region_code.trim().to_lowercase())
    }

    #[must_use]
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Resolve every destination of a trip. Unknown codes are skipped and
    /// recorded, never fatal. Repeated codes resolve once.
    #[must_use]
    pub fn resolve_destinations(&self, destinations: &Destinations) -> DestinationResolution<'_> {
        let mut resolution = DestinationResolution::default();

        match destinations {
            Destinations::Countries(codes) => {
                let mut seen = BTreeSet::new();
                for code in codes {
                    let normalized = code.trim().to_uppercase();
                    if !seen.insert(normalized.clone()) {
                        continue;
                    }
                    match self.resolve_climate(&normalized) {
                        Some(country) => {
                            let zones = country
                                .destination_zones
                                .iter()
                                .chain(&country.profile.climate_zones)
                                .map(|zone| zone.to_lowercase())
                                .collect();
                            resolution.resolved.push(ResolvedDestination {
                                code: normalized,
                                name: &country.name,
                                profile: &country.profile,
                                zones,
                            });
                        }
                        None => {
                            debug!("No climate data for destination {}", normalized);
                            resolution
                                .skipped
                                .push(SkippedReference::UnknownDestination(code.clone()));
                        }
                    }
                }
            }
            Destinations::Region(code) => match self.resolve_regional_climate(code) {
                Some(region) => {
                    let code = region.code.to_lowercase();
                    let zones = std::iter::once(code.clone())
                        .chain(region.profile.climate_zones.iter().map(|z| z.to_lowercase()))
                        .collect();
                    resolution.resolved.push(ResolvedDestination {
                        code,
                        name: &region.name,
                        profile: &region.profile,
                        zones,
                    });
                }
                None => {
                    debug!("No climate data for region {}", code);
                    resolution
                        .skipped
                        .push(SkippedReference::UnknownRegion(code.clone()));
                }
            },
        }

        resolution
    }
}
