//! Reference data: climate tables, item catalogs and keyword tables
//!
//! Loaded once, validated, then shared read-only by every generation call.
//! The default set is embedded in the binary; a directory with the same file
//! layout can replace it.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::catalog::{CatalogSection, Catalogs};
use crate::checklist::merge::{KeywordConfig, KeywordTables};
use crate::climate::{ClimateTable, CountryClimate, RegionalClimate};
use crate::config::DataConfig;
use crate::{Result, TravelPrepError};

const COUNTRIES_FILE: &str = "climate/countries.json";
const REGIONS_FILE: &str = "climate/regions.json";
const CORE_FILE: &str = "catalogs/core.json";
const PROFILES_FILE: &str = "catalogs/profiles.json";
const ACTIVITIES_FILE: &str = "catalogs/activities.json";
const CLIMATE_CATALOG_FILE: &str = "catalogs/climate.json";
const KEYWORDS_FILE: &str = "keywords.json";

/// Raw text of every reference file
struct Sources<'a> {
    countries: &'a str,
    regions: &'a str,
    core: &'a str,
    profiles: &'a str,
    activities: &'a str,
    climate_catalog: &'a str,
    keywords: &'a str,
}

const EMBEDDED: Sources<'static> = Sources {
    countries: include_str!("../data/climate/countries.json"),
    regions: include_str!("../data/climate/regions.json"),
    core: include_str!("../data/catalogs/core.json"),
    profiles: include_str!("../data/catalogs/profiles.json"),
    activities: include_str!("../data/catalogs/activities.json"),
    climate_catalog: include_str!("../data/catalogs/climate.json"),
    keywords: include_str!("../data/keywords.json"),
};

fn parse<T: DeserializeOwned>(name: &str, text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| TravelPrepError::reference_data(format!("Failed to parse {name}: {e}")))
}

/// Immutable reference data shared by the generator
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub climate: ClimateTable,
    pub catalogs: Catalogs,
    pub keywords: KeywordTables,
}

impl ReferenceData {
    /// Reference data compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_sources(&EMBEDDED)
    }

    /// Reference data read from a directory laid out like `data/`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let read = |name: &str| -> Result<String> {
            std::fs::read_to_string(dir.join(name)).map_err(|e| {
                TravelPrepError::reference_data(format!(
                    "Failed to read {}: {e}",
                    dir.join(name).display()
                ))
            })
        };

        let countries = read(COUNTRIES_FILE)?;
        let regions = read(REGIONS_FILE)?;
        let core = read(CORE_FILE)?;
        let profiles = read(PROFILES_FILE)?;
        let activities = read(ACTIVITIES_FILE)?;
        let climate_catalog = read(CLIMATE_CATALOG_FILE)?;
        let keywords = read(KEYWORDS_FILE)?;

        Self::from_sources(&Sources {
            countries: &countries,
            regions: &regions,
            core: &core,
            profiles: &profiles,
            activities: &activities,
            climate_catalog: &climate_catalog,
            keywords: &keywords,
        })
    }

    /// Directory data when configured, embedded data otherwise
    pub fn load(config: &DataConfig) -> Result<Self> {
        match &config.directory {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    fn from_sources(sources: &Sources<'_>) -> Result<Self> {
        let countries: Vec<CountryClimate> = parse(COUNTRIES_FILE, sources.countries)?;
        let regions: Vec<RegionalClimate> = parse(REGIONS_FILE, sources.regions)?;
        let climate = ClimateTable::new(countries, regions)?;

        let catalogs = Catalogs::new(
            parse::<Vec<CatalogSection>>(CORE_FILE, sources.core)?,
            parse::<Vec<CatalogSection>>(PROFILES_FILE, sources.profiles)?,
            parse::<Vec<CatalogSection>>(ACTIVITIES_FILE, sources.activities)?,
            parse::<Vec<CatalogSection>>(CLIMATE_CATALOG_FILE, sources.climate_catalog)?,
        )?;

        let keywords = KeywordTables::new(parse::<KeywordConfig>(KEYWORDS_FILE, sources.keywords)?)?;

        info!(
            "Loaded reference data: {} countries, {} regions, {} core / {} profile / {} activity / {} climate items",
            climate.country_count(),
            climate.region_count(),
            catalogs.core.item_count(),
            catalogs.profiles.item_count(),
            catalogs.activities.item_count(),
            catalogs.climate.item_count()
        );

        Ok(Self {
            climate,
            catalogs,
            keywords,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_embedded_data_loads() {
        let data = ReferenceData::embedded().unwrap();
        assert!(data.climate.country_count() >= 20);
        assert!(data.climate.resolve_climate("FR").is_some());
        assert!(data.climate.resolve_regional_climate("europe").is_some());
        assert!(data.catalogs.core.item_count() > 0);
        assert!(data.catalogs.profiles.section_for("famille").is_some());
        assert!(data.catalogs.activities.section_for("plage").is_some());
    }

    fn write_embedded_to(dir: &Path) {
        fs::create_dir_all(dir.join("climate")).unwrap();
        fs::create_dir_all(dir.join("catalogs")).unwrap();
        for (name, text) in [
            (COUNTRIES_FILE, EMBEDDED.countries),
            (REGIONS_FILE, EMBEDDED.regions),
            (CORE_FILE, EMBEDDED.core),
            (PROFILES_FILE, EMBEDDED.profiles),
            (ACTIVITIES_FILE, EMBEDDED.activities),
            (CLIMATE_CATALOG_FILE, EMBEDDED.climate_catalog),
            (KEYWORDS_FILE, EMBEDDED.keywords),
        ] {
            fs::write(dir.join(name), text).unwrap();
        }
    }

    #[test]
    fn test_directory_data_matches_embedded() {
        let dir = tempfile::tempdir().unwrap();
        write_embedded_to(dir.path());

        let from_dir = ReferenceData::from_dir(dir.path()).unwrap();
        let embedded = ReferenceData::embedded().unwrap();
        assert_eq!(from_dir.climate.country_count(), embedded.climate.country_count());
        assert_eq!(from_dir.catalogs, embedded.catalogs);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_embedded_to(dir.path());
        fs::remove_file(dir.path().join(KEYWORDS_FILE)).unwrap();

        let err = ReferenceData::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TravelPrepError::ReferenceData { .. }));
        assert!(err.to_string().contains("keywords.json"));
    }

    #[test]
    fn test_overlapping_seasons_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_embedded_to(dir.path());
        fs::write(
            dir.path().join(COUNTRIES_FILE),
            r#"[{
                "code": "XX", "name": "Nowhere", "hemisphere": "north",
                "monthly_temperatures": [0,0,0,0,0,0,0,0,0,0,0,0],
                "seasons": {"summer": [6, 7, 8], "winter": [12, 1, 2], "spring": [3, 4, 5], "autumn": [8, 9, 10, 11]}
            }]"#,
        )
        .unwrap();

        assert!(ReferenceData::from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_load_uses_embedded_without_directory() {
        let data = ReferenceData::load(&DataConfig::default()).unwrap();
        assert!(data.climate.resolve_climate("JP").is_some());
    }
}
