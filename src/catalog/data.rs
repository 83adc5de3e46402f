//! Catalog shapes and keyed lookup

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::climate::ClimateCondition;
use crate::models::{CandidateItem, CatalogKind};
use crate::{Result, TravelPrepError};

/// A section of a catalog.
///
/// Core sections are always considered. Profile, activity and climate
/// sections carry the `key` (profile tag, activity tag, climate condition)
/// that selects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    #[serde(default)]
    pub key: Option<String>,
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<CandidateItem>,
}

/// One read-only item source
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    kind: CatalogKind,
    sections: Vec<CatalogSection>,
}

impl Catalog {
    /// Build a catalog; keyed catalogs need a unique key on every section
    pub fn new(kind: CatalogKind, sections: Vec<CatalogSection>) -> Result<Self> {
        if kind != CatalogKind::Core {
            let mut keys = BTreeSet::new();
            for section in &sections {
                let key = section.key.as_deref().map(normalize_key).ok_or_else(|| {
                    TravelPrepError::reference_data(format!(
                        "{kind} catalog section '{}' has no key",
                        section.id
                    ))
                })?;
                if !keys.insert(key.clone()) {
                    return Err(TravelPrepError::reference_data(format!(
                        "{kind} catalog has duplicate key '{key}'"
                    )));
                }
            }
        }

        Ok(Self { kind, sections })
    }

    #[must_use]
    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    #[must_use]
    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    /// Section selected by a key, compared case-insensitively
    #[must_use]
    pub fn section_for(&self, key: &str) -> Option<&CatalogSection> {
        let key = normalize_key(key);
        self.sections
            .iter()
            .find(|section| section.key.as_deref().map(normalize_key) == Some(key.clone()))
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }
}

/// The four catalogs, loaded once and shared read-only
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogs {
    pub core: Catalog,
    pub profiles: Catalog,
    pub activities: Catalog,
    pub climate: Catalog,
}

impl Catalogs {
    /// Build the catalog set; climate section keys must be climate condition tags
    pub fn new(
        core: Vec<CatalogSection>,
        profiles: Vec<CatalogSection>,
        activities: Vec<CatalogSection>,
        climate: Vec<CatalogSection>,
    ) -> Result<Self> {
        let climate = Catalog::new(CatalogKind::Climate, climate)?;
        for section in climate.sections() {
            if let Some(key) = &section.key {
                key.parse::<ClimateCondition>().map_err(|_| {
                    TravelPrepError::reference_data(format!(
                        "climate catalog section '{}' has key '{key}' which is not a climate condition",
                        section.id
                    ))
                })?;
            }
        }

        Ok(Self {
            core: Catalog::new(CatalogKind::Core, core)?,
            profiles: Catalog::new(CatalogKind::Profile, profiles)?,
            activities: Catalog::new(CatalogKind::Activity, activities)?,
            climate,
        })
    }

    /// Climate sections selected by a set of conditions, in catalog order
    #[must_use]
    pub fn climate_sections_for(&self, conditions: &[ClimateCondition]) -> Vec<&CatalogSection> {
        self.climate
            .sections()
            .iter()
            .filter(|section| {
                section
                    .key
                    .as_deref()
                    .and_then(|key| key.parse::<ClimateCondition>().ok())
                    .is_some_and(|condition| conditions.contains(&condition))
            })
            .collect()
    }
}

/// Lower-case, trimmed tag
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
