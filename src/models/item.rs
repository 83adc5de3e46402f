//! Catalog items and their generated copies

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::trip::DurationBucket;
use crate::checklist::timeline;

/// Priority tier of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Legacy star rating: 3 stars is high, 2 is medium, anything else low
    #[must_use]
    pub fn from_stars(stars: i64) -> Self {
        match stars {
            3 => Priority::High,
            2 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPriority {
            Stars(i64),
            Tier(String),
        }

        match RawPriority::deserialize(deserializer)? {
            RawPriority::Stars(stars) => Ok(Priority::from_stars(stars)),
            RawPriority::Tier(tier) => match tier.trim().to_lowercase().as_str() {
                "high" => Ok(Priority::High),
                "medium" => Ok(Priority::Medium),
                "low" => Ok(Priority::Low),
                other => Err(serde::de::Error::custom(format!(
                    "unknown priority tier '{other}'"
                ))),
            },
        }
    }
}

/// When during the trip an item matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moment {
    Arrival,
    Daily,
    After,
}

/// The four independent item sources, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Core,
    Profile,
    Activity,
    Climate,
}

impl CatalogKind {
    /// Fixed processing order; earlier catalogs win deduplication
    pub const ORDER: [CatalogKind; 4] = [
        CatalogKind::Core,
        CatalogKind::Profile,
        CatalogKind::Activity,
        CatalogKind::Climate,
    ];

    #[must_use]
    pub fn rank(self) -> usize {
        match self {
            CatalogKind::Core => 0,
            CatalogKind::Profile => 1,
            CatalogKind::Activity => 2,
            CatalogKind::Climate => 3,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Core => write!(f, "core"),
            CatalogKind::Profile => write!(f, "profile"),
            CatalogKind::Activity => write!(f, "activity"),
            CatalogKind::Climate => write!(f, "climate"),
        }
    }
}

/// Declarative inclusion predicate of a catalog item.
///
/// An absent (or empty) dimension places no constraint on the trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort: Option<BTreeSet<String>>,
    /// Child age brackets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ages: Option<BTreeSet<String>>,
    /// Country codes or destination/climate zone tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destinations: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<BTreeSet<DurationBucket>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_types: Option<BTreeSet<String>>,
}

/// An item as authored in a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub label: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Relative lead-time tag ("J-90", "J+3")
    #[serde(default)]
    pub lead_time: Option<String>,
    #[serde(default)]
    pub moment: Option<Moment>,
    /// Quantity text per duration bucket
    #[serde(default)]
    pub quantity: Option<BTreeMap<DurationBucket, String>>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub filter: ItemFilter,
}

impl CandidateItem {
    /// Bare item with a label only
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            priority: None,
            lead_time: None,
            moment: None,
            quantity: None,
            advice: None,
            filter: ItemFilter::default(),
        }
    }
}

/// A catalog item copied into a generated section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub label: String,
    pub priority: Priority,
    /// Lead-time tag exactly as authored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
    /// Absolute deadline resolved from the lead-time tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moment: Option<Moment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    /// Catalog the item came from
    pub provenance: CatalogKind,
}

impl GeneratedItem {
    /// Copy a candidate for a trip departing on `departure`
    #[must_use]
    pub fn from_candidate(
        item: &CandidateItem,
        provenance: CatalogKind,
        departure: NaiveDate,
        bucket: Option<DurationBucket>,
    ) -> Self {
        let deadline = item
            .lead_time
            .as_deref()
            .and_then(|tag| timeline::resolve_deadline(departure, tag));
        let quantity = match (&item.quantity, bucket) {
            (Some(rules), Some(bucket)) => rules.get(&bucket).cloned(),
            _ => None,
        };

        Self {
            label: item.label.clone(),
            priority: item.priority.unwrap_or_default(),
            lead_time: item.lead_time.clone(),
            deadline,
            moment: item.moment,
            quantity,
            advice: item.advice.clone(),
            provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"high\"", Priority::High)]
    #[case("\"Medium\"", Priority::Medium)]
    #[case("\"low\"", Priority::Low)]
    #[case("3", Priority::High)]
    #[case("2", Priority::Medium)]
    #[case("1", Priority::Low)]
    #[case("5", Priority::Low)]
    fn test_priority_deserialization(#[case] raw: &str, #[case] expected: Priority) {
        let priority: Priority = serde_json::from_str(raw).unwrap();
        assert_eq!(priority, expected);
    }

    #[test]
    fn test_unknown_priority_tier_is_rejected() {
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_candidate_defaults() {
        let item: CandidateItem = serde_json::from_str(r#"{"label": "Passeport"}"#).unwrap();
        assert_eq!(item, CandidateItem::new("Passeport"));
        assert_eq!(item.filter, ItemFilter::default());
    }

    #[test]
    fn test_generated_item_resolves_deadline_and_quantity() {
        let mut item = CandidateItem::new("T-shirts");
        item.lead_time = Some("J-7".to_string());
        item.quantity = Some(BTreeMap::from([
            (DurationBucket::Short, "4".to_string()),
            (DurationBucket::Long, "10".to_string()),
        ]));
        let departure = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();

        let generated = GeneratedItem::from_candidate(
            &item,
            CatalogKind::Core,
            departure,
            Some(DurationBucket::Short),
        );
        assert_eq!(generated.priority, Priority::Low);
        assert_eq!(generated.deadline, NaiveDate::from_ymd_opt(2025, 7, 8));
        assert_eq!(generated.quantity.as_deref(), Some("4"));
        assert_eq!(generated.lead_time.as_deref(), Some("J-7"));

        let unbucketed = GeneratedItem::from_candidate(&item, CatalogKind::Core, departure, None);
        assert_eq!(unbucketed.quantity, None);
    }

    #[test]
    fn test_catalog_order_matches_rank() {
        for (index, kind) in CatalogKind::ORDER.iter().enumerate() {
            assert_eq!(kind.rank(), index);
        }
    }
}
