//! Flat export of a generated checklist
//!
//! One row per item. The lead-time tag is carried exactly as authored next to
//! the resolved deadline, so an import can recompute deadlines for a new
//! departure date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::models::{CatalogKind, GeneratedChecklist, Moment, Priority};

/// One exported item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub section_id: String,
    pub section_title: String,
    pub label: String,
    pub priority: Priority,
    #[serde(default)]
    pub lead_time: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub moment: Option<Moment>,
    #[serde(default)]
    pub quantity: Option<String>,
    pub provenance: CatalogKind,
}

/// Flatten a checklist in section and item order
#[must_use]
pub fn rows(checklist: &GeneratedChecklist) -> Vec<ExportRow> {
    checklist
        .items()
        .map(|(section, item)| ExportRow {
            section_id: section.id.clone(),
            section_title: section.title.clone(),
            label: item.label.clone(),
            priority: item.priority,
            lead_time: item.lead_time.clone(),
            deadline: item.deadline,
            moment: item.moment,
            quantity: item.quantity.clone(),
            provenance: item.provenance,
        })
        .collect()
}

/// Rows as pretty JSON
pub fn to_json(rows: &[ExportRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Rows read back from JSON
pub fn rows_from_json(json: &str) -> Result<Vec<ExportRow>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{ChecklistGenerator, resolve_deadline};
    use crate::models::TripContext;
    use crate::reference::ReferenceData;

    fn row(lead_time: Option<&str>) -> ExportRow {
        ExportRow {
            section_id: "documents".to_string(),
            section_title: "Documents".to_string(),
            label: "Passeport".to_string(),
            priority: Priority::High,
            lead_time: lead_time.map(str::to_string),
            deadline: None,
            moment: None,
            quantity: None,
            provenance: CatalogKind::Core,
        }
    }

    #[test]
    fn test_round_trip_preserves_tags() {
        let rows = vec![row(Some("J-90")), row(Some("J+3")), row(Some("J-007")), row(None)];
        let json = to_json(&rows).unwrap();
        let restored = rows_from_json(&json).unwrap();
        assert_eq!(restored, rows);
        assert_eq!(restored[2].lead_time.as_deref(), Some("J-007"));
    }

    #[test]
    fn test_rows_follow_checklist() {
        let reference = ReferenceData::embedded().unwrap();
        let departure = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let trip = TripContext::new(&["TH"], departure);
        let checklist = ChecklistGenerator::new(&reference).generate(&trip).unwrap();

        let rows = rows(&checklist);
        assert_eq!(rows.len(), checklist.statistics.total_items);

        let passport = rows.iter().find(|r| r.label == "Passeport").unwrap();
        assert_eq!(passport.lead_time.as_deref(), Some("J-90"));
        assert_eq!(passport.deadline, resolve_deadline(departure, "J-90"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(rows_from_json("[{\"label\": 1}]").is_err());
    }
}
