//! Statistics Aggregator

use crate::models::{GeneratedSection, Statistics};

/// Counts over the final sections
#[must_use]
pub fn compute_stats(sections: &[GeneratedSection]) -> Statistics {
    let mut stats = Statistics {
        total_sections: sections.len(),
        ..Statistics::default()
    };

    for item in sections.iter().flat_map(|section| &section.items) {
        stats.total_items += 1;
        stats.by_priority.record(item.priority);
        if item.deadline.is_some() {
            stats.dated_items += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogKind, GeneratedItem, Priority, PriorityCounts};
    use chrono::NaiveDate;

    fn item(priority: Priority, deadline: Option<NaiveDate>) -> GeneratedItem {
        GeneratedItem {
            label: "item".to_string(),
            priority,
            lead_time: None,
            deadline,
            moment: None,
            quantity: None,
            advice: None,
            provenance: CatalogKind::Core,
        }
    }

    #[test]
    fn test_counts_match_sections() {
        let mut documents = GeneratedSection::new("documents", "Documents", CatalogKind::Core);
        documents.items = vec![
            item(Priority::High, NaiveDate::from_ymd_opt(2025, 5, 1)),
            item(Priority::High, None),
        ];
        let mut tech = GeneratedSection::new("tech", "Tech", CatalogKind::Core);
        tech.items = vec![item(Priority::Low, None)];

        let stats = compute_stats(&[documents, tech]);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_sections, 2);
        assert_eq!(stats.dated_items, 1);
        assert_eq!(
            stats.by_priority,
            PriorityCounts {
                high: 2,
                medium: 0,
                low: 1
            }
        );
    }

    #[test]
    fn test_empty_result_has_zero_stats() {
        assert_eq!(compute_stats(&[]), Statistics::default());
    }
}
