//! Timeline/Deadline Calculator
//!
//! Lead-time tags are relative to departure: "J-N" is N days before, "J+N" is
//! N days after. Tags that do not follow this exact form give no deadline.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{GeneratedSection, Priority};

/// A parsed lead-time tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadTime {
    Before(u64),
    After(u64),
}

impl LeadTime {
    /// Absolute date for a departure; `None` when out of calendar range
    #[must_use]
    pub fn resolve(self, departure: NaiveDate) -> Option<NaiveDate> {
        match self {
            LeadTime::Before(days) => departure.checked_sub_days(Days::new(days)),
            LeadTime::After(days) => departure.checked_add_days(Days::new(days)),
        }
    }
}

impl FromStr for LeadTime {
    type Err = ();

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        let (before, digits) = if let Some(digits) = tag.strip_prefix("J-") {
            (true, digits)
        } else if let Some(digits) = tag.strip_prefix("J+") {
            (false, digits)
        } else {
            return Err(());
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(());
        }
        let days: u64 = digits.parse().map_err(|_| ())?;

        Ok(if before {
            LeadTime::Before(days)
        } else {
            LeadTime::After(days)
        })
    }
}

impl fmt::Display for LeadTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadTime::Before(days) => write!(f, "J-{days}"),
            LeadTime::After(days) => write!(f, "J+{days}"),
        }
    }
}

/// Absolute deadline of a lead-time tag; malformed tags give `None`
#[must_use]
pub fn resolve_deadline(departure: NaiveDate, tag: &str) -> Option<NaiveDate> {
    tag.parse::<LeadTime>().ok()?.resolve(departure)
}

/// Fixed preparation windows, furthest from departure first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineWindow {
    ThreeMonths,
    TwoMonths,
    OneMonth,
    OneWeek,
    DayBefore,
}

impl TimelineWindow {
    pub const ALL: [TimelineWindow; 5] = [
        TimelineWindow::ThreeMonths,
        TimelineWindow::TwoMonths,
        TimelineWindow::OneMonth,
        TimelineWindow::OneWeek,
        TimelineWindow::DayBefore,
    ];

    /// Days-before-departure range, lower bound exclusive, upper inclusive
    #[must_use]
    pub fn bounds(self) -> (i64, i64) {
        match self {
            TimelineWindow::ThreeMonths => (60, 90),
            TimelineWindow::TwoMonths => (30, 60),
            TimelineWindow::OneMonth => (7, 30),
            TimelineWindow::OneWeek => (1, 7),
            TimelineWindow::DayBefore => (0, 1),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TimelineWindow::ThreeMonths => "3 to 2 months before",
            TimelineWindow::TwoMonths => "2 months to 1 month before",
            TimelineWindow::OneMonth => "1 month to 1 week before",
            TimelineWindow::OneWeek => "Last week",
            TimelineWindow::DayBefore => "The day before",
        }
    }

    /// Window holding a days-before count; day of departure and beyond 90 days have none
    #[must_use]
    pub fn for_days_before(days: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|window| {
            let (lower, upper) = window.bounds();
            days > lower && days <= upper
        })
    }
}

/// One item placed on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub section_id: String,
    pub label: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

/// Items of one window with its calendar range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBucket {
    pub window: TimelineWindow,
    pub label: &'static str,
    /// First calendar day of the window
    pub start: Option<NaiveDate>,
    /// Last calendar day of the window
    pub end: Option<NaiveDate>,
    pub entries: Vec<TimelineEntry>,
}

/// Items grouped by preparation window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub windows: Vec<TimelineBucket>,
    /// Items without a deadline or outside every window
    pub undated: Vec<TimelineEntry>,
}

impl Timeline {
    #[must_use]
    pub fn bucket(&self, window: TimelineWindow) -> Option<&TimelineBucket> {
        self.windows.iter().find(|bucket| bucket.window == window)
    }

    /// Number of items placed in a window
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.windows.iter().map(|bucket| bucket.entries.len()).sum()
    }
}

/// Group every item of the sections into the fixed windows.
///
/// Windows are always present, possibly empty. Entries keep section then item
/// order inside a window.
#[must_use]
pub fn build_timeline(departure: NaiveDate, sections: &[GeneratedSection]) -> Timeline {
    let mut windows: Vec<TimelineBucket> = TimelineWindow::ALL
        .into_iter()
        .map(|window| {
            let (lower, upper) = window.bounds();
            TimelineBucket {
                window,
                label: window.label(),
                start: departure.checked_sub_days(Days::new(upper.unsigned_abs())),
                end: departure.checked_sub_days(Days::new((lower + 1).unsigned_abs())),
                entries: Vec::new(),
            }
        })
        .collect();
    let mut undated = Vec::new();

    for section in sections {
        for item in &section.items {
            let entry = TimelineEntry {
                section_id: section.id.clone(),
                label: item.label.clone(),
                priority: item.priority,
                lead_time: item.lead_time.clone(),
                deadline: item.deadline,
            };

            let window = item
                .deadline
                .and_then(|deadline| TimelineWindow::for_days_before((departure - deadline).num_days()));

            match window.and_then(|window| windows.iter_mut().find(|b| b.window == window)) {
                Some(bucket) => bucket.entries.push(entry),
                None => undated.push(entry),
            }
        }
    }

    Timeline { windows, undated }
}
