//! Words-studied totals over recorded completions.
//!
//! Each completion contributes its `pair_count` to the bucket it falls in:
//! one bucket per UTC day for the last 30 days, or one per calendar month for
//! the last 12 months. Buckets with no completions are kept with a zero total.

use crate::types::CompletionEvent;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Window the totals cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    /// Last 30 days, one bucket per day.
    Month,
    /// Last 12 months, one bucket per calendar month.
    Year,
}

impl StatsPeriod {
    /// Number of buckets in the window.
    pub fn bucket_count(self) -> usize {
        match self {
            Self::Month => 30,
            Self::Year => 12,
        }
    }

    /// Bucket a timestamp belongs to, identified by its first day.
    fn key(self, at: DateTime<Utc>) -> Option<NaiveDate> {
        let date = at.date_naive();
        match self {
            Self::Month => Some(date),
            Self::Year => date.with_day(1),
        }
    }

    /// Bucket keys ending with the one containing `now`, oldest first.
    fn window(self, now: DateTime<Utc>) -> Vec<NaiveDate> {
        let Some(last) = self.key(now) else {
            return Vec::new();
        };
        match self {
            Self::Month => (0..30u64)
                .rev()
                .filter_map(|i| last.checked_sub_days(Days::new(i)))
                .collect(),
            Self::Year => (0..12u32)
                .rev()
                .filter_map(|i| last.checked_sub_months(Months::new(i)))
                .collect(),
        }
    }
}

/// Words studied within one day or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// First day the bucket covers.
    pub start: NaiveDate,
    pub words: usize,
}

/// Sum `pair_count` per bucket over the window ending at `now`.
pub fn totals(events: &[CompletionEvent], period: StatsPeriod, now: DateTime<Utc>) -> Vec<Bucket> {
    let mut sums: BTreeMap<NaiveDate, usize> = period
        .window(now)
        .into_iter()
        .map(|start| (start, 0))
        .collect();

    for event in events {
        let Some(key) = period.key(event.completed_at) else {
            continue;
        };
        if let Some(sum) = sums.get_mut(&key) {
            *sum += event.pair_count;
        }
    }

    sums.into_iter().map(|(start, words)| Bucket { start, words }).collect()
}
