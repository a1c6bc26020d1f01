use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::analyzers::types::{AlignedDay, DailyCount};

/// Pairs two daily series by calendar day.
///
/// Series A is authoritative: the output has exactly one record per element of
/// `series_a`, in the same order. `count_b` is looked up by date in `series_b`
/// and is 0 when B has no entry for that day. Days present only in B are dropped.
pub fn align(series_a: &[DailyCount], series_b: &[DailyCount]) -> Vec<AlignedDay> {
    let mut by_day: HashMap<NaiveDate, u64> = HashMap::with_capacity(series_b.len());
    for entry in series_b {
        *by_day.entry(entry.day).or_default() += entry.count;
    }

    let mut missing_in_b = 0usize;
    let aligned: Vec<AlignedDay> = series_a
        .iter()
        .map(|a| {
            let count_b = by_day.remove(&a.day).unwrap_or_else(|| {
                missing_in_b += 1;
                0
            });
            AlignedDay {
                day: a.day,
                count_a: a.count,
                count_b,
            }
        })
        .collect();

    if missing_in_b > 0 || !by_day.is_empty() {
        debug!(
            missing_in_b,
            dropped_from_b = by_day.len(),
            "Series do not cover the same days"
        );
    }

    aligned
}
