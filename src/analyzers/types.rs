//! Data types flowing through the fetch, align and aggregate pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Downloads of one series on one calendar day, as returned by the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    #[serde(rename = "downloads")]
    pub count: u64,
}

impl DailyCount {
    pub fn new(day: NaiveDate, count: u64) -> Self {
        Self { day, count }
    }
}

/// One calendar day carrying the counts of both series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignedDay {
    pub day: NaiveDate,
    pub count_a: u64,
    pub count_b: u64,
}

/// A group of consecutive days folded into one record.
///
/// `ratio` is `sum_b / sum_a * 100`, or `None` when `sum_a` is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    pub period_start: NaiveDate,
    pub sum_a: u64,
    pub sum_b: u64,
    pub days: u32,
    pub ratio: Option<f64>,
}

impl PeriodBucket {
    pub(crate) fn empty(period_start: NaiveDate) -> Self {
        Self {
            period_start,
            sum_a: 0,
            sum_b: 0,
            days: 0,
            ratio: None,
        }
    }
}

/// Record handed to the chart layer: `date` on the x-axis, `ratio` plotted,
/// the raw sums shown in the tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub next: u64,
    #[serde(rename = "nextAuth")]
    pub next_auth: u64,
    pub ratio: Option<f64>,
}

impl From<&PeriodBucket> for ChartPoint {
    fn from(bucket: &PeriodBucket) -> Self {
        Self {
            date: crate::dates::format_date(bucket.period_start),
            next: bucket.sum_a,
            next_auth: bucket.sum_b,
            ratio: bucket.ratio,
        }
    }
}
