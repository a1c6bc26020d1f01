//! Chunked retrieval of long date spans.
//!
//! The npm range endpoint caps each request at 18 months. [`chunk_ranges`]
//! splits a span into contiguous sub-ranges under that cap, and
//! [`RangeFetcher`] retrieves them and stitches the results back together.

use std::fmt;

use chrono::NaiveDate;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use crate::analyzers::types::DailyCount;
use crate::config::DEFAULT_MAX_RANGE_MONTHS;
use crate::dates::{add_days, add_months};
use crate::error::{Error, Result};
use crate::services::downloads_api::DownloadsApi;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Splits `start..=end` into consecutive ranges no longer than `max_months`.
///
/// Each range ends at `range.start + max_months` or at `end`, whichever is
/// earlier, and the next begins the following day.
pub fn chunk_ranges(start: NaiveDate, end: NaiveDate, max_months: u32) -> Result<Vec<DateRange>> {
    if max_months == 0 {
        return Err(Error::InvalidArgument(
            "max_months must be at least 1".into(),
        ));
    }
    if start > end {
        return Err(Error::InvalidArgument(format!(
            "start date {start} is after end date {end}"
        )));
    }

    let mut ranges = Vec::new();
    let mut current = start;
    loop {
        let chunk_end = add_months(current, max_months)?.min(end);
        ranges.push(DateRange::new(current, chunk_end));
        if chunk_end >= end {
            break;
        }
        current = add_days(chunk_end, 1)?;
    }
    Ok(ranges)
}

/// Retrieves a whole date span for one series, one chunk per request.
#[derive(Debug, Clone, Copy)]
pub struct RangeFetcher {
    max_months: u32,
    concurrency: usize,
}

impl Default for RangeFetcher {
    fn default() -> Self {
        Self {
            max_months: DEFAULT_MAX_RANGE_MONTHS,
            concurrency: 1,
        }
    }
}

impl RangeFetcher {
    pub fn new(max_months: u32) -> Self {
        Self {
            max_months,
            ..Self::default()
        }
    }

    /// Allows up to `concurrency` chunk requests in flight at once. Results
    /// are still returned in day order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetches `start..=end` for `series`, concatenating chunks in ascending
    /// day order. The first failing chunk aborts the whole fetch with
    /// [`Error::Chunk`].
    #[tracing::instrument(skip(self, api), fields(max_months = self.max_months))]
    pub async fn fetch_series<A: DownloadsApi + ?Sized>(
        &self,
        api: &A,
        series: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCount>> {
        let chunks = chunk_ranges(start, end, self.max_months)?;
        info!(chunks = chunks.len(), "Fetching series");

        let parts: Vec<Vec<DailyCount>> = stream::iter(chunks)
            .map(|range| async move {
                let rows = api
                    .fetch_range(series, range.start, range.end)
                    .await
                    .map_err(|e| e.in_chunk(series, range.start, range.end))?;
                debug!(range = %range, rows = rows.len(), "Chunk fetched");
                Ok::<_, Error>(rows)
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let downloads: Vec<DailyCount> = parts.into_iter().flatten().collect();
        info!(days = downloads.len(), "Series fetched");
        Ok(downloads)
    }
}
