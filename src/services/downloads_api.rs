//! Trait for sources of daily download counts.

use chrono::NaiveDate;

use crate::analyzers::types::DailyCount;
use crate::error::Result;

/// A source that can return daily counts for one series over a bounded range.
///
/// Implementations may reject ranges longer than their own limit; callers go
/// through [`crate::range::RangeFetcher`] to stay under it.
#[async_trait::async_trait]
pub trait DownloadsApi: Send + Sync {
    /// Returns one entry per day in `start..=end`, ascending.
    async fn fetch_range(
        &self,
        series: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCount>>;
}
