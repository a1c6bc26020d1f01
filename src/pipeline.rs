//! Fetch both series, align them and fold them into periods.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::analyzers::aggregate::{Anchor, aggregate};
use crate::analyzers::align::align;
use crate::analyzers::types::PeriodBucket;
use crate::dates::{utc_date, years_before};
use crate::error::{Error, Result};
use crate::range::RangeFetcher;
use crate::services::downloads_api::DownloadsApi;

/// Parameters of one ratio computation.
#[derive(Debug, Clone)]
pub struct Query {
    /// Denominator series.
    pub series_a: String,
    /// Numerator series.
    pub series_b: String,
    pub period_days: u32,
    pub years_back: u32,
    pub anchor: Anchor,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            series_a: "next".to_string(),
            series_b: "next-auth".to_string(),
            period_days: 30,
            years_back: 4,
            anchor: Anchor::FirstDay,
        }
    }
}

impl Query {
    fn validate(&self) -> Result<()> {
        if self.period_days == 0 {
            return Err(Error::InvalidArgument(
                "period_days must be a positive number of days".into(),
            ));
        }
        if self.years_back == 0 {
            return Err(Error::InvalidArgument(
                "years_back must be a positive number of years".into(),
            ));
        }
        if self.series_a.trim().is_empty() || self.series_b.trim().is_empty() {
            return Err(Error::InvalidArgument("series names must not be empty".into()));
        }
        Ok(())
    }
}

/// Runs the query for the window ending on `today`.
///
/// The window is `today - years_back years ..= today`. Both series are
/// fetched concurrently; if either fails, the run fails.
#[tracing::instrument(skip(api, fetcher), fields(series_a = %query.series_a, series_b = %query.series_b))]
pub async fn run<A: DownloadsApi + ?Sized>(
    api: &A,
    fetcher: &RangeFetcher,
    query: &Query,
    today: NaiveDate,
) -> Result<Vec<PeriodBucket>> {
    query.validate()?;

    let start = years_before(today, query.years_back)?;
    let end = today;

    let (series_a, series_b) = tokio::try_join!(
        fetcher.fetch_series(api, &query.series_a, start, end),
        fetcher.fetch_series(api, &query.series_b, start, end),
    )?;

    let days = align(&series_a, &series_b);
    let buckets = aggregate(&days, start, query.period_days, query.anchor)?;

    info!(
        start = %start,
        end = %end,
        days = days.len(),
        buckets = buckets.len(),
        "Ratio computed"
    );
    Ok(buckets)
}

/// [`run`] with `today` taken from the current UTC date.
pub async fn run_today<A: DownloadsApi + ?Sized>(
    api: &A,
    fetcher: &RangeFetcher,
    query: &Query,
) -> Result<Vec<PeriodBucket>> {
    run(api, fetcher, query, utc_date(Utc::now())).await
}
