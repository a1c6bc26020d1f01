//! Output formatting for computed buckets and fetched series.
//!
//! Supports a plain-text table, JSON chart points, and CSV.

use std::io::Write;

use clap::ValueEnum;
use csv::WriterBuilder;
use tracing::debug;

use crate::analyzers::types::{ChartPoint, DailyCount, PeriodBucket};
use crate::analyzers::utility::group_thousands;
use crate::dates::format_date;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
    Csv,
}

/// Formats available for raw daily counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DailyFormat {
    Json,
    #[default]
    Csv,
}

/// Converts buckets into the records the chart layer consumes.
pub fn chart_points(buckets: &[PeriodBucket]) -> Vec<ChartPoint> {
    buckets.iter().map(ChartPoint::from).collect()
}

/// Pretty-printed JSON array of [`ChartPoint`]s. Missing ratios become `null`.
pub fn to_json(buckets: &[PeriodBucket]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&chart_points(buckets))?)
}

/// Writes one CSV row per bucket, with a header. Missing ratios are empty cells.
pub fn write_csv<W: Write>(writer: W, buckets: &[PeriodBucket]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for point in chart_points(buckets) {
        writer.serialize(point)?;
    }
    writer.flush()?;
    debug!(rows = buckets.len(), "CSV written");
    Ok(())
}

/// Writes daily counts as `day,downloads` CSV.
pub fn write_daily_csv<W: Write>(writer: W, rows: &[DailyCount]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Fixed-width table: date, both sums with thousands separators, and the
/// ratio to two decimals.
pub fn render_table(buckets: &[PeriodBucket], label_a: &str, label_b: &str) -> String {
    let mut out = format!(
        "{:<10}  {:>15}  {:>15}  {:>9}\n",
        "date", label_a, label_b, "ratio"
    );
    for bucket in buckets {
        let ratio = bucket
            .ratio
            .map(|r| format!("{r:.2}%"))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "{:<10}  {:>15}  {:>15}  {:>9}\n",
            format_date(bucket.period_start),
            group_thousands(bucket.sum_a),
            group_thousands(bucket.sum_b),
            ratio
        ));
    }
    out
}
