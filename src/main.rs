//! CLI entry point for the npm download ratio tool.
//!
//! Fetches daily download counts for two packages from the npm registry,
//! groups them into fixed-length periods and reports the ratio of the second
//! package's downloads to the first's.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use npm_download_ratio::analyzers::aggregate::Anchor;
use npm_download_ratio::{
    config::Settings,
    dates::{parse_date, utc_date},
    infra::npm::NpmClient,
    output::{DailyFormat, Format, render_table, to_json, write_csv, write_daily_csv},
    pipeline::{Query, run_today},
    range::RangeFetcher,
};
use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "npm_download_ratio")]
#[command(about = "Compare npm download counts of two packages over time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the per-period download ratio of SERIES_B to SERIES_A
    Ratio {
        /// Days per period
        #[arg(short, long, default_value_t = 30)]
        period_days: u32,

        /// How many years back from today to cover
        #[arg(short, long, default_value_t = 4)]
        years: u32,

        /// Denominator package
        #[arg(long, default_value = "next")]
        series_a: String,

        /// Numerator package
        #[arg(long, default_value = "next-auth")]
        series_b: String,

        /// How periods after the first are anchored
        #[arg(long, value_enum, default_value_t = Anchor::FirstDay)]
        anchor: Anchor,

        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum number of chunk requests in flight per package
        #[arg(short, long, default_value_t = 1)]
        concurrency: usize,
    },
    /// Fetch the daily download counts of one package
    Fetch {
        #[arg(value_name = "PACKAGE")]
        series: String,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last day, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        end: Option<String>,

        #[arg(short, long, value_enum, default_value_t = DailyFormat::Csv)]
        format: DailyFormat,

        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/npm_download_ratio.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("npm_download_ratio.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let client = NpmClient::from_settings(&settings).context("building HTTP client")?;
    let fetcher = RangeFetcher::new(settings.max_range_months);

    match cli.command {
        Commands::Ratio {
            period_days,
            years,
            series_a,
            series_b,
            anchor,
            format,
            output,
            concurrency,
        } => {
            let query = Query {
                series_a,
                series_b,
                period_days,
                years_back: years,
                anchor,
            };
            let fetcher = fetcher.with_concurrency(concurrency);
            let buckets = run_today(&client, &fetcher, &query)
                .await
                .context("computing download ratio")?;

            let mut sink = open_sink(output.as_deref())?;
            match format {
                Format::Table => {
                    sink.write_all(
                        render_table(&buckets, &query.series_a, &query.series_b).as_bytes(),
                    )?;
                }
                Format::Json => writeln!(sink, "{}", to_json(&buckets)?)?,
                Format::Csv => write_csv(&mut sink, &buckets)?,
            }
            info!(buckets = buckets.len(), "Done");
        }
        Commands::Fetch {
            series,
            start,
            end,
            format,
            output,
        } => {
            let start = parse_date(&start)?;
            let end = match end {
                Some(end) => parse_date(&end)?,
                None => utc_date(chrono::Utc::now()),
            };
            let rows = fetcher
                .fetch_series(&client, &series, start, end)
                .await
                .with_context(|| format!("fetching {series}"))?;

            let mut sink = open_sink(output.as_deref())?;
            match format {
                DailyFormat::Json => writeln!(sink, "{}", serde_json::to_string_pretty(&rows)?)?,
                DailyFormat::Csv => write_daily_csv(&mut sink, &rows)?,
            }
            info!(days = rows.len(), "Done");
        }
    }

    Ok(())
}

/// Opens `path` for writing, or stdout when no path is given.
fn open_sink(path: Option<&str>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {path}"))?;
            Box::new(file)
        }
        None => Box::new(std::io::stdout().lock()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("npm_download_ratio").chain(args.iter().copied()))
    }

    #[test]
    fn test_fetch_rejects_table_format() {
        assert!(parse(&["fetch", "next", "--start", "2024-01-01", "--format", "table"]).is_err());
    }

    #[test]
    fn test_fetch_accepts_json_and_defaults_to_csv() {
        let cli = parse(&["fetch", "next", "--start", "2024-01-01", "--format", "json"]).unwrap();
        assert!(matches!(cli.command, Commands::Fetch { format: DailyFormat::Json, .. }));

        let cli = parse(&["fetch", "next", "--start", "2024-01-01"]).unwrap();
        assert!(matches!(cli.command, Commands::Fetch { format: DailyFormat::Csv, .. }));
    }

    #[test]
    fn test_ratio_accepts_table_format() {
        let cli = parse(&["ratio", "--format", "table", "--anchor", "fixed"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Ratio { format: Format::Table, anchor: Anchor::Fixed, .. }
        ));
    }
}
