use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced while fetching and aggregating download series.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument is out of its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Text that should have been a `YYYY-MM-DD` date.
    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// Date arithmetic left the representable calendar.
    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered, but with an error status or error body.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("failed to parse upstream response: {0}")]
    Parse(#[from] serde_json::Error),

    /// One chunk of a chunked range fetch failed; the whole fetch is aborted.
    #[error("fetching {series} for {start}:{end} failed")]
    Chunk {
        series: String,
        start: NaiveDate,
        end: NaiveDate,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps `self` with the identity of the chunk that produced it.
    pub fn in_chunk(self, series: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Error::Chunk {
            series: series.to_string(),
            start,
            end,
            source: Box::new(self),
        }
    }
}
