use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::analyzers::types::DailyCount;
use crate::config::Settings;
use crate::dates::format_date;
use crate::error::{Error, Result};
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::parser::{error_message, parse_range_response};
use crate::services::downloads_api::DownloadsApi;

/// Client for the public npm download-counts API.
pub struct NpmClient<C = BasicClient> {
    http: C,
    base_url: String,
}

impl NpmClient<BasicClient> {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = BasicClient::new(settings)?;
        Ok(Self::with_client(http, &settings.base_url))
    }
}

impl<C: HttpClient> NpmClient<C> {
    pub fn with_client(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/downloads/range/{start}:{end}/{package}`. Scoped names such as
    /// `@auth/core` are passed through as-is.
    pub fn range_url(&self, package: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/downloads/range/{}:{}/{}",
            self.base_url,
            format_date(start),
            format_date(end),
            package
        )
    }
}

#[async_trait]
impl<C: HttpClient> DownloadsApi for NpmClient<C> {
    async fn fetch_range(
        &self,
        series: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyCount>> {
        let url = self.range_url(series, start, end);
        let fetched = fetch_bytes(&self.http, &url).await?;

        if !fetched.is_success() {
            let message = error_message(&fetched.bytes);
            warn!(package = series, status = fetched.status, %message, "npm API returned an error");
            return Err(Error::Upstream {
                status: fetched.status,
                message,
            });
        }

        let resp = parse_range_response(&fetched.bytes, fetched.status)?;
        debug!(
            package = %resp.package,
            start = %resp.start,
            end = %resp.end,
            days = resp.downloads.len(),
            "Range decoded"
        );
        Ok(resp.downloads)
    }
}
