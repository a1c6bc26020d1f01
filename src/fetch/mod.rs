mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{Error, Result};
use tracing::debug;

/// Raw HTTP response body together with its status code.
#[derive(Debug)]
pub struct Fetched {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a GET for `url` and buffers the body.
///
/// Non-2xx statuses are returned, not raised, so the caller can read the
/// upstream's error body.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Fetched> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| Error::InvalidArgument(format!("invalid url '{url}': {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    let status = resp.status().as_u16();
    let bytes = resp.bytes().await?.to_vec();
    debug!(url, status, bytes = bytes.len(), "HTTP response received");

    Ok(Fetched { status, bytes })
}
