//! Runtime settings read from the environment (after `.env` is loaded).

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.npmjs.org";

/// The npm range endpoint rejects spans longer than this many months.
pub const DEFAULT_MAX_RANGE_MONTHS: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_range_months: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_range_months: DEFAULT_MAX_RANGE_MONTHS,
        }
    }
}

impl Settings {
    /// Reads `NPM_API_BASE_URL`, `NPM_REQUEST_TIMEOUT_SECS`,
    /// `NPM_CONNECT_TIMEOUT_SECS` and `NPM_MAX_RANGE_MONTHS`. Unset or
    /// unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            base_url: get("NPM_API_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            request_timeout_secs: get("NPM_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            connect_timeout_secs: get("NPM_CONNECT_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.connect_timeout_secs),
            max_range_months: get("NPM_MAX_RANGE_MONTHS")
                .and_then(|s| s.parse().ok())
                .filter(|&m: &u32| m > 0)
                .unwrap_or(defaults.max_range_months),
        }
    }
}
