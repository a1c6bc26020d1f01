//! JSON decoding for the npm `downloads/range` endpoint.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::analyzers::types::DailyCount;
use crate::error::{Error, Result};

/// Body of a successful range response.
#[derive(Debug, Deserialize)]
pub struct RangeResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub package: String,
    pub downloads: Vec<DailyCount>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Decodes a range response body received with HTTP `status`.
///
/// # Errors
///
/// A body of the form `{"error": "..."}` is reported as [`Error::Upstream`]
/// carrying `status`;
/// anything else that does not match [`RangeResponse`] is [`Error::Parse`].
pub fn parse_range_response(bytes: &[u8], status: u16) -> Result<RangeResponse> {
    match serde_json::from_slice::<RangeResponse>(bytes) {
        Ok(resp) => Ok(resp),
        Err(parse_err) => match serde_json::from_slice::<ErrorBody>(bytes) {
            Ok(body) => Err(Error::Upstream {
                status,
                message: body.error,
            }),
            Err(_) => Err(Error::Parse(parse_err)),
        },
    }
}

/// Extracts the `error` field of an upstream error body, falling back to the raw text.
pub fn error_message(bytes: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(bytes)
        .map(|body| body.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let body = br#"{
            "start": "2024-01-01",
            "end": "2024-01-02",
            "package": "next",
            "downloads": [
                {"downloads": 1200, "day": "2024-01-01"},
                {"downloads": 3400, "day": "2024-01-02"}
            ]
        }"#;

        let resp = parse_range_response(body, 200).unwrap();

        assert_eq!(resp.package, "next");
        assert_eq!(resp.downloads.len(), 2);
        assert_eq!(resp.downloads[1].count, 3400);
        assert_eq!(resp.downloads[1].day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_error_body() {
        let body = br#"{"error":"package next-nope not found"}"#;

        let err = parse_range_response(body, 202).unwrap_err();

        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 202);
                assert_eq!(message, "package next-nope not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_range_response(b"<html>", 200).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_negative_count_rejected() {
        let body = br#"{"start":"2024-01-01","end":"2024-01-01","package":"x",
            "downloads":[{"downloads":-1,"day":"2024-01-01"}]}"#;
        assert!(matches!(parse_range_response(body, 200), Err(Error::Parse(_))));
    }

    #[test]
    fn test_error_message_falls_back_to_text() {
        assert_eq!(error_message(br#"{"error":"bad range"}"#), "bad range");
        assert_eq!(error_message(b"Service Unavailable\n"), "Service Unavailable");
    }
}
