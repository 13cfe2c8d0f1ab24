//! STS token expiry parsing
//!
//! RDS IAM auth tokens are presigned-URL query strings; the expiry window
//! is carried in the `X-Amz-Date` and `X-Amz-Expires` parameters.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

/// SigV4 basic timestamp format used by presigned URLs (e.g. `20240101T000000Z`).
const AMZ_DATE_BASIC: &str = "%Y%m%dT%H%M%SZ";

/// Extract the `X-Amz-*` properties from a token string.
///
/// The token is an ampersand-separated `key=value` sequence. Segments
/// without a `=` or without the `X-Amz-` prefix are ignored; duplicate
/// keys are last-write-wins.
pub fn amz_properties(token: &str) -> HashMap<String, String> {
    token
        .split('&')
        .filter(|s| s.starts_with("X-Amz-"))
        .filter_map(|s| s.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Expiry window derived from a token, in wall-clock milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenExpiry {
    /// Absolute instant the token expires at.
    pub expires_at_millis: i64,
    /// Full validity window, the denominator for percentage computation.
    pub window_millis: i64,
}

impl TokenExpiry {
    /// Derive the expiry window from a raw token string.
    ///
    /// Returns `None` when the token carries no usable expiry metadata:
    /// missing or unparseable `X-Amz-Date`, missing, non-numeric or
    /// non-positive `X-Amz-Expires`. Malformed input is never an error,
    /// just "not a countdown token".
    pub fn parse(token: &str) -> Option<Self> {
        let props = amz_properties(token);
        let expires_secs: i64 = props.get("X-Amz-Expires")?.parse().ok()?;
        if expires_secs <= 0 {
            return None;
        }
        let issued_at = parse_amz_date(props.get("X-Amz-Date")?)?;
        let window_millis = expires_secs.checked_mul(1000)?;
        Some(Self {
            expires_at_millis: issued_at.timestamp_millis().checked_add(window_millis)?,
            window_millis,
        })
    }

    /// Remaining validity at `now_millis`, as a percentage of the full
    /// window. Negative once the token is past its expiry instant.
    pub fn percent_at(&self, now_millis: i64) -> f64 {
        100.0 * (self.expires_at_millis - now_millis) as f64 / self.window_millis as f64
    }
}

/// Parse an `X-Amz-Date` value.
///
/// Presigned URLs use the SigV4 basic format, but accept full RFC 3339 as
/// well, matching the lenient date handling of the portal web UI.
fn parse_amz_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, AMZ_DATE_BASIC)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amz_properties_filters_prefix() {
        let props = amz_properties("X-Amz-Date=20240101T000000Z&Signature=abc&X-Amz-Expires=900");
        assert_eq!(props.len(), 2);
        assert_eq!(props["X-Amz-Date"], "20240101T000000Z");
        assert_eq!(props["X-Amz-Expires"], "900");
    }

    #[test]
    fn test_amz_properties_splits_on_first_equals() {
        let props = amz_properties("X-Amz-Credential=AKIA/20240101/us-east-1/rds-db/aws4_request=x");
        assert_eq!(
            props["X-Amz-Credential"],
            "AKIA/20240101/us-east-1/rds-db/aws4_request=x"
        );
    }

    #[test]
    fn test_amz_properties_last_write_wins() {
        let props = amz_properties("X-Amz-Expires=100&X-Amz-Expires=200");
        assert_eq!(props["X-Amz-Expires"], "200");
    }

    #[test]
    fn test_amz_properties_discards_malformed() {
        let props = amz_properties("garbage&noequals&X-Amz-Expires");
        assert!(props.is_empty());
    }

    #[test]
    fn test_parse_basic_format() {
        let expiry =
            TokenExpiry::parse("X-Amz-Date=20240101T000000Z&X-Amz-Expires=900").unwrap();
        let issued = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(expiry.window_millis, 900_000);
        assert_eq!(expiry.expires_at_millis, issued + 900_000);
    }

    #[test]
    fn test_parse_rfc3339_format() {
        let basic = TokenExpiry::parse("X-Amz-Date=20240101T000000Z&X-Amz-Expires=100").unwrap();
        let rfc = TokenExpiry::parse("X-Amz-Date=2024-01-01T00:00:00Z&X-Amz-Expires=100").unwrap();
        assert_eq!(basic, rfc);
    }

    #[test]
    fn test_parse_rejects_zero_expires() {
        assert!(TokenExpiry::parse("X-Amz-Date=20240101T000000Z&X-Amz-Expires=0").is_none());
    }

    #[test]
    fn test_parse_rejects_negative_expires() {
        assert!(TokenExpiry::parse("X-Amz-Date=20240101T000000Z&X-Amz-Expires=-5").is_none());
    }

    #[test]
    fn test_parse_rejects_missing_pieces() {
        assert!(TokenExpiry::parse("").is_none());
        assert!(TokenExpiry::parse("X-Amz-Expires=900").is_none());
        assert!(TokenExpiry::parse("X-Amz-Date=20240101T000000Z").is_none());
        assert!(TokenExpiry::parse("X-Amz-Date=not-a-date&X-Amz-Expires=900").is_none());
        assert!(TokenExpiry::parse("X-Amz-Date=20240101T000000Z&X-Amz-Expires=soon").is_none());
    }

    #[test]
    fn test_percent_at_midpoint() {
        let expiry = TokenExpiry::parse("X-Amz-Date=2024-01-01T00:00:00Z&X-Amz-Expires=100").unwrap();
        let issued = expiry.expires_at_millis - expiry.window_millis;
        assert_eq!(expiry.percent_at(issued), 100.0);
        assert_eq!(expiry.percent_at(issued + 50_000), 50.0);
        assert_eq!(expiry.percent_at(issued + 100_000), 0.0);
        assert!(expiry.percent_at(issued + 110_000) < 0.0);
    }
}
