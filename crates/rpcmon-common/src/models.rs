use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

// ─── Log records (log aggregator) ─────────────────────────

/// One proxied request as reported by the log aggregator.
///
/// Upstream names the caller `requester` and the duration `elapsed`; the
/// dashboard uses `origin` and `duration_ms` throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "requester", default)]
    pub origin: String,
    #[serde(default)]
    pub method: String,
    /// Serialized request params; upstream sometimes sends structured JSON.
    #[serde(default, deserialize_with = "stringify")]
    pub params: String,
    #[serde(rename = "elapsed", default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub status: String,
}

/// Accept either a plain string or arbitrary JSON and keep a string form.
fn stringify<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// ─── Requestor stats (log aggregator) ─────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestorStats {
    #[serde(rename = "nAllRequestsAllTime", default)]
    pub all_requests_all_time: i64,
    #[serde(rename = "nCacheRequestsAllTime", default)]
    pub cache_requests_all_time: i64,
    #[serde(rename = "nPoolRequestsAllTime", default)]
    pub pool_requests_all_time: i64,
    #[serde(rename = "nFallbackRequestsAllTime", default)]
    pub fallback_requests_all_time: i64,
    #[serde(rename = "nAllRequestsLastWeek", default)]
    pub all_requests_last_week: i64,
    #[serde(rename = "nCacheRequestsLastWeek", default)]
    pub cache_requests_last_week: i64,
    #[serde(rename = "nPoolRequestsLastWeek", default)]
    pub pool_requests_last_week: i64,
    #[serde(rename = "nFallbackRequestsLastWeek", default)]
    pub fallback_requests_last_week: i64,
}

// ─── Cache server ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub value: Value,
    /// Epoch milliseconds; null for entries that never resolved.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

// ─── Rate limit status (proxy admin API) ──────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitStatus {
    /// Epoch milliseconds of the snapshot.
    pub timestamp: Option<i64>,
    pub sliding_window: SlidingWindow,
    pub time_until_reset: TimeUntilReset,
    pub poll_errors: i64,
    pub last_poll_time: Option<i64>,
    pub summary: RateLimitSummary,
    pub config: RateLimitConfig,
    pub origins: std::collections::BTreeMap<String, RateLimitCounters>,
    pub ips: std::collections::BTreeMap<String, RateLimitCounters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlidingWindow {
    pub minutes_into_hour: i64,
    pub previous_hour_weight: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeUntilReset {
    pub hourly_minutes: i64,
    pub hourly_seconds: i64,
    pub daily_hours: f64,
    pub daily_seconds: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateLimitSummary {
    #[serde(rename = "hourlyBlockedOrigins")]
    pub hourly_blocked_origins: i64,
    #[serde(rename = "hourlyBlockedIPs")]
    pub hourly_blocked_ips: i64,
    #[serde(rename = "dailyBlockedOrigins")]
    pub daily_blocked_origins: i64,
    #[serde(rename = "dailyBlockedIPs")]
    pub daily_blocked_ips: i64,
    #[serde(rename = "totalTrackedOrigins")]
    pub total_tracked_origins: i64,
    #[serde(rename = "totalTrackedIPs")]
    pub total_tracked_ips: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitConfig {
    pub origin_rate_limit_per_hour: Option<i64>,
    pub origin_rate_limit_per_day: Option<i64>,
    pub ip_rate_limit_per_hour: Option<i64>,
    pub ip_rate_limit_per_day: Option<i64>,
    pub rate_limit_poll_interval: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitCounters {
    pub current_hour: i64,
    pub previous_hour: i64,
    pub effective_hourly: i64,
    pub daily: i64,
    pub hourly_blocked: bool,
    pub daily_blocked: bool,
}

// ─── History database rows ────────────────────────────────

/// One hour bucket of request counts for an IP.
#[derive(Debug, Clone, FromRow)]
pub struct IpHourRow {
    pub ip: String,
    pub hour_timestamp: i64,
    pub request_count: i64,
}

/// One hour bucket of request counts for an origin, unpacked from the
/// per-IP `origins` jsonb column.
#[derive(Debug, Clone, FromRow)]
pub struct OriginHourRow {
    pub origin: String,
    pub hour_timestamp: i64,
    pub request_count: i64,
}

/// Aggregate request totals per IP for the IP table page.
#[derive(Debug, Clone, FromRow)]
pub struct IpTotals {
    pub ip: String,
    pub total_requests: i64,
    pub requests_last_hour: Option<i64>,
}

/// Per-origin request count for a single IP.
#[derive(Debug, Clone, FromRow)]
pub struct IpOriginCount {
    pub ip: String,
    pub origin: String,
    pub request_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct OwnerPoints {
    pub owner: String,
    pub points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_record_maps_upstream_field_names() {
        let json = r#"{"timestamp":1700000000000,"requester":"app.example.org",
            "method":"eth_blockNumber","params":"[]","elapsed":42,"status":"success"}"#;
        let record: LogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.origin, "app.example.org");
        assert_eq!(record.duration_ms, 42);
        assert_eq!(record.params, "[]");
    }

    #[test]
    fn structured_params_are_stringified() {
        let json = r#"{"requester":"x","params":[{"to":"0xabc"}],"status":"success"}"#;
        let record: LogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.params, r#"[{"to":"0xabc"}]"#);
    }

    #[test]
    fn rate_limit_status_tolerates_missing_sections() {
        let status: RateLimitStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status.poll_errors, 0);
        assert!(status.origins.is_empty());
        assert!(status.config.origin_rate_limit_per_hour.is_none());
    }

    #[test]
    fn rate_limit_counters_parse_camel_case() {
        let json = r#"{"origins":{"dapp.example":{"currentHour":10,"previousHour":4,
            "effectiveHourly":12,"daily":100,"hourlyBlocked":true,"dailyBlocked":false}}}"#;
        let status: RateLimitStatus = serde_json::from_str(json).unwrap();
        let counters = &status.origins["dapp.example"];
        assert_eq!(counters.effective_hourly, 12);
        assert!(counters.hourly_blocked);
    }

    #[test]
    fn requestor_stats_default_missing_counters() {
        let stats: RequestorStats = serde_json::from_str(r#"{"nAllRequestsAllTime":7}"#).unwrap();
        assert_eq!(stats.all_requests_all_time, 7);
        assert_eq!(stats.pool_requests_last_week, 0);
    }
}
