use axum::{extract::State, response::Html, routing::get, Router};
use chrono::{DateTime, Utc};

use rpcmon_common::models::{RateLimitCounters, RateLimitStatus};

use crate::render::page;
use crate::routes::{PageError, PageResult};
use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new().route("/ratelimitstatus", get(rate_limit_page))
}

async fn rate_limit_page(State(state): State<AppState>) -> PageResult {
    let status = upstream::proxy::fetch_rate_limit_status(&state)
        .await
        .map_err(|e| {
            PageError::with_hint(
                "Rate Limit Status",
                "Check that the proxy admin endpoint and admin key are configured.",
                e,
            )
        })?;

    let body = format!(
        r#"    <h1>Rate Limit Status</h1>
    <p class="stats">Snapshot at {snapshot} &middot; last poll {last_poll} &middot; {poll_errors} poll error(s)</p>
{cards}
{config}
{origins}
{ips}"#,
        snapshot = format_millis(status.timestamp),
        last_poll = format_millis(status.last_poll_time),
        poll_errors = status.poll_errors,
        cards = summary_cards(&status),
        config = config_table(&status),
        origins = counters_table(
            "originTable",
            "Origins",
            &status.origins,
            status.config.origin_rate_limit_per_hour,
            status.config.origin_rate_limit_per_day,
        ),
        ips = counters_table(
            "ipTable",
            "IP Addresses",
            &status.ips,
            status.config.ip_rate_limit_per_hour,
            status.config.ip_rate_limit_per_day,
        ),
    );

    Ok(Html(page::document(
        "Rate Limit Status",
        &[page::BASE_STYLE, page::TABLE_STYLE, RATE_LIMIT_STYLE],
        &format!(
            "{}{}",
            page::sortable_script("originTable", 3, "desc"),
            page::sortable_script("ipTable", 3, "desc"),
        ),
        &body,
    )))
}

fn summary_cards(status: &RateLimitStatus) -> String {
    let s = &status.summary;
    let window = &status.sliding_window;
    let reset = &status.time_until_reset;
    let cards = [
        ("Tracked origins", s.total_tracked_origins.to_string()),
        ("Tracked IPs", s.total_tracked_ips.to_string()),
        (
            "Blocked origins (hourly / daily)",
            format!("{} / {}", s.hourly_blocked_origins, s.daily_blocked_origins),
        ),
        (
            "Blocked IPs (hourly / daily)",
            format!("{} / {}", s.hourly_blocked_ips, s.daily_blocked_ips),
        ),
        (
            "Sliding window",
            format!(
                "{} min into hour, prev weight {:.2}",
                window.minutes_into_hour, window.previous_hour_weight
            ),
        ),
        (
            "Until reset",
            format!(
                "hourly {}m {}s, daily {:.1}h",
                reset.hourly_minutes, reset.hourly_seconds, reset.daily_hours
            ),
        ),
    ];
    let mut out = String::from(r#"    <div class="cards">"#);
    for (label, value) in cards {
        out.push_str(&format!(
            r#"<div class="card"><div class="card-value">{}</div><div class="card-label">{label}</div></div>"#,
            page::escape(&value),
        ));
    }
    out.push_str("</div>");
    out
}

fn config_table(status: &RateLimitStatus) -> String {
    let c = &status.config;
    let limit = |v: Option<i64>| v.map_or_else(|| "unlimited".to_string(), |l| l.to_string());
    format!(
        r#"    <h2 class="section-heading">Configured Limits</h2>
    <table>
      <thead><tr><th>Origin / Hour</th><th>Origin / Day</th><th>IP / Hour</th><th>IP / Day</th><th>Poll Interval (ms)</th></tr></thead>
      <tbody><tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr></tbody>
    </table>"#,
        limit(c.origin_rate_limit_per_hour),
        limit(c.origin_rate_limit_per_day),
        limit(c.ip_rate_limit_per_hour),
        limit(c.ip_rate_limit_per_day),
        limit(c.rate_limit_poll_interval),
    )
}

fn counters_table(
    table_id: &str,
    heading: &str,
    entries: &std::collections::BTreeMap<String, RateLimitCounters>,
    hourly_limit: Option<i64>,
    daily_limit: Option<i64>,
) -> String {
    if entries.is_empty() {
        return format!(
            r#"    <h2 class="section-heading">{heading}</h2>
    <p class="message">Nothing tracked in the current window.</p>"#
        );
    }

    let mut rows = String::new();
    for (key, c) in entries {
        let row_class = if c.hourly_blocked || c.daily_blocked {
            r#" class="status-error""#
        } else {
            ""
        };
        rows.push_str(&format!(
            "          <tr{row_class}><td>{key}</td><td data-value=\"{ch}\">{ch}</td><td data-value=\"{ph}\">{ph}</td><td data-value=\"{eff}\">{eff} ({hp})</td><td data-value=\"{daily}\">{daily} ({dp})</td><td>{blocked}</td></tr>\n",
            key = page::escape(key),
            ch = c.current_hour,
            ph = c.previous_hour,
            eff = c.effective_hourly,
            hp = percent_of(c.effective_hourly, hourly_limit),
            daily = c.daily,
            dp = percent_of(c.daily, daily_limit),
            blocked = blocked_label(c),
        ));
    }

    format!(
        r#"    <h2 class="section-heading">{heading}</h2>
    <table id="{table_id}">
      <thead>
        <tr>
          <th data-sort="string">Key</th>
          <th data-sort="number">Current Hour</th>
          <th data-sort="number">Previous Hour</th>
          <th data-sort="number">Effective Hourly</th>
          <th data-sort="number">Daily</th>
          <th data-sort="string">Blocked</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>"#
    )
}

/// Usage as a percentage of a limit, or a dash when no limit applies.
fn percent_of(value: i64, limit: Option<i64>) -> String {
    match limit {
        Some(l) if l > 0 => format!("{:.1}%", value as f64 / l as f64 * 100.0),
        _ => "-".to_string(),
    }
}

fn blocked_label(c: &RateLimitCounters) -> &'static str {
    match (c.hourly_blocked, c.daily_blocked) {
        (true, true) => "hourly + daily",
        (true, false) => "hourly",
        (false, true) => "daily",
        (false, false) => "no",
    }
}

fn format_millis(ms: Option<i64>) -> String {
    match ms.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "N/A".to_string(),
    }
}

const RATE_LIMIT_STYLE: &str = r#"
.section-heading { padding: 0px 20px; }
.cards { display: flex; flex-wrap: wrap; gap: 15px; padding: 0px 20px; }
.card { border: 1px solid #ddd; border-radius: 5px; padding: 15px 20px; min-width: 180px; background-color: #f9f9f9; }
.card-value { font-size: 22px; font-weight: bold; color: #333; }
.card-label { font-size: 13px; color: #666; margin-top: 5px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_needs_a_positive_limit() {
        assert_eq!(percent_of(50, Some(200)), "25.0%");
        assert_eq!(percent_of(50, None), "-");
        assert_eq!(percent_of(50, Some(0)), "-");
    }

    #[test]
    fn blocked_entries_are_tinted() {
        let mut entries = std::collections::BTreeMap::new();
        entries.insert(
            "1.2.3.4".to_string(),
            RateLimitCounters {
                current_hour: 900,
                hourly_blocked: true,
                ..Default::default()
            },
        );
        let html = counters_table("ipTable", "IP Addresses", &entries, Some(1000), None);
        assert!(html.contains(r#"class="status-error""#));
        assert!(html.contains("hourly</td>"));
    }

    #[test]
    fn empty_sections_say_so() {
        let entries = std::collections::BTreeMap::new();
        let html = counters_table("originTable", "Origins", &entries, None, None);
        assert!(html.contains("Nothing tracked"));
        assert!(!html.contains("<table"));
    }
}
