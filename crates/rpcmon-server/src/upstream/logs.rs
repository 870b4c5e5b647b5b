use anyhow::Result;
use rpcmon_common::models::{LogRecord, RequestorStats};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::state::AppState;

/// Fetch a log set from the aggregator, newest entries first.
///
/// A failed or malformed response degrades to an empty set so one broken
/// upstream does not take down the whole logs page.
pub async fn fetch_logs(state: &AppState, path: &str) -> Vec<LogRecord> {
    let url = format!("{}{}", state.config.logs_base_url, path);
    match fetch_log_array(state, &url).await {
        Ok(mut records) => {
            records.reverse();
            records
        }
        Err(e) => {
            tracing::warn!(url = %url, "Failed to fetch logs: {e:#}");
            Vec::new()
        }
    }
}

async fn fetch_log_array(state: &AppState, url: &str) -> Result<Vec<LogRecord>> {
    let body: Value = state.http.get(url).send().await?.json().await?;
    // Anything that is not an array counts as no data.
    let Value::Array(items) = body else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Pre-aggregated dashboard metrics: flat map of metric name to number.
pub async fn fetch_dashboard_metrics(state: &AppState) -> Result<serde_json::Map<String, Value>> {
    let url = format!("{}/dashboard", state.config.logs_base_url);
    let body: Value = state.http.get(&url).send().await?.json().await?;
    match body {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("dashboard metrics response is not an object"),
    }
}

/// Per-domain request counters.
pub async fn fetch_requestor_table(state: &AppState) -> Result<BTreeMap<String, RequestorStats>> {
    let url = format!("{}/requestorTable", state.config.logs_base_url);
    let table = state.http.get(&url).send().await?.json().await?;
    Ok(table)
}
