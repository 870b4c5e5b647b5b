use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::state::AppState;

/// Look up geolocation info for an IP via the ip-api.com pro service.
pub async fn lookup_ip(state: &AppState, ip: &str) -> Result<Value> {
    if state.config.ip_api_key.is_empty() {
        anyhow::bail!("PRO_IP_KEY is not configured");
    }

    let url = format!("https://pro.ip-api.com/json/{ip}");
    let body: Value = state
        .http
        .get(&url)
        .query(&[("key", state.config.ip_api_key.as_str())])
        .timeout(Duration::from_secs(5))
        .send()
        .await?
        .json()
        .await?;

    if body.get("status").and_then(Value::as_str) == Some("fail") {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("IP lookup failed");
        anyhow::bail!("{message}");
    }

    Ok(body)
}
