use anyhow::{Context, Result};
use rpcmon_common::models::RateLimitStatus;
use serde_json::Value;

use crate::state::AppState;

const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

fn admin_config(state: &AppState) -> Result<(&str, &str)> {
    let base = state.config.proxy_base_url.as_str();
    let key = state.config.proxy_admin_key.as_str();
    if base.is_empty() || key.is_empty() {
        anyhow::bail!("RPC_PROXY_HOST or RPC_PROXY_ADMIN_KEY not configured");
    }
    Ok((base, key))
}

pub async fn fetch_rate_limit_status(state: &AppState) -> Result<RateLimitStatus> {
    let (base, key) = admin_config(state)?;
    let status = state
        .http
        .get(format!("{base}/ratelimitstatus"))
        .header(ADMIN_KEY_HEADER, key)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("rate limit status response did not parse")?;
    Ok(status)
}

pub async fn fetch_blacklist_status(state: &AppState) -> Result<Value> {
    let (base, key) = admin_config(state)?;
    let body = state
        .http
        .get(format!("{base}/blackliststatus"))
        .header(ADMIN_KEY_HEADER, key)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(body)
}
