use std::collections::BTreeMap;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use crate::state::AppState;

/// Connected pool nodes keyed by node id. Field sets vary between client
/// versions, so values stay as raw JSON and rendering is defensive.
pub async fn fetch_pool_nodes(state: &AppState) -> Result<BTreeMap<String, Value>> {
    let url = format!("{}/poolNodes", state.config.pool_base_url);
    let nodes = state.http.get(&url).send().await?.error_for_status()?.json().await?;
    Ok(nodes)
}

pub async fn fetch_node_continents(state: &AppState) -> Result<Value> {
    let url = format!("{}/nodeContinents", state.config.pool_base_url);
    let body = state.http.get(&url).send().await?.error_for_status()?.json().await?;
    Ok(body)
}

pub async fn fetch_rpc_site_stats(state: &AppState) -> Result<Value> {
    let url = format!("{}/rpcSiteStats", state.config.pool_base_url);
    let body = state.http.get(&url).send().await?.error_for_status()?.json().await?;
    Ok(body)
}

/// Forward a per-owner node query, relaying the coordinator's status and
/// body so its own error responses reach the caller unchanged.
pub async fn fetch_owner_nodes(state: &AppState, owner: &str) -> Result<(StatusCode, Value)> {
    let url = format!("{}/yournodes", state.config.pool_base_url);
    let response = state
        .http
        .get(&url)
        .query(&[("owner", owner)])
        .send()
        .await?;
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    Ok((status, body))
}
