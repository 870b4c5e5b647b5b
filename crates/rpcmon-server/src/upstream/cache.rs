use std::collections::BTreeMap;

use anyhow::Result;
use rpcmon_common::models::CacheEntry;

use crate::state::AppState;

/// The cache server's full map: `method:params-hash` key to cached entry.
pub async fn fetch_cache_map(state: &AppState) -> Result<BTreeMap<String, CacheEntry>> {
    let url = format!("{}/cacheMap", state.config.cache_base_url);
    let map = state.http.get(&url).send().await?.error_for_status()?.json().await?;
    Ok(map)
}
