use anyhow::Result;
use rpcmon_common::config::DashboardConfig;

pub fn load() -> Result<DashboardConfig> {
    let mut config = DashboardConfig::default();

    // Override from environment variables
    if let Ok(v) = std::env::var("RPCMON_LISTEN_ADDR") {
        config.listen_addr = v;
    }
    if let Ok(v) = std::env::var("RPCMON_LOG_LEVEL") {
        config.log_level = v;
    }
    if let Ok(v) = std::env::var("DATABASE_URL") {
        config.database_url = v;
    }
    if let Ok(v) = std::env::var("RPCMON_DB_MAX_CONNECTIONS") {
        config.db_max_connections = v.parse().unwrap_or(10);
    }
    if let Ok(v) = std::env::var("RPCMON_LOGS_BASE_URL") {
        config.logs_base_url = v;
    }
    if let Ok(v) = std::env::var("RPCMON_CACHE_BASE_URL") {
        config.cache_base_url = v;
    }
    if let Ok(v) = std::env::var("RPCMON_POOL_BASE_URL") {
        config.pool_base_url = v;
    }
    if let Ok(v) = std::env::var("RPC_PROXY_HOST") {
        config.proxy_base_url = v;
    }
    if let Ok(v) = std::env::var("RPC_PROXY_ADMIN_KEY") {
        config.proxy_admin_key = v;
    }
    if let Ok(v) = std::env::var("PRO_IP_KEY") {
        config.ip_api_key = v;
    }
    if let Ok(v) = std::env::var("FALLBACK_URL") {
        config.fallback_url = v;
    }
    if let Ok(v) = std::env::var("RPCMON_LOG_ITEMS_PER_PAGE") {
        config.log_items_per_page = v.parse().unwrap_or(30);
    }
    if let Ok(v) = std::env::var("RPCMON_MODAL_CHAR_LIMIT") {
        config.modal_char_limit = v.parse().unwrap_or(200);
    }
    if let Ok(v) = std::env::var("RPCMON_IGNORED_ERROR_CODES") {
        config.ignored_error_codes = v
            .split(',')
            .filter_map(|c| c.trim().parse().ok())
            .collect();
    }

    Ok(config)
}
