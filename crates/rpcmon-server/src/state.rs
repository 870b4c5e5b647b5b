use std::sync::Arc;

use rpcmon_common::config::DashboardConfig;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub http: reqwest::Client,
    pub config: Arc<DashboardConfig>,
}
