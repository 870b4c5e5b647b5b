pub mod classify;
pub mod config;
pub mod metrics;
pub mod models;
pub mod paging;
pub mod series;
