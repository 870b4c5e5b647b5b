//! HTTP clients for the backend services the dashboard reads from.

pub mod cache;
pub mod geo;
pub mod logs;
pub mod pool;
pub mod proxy;
