use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

mod blacklist;
mod cache;
mod dashboard;
mod fallback;
mod geo;
mod iptable;
mod logs;
mod nodes;
mod points;
mod ratelimit;
mod requestors;
mod timeseries;

use crate::render::page;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .merge(blacklist::router())
        .merge(cache::router())
        .merge(dashboard::router())
        .merge(fallback::router())
        .merge(geo::router())
        .merge(iptable::router())
        .merge(logs::router())
        .merge(nodes::router())
        .merge(points::router())
        .merge(ratelimit::router())
        .merge(requestors::router())
        .merge(timeseries::router())
}

async fn health_check() -> &'static str {
    "OK"
}

/// A page handler failure, rendered as the standard error document.
pub struct PageError {
    title: String,
    message: String,
    hint: String,
}

impl PageError {
    /// Log the failure and wrap it with the default refresh hint.
    pub fn internal(title: &str, err: anyhow::Error) -> Self {
        tracing::error!(page = title, "Page request failed: {err:#}");
        Self {
            title: title.to_string(),
            message: err.to_string(),
            hint: "Please try refreshing the page.".to_string(),
        }
    }

    pub fn with_hint(title: &str, hint: &str, err: anyhow::Error) -> Self {
        let mut e = Self::internal(title, err);
        e.hint = hint.to_string();
        e
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(page::error_page(&self.title, &self.message, &self.hint)),
        )
            .into_response()
    }
}

pub type PageResult<T = Html<String>> = Result<T, PageError>;
