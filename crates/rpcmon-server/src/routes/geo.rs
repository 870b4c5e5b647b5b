use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new().route("/iplookup", get(ip_lookup))
}

#[derive(Deserialize)]
struct IpQuery {
    ip: Option<String>,
}

/// Geolocation lookup relay; the upstream key never reaches the client.
async fn ip_lookup(
    State(state): State<AppState>,
    Query(query): Query<IpQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let ip = match query.ip.as_deref() {
        Some(ip) if !ip.is_empty() => ip,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing ip",
                    "message": "Provide an address via the ip query parameter.",
                })),
            ))
        }
    };

    upstream::geo::lookup_ip(&state, ip).await.map(Json).map_err(|e| {
        tracing::error!(ip, "IP lookup failed: {e:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "IP lookup failed", "message": e.to_string() })),
        )
    })
}
