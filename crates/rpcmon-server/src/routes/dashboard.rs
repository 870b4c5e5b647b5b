use axum::{
    extract::State,
    response::Html,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use rpcmon_common::metrics::{
    ERROR_AXIS_MAX, ERROR_METRICS, PERFORMANCE_AXIS_MAX, PERFORMANCE_METRICS, TIME_AXIS_MAX,
    TIME_METRICS,
};

use crate::render::{page, plotly};
use crate::routes::{PageError, PageResult};
use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_page))
}

async fn dashboard_page(State(state): State<AppState>) -> PageResult {
    let data = upstream::logs::fetch_dashboard_metrics(&state)
        .await
        .map_err(|e| PageError::internal("Dashboard Data", e))?;

    let mut gauges: Vec<Value> = Vec::new();

    // Performance counters only render when present; the time and error
    // gauges always render, reading zero when the counter is missing.
    let performance = gauge_section(&data, PERFORMANCE_METRICS, PERFORMANCE_AXIS_MAX, false, &mut gauges);
    let times = gauge_section(&data, TIME_METRICS, TIME_AXIS_MAX, true, &mut gauges);
    let errors = gauge_section(&data, ERROR_METRICS, ERROR_AXIS_MAX, true, &mut gauges);

    let script = format!(
        "<script>\nconst gauges = {};\n{}\n</script>",
        page::script_safe_json(&gauges),
        DRAW_GAUGES_JS,
    );

    let body = format!(
        r#"    <h1>RPC Dashboard</h1>
    <h2 class="section-title">Requests Last Hour</h2>
    <div class="dashboard">{performance}</div>
    <h2 class="section-title">Average Response Times (ms)</h2>
    <div class="dashboard">{times}</div>
    <h2 class="section-title">Errors Last Hour</h2>
    <div class="dashboard">{errors}</div>
{script}"#
    );

    Ok(Html(page::document(
        "RPC Dashboard",
        &[page::BASE_STYLE, DASHBOARD_STYLE],
        page::PLOTLY_CDN,
        &body,
    )))
}

/// Emit the gauge container divs for one metric group and collect their
/// Plotly payloads. Returns the div markup.
fn gauge_section(
    data: &serde_json::Map<String, Value>,
    keys: &[&str],
    axis_max: f64,
    always: bool,
    gauges: &mut Vec<Value>,
) -> String {
    let mut divs = String::new();
    for key in keys {
        let value = data.get(*key).and_then(Value::as_f64);
        if value.is_none() && !always {
            continue;
        }
        let id = format!("gauge{}", gauges.len() + 1);
        divs.push_str(&format!(r#"<div id="{id}" class="gauge"></div>"#));
        gauges.push(json!({
            "id": id,
            "data": plotly::gauge(key, value.unwrap_or(0.0), axis_max),
        }));
    }
    divs
}

const DASHBOARD_STYLE: &str = r#"
.section-title { padding: 0px 20px; }
.dashboard { display: flex; flex-wrap: wrap; gap: 10px; padding: 0px 20px; }
.gauge { flex: 1; min-width: 300px; height: 300px; }
"#;

const DRAW_GAUGES_JS: &str = r#"const layout = {
  margin: { t: 50, b: 25, l: 25, r: 25 },
  paper_bgcolor: "white",
  font: { size: 12 }
};
gauges.forEach(g => Plotly.newPlot(g.id, [g.data], layout, { responsive: true }));"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_performance_counters_are_skipped() {
        let data = serde_json::from_str::<serde_json::Map<String, Value>>(
            r#"{"nTotalRequestsLastHour": 250}"#,
        )
        .unwrap();
        let mut gauges = Vec::new();
        let divs = gauge_section(&data, PERFORMANCE_METRICS, PERFORMANCE_AXIS_MAX, false, &mut gauges);
        assert_eq!(gauges.len(), 1);
        assert!(divs.contains(r#"id="gauge1""#));
        assert!(!divs.contains("gauge2"));
    }

    #[test]
    fn error_gauges_default_to_zero() {
        let data = serde_json::Map::new();
        let mut gauges = Vec::new();
        gauge_section(&data, ERROR_METRICS, ERROR_AXIS_MAX, true, &mut gauges);
        assert_eq!(gauges.len(), ERROR_METRICS.len());
        assert_eq!(gauges[0]["data"]["value"], 0.0);
    }

    #[test]
    fn gauge_ids_keep_counting_across_sections() {
        let data = serde_json::from_str::<serde_json::Map<String, Value>>(
            r#"{"nTotalRequestsLastHour": 1, "nCacheRequestsLastHour": 2}"#,
        )
        .unwrap();
        let mut gauges = Vec::new();
        gauge_section(&data, PERFORMANCE_METRICS, PERFORMANCE_AXIS_MAX, false, &mut gauges);
        let times = gauge_section(&data, TIME_METRICS, TIME_AXIS_MAX, true, &mut gauges);
        assert!(times.contains(r#"id="gauge3""#));
    }
}
