use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use rpcmon_common::series;

use crate::db;
use crate::render::{page, plotly};
use crate::routes::{PageError, PageResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/iptimeseries", get(ip_timeseries_page))
        .route("/origintimeseries", get(origin_timeseries_page))
}

#[derive(Deserialize)]
struct DaysQuery {
    days: Option<i64>,
}

const DAY_CHOICES: &[i64] = &[1, 3, 7, 14, 30];

/// Hourly request counts for the top 20 IPs, one trace each.
async fn ip_timeseries_page(
    State(state): State<AppState>,
    Query(query): Query<DaysQuery>,
) -> PageResult {
    let days = query.days.unwrap_or(7).clamp(1, 365);

    let ips = db::ip_history::top_ips(&state.pool, days, 20)
        .await
        .map_err(|e| PageError::internal("IP Timeseries", e))?;
    if ips.is_empty() {
        return Ok(Html(page::empty_page(
            "IP Request Timeseries",
            "Request Count Over Time by IP",
            &format!("No request history recorded in the last {days} day(s)."),
        )));
    }

    let rows = db::ip_history::ip_timeseries(&state.pool, days, &ips)
        .await
        .map_err(|e| PageError::internal("IP Timeseries", e))?;
    let tuples: Vec<(String, i64, i64)> = rows
        .into_iter()
        .map(|r| (r.ip, r.hour_timestamp, r.request_count))
        .collect();
    let traces = plotly::line_traces(&series::group_series(&tuples, &ips), false);

    let layout = json!({
        "title": { "text": "Request Count Over Time by IP" },
        "xaxis": { "title": { "text": "Time" }, "type": "date" },
        "yaxis": { "title": { "text": "Requests per Hour" }, "rangemode": "tozero" },
        "hovermode": "closest",
        "legend": { "orientation": "v", "x": 1.02, "y": 1 },
        "margin": { "t": 60, "r": 200 }
    });

    let body = format!(
        r#"    <h1>IP Request Timeseries</h1>
    <p class="stats">Top {count} IPs by request volume over the last {days} day(s)</p>
    <div class="controls">{buttons}</div>
    <div id="timeseriesPlot" style="width: 100%; height: 650px;"></div>
    <script>
const traces = {traces};
const layout = {layout};
Plotly.newPlot('timeseriesPlot', traces, layout, {{ responsive: true }});
{nav}
    </script>"#,
        count = ips.len(),
        buttons = day_buttons(days),
        traces = page::script_safe_json(&traces),
        layout = page::script_safe_json(&layout),
        nav = day_buttons_script("/iptimeseries"),
    );

    Ok(Html(page::document(
        "IP Request Timeseries",
        &[page::BASE_STYLE, page::TIME_FILTER_STYLE],
        page::PLOTLY_CDN,
        &body,
    )))
}

/// Hourly request counts for the top 30 origins. Traces are zero-filled
/// across the window so ranked marker symbols read cleanly, and clicking a
/// legend entry opens a detail modal.
async fn origin_timeseries_page(
    State(state): State<AppState>,
    Query(query): Query<DaysQuery>,
) -> PageResult {
    let days = query.days.unwrap_or(1).clamp(1, 365);

    let origins = db::ip_history::top_origins(&state.pool, days, 30)
        .await
        .map_err(|e| PageError::internal("Origin Timeseries", e))?;
    if origins.is_empty() {
        return Ok(Html(page::empty_page(
            "Origin Request Timeseries",
            "Request Count Over Time by Origin",
            &format!("No request history recorded in the last {days} day(s)."),
        )));
    }

    let rows = db::ip_history::origin_timeseries(&state.pool, days, &origins)
        .await
        .map_err(|e| PageError::internal("Origin Timeseries", e))?;
    let tuples: Vec<(String, i64, i64)> = rows
        .into_iter()
        .map(|r| (r.origin, r.hour_timestamp, r.request_count))
        .collect();
    let pivoted = series::pivot_zero_filled(&tuples, &origins);
    let traces = plotly::line_traces(&pivoted, true);

    let layout = json!({
        "title": { "text": "Request Count Over Time by Origin" },
        "xaxis": { "title": { "text": "Time" }, "type": "date" },
        "yaxis": { "title": { "text": "Requests per Hour" }, "rangemode": "tozero" },
        "hovermode": "closest",
        "legend": { "orientation": "v", "x": 1.02, "y": 1 },
        "margin": { "t": 60, "r": 250 }
    });

    let body = format!(
        r#"    <h1>Origin Request Timeseries</h1>
    <p class="stats">Top {count} origins by request volume over the last {days} day(s). Marker shape shows rank band: circle 1-10, square 11-20, diamond 21-30. Click a legend entry for details.</p>
    <div class="controls">{buttons}</div>
    <div id="timeseriesPlot" style="width: 100%; height: 700px;"></div>
{modal}
    <script>
const traces = {traces};
const layout = {layout};
Plotly.newPlot('timeseriesPlot', traces, layout, {{ responsive: true }}).then(attachLegendHandlers);
{nav}
{interactions}
    </script>"#,
        count = origins.len(),
        buttons = day_buttons(days),
        modal = page::MODAL_MARKUP,
        traces = page::script_safe_json(&traces),
        layout = page::script_safe_json(&layout),
        nav = day_buttons_script("/origintimeseries"),
        interactions = ORIGIN_LEGEND_JS,
    );

    Ok(Html(page::document(
        "Origin Request Timeseries",
        &[page::BASE_STYLE, page::TIME_FILTER_STYLE, page::MODAL_STYLE],
        page::PLOTLY_CDN,
        &body,
    )))
}

fn day_buttons(selected: i64) -> String {
    let mut out = String::new();
    for &d in DAY_CHOICES {
        let active = if d == selected { " active" } else { "" };
        let label = if d == 1 { "1 day".to_string() } else { format!("{d} days") };
        out.push_str(&format!(
            r#"<button class="time-filter-btn{active}" data-days="{d}">{label}</button>"#
        ));
    }
    out
}

fn day_buttons_script(path: &str) -> String {
    format!(
        r#"document.querySelectorAll('.time-filter-btn').forEach(btn => {{
  btn.addEventListener('click', () => {{
    window.location.href = '{path}?days=' + btn.getAttribute('data-days');
  }});
}});"#
    )
}

/// Legend clicks open a summary modal instead of toggling the trace.
const ORIGIN_LEGEND_JS: &str = r#"function attachLegendHandlers(gd) {
  gd.on('plotly_legendclick', function(event) {
    const trace = traces[event.curveNumber];
    const total = trace.y.reduce((a, b) => a + b, 0);
    const active = trace.y.filter(v => v > 0).length;
    const peak = Math.max(0, ...trace.y);
    const avg = trace.y.length > 0 ? (total / trace.y.length).toFixed(1) : '0';
    const content = document.getElementById('modalContent');
    content.innerHTML =
      '<h2></h2>' +
      '<table style="width:auto"><tbody>' +
      '<tr><td>Total requests</td><td>' + total + '</td></tr>' +
      '<tr><td>Peak hour</td><td>' + peak + '</td></tr>' +
      '<tr><td>Active hours</td><td>' + active + ' of ' + trace.y.length + '</td></tr>' +
      '<tr><td>Average requests/hour</td><td>' + avg + '</td></tr>' +
      '</tbody></table>';
    content.querySelector('h2').textContent = trace.name;
    document.getElementById('objectModal').style.display = 'block';
    return false;
  });
}
function closeModal() {
  document.getElementById('objectModal').style.display = 'none';
}
window.addEventListener('click', function(event) {
  const modal = document.getElementById('objectModal');
  if (event.target === modal) { modal.style.display = 'none'; }
});
document.addEventListener('keydown', function(event) {
  if (event.key === 'Escape') { closeModal(); }
});"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_day_button_is_active() {
        let buttons = day_buttons(7);
        assert!(buttons.contains(r#"class="time-filter-btn active" data-days="7""#));
        assert!(buttons.contains(r#"class="time-filter-btn" data-days="1""#));
    }

    #[test]
    fn buttons_cover_all_ranges() {
        let buttons = day_buttons(1);
        for d in DAY_CHOICES {
            assert!(buttons.contains(&format!(r#"data-days="{d}""#)));
        }
    }

    #[test]
    fn navigation_targets_the_given_path() {
        let script = day_buttons_script("/origintimeseries");
        assert!(script.contains("'/origintimeseries?days='"));
    }

    #[test]
    fn legend_modal_averages_over_the_whole_window() {
        assert!(ORIGIN_LEGEND_JS.contains("total / trace.y.length"));
        assert!(ORIGIN_LEGEND_JS.contains("Average requests/hour"));
    }
}
