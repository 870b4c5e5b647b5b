use rpcmon_common::metrics;
use rpcmon_common::series::Series;
use serde_json::{json, Value};

/// Trace colors, cycled by rank.
pub const TRACE_PALETTE: [&str; 30] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
    "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5",
    "#c49c94", "#f7b6d2", "#c7c7c7", "#dbdb8d", "#9edae5",
    "#e377c2", "#7f7f7f", "#bcbd22", "#17becf", "#1f77b4",
    "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

/// A gauge indicator for one dashboard metric.
pub fn gauge(metric: &str, value: f64, axis_max: f64) -> Value {
    json!({
        "type": "indicator",
        "mode": "gauge+number",
        "value": value,
        "title": {
            "text": metrics::format_metric_name(metric),
            "font": { "size": 22 }
        },
        "gauge": {
            "axis": { "range": [0, axis_max] },
            "bar": { "color": metrics::bar_color(metric) },
            "bgcolor": "white",
            "borderwidth": 2,
            "bordercolor": "#ccc"
        }
    })
}

/// Marker symbol by trace rank: top ten circles, next ten squares, the
/// rest diamonds.
pub fn marker_symbol(rank: usize) -> &'static str {
    match rank {
        0..=9 => "circle",
        10..=19 => "square",
        _ => "diamond",
    }
}

/// A scatter trace for one key's hourly series.
///
/// With `ranked_markers`, the trace gets its rank's symbol and hides markers
/// on zero-count hours (the origin chart); without, a plain thin line with
/// small markers (the IP chart).
pub fn line_trace(name: &str, series: &Series, rank: usize, ranked_markers: bool) -> Value {
    let color = TRACE_PALETTE[rank % TRACE_PALETTE.len()];
    if ranked_markers {
        let sizes: Vec<i64> = series.counts.iter().map(|&c| if c > 0 { 12 } else { 0 }).collect();
        json!({
            "name": name,
            "x": series.timestamps,
            "y": series.counts,
            "type": "scatter",
            "mode": "lines+markers",
            "line": { "color": color, "width": 3 },
            "marker": { "size": sizes, "symbol": marker_symbol(rank) },
            "hovertemplate": format!("<b>{name}</b><br>Requests: %{{y}}<extra></extra>")
        })
    } else {
        json!({
            "name": name,
            "x": series.timestamps,
            "y": series.counts,
            "type": "scatter",
            "mode": "lines+markers",
            "line": { "color": color, "width": 2 },
            "marker": { "size": 4 }
        })
    }
}

/// All traces for a chart, ranked in the order the series were supplied.
pub fn line_traces(series: &[(String, Series)], ranked_markers: bool) -> Value {
    Value::Array(
        series
            .iter()
            .enumerate()
            .map(|(rank, (name, s))| line_trace(name, s, rank, ranked_markers))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(counts: Vec<i64>) -> Series {
        Series {
            timestamps: counts.iter().map(|_| "1970-01-01T00:00:00.000Z".to_string()).collect(),
            counts,
        }
    }

    #[test]
    fn gauge_carries_value_color_and_axis() {
        let g = gauge("nCacheRequestsLastHour", 123.0, 1000.0);
        assert_eq!(g["value"], 123.0);
        assert_eq!(g["gauge"]["bar"]["color"], "#9370db");
        assert_eq!(g["gauge"]["axis"]["range"][1], 1000.0);
        assert_eq!(g["title"]["text"], "Cache Requests Last Hour");
    }

    #[test]
    fn symbols_follow_rank_bands() {
        assert_eq!(marker_symbol(0), "circle");
        assert_eq!(marker_symbol(9), "circle");
        assert_eq!(marker_symbol(10), "square");
        assert_eq!(marker_symbol(19), "square");
        assert_eq!(marker_symbol(20), "diamond");
    }

    #[test]
    fn ranked_trace_hides_zero_count_markers() {
        let trace = line_trace("a", &series(vec![5, 0, 2]), 0, true);
        assert_eq!(trace["marker"]["size"], serde_json::json!([12, 0, 12]));
        assert_eq!(trace["marker"]["symbol"], "circle");
    }

    #[test]
    fn plain_trace_uses_fixed_markers() {
        let trace = line_trace("a", &series(vec![5, 0]), 3, false);
        assert_eq!(trace["marker"]["size"], 4);
        assert_eq!(trace["line"]["width"], 2);
    }

    #[test]
    fn palette_cycles_past_thirty_traces() {
        let s = series(vec![1]);
        let t0 = line_trace("a", &s, 0, true);
        let t30 = line_trace("b", &s, 30, true);
        assert_eq!(t0["line"]["color"], t30["line"]["color"]);
    }
}
