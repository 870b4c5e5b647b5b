//! Reshaping of hourly history rows into chart series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

/// One chart trace: parallel timestamp/count vectors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Series {
    pub timestamps: Vec<String>,
    pub counts: Vec<i64>,
}

/// RFC 3339 rendering of an epoch-seconds hour bucket, millisecond precision
/// to match what the charts' date axis expects.
pub fn hour_to_rfc3339(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Group `(key, hour, count)` rows into one series per key, keeping only the
/// hours each key actually has data for. Series are returned in `order`; keys
/// absent from the rows still get an empty series so trace ranking stays
/// aligned with the query's top-N list.
pub fn group_series(rows: &[(String, i64, i64)], order: &[String]) -> Vec<(String, Series)> {
    let mut by_key: BTreeMap<&str, Series> = BTreeMap::new();
    for (key, hour, count) in rows {
        let series = by_key.entry(key.as_str()).or_default();
        series.timestamps.push(hour_to_rfc3339(*hour));
        series.counts.push(*count);
    }
    order
        .iter()
        .map(|key| (key.clone(), by_key.remove(key.as_str()).unwrap_or_default()))
        .collect()
}

/// Like [`group_series`], but every series spans the union of observed hours,
/// with zeroes filled in for hours a key has no row for. Keeps traces
/// comparable when origins are active at different times.
pub fn pivot_zero_filled(rows: &[(String, i64, i64)], order: &[String]) -> Vec<(String, Series)> {
    let mut hours: BTreeSet<i64> = BTreeSet::new();
    let mut by_key: BTreeMap<&str, BTreeMap<i64, i64>> = BTreeMap::new();
    for (key, hour, count) in rows {
        hours.insert(*hour);
        by_key.entry(key.as_str()).or_default().insert(*hour, *count);
    }

    let timestamps: Vec<String> = hours.iter().map(|h| hour_to_rfc3339(*h)).collect();

    order
        .iter()
        .map(|key| {
            let counts_by_hour = by_key.get(key.as_str());
            let counts = hours
                .iter()
                .map(|h| counts_by_hour.and_then(|m| m.get(h)).copied().unwrap_or(0))
                .collect();
            (
                key.clone(),
                Series {
                    timestamps: timestamps.clone(),
                    counts,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(String, i64, i64)> {
        vec![
            ("a.example".into(), 3600, 10),
            ("b.example".into(), 3600, 5),
            ("a.example".into(), 7200, 20),
            ("b.example".into(), 10800, 7),
        ]
    }

    #[test]
    fn epoch_renders_as_utc_millis() {
        assert_eq!(hour_to_rfc3339(3600), "1970-01-01T01:00:00.000Z");
    }

    #[test]
    fn grouping_keeps_only_observed_hours() {
        let order = vec!["a.example".to_string(), "b.example".to_string()];
        let series = group_series(&rows(), &order);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "a.example");
        assert_eq!(series[0].1.counts, vec![10, 20]);
        assert_eq!(series[1].1.counts, vec![5, 7]);
        assert_eq!(series[1].1.timestamps.len(), 2);
    }

    #[test]
    fn grouping_respects_requested_order() {
        let order = vec!["b.example".to_string(), "a.example".to_string()];
        let series = group_series(&rows(), &order);
        assert_eq!(series[0].0, "b.example");
        assert_eq!(series[1].0, "a.example");
    }

    #[test]
    fn missing_key_gets_empty_series() {
        let order = vec!["c.example".to_string()];
        let series = group_series(&rows(), &order);
        assert!(series[0].1.counts.is_empty());
    }

    #[test]
    fn zero_fill_spans_union_of_hours() {
        let order = vec!["a.example".to_string(), "b.example".to_string()];
        let series = pivot_zero_filled(&rows(), &order);
        // Union is 3600, 7200, 10800 for every trace.
        assert_eq!(series[0].1.timestamps.len(), 3);
        assert_eq!(series[0].1.counts, vec![10, 20, 0]);
        assert_eq!(series[1].1.counts, vec![5, 0, 7]);
        assert_eq!(series[0].1.timestamps, series[1].1.timestamps);
    }

    #[test]
    fn zero_fill_hours_are_sorted() {
        let unordered = vec![
            ("x".to_string(), 7200, 2),
            ("x".to_string(), 3600, 1),
        ];
        let series = pivot_zero_filled(&unordered, &["x".to_string()]);
        assert_eq!(series[0].1.counts, vec![1, 2]);
    }
}
