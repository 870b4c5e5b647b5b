//! Dashboard gauge definitions and metric-name formatting.

/// Performance counters rendered first, in this exact order.
pub const PERFORMANCE_METRICS: &[&str] = &[
    "nTotalRequestsLastHour",
    "nCacheRequestsLastHour",
    "nPoolRequestsLastHour",
    "nFallbackRequestsLastHour",
];

/// Average response-time metrics (milliseconds).
pub const TIME_METRICS: &[&str] = &[
    "aveCacheRequestTimeLastHour",
    "avePoolRequestTimeLastHour",
    "aveFallbackRequestTimeLastHour",
];

/// Error counters.
pub const ERROR_METRICS: &[&str] = &[
    "nErrorCacheRequestsLastHour",
    "nErrorPoolRequestsLastHour",
    "nErrorFallbackRequestsLastHour",
];

pub const PERFORMANCE_AXIS_MAX: f64 = 1000.0;
pub const TIME_AXIS_MAX: f64 = 300.0;
pub const ERROR_AXIS_MAX: f64 = 50.0;

/// Gauge bar color keyed off the metric name: total is blue, cache purple,
/// pool orange, fallback green.
pub fn bar_color(metric: &str) -> &'static str {
    let lower = metric.to_lowercase();
    if lower.contains("total") {
        "#1f77b4"
    } else if lower.contains("cache") {
        "#9370db"
    } else if lower.contains("pool") {
        "#ff7f0e"
    } else {
        "#2ca02c"
    }
}

/// Turn a camel-cased metric id into a display title.
///
/// The leading `n` counter prefix is dropped unless the name is an `ave`
/// average; the remainder splits on uppercase runs and digit runs, and the
/// `ave` prefix itself becomes the word `Ave`.
pub fn format_metric_name(name: &str) -> String {
    let stripped = if name.contains("ave") {
        name
    } else {
        name.strip_prefix('n').unwrap_or(name)
    };

    let chars: Vec<char> = stripped.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_uppercase() {
            let mut word = String::new();
            word.push(chars[i]);
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                word.push(chars[i]);
                i += 1;
            }
            words.push(word);
        } else if chars[i].is_ascii_digit() {
            let mut word = String::new();
            while i < chars.len() && chars[i].is_ascii_digit() {
                word.push(chars[i]);
                i += 1;
            }
            words.push(word);
        } else if stripped[char_offset(&chars, i)..].starts_with("ave") {
            words.push("Ave".to_string());
            i += 3;
        } else {
            i += 1;
        }
    }
    words.join(" ")
}

fn char_offset(chars: &[char], idx: usize) -> usize {
    chars[..idx].iter().map(|c| c.len_utf8()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_prefix_is_dropped() {
        assert_eq!(format_metric_name("nTotalRequestsLastHour"), "Total Requests Last Hour");
        assert_eq!(format_metric_name("nErrorCacheRequestsLastHour"), "Error Cache Requests Last Hour");
    }

    #[test]
    fn average_prefix_is_kept_as_a_word() {
        assert_eq!(
            format_metric_name("aveCacheRequestTimeLastHour"),
            "Ave Cache Request Time Last Hour"
        );
        assert_eq!(
            format_metric_name("aveFallbackRequestTimeLastHour"),
            "Ave Fallback Request Time Last Hour"
        );
    }

    #[test]
    fn digit_runs_become_words() {
        assert_eq!(format_metric_name("nRequestsLast24Hours"), "Requests Last 24 Hours");
    }

    #[test]
    fn colors_follow_metric_keywords() {
        assert_eq!(bar_color("nTotalRequestsLastHour"), "#1f77b4");
        assert_eq!(bar_color("nCacheRequestsLastHour"), "#9370db");
        assert_eq!(bar_color("avePoolRequestTimeLastHour"), "#ff7f0e");
        assert_eq!(bar_color("nFallbackRequestsLastHour"), "#2ca02c");
    }
}
