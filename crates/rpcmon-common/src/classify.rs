//! Status classification for proxied RPC log records.
//!
//! A record's `status` field is heterogeneous: the literal `"success"`, a
//! stringified JSON-RPC error object, or a free-text error/timeout message.
//! Classification drives row tinting and error counting on the log pages.

use serde_json::Value;

/// Outcome of classifying a log record's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogClass {
    Success,
    /// Timeouts and `-69xx` provider-throttle codes: worth seeing, not fatal.
    Warning,
    Error,
    /// Codes on the ignore-list are suppressed entirely.
    Ignored,
}

impl LogClass {
    /// CSS class applied to the table row.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogClass::Success => "status-success",
            LogClass::Warning => "status-warning",
            LogClass::Error => "status-error",
            LogClass::Ignored => "",
        }
    }
}

/// Classify a raw status string.
///
/// The match on `"success"` is exact and case-sensitive; upstream always
/// emits it lowercased and anything else must not slip through as healthy.
pub fn classify(status: &str, ignored_codes: &[i64]) -> LogClass {
    if status == "success" {
        return LogClass::Success;
    }

    if let Ok(value) = serde_json::from_str::<Value>(status) {
        if let Some(code) = error_code(&value) {
            if ignored_codes.contains(&code) {
                return LogClass::Ignored;
            }
            if is_throttle_code(code) {
                return LogClass::Warning;
            }
            return LogClass::Error;
        }
    }

    if status.to_lowercase().contains("timeout") {
        if let Some(code) = embedded_code(status) {
            if ignored_codes.contains(&code) {
                return LogClass::Ignored;
            }
        }
        return LogClass::Warning;
    }

    LogClass::Error
}

/// Extract a numeric error code from a parsed status object.
///
/// Accepts both the JSON-RPC shape `{"error":{"code":-32000}}` and a bare
/// top-level `{"code":...}`.
fn error_code(value: &Value) -> Option<i64> {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(Value::as_i64)
        .or_else(|| value.get("code").and_then(Value::as_i64))
}

/// Provider throttle codes follow a `-69xxx` numbering convention.
fn is_throttle_code(code: i64) -> bool {
    code.to_string().starts_with("-69")
}

/// First signed integer embedded in a free-text status, if any.
fn embedded_code(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() || (bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            let start = i;
            if bytes[i] == b'-' {
                i += 1;
            }
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if let Ok(code) = text[start..i].parse() {
                return Some(code);
            }
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_success_is_exact() {
        assert_eq!(classify("success", &[]), LogClass::Success);
        assert_eq!(classify("Success", &[]), LogClass::Error);
        assert_eq!(classify("SUCCESS", &[]), LogClass::Error);
    }

    #[test]
    fn throttle_code_is_warning() {
        assert_eq!(
            classify(r#"{"error":{"code":-69001,"message":"rate limited"}}"#, &[]),
            LogClass::Warning
        );
    }

    #[test]
    fn rpc_error_code_is_error() {
        assert_eq!(
            classify(r#"{"error":{"code":-32000,"message":"execution reverted"}}"#, &[]),
            LogClass::Error
        );
    }

    #[test]
    fn top_level_code_is_recognized() {
        assert_eq!(classify(r#"{"code":-32601}"#, &[]), LogClass::Error);
    }

    #[test]
    fn ignored_code_suppresses_flagging() {
        assert_eq!(classify(r#"{"code":-32601}"#, &[-32601]), LogClass::Ignored);
        // Suppression wins even over the throttle prefix.
        assert_eq!(classify(r#"{"error":{"code":-69001}}"#, &[-69001]), LogClass::Ignored);
    }

    #[test]
    fn timeout_text_is_warning_case_insensitive() {
        assert_eq!(classify("connection timeout after 5000ms", &[]), LogClass::Warning);
        assert_eq!(classify("Request TIMEOUT", &[]), LogClass::Warning);
    }

    #[test]
    fn timeout_with_ignored_embedded_code() {
        assert_eq!(classify("timeout (code -32042)", &[-32042]), LogClass::Ignored);
        assert_eq!(classify("timeout (code -32042)", &[]), LogClass::Warning);
    }

    #[test]
    fn free_text_falls_back_to_error() {
        assert_eq!(classify("connection refused", &[]), LogClass::Error);
        assert_eq!(classify("", &[]), LogClass::Error);
    }

    #[test]
    fn embedded_code_finds_first_signed_integer() {
        assert_eq!(embedded_code("timed out after -69003"), Some(-69003));
        assert_eq!(embedded_code("took 5000 ms"), Some(5000));
        assert_eq!(embedded_code("no digits here"), None);
    }
}
