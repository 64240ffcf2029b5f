//! Protobuf JSON duration parsing

/// Parse a duration such as `"1.230s"` into seconds
///
/// Cloud Speech REST responses encode word offsets as strings with an `s`
/// suffix; some proxies return bare numbers instead, which parse unchanged.
#[must_use]
pub fn parse_duration_secs(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('s').unwrap_or(trimmed);
    number.parse::<f64>().ok().filter(|secs| secs.is_finite())
}

/// Parse a duration that may arrive as a JSON string or a JSON number
#[must_use]
pub fn duration_value_secs(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::String(s) => parse_duration_secs(s),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
