/// Rounds a statistic for display.
///
/// Values below 1 keep exactly one decimal digit so very quiet hours stay
/// visible (0.1 instead of 0); everything else rounds to the nearest integer.
/// Non-finite input formats to 0.0.
pub fn format_number(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value < 1.0 {
        (value * 10.0).round() / 10.0
    } else {
        value.round()
    }
}

/// Returns `part / total`, or 0.0 when `total` is not positive.
pub fn ratio(part: f64, total: f64) -> f64 {
    if total > 0.0 { part / total } else { 0.0 }
}

/// Computes the rounded median of `values`, sorting them in place.
/// Returns 0.0 for empty input.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        ((values[mid - 1] + values[mid]) / 2.0).round()
    } else {
        values[mid].round()
    }
}
