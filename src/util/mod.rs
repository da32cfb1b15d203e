/// Parse free-text money input ("1,234.56", "$40", "12,5") into a number.
///
/// Everything except digits, comma, dot, and minus is stripped. When both
/// comma and dot are present, commas are thousands separators and are
/// removed; when only a comma is present, the first comma becomes the
/// decimal point. Returns `f64::NAN` when the cleaned string does not
/// parse; an empty cleaned string parses as 0. Never panics — callers
/// must check `is_finite()` before trusting the result.
pub(crate) fn parse_money(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = if cleaned.contains(',') && cleaned.contains('.') {
        cleaned.replace(',', "")
    } else if cleaned.contains(',') {
        cleaned.replacen(',', ".", 1)
    } else {
        cleaned
    };

    if normalized.is_empty() {
        return 0.0;
    }
    normalized.parse::<f64>().unwrap_or(f64::NAN)
}

/// Collapse whitespace runs to a single space, trim, and truncate to
/// `max` characters (character count, not bytes). Pure and total.
pub(crate) fn sanitize_text(raw: &str, max: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max).collect()
}

/// Round a maximum data value up to a "nice" axis bound: 10 for anything
/// up to 10, otherwise the first of 1, 2, 5, 10 times the value's power
/// of ten that covers it.
pub(crate) fn nice_ceil(n: f64) -> f64 {
    if n <= 10.0 {
        return 10.0;
    }
    let p = 10f64.powf(n.log10().floor());
    let d = n / p;
    for m in [1.0, 2.0, 5.0, 10.0] {
        if d <= m {
            return m * p;
        }
    }
    10.0 * p
}

/// Format an amount with two decimal places, no currency symbol.
/// Non-finite values render as zero.
pub(crate) fn format_amount(val: f64) -> String {
    let v = if val.is_finite() { val } else { 0.0 };
    format!("{v:.2}")
}

/// Today's date as `YYYY-MM-DD` in local time.
pub(crate) fn today_iso() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// The current month as `YYYY-MM` in local time.
pub(crate) fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}
