/// Currency symbol used when none is configured.
pub const DEFAULT_CURRENCY: &str = "₹";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use dividend_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a scaled epsilon so exact binary midpoints round half-up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` is "0.xx"; keep ".xx".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount with two decimals, thousands separators and the
/// given currency symbol prefixed.
///
/// # Examples
///
/// ```
/// use dividend_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56, "₹"), "₹1,234.56");
/// assert_eq!(format_currency(0.0, "$"),     "$0.00");
/// assert_eq!(format_currency(-9.99, "₹"),   "-₹9.99");
/// ```
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let body = format_number(amount.abs(), 2);
    if amount < 0.0 && body != "0.00" {
        format!("-{}{}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Compact axis label: amounts of 1,000 or more are shown in thousands with
/// one decimal (`"₹1.5k"`), smaller amounts as whole numbers.
///
/// ```
/// use dividend_core::formatting::format_compact;
///
/// assert_eq!(format_compact(1500.0, "₹"), "₹1.5k");
/// assert_eq!(format_compact(950.0, "₹"), "₹950");
/// ```
pub fn format_compact(amount: f64, symbol: &str) -> String {
    if amount >= 1000.0 {
        format!("{}{:.1}k", symbol, amount / 1000.0)
    } else {
        format!("{}{}", symbol, format_number(amount, 0))
    }
}

/// Unrounded share of `whole`, in percent. Zero when `whole` is zero.
pub fn share_percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Round a monetary amount to two decimals for display.
///
/// Accumulation elsewhere is done at full precision; this is applied once at
/// the output boundary.
pub fn round_amount(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage with two decimals and a `%` suffix, e.g. `"66.67%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
