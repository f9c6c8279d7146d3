//! Rate formatting.

/// Significant digits shown for a byte rate.
const RATE_DIGITS: usize = 4;

/// Format a byte rate the way C's `%.4g` does: four significant digits,
/// trailing zeros dropped, scientific notation outside `1e-4 ..< 1e4`.
pub fn format_rate(value: f64) -> String {
    format_significant(value, RATE_DIGITS)
}

/// `%.{digits}g` for `f64`.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-inf" } else { "inf" }.into();
    }

    let digits = digits.max(1);
    let precision = digits - 1;

    // Round once in scientific form; its exponent picks the notation.
    let scientific = format!("{value:.precision$e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let limit = i32::try_from(digits).unwrap_or(i32::MAX);

    if exponent < -4 || exponent >= limit {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = usize::try_from(limit - 1 - exponent).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
