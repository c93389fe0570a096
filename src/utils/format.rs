//! Compact number formatting for log lines (parameter counts, dataset sizes).

/// Formats `n` with a `K` or `M` suffix.
///
/// Values below 1e3 are printed as-is, values below 1e6 are divided by 1e3 and
/// suffixed with `K`, everything else is divided by 1e6 and suffixed with `M`.
/// Scaled values keep at most 3 decimals, with trailing zeros and a trailing
/// `.` stripped. Non-finite values are written as `nan`, `inf` or `-inf`
/// with no suffix. Tiny values print in plain decimal (`0.00001`), never in
/// exponent form.
///
/// # Example
///
/// ```
/// use train_utils::utils::format::num2str;
///
/// assert_eq!(num2str(512.0), "512");
/// assert_eq!(num2str(1_500.0), "1.5K");
/// assert_eq!(num2str(25_557_032.0), "25.557M");
/// ```
pub fn num2str(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let (s, unit) = if n < 1e3 {
        (n.to_string(), "")
    } else if n < 1e6 {
        (format!("{:.3}", n / 1e3), "K")
    } else {
        (format!("{:.3}", n / 1e6), "M")
    };

    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    format!("{}{}", s, unit)
}
