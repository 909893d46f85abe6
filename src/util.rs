// Utility helpers for text normalization, tolerant number parsing and
// display formatting.
//
// This module centralizes all the "dirty" spreadsheet string handling so the
// rest of the code can assume clean, comparable values.
use num_format::{Locale, ToFormattedString};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a string for case- and accent-insensitive comparisons.
///
/// - Trims surrounding whitespace.
/// - Lowercases.
/// - NFKD-decomposes and drops combining marks, so `"Región"` and
///   `"region"` compare equal.
///
/// Idempotent: `normalize_text(normalize_text(s)) == normalize_text(s)`.
/// Callers with optional values pass `""` for the absent case.
pub fn normalize_text(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Parse a currency/locale-formatted string into `f64` while being forgiving
/// about the formatting found in spreadsheet exports.
///
/// - Empty strings and a literal `"N/A"` (any case) are not numbers.
/// - When both `.` and `,` appear, the rightmost of the two is taken as the
///   decimal separator and the other is stripped as thousands grouping
///   (`"1.200,50"` and `"1,200.50"` both parse to `1200.5`).
/// - A lone `,` is treated as the decimal separator.
/// - Any other non-digit character (currency symbols, spaces) is stripped.
/// - Returns `None` for anything that still fails to parse; this is the
///   NOT_A_NUMBER sentinel aggregate consumers filter out.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("n/a") {
        return None;
    }
    let cleaned = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                s.replace(',', "")
            } else {
                s.replace('.', "").replace(',', ".")
            }
        }
        (None, Some(_)) => s.replace(',', "."),
        _ => s.to_string(),
    };
    let cleaned: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `1,245 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_accents_and_whitespace() {
        assert_eq!(normalize_text("  Región  "), "region");
        assert_eq!(normalize_text("ESTATUS"), "estatus");
        assert_eq!(normalize_text("DAÑADA"), "danada");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["  Número de Teléfono ", "Città", "N° SERIE", "plain", ""] {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn parse_numeric_handles_both_separator_conventions() {
        assert_eq!(parse_numeric("1.200,50"), Some(1200.50));
        assert_eq!(parse_numeric("1,200.50"), Some(1200.50));
        assert_eq!(parse_numeric("3,5"), Some(3.5));
        assert_eq!(parse_numeric("$ 1,200.50"), Some(1200.50));
    }

    #[test]
    fn parse_numeric_sentinels() {
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("  "), None);
        assert_eq!(parse_numeric("N/A"), None);
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric("sin costo"), None);
    }

    #[test]
    fn parse_numeric_negative_and_plain() {
        assert_eq!(parse_numeric("-42"), Some(-42.0));
        assert_eq!(parse_numeric("7"), Some(7.0));
        // Known heuristic reading: a lone dot is a decimal separator.
        assert_eq!(parse_numeric("1.200"), Some(1.2));
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1234.5, 2), "-1,234.50");
        assert_eq!(format_number(0.0, 0), "0");
    }
}
