//! # Number Input & Display
//!
//! Parsing of what cashiers type and es-VE style display formatting
//! (`.` for thousands, `,` for decimals).
//!
//! ## Two Input Dialects
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  parse_user_number      (converter amounts, rate overrides)             │
//! │    "12,5"     → 12.5      either mark is a decimal point               │
//! │    "1 000"    → 1000      whitespace and stray chars dropped           │
//! │    "12,"      → 12        partial input tolerated                      │
//! │    "1.234,5"  → 1.2345    first mark wins, the rest are dropped        │
//! │                                                                         │
//! │  parse_grouped_input    (abonos, package counts and costs)              │
//! │    "20.500"   → 20500     `.` groups thousands                         │
//! │    "1.500,5"  → 1500.5    `,` is the decimal point                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest number of fraction digits ever displayed.
pub const MAX_FRACTION_DIGITS: u32 = 3;

// =============================================================================
// Parsing
// =============================================================================

/// Parses free-form amount input where `.` or `,` marks the decimals.
///
/// Whitespace and anything that isn't a digit or a mark is discarded.
/// The first mark is the decimal point; later marks are dropped.
/// Returns `None` when no digits remain.
///
/// ## Example
/// ```rust
/// use bodega_core::numfmt::parse_user_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_user_number("12,5"), Some(Decimal::new(125, 1)));
/// assert_eq!(parse_user_number(""), None);
/// ```
pub fn parse_user_number(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = cleaned.split('.');
    let int_part = parts.next().unwrap_or_default();
    let frac_part: String = parts.collect();

    let text = match (int_part.is_empty(), frac_part.is_empty()) {
        (true, true) => return None,
        (_, true) => int_part.to_string(),
        (true, false) => format!("0.{}", frac_part),
        (false, false) => format!("{}.{}", int_part, frac_part),
    };

    Decimal::from_str(&text).ok()
}

/// Parses input written with es-VE grouping (`20.500`, `1.500,5`).
///
/// Returns `None` for blank or unreadable text.
pub fn parse_grouped_input(value: &str) -> Option<Decimal> {
    let normalized: String = value
        .trim()
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

// =============================================================================
// Formatting
// =============================================================================

/// Live formatting for whole-number fields: keeps digits, groups by `.`.
///
/// ## Example
/// ```rust
/// use bodega_core::numfmt::format_thousands;
///
/// assert_eq!(format_thousands("20500"), "20.500");
/// assert_eq!(format_thousands("20.5001"), "205.001");
/// ```
pub fn format_thousands(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    group_digits(&digits)
}

/// Formats `value` es-VE style with between `min_frac` and `max_frac`
/// fraction digits (half away from zero).
pub fn format_es(value: Decimal, min_frac: u32, max_frac: u32) -> String {
    let rounded = value.round_dp_with_strategy(max_frac, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac as usize {
        frac.push('0');
    }

    let mut out = String::with_capacity(text.len() + 4);
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push(',');
        out.push_str(&frac);
    }
    out
}

/// Formats a conversion result for a currency code.
///
/// USD and EUR always show cents. Other codes drop decimals once the
/// value reaches 1000. Never more than three decimals.
///
/// ## Example
/// ```rust
/// use bodega_core::numfmt::format_for_code;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_for_code(Decimal::from(400_000), "COP"), "400.000");
/// assert_eq!(format_for_code(Decimal::from(25), "USD"), "25,00");
/// ```
pub fn format_for_code(value: Decimal, code: &str) -> String {
    let min_frac = match code {
        "USD" | "EUR" => 2,
        _ if value >= Decimal::ONE_THOUSAND => 0,
        _ => 2,
    };
    format_es(value, min_frac, MAX_FRACTION_DIGITS)
}

/// Display form of the amount field once it loses focus.
///
/// Unparseable text is shown as typed.
pub fn format_amount_input(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match parse_user_number(raw) {
        Some(n) => format_es(n, 0, MAX_FRACTION_DIGITS),
        None => raw.to_string(),
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_user_number() {
        assert_eq!(parse_user_number("12,5"), Some(dec!(12.5)));
        assert_eq!(parse_user_number("12.5"), Some(dec!(12.5)));
        assert_eq!(parse_user_number(" 1 000 "), Some(dec!(1000)));
        assert_eq!(parse_user_number("12,"), Some(dec!(12)));
        assert_eq!(parse_user_number(",5"), Some(dec!(0.5)));
        assert_eq!(parse_user_number("1.234,56"), Some(dec!(1.23456)));
        assert_eq!(parse_user_number("Bs 36,5"), Some(dec!(36.5)));
    }

    #[test]
    fn test_parse_user_number_rejects_empty() {
        assert_eq!(parse_user_number(""), None);
        assert_eq!(parse_user_number("."), None);
        assert_eq!(parse_user_number("abc"), None);
    }

    #[test]
    fn test_parse_grouped_input() {
        assert_eq!(parse_grouped_input("20.500"), Some(dec!(20500)));
        assert_eq!(parse_grouped_input("1.500,5"), Some(dec!(1500.5)));
        assert_eq!(parse_grouped_input("300"), Some(dec!(300)));
        assert_eq!(parse_grouped_input("  "), None);
        assert_eq!(parse_grouped_input("x"), None);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands("1234567"), "1.234.567");
        assert_eq!(format_thousands("999"), "999");
        assert_eq!(format_thousands(""), "");
    }

    #[test]
    fn test_format_for_code() {
        assert_eq!(format_for_code(dec!(400000), "COP"), "400.000");
        assert_eq!(format_for_code(dec!(1500.25), "COP"), "1.500,25");
        assert_eq!(format_for_code(dec!(12.5), "VES"), "12,50");
        assert_eq!(format_for_code(dec!(1234.5678), "USD"), "1.234,568");
        assert_eq!(format_for_code(dec!(0.1234), "EUR"), "0,123");
        assert_eq!(format_for_code(dec!(0.0005), "EUR"), "0,00");
    }

    #[test]
    fn test_format_es_negative_and_rounding() {
        assert_eq!(format_es(dec!(-1234.5), 0, 3), "-1.234,5");
        assert_eq!(format_es(dec!(2.0005), 0, 3), "2,001");
        assert_eq!(format_es(dec!(-0.0001), 2, 3), "0,00");
    }

    #[test]
    fn test_format_amount_input() {
        assert_eq!(format_amount_input("1234,5"), "1.234,5");
        assert_eq!(format_amount_input(""), "");
        assert_eq!(format_amount_input(",,"), ",,");
    }
}
