//! Parsers for user-supplied values. Anything malformed is rejected here so
//! the query engine only ever sees validated input.

use crate::query::PriceRange;
use regex::Regex;
use std::sync::OnceLock;

/// Parse a price string by extracting digits, periods, and commas, then
/// determine the decimal separator based on position and context.
/// Handles both US format (1,234.56) and European format (1.234,56).
pub fn parse_price_str(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    let normalized = match (last_dot, last_comma) {
        // Both present: the LAST one is the decimal separator
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replacen(',', ".", 1),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(comma)) => {
            let after_comma = &cleaned[comma + 1..];
            if after_comma.len() == 3 {
                // "1,000"
                cleaned.replace(',', "")
            } else {
                // "23,99"
                cleaned.replacen(',', ".", 1)
            }
        }
        _ => cleaned,
    };

    normalized.parse().ok()
}

fn bound_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:\$|€|£|CHF)?\s*([0-9][0-9.,]*)\s*$").expect("price bound regex is valid")
    })
}

/// Value parser for a single price bound (`--min-price`, `--max-price`).
/// Accepts digits with `.`/`,` separators and an optional leading currency symbol.
pub fn price_bound(s: &str) -> Result<f64, String> {
    if s.trim().starts_with('-') {
        return Err(format!("price must not be negative: '{}'", s));
    }
    let digits = bound_regex()
        .captures(s)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| format!("not a price: '{}'", s))?;
    parse_price_str(digits.as_str()).ok_or_else(|| format!("not a price: '{}'", s))
}

/// Rejects a range whose minimum is above its maximum.
pub fn checked_range(min: f64, max: f64) -> Result<PriceRange, String> {
    if min > max {
        return Err(format!("minimum {} is above maximum {}", min, max));
    }
    Ok(PriceRange::new(min, max))
}

fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([0-9][0-9.,]*)?\s*(?:-|\.\.|to)\s*([0-9][0-9.,]*)?\s*$")
            .expect("price range regex is valid")
    })
}

/// Value parser for `--price`: `MIN-MAX`, `MIN..MAX` or `MIN to MAX`.
/// Either side may be omitted for an open bound.
pub fn price_range(s: &str) -> Result<PriceRange, String> {
    let caps = range_regex()
        .captures(s)
        .ok_or_else(|| format!("expected MIN-MAX, got '{}'", s))?;

    let min = match caps.get(1) {
        Some(m) => price_bound(m.as_str())?,
        None => 0.0,
    };
    let max = match caps.get(2) {
        Some(m) => price_bound(m.as_str())?,
        None => f64::INFINITY,
    };
    checked_range(min, max)
}

/// Value parser for `--min-rating`.
pub fn rating(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("not a number: '{}'", s))?;
    if !(0.0..=5.0).contains(&value) {
        return Err(format!("rating must be between 0 and 5, got {}", value));
    }
    Ok(value)
}

/// Accept a numeric product id or a storefront URL ending in `/products/<id>`.
pub fn product_identifier(input: &str) -> Result<u64, String> {
    let input = input.trim();
    if let Ok(id) = input.parse::<u64>() {
        return Ok(id);
    }

    if let Ok(url) = url::Url::parse(input) {
        let mut segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        if let (Some(id), Some("products")) = (segments.pop(), segments.pop()) {
            if let Ok(id) = id.parse::<u64>() {
                return Ok(id);
            }
        }
    }

    Err(format!(
        "Invalid product identifier: {}. Use a numeric ID or a /products/<id> URL",
        input
    ))
}
