//! Cell parsing and validation for dataset values
//!
//! The dataset is hand-cleaned and still carries blanks, `NA` markers and the
//! odd out-of-scale value. Nothing here fails: a cell that cannot be trusted
//! becomes `None` and drops out of every numeric comparison.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::types::ScoreDomain;

/// Markers the source uses for "no value"
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

/// Parse a numeric cell, accepting plain and scientific notation
pub fn parse_decimal_cell(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parse a score cell and reject values outside the score's domain
pub fn parse_score(raw: &str, domain: ScoreDomain) -> Option<Decimal> {
    parse_decimal_cell(raw).filter(|value| domain.contains(*value))
}

/// Parse an altitude in meters; negative altitudes are treated as missing
pub fn parse_altitude(raw: &str) -> Option<Decimal> {
    parse_decimal_cell(raw).filter(|value| !value.is_sign_negative())
}

/// Normalize a categorical cell the same way dropdown options are built
pub fn normalize_category(raw: &str) -> String {
    raw.trim().to_string()
}

/// Numeric ordering for harvest years where both parse, lexical otherwise
pub fn compare_harvest_years(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
