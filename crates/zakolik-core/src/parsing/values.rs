use crate::error::ZakolikError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest price cell accepted; anything above is a broken export.
pub const MAX_PRICE_CZK: i64 = 10_000_000;

/// Parse a price cell from an exported price list.
///
/// Handles formats like:
/// - "449" -> Some(449)
/// - "5,90" -> Some(5.90) (Czech decimal comma)
/// - "1 290" -> Some(1290) (space as thousands separator)
/// - "1 290,50 Kč" -> Some(1290.50)
/// - "" -> None
pub fn parse_czk(s: &str) -> Result<Option<Decimal>, ZakolikError> {
    let s = s.trim();

    if s.is_empty() || s == "-" || s == "–" {
        return Ok(None);
    }

    let without_currency = s
        .strip_suffix("Kč")
        .or_else(|| s.strip_suffix("CZK"))
        .unwrap_or(s);

    let normalized: String = without_currency
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let value = Decimal::from_str(&normalized).map_err(|e| ZakolikError::InvalidPrice {
        value: s.to_string(),
        reason: e.to_string(),
    })?;
    if value.abs() > Decimal::from(MAX_PRICE_CZK) {
        return Err(ZakolikError::InvalidPrice {
            value: s.to_string(),
            reason: format!("more than {MAX_PRICE_CZK} CZK"),
        });
    }
    Ok(Some(value))
}
