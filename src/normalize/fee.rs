use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static MARKET_FEE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<num>\d+(?:[.,]\d+)*)\s*(?P<unit>bn|mrd\.?|m|mio\.?|k|th\.?|tsd\.?)?$").expect("static regex")
});

/// Numeric coercion for the bulk dataset's fee column. Anything that is not a plain
/// or scientific-notation number (`""`, `"nan"`, `"?"`) is absent.
pub fn parse_bulk_fee(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Reads display fees such as `€12.50m`, `500k €` or `Leihgebühr: 2,00 Mio. €`.
/// Non-monetary labels (`free transfer`, `loan`, `-`, `?`) are absent.
pub fn parse_market_fee(raw: &str) -> Option<Decimal> {
    // Loan fees are shown as "Loan fee: €2.00m"
    let value = raw.rsplit(':').next().unwrap_or(raw);
    let cleaned: String = value
        .to_lowercase()
        .replace("eur", "")
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£'))
        .collect();
    let cleaned = cleaned.trim();

    let caps = MARKET_FEE.captures(cleaned)?;
    let unit = caps.name("unit").map(|m| m.as_str());
    let number = parse_amount(&caps["num"], unit.is_some())?;
    let multiplier = match unit {
        Some("bn") | Some("mrd") | Some("mrd.") => Decimal::from(1_000_000_000u64),
        Some("m") | Some("mio") | Some("mio.") => Decimal::from(1_000_000u64),
        Some("k") | Some("th") | Some("th.") | Some("tsd") | Some("tsd.") => Decimal::from(1_000u64),
        _ => Decimal::ONE,
    };
    Some(number * multiplier)
}

/// Reads a digit run with `.`/`,` separators, either of which can be the decimal mark.
///
/// - one separator followed by exactly three digits is a thousands separator when no unit
///   follows (`500.000 €`, `€250,000`); with a unit it is ambiguous and absent
/// - one separator otherwise is the decimal mark (`12,50 Mio.`, `€1.50m`)
/// - repeated separators of one kind are thousands groups (`1.500.000`)
/// - a different final separator is the decimal mark (`1.500.000,50`, `1,500,000.50`)
///
/// Anything else, such as misaligned groups, is absent rather than guessed.
fn parse_amount(num: &str, has_unit: bool) -> Option<Decimal> {
    let is_separator = |c: char| c == '.' || c == ',';
    let separators: Vec<char> = num.chars().filter(|c| is_separator(*c)).collect();
    let groups: Vec<&str> = num.split(is_separator).collect();

    let plain = match separators.as_slice() {
        [] => num.to_string(),
        [_] if groups[1].len() == 3 => {
            if has_unit {
                return None;
            }
            groups.concat()
        }
        [_] => groups.join("."),
        [first, .., last] => {
            let thousands = &separators[..separators.len() - 1];
            if thousands.iter().any(|c| c != first) || groups[0].len() > 3 {
                return None;
            }
            if last == first {
                if groups[1..].iter().any(|g| g.len() != 3) {
                    return None;
                }
                groups.concat()
            } else {
                let (fraction, whole) = groups.split_last()?;
                if whole[1..].iter().any(|g| g.len() != 3) {
                    return None;
                }
                format!("{}.{}", whole.concat(), fraction)
            }
        }
    };
    Decimal::from_str(&plain).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_bulk_fee_coercion() {
        assert_eq!(parse_bulk_fee("100"), Some(dec("100")));
        assert_eq!(parse_bulk_fee(" 2500000.0 "), Some(dec("2500000.0")));
        assert_eq!(parse_bulk_fee("1.5e6"), Some(dec("1500000")));
        assert_eq!(parse_bulk_fee(""), None);
        assert_eq!(parse_bulk_fee("nan"), None);
        assert_eq!(parse_bulk_fee("free transfer"), None);
    }

    #[test]
    fn test_market_fee_units() {
        assert_eq!(parse_market_fee("€12.50m"), Some(dec("12500000")));
        assert_eq!(parse_market_fee("€500k"), Some(dec("500000")));
        assert_eq!(parse_market_fee("12,50 Mio. €"), Some(dec("12500000")));
        assert_eq!(parse_market_fee("800 Tsd. €"), Some(dec("800000")));
        assert_eq!(parse_market_fee("Loan fee: €2.00m"), Some(dec("2000000")));
        assert_eq!(parse_market_fee("€1.2bn"), Some(dec("1200000000")));
        assert_eq!(parse_market_fee("250000"), Some(dec("250000")));
    }

    #[test]
    fn test_market_fee_thousands_separators() {
        assert_eq!(parse_market_fee("500.000 €"), Some(dec("500000")));
        assert_eq!(parse_market_fee("€250,000"), Some(dec("250000")));
        assert_eq!(parse_market_fee("1.500.000 €"), Some(dec("1500000")));
        assert_eq!(parse_market_fee("€1,500,000"), Some(dec("1500000")));
        assert_eq!(parse_market_fee("1.500.000,50 €"), Some(dec("1500000.50")));
        assert_eq!(parse_market_fee("€1,500,000.50"), Some(dec("1500000.50")));
    }

    #[test]
    fn test_market_fee_ambiguous_grouping_is_absent() {
        // Three digits after the mark plus a unit could be either reading
        assert_eq!(parse_market_fee("1.500 Tsd. €"), None);
        assert_eq!(parse_market_fee("€2,500m"), None);
        assert_eq!(parse_market_fee("1.50.000 €"), None);
        assert_eq!(parse_market_fee("1,500.000,00 €"), None);
        assert_eq!(parse_market_fee("1234.567.890 €"), None);
    }

    #[test]
    fn test_market_fee_labels_are_absent() {
        assert_eq!(parse_market_fee("free transfer"), None);
        assert_eq!(parse_market_fee("loan transfer"), None);
        assert_eq!(parse_market_fee("-"), None);
        assert_eq!(parse_market_fee("?"), None);
        assert_eq!(parse_market_fee(""), None);
    }
}
