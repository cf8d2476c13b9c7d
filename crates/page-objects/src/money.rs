//! Price text parsing.

/// Parses the first amount in a price label.
///
/// OpenCart renders prices like `$122.00` followed by `Ex Tax: $101.00`;
/// only the leading amount counts. Thousands separators are dropped.
pub fn parse_price(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let amount: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    let amount = amount.trim_end_matches('.');
    let value: f64 = amount.parse().ok()?;
    let negative = text[..start]
        .trim_end_matches(|c: char| c != '-' && !c.is_alphanumeric())
        .ends_with('-');
    Some(if negative { -value } else { value })
}

/// True when `prices` never decreases.
pub fn is_ascending(prices: &[f64]) -> bool {
    prices.windows(2).all(|pair| pair[0] <= pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_amount_wins() {
        assert_eq!(parse_price("$122.00\n Ex Tax: $101.00"), Some(122.0));
        assert_eq!(parse_price("$1,202.00"), Some(1202.0));
        assert_eq!(parse_price("-$5.00"), Some(-5.0));
        assert_eq!(parse_price("Total:"), None);
    }

    #[test]
    fn sign_may_precede_the_currency_symbol() {
        assert_eq!(parse_price("- $5.00"), Some(-5.0));
        assert_eq!(parse_price("Total: -€12.50"), Some(-12.5));
        assert_eq!(parse_price("Sub-Total: $7.00"), Some(7.0));
    }

    #[test]
    fn ascending_allows_ties() {
        assert!(is_ascending(&[1.0, 1.0, 2.5]));
        assert!(is_ascending(&[]));
        assert!(!is_ascending(&[3.0, 2.0]));
    }
}
