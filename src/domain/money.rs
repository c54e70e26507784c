use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a two-decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
/// More than two decimals is an error, never a silent truncation.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.strip_prefix('-').unwrap_or(input);

    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(ParseCentsError::InvalidFormat);
    }

    let parts: Vec<&str> = input.split('.').collect();
    let cents = match parts.as_slice() {
        [units] => parse_units(units)?
            .checked_mul(100)
            .ok_or(ParseCentsError::Overflow)?,
        [units, decimals] => {
            if units.is_empty() && decimals.is_empty() {
                return Err(ParseCentsError::InvalidFormat);
            }
            let units = if units.is_empty() {
                0
            } else {
                parse_units(units)?
            };

            let decimal_cents: i64 = match decimals.len() {
                0 => 0,
                1 => parse_units(decimals)? * 10,
                2 => parse_units(decimals)?,
                _ => return Err(ParseCentsError::TooPrecise),
            };

            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(decimal_cents))
                .ok_or(ParseCentsError::Overflow)?
        }
        _ => return Err(ParseCentsError::InvalidFormat),
    };

    Ok(if negative { -cents } else { cents })
}

/// Parse an amount that must be zero or positive.
pub fn parse_amount(input: &str) -> Result<Cents, ParseCentsError> {
    let cents = parse_cents(input)?;
    if cents < 0 {
        return Err(ParseCentsError::Negative);
    }
    Ok(cents)
}

fn parse_units(digits: &str) -> Result<i64, ParseCentsError> {
    digits.parse().map_err(|_| ParseCentsError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Negative,
    Overflow,
    TooPrecise,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Negative => write!(f, "amount must not be negative"),
            ParseCentsError::Overflow => write!(f, "amount is too large"),
            ParseCentsError::TooPrecise => write!(f, "amount has more than two decimals"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents(" 12.5 "), Ok(1250));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("7."), Ok(700));
        assert_eq!(parse_cents("-50.00"), Ok(-5000));
    }

    #[test]
    fn test_parse_cents_rejects_sub_cent_precision() {
        assert_eq!(parse_cents("0.001"), Err(ParseCentsError::TooPrecise));
        assert_eq!(parse_cents("100.999"), Err(ParseCentsError::TooPrecise));
        assert_eq!(parse_amount("3.001"), Err(ParseCentsError::TooPrecise));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("").is_err());
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents(".").is_err());
        assert!(parse_cents("12.34.56").is_err());
        assert!(parse_cents("+5").is_err());
        assert!(parse_cents("1e3").is_err());
        assert_eq!(
            parse_cents("99999999999999999999"),
            Err(ParseCentsError::InvalidFormat)
        );
        assert_eq!(
            parse_cents("999999999999999999"),
            Err(ParseCentsError::Overflow)
        );
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        assert_eq!(parse_amount("0"), Ok(0));
        assert_eq!(parse_amount("10.10"), Ok(1010));
        assert_eq!(parse_amount("-1"), Err(ParseCentsError::Negative));
    }
}
