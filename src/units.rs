// src/units.rs
//! Conversion between user-facing decimal strings and base-unit integers,
//! using the token precision cached on the session. Integer/string math
//! only; f64 loses precision long before 18 decimals.

use crate::error::AppError;

/// Parse a decimal amount string into base units.
///
/// Rejects empty input, anything that is not an unsigned decimal number,
/// more fractional digits than the token carries, and values that do not
/// fit in 128 bits.
pub fn parse_units(input: &str, decimals: u8) -> Result<u128, AppError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidInput("amount is empty".to_string()));
    }

    let (whole, frac) = match raw.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (raw, ""),
    };
    if raw.contains('.') && frac.is_empty() {
        return Err(AppError::InvalidInput(format!("not a decimal number: {}", raw)));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(AppError::InvalidInput(format!("not a decimal number: {}", raw)));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidInput(format!("not a decimal number: {}", raw)));
    }
    if frac.len() > decimals as usize {
        return Err(AppError::InvalidInput(format!(
            "more than {} fractional digits: {}",
            decimals, raw
        )));
    }

    let scale = 10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| AppError::InvalidInput(format!("token precision too large: {}", decimals)))?;
    let whole_units: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("amount too large: {}", raw)))?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let digits: u128 = frac
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("amount too large: {}", raw)))?;
        digits * 10u128.pow((decimals as usize - frac.len()) as u32)
    };

    whole_units
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(frac_units))
        .ok_or_else(|| AppError::InvalidInput(format!("amount too large: {}", raw)))
}

/// Render base units as a decimal string. Trailing zeros are trimmed but at
/// least one fractional digit is kept, so whole numbers read "10.0". This is
/// the canonical form: `format_units(parse_units(s)?) ` normalizes any valid
/// input `s`.
pub fn format_units(value: u128, decimals: u8) -> String {
    let digits = value.to_string();
    let places = decimals as usize;
    let (whole, frac) = if digits.len() > places {
        let split = digits.len() - places;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        (
            "0".to_string(),
            format!("{}{}", "0".repeat(places - digits.len()), digits),
        )
    };
    let trimmed = frac.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAD: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_units("10", 18).unwrap(), 10 * WAD);
        assert_eq!(parse_units("10.5", 18).unwrap(), 10 * WAD + WAD / 2);
        assert_eq!(parse_units(".5", 18).unwrap(), WAD / 2);
        assert_eq!(parse_units("0.000000000000000001", 18).unwrap(), 1);
        assert_eq!(parse_units(" 3 ", 0).unwrap(), 3);
    }

    #[test]
    fn empty_amount_is_invalid_input() {
        for input in ["", "   "] {
            assert!(matches!(
                parse_units(input, 18),
                Err(AppError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn garbage_amounts_are_rejected() {
        for input in ["abc", "-1", "+1", "1.2.3", "1e18", "10.", "."] {
            assert!(parse_units(input, 18).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn excess_fractional_digits_are_rejected() {
        assert!(parse_units("1.234", 2).is_err());
        assert!(parse_units("0.0000000000000000001", 18).is_err());
    }

    #[test]
    fn overflow_is_rejected() {
        let err = parse_units("340282366920938463464", 18).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn formats_with_at_least_one_fractional_digit() {
        assert_eq!(format_units(10 * WAD, 18), "10.0");
        assert_eq!(format_units(0, 18), "0.0");
        assert_eq!(format_units(1, 18), "0.000000000000000001");
        assert_eq!(format_units(WAD / 10, 18), "0.1");
        assert_eq!(format_units(7, 0), "7.0");
    }

    #[test]
    fn format_of_parse_is_canonical() {
        for (input, canonical) in [
            ("10", "10.0"),
            ("10.50", "10.5"),
            ("0.000000000000000001", "0.000000000000000001"),
            (".5", "0.5"),
            ("007", "7.0"),
        ] {
            let parsed = parse_units(input, 18).unwrap();
            assert_eq!(format_units(parsed, 18), canonical, "input {:?}", input);
        }
    }
}
