//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Always round to two decimal places
//! - Use banker's rounding (round half to even)
//! - Store both the submitted and the converted amounts

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Decimal places used for converted amounts.
pub const COMPANY_CURRENCY_DP: u32 = 2;

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal) -> Decimal {
    let converted = amount * rate;
    converted.round_dp_with_strategy(COMPANY_CURRENCY_DP, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_amount() {
        // 100 EUR * 1.08 = 108.00 USD
        assert_eq!(convert_amount(dec!(100), dec!(1.08)), dec!(108.00));
    }

    #[test]
    fn test_convert_with_rounding() {
        // 33.33 * 1.2345 = 41.145885 -> 41.15
        assert_eq!(convert_amount(dec!(33.33), dec!(1.2345)), dec!(41.15));
    }

    #[test]
    fn test_bankers_rounding() {
        // Round half to even: 0.125 -> 0.12, 0.135 -> 0.14
        assert_eq!(convert_amount(dec!(0.125), dec!(1)), dec!(0.12));
        assert_eq!(convert_amount(dec!(0.135), dec!(1)), dec!(0.14));
    }

    #[test]
    fn test_identity_rate() {
        assert_eq!(convert_amount(dec!(42.42), dec!(1)), dec!(42.42));
    }
}
