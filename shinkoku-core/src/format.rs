//! Yen display formatting for result amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as whole yen with grouped thousands, e.g. `¥1,234,567`.
///
/// Fractional amounts are rounded half away from zero before display, the
/// same way the `ja-JP` currency formatter renders them; negative amounts
/// (refunds) come out as `-¥…`.
pub fn format_yen(amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = whole.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if whole.is_sign_negative() && !whole.is_zero() {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn format_yen_groups_thousands() {
        assert_eq!(format_yen(dec!(69938)), "¥69,938");
        assert_eq!(format_yen(dec!(1370000)), "¥1,370,000");
        assert_eq!(format_yen(dec!(17704000)), "¥17,704,000");
    }

    #[test]
    fn format_yen_small_amounts_have_no_separator() {
        assert_eq!(format_yen(dec!(0)), "¥0");
        assert_eq!(format_yen(dec!(999)), "¥999");
    }

    #[test]
    fn format_yen_negative_amounts_carry_leading_sign() {
        assert_eq!(format_yen(dec!(-30062)), "-¥30,062");
    }

    #[test]
    fn format_yen_rounds_fractional_input() {
        assert_eq!(format_yen(dec!(1438.5)), "¥1,439");
        assert_eq!(format_yen(dec!(1438.4)), "¥1,438");
    }
}
