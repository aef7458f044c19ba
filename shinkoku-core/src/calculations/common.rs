//! Common utility functions for tax calculations.

use rust_decimal::Decimal;

/// Rounds a decimal value down to a whole yen amount.
///
/// The National Tax Agency's quick-calculation tables discard fractional yen
/// (rounding toward negative infinity, which is equivalent to truncation for
/// the non-negative amounts that reach the rounding points).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use shinkoku_core::calculations::common::floor_yen;
///
/// assert_eq!(floor_yen(dec!(1438.5)), dec!(1438));
/// assert_eq!(floor_yen(dec!(68500.00)), dec!(68500));
/// assert_eq!(floor_yen(dec!(0)), dec!(0));
/// ```
pub fn floor_yen(value: Decimal) -> Decimal {
    value.floor()
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use shinkoku_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100), dec!(200)), dec!(200));
/// assert_eq!(max(dec!(-50), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
