// src/common/decimal.rs
// Aritmética de valores com checagem: overflow vira AppError, nunca panic.

use rust_decimal::Decimal;

use crate::common::error::AppError;

/// quantidade x preço unitário.
pub fn line_value(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, AppError> {
    quantity.checked_mul(unit_price).ok_or(AppError::ArithmeticOverflow)
}

pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, AppError> {
    a.checked_add(b).ok_or(AppError::ArithmeticOverflow)
}

pub fn checked_sum<I>(values: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = Result<Decimal, AppError>>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| checked_add(acc, value?))
}

pub fn checked_div(a: Decimal, b: Decimal) -> Result<Decimal, AppError> {
    a.checked_div(b).ok_or(AppError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn overflow_is_an_error() {
        let huge = Decimal::MAX;
        assert!(matches!(line_value(huge, dec!(2)), Err(AppError::ArithmeticOverflow)));
        assert!(matches!(checked_add(huge, dec!(1)), Err(AppError::ArithmeticOverflow)));
        assert!(matches!(
            checked_sum(vec![Ok(huge), Ok(huge)]),
            Err(AppError::ArithmeticOverflow)
        ));
    }

    #[test]
    fn sums_line_values() {
        let lines = [(dec!(2), dec!(10.5)), (dec!(3), dec!(1))];
        let total = checked_sum(lines.iter().map(|(q, p)| line_value(*q, *p))).unwrap();
        assert_eq!(total, dec!(24));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(checked_div(dec!(1), Decimal::ZERO).is_err());
    }
}
