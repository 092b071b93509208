// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Teto para quantidades e preços. Mantém q x p e as somas dos relatórios
/// longe do limite do `Decimal` e cabe nas colunas NUMERIC(18, 6).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);
pub const MAX_SCALE: u32 = 6;

fn check_bounds(val: &Decimal) -> Result<(), ValidationError> {
    if *val > MAX_AMOUNT {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &1_000_000_000.0);
        err.message = Some("O valor excede o máximo permitido (1.000.000.000).".into());
        return Err(err);
    }
    if val.normalize().scale() > MAX_SCALE {
        let mut err = ValidationError::new("scale");
        err.add_param("max_scale".into(), &MAX_SCALE);
        err.message = Some("O valor aceita no máximo 6 casas decimais.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    check_bounds(val)
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    check_bounds(val)
}

// O repositório grava o valor com trim(); só espaços não conta como preenchido
pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("O campo não pode ficar em branco.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_zero_is_accepted() {
        assert!(validate_not_negative(&dec!(0)).is_ok());
        assert!(validate_not_negative(&dec!(-0.0)).is_ok());
        assert!(validate_not_negative(&dec!(-0.01)).is_err());
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(validate_positive(&dec!(0)).is_err());
        assert!(validate_positive(&dec!(0.5)).is_ok());
    }

    #[test]
    fn huge_values_are_rejected() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000));
        assert!(validate_positive(&dec!(1000000000)).is_ok());
        assert!(validate_positive(&dec!(1000000000.01)).is_err());
        assert!(validate_not_negative(&dec!(100000000000000000000)).is_err());
    }

    #[test]
    fn scientific_notation_from_json_is_bounded() {
        let huge: Decimal = serde_json::from_str("1e20").unwrap();
        let err = validate_not_negative(&huge).unwrap_err();
        assert_eq!(err.code, "range");
    }

    #[test]
    fn too_many_decimals_are_rejected() {
        assert!(validate_positive(&dec!(1.123456)).is_ok());
        assert!(validate_positive(&dec!(1.1234560)).is_ok());
        assert!(validate_positive(&dec!(1.1234567)).is_err());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("Bebidas").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }
}
