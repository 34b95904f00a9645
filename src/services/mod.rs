// Ledger core
pub mod ledger;
pub mod movements;
pub mod stock;

// Compound operation workflows
pub mod remissions;
pub mod supplier_returns;
pub mod transfers;

// Collaborator lookups and document numbering
pub mod catalog;
pub mod sequences;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Shared validator for every quantity field: direction always comes from
/// the movement kind, never from the sign.
pub fn validate_positive_quantity(quantity: &Decimal) -> Result<(), ValidationError> {
    if *quantity <= Decimal::ZERO {
        return Err(ValidationError::new("quantity_must_be_positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quantity_validator_rejects_zero_and_negative() {
        assert!(validate_positive_quantity(&dec!(0.001)).is_ok());
        assert!(validate_positive_quantity(&Decimal::ZERO).is_err());
        assert!(validate_positive_quantity(&dec!(-5)).is_err());
    }
}
