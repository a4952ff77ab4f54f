//! Validation utilities for the Farmstand POS backend

use rust_decimal::Decimal;

use crate::models::hhmm_to_minutes;

// ============================================================================
// Quantity and Price Validations
// ============================================================================

/// Transaction quantities must be strictly positive
pub fn validate_transaction_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Initial stock may be zero (a product can be registered before delivery)
pub fn validate_initial_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

pub fn validate_unit_price(unit_price: Decimal) -> Result<(), &'static str> {
    if unit_price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

/// Commission rates are a fraction of sales in [0, 1]
pub fn validate_commission_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err("Commission rate must be between 0 and 1");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Names for products, units, staff, and suppliers: non-empty, bounded
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.chars().count() > 64 {
        return Err("Name must be at most 64 characters");
    }
    Ok(())
}

/// Shift boundaries are stored as zero-padded HH:MM strings
pub fn validate_hhmm(value: &str) -> Result<(), &'static str> {
    if hhmm_to_minutes(value).is_none() {
        return Err("Time must be in HH:MM format");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_transaction_quantity() {
        assert!(validate_transaction_quantity(dec("0.5")).is_ok());
        assert!(validate_transaction_quantity(Decimal::ZERO).is_err());
        assert!(validate_transaction_quantity(dec("-1")).is_err());
    }

    #[test]
    fn test_initial_quantity() {
        assert!(validate_initial_quantity(Decimal::ZERO).is_ok());
        assert!(validate_initial_quantity(dec("-0.1")).is_err());
    }

    #[test]
    fn test_unit_price() {
        assert!(validate_unit_price(Decimal::ZERO).is_ok());
        assert!(validate_unit_price(dec("70")).is_ok());
        assert!(validate_unit_price(dec("-5")).is_err());
    }

    #[test]
    fn test_commission_rate_bounds() {
        assert!(validate_commission_rate(Decimal::ZERO).is_ok());
        assert!(validate_commission_rate(dec("0.15")).is_ok());
        assert!(validate_commission_rate(Decimal::ONE).is_ok());
        assert!(validate_commission_rate(dec("1.01")).is_err());
        assert!(validate_commission_rate(dec("-0.01")).is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("有機番茄").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"名".repeat(65)).is_err());
    }

    #[test]
    fn test_hhmm() {
        assert!(validate_hhmm("06:00").is_ok());
        assert!(validate_hhmm("25:00").is_err());
        assert!(validate_hhmm("6:00").is_err());
    }
}
