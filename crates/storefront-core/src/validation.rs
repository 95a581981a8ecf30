//! # Validation Module
//!
//! Input validation for raw presentation-layer values.
//!
//! The presentation layer supplies strings; everything is parsed and
//! validated here before a workflow touches the database. Database
//! constraints (NOT NULL, CHECK, foreign keys) remain as the last line of
//! defense.
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{parse_quantity, validate_quantity};
//!
//! assert_eq!(parse_quantity("5").unwrap(), 5);
//! assert!(validate_quantity(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a raw quantity string into a validated positive integer.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    let qty: i64 = input.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    validate_quantity(qty)?;
    Ok(qty)
}

// =============================================================================
// Money
// =============================================================================

/// Parses a raw amount string into Money, requiring a positive value.
///
/// Used for payment amounts; a payment of zero or less is never meaningful.
pub fn parse_positive_amount(input: &str) -> ValidationResult<Money> {
    let amount = Money::parse(input)?;

    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(amount)
}

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); overpayment is allowed and handled upstream
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// Zero is allowed (free items); negative is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Installments
// =============================================================================

/// Validates the number of installments on a plan.
pub fn validate_num_installments(count: i64) -> ValidationResult<()> {
    if count <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "num_installments".to_string(),
        });
    }

    Ok(())
}

/// Validates a full set of installment terms.
///
/// ## Rules
/// - Initial payment may be zero but not negative
/// - Number of installments must be positive
/// - Per-installment amount must be positive
pub fn validate_installment_terms(
    initial_payment_cents: i64,
    num_installments: i64,
    installment_amount_cents: i64,
) -> ValidationResult<()> {
    if initial_payment_cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "initial_payment".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    validate_num_installments(num_installments)?;

    if installment_amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "installment_amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
