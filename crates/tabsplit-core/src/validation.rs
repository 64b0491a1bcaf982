//! # Validation Module
//!
//! Input validation for bill edits and the pre-split checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (wizard UI or CLI bill file)                        │
//! │  ├── Basic format checks (empty, numeric)                               │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Bill edits (crate::bill)                                      │
//! │  └── THIS MODULE: field rules on every snapshot edit                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: BillState::validate() before compute_split                    │
//! │  ├── payer selected, every item assigned, bill not empty                │
//! │  └── THIS MODULE again for values that bypassed Layer 2 (deserialized)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tabsplit_core::money::Money;
//! use tabsplit_core::validation::{validate_person_name, validate_price};
//!
//! assert_eq!(validate_person_name("  Alice ").unwrap(), "Alice");
//! assert!(validate_price(Money::from_cents(-1)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ChargeSetting;
use crate::{MAX_AMOUNT_CENTS, MAX_BILL_ITEMS, MAX_PEOPLE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted person name.
pub const MAX_PERSON_NAME_LEN: usize = 100;

/// Longest accepted item name.
pub const MAX_ITEM_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a participant name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
pub fn validate_person_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "person name".to_string(),
        });
    }

    if name.chars().count() > MAX_PERSON_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "person name".to_string(),
            max: MAX_PERSON_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an item name.
///
/// Empty names are allowed: a manually added line starts out blank and the
/// user fills it in later.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "item name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates an item price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: comped items)
/// - Must not exceed the maximum bill amount
pub fn validate_price(price: Money) -> ValidationResult<()> {
    validate_amount(price.amount(), "price")
}

/// Validates a tax or tip setting's stored value.
///
/// The same bounds apply in both modes; a 150% tip is odd but legal.
pub fn validate_charge(setting: &ChargeSetting, field: &str) -> ValidationResult<()> {
    validate_amount(setting.value, field)
}

fn validate_amount(value: Decimal, field: &str) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    let max = Money::from_cents(MAX_AMOUNT_CENTS);
    if value > max.amount() {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of participants.
///
/// ## Rules
/// - At least one person
/// - At most `MAX_PEOPLE`
pub fn validate_people_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::NoPeople);
    }

    if count > MAX_PEOPLE {
        return Err(ValidationError::TooMany {
            field: "people".to_string(),
            max: MAX_PEOPLE,
        });
    }

    Ok(())
}

/// Validates the number of line items.
pub fn validate_item_count(count: usize) -> ValidationResult<()> {
    if count > MAX_BILL_ITEMS {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max: MAX_BILL_ITEMS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
