//! # Error Types
//!
//! Domain-specific error types for tabsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tabsplit-core errors (this file)                                       │
//! │  ├── CoreError        - Parse results and bill edits                    │
//! │  └── ValidationError  - Bill not ready to split / bad input values      │
//! │                                                                         │
//! │  tabsplit-cli errors (separate crate)                                   │
//! │  └── AppError         - What the terminal sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → exit code + message     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (index, count, field)
//! 3. Every variant is recoverable: re-run the stage with corrected input
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The parser found neither items nor a total/subtotal.
    ///
    /// ## User Workflow
    /// ```text
    /// OCR text ──► parse() ──► items=[], total=0, subtotal=0
    ///                               │
    ///                               ▼
    ///                    ensure_detected() ← ParseEmptyResult
    ///                               │
    ///                               ▼
    ///          UI: "No items detected, please rescan the receipt"
    /// ```
    #[error("No items detected. Please scan the receipt again with a clear, well-lit image")]
    ParseEmptyResult,

    /// Item index does not exist in the bill.
    #[error("Item {index} not found (bill has {len} items)")]
    ItemNotFound { index: usize, len: usize },

    /// Person index does not exist in the bill.
    #[error("Person {index} not found (bill has {len} people)")]
    PersonNotFound { index: usize, len: usize },

    /// A bill always keeps at least one participant.
    #[error("Cannot remove the only person on the bill")]
    LastPerson,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The first four variants are the pre-split checks; the caller re-prompts
/// the user and calls `compute_split` again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Nobody has been chosen as the person who paid.
    #[error("Please select who paid the bill")]
    NoPayerSelected,

    /// Some items have no person assigned.
    #[error("Please assign {count} remaining item{}", plural_suffix(.count))]
    UnassignedItems { count: usize, indices: Vec<usize> },

    /// The bill has no items, so there is nothing to split.
    #[error("The bill has no items to split")]
    EmptyBill,

    /// The bill has no participants.
    #[error("Add at least one person to split the bill with")]
    NoPeople,

    /// An assignment refers to a person that does not exist.
    #[error("Item {item} is assigned to unknown person {person}")]
    UnknownPerson { item: usize, person: usize },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Amount is implausibly large.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: Money },

    /// Collection has too many entries.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
}

fn plural_suffix(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
