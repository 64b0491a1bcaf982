//! # tabsplit-core: Pure Bill-Splitting Logic
//!
//! This crate is the **heart** of tabsplit. It turns noisy OCR text into a
//! structured receipt and turns an assigned bill into per-person amounts,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tabsplit Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (tabsplit)                          │   │
//! │  │    OCR process ──► parse ──► bill file ──► split ──► report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain values                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tabsplit-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  receipt  │  │   bill    │  │   split   │  │  report   │  │   │
//! │  │   │  Parser   │  │ BillState │  │ Calculator│  │  text     │  │   │
//! │  │   │ text→items│  │  edits    │  │ shares    │  │  output   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   types   │  │   error   │  │validation │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO OCR ENGINE • NO FILES • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`receipt`] - ReceiptParser (OCR text → ParsedReceipt)
//! - [`bill`] - BillState construction and snapshot edits
//! - [`split`] - SplitCalculator (BillState → SplitResult)
//! - [`report`] - Display-time formatting
//! - [`types`] - Domain types (LineItem, BillState, SplitResult, etc.)
//! - [`money`] - Money type with exact decimal arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same text in, same receipt out; same bill in, same split out
//! 2. **No I/O**: the OCR engine, files and terminals belong to the app
//! 3. **Exact Money**: decimals, rounded to cents only for display
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tabsplit_core::{compute_split, parse, BillState, ChargeSetting, Money};
//!
//! let receipt = parse("Pasta 10.00\nPizza 20.00\nTotal 33.00");
//! let bill = BillState::from_receipt(["Alice", "Bob"], &receipt)
//!     .and_then(|b| b.with_assignment(0, 0))
//!     .and_then(|b| b.with_assignment(1, 1))
//!     .and_then(|b| b.with_tax(ChargeSetting::amount(Decimal::from(3))))
//!     .and_then(|b| b.with_payer(0))
//!     .unwrap();
//!
//! let split = compute_split(&bill).unwrap();
//! // Tax is split by item COUNT: one item each, $1.50 each
//! assert_eq!(split.shares[0].tax_share, Money::from_cents(150));
//! assert_eq!(split.shares[1].total, Money::from_cents(2150));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod error;
pub mod money;
pub mod receipt;
pub mod report;
pub mod split;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tabsplit_core::Money` instead of
// `use tabsplit_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::{parse, ReceiptParser};
pub use split::{compute_split, SplitCalculator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum participants on one bill.
pub const MAX_PEOPLE: usize = 50;

/// Maximum line items on one bill.
///
/// ## Why a limit?
/// OCR of a long grocery receipt can produce hundreds of junk lines; past
/// this point the scan is almost certainly garbage.
pub const MAX_BILL_ITEMS: usize = 500;

/// Largest accepted price or charge value, in cents ($1,000,000.00).
///
/// Keeps every sum and share comfortably inside `Decimal` range.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;
