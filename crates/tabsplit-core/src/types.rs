//! # Domain Types
//!
//! Value types passed between the parsing and splitting stages.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ParsedReceipt   │   │   BillState     │   │  SplitResult    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  items          │──►│  people         │──►│  shares[]       │       │
//! │  │  subtotal       │   │  items          │   │  payer          │       │
//! │  │  tax / tip      │   │  assignment     │   │  grand_total    │       │
//! │  │  total          │   │  tax / tip      │   └─────────────────┘       │
//! │  └─────────────────┘   │  payer          │                             │
//! │                        └─────────────────┘                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   LineItem      │   │ ChargeSetting   │   │  Assignment     │       │
//! │  │  name, price    │   │  Percentage(10) │   │  item → person  │       │
//! │  └─────────────────┘   │  Amount($3.00)  │   └─────────────────┘       │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Every type here is a plain value. Stages never share state by reference:
//! each receives a self-contained input and returns a self-contained output.
//! Items and people are identified by their POSITION, not by a stable id.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Line Item
// =============================================================================

/// A single priced line on the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Display name, as cleaned from the receipt or typed by the user.
    pub name: String,

    /// Price of the line (never negative on a valid bill).
    #[ts(type = "string")]
    pub price: Money,
}

impl LineItem {
    /// Creates a line item.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        LineItem {
            name: name.into(),
            price,
        }
    }
}

// =============================================================================
// Parsed Receipt
// =============================================================================

/// What the parser extracted from one block of OCR text.
///
/// ## Field Semantics
/// - Monetary fields are zero when not detected
/// - `tax` / `tip` are the ABSOLUTE amounts printed on the receipt
/// - `tax_percent` / `tip_percent` are those amounts as a percentage of
///   `subtotal` (0 when subtotal is 0), kept for default display
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParsedReceipt {
    pub items: Vec<LineItem>,
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub tax: Money,
    #[ts(type = "string")]
    pub tip: Money,
    #[ts(type = "string")]
    pub total: Money,
    #[ts(type = "string")]
    pub tax_percent: Decimal,
    #[ts(type = "string")]
    pub tip_percent: Decimal,
}

impl ParsedReceipt {
    /// True when nothing usable was detected: no items, no total, no subtotal.
    ///
    /// Callers treat this as "please rescan".
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.total.is_zero() && self.subtotal.is_zero()
    }

    /// Turns an empty parse into `CoreError::ParseEmptyResult`.
    ///
    /// ## Example
    /// ```rust
    /// use tabsplit_core::receipt::parse;
    /// use tabsplit_core::CoreError;
    ///
    /// let result = parse("no prices here").ensure_detected();
    /// assert_eq!(result, Err(CoreError::ParseEmptyResult));
    /// ```
    pub fn ensure_detected(self) -> CoreResult<Self> {
        if self.is_empty() {
            return Err(CoreError::ParseEmptyResult);
        }
        Ok(self)
    }

    /// Sum of the extracted item prices, or zero if it overflows.
    pub fn item_sum(&self) -> Money {
        self.items
            .iter()
            .try_fold(Money::zero(), |sum, item| sum.checked_add(item.price))
            .unwrap_or_else(Money::zero)
    }

    /// Initial tax setting offered to the user.
    ///
    /// A detected absolute tax becomes `Amount(tax)`; otherwise the
    /// percentage (0 when nothing was detected) in Percentage mode.
    pub fn default_tax_setting(&self) -> ChargeSetting {
        default_setting(self.tax, self.tax_percent)
    }

    /// Initial tip setting offered to the user. Same rule as tax.
    pub fn default_tip_setting(&self) -> ChargeSetting {
        default_setting(self.tip, self.tip_percent)
    }
}

fn default_setting(amount: Money, percent: Decimal) -> ChargeSetting {
    if amount.is_positive() {
        ChargeSetting::amount(amount.amount())
    } else {
        ChargeSetting::percentage(percent)
    }
}

// =============================================================================
// Tax / Tip Settings
// =============================================================================

/// How a stored tax or tip value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ChargeMode {
    /// `value` is a percent of the bill subtotal.
    #[default]
    Percentage,
    /// `value` is an absolute currency amount.
    Amount,
}

impl std::fmt::Display for ChargeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeMode::Percentage => write!(f, "percentage"),
            ChargeMode::Amount => write!(f, "amount"),
        }
    }
}

/// A tax or tip setting: one active mode plus its stored value.
///
/// ## Mode Duality
/// Switching mode never converts the value. `Percentage(10)` switched to
/// Amount mode is `Amount(10)`, i.e. $10.00, whatever the subtotal is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChargeSetting {
    pub mode: ChargeMode,
    #[ts(type = "string")]
    pub value: Decimal,
}

impl ChargeSetting {
    /// A percent-of-subtotal setting.
    pub const fn percentage(value: Decimal) -> Self {
        ChargeSetting {
            mode: ChargeMode::Percentage,
            value,
        }
    }

    /// An absolute-amount setting.
    pub const fn amount(value: Decimal) -> Self {
        ChargeSetting {
            mode: ChargeMode::Amount,
            value,
        }
    }

    /// Same value, different mode.
    pub const fn with_mode(self, mode: ChargeMode) -> Self {
        ChargeSetting { mode, ..self }
    }

    /// Same mode, different value.
    pub const fn with_value(self, value: Decimal) -> Self {
        ChargeSetting { value, ..self }
    }

    /// Resolves the setting to an absolute amount for the given subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tabsplit_core::money::Money;
    /// use tabsplit_core::types::ChargeSetting;
    ///
    /// let subtotal = Money::from_cents(5000);
    /// let pct = ChargeSetting::percentage(Decimal::from(10));
    /// assert_eq!(pct.resolve(subtotal), Money::from_cents(500));
    ///
    /// let flat = ChargeSetting::amount(Decimal::new(300, 2));
    /// assert_eq!(flat.resolve(subtotal), Money::from_cents(300));
    /// ```
    pub fn resolve(&self, subtotal: Money) -> Money {
        match self.mode {
            ChargeMode::Percentage => subtotal.percent_of(self.value),
            ChargeMode::Amount => Money::from_decimal(self.value),
        }
    }
}

// =============================================================================
// Assignment
// =============================================================================

/// Mapping from item index to person index.
///
/// Not required to be total: an item without an entry is unassigned.
/// A `BTreeMap` keeps iteration (and serialization) deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assignment(BTreeMap<usize, usize>);

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Assignment(BTreeMap::new())
    }

    /// Assigns `item` to `person`, replacing any previous entry.
    pub fn assign(&mut self, item: usize, person: usize) {
        self.0.insert(item, person);
    }

    /// Removes the entry for `item`, returning the person it pointed at.
    pub fn unassign(&mut self, item: usize) -> Option<usize> {
        self.0.remove(&item)
    }

    /// The person `item` is assigned to, if any.
    pub fn person_for(&self, item: usize) -> Option<usize> {
        self.0.get(&item).copied()
    }

    pub fn is_assigned(&self, item: usize) -> bool {
        self.0.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Item indices in `0..item_count` with no entry, ascending.
    pub fn unassigned(&self, item_count: usize) -> Vec<usize> {
        (0..item_count).filter(|i| !self.is_assigned(*i)).collect()
    }

    /// Item indices assigned to `person`, ascending.
    pub fn items_for(&self, person: usize) -> Vec<usize> {
        self.0
            .iter()
            .filter(|(_, p)| **p == person)
            .map(|(item, _)| *item)
            .collect()
    }

    /// (item, person) pairs in item order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(item, person)| (*item, *person))
    }

    /// Assignment after deleting item `index`.
    ///
    /// ## Renumbering
    /// ```text
    /// before: {0→A, 1→B, 2→C, 3→A}     delete item 1
    /// after:  {0→A, 1→C, 2→A}          items above 1 shift down by one
    /// ```
    pub fn without_item(&self, index: usize) -> Assignment {
        let renumbered = self
            .0
            .iter()
            .filter(|(item, _)| **item != index)
            .map(|(item, person)| {
                let item = if *item > index { item - 1 } else { *item };
                (item, *person)
            })
            .collect();
        Assignment(renumbered)
    }

    /// Assignment after deleting person `index`.
    ///
    /// Items held by that person become unassigned; higher person indices
    /// shift down by one.
    pub fn without_person(&self, index: usize) -> Assignment {
        let renumbered = self
            .0
            .iter()
            .filter(|(_, person)| **person != index)
            .map(|(item, person)| {
                let person = if *person > index { person - 1 } else { *person };
                (*item, person)
            })
            .collect();
        Assignment(renumbered)
    }
}

impl FromIterator<(usize, usize)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        Assignment(iter.into_iter().collect())
    }
}

// =============================================================================
// Bill State
// =============================================================================

/// Everything needed to compute a split, as one immutable snapshot.
///
/// ## Invariants (checked by `validate()` before splitting)
/// - `people` is non-empty
/// - every item index has an assignment entry pointing into `people`
/// - `payer` is set and indexes into `people`
///
/// Edits live in [`crate::bill`] and return a new `BillState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillState {
    pub people: Vec<String>,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub assignment: Assignment,
    #[serde(default)]
    pub tax: ChargeSetting,
    #[serde(default)]
    pub tip: ChargeSetting,
    /// Who fronted the bill. `None` until chosen.
    #[serde(default)]
    pub payer: Option<usize>,
}

// =============================================================================
// Split Result
// =============================================================================

/// One person's portion of the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PersonShare {
    /// Index into `BillState::people`.
    pub person: usize,
    pub name: String,
    /// The items assigned to this person, in bill order.
    pub items: Vec<LineItem>,
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub tax_share: Money,
    #[ts(type = "string")]
    pub tip_share: Money,
    #[ts(type = "string")]
    pub total: Money,
}

/// The computed split. All amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SplitResult {
    /// One entry per person, in person order (`shares[p].person == p`).
    pub shares: Vec<PersonShare>,
    pub payer: usize,
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub tax_amount: Money,
    #[ts(type = "string")]
    pub tip_amount: Money,
    #[ts(type = "string")]
    pub grand_total: Money,
}

impl SplitResult {
    /// The share for `person`, if the index exists.
    pub fn share(&self, person: usize) -> Option<&PersonShare> {
        self.shares.get(person)
    }

    /// The payer's own portion. The payer owes their share like anyone else.
    pub fn payer_share(&self) -> Option<&PersonShare> {
        self.share(self.payer)
    }

    /// Everybody except the payer, in person order.
    pub fn others(&self) -> impl Iterator<Item = &PersonShare> + '_ {
        self.shares.iter().filter(move |s| s.person != self.payer)
    }

    /// Total the payer should get back from the others.
    pub fn owed_to_payer(&self) -> Money {
        self.others().map(|s| s.total).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(tax_cents: i64, tax_pct: i64) -> ParsedReceipt {
        ParsedReceipt {
            tax: Money::from_cents(tax_cents),
            tax_percent: Decimal::from(tax_pct),
            ..ParsedReceipt::default()
        }
    }

    #[test]
    fn test_empty_receipt() {
        let empty = ParsedReceipt::default();
        assert!(empty.is_empty());
        assert_eq!(empty.ensure_detected(), Err(CoreError::ParseEmptyResult));

        let total_only = ParsedReceipt {
            total: Money::from_cents(1000),
            ..ParsedReceipt::default()
        };
        assert!(!total_only.is_empty());
        assert!(total_only.ensure_detected().is_ok());
    }

    #[test]
    fn test_default_settings_prefer_detected_amount() {
        let r = receipt(50, 10);
        assert_eq!(r.default_tax_setting(), ChargeSetting::amount(Decimal::new(50, 2)));

        let r = receipt(0, 0);
        assert_eq!(r.default_tax_setting(), ChargeSetting::percentage(Decimal::ZERO));
        assert_eq!(r.default_tip_setting(), ChargeSetting::percentage(Decimal::ZERO));
    }

    #[test]
    fn test_charge_mode_switch_keeps_value() {
        let pct = ChargeSetting::percentage(Decimal::from(10));
        let switched = pct.with_mode(ChargeMode::Amount);
        assert_eq!(switched.value, Decimal::from(10));

        let subtotal = Money::from_cents(10000);
        assert_eq!(pct.resolve(subtotal), Money::from_cents(1000));
        assert_eq!(switched.resolve(subtotal), Money::from_cents(1000));
        // Same number, different meaning once the subtotal moves
        assert_eq!(pct.resolve(Money::from_cents(5000)), Money::from_cents(500));
        assert_eq!(switched.resolve(Money::from_cents(5000)), Money::from_cents(1000));
    }

    #[test]
    fn test_charge_setting_serde() {
        let json = serde_json::to_string(&ChargeSetting::amount(Decimal::new(300, 2))).unwrap();
        assert_eq!(json, r#"{"mode":"amount","value":"3.00"}"#);
    }

    #[test]
    fn test_assignment_unassigned_and_items_for() {
        let assignment: Assignment = [(0, 1), (2, 1), (3, 0)].into_iter().collect();
        assert_eq!(assignment.unassigned(5), vec![1, 4]);
        assert_eq!(assignment.items_for(1), vec![0, 2]);
        assert_eq!(assignment.items_for(7), Vec::<usize>::new());
    }

    #[test]
    fn test_assignment_without_item_renumbers() {
        let assignment: Assignment = [(0, 0), (1, 1), (2, 2), (3, 0)].into_iter().collect();
        let after = assignment.without_item(1);
        let expected: Assignment = [(0, 0), (1, 2), (2, 0)].into_iter().collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_assignment_without_person_renumbers() {
        let assignment: Assignment = [(0, 0), (1, 1), (2, 2)].into_iter().collect();
        let after = assignment.without_person(1);
        let expected: Assignment = [(0, 0), (2, 1)].into_iter().collect();
        assert_eq!(after, expected);
        assert_eq!(after.unassigned(3), vec![1]);
    }
}
