//! # Split Calculator
//!
//! Turns a fully assigned [`BillState`] into per-person amounts owed.
//!
//! ## Allocation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal   = Σ item prices                                             │
//! │  tax_amount = Percentage(v) → v/100 × subtotal  |  Amount(v) → v        │
//! │  tip_amount = (same rule)                                               │
//! │                                                                         │
//! │  For each person p holding n(p) of N items:                             │
//! │    subtotal(p)  = Σ prices of p's items                                 │
//! │    tax_share(p) = (tax_amount / N) × n(p)      ◄── by COUNT, not value  │
//! │    tip_share(p) = (tip_amount / N) × n(p)                               │
//! │    total(p)     = subtotal(p) + tax_share(p) + tip_share(p)             │
//! │                                                                         │
//! │  A $1 item and a $100 item carry the SAME tax and tip share.            │
//! │  The payer owes their own total like everyone else.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is rounded here. Shares stay exact so they add back up to the
//! bill total; [`crate::report`] rounds when printing.

use tracing::info;

use crate::error::ValidationError;
use crate::types::{BillState, PersonShare, SplitResult};

/// Stateless split calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitCalculator;

impl SplitCalculator {
    /// See [`compute_split`].
    pub fn compute(&self, bill: &BillState) -> Result<SplitResult, ValidationError> {
        compute_split(bill)
    }
}

/// Computes each person's share of the bill.
///
/// Fails without computing anything when the bill is not ready
/// (see [`BillState::validate`]).
///
/// ## Example
/// ```rust
/// use tabsplit_core::{compute_split, BillState, LineItem, Money, ValidationError};
///
/// let bill = BillState::new(["Alice", "Bob"])
///     .and_then(|b| b.with_item_added(LineItem::new("Soup", Money::from_cents(800))))
///     .and_then(|b| b.with_assignment(0, 1))
///     .unwrap();
///
/// // No payer yet
/// assert_eq!(compute_split(&bill), Err(ValidationError::NoPayerSelected));
///
/// let split = compute_split(&bill.with_payer(0).unwrap()).unwrap();
/// assert_eq!(split.owed_to_payer(), Money::from_cents(800));
/// ```
pub fn compute_split(bill: &BillState) -> Result<SplitResult, ValidationError> {
    bill.validate()?;

    let item_count = bill.items.len();
    let subtotal = bill.subtotal();
    let tax_amount = bill.tax_amount();
    let tip_amount = bill.tip_amount();

    let shares: Vec<PersonShare> = bill
        .people
        .iter()
        .enumerate()
        .map(|(person, name)| {
            let items: Vec<_> = bill
                .assignment
                .items_for(person)
                .into_iter()
                .filter_map(|index| bill.items.get(index).cloned())
                .collect();

            let person_subtotal = items.iter().map(|item| item.price).sum();
            let tax_share = tax_amount.share_by_count(items.len(), item_count);
            let tip_share = tip_amount.share_by_count(items.len(), item_count);

            PersonShare {
                person,
                name: name.clone(),
                items,
                subtotal: person_subtotal,
                tax_share,
                tip_share,
                total: person_subtotal + tax_share + tip_share,
            }
        })
        .collect();

    let payer = bill.payer.ok_or(ValidationError::NoPayerSelected)?;
    let grand_total = subtotal + tax_amount + tip_amount;

    info!(
        people = bill.people.len(),
        items = item_count,
        payer,
        grand_total = %grand_total,
        "Split computed"
    );

    Ok(SplitResult {
        shares,
        payer,
        subtotal,
        tax_amount,
        tip_amount,
        grand_total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ChargeMode, ChargeSetting, LineItem};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn item(name: &str, cents: i64) -> LineItem {
        LineItem::new(name, Money::from_cents(cents))
    }

    /// Builds a bill where `owners[i]` holds item `i`.
    fn bill(people: usize, prices: &[i64], owners: &[usize]) -> BillState {
        let names: Vec<String> = (0..people).map(|p| format!("Person {p}")).collect();
        let mut bill = BillState::new(names).unwrap();
        for (i, cents) in prices.iter().enumerate() {
            bill = bill.with_item_added(item(&format!("Item {i}"), *cents)).unwrap();
        }
        for (i, owner) in owners.iter().enumerate() {
            bill = bill.with_assignment(i, *owner).unwrap();
        }
        bill.with_payer(0).unwrap()
    }

    #[test]
    fn test_person_without_items_owes_nothing() {
        let bill = bill(3, &[1000, 2000], &[0, 1])
            .with_tax(ChargeSetting::amount(Decimal::from(3)))
            .unwrap();
        let split = compute_split(&bill).unwrap();

        assert_eq!(split.shares[0].tax_share, Money::from_cents(150));
        assert_eq!(split.shares[1].tax_share, Money::from_cents(150));
        assert_eq!(split.shares[2].tax_share, Money::zero());
        assert_eq!(split.shares[2].total, Money::zero());
        assert!(split.shares[2].items.is_empty());

        assert_eq!(split.shares[0].total, Money::from_cents(1150));
        assert_eq!(split.shares[1].total, Money::from_cents(2150));
        assert_eq!(split.grand_total, Money::from_cents(3300));
    }

    #[test]
    fn test_one_unassigned_item_fails() {
        let bill = bill(2, &[500, 700, 900], &[0, 1]);
        assert_eq!(
            compute_split(&bill),
            Err(ValidationError::UnassignedItems {
                count: 1,
                indices: vec![2]
            })
        );
    }

    #[test]
    fn test_empty_bill_fails() {
        let bill = bill(2, &[], &[]);
        assert_eq!(compute_split(&bill), Err(ValidationError::EmptyBill));
    }

    #[test]
    fn test_allocation_is_by_count_not_value() {
        let bill = bill(2, &[100, 10000], &[0, 1])
            .with_tax(ChargeSetting::percentage(Decimal::from(10)))
            .unwrap()
            .with_tip(ChargeSetting::amount(Decimal::from(20)))
            .unwrap();
        let split = compute_split(&bill).unwrap();

        assert_eq!(split.shares[0].tax_share, split.shares[1].tax_share);
        assert_eq!(split.shares[0].tip_share, split.shares[1].tip_share);
        assert_eq!(split.shares[0].tip_share, Money::from_cents(1000));
    }

    #[test]
    fn test_payer_owes_their_own_share() {
        let bill = bill(2, &[1200, 800, 400], &[0, 0, 1])
            .with_tip(ChargeSetting::amount(Decimal::from(6)))
            .unwrap();
        let split = compute_split(&bill).unwrap();

        let payer = split.payer_share().unwrap();
        assert_eq!(payer.name, "Person 0");
        assert_eq!(payer.tip_share, Money::from_cents(400));
        assert_eq!(payer.total, Money::from_cents(2400));
        assert_eq!(split.owed_to_payer(), Money::from_cents(600));
        assert_eq!(split.others().count(), 1);
    }

    #[test]
    fn test_mode_switch_recomputes_without_conversion() {
        let base = bill(1, &[5000, 5000], &[0, 0])
            .with_tax(ChargeSetting::percentage(Decimal::from(10)))
            .unwrap();
        assert_eq!(compute_split(&base).unwrap().tax_amount, Money::from_cents(1000));

        let switched = base
            .with_tax(base.tax.with_mode(ChargeMode::Amount).with_value(Decimal::new(450, 2)))
            .unwrap();
        assert_eq!(compute_split(&switched).unwrap().tax_amount, Money::from_cents(450));
    }

    #[test]
    fn test_thirds_display_without_losing_a_cent() {
        let bill = bill(3, &[1000, 1000, 1000], &[0, 1, 2])
            .with_tax(ChargeSetting::amount(Decimal::from(1)))
            .unwrap();
        let split = compute_split(&bill).unwrap();

        let tax_sum: Money = split.shares.iter().map(|s| s.tax_share).sum();
        assert!((tax_sum - split.tax_amount).abs() < Money::from_decimal(Decimal::new(1, 20)));
        assert_eq!(split.shares[0].tax_share.to_string(), "$0.33");
    }

    #[test]
    fn test_compute_is_deterministic() {
        let bill = bill(2, &[999, 1], &[1, 0])
            .with_tip(ChargeSetting::percentage(Decimal::from(18)))
            .unwrap();
        assert_eq!(SplitCalculator.compute(&bill), SplitCalculator.compute(&bill));
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    /// Up to 20 items of up to $500.00, each owned by one of up to 6 people.
    fn bills() -> impl Strategy<Value = BillState> {
        (1usize..=6)
            .prop_flat_map(|people| {
                (
                    Just(people),
                    prop::collection::vec((0i64..=50_000, 0..people), 1..=20),
                    0i64..=10_000,
                    0i64..=3_000,
                    any::<bool>(),
                )
            })
            .prop_map(|(people, lines, tax, tip, tax_is_percent)| {
                let prices: Vec<i64> = lines.iter().map(|(cents, _)| *cents).collect();
                let owners: Vec<usize> = lines.iter().map(|(_, owner)| *owner).collect();
                let tax = if tax_is_percent {
                    ChargeSetting::percentage(Decimal::new(tax, 2))
                } else {
                    ChargeSetting::amount(Decimal::new(tax, 2))
                };
                bill(people, &prices, &owners)
                    .with_tax(tax)
                    .unwrap()
                    .with_tip(ChargeSetting::percentage(Decimal::new(tip, 2)))
                    .unwrap()
            })
    }

    fn tolerance() -> Money {
        Money::from_decimal(Decimal::new(1, 12))
    }

    proptest! {
        #[test]
        fn prop_allocation_sums_to_totals(bill in bills()) {
            let split = compute_split(&bill).unwrap();

            let subtotal: Money = split.shares.iter().map(|s| s.subtotal).sum();
            let tax: Money = split.shares.iter().map(|s| s.tax_share).sum();
            let tip: Money = split.shares.iter().map(|s| s.tip_share).sum();
            let total: Money = split.shares.iter().map(|s| s.total).sum();

            prop_assert_eq!(subtotal, split.subtotal);
            prop_assert!((tax - split.tax_amount).abs() < tolerance());
            prop_assert!((tip - split.tip_amount).abs() < tolerance());
            prop_assert!((total - split.grand_total).abs() < tolerance());
        }

        #[test]
        fn prop_equal_counts_get_equal_charges(bill in bills()) {
            let split = compute_split(&bill).unwrap();
            for a in &split.shares {
                for b in &split.shares {
                    if a.items.len() == b.items.len() {
                        prop_assert_eq!(a.tax_share, b.tax_share);
                        prop_assert_eq!(a.tip_share, b.tip_share);
                    }
                }
            }
        }

        #[test]
        fn prop_every_item_lands_with_exactly_one_person(bill in bills()) {
            let split = compute_split(&bill).unwrap();
            let held: usize = split.shares.iter().map(|s| s.items.len()).sum();
            prop_assert_eq!(held, bill.items.len());
        }
    }
}
