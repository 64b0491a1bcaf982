//! # Report Formatting
//!
//! Plain-text rendering of receipts and splits. This is the one place where
//! amounts are rounded to cents (through `Money`'s `Display`).
//!
//! ## Split Layout
//! ```text
//! Alice paid $33.00
//!
//! Alice's items:
//!   Pasta: $10.00
//!   Tax: $1.50
//!   Tip: $0.00
//!   Their portion: $11.50
//!
//! Others owe:
//!
//! Bob
//!   Pizza: $20.00
//!   Tax: $1.50
//!   Tip: $0.00
//!   Total owed: $21.50
//! ```

use std::fmt;

use crate::types::{ParsedReceipt, PersonShare, SplitResult};

/// Renders the final split screen as text.
pub fn render_split(split: &SplitResult) -> String {
    SplitReport(split).to_string()
}

/// Renders what the parser detected.
pub fn render_receipt(receipt: &ParsedReceipt) -> String {
    ReceiptReport(receipt).to_string()
}

/// `Display` adapter for a [`SplitResult`].
pub struct SplitReport<'a>(pub &'a SplitResult);

impl fmt::Display for SplitReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let split = self.0;

        if let Some(payer) = split.payer_share() {
            writeln!(f, "{} paid {}", payer.name, split.grand_total)?;
            writeln!(f)?;
            writeln!(f, "{}'s items:", payer.name)?;
            write_share_lines(f, payer)?;
            writeln!(f, "  Their portion: {}", payer.total)?;
        }

        writeln!(f)?;
        writeln!(f, "Others owe:")?;
        for share in split.others() {
            writeln!(f)?;
            writeln!(f, "{}", share.name)?;
            write_share_lines(f, share)?;
            writeln!(f, "  Total owed: {}", share.total)?;
        }

        Ok(())
    }
}

fn write_share_lines(f: &mut fmt::Formatter<'_>, share: &PersonShare) -> fmt::Result {
    for item in &share.items {
        writeln!(f, "  {}: {}", item.name, item.price)?;
    }
    writeln!(f, "  Tax: {}", share.tax_share)?;
    writeln!(f, "  Tip: {}", share.tip_share)
}

/// `Display` adapter for a [`ParsedReceipt`].
pub struct ReceiptReport<'a>(pub &'a ParsedReceipt);

impl fmt::Display for ReceiptReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let receipt = self.0;

        writeln!(f, "Items ({}):", receipt.items.len())?;
        for (index, item) in receipt.items.iter().enumerate() {
            writeln!(f, "  {:>2}. {}: {}", index + 1, item.name, item.price)?;
        }

        writeln!(f)?;
        writeln!(f, "Subtotal: {}", receipt.subtotal)?;
        writeln!(
            f,
            "Tax: {} ({}%)",
            receipt.tax,
            receipt.tax_percent.round_dp(2).normalize()
        )?;
        writeln!(
            f,
            "Tip: {} ({}%)",
            receipt.tip,
            receipt.tip_percent.round_dp(2).normalize()
        )?;
        writeln!(f, "Total: {}", receipt.total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::parse;
    use crate::split::compute_split;
    use crate::types::{BillState, ChargeSetting};
    use rust_decimal::Decimal;

    fn two_person_split() -> SplitResult {
        let receipt = parse("Pasta 10.00\nPizza 20.00\nTotal 33.00");
        let bill = BillState::from_receipt(["Alice", "Bob"], &receipt)
            .and_then(|b| b.with_assignment(0, 0))
            .and_then(|b| b.with_assignment(1, 1))
            .and_then(|b| b.with_tax(ChargeSetting::amount(Decimal::from(3))))
            .and_then(|b| b.with_payer(0))
            .unwrap();
        compute_split(&bill).unwrap()
    }

    #[test]
    fn test_render_split() {
        let text = render_split(&two_person_split());
        let expected = "\
Alice paid $33.00

Alice's items:
  Pasta: $10.00
  Tax: $1.50
  Tip: $0.00
  Their portion: $11.50

Others owe:

Bob
  Pizza: $20.00
  Tax: $1.50
  Tip: $0.00
  Total owed: $21.50
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_split_rounds_thirds() {
        let receipt = parse("A 1.00\nB 1.00\nC 1.00");
        let bill = BillState::from_receipt(["X", "Y", "Z"], &receipt)
            .and_then(|b| b.with_assignment(0, 0))
            .and_then(|b| b.with_assignment(1, 1))
            .and_then(|b| b.with_assignment(2, 2))
            .and_then(|b| b.with_tip(ChargeSetting::amount(Decimal::from(1))))
            .and_then(|b| b.with_payer(2))
            .unwrap();
        let text = render_split(&compute_split(&bill).unwrap());

        assert!(text.starts_with("Z paid $4.00\n"));
        assert!(text.contains("  Tip: $0.33\n"));
        assert!(text.contains("  Total owed: $1.33\n"));
    }

    #[test]
    fn test_render_receipt() {
        let receipt = parse("Coffee 3.50\nBagel 2.25\nSubtotal 5.75\nTax 0.50\nTotal 6.25");
        let text = render_receipt(&receipt);

        assert!(text.starts_with("Items (2):\n"));
        assert!(text.contains("   1. Coffee: $3.50\n"));
        assert!(text.contains("Subtotal: $5.75\n"));
        assert!(text.contains("Tax: $0.50 (8.7%)\n"));
        assert!(text.ends_with("Total: $6.25\n"));
    }
}
