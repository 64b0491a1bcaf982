//! # Receipt Parser
//!
//! Turns raw, noisy OCR text into a [`ParsedReceipt`].
//!
//! ## Two Passes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OCR text ──► non-empty trimmed lines                                   │
//! │                                                                         │
//! │  Pass 1: SUMMARY LINES, last line → first line                          │
//! │    "Total 6.25"     → total                                             │
//! │    "Tax 0.50"       → tax          later match overwrites, so the      │
//! │    "Subtotal 5.75"  → subtotal     TOPMOST qualifying line wins        │
//! │                                                                         │
//! │  Pass 2: ITEM LINES, first line → last line                             │
//! │    skip lines mentioning total/tax/tip/gratuity/change/balance/card/cash│
//! │    "Coffee 3.50"    → LineItem { "Coffee", 3.50 }                       │
//! │                                                                         │
//! │  Post: derive subtotal from items if missing, tax/tip → percentages     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Heuristic, Not Exact
//! The parser never fails. Text it cannot make sense of yields a zero-valued
//! receipt; the caller checks [`ParsedReceipt::is_empty`] and asks for a
//! rescan. Prices must be written with exactly two decimals: `3.5` and `3`
//! are not prices, and `3.505` reads as `3.50`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::money::Money;
use crate::types::{LineItem, ParsedReceipt};

/// Optional `$`, optional whitespace, ASCII digits, a point, two digits.
static PRICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\s*([0-9]+\.[0-9]{2})").expect("price pattern is a valid regex"));

/// Lines containing any of these (case-insensitive) are never items.
pub const SKIP_WORDS: [&str; 8] = [
    "total", "tax", "tip", "gratuity", "change", "balance", "card", "cash",
];

// =============================================================================
// Summary Rules
// =============================================================================

/// Which summary figure a line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Total,
    Tip,
    Tax,
    Subtotal,
}

/// One classification rule: the first rule whose predicate matches wins.
struct SummaryRule {
    field: SummaryField,
    matches: fn(&str) -> bool,
}

/// Rule order is load-bearing: "Subtotal" also contains "total", so the
/// Total rule excludes "sub" and Subtotal comes last.
const SUMMARY_RULES: [SummaryRule; 4] = [
    SummaryRule {
        field: SummaryField::Total,
        matches: |line| line.contains("total") && !line.contains("sub"),
    },
    SummaryRule {
        field: SummaryField::Tip,
        matches: |line| line.contains("tip") || line.contains("gratuity"),
    },
    SummaryRule {
        field: SummaryField::Tax,
        matches: |line| line.contains("tax") || line.contains("gst") || line.contains("hst"),
    },
    SummaryRule {
        field: SummaryField::Subtotal,
        matches: |line| line.contains("subtotal") || line.contains("sub-total"),
    },
];

/// Classifies an already lower-cased line.
pub fn classify_summary_line(lower: &str) -> Option<SummaryField> {
    SUMMARY_RULES
        .iter()
        .find(|rule| (rule.matches)(lower))
        .map(|rule| rule.field)
}

// =============================================================================
// Parser
// =============================================================================

/// Stateless receipt parser.
///
/// ## Example
/// ```rust
/// use tabsplit_core::money::Money;
/// use tabsplit_core::receipt::ReceiptParser;
///
/// let receipt = ReceiptParser.parse("Coffee 3.50\nBagel 2.25\nTotal 5.75");
/// assert_eq!(receipt.items.len(), 2);
/// assert_eq!(receipt.total, Money::from_cents(575));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptParser;

impl ReceiptParser {
    /// See [`parse`].
    pub fn parse(&self, raw_text: &str) -> ParsedReceipt {
        parse(raw_text)
    }
}

/// Extracts the first price on a line.
///
/// A zero amount counts as "no amount", and so does a digit run too long to
/// represent.
///
/// ## Example
/// ```rust
/// use tabsplit_core::money::Money;
/// use tabsplit_core::receipt::find_amount;
///
/// assert_eq!(find_amount("Burger $ 12.99"), Some(Money::from_cents(1299)));
/// assert_eq!(find_amount("Table 12"), None);
/// assert_eq!(find_amount("Promo 0.00"), None);
/// ```
pub fn find_amount(line: &str) -> Option<Money> {
    let captures = PRICE_PATTERN.captures(line)?;
    let digits = captures.get(1)?.as_str();
    Money::parse(digits).filter(|amount| !amount.is_zero())
}

/// Parses OCR text into a structured receipt. Pure and deterministic.
///
/// ## Example
/// ```rust
/// use tabsplit_core::money::Money;
/// use tabsplit_core::receipt::parse;
///
/// let receipt = parse("Coffee 3.50\nBagel 2.25\nSubtotal 5.75\nTax 0.50\nTotal 6.25");
/// assert_eq!(receipt.items[0].name, "Coffee");
/// assert_eq!(receipt.subtotal, Money::from_cents(575));
/// assert_eq!(receipt.tax, Money::from_cents(50));
/// assert_eq!(receipt.total, Money::from_cents(625));
/// ```
pub fn parse(raw_text: &str) -> ParsedReceipt {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut receipt = ParsedReceipt::default();

    extract_summary(&lines, &mut receipt);
    extract_items(&lines, &mut receipt);

    if receipt.subtotal.is_zero() && !receipt.items.is_empty() {
        receipt.subtotal = receipt.item_sum();
        debug!(subtotal = %receipt.subtotal, "Subtotal derived from items");
    }

    receipt.tax_percent = receipt.tax.as_percent_of(receipt.subtotal);
    receipt.tip_percent = receipt.tip.as_percent_of(receipt.subtotal);

    debug!(
        lines = lines.len(),
        items = receipt.items.len(),
        subtotal = %receipt.subtotal,
        tax = %receipt.tax,
        tip = %receipt.tip,
        total = %receipt.total,
        "Receipt parsed"
    );

    receipt
}

/// Pass 1: bottom-up, so the topmost line of each kind is written last.
fn extract_summary(lines: &[&str], receipt: &mut ParsedReceipt) {
    for line in lines.iter().rev() {
        let Some(amount) = find_amount(line) else {
            continue;
        };

        let lower = line.to_lowercase();
        let Some(field) = classify_summary_line(&lower) else {
            continue;
        };

        trace!(?field, %amount, line, "Summary line");
        match field {
            SummaryField::Total => receipt.total = amount,
            SummaryField::Tip => receipt.tip = amount,
            SummaryField::Tax => receipt.tax = amount,
            SummaryField::Subtotal => receipt.subtotal = amount,
        }
    }
}

/// Pass 2: top-down item extraction.
fn extract_items(lines: &[&str], receipt: &mut ParsedReceipt) {
    for (index, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if SKIP_WORDS.iter().any(|word| lower.contains(word)) {
            trace!(line, "Skipping summary-like line");
            continue;
        }

        let Some(amount) = find_amount(line) else {
            continue;
        };

        if !is_plausible_item_price(amount, receipt) {
            trace!(%amount, line, "Amount rejected as item price");
            continue;
        }

        let mut name = clean_item_name(line);
        if name.is_empty() && index > 0 {
            // Name and price split across two OCR lines.
            name = lines[index - 1].trim().to_string();
        }

        if !name.is_empty() {
            receipt.items.push(LineItem::new(name, amount));
        }
    }
}

/// Positive, below the detected total (if any), and not equal to the
/// detected tax or tip.
fn is_plausible_item_price(amount: Money, receipt: &ParsedReceipt) -> bool {
    amount.is_positive()
        && (receipt.total.is_zero() || amount < receipt.total)
        && amount != receipt.tax
        && amount != receipt.tip
}

/// Drops the first price match, turns every character other than ASCII
/// letters, digits and whitespace into a space, and trims.
pub fn clean_item_name(line: &str) -> String {
    let without_price = PRICE_PATTERN.replace(line, "");
    without_price
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const DINER: &str = "Coffee 3.50\nBagel 2.25\nSubtotal 5.75\nTax 0.50\nTotal 6.25";

    #[test]
    fn test_parse_simple_receipt() {
        let receipt = parse(DINER);

        assert_eq!(
            receipt.items,
            vec![
                LineItem::new("Coffee", Money::from_cents(350)),
                LineItem::new("Bagel", Money::from_cents(225)),
            ]
        );
        assert_eq!(receipt.subtotal, Money::from_cents(575));
        assert_eq!(receipt.tax, Money::from_cents(50));
        assert_eq!(receipt.tip, Money::zero());
        assert_eq!(receipt.total, Money::from_cents(625));
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse(DINER), parse(DINER));
    }

    #[test]
    fn test_no_currency_yields_empty_receipt() {
        for text in ["", "   \n\t\n  ", "THANK YOU\nCOME AGAIN", "Table 12 Server Bob"] {
            let receipt = parse(text);
            assert!(receipt.is_empty(), "expected empty receipt for {:?}", text);
            assert_eq!(receipt, ParsedReceipt::default());
        }
    }

    #[test]
    fn test_topmost_summary_line_wins() {
        let text = "Burger 9.00\nTotal 10.00\nFries 3.00\nTotal 12.00";
        let receipt = parse(text);
        assert_eq!(receipt.total, Money::from_cents(1000));
        // Fries (3.00) is below the topmost total and is kept; nothing else
        assert_eq!(receipt.items.len(), 2);
    }

    #[test]
    fn test_subtotal_not_mistaken_for_total() {
        let receipt = parse("Pasta 14.00\nSub-Total 14.00\nGST 0.70\nTotal 14.70");
        assert_eq!(receipt.subtotal, Money::from_cents(1400));
        assert_eq!(receipt.tax, Money::from_cents(70));
        assert_eq!(receipt.total, Money::from_cents(1470));
    }

    #[test]
    fn test_rule_order_first_match_wins_per_line() {
        assert_eq!(classify_summary_line("total tip 5.00"), Some(SummaryField::Total));
        assert_eq!(classify_summary_line("tip incl tax"), Some(SummaryField::Tip));
        assert_eq!(classify_summary_line("hst 13%"), Some(SummaryField::Tax));
        assert_eq!(classify_summary_line("subtotal"), Some(SummaryField::Subtotal));
        assert_eq!(classify_summary_line("sub total"), None);
        assert_eq!(classify_summary_line("fries"), None);
    }

    #[test]
    fn test_tip_and_gratuity() {
        let receipt = parse("Steak 30.00\nGratuity 5.40\nTotal 35.40");
        assert_eq!(receipt.tip, Money::from_cents(540));
        assert_eq!(receipt.items, vec![LineItem::new("Steak", Money::from_cents(3000))]);
        assert_eq!(receipt.tip_percent, Decimal::from(18));
    }

    #[test]
    fn test_subtotal_derived_from_items() {
        let receipt = parse("Tea 2.00\nScone 3.25\nTotal 5.25");
        assert_eq!(receipt.subtotal, Money::from_cents(525));
        assert_eq!(receipt.subtotal, receipt.item_sum());
    }

    #[test]
    fn test_percentages_of_subtotal() {
        let receipt = parse("Wine 40.00\nSubtotal 40.00\nTax 4.00\nTip 8.00\nTotal 52.00");
        assert_eq!(receipt.tax_percent, Decimal::from(10));
        assert_eq!(receipt.tip_percent, Decimal::from(20));
    }

    #[test]
    fn test_percentages_zero_without_subtotal() {
        let receipt = parse("Tax 1.00\nTotal 9.00");
        assert!(receipt.items.is_empty());
        assert!(receipt.subtotal.is_zero());
        assert_eq!(receipt.tax_percent, Decimal::ZERO);
        assert!(!receipt.is_empty());
    }

    #[test]
    fn test_skip_words_exclude_payment_lines() {
        let text = "Soup 6.00\nVISA CARD 20.00\nCash 20.00\nChange 14.00\nBalance 0.00";
        let receipt = parse(text);
        assert_eq!(receipt.items, vec![LineItem::new("Soup", Money::from_cents(600))]);
    }

    #[test]
    fn test_amounts_at_or_above_total_rejected() {
        let receipt = parse("Salad 8.00\nPAID 20.00\nTotal 20.00");
        assert_eq!(receipt.items, vec![LineItem::new("Salad", Money::from_cents(800))]);
    }

    #[test]
    fn test_amount_equal_to_tax_rejected() {
        // "Svc 1.20" escapes the skip words but matches the detected tax
        let receipt = parse("Nachos 9.00\nSvc 1.20\nTax 1.20\nTotal 10.20");
        assert_eq!(receipt.items, vec![LineItem::new("Nachos", Money::from_cents(900))]);
    }

    #[test]
    fn test_name_cleaning() {
        assert_eq!(clean_item_name("2x Fish & Chips $12.50"), "2x Fish   Chips");
        assert_eq!(clean_item_name("**Latte** 4.75"), "Latte");
        assert_eq!(clean_item_name("$ 4.75"), "");
    }

    #[test]
    fn test_name_falls_back_to_previous_line() {
        let receipt = parse("Margherita Pizza\n$ 11.00\nTotal 11.50");
        assert_eq!(
            receipt.items,
            vec![LineItem::new("Margherita Pizza", Money::from_cents(1100))]
        );
    }

    #[test]
    fn test_nameless_first_line_dropped() {
        let receipt = parse("$4.00\nTotal 4.40");
        assert!(receipt.items.is_empty());
    }

    #[test]
    fn test_malformed_precision_is_ignored() {
        let receipt = parse("Muffin 3.5\nScone 3\nCookie 2.00");
        assert_eq!(receipt.items, vec![LineItem::new("Cookie", Money::from_cents(200))]);
    }

    #[test]
    fn test_extra_decimals_read_first_two() {
        assert_eq!(find_amount("Fuel 1.239"), Some(Money::from_cents(123)));
    }

    #[test]
    fn test_absurd_digit_runs_do_not_panic() {
        let text = format!("Noise {}.99\nTotal 5.00", "9".repeat(60));
        let receipt = parse(&text);
        assert!(receipt.items.is_empty());
        assert_eq!(receipt.total, Money::from_cents(500));
    }

    #[test]
    fn test_huge_tax_over_tiny_subtotal() {
        let text = format!("Fries 0.01\nTax {}.00", "9".repeat(27));
        let receipt = parse(&text);
        assert_eq!(receipt.subtotal, Money::from_cents(1));
        assert!(receipt.tax.is_positive());
        assert_eq!(receipt.tax_percent, Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_item_sum_leaves_subtotal_zero() {
        let text: String = (0..100)
            .map(|i| format!("Item{} {}.00\n", i, "9".repeat(27)))
            .collect();
        let receipt = parse(&text);
        assert_eq!(receipt.items.len(), 100);
        assert!(receipt.subtotal.is_zero());
    }

    #[test]
    fn test_only_ascii_digits_form_prices() {
        assert_eq!(find_amount("٣.٥٠"), None);

        let receipt = parse("Soup ٣.٥٠ 4.00\nTotal 9.00");
        assert_eq!(receipt.items, vec![LineItem::new("Soup", Money::from_cents(400))]);
    }

    #[test]
    fn test_non_ascii_noise() {
        let receipt = parse("Café crème 4.20\n—— 0.00 ——\nTotal 4.20\n");
        // 4.20 is not below the total, so the only candidate is rejected
        assert!(receipt.items.is_empty());

        let receipt = parse("Café crème 4.20\nTotal 5.00\n");
        assert_eq!(receipt.items[0].name, "Caf  cr me");
    }
}
