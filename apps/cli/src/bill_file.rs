//! # Bill Files
//!
//! The TOML file a user edits between `scan` and `split`.
//!
//! ## Format
//! ```toml
//! people = ["Alice", "Bob"]
//! payer = 0                       # optional; absent = not selected
//!
//! [tax]
//! mode = "amount"                 # or "percentage"
//! value = "3.00"
//!
//! [tip]
//! mode = "percentage"
//! value = "18"
//!
//! [[items]]
//! name = "Coffee"
//! price = "3.50"
//! person = 0                      # optional; absent = unassigned
//! ```
//!
//! Assignments live on the items rather than in a separate map because TOML
//! tables cannot have integer keys. Loading goes through the `BillState`
//! edit API, so a file gets exactly the checks an interactive edit would.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabsplit_core::{BillState, ChargeMode, ChargeSetting, LineItem, Money};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// A tax or tip entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChargeEntry {
    #[serde(default)]
    pub mode: ChargeMode,
    #[serde(default)]
    pub value: Decimal,
}

impl From<ChargeSetting> for ChargeEntry {
    fn from(setting: ChargeSetting) -> Self {
        ChargeEntry {
            mode: setting.mode,
            value: setting.value,
        }
    }
}

impl From<&ChargeEntry> for ChargeSetting {
    fn from(entry: &ChargeEntry) -> Self {
        ChargeSetting::percentage(entry.value).with_mode(entry.mode)
    }
}

/// One `[[items]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    #[serde(default)]
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<usize>,
}

/// On-disk bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillFile {
    pub people: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<usize>,
    #[serde(default)]
    pub tax: ChargeEntry,
    #[serde(default)]
    pub tip: ChargeEntry,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

impl BillFile {
    /// Reads and decodes a bill file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file = toml::from_str(&contents).map_err(|e| AppError::InvalidBill {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(?path, "Bill file loaded");
        Ok(file)
    }

    /// Writes the bill as pretty TOML.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        info!(?path, items = self.items.len(), "Bill file written");
        Ok(())
    }

    /// Builds the bill snapshot, one edit at a time.
    pub fn to_bill_state(&self) -> AppResult<BillState> {
        let mut bill = BillState::new(&self.people)?;

        for entry in &self.items {
            let item = LineItem::new(entry.name.clone(), Money::from_decimal(entry.price));
            bill = bill.with_item_added(item)?;
        }

        for (index, entry) in self.items.iter().enumerate() {
            if let Some(person) = entry.person {
                bill = bill.with_assignment(index, person)?;
            }
        }

        bill = bill
            .with_tax(ChargeSetting::from(&self.tax))?
            .with_tip(ChargeSetting::from(&self.tip))?;

        if let Some(payer) = self.payer {
            bill = bill.with_payer(payer)?;
        }

        Ok(bill)
    }
}

impl From<&BillState> for BillFile {
    fn from(bill: &BillState) -> Self {
        let items = bill
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemEntry {
                name: item.name.clone(),
                price: item.price.amount(),
                person: bill.assignment.person_for(index),
            })
            .collect();

        BillFile {
            people: bill.people.clone(),
            payer: bill.payer,
            tax: bill.tax.into(),
            tip: bill.tip.into(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsplit_core::{parse, CoreError};

    const BILL: &str = r#"
people = ["Alice", "Bob", "Cara"]
payer = 2

[tax]
mode = "amount"
value = "3.00"

[tip]
mode = "percentage"
value = "18"

[[items]]
name = "Pasta"
price = "10.00"
person = 0

[[items]]
name = "Pizza"
price = "20.00"
person = 1
"#;

    #[test]
    fn test_decode_documented_format() {
        let file: BillFile = toml::from_str(BILL).unwrap();
        let bill = file.to_bill_state().unwrap();

        assert_eq!(bill.people, vec!["Alice", "Bob", "Cara"]);
        assert_eq!(bill.payer, Some(2));
        assert_eq!(bill.tax, ChargeSetting::amount(Decimal::new(300, 2)));
        assert_eq!(bill.tip.mode, ChargeMode::Percentage);
        assert_eq!(bill.tip_amount(), Money::from_cents(540));
        assert_eq!(bill.assignment.person_for(1), Some(1));
        assert!(bill.validate().is_ok());
    }

    #[test]
    fn test_missing_optional_fields() {
        let file: BillFile = toml::from_str(
            "people = [\"Solo\"]\n\n[[items]]\nname = \"Soup\"\nprice = \"8.00\"\n",
        )
        .unwrap();
        let bill = file.to_bill_state().unwrap();

        assert_eq!(bill.payer, None);
        assert_eq!(bill.unassigned_items(), vec![0]);
        assert_eq!(bill.tax, ChargeSetting::default());
    }

    #[test]
    fn test_unknown_person_is_an_index_error() {
        let file: BillFile =
            toml::from_str("people = [\"Alice\"]\n\n[[items]]\nprice = \"1.00\"\nperson = 4\n")
                .unwrap();
        let err = file.to_bill_state().unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::PersonNotFound { index: 4, len: 1 })
        ));
    }

    #[test]
    fn test_draft_from_receipt_round_trips() {
        let receipt = parse("Coffee 3.50\nBagel 2.25\nSubtotal 5.75\nTax 0.50\nTotal 6.25");
        let bill = BillState::from_receipt(["Alice", "Bob"], &receipt).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts").join("bill.toml");
        BillFile::from(&bill).save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[[items]]"));
        assert!(!written.contains("payer"));

        let loaded = BillFile::load(&path).unwrap().to_bill_state().unwrap();
        assert_eq!(loaded, bill);
    }

    #[test]
    fn test_load_reports_path_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bill.toml");
        std::fs::write(&path, "people = \"not a list\"").unwrap();

        let err = BillFile::load(&path).unwrap_err();
        assert!(matches!(err, AppError::InvalidBill { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
