//! # Bill Editing
//!
//! Builds and edits [`BillState`] snapshots between parsing and splitting.
//!
//! ## Snapshot Edits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ParsedReceipt ──► BillState::from_receipt(people, &receipt)            │
//! │                          │                                              │
//! │        user edits        ▼                                              │
//! │   ┌── with_item_updated / with_item_removed / with_item_added ──┐       │
//! │   │   with_assignment / with_payer / with_tax / with_tip        │       │
//! │   └─────────────── each returns a NEW BillState ◄───────────────┘       │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                 split::compute_split(&bill)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here mutates a bill in place. The caller replaces its snapshot
//! with the returned one, so the splitter always sees one consistent value.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Assignment, BillState, ChargeSetting, LineItem, ParsedReceipt};
use crate::validation::{
    validate_charge, validate_item_count, validate_item_name, validate_people_count,
    validate_person_name, validate_price, ValidationResult,
};

impl BillState {
    /// Creates an empty bill for the given participants.
    ///
    /// Names are trimmed and must be non-empty.
    ///
    /// ## Example
    /// ```rust
    /// use tabsplit_core::BillState;
    ///
    /// let bill = BillState::new(["Alice", " Bob "]).unwrap();
    /// assert_eq!(bill.people, vec!["Alice", "Bob"]);
    /// assert!(BillState::new(Vec::<String>::new()).is_err());
    /// ```
    pub fn new<I, S>(people: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let people = people
            .into_iter()
            .map(|name| validate_person_name(name.as_ref()))
            .collect::<ValidationResult<Vec<_>>>()?;
        validate_people_count(people.len())?;

        Ok(BillState {
            people,
            items: Vec::new(),
            assignment: Assignment::new(),
            tax: ChargeSetting::default(),
            tip: ChargeSetting::default(),
            payer: None,
        })
    }

    /// Starts a bill from a parsed receipt.
    ///
    /// Items are copied as-is. Tax and tip default to the receipt's detected
    /// absolute amounts when present (see [`ParsedReceipt::default_tax_setting`]).
    pub fn from_receipt<I, S>(people: I, receipt: &ParsedReceipt) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_item_count(receipt.items.len())?;
        let bill = BillState::new(people)?;

        Ok(BillState {
            items: receipt.items.clone(),
            tax: receipt.default_tax_setting(),
            tip: receipt.default_tip_setting(),
            ..bill
        })
    }

    // =========================================================================
    // Item Edits
    // =========================================================================

    /// Appends an item (manual addition).
    pub fn with_item_added(&self, item: LineItem) -> CoreResult<Self> {
        validate_line_item(&item)?;
        validate_item_count(self.items.len() + 1)?;

        let mut next = self.clone();
        next.items.push(item);
        Ok(next)
    }

    /// Replaces the item at `index`. Its assignment is kept.
    pub fn with_item_updated(&self, index: usize, item: LineItem) -> CoreResult<Self> {
        self.check_item(index)?;
        validate_line_item(&item)?;

        let mut next = self.clone();
        next.items[index] = item;
        Ok(next)
    }

    /// Deletes the item at `index` and renumbers the assignment so every
    /// remaining item keeps its person.
    pub fn with_item_removed(&self, index: usize) -> CoreResult<Self> {
        self.check_item(index)?;

        let mut next = self.clone();
        next.items.remove(index);
        next.assignment = self.assignment.without_item(index);
        Ok(next)
    }

    // =========================================================================
    // Assignment Edits
    // =========================================================================

    /// Assigns item `item` to person `person`.
    pub fn with_assignment(&self, item: usize, person: usize) -> CoreResult<Self> {
        self.check_item(item)?;
        self.check_person(person)?;

        let mut next = self.clone();
        next.assignment.assign(item, person);
        Ok(next)
    }

    /// Clears the assignment for item `item`.
    pub fn without_assignment(&self, item: usize) -> CoreResult<Self> {
        self.check_item(item)?;

        let mut next = self.clone();
        next.assignment.unassign(item);
        Ok(next)
    }

    /// Records who paid.
    pub fn with_payer(&self, person: usize) -> CoreResult<Self> {
        self.check_person(person)?;

        Ok(BillState {
            payer: Some(person),
            ..self.clone()
        })
    }

    // =========================================================================
    // Charge Edits
    // =========================================================================

    /// Replaces the tax setting.
    pub fn with_tax(&self, tax: ChargeSetting) -> CoreResult<Self> {
        validate_charge(&tax, "tax")?;
        Ok(BillState { tax, ..self.clone() })
    }

    /// Replaces the tip setting.
    pub fn with_tip(&self, tip: ChargeSetting) -> CoreResult<Self> {
        validate_charge(&tip, "tip")?;
        Ok(BillState { tip, ..self.clone() })
    }

    // =========================================================================
    // People Edits
    // =========================================================================

    /// Adds a participant at the end.
    pub fn with_person_added(&self, name: &str) -> CoreResult<Self> {
        let name = validate_person_name(name)?;
        validate_people_count(self.people.len() + 1)?;

        let mut next = self.clone();
        next.people.push(name);
        Ok(next)
    }

    /// Removes a participant.
    ///
    /// Their items become unassigned, higher person indices shift down, and
    /// the payer is cleared if it was this person.
    pub fn with_person_removed(&self, index: usize) -> CoreResult<Self> {
        self.check_person(index)?;
        if self.people.len() == 1 {
            return Err(CoreError::LastPerson);
        }

        let mut next = self.clone();
        next.people.remove(index);
        next.assignment = self.assignment.without_person(index);
        next.payer = match self.payer {
            Some(payer) if payer == index => None,
            Some(payer) if payer > index => Some(payer - 1),
            other => other,
        };
        Ok(next)
    }

    // =========================================================================
    // Derived Figures
    // =========================================================================

    /// Sum of all item prices.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|item| item.price).sum()
    }

    /// Absolute tax for the current subtotal.
    pub fn tax_amount(&self) -> Money {
        self.tax.resolve(self.subtotal())
    }

    /// Absolute tip for the current subtotal.
    pub fn tip_amount(&self) -> Money {
        self.tip.resolve(self.subtotal())
    }

    /// Subtotal plus tax plus tip.
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax_amount() + self.tip_amount()
    }

    /// Indices of items nobody has been assigned to.
    pub fn unassigned_items(&self) -> Vec<usize> {
        self.assignment.unassigned(self.items.len())
    }

    /// Name of the person at `index`.
    pub fn person_name(&self, index: usize) -> Option<&str> {
        self.people.get(index).map(String::as_str)
    }

    // =========================================================================
    // Pre-Split Validation
    // =========================================================================

    /// Checks that the bill is ready to split.
    ///
    /// ## Check Order
    /// ```text
    /// people empty?            → NoPeople
    /// items empty?             → EmptyBill        (nothing to divide by)
    /// payer unset / invalid?   → NoPayerSelected
    /// any item unassigned?     → UnassignedItems { count, indices }
    /// assignment → no person?  → UnknownPerson
    /// negative / huge values?  → MustBeNonNegative / TooLarge
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_people_count(self.people.len())?;
        if self.items.is_empty() {
            return Err(ValidationError::EmptyBill);
        }
        validate_item_count(self.items.len())?;

        match self.payer {
            Some(payer) if payer < self.people.len() => {}
            _ => return Err(ValidationError::NoPayerSelected),
        }

        let unassigned = self.unassigned_items();
        if !unassigned.is_empty() {
            return Err(ValidationError::UnassignedItems {
                count: unassigned.len(),
                indices: unassigned,
            });
        }

        if let Some((item, person)) = self
            .assignment
            .iter()
            .find(|(item, person)| *item < self.items.len() && *person >= self.people.len())
        {
            return Err(ValidationError::UnknownPerson { item, person });
        }

        for item in &self.items {
            validate_line_item(item)?;
        }
        validate_charge(&self.tax, "tax")?;
        validate_charge(&self.tip, "tip")?;

        Ok(())
    }

    fn check_item(&self, index: usize) -> CoreResult<()> {
        if index >= self.items.len() {
            return Err(CoreError::ItemNotFound {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn check_person(&self, index: usize) -> CoreResult<()> {
        if index >= self.people.len() {
            return Err(CoreError::PersonNotFound {
                index,
                len: self.people.len(),
            });
        }
        Ok(())
    }
}

fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_price(item.price)
}

// =============================================================================
// Unit Tests
// =============================================================================
