use std::collections::BTreeSet;

use crate::report::row::InvoiceRow;

/// Bill numbers marked for payment. Keyed by bill number, never by serial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    bills: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, bill_number: &str) {
        if !self.bills.remove(bill_number) {
            self.bills.insert(bill_number.to_string());
        }
    }

    /// True when every visible bill is selected and there is at least one.
    pub fn all_selected(&self, visible: &[InvoiceRow]) -> bool {
        !visible.is_empty() && visible.iter().all(|row| self.bills.contains(&row.bill_number))
    }

    /// Select exactly the visible bills, or clear if they are all selected already.
    pub fn toggle_all(&mut self, visible: &[InvoiceRow]) {
        if self.all_selected(visible) {
            self.bills.clear();
        } else {
            self.bills = visible.iter().map(|row| row.bill_number.clone()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.bills.clear();
    }

    pub fn contains(&self, bill_number: &str) -> bool {
        self.bills.contains(bill_number)
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.bills.iter().map(String::as_str)
    }

    /// Outstanding total of the selected bills present in `visible`.
    /// A selected bill that is no longer visible contributes nothing.
    pub fn aggregate(&self, visible: &[InvoiceRow]) -> f64 {
        self.bills
            .iter()
            .map(|bill| {
                visible
                    .iter()
                    .find(|row| &row.bill_number == bill)
                    .map(|row| row.outstanding_amount)
                    .unwrap_or(0.0)
            })
            .sum()
    }
}
