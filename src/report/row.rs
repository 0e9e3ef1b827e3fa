use serde::Serialize;
use std::fmt;

use crate::currency::{format_inr, parse_amount};
use crate::error::{InvoiceError, Result};

/// Column positions in `reportData` rows.
pub mod col {
    pub const SERIAL: usize = 0;
    pub const BILL_NO: usize = 1;
    pub const INVOICE_DATE: usize = 2;
    pub const UNIT_NAME: usize = 3;
    pub const ITEM_AMOUNT: usize = 4;
    pub const TAX_AMOUNT: usize = 5;
    pub const INVOICE_AMOUNT: usize = 6;
    pub const ROUNDOFF_AMOUNT: usize = 7;
    pub const OUTSTANDING_AMOUNT: usize = 8;
    pub const PAYMENT_STATUS: usize = 9;
}

/// Header names used when the server omits `headers`.
pub const DEFAULT_HEADERS: [&str; 10] = [
    "Sr. No.",
    "Bill No",
    "Invoice Date",
    "Unit Name",
    "Total Invoice Item Amount",
    "Total Tax Amount",
    "Total Invoice Amount",
    "Total Roundoff Amount",
    "Invoice Outstanding Amount",
    "Payment Status",
];

/// Extra spellings accepted per column on top of `DEFAULT_HEADERS`.
const HEADER_ALIASES: [&[&str]; 10] = [
    &["srno", "serialno", "serialnumber", "sno"],
    &["billno", "billnumber", "invoiceno", "invoicenumber"],
    &["date", "billdate"],
    &["unit", "unitname"],
    &["itemamount", "invoiceitemamount"],
    &["taxamount", "tax"],
    &["invoiceamount", "amount"],
    &["roundoffamount", "roundoff"],
    &["outstandingamount", "invoutstandingamount", "outstanding"],
    &["status"],
];

pub const UNIT_FALLBACK: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Due,
}

impl PaymentStatus {
    /// Trimmed, case-insensitive match of the wire value.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("PAID") {
            Some(PaymentStatus::Paid)
        } else if trimmed.eq_ignore_ascii_case("DUE") {
            Some(PaymentStatus::Due)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Due => "DUE",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which screen a report feeds. The two screens disagree on the status of
/// rows that carry none, so the default travels with the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Invoice,
    Outstanding,
}

impl ReportKind {
    pub fn default_status(self) -> PaymentStatus {
        match self {
            ReportKind::Invoice => PaymentStatus::Paid,
            ReportKind::Outstanding => PaymentStatus::Due,
        }
    }
}

/// One reporting record. `bill_number` is the identity; `serial_number` is
/// display-only and may be reassigned by a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub serial_number: u32,
    pub bill_number: String,
    pub invoice_date: String,
    pub unit_name: String,
    pub item_amount: f64,
    pub tax_amount: f64,
    pub invoice_amount: f64,
    pub roundoff_amount: f64,
    pub outstanding_amount: f64,
    pub payment_status: PaymentStatus,
    /// Amount cells as the server sent them, in column order.
    #[serde(skip)]
    pub amount_text: [String; 5],
}

impl InvoiceRow {
    /// Case-insensitive substring match against every field's display form.
    /// Amounts match both the wire text and the formatted `12,34,567.89` form.
    pub fn matches(&self, needle_lower: &str) -> bool {
        let numeric = [
            self.item_amount,
            self.tax_amount,
            self.invoice_amount,
            self.roundoff_amount,
            self.outstanding_amount,
        ];

        self.serial_number.to_string().contains(needle_lower)
            || self.bill_number.to_lowercase().contains(needle_lower)
            || self.invoice_date.to_lowercase().contains(needle_lower)
            || self.unit_name.to_lowercase().contains(needle_lower)
            || self.amount_text.iter().any(|t| t.to_lowercase().contains(needle_lower))
            || numeric.iter().any(|v| format_inr(*v).contains(needle_lower))
            || self.payment_status.as_str().to_lowercase().contains(needle_lower)
    }
}

fn cell(raw: &[String], index: usize) -> Option<&str> {
    raw.get(index).map(String::as_str).filter(|s| !s.trim().is_empty())
}

fn amount(raw: &[String], index: usize) -> f64 {
    cell(raw, index).map(parse_amount).unwrap_or(0.0)
}

/// Map one positional row. Short rows take the documented defaults.
pub fn normalize_row(raw: &[String], position: usize, kind: ReportKind) -> InvoiceRow {
    let serial_number = cell(raw, col::SERIAL)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(position as u32 + 1);

    let payment_status = match cell(raw, col::PAYMENT_STATUS) {
        None => kind.default_status(),
        Some(value) => PaymentStatus::parse(value).unwrap_or_else(|| {
            tracing::warn!(status = value, bill = ?raw.get(col::BILL_NO), "unrecognised payment status");
            kind.default_status()
        }),
    };

    InvoiceRow {
        serial_number,
        bill_number: cell(raw, col::BILL_NO).map(str::trim).unwrap_or_default().to_string(),
        invoice_date: cell(raw, col::INVOICE_DATE).unwrap_or_default().to_string(),
        unit_name: cell(raw, col::UNIT_NAME).unwrap_or(UNIT_FALLBACK).to_string(),
        item_amount: amount(raw, col::ITEM_AMOUNT),
        tax_amount: amount(raw, col::TAX_AMOUNT),
        invoice_amount: amount(raw, col::INVOICE_AMOUNT),
        roundoff_amount: amount(raw, col::ROUNDOFF_AMOUNT),
        outstanding_amount: amount(raw, col::OUTSTANDING_AMOUNT),
        payment_status,
        amount_text: [
            col::ITEM_AMOUNT,
            col::TAX_AMOUNT,
            col::INVOICE_AMOUNT,
            col::ROUNDOFF_AMOUNT,
            col::OUTSTANDING_AMOUNT,
        ]
        .map(|index| cell(raw, index).unwrap_or_default().trim().to_string()),
    }
}

/// Normalize a whole report, preserving server order.
pub fn normalize(rows: &[Vec<String>], kind: ReportKind) -> Vec<InvoiceRow> {
    rows.iter()
        .enumerate()
        .map(|(position, raw)| normalize_row(raw, position, kind))
        .collect()
}

fn header_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Check the server's headers against the positional contract before
/// trusting it. An empty list means the server sent none.
pub fn validate_headers(headers: &[String]) -> Result<()> {
    for (index, found) in headers.iter().enumerate().take(DEFAULT_HEADERS.len()) {
        let key = header_key(found);
        let expected = DEFAULT_HEADERS[index];
        let known = key == header_key(expected) || HEADER_ALIASES[index].contains(&key.as_str());
        if !known {
            return Err(InvoiceError::HeaderMismatch {
                index,
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}
