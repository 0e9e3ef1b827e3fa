use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{InvoiceError, Result};
use crate::report::PaymentStatus;

/// Date layout used in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// DD/MM/YYYY, tried first.
    DayFirst,
    /// YYYY-MM-DD, sent only after the server rejects the first layout with 400.
    Iso,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::DayFirst => "%d/%m/%Y",
            DateFormat::Iso => "%Y-%m-%d",
        }
    }

    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// Parse a user-supplied date in either accepted layout.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| InvoiceError::InvalidDate(input.to_string()))
}

/// Search form for a report fetch.
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub customer_name: String,
    pub bill_no: String,
    pub units: Vec<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// JSON body posted to a report endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub customer_name: Option<String>,
    pub bill_no: Option<String>,
    pub unit: Option<Vec<String>>,
    pub from_date: String,
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ReportQuery {
    /// Client-side checks run before anything goes on the wire.
    pub fn validate(&self) -> Result<NaiveDate> {
        let from = self.from_date.ok_or(InvoiceError::MissingFromDate)?;
        if let Some(to) = self.to_date {
            if from > to {
                return Err(InvoiceError::InvalidDateRange);
            }
        }
        Ok(from)
    }

    /// Build the body. `due_only` pins the server-side status filter.
    pub fn payload(&self, format: DateFormat, due_only: bool) -> Result<ReportPayload> {
        let from = self.validate()?;
        let units: Vec<String> = self.units.iter().filter_map(|u| non_blank(u)).collect();

        Ok(ReportPayload {
            customer_name: non_blank(&self.customer_name),
            bill_no: non_blank(&self.bill_no),
            unit: (!units.is_empty()).then_some(units),
            from_date: format.format(from),
            to_date: self.to_date.map(|d| format.format(d)),
            payment_status: due_only.then_some(PaymentStatus::Due),
        })
    }
}
