use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{InvoiceError, Result};

/// Processing fee charged on the amount actually transferred.
pub const TRANSFER_CHARGE_RATE: f64 = 0.02;

/// GST levied on the transfer charge.
pub const GST_ON_CHARGE_RATE: f64 = 0.18;

/// TDS rates a payer may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TdsRate {
    #[default]
    Two,
    Ten,
}

impl TdsRate {
    pub const ALL: [TdsRate; 2] = [TdsRate::Two, TdsRate::Ten];

    pub fn percent(self) -> f64 {
        match self {
            TdsRate::Two => 2.0,
            TdsRate::Ten => 10.0,
        }
    }
}

impl fmt::Display for TdsRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percent())
    }
}

impl FromStr for TdsRate {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_end_matches('%') {
            "2" => Ok(TdsRate::Two),
            "10" => Ok(TdsRate::Ten),
            other => Err(InvoiceError::InvalidTdsRate(other.to_string())),
        }
    }
}

/// Derived payment figures for one settlement. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SettlementBreakdown {
    pub total_amount: f64,
    pub rate: f64,
    pub calculated_tds: f64,
    pub tds_amount: f64,
    pub transfer_amount: f64,
    pub transfer_charge: f64,
    pub gst_on_transfer_charge: f64,
    pub total_transaction: f64,
}

impl SettlementBreakdown {
    /// Gate applied before a payment is submitted. The calculation itself never fails.
    pub fn validate(&self) -> Result<()> {
        if self.tds_amount < 0.0 || self.tds_amount > self.total_amount {
            return Err(InvoiceError::InvalidDeduction {
                amount: self.tds_amount,
                max: self.total_amount,
            });
        }
        Ok(())
    }
}

/// Compute the payable total for `total_amount` after TDS.
///
/// `tds_override` is the raw text of the editable TDS field; when it parses
/// as a number it replaces the rate-derived deduction. Operation order
/// matters for the last displayed paisa and must not be rearranged.
pub fn calculate(total_amount: f64, rate: TdsRate, tds_override: Option<&str>) -> SettlementBreakdown {
    let calculated_tds = total_amount * rate.percent() / 100.0;

    let tds_amount = tds_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .unwrap_or(calculated_tds);

    let transfer_amount = total_amount - tds_amount;
    let transfer_charge = transfer_amount * TRANSFER_CHARGE_RATE;
    let gst_on_transfer_charge = transfer_charge * GST_ON_CHARGE_RATE;
    let total_transaction = transfer_amount + transfer_charge + gst_on_transfer_charge;

    SettlementBreakdown {
        total_amount,
        rate: rate.percent(),
        calculated_tds,
        tds_amount,
        transfer_amount,
        transfer_charge,
        gst_on_transfer_charge,
        total_transaction,
    }
}

/// Text the editable TDS field starts with whenever the rate or total changes.
pub fn prefill_override(total_amount: f64, rate: TdsRate) -> String {
    format!("{:.2}", total_amount * rate.percent() / 100.0)
}
