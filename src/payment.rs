use serde::Serialize;

use crate::config::{CustomerProfile, PaymentSettings};
use crate::error::{InvoiceError, Result};
use crate::report::ReportSession;
use crate::currency::to_paise;
use crate::settlement::{calculate, prefill_override, SettlementBreakdown, TdsRate};

pub const CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutNotes {
    pub invoice_amount: String,
    pub tds_percentage: String,
    pub tds_amount: String,
}

/// Options handed to the external checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    pub key: String,
    /// Paise.
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub prefill: Prefill,
    pub notes: CheckoutNotes,
}

impl CheckoutRequest {
    /// Build the checkout options for a settled amount. Runs the TDS gate first.
    pub fn build(
        breakdown: &SettlementBreakdown,
        customer: &CustomerProfile,
        settings: &PaymentSettings,
    ) -> Result<Self> {
        breakdown.validate()?;
        if breakdown.total_transaction.is_nan() || breakdown.total_transaction <= 0.0 {
            return Err(InvoiceError::InvalidPaymentAmount);
        }

        Ok(Self {
            key: settings.key.clone(),
            amount: to_paise(breakdown.total_transaction),
            currency: CURRENCY.to_string(),
            name: settings.merchant_name.clone(),
            description: settings.description.clone(),
            prefill: Prefill {
                name: customer.display_name.clone(),
                email: customer.email.clone().unwrap_or_default(),
                contact: customer.contact.clone().unwrap_or_default(),
            },
            notes: CheckoutNotes {
                invoice_amount: breakdown.total_amount.to_string(),
                tds_percentage: breakdown.rate.to_string(),
                tds_amount: breakdown.tds_amount.to_string(),
            },
        })
    }
}

/// External checkout flow. Resolves once with a payment id or rejects once
/// with a human-readable reason.
pub trait Checkout {
    fn open(&self, request: &CheckoutRequest) -> std::result::Result<String, String>;
}

/// Settle the invoices currently selected in `session`. Without an explicit
/// override the deduction is the pre-filled two-decimal TDS field.
pub fn settle_selection(
    session: &ReportSession,
    rate: TdsRate,
    tds_override: Option<&str>,
    customer: &CustomerProfile,
    settings: &PaymentSettings,
) -> Result<(SettlementBreakdown, CheckoutRequest)> {
    if !session.can_pay() {
        return Err(InvoiceError::NothingSelected);
    }
    let total = session.selected_total();
    let prefilled = prefill_override(total, rate);
    let breakdown = calculate(total, rate, Some(tds_override.unwrap_or(&prefilled)));
    let request = CheckoutRequest::build(&breakdown, customer, settings)?;
    Ok((breakdown, request))
}

/// Hand `request` to the checkout. On success the selection is cleared and
/// the payment id returned; the caller re-fetches the report.
pub fn pay(session: &mut ReportSession, checkout: &dyn Checkout, request: &CheckoutRequest) -> Result<String> {
    match checkout.open(request) {
        Ok(payment_id) => {
            tracing::info!(%payment_id, amount = request.amount, "payment completed");
            session.payment_succeeded();
            Ok(payment_id)
        }
        Err(reason) if reason.to_lowercase().contains("cancel") => Err(InvoiceError::PaymentCancelled),
        Err(reason) => {
            let reason = if reason.trim().is_empty() {
                "Payment failed".to_string()
            } else {
                reason
            };
            Err(InvoiceError::Payment(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ReportResponse;
    use crate::report::ReportKind;

    struct Approve;
    impl Checkout for Approve {
        fn open(&self, _: &CheckoutRequest) -> std::result::Result<String, String> {
            Ok("pay_123".to_string())
        }
    }

    struct Reject(&'static str);
    impl Checkout for Reject {
        fn open(&self, _: &CheckoutRequest) -> std::result::Result<String, String> {
            Err(self.0.to_string())
        }
    }

    fn customer() -> CustomerProfile {
        CustomerProfile {
            display_name: "Acme Traders".to_string(),
            email: Some("accounts@acme.example".to_string()),
            contact: None,
        }
    }

    fn session_with_selection() -> ReportSession {
        session_selecting("1000")
    }

    fn session_selecting(outstanding: &str) -> ReportSession {
        let mut session = ReportSession::new(ReportKind::Outstanding, false);
        let ticket = session.begin_fetch();
        let response = ReportResponse {
            success: true,
            report_data: vec![vec![
                "1", "INV-9", "01/01/2026", "U", "0", "0", outstanding, "0", outstanding, "DUE",
            ]
            .into_iter()
            .map(String::from)
            .collect()],
            ..ReportResponse::default()
        };
        session.apply(ticket, response).unwrap();
        session.toggle("INV-9");
        session
    }

    #[test]
    fn test_checkout_request_in_paise() {
        let breakdown = calculate(1000.0, TdsRate::Ten, None);
        let request = CheckoutRequest::build(&breakdown, &customer(), &PaymentSettings::default()).unwrap();
        assert_eq!(request.amount, 92124);
        assert_eq!(request.currency, "INR");
        assert_eq!(request.prefill.name, "Acme Traders");
        assert_eq!(request.prefill.contact, "");
        assert_eq!(request.notes.invoice_amount, "1000");
        assert_eq!(request.notes.tds_percentage, "10");
        assert_eq!(request.notes.tds_amount, "100");
    }

    #[test]
    fn test_invalid_deduction_blocks_checkout() {
        let breakdown = calculate(100.0, TdsRate::Two, Some("150"));
        let result = CheckoutRequest::build(&breakdown, &customer(), &PaymentSettings::default());
        assert!(matches!(result, Err(InvoiceError::InvalidDeduction { .. })));
    }

    #[test]
    fn test_successful_payment_clears_selection() {
        let mut session = session_with_selection();
        let (breakdown, request) =
            settle_selection(&session, TdsRate::Two, None, &customer(), &PaymentSettings::default()).unwrap();
        assert_eq!(breakdown.total_amount, 1000.0);

        let id = pay(&mut session, &Approve, &request).unwrap();
        assert_eq!(id, "pay_123");
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_rejection_is_verbatim_and_keeps_selection() {
        let mut session = session_with_selection();
        let (_, request) =
            settle_selection(&session, TdsRate::Two, None, &customer(), &PaymentSettings::default()).unwrap();

        let err = pay(&mut session, &Reject("Card declined by bank"), &request).unwrap_err();
        assert_eq!(err.to_string(), "Payment failed: Card declined by bank");
        assert_eq!(session.selection().len(), 1);

        let err = pay(&mut session, &Reject("Payment Cancelled by user"), &request).unwrap_err();
        assert!(matches!(err, InvoiceError::PaymentCancelled));
    }

    #[test]
    fn test_nothing_selected() {
        let session = ReportSession::new(ReportKind::Outstanding, false);
        let result = settle_selection(&session, TdsRate::Two, None, &customer(), &PaymentSettings::default());
        assert!(matches!(result, Err(InvoiceError::NothingSelected)));
    }

    #[test]
    fn test_selection_uses_prefilled_deduction() {
        let session = session_selecting("1000.06");
        let (breakdown, request) =
            settle_selection(&session, TdsRate::Ten, None, &customer(), &PaymentSettings::default()).unwrap();
        assert_eq!(breakdown.tds_amount, 100.01);
        assert_eq!(request.amount, 92129);

        let direct = calculate(1000.06, TdsRate::Ten, Some(&prefill_override(1000.06, TdsRate::Ten)));
        let direct = CheckoutRequest::build(&direct, &customer(), &PaymentSettings::default()).unwrap();
        assert_eq!(direct.amount, request.amount);
    }

    #[test]
    fn test_explicit_override_beats_prefill() {
        let session = session_selecting("1000.06");
        let (breakdown, _) =
            settle_selection(&session, TdsRate::Ten, Some("0"), &customer(), &PaymentSettings::default()).unwrap();
        assert_eq!(breakdown.tds_amount, 0.0);
    }
}
