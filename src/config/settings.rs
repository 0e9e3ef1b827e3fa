use serde::{Deserialize, Serialize};

use crate::config::access::Access;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiSettings,
    pub customer: CustomerProfile,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub payment: PaymentSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Tried in order; the next one is used only when the previous returns 404.
    #[serde(default = "default_invoice_paths")]
    pub invoice_report_paths: Vec<String>,
    #[serde(default = "default_outstanding_paths")]
    pub outstanding_report_paths: Vec<String>,
    #[serde(default = "default_true")]
    pub strict_headers: bool,
}

/// Who is signed in. The display name doubles as the default customer filter.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CustomerProfile {
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_merchant")]
    pub merchant_name: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_tds")]
    pub default_tds: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            key: String::new(),
            merchant_name: default_merchant(),
            description: default_description(),
            default_tds: default_tds(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_invoice_paths() -> Vec<String> {
    [
        "/invoice/getInvoiceReportTable",
        "/invoice/getInvoiceReport",
        "/api/invoice/getInvoiceReportTable",
        "/invoices/getInvoiceReportTable",
        "/getInvoiceReportTable",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_outstanding_paths() -> Vec<String> {
    vec!["/invoice/getOutstandingReport".to_string()]
}

fn default_merchant() -> String {
    "Invoice Desk".to_string()
}

fn default_description() -> String {
    "Payment for Due Invoices".to_string()
}

fn default_tds() -> String {
    "2".to_string()
}
