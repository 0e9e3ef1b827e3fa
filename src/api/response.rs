use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::currency::parse_amount;

/// Aggregate counters computed by the server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSummary {
    #[serde(deserialize_with = "lenient_f64")]
    pub total_invoice_item_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_tax_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_invoice_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_roundoff_amount: f64,
    #[serde(alias = "invOutstandingAmount", deserialize_with = "lenient_f64")]
    pub total_outstanding_amount: f64,
    #[serde(deserialize_with = "lenient_u64")]
    pub paid_invoices: u64,
    #[serde(alias = "outstandingInvoices", deserialize_with = "lenient_u64")]
    pub due_invoices: u64,
}

/// Body of a report endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportResponse {
    #[serde(deserialize_with = "lenient_bool")]
    pub success: bool,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_records: u64,
    #[serde(deserialize_with = "lenient_rows")]
    pub report_data: Vec<Vec<String>>,
    #[serde(deserialize_with = "lenient_strings")]
    pub headers: Vec<String>,
    pub summary: Option<ReportSummary>,
    pub message: Option<String>,
}

/// Pull a `message` out of an error body, if it is JSON and has one.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn value_to_cell(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_amount(&s),
        _ => 0.0,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(value_to_cell).collect(),
        _ => Vec::new(),
    })
}

fn lenient_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(rows) => rows
            .into_iter()
            .map(|row| match row {
                Value::Array(cells) => cells.into_iter().map(value_to_cell).collect(),
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_mixed_cell_types() {
        let body = r#"{
            "success": true,
            "totalRecords": 2,
            "reportData": [["1", "INV-1", "01/01/2026", null, 100, "18.00"], ["2", "INV-2"]],
            "headers": ["Sr. No.", "Bill No"],
            "summary": {"totalInvoiceAmount": "1,180.00", "invOutstandingAmount": 590, "paidInvoices": "1"},
            "message": "ok"
        }"#;
        let parsed: ReportResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.total_records, 2);
        assert_eq!(parsed.report_data[0][3], "");
        assert_eq!(parsed.report_data[0][4], "100");
        assert_eq!(parsed.report_data[1].len(), 2);

        let summary = parsed.summary.unwrap();
        assert_eq!(summary.total_invoice_amount, 1180.0);
        assert_eq!(summary.total_outstanding_amount, 590.0);
        assert_eq!(summary.paid_invoices, 1);
        assert_eq!(summary.due_invoices, 0);
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let parsed: ReportResponse =
            serde_json::from_str(r#"{"success": true, "reportData": null}"#).unwrap();
        assert!(parsed.report_data.is_empty());
        assert!(parsed.headers.is_empty());
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn test_outstanding_summary_aliases() {
        let summary: ReportSummary =
            serde_json::from_str(r#"{"totalOutstandingAmount": "800", "outstandingInvoices": 2}"#)
                .unwrap();
        assert_eq!(summary.total_outstanding_amount, 800.0);
        assert_eq!(summary.due_invoices, 2);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message": "Invalid date"}"#).as_deref(), Some("Invalid date"));
        assert_eq!(error_message(r#"{"message": ""}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }
}
