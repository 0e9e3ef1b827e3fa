pub mod access;
mod settings;

pub use access::{Access, Feature, Role};
pub use settings::{ApiSettings, Config, CustomerProfile, PaymentSettings};

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (XDG config dir, else ~/.invoice-desk/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoice-desk") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".invoice-desk"))
}

/// Load config.toml from the config directory
pub fn load_config(config_dir: &PathBuf) -> Result<Config> {
    if !config_dir.exists() {
        return Err(InvoiceError::ConfigNotFound(config_dir.clone()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(InvoiceError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    parse_config(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

pub fn parse_config(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Create the config directory and write the template
pub fn init_config(config_dir: &PathBuf) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(config_dir.clone()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://192.168.1.10:8080"
# token = "..."                  # optional, sent as a Bearer token
timeout_secs = 30
# Candidates are tried in order; the next one is used only after a 404.
invoice_report_paths = [
  "/invoice/getInvoiceReportTable",
  "/invoice/getInvoiceReport",
  "/api/invoice/getInvoiceReportTable",
  "/invoices/getInvoiceReportTable",
  "/getInvoiceReportTable",
]
outstanding_report_paths = ["/invoice/getOutstandingReport"]
strict_headers = true            # refuse reports whose columns are out of order

[customer]
display_name = "Your Company Name"
email = "accounts@yourcompany.com"
contact = "9999999999"

[access]
# 1 = create order, 2 = account (invoices & payments), 3 = config,
# 4 = stock search, 5 = reports
roles = ["2"]

[payment]
key = "rzp_test_xxxxxxxxxxxx"
merchant_name = "Your Company Name"
description = "Payment for Due Invoices"
default_tds = "2"                # 2 or 10
"#;
