use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config directory not found at {0}. Run 'invoice-desk init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("From Date is required")]
    MissingFromDate,

    #[error("To Date should be greater than or equal to From Date")]
    InvalidDateRange,

    #[error("Invalid date '{0}'. Use YYYY-MM-DD or DD/MM/YYYY.")]
    InvalidDate(String),

    #[error("Invalid TDS amount {amount:.2} (must be between 0.00 and {max:.2})")]
    InvalidDeduction { amount: f64, max: f64 },

    #[error("Invalid TDS rate '{0}'. Use 2 or 10.")]
    InvalidTdsRate(String),

    #[error("Invalid payment amount")]
    InvalidPaymentAmount,

    #[error("No invoices selected for payment")]
    NothingSelected,

    #[error("Network error. Please check your connection or server IP. ({0})")]
    Connectivity(String),

    #[error("API endpoint not found. Please check with your backend team.")]
    EndpointNotFound,

    #[error("{message}")]
    Server {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed report response: {0}")]
    MalformedResponse(String),

    #[error("Report column {index} is '{found}', expected '{expected}'")]
    HeaderMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Payment failed: {0}")]
    Payment(String),

    #[error("Payment cancelled")]
    PaymentCancelled,

    #[error("Access denied: your account has no access to {0}")]
    AccessDenied(String),
}

impl InvoiceError {
    /// Build a server error from an HTTP status and whatever message the body carried.
    pub fn server(status: u16, message: Option<String>) -> Self {
        InvoiceError::Server {
            status: Some(status),
            message: message.unwrap_or_else(|| format!("Server Error: {status}")),
        }
    }

    /// True for errors caught before any request is sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            InvoiceError::MissingFromDate
                | InvoiceError::InvalidDateRange
                | InvoiceError::InvalidDate(_)
                | InvoiceError::InvalidDeduction { .. }
                | InvoiceError::InvalidTdsRate(_)
                | InvoiceError::InvalidPaymentAmount
                | InvoiceError::NothingSelected
        )
    }
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
