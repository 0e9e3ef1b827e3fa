pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod payment;
pub mod report;
pub mod settlement;

pub use api::{ReportClient, ReportQuery, ReportResponse, ReportSummary};
pub use config::{Config, CustomerProfile, PaymentSettings};
pub use error::{InvoiceError, Result};
pub use report::{InvoiceRow, PaymentStatus, ReportKind, ReportSession, ReportView, SelectionSet, ViewMode};
pub use settlement::{calculate, SettlementBreakdown, TdsRate};
