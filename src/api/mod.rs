mod client;
mod request;
mod response;

pub use client::{HttpReply, ReportClient, Transport, UreqTransport};
pub use request::{parse_date, DateFormat, ReportPayload, ReportQuery};
pub use response::{error_message, ReportResponse, ReportSummary};
