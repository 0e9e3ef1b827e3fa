mod row;
mod selection;
mod session;
mod view;

pub use row::{
    col, normalize, normalize_row, validate_headers, InvoiceRow, PaymentStatus, ReportKind,
    DEFAULT_HEADERS, UNIT_FALLBACK,
};
pub use selection::SelectionSet;
pub use session::{FetchTicket, ReportSession};
pub use view::{ReportView, ViewMode, PAGE_SIZE};
