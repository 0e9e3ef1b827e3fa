use crate::api::ReportSummary;
use crate::report::row::{InvoiceRow, PaymentStatus};

pub const PAGE_SIZE: usize = 10;

/// Which slice of the report is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Paid invoices only.
    #[default]
    Report,
    /// Due invoices only, renumbered.
    Due,
    /// Server already filtered to due invoices; every row shown, renumbered.
    Outstanding,
}

impl ViewMode {
    fn keeps(self, row: &InvoiceRow) -> bool {
        match self {
            ViewMode::Report => row.payment_status == PaymentStatus::Paid,
            ViewMode::Due => row.payment_status == PaymentStatus::Due,
            ViewMode::Outstanding => true,
        }
    }

    fn renumbers(self) -> bool {
        !matches!(self, ViewMode::Report)
    }

    pub fn allows_selection(self) -> bool {
        self.renumbers()
    }
}

/// Filtered, searchable, paginated view over one report response.
#[derive(Debug, Clone, Default)]
pub struct ReportView {
    rows: Vec<InvoiceRow>,
    summary: ReportSummary,
    mode: ViewMode,
    search: String,
    current_page: usize,
    visible: Vec<InvoiceRow>,
}

impl ReportView {
    pub fn new(rows: Vec<InvoiceRow>, summary: ReportSummary, mode: ViewMode) -> Self {
        let mut view = ReportView {
            rows,
            summary,
            mode,
            search: String::new(),
            current_page: 1,
            visible: Vec::new(),
        };
        view.refilter();
        view
    }

    fn refilter(&mut self) {
        let needle = self.search.trim().to_lowercase();
        let mode = self.mode;

        self.visible = self
            .rows
            .iter()
            .filter(|row| mode.keeps(row))
            .enumerate()
            .map(|(i, row)| {
                let mut row = row.clone();
                if mode.renumbers() {
                    row.serial_number = i as u32 + 1;
                }
                row
            })
            .filter(|row| needle.is_empty() || row.matches(&needle))
            .collect();
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.current_page = 1;
        self.refilter();
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        self.current_page = 1;
        self.refilter();
    }

    /// All rows of the response, unfiltered.
    pub fn all_rows(&self) -> &[InvoiceRow] {
        &self.rows
    }

    /// Rows passing the mode filter and search, across all pages.
    pub fn visible_rows(&self) -> &[InvoiceRow] {
        &self.visible
    }

    /// True when the server returned nothing at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(PAGE_SIZE)
    }

    /// Page count as shown to the user; never zero.
    pub fn display_total_pages(&self) -> usize {
        self.total_pages().max(1)
    }

    pub fn page_rows(&self) -> &[InvoiceRow] {
        let start = (self.current_page - 1) * PAGE_SIZE;
        if start >= self.visible.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.visible.len());
        &self.visible[start..end]
    }

    /// Jump to `page`. Returns false and leaves the page alone when out of range.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.current_page > 1 && self.set_page(self.current_page - 1)
    }

    /// Server summary, unless a search narrowed the rows, in which case the
    /// visible rows are summed here.
    pub fn summary(&self) -> ReportSummary {
        let narrowed = !self.search.trim().is_empty() && self.visible.len() != self.rows.len();
        if !narrowed {
            return self.summary.clone();
        }

        let mut summary = ReportSummary::default();
        for row in &self.visible {
            summary.total_invoice_item_amount += row.item_amount;
            summary.total_tax_amount += row.tax_amount;
            summary.total_invoice_amount += row.invoice_amount;
            summary.total_roundoff_amount += row.roundoff_amount;
            summary.total_outstanding_amount += row.outstanding_amount;
            match row.payment_status {
                PaymentStatus::Paid => summary.paid_invoices += 1,
                PaymentStatus::Due => summary.due_invoices += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::row::{normalize, ReportKind};

    fn report(statuses: &[&str]) -> Vec<InvoiceRow> {
        let raw: Vec<Vec<String>> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                vec![
                    (i + 1).to_string(),
                    format!("INV-{:03}", i + 1),
                    "01/01/2026".to_string(),
                    if i % 2 == 0 { "Pune" } else { "Nashik" }.to_string(),
                    "100".to_string(),
                    "18".to_string(),
                    "118".to_string(),
                    "0".to_string(),
                    if *status == "DUE" { "118" } else { "0" }.to_string(),
                    status.to_string(),
                ]
            })
            .collect();
        normalize(&raw, ReportKind::Invoice)
    }

    #[test]
    fn test_report_mode_keeps_only_paid() {
        let view = ReportView::new(report(&["PAID", "DUE", "PAID"]), ReportSummary::default(), ViewMode::Report);
        assert_eq!(view.visible_rows().len(), 2);
        assert!(view.visible_rows().iter().all(|r| r.payment_status == PaymentStatus::Paid));
        assert_eq!(view.visible_rows()[1].serial_number, 3);
    }

    #[test]
    fn test_due_mode_renumbers_without_touching_bill_numbers() {
        let mut view = ReportView::new(report(&["PAID", "DUE", "PAID", "DUE"]), ReportSummary::default(), ViewMode::Report);
        view.set_mode(ViewMode::Due);
        let rows = view.visible_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].serial_number, rows[0].bill_number.as_str()), (1, "INV-002"));
        assert_eq!((rows[1].serial_number, rows[1].bill_number.as_str()), (2, "INV-004"));
        assert!(rows.iter().all(|r| r.payment_status == PaymentStatus::Due));
    }

    #[test]
    fn test_mode_and_search_reset_page() {
        let mut view = ReportView::new(report(&["DUE"; 25]), ReportSummary::default(), ViewMode::Due);
        assert!(view.set_page(3));
        view.set_mode(ViewMode::Due);
        assert_eq!(view.current_page(), 1);

        assert!(view.set_page(2));
        view.set_search("inv");
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_pagination_bounds() {
        let mut view = ReportView::new(report(&["PAID"; 21]), ReportSummary::default(), ViewMode::Report);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.page_rows().len(), 10);
        assert!(!view.set_page(0));
        assert!(!view.set_page(4));
        assert_eq!(view.current_page(), 1);
        assert!(!view.prev_page());

        assert!(view.set_page(3));
        assert_eq!(view.page_rows().len(), 1);
        assert!(!view.next_page());
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn test_empty_report_has_one_display_page() {
        let mut view = ReportView::new(Vec::new(), ReportSummary::default(), ViewMode::Report);
        assert!(view.is_empty());
        assert_eq!(view.total_pages(), 0);
        assert_eq!(view.display_total_pages(), 1);
        assert!(view.page_rows().is_empty());
        assert!(!view.next_page());
    }

    #[test]
    fn test_search_is_case_insensitive_and_resums() {
        let server = ReportSummary {
            total_invoice_amount: 999.0,
            ..ReportSummary::default()
        };
        let mut view = ReportView::new(report(&["PAID", "PAID", "PAID"]), server.clone(), ViewMode::Report);
        assert_eq!(view.summary(), server);

        view.set_search("NASHIK");
        assert_eq!(view.visible_rows().len(), 1);
        let summary = view.summary();
        assert_eq!(summary.total_invoice_amount, 118.0);
        assert_eq!(summary.paid_invoices, 1);

        view.set_search("");
        assert_eq!(view.visible_rows().len(), 3);
        assert_eq!(view.summary(), server);
    }

    #[test]
    fn test_outstanding_mode_shows_everything() {
        let view = ReportView::new(report(&["DUE", "PAID"]), ReportSummary::default(), ViewMode::Outstanding);
        assert_eq!(view.visible_rows().len(), 2);
    }

    #[test]
    fn test_search_finds_formatted_amounts() {
        let mut view = ReportView::new(report(&["PAID", "DUE", "DUE"]), ReportSummary::default(), ViewMode::Due);
        view.set_search("118.00");
        assert_eq!(view.visible_rows().len(), 2);

        view.set_search("1,18");
        assert!(view.visible_rows().is_empty());
    }
}
