use crate::api::ReportResponse;
use crate::error::Result;
use crate::report::row::{normalize, validate_headers, ReportKind};
use crate::report::selection::SelectionSet;
use crate::report::view::{ReportView, ViewMode};

/// Tag handed out when a fetch starts. Only the newest ticket may install a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Screen-level state for one report screen: the last response, the view
/// over it, and the invoices picked for payment.
#[derive(Debug, Clone)]
pub struct ReportSession {
    kind: ReportKind,
    strict_headers: bool,
    latest: u64,
    view: Option<ReportView>,
    selection: SelectionSet,
}

impl ReportSession {
    pub fn new(kind: ReportKind, strict_headers: bool) -> Self {
        Self {
            kind,
            strict_headers,
            latest: 0,
            view: None,
            selection: SelectionSet::new(),
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Start a new fetch. The previous report and selection are dropped.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.view = None;
        self.selection.clear();
        FetchTicket(self.latest)
    }

    /// Install `response` if `ticket` is still the newest fetch.
    /// Returns `Ok(false)` when the response was stale and discarded.
    pub fn apply(&mut self, ticket: FetchTicket, response: ReportResponse) -> Result<bool> {
        if ticket.0 != self.latest {
            tracing::info!(ticket = ticket.0, latest = self.latest, "discarding stale report response");
            return Ok(false);
        }

        if self.strict_headers {
            validate_headers(&response.headers)?;
        }

        let rows = normalize(&response.report_data, self.kind);
        let mode = match self.kind {
            ReportKind::Invoice => ViewMode::Report,
            ReportKind::Outstanding => ViewMode::Outstanding,
        };
        self.view = Some(ReportView::new(rows, response.summary.unwrap_or_default(), mode));
        Ok(true)
    }

    pub fn view(&self) -> Option<&ReportView> {
        self.view.as_ref()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Switch between paid and due invoices. Outstanding reports have a single mode.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.kind == ReportKind::Outstanding {
            return;
        }
        if let Some(view) = self.view.as_mut() {
            if view.mode() != mode {
                self.selection.clear();
            }
            view.set_mode(mode);
        }
    }

    pub fn set_search(&mut self, search: &str) {
        if let Some(view) = self.view.as_mut() {
            view.set_search(search);
        }
    }

    pub fn set_page(&mut self, page: usize) -> bool {
        self.view.as_mut().is_some_and(|view| view.set_page(page))
    }

    fn selectable(&self) -> Option<&ReportView> {
        self.view.as_ref().filter(|view| view.mode().allows_selection())
    }

    /// Toggle one bill. Ignored outside the due views.
    pub fn toggle(&mut self, bill_number: &str) {
        if self.selectable().is_some() {
            self.selection.toggle(bill_number);
        }
    }

    pub fn toggle_all(&mut self) {
        if let Some(view) = self.view.as_ref().filter(|v| v.mode().allows_selection()) {
            self.selection.toggle_all(view.visible_rows());
        }
    }

    /// Outstanding total of the selection against what is currently visible.
    pub fn selected_total(&self) -> f64 {
        self.view
            .as_ref()
            .map(|view| self.selection.aggregate(view.visible_rows()))
            .unwrap_or(0.0)
    }

    /// The payment trigger is offered only for a non-zero selection.
    pub fn can_pay(&self) -> bool {
        self.selectable().is_some() && self.selected_total() > 0.0
    }

    /// Called once the checkout reports success. The caller should re-fetch.
    pub fn payment_succeeded(&mut self) {
        self.selection.clear();
    }

    /// Form cleared: forget everything and invalidate any in-flight fetch.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.view = None;
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(rows: &[(&str, &str, &str)]) -> ReportResponse {
        ReportResponse {
            success: true,
            total_records: rows.len() as u64,
            report_data: rows
                .iter()
                .enumerate()
                .map(|(i, (bill, outstanding, status))| {
                    vec![
                        (i + 1).to_string(),
                        bill.to_string(),
                        "01/01/2026".to_string(),
                        "Unit".to_string(),
                        "0".to_string(),
                        "0".to_string(),
                        outstanding.to_string(),
                        "0".to_string(),
                        outstanding.to_string(),
                        status.to_string(),
                    ]
                })
                .collect(),
            ..ReportResponse::default()
        }
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = ReportSession::new(ReportKind::Invoice, true);
        let first = session.begin_fetch();
        let second = session.begin_fetch();

        assert!(session.apply(second, response(&[("NEW", "1", "PAID")])).unwrap());
        assert!(!session.apply(first, response(&[("OLD", "1", "PAID")])).unwrap());

        let view = session.view().unwrap();
        assert_eq!(view.all_rows()[0].bill_number, "NEW");
    }

    #[test]
    fn test_selection_only_in_due_mode() {
        let mut session = ReportSession::new(ReportKind::Invoice, true);
        let ticket = session.begin_fetch();
        session
            .apply(ticket, response(&[("A", "500", "DUE"), ("B", "300", "DUE"), ("C", "0", "PAID")]))
            .unwrap();

        session.toggle("A");
        assert!(session.selection().is_empty());

        session.set_mode(ViewMode::Due);
        session.toggle("A");
        session.toggle("B");
        assert_eq!(session.selected_total(), 800.0);
        assert!(session.can_pay());

        session.set_mode(ViewMode::Report);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_payment_success_clears_selection() {
        let mut session = ReportSession::new(ReportKind::Outstanding, true);
        let ticket = session.begin_fetch();
        session.apply(ticket, response(&[("A", "500", "DUE")])).unwrap();
        session.toggle_all();
        assert_eq!(session.selected_total(), 500.0);

        session.payment_succeeded();
        assert!(session.selection().is_empty());
        assert!(!session.can_pay());
    }

    #[test]
    fn test_search_narrowing_drops_hidden_bills_from_total() {
        let mut session = ReportSession::new(ReportKind::Outstanding, true);
        let ticket = session.begin_fetch();
        session
            .apply(ticket, response(&[("INV-A", "500", "DUE"), ("INV-B", "300", "DUE")]))
            .unwrap();
        session.toggle_all();
        session.set_search("inv-b");
        assert_eq!(session.selected_total(), 300.0);
    }

    #[test]
    fn test_clear_invalidates_in_flight_fetch() {
        let mut session = ReportSession::new(ReportKind::Invoice, true);
        let ticket = session.begin_fetch();
        session.clear();
        assert!(!session.apply(ticket, response(&[("A", "1", "PAID")])).unwrap());
        assert!(session.view().is_none());
    }

    #[test]
    fn test_strict_headers_reject_mismatch() {
        let mut session = ReportSession::new(ReportKind::Invoice, true);
        let ticket = session.begin_fetch();
        let mut bad = response(&[("A", "1", "PAID")]);
        bad.headers = vec!["Bill No".to_string()];
        assert!(session.apply(ticket, bad).is_err());

        let mut lenient = ReportSession::new(ReportKind::Invoice, false);
        let ticket = lenient.begin_fetch();
        let mut bad = response(&[("A", "1", "PAID")]);
        bad.headers = vec!["Bill No".to_string()];
        assert!(lenient.apply(ticket, bad).unwrap());
    }
}
