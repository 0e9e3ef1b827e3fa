use std::time::Duration;
use ureq::Agent;

use crate::api::request::{DateFormat, ReportPayload, ReportQuery};
use crate::api::response::{error_message, ReportResponse};
use crate::config::ApiSettings;
use crate::error::{InvoiceError, Result};
use crate::report::ReportKind;

/// Raw HTTP outcome; non-2xx statuses are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Seam between the report client and the network.
pub trait Transport {
    /// POST a JSON body. `Err` means no response reached us at all.
    fn post_json(&self, url: &str, body: &str, token: Option<&str>) -> std::result::Result<HttpReply, String>;
}

/// Blocking transport over `ureq`.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn post_json(&self, url: &str, body: &str, token: Option<&str>) -> std::result::Result<HttpReply, String> {
        let mut request = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let mut response = request.send(body).map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| e.to_string())?;

        Ok(HttpReply { status, body })
    }
}

/// Why a probe over the candidate endpoints failed.
#[derive(Debug)]
enum ProbeFailure {
    Status { status: u16, body: String },
    Transport(String),
    NoEndpoints,
}

impl ProbeFailure {
    fn into_error(self) -> InvoiceError {
        match self {
            ProbeFailure::Status { status: 404, .. } | ProbeFailure::NoEndpoints => {
                InvoiceError::EndpointNotFound
            }
            ProbeFailure::Status { status, body } => InvoiceError::server(status, error_message(&body)),
            ProbeFailure::Transport(reason) => InvoiceError::Connectivity(reason),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Fetches invoice and outstanding reports from the remote API.
pub struct ReportClient<T: Transport> {
    transport: T,
    base_url: String,
    token: Option<String>,
    invoice_paths: Vec<String>,
    outstanding_paths: Vec<String>,
}

impl ReportClient<UreqTransport> {
    pub fn from_settings(api: &ApiSettings) -> Self {
        let transport = UreqTransport::new(Duration::from_secs(api.timeout_secs));
        Self::new(transport, api)
    }
}

impl<T: Transport> ReportClient<T> {
    pub fn new(transport: T, api: &ApiSettings) -> Self {
        Self {
            transport,
            base_url: api.base_url.clone(),
            token: api.token.clone().filter(|t| !t.trim().is_empty()),
            invoice_paths: api.invoice_report_paths.clone(),
            outstanding_paths: api.outstanding_report_paths.clone(),
        }
    }

    /// Fetch one report.
    ///
    /// Candidate endpoints are tried in order, moving on only after a 404.
    /// If the whole probe ends in a 400, it is repeated once with ISO dates.
    pub fn fetch(&self, kind: ReportKind, query: &ReportQuery) -> Result<ReportResponse> {
        let due_only = kind == ReportKind::Outstanding;
        let paths = match kind {
            ReportKind::Invoice => &self.invoice_paths,
            ReportKind::Outstanding => &self.outstanding_paths,
        };

        let primary = query.payload(DateFormat::DayFirst, due_only)?;
        let reply = match self.probe(paths, &primary) {
            Err(ProbeFailure::Status { status: 400, .. }) => {
                tracing::warn!("report request rejected with 400, retrying with YYYY-MM-DD dates");
                let fallback = query.payload(DateFormat::Iso, due_only)?;
                self.probe(paths, &fallback)
            }
            other => other,
        }
        .map_err(ProbeFailure::into_error)?;

        let response: ReportResponse = serde_json::from_str(&reply.body)
            .map_err(|e| InvoiceError::MalformedResponse(e.to_string()))?;

        if !response.success {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Failed to fetch report data".to_string());
            return Err(InvoiceError::Server { status: None, message });
        }

        tracing::info!(records = response.total_records, rows = response.report_data.len(), "report fetched");
        Ok(response)
    }

    fn probe(&self, paths: &[String], payload: &ReportPayload) -> std::result::Result<HttpReply, ProbeFailure> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ProbeFailure::Transport(format!("could not encode request: {e}")))?;

        let mut last = ProbeFailure::NoEndpoints;
        for path in paths {
            let url = join_url(&self.base_url, path);
            tracing::debug!(%url, "posting report request");

            match self.transport.post_json(&url, &body, self.token.as_deref()) {
                Ok(reply) if (200..300).contains(&reply.status) => return Ok(reply),
                Ok(reply) if reply.status == 404 => {
                    tracing::warn!(%url, "endpoint not found, trying next candidate");
                    last = ProbeFailure::Status {
                        status: reply.status,
                        body: reply.body,
                    };
                }
                Ok(reply) => {
                    return Err(ProbeFailure::Status {
                        status: reply.status,
                        body: reply.body,
                    })
                }
                Err(reason) => return Err(ProbeFailure::Transport(reason)),
            }
        }
        Err(last)
    }
}
