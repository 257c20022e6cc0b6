//! Remote table fetching
//!
//! One blocking HTTP GET per call, body parsed as CSV. No retries: the first
//! failure is reported.

use crate::catalog::FetchTarget;
use crate::config::schema::HttpConfig;
use crate::error::{BoxError, DashError, DashResult};
use crate::table::{parse_csv, Table};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Anything that can produce a table for a target
pub trait TableSource: Send + Sync {
    fn fetch(&self, target: &FetchTarget) -> DashResult<Table>;
}

/// Raw response handed back by a transport
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response with a CSV body
    pub fn csv(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("text/csv; charset=utf-8".to_string()),
            body: body.into(),
        }
    }
}

/// Plain HTTP GET; transports do not interpret status codes
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, BoxError>;
}

/// Blocking transport backed by a shared `ureq` agent
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: String,
    max_body_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &HttpConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            user_agent: config.user_agent.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, BoxError> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_string()?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Fetches CSV exports over a transport and parses them
pub struct SheetFetcher<T> {
    transport: T,
}

impl SheetFetcher<UreqTransport> {
    /// Fetcher using the real network
    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(UreqTransport::new(config))
    }
}

impl<T: HttpTransport> SheetFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: HttpTransport> TableSource for SheetFetcher<T> {
    fn fetch(&self, target: &FetchTarget) -> DashResult<Table> {
        let started = Instant::now();
        debug!("GET {}", target);

        let response = self
            .transport
            .get(target.as_str())
            .map_err(|e| DashError::fetch(target.as_str(), e))?;

        if response.status != 200 {
            return Err(DashError::HttpStatus {
                target: target.to_string(),
                status: response.status,
            });
        }

        // Sheets that are not link-shared answer with a sign-in page
        if let Some(content_type) = response
            .content_type
            .as_deref()
            .filter(|ct| ct.starts_with("text/html"))
        {
            return Err(DashError::NotCsv {
                target: target.to_string(),
                content_type: content_type.to_string(),
            });
        }

        let table = parse_csv(&response.body).map_err(|e| DashError::Parse {
            target: target.to_string(),
            line: e.line,
            reason: e.reason,
        })?;

        info!(
            "Fetched {} row(s) x {} column(s) in {:?}",
            table.row_count(),
            table.columns().len(),
            started.elapsed()
        );
        Ok(table)
    }
}
