//! Paginated record fetcher with stale-response discarding.
//!
//! Every fetch takes a fresh monotonically increasing request id. When a
//! newer fetch starts before an older one completes, the older response is
//! discarded instead of clobbering fresher data. Network failures fall back
//! to the last successfully fetched record set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use adpulse_core::config::IngestConfig;
use adpulse_core::types::{AdAccount, FilterSpec, RawRecord};
use adpulse_core::{AdPulseError, AdPulseResult};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};

/// One page of the upstream records endpoint.
#[derive(Debug, Deserialize)]
pub struct RecordPage {
    pub data: Vec<RawRecord>,
    pub total: u64,
}

/// Result of one fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Records fetched by the current request.
    Fresh(Vec<RawRecord>),
    /// The backend was unreachable; these are the last known good records
    /// (empty when nothing was ever fetched). The caller surfaces a retry
    /// affordance at top level.
    Fallback(Vec<RawRecord>),
    /// A newer fetch superseded this one; the response was discarded.
    Superseded,
}

pub struct RecordFetcher {
    http: reqwest::Client,
    base_url: String,
    page_size: usize,
    request_seq: AtomicU64,
    last_good: RwLock<Vec<RawRecord>>,
}

impl RecordFetcher {
    pub fn new(config: &IngestConfig) -> AdPulseResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| AdPulseError::Ingest(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
            request_seq: AtomicU64::new(0),
            last_good: RwLock::new(Vec::new()),
        })
    }

    /// Fetch all pages for the given filter selection.
    pub async fn fetch_records(&self, filters: &FilterSpec) -> FetchOutcome {
        let request_id = self.request_seq.fetch_add(1, Ordering::SeqCst) + 1;

        match self.fetch_pages(request_id, filters).await {
            Ok(Some(records)) => {
                metrics::counter!("ingest.fetches").increment(1);
                *self.last_good.write() = records.clone();
                FetchOutcome::Fresh(records)
            }
            Ok(None) => FetchOutcome::Superseded,
            Err(e) => {
                warn!(error = %e, "Record fetch failed; serving last known good set");
                metrics::counter!("ingest.fetch_failures").increment(1);
                FetchOutcome::Fallback(self.last_good.read().clone())
            }
        }
    }

    /// Fetch the ad-account list from the backend.
    pub async fn fetch_accounts(&self) -> AdPulseResult<Vec<AdAccount>> {
        let response = self
            .http
            .get(format!("{}/accounts", self.base_url))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AdPulseError::Ingest(e.to_string()))?;
        response
            .json::<Vec<AdAccount>>()
            .await
            .map_err(|e| AdPulseError::Ingest(e.to_string()))
    }

    /// The last record set a fetch completed with.
    pub fn last_known_good(&self) -> Vec<RawRecord> {
        self.last_good.read().clone()
    }

    fn is_current(&self, request_id: u64) -> bool {
        self.request_seq.load(Ordering::SeqCst) == request_id
    }

    /// Continue paging while full pages keep arriving and the accumulated
    /// count is below the advertised total.
    fn more_pages(fetched: usize, total: u64, last_page_len: usize, page_size: usize) -> bool {
        last_page_len >= page_size && (fetched as u64) < total
    }

    async fn fetch_pages(
        &self,
        request_id: u64,
        filters: &FilterSpec,
    ) -> AdPulseResult<Option<Vec<RawRecord>>> {
        let mut records: Vec<RawRecord> = Vec::new();
        let mut offset = 0_usize;

        loop {
            let page = self.fetch_page(filters, offset).await?;
            if !self.is_current(request_id) {
                debug!(request_id = request_id, "Discarding stale fetch response");
                return Ok(None);
            }

            let page_len = page.data.len();
            records.extend(page.data);
            offset += page_len;

            if !Self::more_pages(records.len(), page.total, page_len, self.page_size) {
                break;
            }
        }

        Ok(Some(records))
    }

    async fn fetch_page(&self, filters: &FilterSpec, offset: usize) -> AdPulseResult<RecordPage> {
        let mut request = self
            .http
            .get(format!("{}/records", self.base_url))
            .query(&[
                ("offset", offset.to_string()),
                ("limit", self.page_size.to_string()),
            ]);

        if let Some(account) = &filters.account_id {
            request = request.query(&[("accountId", account)]);
        }
        if let Some(start) = &filters.start_date {
            request = request.query(&[("startDate", start)]);
        }
        if let Some(end) = &filters.end_date {
            request = request.query(&[("endDate", end)]);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AdPulseError::Ingest(e.to_string()))?;
        response
            .json::<RecordPage>()
            .await
            .map_err(|e| AdPulseError::Ingest(e.to_string()))
    }
}
