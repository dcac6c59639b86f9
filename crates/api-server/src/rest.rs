//! REST API handlers for record ingest, dashboard queries, and CSV export.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

use adpulse_cache::{RecordStore, SessionCache};
use adpulse_core::types::{AdAccount, FilterSpec, Period, RawRecord};
use adpulse_ingest::{FetchOutcome, RecordFetcher};
use adpulse_pipeline::{
    apply_filters, compute_dashboard, dedup, export_csv, group_campaigns, normalize_all,
    CampaignRow, DashboardView, SortKey, SortOrder,
};

/// Maximum number of raw rows accepted per ingest call.
const MAX_INGEST_BATCH: usize = 50_000;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordStore>,
    pub session: Arc<SessionCache>,
    pub fetcher: Arc<RecordFetcher>,
    pub node_id: String,
    pub start_time: Instant,
}

/// Query parameters accepted by the dashboard, campaign, and export
/// endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardParams {
    pub period: Option<Period>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub campaign_name: Option<String>,
    pub ad_set_name: Option<String>,
    pub ad_name: Option<String>,
    pub account_id: Option<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
}

impl DashboardParams {
    /// An explicit date range without a period selects a custom range.
    fn filter_spec(&self) -> FilterSpec {
        let period = self.period.unwrap_or({
            if self.start_date.is_some() || self.end_date.is_some() {
                Period::Custom
            } else {
                Period::All
            }
        });
        FilterSpec {
            period,
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            campaign_name: self.campaign_name.clone(),
            ad_set_name: self.ad_set_name.clone(),
            ad_name: self.ad_name.clone(),
            account_id: self.account_id.clone(),
        }
    }

    fn sort(&self) -> (SortKey, SortOrder) {
        (
            self.sort_by.unwrap_or_default(),
            self.sort_order.unwrap_or_default(),
        )
    }
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub ingested: usize,
    pub stored_total: usize,
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub synced: usize,
    pub source: String,
}

/// POST /v1/records — bulk ingest of raw rows from an upload relay.
pub async fn ingest_records(
    State(state): State<AppState>,
    Json(rows): Json<Vec<RawRecord>>,
) -> Result<Json<IngestResponse>, (StatusCode, Json<ErrorResponse>)> {
    if rows.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "empty_batch".to_string(),
                message: "ingest payload must contain at least one row".to_string(),
            }),
        ));
    }
    if rows.len() > MAX_INGEST_BATCH {
        warn!(rows = rows.len(), "Rejected oversized ingest batch");
        metrics::counter!("api.validation_errors").increment(1);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "batch_too_large".to_string(),
                message: format!("ingest batch exceeds {MAX_INGEST_BATCH} rows"),
            }),
        ));
    }

    let ingested = rows.len();
    state.records.append(normalize_all(rows));
    metrics::counter!("api.records_ingested").increment(ingested as u64);

    Ok(Json(IngestResponse {
        ingested,
        stored_total: state.records.len(),
    }))
}

/// POST /v1/records/sync — pull the full record set from the upstream
/// backend, replacing the store on success.
pub async fn sync_records(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Json<SyncResponse> {
    let filters = params.filter_spec();
    match state.fetcher.fetch_records(&filters).await {
        FetchOutcome::Fresh(raw) => {
            let records = normalize_all(raw);
            let synced = records.len();
            state.records.replace_all(records);
            Json(SyncResponse {
                synced,
                source: "backend".to_string(),
            })
        }
        FetchOutcome::Fallback(raw) if !raw.is_empty() => {
            let records = normalize_all(raw);
            let synced = records.len();
            state.records.replace_all(records);
            Json(SyncResponse {
                synced,
                source: "last_known_good".to_string(),
            })
        }
        FetchOutcome::Fallback(_) => Json(SyncResponse {
            synced: 0,
            source: "unavailable".to_string(),
        }),
        FetchOutcome::Superseded => Json(SyncResponse {
            synced: 0,
            source: "superseded".to_string(),
        }),
    }
}

/// GET /v1/dashboard — global KPIs, per-campaign rows, and the daily trend
/// for the requested filter selection.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Json<DashboardView> {
    let filters = params.filter_spec();
    let (sort_by, sort_order) = params.sort();

    // Remember the selection so the next session starts where this one left.
    state.session.store_filters(filters.clone());
    if let Err(e) = state.session.persist() {
        error!(error = %e, "Failed to persist session cache");
    }

    let records = state.records.all();
    Json(compute_dashboard(&records, &filters, sort_by, sort_order))
}

/// GET /v1/campaigns — the per-campaign table rows only.
pub async fn get_campaigns(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Json<Vec<CampaignRow>> {
    Json(campaign_rows(&state, &params))
}

/// GET /v1/export/csv — CSV serialization of the campaign table.
pub async fn get_export_csv(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> impl IntoResponse {
    let csv = export_csv(&campaign_rows(&state, &params));
    metrics::counter!("api.csv_exports").increment(1);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"campaigns.csv\"",
            ),
        ],
        csv,
    )
}

/// GET /v1/accounts — cached account list, refetched from the backend when
/// the cached copy is older than the validity window.
pub async fn get_accounts(State(state): State<AppState>) -> Json<Vec<AdAccount>> {
    let now = Utc::now();
    if let Some(accounts) = state.session.accounts(now) {
        return Json(accounts);
    }

    match state.fetcher.fetch_accounts().await {
        Ok(accounts) => {
            state.session.store_accounts(accounts.clone(), now);
            if let Err(e) = state.session.persist() {
                error!(error = %e, "Failed to persist session cache");
            }
            Json(accounts)
        }
        Err(e) => {
            warn!(error = %e, "Account fetch failed; serving empty list");
            metrics::counter!("api.account_fetch_failures").increment(1);
            Json(Vec::new())
        }
    }
}

fn campaign_rows(state: &AppState, params: &DashboardParams) -> Vec<CampaignRow> {
    let filters = params.filter_spec();
    let (sort_by, sort_order) = params.sort();
    let records = dedup(apply_filters(&state.records.all(), &filters));
    group_campaigns(&records, filters.period, sort_by, sort_order)
}

/// GET /health — health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        stored_records: state.records.len(),
    })
}

/// GET /ready — readiness probe.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub stored_records: usize,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
