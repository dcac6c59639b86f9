//! Single explicit pipeline invocation producing a full dashboard view.
//!
//! Replaces cascaded incremental re-derivation: one call recomputes
//! everything from the record set and the filter selection.

use adpulse_core::types::{FilterSpec, MetricRecord};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, Ratios, Totals};
use crate::dedup::dedup;
use crate::filter::apply_filters;
use crate::grouper::{group_campaigns, CampaignRow, SortKey, SortOrder};
use crate::reach::resolve_unique_reach;
use crate::trend::{trend_by_date, TrendPoint};

/// Everything the dashboard renderers consume: global KPIs, per-campaign
/// rows, and the per-day trend series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub totals: Totals,
    pub unique_reach: f64,
    pub ratios: Ratios,
    pub campaigns: Vec<CampaignRow>,
    pub trend: Vec<TrendPoint>,
    pub record_count: usize,
}

/// Run the pipeline: filter → dedup → aggregate / reconcile / group / trend.
pub fn compute_dashboard(
    records: &[MetricRecord],
    filters: &FilterSpec,
    sort_by: SortKey,
    sort_order: SortOrder,
) -> DashboardView {
    let filtered = apply_filters(records, filters);
    let deduped = dedup(filtered);

    let totals = aggregate(&deduped);
    let unique_reach = resolve_unique_reach(&deduped, filters.period);
    let ratios = totals.ratios(unique_reach);
    let campaigns = group_campaigns(&deduped, filters.period, sort_by, sort_order);
    let trend = trend_by_date(&deduped);

    DashboardView {
        totals,
        unique_reach,
        ratios,
        campaigns,
        trend,
        record_count: deduped.len(),
    }
}
