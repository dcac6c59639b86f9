//! Per-day trend series for chart rendering.

use std::collections::BTreeMap;

use adpulse_core::types::MetricRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{Ratios, Totals};

/// One point per calendar day, ascending by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub totals: Totals,
    pub ratios: Ratios,
}

/// Group records by day and compute per-day totals and ratios. Daily
/// frequency always uses summed daily reach; period-level unique reach has
/// no per-day meaning.
pub fn trend_by_date(records: &[MetricRecord]) -> Vec<TrendPoint> {
    let mut days: BTreeMap<String, Totals> = BTreeMap::new();
    let mut dateless = 0_usize;

    for record in records {
        if !record.has_date() {
            dateless += 1;
            continue;
        }
        days.entry(record.date.clone()).or_default().add(record);
    }

    if dateless > 0 {
        debug!(dateless = dateless, "Skipped dateless records in trend series");
    }

    days.into_iter()
        .map(|(date, totals)| {
            let ratios = totals.ratios(totals.reach as f64);
            TrendPoint {
                date,
                totals,
                ratios,
            }
        })
        .collect()
}
