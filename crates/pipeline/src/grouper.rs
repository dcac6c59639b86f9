//! Per-campaign table rows — grouped totals, reconciled unique reach, the
//! full ratio set, and a stable caller-specified sort.

use std::collections::HashMap;

use adpulse_core::types::{MetricRecord, Period};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::{Ratios, Totals};
use crate::reach::per_campaign_unique_reach;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Cost,
    Impressions,
    Clicks,
    Conversions,
    ConversionValue,
    Ctr,
    Cpa,
    Roas,
    CampaignName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// One dashboard table row per distinct campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    pub campaign_name: String,
    pub totals: Totals,
    pub unique_reach: f64,
    pub ratios: Ratios,
}

/// Group records by trimmed campaign name and build one row per campaign.
/// Records with an empty name are skipped with a diagnostic log. The sort
/// is stable; ties keep first-seen campaign order.
pub fn group_campaigns(
    records: &[MetricRecord],
    period: Period,
    sort_by: SortKey,
    order: SortOrder,
) -> Vec<CampaignRow> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Totals> = HashMap::new();
    let mut skipped = 0_usize;

    for record in records {
        let name = record.campaign_name.trim();
        if name.is_empty() {
            skipped += 1;
            continue;
        }
        if !groups.contains_key(name) {
            first_seen.push(name.to_string());
        }
        groups.entry(name.to_string()).or_default().add(record);
    }

    if skipped > 0 {
        warn!(
            skipped = skipped,
            "Skipped records without a campaign name during grouping"
        );
    }

    let reach = per_campaign_unique_reach(records, period);
    let mut rows: Vec<CampaignRow> = first_seen
        .into_iter()
        .map(|name| {
            let totals = groups.remove(&name).unwrap_or_default();
            let unique_reach = reach.get(&name).copied().unwrap_or(0.0);
            let ratios = totals.ratios(unique_reach);
            CampaignRow {
                campaign_name: name,
                totals,
                unique_reach,
                ratios,
            }
        })
        .collect();

    sort_rows(&mut rows, sort_by, order);
    rows
}

fn sort_rows(rows: &mut [CampaignRow], key: SortKey, order: SortOrder) {
    // Vec::sort_by is stable, so ties keep their prior relative order.
    rows.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Cost => a.totals.cost.total_cmp(&b.totals.cost),
            SortKey::Impressions => a.totals.impressions.cmp(&b.totals.impressions),
            SortKey::Clicks => a.totals.ratio_clicks().cmp(&b.totals.ratio_clicks()),
            SortKey::Conversions => a.totals.conversions.cmp(&b.totals.conversions),
            SortKey::ConversionValue => a.totals.conversion_value.total_cmp(&b.totals.conversion_value),
            SortKey::Ctr => a.ratios.ctr.total_cmp(&b.ratios.ctr),
            SortKey::Cpa => a.ratios.cpa.total_cmp(&b.ratios.cpa),
            SortKey::Roas => a.ratios.roas.total_cmp(&b.ratios.roas),
            SortKey::CampaignName => a.campaign_name.cmp(&b.campaign_name),
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}
