//! KPI aggregation — summed totals and zero-guarded derived ratios.

use adpulse_core::types::MetricRecord;
use serde::{Deserialize, Serialize};

/// Float division with `x / 0` defined as 0 rather than NaN or infinity.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Summed counters and monetary fields over a record collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub impressions: u64,
    pub clicks: u64,
    pub link_clicks: u64,
    pub conversions: u64,
    pub reach: u64,
    pub engagements: u64,
    pub landing_page_views: u64,
    pub cost: f64,
    pub conversion_value: f64,
}

/// Derived advertising ratios. No rounding is applied at this layer;
/// presentation rounds for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    /// Click-through rate, percent.
    pub ctr: f64,
    /// Cost per click.
    pub cpc: f64,
    /// Cost per acquisition.
    pub cpa: f64,
    /// Cost per thousand impressions.
    pub cpm: f64,
    /// Conversion rate, percent.
    pub cvr: f64,
    /// Return on ad spend as a raw multiplier (value / cost).
    pub roas: f64,
    /// Impressions per uniquely reached user.
    pub frequency: f64,
    /// Engagements per impression, percent.
    pub engagement_rate: f64,
}

impl Totals {
    pub fn add(&mut self, record: &MetricRecord) {
        self.impressions += record.impressions;
        self.clicks += record.clicks;
        self.link_clicks += record.link_clicks;
        self.conversions += record.conversions;
        self.reach += record.reach;
        self.engagements += record.engagements;
        self.landing_page_views += record.landing_page_views;
        self.cost += record.cost;
        self.conversion_value += record.conversion_value;
    }

    /// Click count used for ratio purposes: link clicks when any were
    /// reported, otherwise all clicks. Never the sum of both.
    pub fn ratio_clicks(&self) -> u64 {
        if self.link_clicks > 0 {
            self.link_clicks
        } else {
            self.clicks
        }
    }

    /// Compute the derived ratio set. `unique_reach` is the reconciled
    /// reach for this aggregation scope and is the frequency denominator.
    pub fn ratios(&self, unique_reach: f64) -> Ratios {
        let impressions = self.impressions as f64;
        let clicks = self.ratio_clicks() as f64;
        let conversions = self.conversions as f64;
        Ratios {
            ctr: ratio(clicks, impressions) * 100.0,
            cpc: ratio(self.cost, clicks),
            cpa: ratio(self.cost, conversions),
            cpm: ratio(self.cost, impressions) * 1000.0,
            cvr: ratio(conversions, clicks) * 100.0,
            roas: ratio(self.conversion_value, self.cost),
            frequency: ratio(impressions, unique_reach),
            engagement_rate: ratio(self.engagements as f64, impressions) * 100.0,
        }
    }
}

/// Sum a record collection into [`Totals`].
pub fn aggregate(records: &[MetricRecord]) -> Totals {
    let mut totals = Totals::default();
    for record in records {
        totals.add(record);
    }
    totals
}
