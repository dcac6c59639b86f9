//! Canonical domain types for campaign performance observations.
//!
//! A [`MetricRecord`] is one observation for a (campaign, ad-set, ad, date,
//! account) tuple. Raw rows arrive with arbitrary gaps ([`RawRecord`]) and
//! are coerced into the canonical shape by the pipeline normalizer.

use serde::{Deserialize, Serialize};

/// Separator used when joining composite dedup key parts.
pub const KEY_SEPARATOR: char = '|';

/// Meta account ids appear both as `act_<id>` and bare `<id>`; both forms
/// must compare equal.
pub fn normalize_account_id(id: &str) -> &str {
    id.strip_prefix("act_").unwrap_or(id)
}

/// One raw row as delivered by the backend or an upload relay. Every field
/// is optional; numeric fields may carry non-finite garbage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    pub id: Option<i64>,
    pub date: Option<String>,
    pub campaign_name: Option<String>,
    pub ad_set_name: Option<String>,
    pub ad_name: Option<String>,
    pub account_id: Option<String>,
    pub impressions: Option<f64>,
    pub clicks: Option<f64>,
    pub link_clicks: Option<f64>,
    pub conversions: Option<f64>,
    pub reach: Option<f64>,
    pub engagements: Option<f64>,
    pub landing_page_views: Option<f64>,
    pub cost: Option<f64>,
    pub conversion_value: Option<f64>,
    pub period_unique_reach: Option<f64>,
}

/// Reporting granularity of a record, derived from which asset names are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordLevel {
    Campaign,
    AdSet,
    Ad,
}

/// Canonical, fully defaulted observation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// Opaque recency marker assigned by the backend; higher wins on dedup.
    pub id: Option<i64>,
    /// Calendar day in `YYYY-MM-DD` form; empty when the source row had none.
    pub date: String,
    pub campaign_name: String,
    pub ad_set_name: Option<String>,
    pub ad_name: Option<String>,
    pub account_id: Option<String>,
    pub impressions: u64,
    pub clicks: u64,
    pub link_clicks: u64,
    pub conversions: u64,
    pub reach: u64,
    pub engagements: u64,
    pub landing_page_views: u64,
    pub cost: f64,
    pub conversion_value: f64,
    /// Backend-computed deduplicated reach for the active fixed reporting
    /// period; absent for custom date ranges.
    pub period_unique_reach: Option<f64>,
}

impl MetricRecord {
    /// Click count used for ratio purposes: link clicks when reported,
    /// otherwise all clicks. The two are never summed.
    pub fn ratio_clicks(&self) -> u64 {
        if self.link_clicks > 0 {
            self.link_clicks
        } else {
            self.clicks
        }
    }

    pub fn has_date(&self) -> bool {
        !self.date.is_empty()
    }

    pub fn level(&self) -> RecordLevel {
        match (&self.ad_set_name, &self.ad_name) {
            (Some(_), Some(_)) => RecordLevel::Ad,
            (Some(_), None) => RecordLevel::AdSet,
            _ => RecordLevel::Campaign,
        }
    }

    /// Composite identity for duplicate collapsing. Falls back to a 4-part
    /// key when the account id is missing.
    pub fn dedup_key(&self) -> String {
        let ad_set = self.ad_set_name.as_deref().unwrap_or("");
        let ad = self.ad_name.as_deref().unwrap_or("");
        match self.account_id.as_deref() {
            Some(account) => format!(
                "{}{sep}{}{sep}{}{sep}{}{sep}{}",
                self.campaign_name,
                self.date,
                normalize_account_id(account),
                ad_set,
                ad,
                sep = KEY_SEPARATOR,
            ),
            None => format!(
                "{}{sep}{}{sep}{}{sep}{}",
                self.campaign_name,
                self.date,
                ad_set,
                ad,
                sep = KEY_SEPARATOR,
            ),
        }
    }
}

/// Active reporting period. Fixed periods carry backend-deduplicated reach;
/// custom ranges do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    All,
    Last7,
    Last30,
    Custom,
}

impl Period {
    /// Fixed periods (all / 7 days / 30 days) may use `period_unique_reach`.
    pub fn is_fixed(&self) -> bool {
        !matches!(self, Period::Custom)
    }
}

/// Predicates applied to a record collection before aggregation. All fields
/// are optional; an unset field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub period: Period,
    /// Inclusive range bounds, `YYYY-MM-DD`. Lexicographic comparison is
    /// equivalent to calendar comparison for this format.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub campaign_name: Option<String>,
    pub ad_set_name: Option<String>,
    pub ad_name: Option<String>,
    pub account_id: Option<String>,
}

impl FilterSpec {
    /// A record lacking a date must be excluded whenever a date filter is
    /// active.
    pub fn has_date_filter(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// An ad account known to the backend, cached client-side with a validity
/// window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdAccount {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MetricRecord {
        MetricRecord {
            id: Some(1),
            date: "2024-01-01".to_string(),
            campaign_name: "Spring Launch".to_string(),
            ad_set_name: None,
            ad_name: None,
            account_id: Some("act_123".to_string()),
            impressions: 1000,
            clicks: 40,
            link_clicks: 0,
            conversions: 2,
            reach: 800,
            engagements: 60,
            landing_page_views: 30,
            cost: 25.0,
            conversion_value: 120.0,
            period_unique_reach: None,
        }
    }

    #[test]
    fn test_account_id_normalization() {
        assert_eq!(normalize_account_id("act_123"), "123");
        assert_eq!(normalize_account_id("123"), "123");
        assert_eq!(normalize_account_id("actress"), "actress");
    }

    #[test]
    fn test_ratio_clicks_prefers_link_clicks() {
        let mut rec = record();
        assert_eq!(rec.ratio_clicks(), 40);
        rec.link_clicks = 12;
        assert_eq!(rec.ratio_clicks(), 12);
    }

    #[test]
    fn test_record_level() {
        let mut rec = record();
        assert_eq!(rec.level(), RecordLevel::Campaign);
        rec.ad_set_name = Some("Prospecting".to_string());
        assert_eq!(rec.level(), RecordLevel::AdSet);
        rec.ad_name = Some("Video A".to_string());
        assert_eq!(rec.level(), RecordLevel::Ad);
    }

    #[test]
    fn test_dedup_key_normalizes_account_prefix() {
        let mut a = record();
        let mut b = record();
        a.account_id = Some("act_123".to_string());
        b.account_id = Some("123".to_string());
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_falls_back_without_account() {
        let mut rec = record();
        rec.account_id = None;
        assert_eq!(rec.dedup_key().matches(KEY_SEPARATOR).count(), 3);
    }

    #[test]
    fn test_filter_spec_serde_roundtrip() {
        let spec = FilterSpec {
            period: Period::Last7,
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-07".to_string()),
            campaign_name: Some("Spring Launch".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: FilterSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
