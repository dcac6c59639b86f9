//! Raw row coercion into the canonical record shape.
//!
//! Backend rows and upload relays deliver loosely typed JSON; this stage
//! never fails. Absent, NaN, or negative numeric inputs become 0; absent
//! string fields become empty.

use adpulse_core::types::{MetricRecord, RawRecord};

fn count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

fn money(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

fn name(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Coerce one raw row into a [`MetricRecord`] with all gaps defaulted.
pub fn normalize(raw: RawRecord) -> MetricRecord {
    MetricRecord {
        id: raw.id,
        date: raw
            .date
            .map(|d| d.trim().to_string())
            .unwrap_or_default(),
        campaign_name: name(raw.campaign_name).unwrap_or_default(),
        ad_set_name: name(raw.ad_set_name),
        ad_name: name(raw.ad_name),
        account_id: name(raw.account_id),
        impressions: count(raw.impressions),
        clicks: count(raw.clicks),
        link_clicks: count(raw.link_clicks),
        conversions: count(raw.conversions),
        reach: count(raw.reach),
        engagements: count(raw.engagements),
        landing_page_views: count(raw.landing_page_views),
        cost: money(raw.cost),
        conversion_value: money(raw.conversion_value),
        // Zero is kept: the reach reconciler distinguishes "reported as
        // zero" from "absent".
        period_unique_reach: raw.period_unique_reach.filter(|v| v.is_finite() && *v >= 0.0),
    }
}

pub fn normalize_all(raw: Vec<RawRecord>) -> Vec<MetricRecord> {
    raw.into_iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_row_defaults_to_zeros() {
        let rec = normalize(RawRecord::default());
        assert_eq!(rec.impressions, 0);
        assert_eq!(rec.clicks, 0);
        assert_eq!(rec.cost, 0.0);
        assert_eq!(rec.conversion_value, 0.0);
        assert_eq!(rec.campaign_name, "");
        assert_eq!(rec.date, "");
        assert!(rec.ad_set_name.is_none());
        assert!(rec.period_unique_reach.is_none());
    }

    #[test]
    fn test_nan_and_negative_numerics_become_zero() {
        let raw = RawRecord {
            impressions: Some(f64::NAN),
            clicks: Some(f64::INFINITY),
            cost: Some(-12.5),
            conversions: Some(-3.0),
            ..Default::default()
        };
        let rec = normalize(raw);
        assert_eq!(rec.impressions, 0);
        assert_eq!(rec.clicks, 0);
        assert_eq!(rec.cost, 0.0);
        assert_eq!(rec.conversions, 0);
    }

    #[test]
    fn test_names_are_trimmed_and_emptied_to_none() {
        let raw = RawRecord {
            campaign_name: Some("  Spring Launch  ".to_string()),
            ad_set_name: Some("   ".to_string()),
            account_id: Some(" act_123 ".to_string()),
            ..Default::default()
        };
        let rec = normalize(raw);
        assert_eq!(rec.campaign_name, "Spring Launch");
        assert!(rec.ad_set_name.is_none());
        assert_eq!(rec.account_id.as_deref(), Some("act_123"));
    }

    #[test]
    fn test_reported_zero_unique_reach_is_kept() {
        let raw = RawRecord {
            period_unique_reach: Some(0.0),
            ..Default::default()
        };
        assert_eq!(normalize(raw).period_unique_reach, Some(0.0));

        let raw = RawRecord {
            period_unique_reach: Some(f64::NAN),
            ..Default::default()
        };
        assert!(normalize(raw).period_unique_reach.is_none());
    }

    #[test]
    fn test_fractional_counts_round() {
        let raw = RawRecord {
            impressions: Some(100.6),
            reach: Some(99.2),
            ..Default::default()
        };
        let rec = normalize(raw);
        assert_eq!(rec.impressions, 101);
        assert_eq!(rec.reach, 99);
    }
}
