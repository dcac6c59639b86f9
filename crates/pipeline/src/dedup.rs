//! Duplicate observation collapse.
//!
//! Records sharing the composite identity (campaign, date, account, ad-set,
//! ad) are collapsed to a single row. The incoming record replaces the
//! stored one only when both carry an id and the incoming id is strictly
//! larger; otherwise the first-seen record is kept.

use std::collections::HashMap;

use adpulse_core::types::MetricRecord;

/// Collapse duplicates in a single pass. First-seen order is preserved in
/// the output.
pub fn dedup(records: Vec<MetricRecord>) -> Vec<MetricRecord> {
    let mut slots: Vec<MetricRecord> = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());

    for record in records {
        let key = record.dedup_key();
        match index.get(&key) {
            Some(&slot) => {
                let replace = matches!(
                    (slots[slot].id, record.id),
                    (Some(existing), Some(incoming)) if incoming > existing
                );
                if replace {
                    slots[slot] = record;
                }
            }
            None => {
                index.insert(key, slots.len());
                slots.push(record);
            }
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: Option<i64>, date: &str, campaign: &str) -> MetricRecord {
        MetricRecord {
            id,
            date: date.to_string(),
            campaign_name: campaign.to_string(),
            ad_set_name: None,
            ad_name: None,
            account_id: Some("act_1".to_string()),
            impressions: 100,
            clicks: 10,
            link_clicks: 0,
            conversions: 1,
            reach: 80,
            engagements: 5,
            landing_page_views: 3,
            cost: 10.0,
            conversion_value: 50.0,
            period_unique_reach: None,
        }
    }

    #[test]
    fn test_higher_id_wins_either_order() {
        let a = rec(Some(5), "2024-01-01", "A");
        let b = rec(Some(9), "2024-01-01", "A");

        let out = dedup(vec![a.clone(), b.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, Some(9));

        let out = dedup(vec![b, a]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, Some(9));
    }

    #[test]
    fn test_missing_id_keeps_first_seen() {
        let first = rec(None, "2024-01-01", "A");
        let mut second = rec(Some(7), "2024-01-01", "A");
        second.clicks = 99;

        let out = dedup(vec![first, second]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, None);
        assert_eq!(out[0].clicks, 10);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            rec(Some(1), "2024-01-01", "A"),
            rec(Some(2), "2024-01-01", "A"),
            rec(Some(3), "2024-01-02", "A"),
            rec(Some(4), "2024-01-01", "B"),
        ];
        let once = dedup(records);
        let twice = dedup(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_distinct_keys_all_survive() {
        let mut ad_level = rec(Some(1), "2024-01-01", "A");
        ad_level.ad_set_name = Some("Set 1".to_string());
        ad_level.ad_name = Some("Ad 1".to_string());

        let out = dedup(vec![rec(Some(1), "2024-01-01", "A"), ad_level]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_account_prefix_forms_collide() {
        let mut bare = rec(Some(2), "2024-01-01", "A");
        bare.account_id = Some("1".to_string());

        let out = dedup(vec![rec(Some(1), "2024-01-01", "A"), bare]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, Some(2));
    }
}
