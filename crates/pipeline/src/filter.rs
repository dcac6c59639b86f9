//! Predicate application over record collections.
//!
//! Pure function of (records, filter spec); no side effects. Date bounds
//! are inclusive and compared lexicographically, which is equivalent to
//! calendar order for `YYYY-MM-DD` strings.

use adpulse_core::types::{normalize_account_id, FilterSpec, MetricRecord};

fn matches_date(record: &MetricRecord, spec: &FilterSpec) -> bool {
    if !spec.has_date_filter() {
        return true;
    }
    // A record without a date cannot satisfy an active date filter.
    if !record.has_date() {
        return false;
    }
    if let Some(start) = spec.start_date.as_deref() {
        if record.date.as_str() < start {
            return false;
        }
    }
    if let Some(end) = spec.end_date.as_deref() {
        if record.date.as_str() > end {
            return false;
        }
    }
    true
}

fn matches_account(record: &MetricRecord, selected: &str) -> bool {
    record
        .account_id
        .as_deref()
        .is_some_and(|a| normalize_account_id(a) == normalize_account_id(selected))
}

/// Return the subsequence of records satisfying every supplied predicate.
pub fn apply_filters(records: &[MetricRecord], spec: &FilterSpec) -> Vec<MetricRecord> {
    records
        .iter()
        .filter(|r| {
            matches_date(r, spec)
                && spec
                    .campaign_name
                    .as_deref()
                    .is_none_or(|c| r.campaign_name == c)
                && spec
                    .ad_set_name
                    .as_deref()
                    .is_none_or(|s| r.ad_set_name.as_deref() == Some(s))
                && spec
                    .ad_name
                    .as_deref()
                    .is_none_or(|a| r.ad_name.as_deref() == Some(a))
                && spec
                    .account_id
                    .as_deref()
                    .is_none_or(|acct| matches_account(r, acct))
        })
        .cloned()
        .collect()
}
