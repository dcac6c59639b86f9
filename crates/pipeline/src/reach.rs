//! Unique-reach reconciliation.
//!
//! Under a fixed reporting period (all time / last 7 / last 30 days) the
//! backend supplies a deduplicated `period_unique_reach` per record. Under
//! a custom date range it does not, and reach is the plain sum of per-day
//! values (which double-counts repeat viewers). The two sources are never
//! mixed within one scope.

use std::collections::BTreeMap;

use adpulse_core::types::{MetricRecord, Period};
use tracing::warn;

/// Resolve unique reach for one campaign's records under a fixed period:
/// the maximum positive `period_unique_reach` observed, with a warning when
/// positive values disagree; summed daily reach as fallback when none is
/// positive; zero when daily reach is zero too (a stale value is never
/// reused).
fn fixed_period_reach(campaign: &str, records: &[&MetricRecord]) -> f64 {
    let mut resolved = 0.0_f64;
    let mut conflict = false;
    for record in records {
        if let Some(value) = record.period_unique_reach {
            if value > 0.0 {
                if resolved > 0.0 && value != resolved {
                    conflict = true;
                }
                resolved = resolved.max(value);
            }
        }
    }
    if conflict {
        warn!(
            campaign = campaign,
            resolved = resolved,
            "Conflicting period unique reach values within one campaign; using maximum"
        );
    }
    if resolved > 0.0 {
        return resolved;
    }

    let daily: u64 = records.iter().map(|r| r.reach).sum();
    daily as f64
}

/// Unique reach per distinct (trimmed) campaign name for the active period.
/// Records without a campaign name are skipped here; the grouper reports
/// them.
pub fn per_campaign_unique_reach(
    records: &[MetricRecord],
    period: Period,
) -> BTreeMap<String, f64> {
    let mut groups: BTreeMap<String, Vec<&MetricRecord>> = BTreeMap::new();
    for record in records {
        let name = record.campaign_name.trim();
        if name.is_empty() {
            continue;
        }
        groups.entry(name.to_string()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(name, group)| {
            let value = if period.is_fixed() {
                fixed_period_reach(&name, &group)
            } else {
                group.iter().map(|r| r.reach).sum::<u64>() as f64
            };
            (name, value)
        })
        .collect()
}

/// Unique reach for the whole filtered scope: per-campaign values summed
/// under a fixed period, plain daily-reach sum for a custom range.
pub fn resolve_unique_reach(records: &[MetricRecord], period: Period) -> f64 {
    if period.is_fixed() {
        per_campaign_unique_reach(records, period).values().sum()
    } else {
        records.iter().map(|r| r.reach).sum::<u64>() as f64
    }
}
