//! Pure aggregation pipeline for campaign performance records —
//! normalization, filtering, duplicate collapse, KPI aggregation,
//! unique-reach reconciliation, campaign grouping, trend series, and
//! CSV export.
//!
//! Every stage is a pure, synchronous function of its inputs; the whole
//! pipeline is re-run from scratch whenever the record set or the filter
//! selection changes.

pub mod aggregate;
pub mod dashboard;
pub mod dedup;
pub mod export;
pub mod filter;
pub mod grouper;
pub mod normalize;
pub mod reach;
pub mod trend;

pub use aggregate::{aggregate, Ratios, Totals};
pub use dashboard::{compute_dashboard, DashboardView};
pub use dedup::dedup;
pub use export::export_csv;
pub use filter::apply_filters;
pub use grouper::{group_campaigns, CampaignRow, SortKey, SortOrder};
pub use normalize::{normalize, normalize_all};
pub use reach::{per_campaign_unique_reach, resolve_unique_reach};
pub use trend::{trend_by_date, TrendPoint};
