//! CSV serialization of campaign rows.

use crate::grouper::CampaignRow;

const HEADER: &[&str] = &[
    "campaign",
    "impressions",
    "clicks",
    "link_clicks",
    "conversions",
    "reach",
    "unique_reach",
    "engagements",
    "landing_page_views",
    "cost",
    "conversion_value",
    "ctr",
    "cpc",
    "cpa",
    "cpm",
    "cvr",
    "roas",
    "frequency",
    "engagement_rate",
];

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Serialize campaign rows to CSV, one line per campaign plus a header.
pub fn export_csv(rows: &[CampaignRow]) -> String {
    let mut csv = HEADER.join(",");
    csv.push('\n');

    for row in rows {
        let t = &row.totals;
        let r = &row.ratios;
        let cells = vec![
            quote(&row.campaign_name),
            t.impressions.to_string(),
            t.clicks.to_string(),
            t.link_clicks.to_string(),
            t.conversions.to_string(),
            t.reach.to_string(),
            format!("{:.0}", row.unique_reach),
            t.engagements.to_string(),
            t.landing_page_views.to_string(),
            format!("{:.2}", t.cost),
            format!("{:.2}", t.conversion_value),
            format!("{:.4}", r.ctr),
            format!("{:.4}", r.cpc),
            format!("{:.4}", r.cpa),
            format!("{:.4}", r.cpm),
            format!("{:.4}", r.cvr),
            format!("{:.4}", r.roas),
            format!("{:.4}", r.frequency),
            format!("{:.4}", r.engagement_rate),
        ];
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }

    csv
}
