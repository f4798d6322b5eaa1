//! # Distributions
//! Vendor and time aggregations over a document set. All derived, recomputed
//! per call; documents with a malformed timestamp only drop out of the
//! time-based views.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::document::DocumentSet;

/// Share of `count` in `total` as a percentage rounded to 2 decimals; 0 for an empty total.
///
/// Rounding works on the exact binary value with ties to even, so `1/32`
/// (3.125) gives 3.12.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = count as f64 / total as f64 * 100.0;
    format!("{pct:.2}").parse().unwrap_or(pct)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorStat {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorDistribution {
    pub total_vendors: usize,
    /// Count descending; equal counts keep first-seen order.
    pub vendors: Vec<VendorStat>,
}

/// Group by display name and rank by document count.
pub fn vendor_distribution(docs: &DocumentSet) -> VendorDistribution {
    let counts = counts_in_order(docs.iter().map(|d| d.source_display_name.as_str()));
    let total = docs.len();

    let vendors: Vec<VendorStat> = counts
        .into_iter()
        .map(|(name, count)| VendorStat {
            name: name.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    VendorDistribution {
        total_vendors: vendors.len(),
        vendors,
    }
}

/// Keys with their counts, sorted by count descending; ties in first-seen order.
fn counts_in_order<'a, I>(keys: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(&str, usize)> = Vec::new();
    for k in keys {
        match slot.get(k) {
            Some(&i) => out[i].1 += 1,
            None => {
                slot.insert(k, out.len());
                out.push((k, 1));
            }
        }
    }
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDistribution {
    /// Hour of day (0–23) → documents.
    pub hourly_distribution: BTreeMap<u32, usize>,
    /// `YYYY-MM-DD` → documents.
    pub daily_distribution: BTreeMap<String, usize>,
    /// Hours in the order documents first showed them.
    #[serde(skip)]
    hour_order: Vec<u32>,
}

impl TimeDistribution {
    fn record(&mut self, ts: chrono::NaiveDateTime) {
        use chrono::Timelike;

        let hour = ts.hour();
        let slot = self.hourly_distribution.entry(hour).or_insert(0);
        if *slot == 0 {
            self.hour_order.push(hour);
        }
        *slot += 1;
        *self
            .daily_distribution
            .entry(ts.format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;
    }

    /// Busiest hour; ties go to the hour seen first, 0 without data.
    pub fn peak_hour(&self) -> u32 {
        // A deserialized value has no first-seen order; fall back to hour order.
        let order: Vec<u32> = if self.hour_order.len() == self.hourly_distribution.len() {
            self.hour_order.clone()
        } else {
            self.hourly_distribution.keys().copied().collect()
        };

        let mut best: Option<(u32, usize)> = None;
        for h in order {
            let c = self.hourly_distribution.get(&h).copied().unwrap_or(0);
            if best.map_or(true, |(_, bc)| c > bc) {
                best = Some((h, c));
            }
        }
        best.map(|(h, _)| h).unwrap_or(0)
    }
}

pub fn time_distribution(docs: &DocumentSet) -> TimeDistribution {
    let mut out = TimeDistribution::default();
    let mut skipped = 0usize;
    for d in docs {
        let Some(ts) = d.parsed_timestamp() else {
            skipped += 1;
            continue;
        };
        out.record(ts);
    }
    if skipped > 0 {
        debug!(target: "distribution", skipped, "documents without a parsable timestamp");
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorTrend {
    pub vendor: String,
    /// Sorted by date.
    pub data: Vec<TrendPoint>,
    pub total: usize,
}

/// Daily counts per vendor; vendors by total descending (ties first-seen).
pub fn vendor_trends(docs: &DocumentSet) -> Vec<VendorTrend> {
    let mut order: Vec<&str> = Vec::new();
    let mut per_vendor: HashMap<&str, BTreeMap<String, usize>> = HashMap::new();

    for d in docs {
        let Some(ts) = d.parsed_timestamp() else {
            continue;
        };
        let vendor = d.source_display_name.as_str();
        let days = per_vendor.entry(vendor).or_insert_with(|| {
            order.push(vendor);
            BTreeMap::new()
        });
        *days.entry(ts.format("%Y-%m-%d").to_string()).or_insert(0) += 1;
    }

    let mut trends: Vec<VendorTrend> = order
        .into_iter()
        .filter_map(|v| per_vendor.remove(v).map(|days| (v, days)))
        .map(|(vendor, days)| VendorTrend {
            vendor: vendor.to_string(),
            total: days.values().sum(),
            data: days
                .into_iter()
                .map(|(date, count)| TrendPoint { date, count })
                .collect(),
        })
        .collect();
    trends.sort_by(|a, b| b.total.cmp(&a.total));
    trends
}

/// How many recent dates [`news_stats`] reports.
pub const RECENT_DATES: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsStats {
    pub total_articles: usize,
    pub vendor_stats: BTreeMap<String, usize>,
    /// Most recent dates first.
    pub date_stats: Vec<TrendPoint>,
}

pub fn news_stats(docs: &DocumentSet) -> NewsStats {
    let mut vendor_stats = BTreeMap::new();
    for d in docs {
        *vendor_stats.entry(d.source_display_name.clone()).or_insert(0) += 1;
    }
    let date_stats = time_distribution(docs)
        .daily_distribution
        .into_iter()
        .rev()
        .take(RECENT_DATES)
        .map(|(date, count)| TrendPoint { date, count })
        .collect();

    NewsStats {
        total_articles: docs.len(),
        vendor_stats,
        date_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, RawDocument};

    fn doc(id: &str, vendor: &str, ts: &str) -> Document {
        Document::from_raw(RawDocument {
            id: Some(id.into()),
            title: Some(format!("title {id}")),
            source_id: vendor.to_lowercase(),
            source_display_name: Some(vendor.into()),
            timestamp: ts.into(),
            ..Default::default()
        })
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 5), 100.0);
    }

    #[test]
    fn vendor_distribution_two_to_one() {
        let set = DocumentSet::from_documents(vec![
            doc("1", "A", "2025-08-11 14:00:00"),
            doc("2", "B", "2025-08-11 15:00:00"),
            doc("3", "A", "2025-08-11 16:00:00"),
        ]);
        let v = vendor_distribution(&set);
        assert_eq!(v.total_vendors, 2);
        assert_eq!(v.vendors[0].name, "A");
        assert_eq!(v.vendors[0].percentage, 66.67);
        assert_eq!(v.vendors[1].name, "B");
        assert_eq!(v.vendors[1].percentage, 33.33);
    }

    #[test]
    fn vendor_ties_keep_first_seen_order() {
        let set = DocumentSet::from_documents(vec![
            doc("1", "Z", ""),
            doc("2", "A", ""),
        ]);
        let v = vendor_distribution(&set);
        assert_eq!(v.vendors[0].name, "Z");
    }

    #[test]
    fn malformed_timestamps_only_leave_time_views() {
        let set = DocumentSet::from_documents(vec![
            doc("1", "A", "2025-08-11 14:00:00"),
            doc("2", "A", "2025-08-11 14:30:00"),
            doc("3", "A", "2025-08-12 09:00:00"),
            doc("4", "A", "bogus"),
        ]);
        let t = time_distribution(&set);
        assert_eq!(t.hourly_distribution.get(&14), Some(&2));
        assert_eq!(t.daily_distribution.get("2025-08-11"), Some(&2));
        assert_eq!(t.hourly_distribution.values().sum::<usize>(), 3);
        assert_eq!(t.peak_hour(), 14);
        assert_eq!(vendor_distribution(&set).vendors[0].count, 4);
    }

    #[test]
    fn peak_hour_ties_and_empty() {
        assert_eq!(TimeDistribution::default().peak_hour(), 0);
        let set = DocumentSet::from_documents(vec![
            doc("1", "A", "2025-08-11 20:00:00"),
            doc("2", "A", "2025-08-11 08:00:00"),
        ]);
        assert_eq!(time_distribution(&set).peak_hour(), 20);
    }

    #[test]
    fn peak_hour_tie_after_a_leader_changes_hands() {
        let set = DocumentSet::from_documents(vec![
            doc("1", "A", "2025-08-11 22:00:00"),
            doc("2", "A", "2025-08-11 05:00:00"),
            doc("3", "A", "2025-08-12 05:00:00"),
            doc("4", "A", "2025-08-12 22:00:00"),
        ]);
        assert_eq!(time_distribution(&set).peak_hour(), 22);
    }

    #[test]
    fn peak_hour_without_first_seen_order_uses_hour_order() {
        let json = r#"{"hourly_distribution":{"20":1,"8":1},"daily_distribution":{}}"#;
        let t: TimeDistribution = serde_json::from_str(json).unwrap();
        assert_eq!(t.peak_hour(), 8);
    }

    #[test]
    fn percentage_ties_round_to_even() {
        assert_eq!(percentage(1, 32), 3.12);
        assert_eq!(percentage(3, 32), 9.38);
        assert_eq!(percentage(1, 8), 12.5);
    }

    #[test]
    fn trends_group_by_vendor_and_date() {
        let set = DocumentSet::from_documents(vec![
            doc("1", "B", "2025-08-12 10:00:00"),
            doc("2", "A", "2025-08-11 10:00:00"),
            doc("3", "A", "2025-08-12 10:00:00"),
            doc("4", "A", "2025-08-11 11:00:00"),
        ]);
        let t = vendor_trends(&set);
        assert_eq!(t[0].vendor, "A");
        assert_eq!(t[0].total, 3);
        assert_eq!(t[0].data[0], TrendPoint { date: "2025-08-11".into(), count: 2 });
        assert_eq!(t[1].vendor, "B");
    }

    #[test]
    fn stats_report_recent_dates_first() {
        let docs: Vec<Document> = (1..=9)
            .map(|d| doc(&d.to_string(), "A", &format!("2025-08-{:02} 10:00:00", d)))
            .collect();
        let s = news_stats(&DocumentSet::from_documents(docs));
        assert_eq!(s.total_articles, 9);
        assert_eq!(s.date_stats.len(), RECENT_DATES);
        assert_eq!(s.date_stats[0].date, "2025-08-09");
        assert_eq!(s.vendor_stats.get("A"), Some(&9));
    }
}
