//! Union, dedupe, and sort of persisted + freshly fetched observations.
//!
//! Keys are `(series_id, date)`. When a key appears more than once, the last
//! occurrence wins, and `incoming` always comes after `existing`, so fresh data
//! (including upstream revisions) replaces stored values. The result is sorted
//! by key, which downstream readers rely on.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::Observation;

/// Counts describing what a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Keys not present before.
    pub added: usize,
    /// Existing keys whose value changed.
    pub revised: usize,
    /// Existing keys re-fetched with the same value.
    pub unchanged: usize,
}

/// Merge `incoming` into `existing`; see module docs for the rules.
pub fn merge(existing: Vec<Observation>, incoming: Vec<Observation>) -> Vec<Observation> {
    merge_with_stats(existing, incoming).0
}

/// Same as [`merge`], also reporting added/revised/unchanged counts.
pub fn merge_with_stats(existing: Vec<Observation>, incoming: Vec<Observation>) -> (Vec<Observation>, MergeStats) {
    let mut by_key: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    for obs in existing {
        by_key.insert((obs.series_id, obs.date), obs.value);
    }

    let mut stats = MergeStats::default();
    // Duplicates inside `incoming` itself are collapsed before counting.
    let mut fresh: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    for obs in incoming {
        fresh.insert((obs.series_id, obs.date), obs.value);
    }

    for (key, value) in fresh {
        match by_key.insert(key, value) {
            None => stats.added += 1,
            Some(old) if old.to_bits() == value.to_bits() => stats.unchanged += 1,
            Some(_) => stats.revised += 1,
        }
    }

    let merged = by_key
        .into_iter()
        .map(|((series_id, date), value)| Observation { series_id, date, value })
        .collect();

    (merged, stats)
}

/// Latest observation date across the whole dataset.
pub fn max_date(observations: &[Observation]) -> Option<NaiveDate> {
    observations.iter().map(|o| o.date).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(series: &str, y: i32, m: u32, value: f64) -> Observation {
        Observation::new(series, NaiveDate::from_ymd_opt(y, m, 1).unwrap(), value)
    }

    fn is_strictly_sorted(rows: &[Observation]) -> bool {
        rows.windows(2)
            .all(|w| (w[0].series_id.as_str(), w[0].date) < (w[1].series_id.as_str(), w[1].date))
    }

    #[test]
    fn incoming_value_wins_on_conflict() {
        let existing = vec![obs("S", 2020, 1, 100.0)];
        let incoming = vec![obs("S", 2020, 1, 101.0)];

        let (merged, stats) = merge_with_stats(existing, incoming);
        assert_eq!(merged, vec![obs("S", 2020, 1, 101.0)]);
        assert_eq!(stats, MergeStats { added: 0, revised: 1, unchanged: 0 });
    }

    #[test]
    fn result_is_sorted_and_unique() {
        let existing = vec![obs("B", 2021, 3, 1.0), obs("A", 2021, 2, 2.0), obs("A", 2021, 1, 3.0)];
        let incoming = vec![
            obs("A", 2021, 2, 2.5),
            obs("C", 2020, 12, 4.0),
            obs("A", 2020, 12, 5.0),
            obs("B", 2021, 3, 1.0),
        ];

        let (merged, stats) = merge_with_stats(existing, incoming);
        assert!(is_strictly_sorted(&merged));
        assert_eq!(
            merged,
            vec![
                obs("A", 2020, 12, 5.0),
                obs("A", 2021, 1, 3.0),
                obs("A", 2021, 2, 2.5),
                obs("B", 2021, 3, 1.0),
                obs("C", 2020, 12, 4.0),
            ]
        );
        assert_eq!(stats, MergeStats { added: 2, revised: 1, unchanged: 1 });
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = vec![obs("A", 2019, 5, 1.0), obs("B", 2019, 6, 2.0)];
        let incoming = vec![obs("A", 2019, 5, 1.1), obs("A", 2019, 7, 1.2), obs("B", 2019, 6, 2.0)];

        let once = merge(existing, incoming.clone());
        let twice = merge(once.clone(), incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn later_duplicate_within_incoming_wins() {
        let incoming = vec![obs("S", 2022, 1, 1.0), obs("S", 2022, 1, 2.0)];
        let (merged, stats) = merge_with_stats(Vec::new(), incoming);
        assert_eq!(merged, vec![obs("S", 2022, 1, 2.0)]);
        assert_eq!(stats.added, 1);
    }

    #[test]
    fn empty_inputs_merge_to_empty() {
        assert!(merge(Vec::new(), Vec::new()).is_empty());
        assert_eq!(max_date(&[]), None);
    }

    #[test]
    fn max_date_spans_all_series() {
        let rows = vec![obs("A", 2023, 11, 1.0), obs("B", 2022, 12, 1.0)];
        assert_eq!(max_date(&rows), NaiveDate::from_ymd_opt(2023, 11, 1));
    }
}
