//! Reporting utilities: per-series coverage and formatted terminal output.
//!
//! We keep formatting code in one place so the pipeline stays free of
//! presentation concerns.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Observation, RunMetadata, SeriesCatalog};
use crate::merge::MergeStats;

/// Date range and row count for one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCoverage {
    pub series_id: String,
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub count: usize,
}

/// Per-series coverage, ordered by series id.
pub fn coverage(rows: &[Observation]) -> Vec<SeriesCoverage> {
    let mut by_series: BTreeMap<&str, SeriesCoverage> = BTreeMap::new();
    for row in rows {
        by_series
            .entry(row.series_id.as_str())
            .and_modify(|c| {
                c.first = c.first.min(row.date);
                c.last = c.last.max(row.date);
                c.count += 1;
            })
            .or_insert_with(|| SeriesCoverage {
                series_id: row.series_id.clone(),
                first: row.date,
                last: row.date,
                count: 1,
            });
    }
    by_series.into_values().collect()
}

/// Format the coverage table, labelling series from the catalog where possible.
pub fn format_coverage(coverage: &[SeriesCoverage], catalog: &SeriesCatalog) -> String {
    let mut out = String::new();
    out.push_str("Coverage:\n");
    if coverage.is_empty() {
        out.push_str("  (no observations)\n");
        return out;
    }

    out.push_str(&format!(
        "  {:<18} {:<10} {:<10} {:<10} {:>6}  {}\n",
        "series_id", "freq", "min", "max", "count", "name"
    ));

    // Catalogued series grouped by section (catalog order), then anything uncatalogued.
    for section in catalog.sections() {
        let rows: Vec<String> = catalog
            .iter()
            .filter(|d| d.section == section)
            .filter_map(|d| {
                let c = coverage.iter().find(|c| c.series_id == d.id)?;
                Some(coverage_line(c, d.frequency.label(), &d.display_name))
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        out.push_str(&format!("  [{section}]\n"));
        for row in rows {
            out.push_str(&row);
        }
    }

    let uncatalogued: Vec<&SeriesCoverage> = coverage
        .iter()
        .filter(|c| catalog.get(&c.series_id).is_none())
        .collect();
    if !uncatalogued.is_empty() {
        out.push_str("  [Other]\n");
        for c in uncatalogued {
            out.push_str(&coverage_line(c, "-", "-"));
        }
    }

    // Catalogued series with no rows at all are worth calling out.
    let missing: Vec<&str> = catalog
        .iter()
        .map(|d| d.id.as_str())
        .filter(|id| !coverage.iter().any(|c| c.series_id == *id))
        .collect();
    if !missing.is_empty() {
        out.push_str(&format!("  no data for: {}\n", missing.join(", ")));
    }

    out
}

fn coverage_line(c: &SeriesCoverage, freq: &str, name: &str) -> String {
    format!(
        "  {:<18} {:<10} {:<10} {:<10} {:>6}  {}\n",
        c.series_id,
        freq,
        c.first.to_string(),
        c.last.to_string(),
        c.count,
        name
    )
}

/// One-paragraph summary of an update run.
pub fn format_update_summary(
    total_rows: usize,
    stats: &MergeStats,
    dropped: usize,
    meta: &RunMetadata,
    dataset_path: &std::path::Path,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Saved {total_rows} rows to {}\n", dataset_path.display()));
    out.push_str(&format!(
        "Fetched: {} new, {} revised, {} unchanged",
        stats.added, stats.revised, stats.unchanged
    ));
    if dropped > 0 {
        out.push_str(&format!(", {dropped} malformed dropped"));
    }
    out.push('\n');
    out.push_str(&format!("Last updated (UTC): {}\n", meta.last_updated_utc.to_rfc3339()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(series: &str, y: i32, m: u32) -> Observation {
        Observation::new(series, NaiveDate::from_ymd_opt(y, m, 1).unwrap(), 1.0)
    }

    #[test]
    fn coverage_groups_by_series() {
        let rows = vec![obs("B", 2020, 3), obs("A", 2021, 5), obs("A", 2019, 1), obs("A", 2020, 7)];
        let cov = coverage(&rows);
        assert_eq!(cov.len(), 2);
        assert_eq!(cov[0].series_id, "A");
        assert_eq!(cov[0].first, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(cov[0].last, NaiveDate::from_ymd_opt(2021, 5, 1).unwrap());
        assert_eq!(cov[0].count, 3);
        assert_eq!(cov[1].count, 1);
    }

    #[test]
    fn format_names_catalogued_series_and_lists_gaps() {
        let catalog = SeriesCatalog::builtin();
        let text = format_coverage(&coverage(&[obs("LNS14000000", 2024, 1)]), &catalog);
        assert!(text.contains("Unemployment Rate (% SA)"));
        assert!(text.contains("no data for: LNS12000000"));
        assert!(!text.contains("no data for: LNS14000000"));
    }

    #[test]
    fn coverage_is_grouped_by_catalog_section() {
        let catalog = SeriesCatalog::builtin();
        let rows = vec![
            obs("PRS85006093", 2024, 3),
            obs("LNS14000000", 2024, 1),
            obs("WPU00000000", 2024, 1),
        ];
        let text = format_coverage(&coverage(&rows), &catalog);

        let employment = text.find("[Employment]").unwrap();
        let productivity = text.find("[Productivity]").unwrap();
        let other = text.find("[Other]").unwrap();
        assert!(employment < productivity && productivity < other);
        assert!(!text.contains("[Price Index]"));

        let line = text.lines().find(|l| l.contains("PRS85006093")).unwrap();
        assert!(line.contains("quarterly"));
        assert!(text.lines().any(|l| l.contains("WPU00000000") && l.trim_end().ends_with('-')));
    }
}
