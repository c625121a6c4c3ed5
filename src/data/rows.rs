//! Series payload -> tidy observations.
//!
//! Each raw entry is `(year, period, value)`. The period is resolved with
//! [`month_for_period`]; skip codes are dropped silently. Entries whose year or
//! value cannot be parsed are handled per [`MalformedPolicy`].

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::data::bls::{DataEntry, SeriesPayload};
use crate::data::period::month_for_period;
use crate::domain::{MalformedPolicy, Observation, SeriesCatalog};
use crate::error::MalformedObservation;

/// Observations extracted from one payload, plus the entries that were dropped as malformed.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub observations: Vec<Observation>,
    pub dropped: Vec<MalformedObservation>,
}

pub struct RowExtractor<'a> {
    catalog: &'a SeriesCatalog,
    policy: MalformedPolicy,
}

impl<'a> RowExtractor<'a> {
    pub fn new(catalog: &'a SeriesCatalog, policy: MalformedPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Convert one series payload. Output order follows the payload, not the calendar.
    pub fn to_rows(&self, payload: &SeriesPayload) -> Result<Extraction, MalformedObservation> {
        let label = match self.catalog.get(&payload.series_id) {
            Some(desc) => desc.display_name.as_str(),
            None => {
                warn!(series_id = %payload.series_id, "series is not in the catalog");
                payload.series_id.as_str()
            }
        };

        let mut out = Extraction::default();
        let mut skipped_periods = 0usize;

        for entry in &payload.data {
            let Some(month) = month_for_period(&entry.period) else {
                skipped_periods += 1;
                continue;
            };

            match parse_entry(&payload.series_id, entry, month) {
                Ok(obs) => out.observations.push(obs),
                Err(bad) => match self.policy {
                    MalformedPolicy::Fail => return Err(bad),
                    MalformedPolicy::Skip => {
                        warn!(series = label, "{bad}; dropping entry");
                        out.dropped.push(bad);
                    }
                },
            }
        }

        debug!(
            series = label,
            rows = out.observations.len(),
            skipped_periods,
            dropped = out.dropped.len(),
            "extracted series"
        );
        Ok(out)
    }
}

fn parse_entry(series_id: &str, entry: &DataEntry, month: u32) -> Result<Observation, MalformedObservation> {
    let year_text = entry.year.as_text();
    let value_text = entry.value.as_text();
    let malformed = |reason: String| MalformedObservation {
        series_id: series_id.to_string(),
        year: year_text.clone(),
        period: entry.period.clone(),
        reason,
    };

    let year: i32 = year_text
        .parse()
        .map_err(|_| malformed(format!("invalid year '{year_text}'")))?;
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| malformed(format!("year {year} is out of range")))?;

    let value = value_text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed(format!("invalid value '{value_text}'")))?;

    Ok(Observation::new(series_id, date, value))
}
