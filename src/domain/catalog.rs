//! Series catalog: which BLS series to track and how to label them.
//!
//! The catalog is built once per run and passed by reference to the pieces that
//! need it. It is never mutated after construction.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Native publication frequency of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "M")]
    Monthly,
    #[serde(rename = "Q")]
    Quarterly,
}

impl Frequency {
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub id: String,
    pub section: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "freq")]
    pub frequency: Frequency,
}

/// (id, section, name, frequency)
const DEFAULT_SERIES: &[(&str, &str, &str, Frequency)] = &[
    ("LNS12000000", "Employment", "Civilian Employment (Thousands, SA)", Frequency::Monthly),
    ("CES0000000001", "Employment", "Total Nonfarm Employment (Thousands, SA)", Frequency::Monthly),
    ("LNS14000000", "Employment", "Unemployment Rate (% SA)", Frequency::Monthly),
    ("CES0500000002", "Employment", "Avg Weekly Hours, Total Private (SA)", Frequency::Monthly),
    ("CES0500000003", "Employment", "Avg Hourly Earnings, Total Private ($, SA)", Frequency::Monthly),
    ("PRS85006093", "Productivity", "Output per Hour - Nonfarm Business (Q/Q %)", Frequency::Quarterly),
    ("CUUR0000SA0", "Price Index", "CPI-U All Items (NSA, 1982-84=100)", Frequency::Monthly),
    ("CIU1010000000000I", "Compensation", "ECI - Total Compensation, Private (Index, NSA)", Frequency::Quarterly),
    ("CIU1010000000000A", "Compensation", "ECI - Total Compensation, Private (12m % change, NSA)", Frequency::Quarterly),
];

/// Ordered, immutable set of series descriptors with unique ids.
#[derive(Debug, Clone)]
pub struct SeriesCatalog {
    series: Vec<SeriesDescriptor>,
}

impl SeriesCatalog {
    /// Build a catalog, rejecting empty lists and duplicate ids.
    pub fn new(series: Vec<SeriesDescriptor>) -> Result<Self, AppError> {
        if series.is_empty() {
            return Err(AppError::new(2, "Series catalog is empty."));
        }
        let mut seen = HashSet::new();
        for s in &series {
            if s.id.trim().is_empty() {
                return Err(AppError::new(2, "Series catalog contains an empty id."));
            }
            if !seen.insert(s.id.as_str()) {
                return Err(AppError::new(
                    2,
                    format!("Series catalog lists '{}' more than once.", s.id),
                ));
            }
        }
        Ok(Self { series })
    }

    /// The curated labor-market catalog tracked by default.
    pub fn builtin() -> Self {
        let series = DEFAULT_SERIES
            .iter()
            .map(|&(id, section, name, frequency)| SeriesDescriptor {
                id: id.to_string(),
                section: section.to_string(),
                display_name: name.to_string(),
                frequency,
            })
            .collect();
        Self { series }
    }

    /// Load a catalog from a JSON array of `{id, section, name, freq}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(2, format!("Failed to open catalog '{}': {e}", path.display()))
        })?;
        let series: Vec<SeriesDescriptor> = serde_json::from_reader(file)
            .map_err(|e| AppError::new(2, format!("Invalid catalog JSON '{}': {e}", path.display())))?;
        Self::new(series)
    }

    pub fn get(&self, id: &str) -> Option<&SeriesDescriptor> {
        self.series.iter().find(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.series.iter().map(|s| s.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesDescriptor> {
        self.series.iter()
    }

    /// Section names in first-appearance order.
    pub fn sections(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for s in &self.series {
            if !out.contains(&s.section.as_str()) {
                out.push(&s.section);
            }
        }
        out
    }
}
