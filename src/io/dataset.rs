//! Tidy CSV store: `series_id,date,value`, one row per observation.
//!
//! Loading is strict. A store that cannot be read back exactly is an error,
//! never an empty dataset, otherwise the next run would overwrite history
//! with a fresh backfill window's worth of data.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use chrono::Datelike;
use csv::StringRecord;
use tracing::debug;

use crate::domain::Observation;
use crate::error::AppError;
use crate::io::replace_file;

pub const DATASET_FILE: &str = "bls_timeseries.csv";

const HEADER: [&str; 3] = ["series_id", "date", "value"];

/// Load the persisted dataset. A missing file is an empty dataset.
pub fn load_dataset(path: &Path) -> Result<Vec<Observation>, AppError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no existing dataset");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(AppError::new(
                2,
                format!("Failed to open dataset '{}': {e}", path.display()),
            ));
        }
    };

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(3, format!("Failed to read dataset header: {e}")))?
        .clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    ensure_header(&headers, path)?;

    let mut out = Vec::new();
    for (idx, result) in reader.deserialize::<Observation>().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        let obs = result.map_err(|e| {
            AppError::new(3, format!("{}:{line}: invalid row: {e}", path.display()))
        })?;
        if obs.date.day() != 1 {
            return Err(AppError::new(
                3,
                format!("{}:{line}: date {} is not the first of a month", path.display(), obs.date),
            ));
        }
        if !obs.value.is_finite() {
            return Err(AppError::new(
                3,
                format!("{}:{line}: non-finite value", path.display()),
            ));
        }
        out.push(obs);
    }

    Ok(out)
}

/// Replace the dataset file with `rows` (written in the order given).
pub fn write_dataset(path: &Path, rows: &[Observation]) -> Result<(), AppError> {
    replace_file(path, |sink| {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
        let write_err = |e: csv::Error| AppError::new(2, format!("Failed to write dataset CSV: {e}"));

        writer.write_record(HEADER).map_err(write_err)?;
        for row in rows {
            writer.serialize(row).map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV: {e}")))
    })
}

fn ensure_header(headers: &StringRecord, path: &Path) -> Result<(), AppError> {
    let names: Vec<String> = headers
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    if names != HEADER {
        return Err(AppError::new(
            3,
            format!(
                "Dataset '{}' has header [{}], expected [{}].",
                path.display(),
                names.join(","),
                HEADER.join(",")
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(series: &str, y: i32, m: u32, value: f64) -> Observation {
        Observation::new(series, NaiveDate::from_ymd_opt(y, m, 1).unwrap(), value)
    }

    #[test]
    fn missing_file_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let rows = load_dataset(&dir.path().join("absent.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn written_rows_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        let rows = vec![obs("CUUR0000SA0", 2024, 1, 308.417), obs("LNS14000000", 2024, 1, 3.7)];

        write_dataset(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("series_id,date,value\nCUUR0000SA0,2024-01-01,308.417\n"));

        assert_eq!(load_dataset(&path).unwrap(), rows);
    }

    #[test]
    fn empty_dataset_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        write_dataset(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "series_id,date,value\n");
        assert!(load_dataset(&path).unwrap().is_empty());
    }

    #[test]
    fn mid_month_dates_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        std::fs::write(&path, "series_id,date,value\nS,2024-01-01,1\nS,2024-02-15,2\n").unwrap();

        let err = load_dataset(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains(":3:"));
    }

    #[test]
    fn wrong_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        std::fs::write(&path, "id,when,value\nS,2024-01-01,1\n").unwrap();
        assert!(load_dataset(&path).is_err());
    }

    #[test]
    fn unparseable_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        std::fs::write(&path, "series_id,date,value\nS,2024-01-01,abc\n").unwrap();
        assert_eq!(load_dataset(&path).unwrap_err().exit_code(), 3);
    }
}
