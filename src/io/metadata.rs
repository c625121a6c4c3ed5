//! Run metadata JSON (`{"last_updated_utc": ...}`).

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::RunMetadata;
use crate::error::AppError;
use crate::io::replace_file;

pub const METADATA_FILE: &str = "meta.json";

pub fn write_metadata(path: &Path, meta: &RunMetadata) -> Result<(), AppError> {
    replace_file(path, |sink| {
        serde_json::to_writer_pretty(sink, meta)
            .map_err(|e| AppError::new(2, format!("Failed to write metadata JSON: {e}")))
    })
}

/// Read metadata if a previous run wrote it.
pub fn read_metadata(path: &Path) -> Result<Option<RunMetadata>, AppError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AppError::new(
                2,
                format!("Failed to open metadata '{}': {e}", path.display()),
            ));
        }
    };
    let meta = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid metadata JSON '{}': {e}", path.display())))?;
    Ok(Some(meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn metadata_uses_rfc3339_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(METADATA_FILE);
        let meta = RunMetadata {
            last_updated_utc: Utc.with_ymd_and_hms(2024, 5, 3, 14, 30, 0).unwrap(),
        };

        write_metadata(&path, &meta).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["last_updated_utc"], "2024-05-03T14:30:00Z");

        assert_eq!(read_metadata(&path).unwrap(), Some(meta));
    }

    #[test]
    fn missing_metadata_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_metadata(&dir.path().join(METADATA_FILE)).unwrap(), None);
    }
}
