//! Input/output helpers.
//!
//! - tidy CSV dataset load/replace (`dataset`)
//! - run metadata JSON (`metadata`)
//!
//! Both files are replaced wholesale: content goes to a sibling `*.tmp` file
//! which is then renamed over the target, so readers never see a half-written
//! file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub mod dataset;
pub mod metadata;

pub use dataset::*;
pub use metadata::*;

/// Write `path` through a temp file + rename.
pub(crate) fn replace_file<F>(path: &Path, write: F) -> Result<(), AppError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), AppError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", parent.display())))?;
    }

    let tmp = temp_path(path)?;
    let file = File::create(&tmp)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", tmp.display())))?;
    let mut writer = BufWriter::new(file);

    let written = write(&mut writer).and_then(|()| {
        writer
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", tmp.display())))
    });
    drop(writer);
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::new(2, format!("Failed to replace '{}': {e}", path.display()))
    })
}

fn temp_path(path: &Path) -> Result<PathBuf, AppError> {
    let mut name = path
        .file_name()
        .ok_or_else(|| AppError::new(2, format!("Not a file path: '{}'", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "original").unwrap();

        let result = replace_file(&path, |w| {
            w.write_all(b"partial").unwrap();
            Err(AppError::new(2, "boom"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert!(!dir.path().join("out.txt.tmp").exists());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");

        replace_file(&path, |w| {
            w.write_all(b"hello")
                .map_err(|e| AppError::new(2, e.to_string()))
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }
}
