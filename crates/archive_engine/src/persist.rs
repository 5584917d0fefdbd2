use std::fs;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

use archive_core::RunSummary;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), StorageError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StorageError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StorageError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StorageError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| StorageError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Write the run log, replacing whatever a previous run left behind.
pub fn write_run_log(path: &Path, summary: &RunSummary) -> Result<(), StorageError> {
    fs::write(path, summary.render())?;
    Ok(())
}
