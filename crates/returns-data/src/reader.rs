//! CSV file discovery and loading.
//!
//! Finds analytics exports under a data directory and reads their rows as
//! plain string fields for the normalizer.

use std::path::{Path, PathBuf};

use returns_core::error::{Result, ReturnsError};
use tracing::{debug, warn};

/// One CSV data row, fields in column order.
pub type RawRow = Vec<String>;

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_path`, sorted by path.
///
/// Fails with [`ReturnsError::DataPathNotFound`] when the directory is missing
/// and with [`ReturnsError::NoDataFiles`] when it holds no CSV files.
pub fn find_csv_files(data_path: &Path) -> Result<Vec<PathBuf>> {
    if !data_path.is_dir() {
        return Err(ReturnsError::DataPathNotFound(data_path.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", data_path.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_csv_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        return Err(ReturnsError::NoDataFiles(data_path.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

/// Read the data rows of one CSV file.
///
/// The first line is a header and is skipped. Lines starting with `#` are
/// comments. Rows may have any number of fields; column checks happen in the
/// normalizer.
pub fn read_csv_file(path: &Path) -> Result<Vec<RawRow>> {
    let wrap = |source: csv::Error| ReturnsError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(wrap)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(wrap)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read and concatenate the rows of `paths`, in order.
pub fn read_csv_files(paths: &[PathBuf]) -> Result<Vec<RawRow>> {
    let mut all_rows = Vec::new();
    for path in paths {
        all_rows.extend(read_csv_file(path)?);
    }
    Ok(all_rows)
}

/// Discover and read every CSV file under `data_path`.
///
/// Fails with [`ReturnsError::EmptyDataset`] when the files contain no rows.
pub fn load_rows(data_path: &Path) -> Result<Vec<RawRow>> {
    let files = find_csv_files(data_path)?;
    let rows = read_csv_files(&files)?;

    if rows.is_empty() {
        return Err(ReturnsError::EmptyDataset(files.len()));
    }

    debug!("Loaded {} rows from {} files", rows.len(), files.len());
    Ok(rows)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
