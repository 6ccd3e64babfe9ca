//! Raw report discovery and import
//!
//! Raw reports are the `.tsv` and `.csv` files directly inside the raw
//! reports folder. Files are read in name order and their reports
//! concatenated, so prefixing files with a date or number controls the
//! overall order.

use crate::report_model::{parse_reports, ParseWarning, Report, Schema};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Extensions recognised as raw reports
pub const RAW_REPORT_EXTENSIONS: [&str; 2] = ["tsv", "csv"];

/// Errors that can occur while importing raw reports
#[derive(Error, Debug)]
pub enum ImportError {
    /// The raw reports folder does not exist
    #[error("Raw reports folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// A directory could not be listed
    #[error("Cannot list {path}: {source}", path = .0.display(), source = .1)]
    Walk(PathBuf, #[source] walkdir::Error),

    /// A file could not be read
    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    Io(PathBuf, #[source] std::io::Error),
}

/// Result of importing one raw file
#[derive(Debug)]
pub struct ImportedFile {
    /// Path of the raw file
    pub path: PathBuf,
    /// Number of reports it contributed
    pub report_count: usize,
    /// Problems found while parsing it
    pub warnings: Vec<ParseWarning>,
}

/// Every report of a journal plus per-file details
#[derive(Debug, Default)]
pub struct ImportedJournal {
    /// Reports in file-name order, then file order
    pub reports: Vec<Report>,
    /// Files that were parsed
    pub files: Vec<ImportedFile>,
    /// Files that could not be read
    pub failures: Vec<ImportError>,
}

impl ImportedJournal {
    /// Total number of parse warnings
    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|file| file.warnings.len()).sum()
    }
}

/// Find raw report files, sorted by file name
///
/// # Parameters
/// * `folder` - Raw reports folder; subfolders are not searched
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Raw report files in name order
/// * `Err(ImportError)` - The folder is missing or cannot be listed
pub fn discover_raw_files(folder: &Path) -> Result<Vec<PathBuf>, ImportError> {
    if !folder.is_dir() {
        return Err(ImportError::FolderNotFound(folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ImportError::Walk(folder.to_path_buf(), e))?;
        let path = entry.path();
        let is_raw = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| {
                RAW_REPORT_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if entry.file_type().is_file() && is_raw {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Read and parse one raw file
///
/// Invalid UTF-8 sequences are replaced rather than rejected, since
/// spreadsheet exports often use a legacy encoding.
pub fn import_file(path: &Path, schema: &Schema) -> Result<(Vec<Report>, ImportedFile), ImportError> {
    let bytes = fs::read(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
    let text = String::from_utf8_lossy(&bytes);

    log::info!("Importing file {}", path.display());
    let parsed = parse_reports(&text, schema);
    let file = ImportedFile {
        path: path.to_path_buf(),
        report_count: parsed.reports.len(),
        warnings: parsed.warnings,
    };
    Ok((parsed.reports, file))
}

/// Import every raw report of a folder
///
/// A file that cannot be read is logged and skipped; the other files are
/// still imported.
///
/// # Returns
/// * `Ok(ImportedJournal)` - Reports of all readable files
/// * `Err(ImportError)` - The folder itself is missing or unreadable
pub fn import_reports(folder: &Path, schema: &Schema) -> Result<ImportedJournal, ImportError> {
    let paths = discover_raw_files(folder)?;

    #[cfg(feature = "parallel")]
    let results: Vec<_> = paths.par_iter().map(|path| import_file(path, schema)).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = paths.iter().map(|path| import_file(path, schema)).collect();

    let mut journal = ImportedJournal::default();
    for result in results {
        match result {
            Ok((reports, file)) => {
                journal.reports.extend(reports);
                journal.files.push(file);
            }
            Err(e) => {
                log::error!("{e}");
                journal.failures.push(e);
            }
        }
    }
    log::info!(
        "Imported {} reports from {} files",
        journal.reports.len(),
        journal.files.len()
    );
    Ok(journal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2020.tsv"), "").unwrap();
        fs::write(dir.path().join("2019.TSV"), "").unwrap();
        fs::write(dir.path().join("2021.csv"), "").unwrap();
        fs::write(dir.path().join("readme.txt"), "").unwrap();
        fs::create_dir(dir.path().join("old.tsv")).unwrap();

        let files = discover_raw_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2019.TSV", "2020.tsv", "2021.csv"]);
    }

    #[test]
    fn test_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let result = import_reports(&dir.path().join("nope"), &Schema::MINIMAL);
        assert!(matches!(result, Err(ImportError::FolderNotFound(_))));
    }

    #[test]
    fn test_reports_concatenate_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.tsv"),
            "Date\t03/02/2020\nTarget\tCons\tType\nM42\tOri\tNebula\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("a.tsv"),
            "Date\t01/02/2020\nTarget\tCons\tType\nM31\tAnd\tGalaxy\n\nDate\t02/02/2020\n",
        )
        .unwrap();

        let journal = import_reports(dir.path(), &Schema::MINIMAL).unwrap();
        let dates: Vec<&str> = journal.reports.iter().map(|r| r.header.date()).collect();
        assert_eq!(dates, vec!["01/02/2020", "02/02/2020", "03/02/2020"]);
        assert_eq!(journal.files[0].report_count, 2);
        assert_eq!(journal.warning_count(), 0);
    }

    #[test]
    fn test_latin1_file_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = b"Date\t01/02/2020\nTarget\tCons\tType\nCaf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\tAnd\tGalaxy\n");
        fs::write(dir.path().join("a.tsv"), bytes).unwrap();

        let journal = import_reports(dir.path(), &Schema::MINIMAL).unwrap();
        assert_eq!(journal.reports[0].items.len(), 1);
        assert!(journal.reports[0].items[0].target().starts_with("Caf"));
    }
}
