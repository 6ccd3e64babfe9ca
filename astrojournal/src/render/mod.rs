//! Document renderers
//!
//! Each output writes one fragment file per group into its own folder, then
//! a combined document that pulls the fragments together between the
//! output's header and footer templates.

pub mod by_constellation;
pub mod by_date;
pub mod by_target;
pub mod latex;
pub mod statistics;
pub mod text_by_date;

use crate::journal_config::{JournalConfig, OutputKind, ResolvedOutput};
use crate::report_model::{Report, Schema};
use crate::statistics::Statistics;
use crate::templates::Template;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors that stop an output or one of its fragments
#[derive(Error, Debug)]
pub enum ExportError {
    /// The fragment folder could not be created or cleaned
    #[error("Cannot prepare folder {path}: {source}", path = .path.display())]
    Folder {
        /// Folder path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A fragment file could not be written
    #[error("Cannot write fragment {path}: {source}", path = .path.display())]
    Fragment {
        /// Fragment path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The combined document could not be written
    #[error("Cannot write document {path}: {source}", path = .path.display())]
    Document {
        /// Document path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// What one output pass produced
#[derive(Debug)]
pub struct ExportReport {
    /// Output kind
    pub output: OutputKind,
    /// Combined document path
    pub document: PathBuf,
    /// Fragments written successfully
    pub fragments: usize,
    /// Fragments that could not be written
    pub failures: Vec<ExportError>,
}

impl ExportReport {
    fn new(output: OutputKind, document: PathBuf) -> Self {
        Self {
            output,
            document,
            fragments: 0,
            failures: Vec::new(),
        }
    }

    /// Whether every fragment was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Write a fragment, recording the outcome instead of failing the pass
    fn write_fragment(&mut self, path: PathBuf, content: &str) {
        match write_text(&path, content) {
            Ok(()) => self.fragments += 1,
            Err(source) => {
                let error = ExportError::Fragment { path, source };
                log::error!("{error}");
                self.failures.push(error);
            }
        }
    }
}

/// Everything an output pass reads
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    /// Journal directory; folders and documents are relative to it
    pub root: &'a Path,
    /// Journal configuration
    pub config: &'a JournalConfig,
    /// Statistics to include, if enabled
    pub statistics: Option<&'a Statistics>,
}

impl ExportContext<'_> {
    /// Schema of the configured profile
    pub fn schema(&self) -> &'static Schema {
        self.config.profile.schema()
    }

    /// Settings of an output
    pub fn output(&self, kind: OutputKind) -> ResolvedOutput {
        self.config.output(kind)
    }

    /// Header and footer of an output
    pub fn templates(&self, output: &ResolvedOutput) -> (Template, Template) {
        let folder = self.config.header_footer_path(self.root);
        (
            Template::header_for(&folder, output),
            Template::footer_for(&folder, output),
        )
    }
}

/// Run one output pass
pub fn export(
    kind: OutputKind,
    reports: &[Report],
    ctx: &ExportContext<'_>,
) -> Result<ExportReport, ExportError> {
    match kind {
        OutputKind::LatexByDate => by_date::export(reports, ctx),
        OutputKind::LatexByTarget => by_target::export(reports, ctx),
        OutputKind::LatexByConstellation => by_constellation::export(reports, ctx),
        OutputKind::TextByDate => text_by_date::export(reports, ctx),
    }
}

/// Write a file through a buffered writer
///
/// The file is flushed before returning and closed on every path.
pub fn write_file<F>(path: &Path, body: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    body(&mut writer)?;
    writer.flush()
}

/// Write a string to a file
pub fn write_text(path: &Path, content: &str) -> io::Result<()> {
    write_file(path, |writer| writer.write_all(content.as_bytes()))
}

/// Create a fragment folder and delete fragments left by a previous run
///
/// Only files with the given extension are removed.
pub fn prepare_folder(folder: &Path, extension: &str) -> Result<(), ExportError> {
    let to_error = |source: io::Error| ExportError::Folder {
        path: folder.to_path_buf(),
        source,
    };
    fs::create_dir_all(folder).map_err(to_error)?;
    for path in list_files(folder, extension).map_err(to_error)? {
        log::debug!("Removing old fragment {}", path.display());
        fs::remove_file(&path).map_err(to_error)?;
    }
    Ok(())
}

/// Files with an extension directly inside a folder, sorted by name
pub fn list_files(folder: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// `\input` path of a fragment: folder and stem, forward slashes
pub(crate) fn input_path(folder: &str, stem: &str) -> String {
    let folder = folder.trim_end_matches(['/', '\\']).replace('\\', "/");
    if folder.is_empty() {
        stem.to_string()
    } else {
        format!("{folder}/{stem}")
    }
}

/// Write a combined document, wrapping failures
fn write_document(path: &Path, content: &str) -> Result<(), ExportError> {
    write_text(path, content).map_err(|source| ExportError::Document {
        path: path.to_path_buf(),
        source,
    })
}
