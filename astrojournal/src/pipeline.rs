//! Three-stage journal generation pipeline
//!
//! This module orchestrates the stages of journal generation:
//! 1. **Import**: Parse every raw report file of the journal
//! 2. **Export**: Group the reports and render each enabled output
//! 3. **Compile**: Typeset the LaTeX documents with the external compiler

use crate::compiler::{CompileError, CompileReport, TypesetCompiler};
use crate::importer::{self, ImportError, ImportedJournal};
use crate::journal_config::{JournalConfig, OutputKind};
use crate::render::{self, ExportContext, ExportError, ExportReport};
use crate::report_model::Report;
use crate::statistics::Statistics;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Errors that stop generation before any output is written
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The raw reports could not be imported
    #[error(transparent)]
    Import(#[from] ImportError),

    /// The raw reports folder holds no reports
    #[error("No observation reports found in {}", .0.display())]
    NoReports(PathBuf),
}

/// Outcome of one output pass
#[derive(Debug)]
pub struct PassOutcome {
    /// Output kind
    pub output: OutputKind,
    /// Fragments and document written, or why the pass stopped
    pub result: Result<ExportReport, ExportError>,
}

impl PassOutcome {
    /// Whether the pass wrote its document and every fragment
    pub fn is_success(&self) -> bool {
        self.result.as_ref().is_ok_and(ExportReport::is_complete)
    }
}

/// Outcome of compiling one document
#[derive(Debug)]
pub struct CompileOutcome {
    /// Document that was compiled
    pub document: PathBuf,
    /// PDF produced, or why compilation failed
    pub result: Result<CompileReport, CompileError>,
}

/// Everything a generation run did
#[derive(Debug, Default)]
pub struct GenerationSummary {
    /// Reports imported
    pub reports: usize,
    /// Raw files parsed
    pub files: usize,
    /// Parse warnings across all files
    pub warnings: usize,
    /// Raw files that could not be read
    pub import_failures: Vec<ImportError>,
    /// Output passes, in generation order
    pub passes: Vec<PassOutcome>,
    /// Compilations, in generation order
    pub compilations: Vec<CompileOutcome>,
}

impl GenerationSummary {
    /// Whether every file, pass and compilation succeeded
    pub fn is_success(&self) -> bool {
        self.import_failures.is_empty()
            && self.passes.iter().all(PassOutcome::is_success)
            && self.compilations.iter().all(|c| c.result.is_ok())
    }
}

/// Stage 1: Import every raw report of the journal
///
/// # Parameters
/// * `root` - Journal directory
/// * `config` - Journal configuration
///
/// # Returns
/// * `Ok(ImportedJournal)` - Reports of every readable raw file
/// * `Err(ImportError)` - The raw reports folder is missing or unreadable
pub fn import(root: &Path, config: &JournalConfig) -> Result<ImportedJournal, ImportError> {
    let folder = config.raw_reports_path(root);
    importer::import_reports(&folder, config.profile.schema())
}

/// Stage 2: Run every enabled output pass
///
/// Passes are independent: each builds its own grouping from the shared
/// reports and writes to its own folder. A failing pass does not stop the
/// others.
pub fn export_all(reports: &[Report], root: &Path, config: &JournalConfig) -> Vec<PassOutcome> {
    let statistics = config.statistics.then(|| Statistics::collect(reports));
    let ctx = ExportContext {
        root,
        config,
        statistics: statistics.as_ref(),
    };

    let run = |output: &OutputKind| {
        let result = render::export(*output, reports, &ctx);
        match &result {
            Ok(report) => log::info!(
                "{}: wrote {} with {} fragments",
                output.name(),
                report.document.display(),
                report.fragments
            ),
            Err(e) => log::error!("{}: {e}", output.name()),
        }
        PassOutcome {
            output: *output,
            result,
        }
    };

    #[cfg(feature = "parallel")]
    let passes: Vec<PassOutcome> = config.outputs.par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    let passes: Vec<PassOutcome> = config.outputs.iter().map(run).collect();

    passes
}

/// Stage 3: Compile the LaTeX documents of successful passes
pub fn compile_all(root: &Path, config: &JournalConfig, passes: &[PassOutcome]) -> Vec<CompileOutcome> {
    if !config.compiler.enabled {
        log::info!("Compilation disabled");
        return Vec::new();
    }

    let compiler = TypesetCompiler::from_config(&config.compiler);
    passes
        .iter()
        .filter(|pass| pass.output.is_latex())
        .filter_map(|pass| pass.result.as_ref().ok())
        .map(|report| {
            let document = config.output(report.output).document;
            let result = compiler.compile(root, &document);
            if let Err(e) = &result {
                log::error!("{e}");
            }
            CompileOutcome {
                document: report.document.clone(),
                result,
            }
        })
        .collect()
}

/// Run the whole pipeline on a journal directory
///
/// # Parameters
/// * `root` - Journal directory
/// * `config` - Journal configuration
///
/// # Returns
/// * `Ok(GenerationSummary)` - What was written, including failed passes
/// * `Err(PipelineError)` - Nothing could be imported
pub fn generate(root: &Path, config: &JournalConfig) -> Result<GenerationSummary, PipelineError> {
    // Stage 1: Import
    let journal = import(root, config)?;
    if journal.reports.is_empty() {
        return Err(PipelineError::NoReports(config.raw_reports_path(root)));
    }

    // Stage 2: Export
    let passes = export_all(&journal.reports, root, config);

    // Stage 3: Compile
    let compilations = compile_all(root, config, &passes);

    Ok(GenerationSummary {
        reports: journal.reports.len(),
        files: journal.files.len(),
        warnings: journal.warning_count(),
        import_failures: journal.failures,
        passes,
        compilations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn journal_with_reports() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw_reports");
        fs::create_dir(&raw).unwrap();
        fs::write(
            raw.join("2020.tsv"),
            "Date\t01/02/2020\nTarget\tCons\tType\tPower\tNotes\nM31\tAnd\tGalaxy\t50x\tFaint core visible\n",
        )
        .unwrap();
        dir
    }

    fn no_compile() -> JournalConfig {
        let mut config = JournalConfig::default();
        config.compiler.enabled = false;
        config
    }

    #[test]
    fn test_generate_writes_every_output() {
        let dir = journal_with_reports();
        let summary = generate(dir.path(), &no_compile()).unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.reports, 1);
        assert_eq!(summary.passes.len(), 4);
        assert!(summary.compilations.is_empty());
        for name in [
            "astrojournal_by_date.tex",
            "astrojournal_by_target.tex",
            "astrojournal_by_constellation.tex",
            "astrojournal_by_date.txt",
        ] {
            assert!(dir.path().join(name).is_file(), "{name}");
        }
    }

    #[test]
    fn test_generate_without_reports() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("raw_reports")).unwrap();
        let result = generate(dir.path(), &no_compile());
        assert!(matches!(result, Err(PipelineError::NoReports(_))));
    }

    #[test]
    fn test_missing_compiler_is_recoverable() {
        let dir = journal_with_reports();
        let mut config = JournalConfig::default();
        config.compiler.command = "astrojournal-no-such-tex".to_string();
        config.outputs = vec![OutputKind::LatexByDate, OutputKind::TextByDate];

        let summary = generate(dir.path(), &config).unwrap();

        assert!(!summary.is_success());
        assert!(summary.passes.iter().all(PassOutcome::is_success));
        assert_eq!(summary.compilations.len(), 1);
        assert!(matches!(
            summary.compilations[0].result,
            Err(CompileError::NotFound { .. })
        ));
        assert!(dir.path().join("astrojournal_by_date.tex").is_file());
    }
}
