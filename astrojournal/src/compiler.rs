//! External typesetting compiler
//!
//! LaTeX documents are compiled by an installed tool such as `pdflatex`,
//! run as a black box. Each document is compiled twice so the table of
//! contents and references settle; auxiliary files are removed afterwards.

use crate::journal_config::CompilerConfig;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Number of compiler runs per document
pub const COMPILER_PASSES: usize = 2;

/// Extensions of the temporary files the compiler leaves behind
pub const AUXILIARY_EXTENSIONS: [&str; 4] = ["aux", "toc", "log", "out"];

/// Errors from running the compiler
#[derive(Error, Debug)]
pub enum CompileError {
    /// The executable could not be found
    #[error("Compiler '{command}' not found. Install it or set [compiler] command in journal.toml")]
    NotFound {
        /// Command that was run
        command: String,
    },

    /// The executable exists but could not be started
    #[error("Cannot start compiler '{command}': {source}")]
    Spawn {
        /// Command that was run
        command: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The compiler exited with an error
    #[error("Compiler '{command}' failed on {document} ({status})")]
    Failed {
        /// Command that was run
        command: String,
        /// Document being compiled
        document: String,
        /// Exit status
        status: ExitStatus,
        /// Combined stdout and stderr
        output: String,
    },

    /// The compiler did not finish in time and was killed
    #[error("Compiler '{command}' timed out after {}s on {document}", .timeout.as_secs())]
    Timeout {
        /// Command that was run
        command: String,
        /// Document being compiled
        document: String,
        /// Limit that was exceeded
        timeout: Duration,
    },

    /// The compiler reported success but produced no PDF
    #[error("Compiler produced no output file {}", .0.display())]
    MissingOutput(PathBuf),

    /// Waiting for the compiler failed
    #[error("IO error while running the compiler: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of a successful compilation
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// Generated PDF
    pub pdf: PathBuf,
    /// Output of the last run
    pub output: String,
    /// Auxiliary files removed
    pub cleaned: usize,
}

/// Runs the configured compiler on LaTeX documents
#[derive(Debug, Clone)]
pub struct TypesetCompiler {
    command: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    show_output: bool,
}

impl TypesetCompiler {
    /// Build a compiler runner from configuration
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs)),
            show_output: config.show_output,
        }
    }

    /// Command name
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Compile a document in its directory
    ///
    /// # Parameters
    /// * `working_dir` - Directory containing the document; the compiler runs there
    /// * `document` - Document file name, e.g. `astrojournal_by_date.tex`
    ///
    /// # Returns
    /// * `Ok(CompileReport)` - The PDF exists after both runs
    /// * `Err(CompileError)` - The compiler is missing, failed or timed out
    pub fn compile(&self, working_dir: &Path, document: &str) -> Result<CompileReport, CompileError> {
        let mut output = String::new();
        for pass in 1..=COMPILER_PASSES {
            log::info!("Running {} on {document} (pass {pass})", self.command);
            output = self.run_once(working_dir, document)?;
            if self.show_output {
                println!("{output}");
            }
        }

        let stem = Path::new(document)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| document.to_string());
        let cleaned = clean_auxiliary_files(working_dir, &stem)?;

        let pdf = working_dir.join(format!("{stem}.pdf"));
        if !pdf.is_file() {
            return Err(CompileError::MissingOutput(pdf));
        }
        Ok(CompileReport {
            pdf,
            output,
            cleaned,
        })
    }

    fn run_once(&self, working_dir: &Path, document: &str) -> Result<String, CompileError> {
        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(document)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => CompileError::NotFound {
                    command: self.command.clone(),
                },
                _ => CompileError::Spawn {
                    command: self.command.clone(),
                    source,
                },
            })?;

        let (status, output) = match wait_with_timeout(child, self.timeout)? {
            Some(finished) => finished,
            None => {
                return Err(CompileError::Timeout {
                    command: self.command.clone(),
                    document: document.to_string(),
                    timeout: self.timeout.unwrap_or_default(),
                })
            }
        };

        if status.success() {
            Ok(output)
        } else {
            log::debug!("{} output:\n{output}", self.command);
            Err(CompileError::Failed {
                command: self.command.clone(),
                document: document.to_string(),
                status,
                output,
            })
        }
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut stream) = stream {
            if let Err(e) = stream.read_to_end(&mut buffer) {
                log::debug!("Cannot read compiler output: {e}");
            }
        }
        buffer
    })
}

/// Wait for a child, killing it once the timeout passes
///
/// Output is drained on separate threads so a chatty compiler cannot block
/// on a full pipe.
///
/// # Returns
/// * `Ok(Some((status, output)))` - The child exited
/// * `Ok(None)` - The child was killed after the timeout
fn wait_with_timeout(
    mut child: Child,
    timeout: Option<Duration>,
) -> io::Result<Option<(ExitStatus, String)>> {
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let collect = |stdout: JoinHandle<Vec<u8>>, stderr: JoinHandle<Vec<u8>>| {
        let mut output = String::from_utf8_lossy(&stdout.join().unwrap_or_default()).into_owned();
        output.push_str(&String::from_utf8_lossy(&stderr.join().unwrap_or_default()));
        output
    };

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if timeout.is_some_and(|limit| start.elapsed() > limit) {
            let _ = child.kill();
            child.wait()?;
            log::debug!("Compiler output before timeout:\n{}", collect(stdout, stderr));
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(50));
    };

    Ok(Some((status, collect(stdout, stderr))))
}

/// Remove the compiler's auxiliary files for a document
///
/// # Returns
/// * Number of files removed
pub fn clean_auxiliary_files(working_dir: &Path, stem: &str) -> io::Result<usize> {
    let mut removed = 0;
    for extension in AUXILIARY_EXTENSIONS {
        let path = working_dir.join(format!("{stem}.{extension}"));
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    log::debug!("Removed {removed} auxiliary files for {stem}");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(command: &str, args: &[&str], timeout_secs: u64) -> CompilerConfig {
        CompilerConfig {
            enabled: true,
            command: command.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            timeout_secs,
            show_output: false,
        }
    }

    #[test]
    fn test_missing_compiler_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = TypesetCompiler::from_config(&config("astrojournal-no-such-tex", &[], 5));
        let result = compiler.compile(dir.path(), "journal.tex");
        assert!(matches!(result, Err(CompileError::NotFound { .. })));
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let compiler = TypesetCompiler::from_config(&config("pdflatex", &[], 0));
        assert_eq!(compiler.timeout, None);
        let compiler = TypesetCompiler::from_config(&config("pdflatex", &[], 3));
        assert_eq!(compiler.timeout, Some(Duration::from_secs(3)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_compiler_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = TypesetCompiler::from_config(&config("false", &[], 5));
        let result = compiler.compile(dir.path(), "journal.tex");
        assert!(matches!(result, Err(CompileError::Failed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_without_pdf_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = TypesetCompiler::from_config(&config("true", &[], 5));
        let result = compiler.compile(dir.path(), "journal.tex");
        assert!(matches!(result, Err(CompileError::MissingOutput(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_compiler_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = TypesetCompiler::from_config(&config("sleep", &[], 1));
        let result = compiler.run_once(dir.path(), "5");
        assert!(matches!(result, Err(CompileError::Timeout { .. })));
    }

    #[test]
    fn test_clean_auxiliary_files() {
        let dir = tempfile::tempdir().unwrap();
        for ext in ["aux", "log", "tex", "pdf"] {
            fs::write(dir.path().join(format!("journal.{ext}")), "").unwrap();
        }
        assert_eq!(clean_auxiliary_files(dir.path(), "journal").unwrap(), 2);
        assert!(dir.path().join("journal.tex").exists());
        assert!(dir.path().join("journal.pdf").exists());
        assert!(!dir.path().join("journal.aux").exists());
    }
}
