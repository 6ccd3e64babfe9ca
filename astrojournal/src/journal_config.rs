//! Journal configuration from journal.toml
//!
//! Every field has a default, so an empty or missing `journal.toml` yields
//! the standard journal layout. The value is built once at startup and
//! passed by reference to the pipeline.

use crate::profiles::Profile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside a journal directory
pub const CONFIG_FILE_NAME: &str = "journal.toml";

/// Documents the pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    /// LaTeX journal, one section per observation session
    LatexByDate,
    /// LaTeX journal, one section per target
    LatexByTarget,
    /// LaTeX list of targets per constellation
    LatexByConstellation,
    /// Plain-text summary for forum posts
    TextByDate,
}

impl OutputKind {
    /// Every output, in generation order
    pub const ALL: [OutputKind; 4] = [
        OutputKind::LatexByDate,
        OutputKind::LatexByTarget,
        OutputKind::LatexByConstellation,
        OutputKind::TextByDate,
    ];

    /// Name used in configuration and messages
    pub fn name(self) -> &'static str {
        match self {
            OutputKind::LatexByDate => "latex-by-date",
            OutputKind::LatexByTarget => "latex-by-target",
            OutputKind::LatexByConstellation => "latex-by-constellation",
            OutputKind::TextByDate => "text-by-date",
        }
    }

    /// Whether the document is LaTeX and gets compiled
    pub fn is_latex(self) -> bool {
        !matches!(self, OutputKind::TextByDate)
    }

    /// Extension of the document and its fragments
    pub fn extension(self) -> &'static str {
        if self.is_latex() {
            "tex"
        } else {
            "txt"
        }
    }

    fn default_folder(self) -> &'static str {
        match self {
            OutputKind::LatexByDate => "latex_reports_by_date",
            OutputKind::LatexByTarget => "latex_reports_by_target",
            OutputKind::LatexByConstellation => "latex_reports_by_constellation",
            OutputKind::TextByDate => "txt_reports_by_date",
        }
    }

    fn default_document(self) -> &'static str {
        match self {
            OutputKind::LatexByDate => "astrojournal_by_date.tex",
            OutputKind::LatexByTarget => "astrojournal_by_target.tex",
            OutputKind::LatexByConstellation => "astrojournal_by_constellation.tex",
            OutputKind::TextByDate => "astrojournal_by_date.txt",
        }
    }

    fn default_templates(self) -> Option<(&'static str, &'static str)> {
        match self {
            OutputKind::LatexByDate => Some(("header_by_date.tex", "footer_by_date.tex")),
            OutputKind::LatexByTarget => Some(("header_by_target.tex", "footer_by_target.tex")),
            OutputKind::LatexByConstellation => Some((
                "header_by_constellation.tex",
                "footer_by_constellation.tex",
            )),
            OutputKind::TextByDate => None,
        }
    }
}

/// Per-output overrides; unset fields take the output's default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Fragment folder, relative to the journal directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Combined document file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    /// Header template file name inside the header/footer folder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Footer template file name inside the header/footer folder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

/// Output settings with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    /// Which output this is
    pub kind: OutputKind,
    /// Fragment folder, relative to the journal directory
    pub folder: String,
    /// Combined document file name
    pub document: String,
    /// Header template file name, if the output has one
    pub header: Option<String>,
    /// Footer template file name, if the output has one
    pub footer: Option<String>,
}

/// External typesetting compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Run the compiler after generating LaTeX documents
    pub enabled: bool,

    /// Executable name or path
    pub command: String,

    /// Arguments placed before the document name
    pub args: Vec<String>,

    /// Limit for a single compiler run; 0 waits forever
    pub timeout_secs: u64,

    /// Echo the compiler's output
    pub show_output: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "pdflatex".to_string(),
            args: vec!["-halt-on-error".to_string()],
            timeout_secs: 120,
            show_output: false,
        }
    }
}

/// Main journal configuration from journal.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Columns expected in raw reports
    pub profile: Profile,

    /// Folder holding the raw `.tsv`/`.csv` reports
    pub raw_reports_folder: String,

    /// Folder holding the LaTeX header and footer templates
    pub header_footer_folder: String,

    /// Add a statistics section to the by-date and by-target journals
    pub statistics: bool,

    /// Outputs to generate
    pub outputs: Vec<OutputKind>,

    /// Journal by date
    pub by_date: OutputConfig,

    /// Journal by target
    pub by_target: OutputConfig,

    /// Journal by constellation
    pub by_constellation: OutputConfig,

    /// Plain-text journal by date
    pub text_by_date: OutputConfig,

    /// Typesetting compiler
    pub compiler: CompilerConfig,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            raw_reports_folder: "raw_reports".to_string(),
            header_footer_folder: "latex_header_footer".to_string(),
            statistics: true,
            outputs: OutputKind::ALL.to_vec(),
            by_date: OutputConfig::default(),
            by_target: OutputConfig::default(),
            by_constellation: OutputConfig::default(),
            text_by_date: OutputConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

impl JournalConfig {
    /// Load configuration from a journal.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the journal.toml configuration file
    ///
    /// # Returns
    /// * `Ok(JournalConfig)` - Successfully loaded configuration
    /// * `Err(JournalConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, JournalConfigError> {
        let content = fs::read_to_string(&path).map_err(JournalConfigError::IoError)?;

        let config: JournalConfig =
            toml::from_str(&content).map_err(JournalConfigError::ParseError)?;

        Ok(config)
    }

    /// Load `journal.toml` from a journal directory, or defaults if absent
    pub fn load_from_dir<P: AsRef<Path>>(root: P) -> Result<Self, JournalConfigError> {
        let path = root.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::info!("Loading configuration from {}", path.display());
            Self::load(path)
        } else {
            log::info!("No {CONFIG_FILE_NAME} found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a journal.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the journal.toml file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(JournalConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), JournalConfigError> {
        let content = toml::to_string_pretty(self).map_err(JournalConfigError::SerializeError)?;

        fs::write(&path, content).map_err(JournalConfigError::IoError)?;

        Ok(())
    }

    /// Settings of one output with defaults filled in
    pub fn output(&self, kind: OutputKind) -> ResolvedOutput {
        let overrides = match kind {
            OutputKind::LatexByDate => &self.by_date,
            OutputKind::LatexByTarget => &self.by_target,
            OutputKind::LatexByConstellation => &self.by_constellation,
            OutputKind::TextByDate => &self.text_by_date,
        };
        let templates = kind.default_templates();
        ResolvedOutput {
            kind,
            folder: overrides
                .folder
                .clone()
                .unwrap_or_else(|| kind.default_folder().to_string()),
            document: overrides
                .document
                .clone()
                .unwrap_or_else(|| kind.default_document().to_string()),
            header: overrides
                .header
                .clone()
                .or_else(|| templates.map(|(header, _)| header.to_string())),
            footer: overrides
                .footer
                .clone()
                .or_else(|| templates.map(|(_, footer)| footer.to_string())),
        }
    }

    /// Whether an output is enabled
    pub fn is_enabled(&self, kind: OutputKind) -> bool {
        self.outputs.contains(&kind)
    }

    /// Raw reports folder inside a journal directory
    pub fn raw_reports_path(&self, root: &Path) -> PathBuf {
        root.join(&self.raw_reports_folder)
    }

    /// Header/footer folder inside a journal directory
    pub fn header_footer_path(&self, root: &Path) -> PathBuf {
        root.join(&self.header_footer_folder)
    }
}

/// Errors that can occur when loading or saving journal configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum JournalConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for JournalConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalConfigError::IoError(e) => write!(f, "IO error: {}", e),
            JournalConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            JournalConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for JournalConfigError {}
