//! Embedded template definitions
//!
//! Default LaTeX headers and footers and the sample raw reports are compiled
//! into the binary. Journals normally carry their own copies in the
//! header/footer folder; the embedded ones are the fallback and the source
//! for `init`.

use crate::journal_config::{JournalConfig, OutputKind, ResolvedOutput, CONFIG_FILE_NAME};
use crate::profiles::Profile;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A template file shipped with the binary
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedTemplate {
    /// Default file name in the header/footer folder
    pub filename: &'static str,
    /// Output the template belongs to
    pub output: OutputKind,
    /// File content
    pub content: &'static str,
}

const FOOTER: &str = include_str!("templates/footer.tex");

/// Get all embedded header and footer templates
///
/// # Returns
/// * `Vec<EmbeddedTemplate>` - One header and one footer per LaTeX output
pub fn get_all_templates() -> Vec<EmbeddedTemplate> {
    vec![
        EmbeddedTemplate {
            filename: "header_by_date.tex",
            output: OutputKind::LatexByDate,
            content: include_str!("templates/header_by_date.tex"),
        },
        EmbeddedTemplate {
            filename: "footer_by_date.tex",
            output: OutputKind::LatexByDate,
            content: FOOTER,
        },
        EmbeddedTemplate {
            filename: "header_by_target.tex",
            output: OutputKind::LatexByTarget,
            content: include_str!("templates/header_by_target.tex"),
        },
        EmbeddedTemplate {
            filename: "footer_by_target.tex",
            output: OutputKind::LatexByTarget,
            content: FOOTER,
        },
        EmbeddedTemplate {
            filename: "header_by_constellation.tex",
            output: OutputKind::LatexByConstellation,
            content: include_str!("templates/header_by_constellation.tex"),
        },
        EmbeddedTemplate {
            filename: "footer_by_constellation.tex",
            output: OutputKind::LatexByConstellation,
            content: FOOTER,
        },
    ]
}

/// Get an embedded template by file name
pub fn get_template(filename: &str) -> Option<EmbeddedTemplate> {
    get_all_templates()
        .into_iter()
        .find(|template| template.filename == filename)
}

/// Embedded header for an output
pub fn default_header(output: OutputKind) -> &'static str {
    get_all_templates()
        .into_iter()
        .find(|template| template.output == output && template.filename.starts_with("header"))
        .map_or("", |template| template.content)
}

/// Embedded footer for an output
pub fn default_footer(output: OutputKind) -> &'static str {
    if output.is_latex() {
        FOOTER
    } else {
        ""
    }
}

/// Sample raw report for a profile
pub fn sample_report(profile: Profile) -> &'static str {
    match profile {
        Profile::Minimal => include_str!("templates/sample_minimal.tsv"),
        Profile::Basic => include_str!("templates/sample_basic.tsv"),
        Profile::Extended => include_str!("templates/sample_extended.tsv"),
    }
}

/// Header or footer text wrapped around a generated document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    text: String,
}

impl Template {
    /// Template from literal text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a template file verbatim
    ///
    /// Every line is kept as written and terminated with a newline.
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut text = String::with_capacity(content.len() + 1);
        for line in content.lines() {
            text.push_str(line);
            text.push('\n');
        }
        Ok(Self { text })
    }

    /// Read a template from the journal, falling back to the embedded one
    ///
    /// # Parameters
    /// * `folder` - Header/footer folder of the journal
    /// * `filename` - Template file name, if the output uses one
    /// * `fallback` - Embedded content used when the file cannot be read
    pub fn load_or_default(folder: &Path, filename: Option<&str>, fallback: &str) -> Self {
        let Some(filename) = filename else {
            return Self::from_text(fallback);
        };
        let path = folder.join(filename);
        match Self::load(&path) {
            Ok(template) => template,
            Err(e) => {
                log::warn!(
                    "Cannot read template {}: {e}. Using the built-in default",
                    path.display()
                );
                Self::from_text(fallback)
            }
        }
    }

    /// Header template of an output
    pub fn header_for(folder: &Path, output: &ResolvedOutput) -> Self {
        Self::load_or_default(folder, output.header.as_deref(), default_header(output.kind))
    }

    /// Footer template of an output
    pub fn footer_for(folder: &Path, output: &ResolvedOutput) -> Self {
        Self::load_or_default(folder, output.footer.as_deref(), default_footer(output.kind))
    }

    /// Template text
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Lay out a new journal directory
///
/// Writes `journal.toml`, the header and footer templates named by the
/// configuration and a sample raw report for its profile. Existing files
/// are overwritten.
///
/// # Returns
/// * The files written, in order
pub fn write_journal_skeleton(root: &Path, config: &JournalConfig) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    fs::create_dir_all(root)?;

    let config_path = root.join(CONFIG_FILE_NAME);
    config
        .save(&config_path)
        .map_err(|e| io::Error::other(e.to_string()))?;
    written.push(config_path);

    let template_folder = config.header_footer_path(root);
    fs::create_dir_all(&template_folder)?;
    for kind in OutputKind::ALL.into_iter().filter(|kind| kind.is_latex()) {
        let output = config.output(kind);
        let files = [
            (output.header.as_deref(), default_header(kind)),
            (output.footer.as_deref(), default_footer(kind)),
        ];
        for (filename, content) in files {
            if let Some(filename) = filename {
                let path = template_folder.join(filename);
                fs::write(&path, content)?;
                written.push(path);
            }
        }
    }

    let raw_folder = config.raw_reports_path(root);
    fs::create_dir_all(&raw_folder)?;
    let sample = raw_folder.join("sample_reports.tsv");
    fs::write(&sample, sample_report(config.profile))?;
    written.push(sample);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report_model::parse_reports;
    use crate::profiles::get_all_profiles;

    #[test]
    fn test_all_templates_load() {
        let templates = get_all_templates();
        assert_eq!(templates.len(), 6);
        for template in &templates {
            assert!(!template.content.is_empty(), "{}", template.filename);
        }
    }

    #[test]
    fn test_get_template_by_filename() {
        assert!(get_template("header_by_date.tex").is_some());
        assert!(get_template("footer_by_constellation.tex").is_some());
        assert!(get_template("header_by_date.txt").is_none());
    }

    #[test]
    fn test_default_header_and_footer() {
        assert!(default_header(OutputKind::LatexByTarget).contains("\\begin{document}"));
        assert!(default_footer(OutputKind::LatexByDate).contains("\\end{document}"));
        assert_eq!(default_header(OutputKind::TextByDate), "");
        assert_eq!(default_footer(OutputKind::TextByDate), "");
    }

    #[test]
    fn test_sample_reports_parse_cleanly() {
        for profile in get_all_profiles() {
            let parsed = parse_reports(sample_report(profile), profile.schema());
            assert!(parsed.warnings.is_empty(), "{profile}: {:?}", parsed.warnings);
            assert_eq!(parsed.reports.len(), 2, "{profile}");
        }
    }

    #[test]
    fn test_template_load_keeps_lines_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header.tex");
        fs::write(&path, "\\documentclass{article}\r\n  % indented\n\\begin{document}").unwrap();

        let template = Template::load(&path).unwrap();
        assert_eq!(
            template.text(),
            "\\documentclass{article}\n  % indented\n\\begin{document}\n"
        );
    }

    #[test]
    fn test_missing_template_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let template = Template::load_or_default(dir.path(), Some("missing.tex"), "fallback\n");
        assert_eq!(template.text(), "fallback\n");
    }

    #[test]
    fn test_write_journal_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let config = JournalConfig::default();
        let written = write_journal_skeleton(dir.path(), &config).unwrap();

        assert_eq!(written.len(), 8);
        assert!(dir.path().join("journal.toml").is_file());
        assert!(dir.path().join("latex_header_footer/header_by_target.tex").is_file());
        assert!(dir.path().join("raw_reports/sample_reports.tsv").is_file());
        assert_eq!(JournalConfig::load_from_dir(dir.path()).unwrap(), config);
    }
}
