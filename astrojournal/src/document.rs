//! Combined journal documents
//!
//! A journal is its header template, an ordered list of parts and its footer
//! template. The parts either point at fragment files (LaTeX `\input`) or
//! carry text directly.

use crate::templates::Template;

/// One element of a combined document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPart {
    /// `\section{...}`
    Section(String),
    /// `\subsection{...}`
    Subsection(String),
    /// `\clearpage`
    ClearPage,
    /// `\vspace{...}`
    VerticalSpace(&'static str),
    /// `\input{...}` of a fragment, path without extension
    Input(String),
    /// Text copied as is
    Raw(String),
}

impl DocumentPart {
    fn write(&self, out: &mut String) {
        match self {
            DocumentPart::Section(title) => {
                out.push_str(&format!("\\section{{{title}}}\n"));
            }
            DocumentPart::Subsection(title) => {
                out.push_str(&format!("\\subsection{{{title}}}\n"));
            }
            DocumentPart::ClearPage => out.push_str("\\clearpage\n"),
            DocumentPart::VerticalSpace(amount) => {
                out.push_str(&format!("\\vspace{{{amount}}}\n"));
            }
            DocumentPart::Input(path) => {
                out.push_str(&format!("\\input{{{path}}}\n"));
            }
            DocumentPart::Raw(text) => out.push_str(text),
        }
    }
}

/// Body of a combined document, built part by part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDocument {
    parts: Vec<DocumentPart>,
}

impl JournalDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part
    pub fn push(&mut self, part: DocumentPart) -> &mut Self {
        self.parts.push(part);
        self
    }

    /// Parts in output order
    pub fn parts(&self) -> &[DocumentPart] {
        &self.parts
    }

    /// Number of `\input` parts
    pub fn input_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, DocumentPart::Input(_)))
            .count()
    }

    /// Wrap the body between a header and a footer
    pub fn render(&self, header: &Template, footer: &Template) -> String {
        render(header, footer, &self.parts)
    }
}

/// Concatenate header, parts and footer
///
/// # Parameters
/// * `header` - Template placed first, verbatim
/// * `footer` - Template placed last, verbatim
/// * `parts` - Body, in order
pub fn render(header: &Template, footer: &Template, parts: &[DocumentPart]) -> String {
    let mut out = String::from(header.text());
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    for part in parts {
        part.write(&mut out);
    }
    out.push_str(footer.text());
    out
}
