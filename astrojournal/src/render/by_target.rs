//! LaTeX journal by target
//!
//! One fragment per target with every observation of it, newest sessions
//! last. The combined document lists the fragment folder and orders the
//! fragments by catalogue, one section per catalogue family.

use super::{
    input_path, latex, list_files, prepare_folder, statistics, write_document, ExportContext,
    ExportError, ExportReport,
};
use crate::catalogue;
use crate::document::{DocumentPart, JournalDocument};
use crate::grouping::{group_by_target, GroupedTarget};
use crate::journal_config::OutputKind;
use crate::report_model::{Report, Schema};
use std::path::Path;

/// Fragment of one target: title and one line per observation
pub fn render_fragment(target: &GroupedTarget<'_>, schema: &Schema) -> String {
    let title = target
        .title_parts()
        .into_iter()
        .map(latex::escape)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = format!("\\subsection{{{title}}}\n");
    out.push_str("\\begin{itemize}\n");
    for mention in &target.mentions {
        out.push_str(&latex::observation_line(mention.header, mention.item, schema));
    }
    out.push_str("\\end{itemize}\n");
    out
}

/// Write one fragment per target and the combined journal
pub fn export(reports: &[Report], ctx: &ExportContext<'_>) -> Result<ExportReport, ExportError> {
    let output = ctx.output(OutputKind::LatexByTarget);
    let folder = ctx.root.join(&output.folder);
    prepare_folder(&folder, "tex")?;

    let schema = ctx.schema();
    let mut result = ExportReport::new(output.kind, ctx.root.join(&output.document));

    for target in group_by_target(reports) {
        result.write_fragment(
            folder.join(format!("{}.tex", target.key)),
            &render_fragment(&target, schema),
        );
        log::debug!(
            "Exported target {} ({} observations)",
            target.key,
            target.mentions.len()
        );
    }
    log::info!("Exported {} targets", result.fragments);

    let mut doc = JournalDocument::new();
    if let Some(stats) = ctx.statistics {
        doc.push(DocumentPart::Section("Basic Statistics".to_string()))
            .push(DocumentPart::Raw(statistics::render_type_statistics(stats)))
            .push(DocumentPart::ClearPage);
    }
    append_fragments(&mut doc, &folder, &output.folder)?;

    let (header, footer) = ctx.templates(&output);
    write_document(&result.document, &doc.render(&header, &footer))?;
    Ok(result)
}

/// Include every fragment of the folder in catalogue order
fn append_fragments(
    doc: &mut JournalDocument,
    folder: &Path,
    relative_folder: &str,
) -> Result<(), ExportError> {
    let files = list_files(folder, "tex").map_err(|source| ExportError::Folder {
        path: folder.to_path_buf(),
        source,
    })?;
    let mut stems: Vec<String> = files
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect();
    catalogue::sort_keys(&mut stems);

    let mut current_family = None;
    for stem in stems {
        let family = catalogue::classify(&stem);
        if current_family != Some(family) {
            current_family = Some(family);
            doc.push(DocumentPart::ClearPage)
                .push(DocumentPart::Section(family.title().to_string()));
        }
        doc.push(DocumentPart::Input(input_path(relative_folder, &stem)))
            .push(DocumentPart::VerticalSpace("4 mm"));
    }
    Ok(())
}
