//! LaTeX list of targets by constellation

use super::{
    input_path, latex, prepare_folder, write_document, ExportContext, ExportError, ExportReport,
};
use crate::document::{DocumentPart, JournalDocument};
use crate::grouping::{group_by_constellation, ConstellationGroup};
use crate::journal_config::OutputKind;
use crate::report_model::Report;

/// Fragment of one constellation: `target (type)` entries separated by commas
pub fn render_fragment(group: &ConstellationGroup) -> String {
    let entries: Vec<String> = group
        .targets
        .iter()
        .map(|(target, item_type)| {
            if item_type.is_empty() {
                latex::escape(target)
            } else {
                format!("{} ({})", latex::escape(target), latex::escape(item_type))
            }
        })
        .collect();
    format!("{}\n", entries.join(", "))
}

/// Write one fragment per constellation and the combined document
pub fn export(reports: &[Report], ctx: &ExportContext<'_>) -> Result<ExportReport, ExportError> {
    let output = ctx.output(OutputKind::LatexByConstellation);
    let folder = ctx.root.join(&output.folder);
    prepare_folder(&folder, "tex")?;

    let mut result = ExportReport::new(output.kind, ctx.root.join(&output.document));
    let mut doc = JournalDocument::new();

    for group in group_by_constellation(reports) {
        let stem = group.fragment();
        result.write_fragment(folder.join(format!("{stem}.tex")), &render_fragment(&group));
        log::debug!(
            "Exported constellation {} ({} targets)",
            group.constellation,
            group.targets.len()
        );
        doc.push(DocumentPart::Section(latex::escape(&group.constellation)))
            .push(DocumentPart::Input(input_path(&output.folder, &stem)));
    }
    log::info!("Exported {} constellations", result.fragments);

    let (header, footer) = ctx.templates(&output);
    write_document(&result.document, &doc.render(&header, &footer))?;
    Ok(result)
}
