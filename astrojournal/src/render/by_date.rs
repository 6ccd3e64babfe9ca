//! LaTeX journal by date

use super::{
    input_path, latex, prepare_folder, statistics, write_document, ExportContext, ExportError,
    ExportReport,
};
use crate::document::{DocumentPart, JournalDocument};
use crate::grouping::{group_by_date, DatedReport};
use crate::journal_config::OutputKind;
use crate::report_model::{Report, Schema};

/// Fragment of one report: metadata table then items table
pub fn render_fragment(dated: &DatedReport<'_>, schema: &Schema) -> String {
    let mut out = latex::metadata_table(&dated.report.header, schema);
    out.push_str(&latex::items_table(&dated.report.items, schema));
    out
}

/// Write one fragment per report and the combined journal
///
/// Newest reports come first, grouped under one subsection per year.
pub fn export(reports: &[Report], ctx: &ExportContext<'_>) -> Result<ExportReport, ExportError> {
    let output = ctx.output(OutputKind::LatexByDate);
    let folder = ctx.root.join(&output.folder);
    prepare_folder(&folder, "tex")?;

    let schema = ctx.schema();
    let mut result = ExportReport::new(output.kind, ctx.root.join(&output.document));
    let mut doc = JournalDocument::new();

    if let Some(stats) = ctx.statistics {
        let stem = statistics::FRAGMENT_STEM;
        result.write_fragment(
            folder.join(format!("{stem}.tex")),
            &statistics::render_statistics(stats),
        );
        doc.push(DocumentPart::Section("Statistics".to_string()))
            .push(DocumentPart::Input(input_path(&output.folder, stem)))
            .push(DocumentPart::ClearPage);
    }

    doc.push(DocumentPart::Section("Observation reports".to_string()))
        .push(DocumentPart::VerticalSpace("4 mm"))
        .push(DocumentPart::Raw("\\hspace{4 mm}\n".to_string()));

    let mut current_year = None;
    for dated in group_by_date(reports) {
        result.write_fragment(
            folder.join(format!("{}.tex", dated.fragment)),
            &render_fragment(&dated, schema),
        );
        log::info!(
            "Exported report {} ({} targets)",
            dated.date,
            dated.report.items.len()
        );

        let year = dated.date.year();
        if current_year != Some(year) {
            current_year = Some(year);
            doc.push(DocumentPart::Subsection(year.to_string()));
        }
        doc.push(DocumentPart::Input(input_path(&output.folder, &dated.fragment)))
            .push(DocumentPart::ClearPage);
    }

    let (header, footer) = ctx.templates(&output);
    write_document(&result.document, &doc.render(&header, &footer))?;
    Ok(result)
}
