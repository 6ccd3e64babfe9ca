//! Plain-text journal by date, in a forum-friendly layout
//!
//! Each report becomes `Name: value` lines followed by one block per
//! target. The combined document is the fragments concatenated newest
//! first.

use super::{prepare_folder, write_document, ExportContext, ExportError, ExportReport};
use crate::grouping::{group_by_date, DatedReport};
use crate::journal_config::OutputKind;
use crate::report_model::{ItemField, Report, Schema};
use std::fs;

/// Separator between reports in the combined document
const REPORT_SEPARATOR: &str = "\n\n\n\n";

/// Undo the LaTeX escaping the parser applied to notes
fn unescape(text: &str) -> String {
    text.replace("\\%", "%")
}

/// Fragment of one report
pub fn render_fragment(dated: &DatedReport<'_>, schema: &Schema) -> String {
    let header = &dated.report.header;
    let mut out = String::new();
    for field in schema.metadata_fields() {
        let value = header.value(*field);
        if field.is_optional() && value.is_empty() {
            continue;
        }
        out.push_str(&format!("{}: {value}\n", field.col_name()));
    }
    out.push('\n');

    for item in &dated.report.items {
        let summary: Vec<&str> = schema
            .item_fields()
            .iter()
            .filter(|field| **field != ItemField::Notes)
            .map(|field| item.value(*field))
            .filter(|value| !value.is_empty())
            .collect();
        out.push_str(&summary.join(" "));
        out.push('\n');
        if schema.has_item_field(ItemField::Notes) {
            out.push_str(&unescape(item.notes()));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Write one fragment per report and the concatenated document
pub fn export(reports: &[Report], ctx: &ExportContext<'_>) -> Result<ExportReport, ExportError> {
    let output = ctx.output(OutputKind::TextByDate);
    let folder = ctx.root.join(&output.folder);
    prepare_folder(&folder, "txt")?;

    let schema = ctx.schema();
    let mut result = ExportReport::new(output.kind, ctx.root.join(&output.document));
    let mut written = Vec::new();

    for dated in group_by_date(reports) {
        let path = folder.join(format!("{}.txt", dated.fragment));
        result.write_fragment(path.clone(), &render_fragment(&dated, schema));
        written.push(path);
    }
    log::info!("Exported {} text reports", result.fragments);

    let (header, footer) = ctx.templates(&output);
    let mut content = String::from(header.text());
    for path in written {
        match fs::read_to_string(&path) {
            Ok(fragment) => {
                content.push_str(&fragment);
                content.push_str(REPORT_SEPARATOR);
            }
            Err(e) => log::debug!("Skipping fragment {}: {e}", path.display()),
        }
    }
    content.push_str(footer.text());

    write_document(&result.document, &content)?;
    Ok(result)
}
