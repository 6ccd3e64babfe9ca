//! LaTeX building blocks shared by the LaTeX outputs

use crate::report_model::{ItemField, LayoutColumn, MetaField, ReportHeader, ReportItem, Schema};
use itertools::{EitherOrBoth, Itertools};

/// Characters that must be escaped in LaTeX running text
const SPECIAL_CHARS: [char; 4] = ['&', '%', '#', '_'];

/// Escape LaTeX special characters
///
/// Characters already preceded by a backslash are left alone, so notes
/// escaped by the parser come out unchanged.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) && previous != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// Width of an item table column
fn column_width(field: ItemField) -> &'static str {
    match field {
        ItemField::Target => "0.7in",
        ItemField::Constellation => "0.3in",
        ItemField::Type => "0.6in",
        ItemField::Power => "0.9in",
        ItemField::Notes => "5.8in",
    }
}

fn bold_label(field: MetaField, header: &ReportHeader) -> String {
    format!(
        "{{\\bf {}:}} & {}",
        field.col_name(),
        escape(header.value(field))
    )
}

/// Two-column table of a report's metadata
///
/// Time and place fill the left column; conditions and equipment the right
/// one. Darkness is skipped when the report has no reading.
pub fn metadata_table(header: &ReportHeader, schema: &Schema) -> String {
    let fields = schema.metadata_fields();
    let left = fields
        .iter()
        .filter(|field| field.layout_column() == LayoutColumn::Left);
    let right = fields.iter().filter(|field| {
        field.layout_column() == LayoutColumn::Right
            && !(field.is_optional() && header.value(**field).is_empty())
    });

    let mut out = String::from("% General observation data\n");
    out.push_str("\\begin{tabular}{ p{0.7in} p{1.2in} p{1.1in} p{5.7in}}\n");
    for row in left.zip_longest(right) {
        let (left, right) = match row {
            EitherOrBoth::Both(l, r) => (bold_label(*l, header), bold_label(*r, header)),
            EitherOrBoth::Left(l) => (bold_label(*l, header), "&".to_string()),
            EitherOrBoth::Right(r) => ("&".to_string(), bold_label(*r, header)),
        };
        out.push_str(&format!("{left} & {right} \\\\ \n"));
    }
    out.push_str("\\end{tabular}\n");
    out
}

/// `longtable` of a report's items, one row per target
pub fn items_table(items: &[ReportItem], schema: &Schema) -> String {
    let columns = schema.item_fields();
    let spec = columns
        .iter()
        .map(|field| format!("p{{{}}}", column_width(*field)))
        .join("  ");
    let headers = columns
        .iter()
        .map(|field| format!("{{\\bf {}}}", field.col_name()))
        .join(" & ");

    let mut out = String::from("% Detailed observation data\n");
    out.push_str(&format!("\\begin{{longtable}}{{ {spec} }}\n"));
    out.push_str("\\hline \n");
    out.push_str(&format!("{headers} \\\\ \n"));
    out.push_str("\\hline \n");
    for item in items {
        let row = columns
            .iter()
            .map(|field| escape(item.value(*field)))
            .join(" & ");
        out.push_str(&format!("{row} \\\\ \n"));
    }
    out.push_str("\\hline \n");
    out.push_str("\\end{longtable} \n");
    out
}

/// One `\item` line of a target fragment
///
/// Sentences are built from what the schema carries: when and where,
/// sky conditions, equipment and magnification, then the notes.
pub fn observation_line(header: &ReportHeader, item: &ReportItem, schema: &Schema) -> String {
    let present = |field: MetaField| {
        let value = header.value(field);
        (schema.has_metadata_field(field) && !value.is_empty()).then(|| escape(value))
    };

    let mut when_where = escape(header.date());
    if let Some(time) = present(MetaField::Time) {
        when_where.push(' ');
        when_where.push_str(&time);
    }
    if let Some(location) = present(MetaField::Location) {
        when_where.push_str(", ");
        when_where.push_str(&location);
    }

    let conditions = [MetaField::Seeing, MetaField::Transparency, MetaField::Darkness]
        .into_iter()
        .filter_map(|field| present(field).map(|value| format!("{}: {value}", field.col_name())))
        .join(", ");

    let mut equipment: Vec<String> = present(MetaField::Telescopes).into_iter().collect();
    if !item.power().is_empty() {
        equipment.push(escape(item.power()));
    }

    let sentences = [
        when_where,
        conditions,
        equipment.join(", "),
        escape(item.notes()),
    ];
    let line = sentences
        .iter()
        .filter(|sentence| !sentence.is_empty())
        .join(". ");
    format!("\\item {line}\n")
}
