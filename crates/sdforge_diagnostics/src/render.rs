//! Rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use sdforge_source::SourceDb;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[T001]: lookup table has 7x7 entries, using first entry
///   --> cells.lib:42:9
///    |
/// 42 |         cell_rise (delay_template_7x7) {
///    |         ^^^^^^^^^
///    = note: pass an explicit operating point to select a different entry
/// ```
pub struct TextRenderer;

impl DiagnosticRenderer for TextRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}[{}]: {}\n",
            diag.severity, diag.code, diag.message
        ));

        if !diag.primary_span.is_dummy() {
            out.push_str(&format!("  --> {}\n", source_db.describe(diag.primary_span)));

            let file = source_db.get(diag.primary_span.file);
            let (line, col) = file.line_col(diag.primary_span.start);
            let line_num = format!("{line}");
            let padding = " ".repeat(line_num.len());
            let line_content = source_line(&file.content, diag.primary_span.start);

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));

            let span_len = (diag.primary_span.end - diag.primary_span.start).max(1) as usize;
            let carets = "^".repeat(span_len);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            out.push_str(&format!("{padding} | {col_padding}{carets}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }
}

/// Renders each diagnostic as a single JSON object (one line).
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let location = if diag.primary_span.is_dummy() {
            None
        } else {
            Some(source_db.describe(diag.primary_span))
        };
        let value = serde_json::json!({
            "severity": format!("{}", diag.severity),
            "code": format!("{}", diag.code),
            "message": diag.message,
            "location": location,
            "notes": diag.notes,
        });
        value.to_string()
    }
}

/// Extracts the line of source code containing the given byte offset.
fn source_line(content: &str, byte_offset: u32) -> &str {
    let offset = byte_offset as usize;
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use sdforge_source::Span;
    use std::path::PathBuf;

    fn db_with(content: &str) -> (SourceDb, sdforge_source::FileId) {
        let mut db = SourceDb::new();
        let id = db.add(PathBuf::from("cells.lib"), content.to_string());
        (db, id)
    }

    #[test]
    fn text_render_with_span() {
        let (db, id) = db_with("library(test) {\n  cell_rise (tpl) {\n}\n");
        let diag = Diagnostic::warning(
            DiagnosticCode::AMBIGUOUS_TABLE_REDUCTION,
            "lookup table has 7x7 entries, using first entry",
            Span::new(id, 18, 27),
        )
        .with_note("pass an explicit operating point to select a different entry");
        let out = TextRenderer.render(&diag, &db);
        assert!(out.contains("warning[T001]"));
        assert!(out.contains("cells.lib:2:3"));
        assert!(out.contains("cell_rise (tpl) {"));
        assert!(out.contains("^^^^^^^^^"));
        assert!(out.contains("note: pass an explicit operating point"));
    }

    #[test]
    fn text_render_dummy_span() {
        let (db, _) = db_with("");
        let diag = Diagnostic::warning(
            DiagnosticCode::UNUSED_ATTRIBUTE,
            "skipped attribute",
            Span::DUMMY,
        );
        let out = TextRenderer.render(&diag, &db);
        assert!(out.starts_with("warning[T003]: skipped attribute"));
        assert!(!out.contains("-->"));
    }

    #[test]
    fn json_render_is_parseable() {
        let (db, id) = db_with("pin(A)\n");
        let diag = Diagnostic::warning(
            DiagnosticCode::MIN_TYP_MAX_OUT_OF_ORDER,
            "min exceeds max",
            Span::new(id, 0, 3),
        );
        let out = JsonRenderer.render(&diag, &db);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["code"], "T002");
        assert_eq!(value["location"], "cells.lib:1:1");
    }
}
