//! Structured warnings and notices for the Liberty-to-SDF pipeline.
//!
//! Fatal errors in sdforge are typed `Result` errors that abort the current
//! file's conversion. Everything non-fatal — ambiguous table reductions,
//! out-of-order min/typ/max triples, skipped attributes — travels through
//! this crate instead: a [`Diagnostic`] with a stable [`DiagnosticCode`] is
//! emitted into a [`DiagnosticSink`] and handed back alongside the successful
//! result, so the caller decides whether to display it. Diagnostics never
//! alter emitted values.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod render;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use render::{DiagnosticRenderer, JsonRenderer, TextRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
