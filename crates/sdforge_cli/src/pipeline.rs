//! Shared pipeline steps for CLI commands.
//!
//! Both `convert` and `check` run the same front half: load the input into
//! the source database, parse it into the generic tree, and build the typed
//! library. `convert` adds emission and an atomic write. Errors from any
//! stage carry a span where one exists, so commands can render them against
//! the source.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sdforge_diagnostics::{DiagnosticRenderer, DiagnosticSink, JsonRenderer, TextRenderer};
use sdforge_liberty::{parse_source, LibertyError};
use sdforge_model::{build, BuildConfig, Library, ModelError};
use sdforge_source::{SourceDb, Span};

use crate::{GlobalArgs, ReportFormat};

/// A fatal error from any stage of the conversion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The input path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The input is not well-formed Liberty.
    #[error(transparent)]
    Liberty(#[from] LibertyError),

    /// The tree could not be turned into a valid timing model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The output file could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl PipelineError {
    /// The source span this error points at, when one exists.
    pub fn span(&self) -> Option<Span> {
        match self {
            PipelineError::Liberty(LibertyError::Lex(e)) => Some(e.span),
            PipelineError::Liberty(LibertyError::Parse(e)) => Some(e.span),
            PipelineError::Model(e) if !e.span().is_dummy() => Some(e.span()),
            _ => None,
        }
    }
}

/// Loads, parses, and builds a Liberty library from `path`.
///
/// The file is registered in `db` so callers can resolve spans afterwards,
/// including the spans of errors and warnings.
pub fn load_library(
    db: &mut SourceDb,
    path: &Path,
    config: &BuildConfig,
    sink: &DiagnosticSink,
) -> Result<Library, PipelineError> {
    let file = db.load(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = parse_source(&db.get(file).content, file)?;
    Ok(build(&tree, config, sink)?)
}

/// Writes `contents` to `path` atomically.
///
/// The text goes to a temporary file in the destination directory which is
/// renamed over `path` only after a complete write, so a failure partway
/// through never leaves a truncated output file behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PipelineError> {
    let map_err = |source: io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
        .map_err(map_err)?;
    tmp.write_all(contents.as_bytes()).map_err(map_err)?;
    tmp.persist(path).map_err(|e| map_err(e.error))?;
    Ok(())
}

/// Renders and prints every accumulated diagnostic to stderr.
pub fn report_diagnostics(sink: &DiagnosticSink, db: &SourceDb, global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    let renderer: Box<dyn DiagnosticRenderer> = match global.format {
        ReportFormat::Text => Box::new(TextRenderer),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    for diag in sink.take_all() {
        eprintln!("{}", renderer.render(&diag, db));
    }
}

/// Formats a fatal pipeline error with its source location, when known.
pub fn describe_error(err: &PipelineError, db: &SourceDb) -> String {
    match err.span() {
        Some(span) => format!("{}: {err}", db.describe(span)),
        None => format!("{err}"),
    }
}
