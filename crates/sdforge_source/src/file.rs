//! Loaded source files with line-start indexing, and the file database.

use crate::span::{FileId, Span};
use std::io;
use std::path::{Path, PathBuf};

/// A source file loaded into the conversion session.
///
/// Stores the file's content along with precomputed line-start offsets so
/// diagnostic rendering can resolve byte offsets to line/column coordinates
/// without rescanning the text.
pub struct SourceFile {
    /// The unique identifier for this file within the [`SourceDb`].
    pub id: FileId,
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the text covered by the given span.
    pub fn snippet(&self, span: Span) -> &str {
        &self.content[span.start as usize..span.end as usize]
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

/// The database of source files for one conversion session.
///
/// Files are assigned sequential [`FileId`]s as they are loaded. The database
/// is append-only; a loaded file's content never changes.
#[derive(Default)]
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a file from disk and registers it, returning its [`FileId`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> io::Result<FileId> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Ok(self.add(path.to_path_buf(), content))
    }

    /// Registers in-memory content under a synthetic path, returning its [`FileId`].
    pub fn add(&mut self, path: PathBuf, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path, content));
        id
    }

    /// Returns the file with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not issued by this database.
    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Resolves a span to `path:line:col` for user-facing messages.
    ///
    /// Dummy spans resolve to `<unknown>`.
    pub fn describe(&self, span: Span) -> String {
        if span.is_dummy() {
            return "<unknown>".to_string();
        }
        let file = self.get(span.file);
        let (line, col) = file.line_col(span.start);
        format!("{}:{}:{}", file.path.display(), line, col)
    }
}
