//! Source file management and span tracking for Liberty inputs.
//!
//! This crate provides the [`SourceDb`] for loading Liberty files, [`FileId`]
//! and [`Span`] types for tracking source locations, and line/column
//! resolution for rendering diagnostics against the original text.

#![warn(missing_docs)]

pub mod file;
pub mod span;

pub use file::{SourceDb, SourceFile};
pub use span::{FileId, Span};
