//! Fatal errors raised while building the typed model.

use crate::units::UnitError;
use sdforge_source::Span;

/// A fatal model-building error. Any of these aborts the current file's
/// conversion; no partial model is ever handed to the emitter.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The tree's root group is not a `library`.
    #[error("expected a 'library' group at top level, found '{found}'")]
    UnexpectedRoot {
        /// The root group kind actually found.
        found: String,
        /// The root group's span.
        span: Span,
    },

    /// `time_unit` or `capacitive_load_unit` is missing. There is no unit
    /// defaulting; silent unit assumption is not an option.
    #[error("library declares no {attr}; units are required")]
    MissingUnits {
        /// Which unit attribute is missing.
        attr: &'static str,
        /// The library group's span.
        span: Span,
    },

    /// A group is missing a required attribute or name.
    #[error("'{group}' group is missing required '{attr}'")]
    MissingAttribute {
        /// The group kind.
        group: String,
        /// The missing attribute.
        attr: &'static str,
        /// The group's span.
        span: Span,
    },

    /// An attribute has a value outside its allowed set.
    #[error("invalid value '{value}' for '{attr}'")]
    InvalidAttribute {
        /// The attribute name.
        attr: &'static str,
        /// The offending value.
        value: String,
        /// The attribute's span.
        span: Span,
    },

    /// An arc or check references a pin that does not exist in its cell.
    #[error("pin '{pin}' of cell '{cell}' references unknown pin '{related}'")]
    DanglingReference {
        /// The cell containing the reference.
        cell: String,
        /// The pin owning the arc or check.
        pin: String,
        /// The nonexistent referenced pin.
        related: String,
        /// The referencing group's span.
        span: Span,
    },

    /// A pin re-declares its direction with a different value.
    #[error("pin '{pin}' of cell '{cell}' re-declares a conflicting direction")]
    ConflictingDirection {
        /// The cell containing the pin.
        cell: String,
        /// The offending pin.
        pin: String,
        /// The re-declaration's span.
        span: Span,
    },

    /// A timing group characterizes an unsupported number of corners.
    /// One table is a scalar, three are a min/typ/max triple.
    #[error("'{table}' appears {found} times in a timing group of pin '{pin}'; expected 1 or 3")]
    CornerCount {
        /// The pin owning the timing group.
        pin: String,
        /// The repeated table kind (`cell_rise`, `rise_constraint`, ...).
        table: String,
        /// How many repetitions were found.
        found: usize,
        /// The timing group's span.
        span: Span,
    },

    /// A lookup table's value grid disagrees with the dimensions its
    /// indexes (own or template-inherited) declare.
    #[error(
        "'{table}' table is {found_rows}x{found_cols}, but its indexes declare {expected_rows}x{expected_cols}"
    )]
    TableDimensionMismatch {
        /// The table kind (`cell_rise`, `rise_constraint`, ...).
        table: String,
        /// Rows declared by `index_1`.
        expected_rows: usize,
        /// Columns declared by `index_2`.
        expected_cols: usize,
        /// Rows actually present in `values`.
        found_rows: usize,
        /// Columns actually present in `values`.
        found_cols: usize,
        /// The table group's span.
        span: Span,
    },

    /// A unit declaration was not understood.
    #[error(transparent)]
    Unit(#[from] UnitError),
}

impl ModelError {
    /// The source span this error points at, when one exists.
    pub fn span(&self) -> Span {
        match self {
            ModelError::UnexpectedRoot { span, .. }
            | ModelError::MissingUnits { span, .. }
            | ModelError::MissingAttribute { span, .. }
            | ModelError::InvalidAttribute { span, .. }
            | ModelError::DanglingReference { span, .. }
            | ModelError::ConflictingDirection { span, .. }
            | ModelError::CornerCount { span, .. }
            | ModelError::TableDimensionMismatch { span, .. } => *span,
            ModelError::Unit(_) => Span::DUMMY,
        }
    }
}
