//! Diagnostic codes with category prefixes for stable identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// General warning diagnostics, prefixed with `W`.
    Warning,
    /// Timing-data diagnostics, prefixed with `T`.
    Timing,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Timing => 'T',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric
/// identifier, displayed as e.g. `T001` or `W002`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A table with multiple entries was reduced to a single operating point
    /// without an explicit selection.
    pub const AMBIGUOUS_TABLE_REDUCTION: DiagnosticCode = DiagnosticCode {
        category: Category::Timing,
        number: 1,
    };

    /// A min/typ/max triple is not ordered `min <= typ <= max`. The values
    /// are preserved as characterized, never reordered.
    pub const MIN_TYP_MAX_OUT_OF_ORDER: DiagnosticCode = DiagnosticCode {
        category: Category::Timing,
        number: 2,
    };

    /// An attribute was recognized as non-timing and skipped.
    pub const UNUSED_ATTRIBUTE: DiagnosticCode = DiagnosticCode {
        category: Category::Timing,
        number: 3,
    };

    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
