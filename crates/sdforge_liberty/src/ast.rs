//! The generic Liberty group tree.
//!
//! Every Liberty construct is a group: a type tag, an optional name, an
//! ordered list of attributes, and an ordered list of child groups. The tree
//! deliberately carries no timing semantics — `cell` and `lu_table_template`
//! are just strings here — so that grammar-level support for a new attribute
//! never touches the typed model downstream.

use sdforge_source::Span;
use serde::{Deserialize, Serialize};

/// A single attribute value: a number, or a piece of text.
///
/// Quoted strings and bare identifiers both map to [`Value::Text`]; Liberty
/// writers quote inconsistently and the distinction carries no meaning.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Value {
    /// A numeric value.
    Number(f64),
    /// A textual value, quotes stripped.
    Text(String),
}

impl Value {
    /// Returns the value as a number, parsing numeric-looking text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the value as text; numbers format with `Display`.
    pub fn as_text(&self) -> String {
        match self {
            Value::Number(n) => format!("{n}"),
            Value::Text(s) => s.clone(),
        }
    }
}

/// The payload of an attribute.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum AttrValue {
    /// A simple attribute: `name : value ;`
    Simple(Value),
    /// A complex attribute: `name ( v1, v2, ... ) ;`
    Complex(Vec<Value>),
    /// A lookup-table attribute (`values`, `index_1`, ...): each quoted
    /// argument is a comma-separated row of numbers, parsed into a
    /// rectangular rows-by-columns table.
    Table(Vec<Vec<f64>>),
}

/// A named attribute within a group.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute name, e.g. `time_unit` or `related_pin`.
    pub name: String,
    /// The attribute payload.
    pub value: AttrValue,
    /// The span covering the whole attribute statement.
    pub span: Span,
}

/// A node in the generic Liberty tree.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GroupNode {
    /// The group type tag, e.g. `library`, `cell`, `pin`, `timing`.
    pub kind: String,
    /// The group name argument, e.g. `BUF` in `cell(BUF)`. Groups like
    /// `timing()` have none.
    pub name: Option<String>,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
    /// Child groups in declaration order.
    pub children: Vec<GroupNode>,
    /// The span covering the group header.
    pub span: Span,
}

impl GroupNode {
    /// Returns the first attribute with the given name, if any.
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns the value of a simple attribute as text, if present.
    pub fn simple_text(&self, name: &str) -> Option<String> {
        match &self.attr(name)?.value {
            AttrValue::Simple(v) => Some(v.as_text()),
            _ => None,
        }
    }

    /// Returns the value of a simple attribute as a number, if present.
    pub fn simple_number(&self, name: &str) -> Option<f64> {
        match &self.attr(name)?.value {
            AttrValue::Simple(v) => v.as_number(),
            _ => None,
        }
    }

    /// Returns the rows of a table attribute, if present.
    pub fn table(&self, name: &str) -> Option<&[Vec<f64>]> {
        match &self.attr(name)?.value {
            AttrValue::Table(rows) => Some(rows),
            _ => None,
        }
    }

    /// Iterates over child groups of the given kind, in declaration order.
    pub fn children_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a GroupNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }
}
