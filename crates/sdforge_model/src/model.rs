//! The typed timing model: library, cells, pins, arcs, and checks.
//!
//! All delay values are integer picoseconds (see [`units`](crate::units));
//! the model never stores raw, un-normalized numbers. Cell and pin maps are
//! [`IndexMap`]s so iteration reproduces source declaration order — emission
//! order must be a stable function of input order to keep generated SDF
//! diff-friendly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One characterization corner of a min/typ/max triple.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Corner {
    /// Best-case corner.
    Min,
    /// Nominal corner.
    Typ,
    /// Worst-case corner.
    Max,
}

/// A normalized delay value in picoseconds: a single characterized value, or
/// a min/typ/max triple when three corners were characterized.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DelayValue {
    /// A single nominal value.
    Scalar(i64),
    /// Three corners, kept in characterized order even when unsorted.
    Triple {
        /// Best-case value.
        min: i64,
        /// Nominal value.
        typ: i64,
        /// Worst-case value.
        max: i64,
    },
}

impl DelayValue {
    /// Returns `true` for triples satisfying `min <= typ <= max`.
    /// Scalars are trivially ordered.
    pub fn is_ordered(&self) -> bool {
        match *self {
            DelayValue::Scalar(_) => true,
            DelayValue::Triple { min, typ, max } => min <= typ && typ <= max,
        }
    }

    /// Collapses this value to a single corner.
    pub fn corner(&self, corner: Corner) -> i64 {
        match *self {
            DelayValue::Scalar(v) => v,
            DelayValue::Triple { min, typ, max } => match corner {
                Corner::Min => min,
                Corner::Typ => typ,
                Corner::Max => max,
            },
        }
    }
}

/// Pin direction. Immutable once set; conflicting re-declaration in the
/// source is a model error.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Direction {
    /// An input pin.
    Input,
    /// An output pin.
    Output,
    /// A bidirectional pin.
    Inout,
    /// An internal pin (not externally visible, but may anchor arcs).
    Internal,
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Direction::Input),
            "output" => Ok(Direction::Output),
            "inout" => Ok(Direction::Inout),
            "internal" => Ok(Direction::Internal),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Inout => "inout",
            Direction::Internal => "internal",
        };
        write!(f, "{s}")
    }
}

/// Whether an arc's output transition direction is tied to the input's.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TimingSense {
    /// Output rises when the input rises.
    PositiveUnate,
    /// Output falls when the input rises.
    NegativeUnate,
    /// Output direction is independent of the input direction.
    NonUnate,
}

impl FromStr for TimingSense {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive_unate" => Ok(TimingSense::PositiveUnate),
            "negative_unate" => Ok(TimingSense::NegativeUnate),
            "non_unate" => Ok(TimingSense::NonUnate),
            _ => Err(()),
        }
    }
}

/// The kind of a sequential timing constraint.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CheckKind {
    /// Data must be stable before the clock edge.
    Setup,
    /// Data must be stable after the clock edge.
    Hold,
    /// Async control release before the clock edge.
    Recovery,
    /// Async control release after the clock edge.
    Removal,
}

impl CheckKind {
    /// The SDF timing-check keyword for this kind.
    pub fn sdf_keyword(self) -> &'static str {
        match self {
            CheckKind::Setup => "SETUP",
            CheckKind::Hold => "HOLD",
            CheckKind::Recovery => "RECOVERY",
            CheckKind::Removal => "REMOVAL",
        }
    }
}

/// The clock edge a timing check is referenced to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ClockEdge {
    /// Rising clock edge (`*_rising` in Liberty, `posedge` in SDF).
    Rising,
    /// Falling clock edge (`*_falling` in Liberty, `negedge` in SDF).
    Falling,
}

impl ClockEdge {
    /// The SDF edge keyword for this edge.
    pub fn sdf_keyword(self) -> &'static str {
        match self {
            ClockEdge::Rising => "posedge",
            ClockEdge::Falling => "negedge",
        }
    }
}

/// Which data transition a check constrains.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Transition {
    /// The constrained pin rising.
    Rise,
    /// The constrained pin falling.
    Fall,
}

/// A delay arc from a related pin's transition to this pin's transition.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TimingArc {
    /// The pin whose transition causes this one. Must exist in the same cell.
    pub related_pin: String,
    /// The arc's unateness, when declared.
    pub sense: Option<TimingSense>,
    /// A Boolean condition under which the arc applies, carried opaquely.
    pub when: Option<String>,
    /// Delay for the output rising. `None` for slew-only arcs.
    pub rise: Option<DelayValue>,
    /// Delay for the output falling. `None` for slew-only arcs.
    pub fall: Option<DelayValue>,
}

/// A sequential timing constraint on a pin, referenced to a clock pin.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TimingCheck {
    /// What kind of check this is.
    pub kind: CheckKind,
    /// The clock pin the check is referenced to. Must exist in the same cell.
    pub related_pin: String,
    /// The referenced clock edge.
    pub edge: ClockEdge,
    /// The constrained data transition.
    pub transition: Transition,
    /// The constraint value.
    pub value: DelayValue,
}

/// A pin of a cell, owning the arcs and checks that target it.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Pin {
    /// The pin name, exactly as declared (no case-folding).
    pub name: String,
    /// The pin direction.
    pub direction: Direction,
    /// Input capacitance in femtofarads, when characterized.
    pub capacitance_ff: Option<i64>,
    /// Delay arcs into this pin, in declaration order.
    pub arcs: Vec<TimingArc>,
    /// Timing checks constraining this pin, in declaration order.
    pub checks: Vec<TimingCheck>,
}

/// A standard-cell timing template.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Cell {
    /// The cell name.
    pub name: String,
    /// Cell area; parsed but irrelevant to SDF.
    pub area: Option<f64>,
    /// Pins keyed by name, in declaration order.
    pub pins: IndexMap<String, Pin>,
}

impl Cell {
    /// Returns `true` if the named pin exists in this cell.
    pub fn has_pin(&self, name: &str) -> bool {
        self.pins.contains_key(name)
    }
}

/// The top-level timing library.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Library {
    /// The library name.
    pub name: String,
    /// The declared time unit string, kept for provenance. All model values
    /// are already normalized to picoseconds.
    pub declared_time_unit: String,
    /// Cells keyed by name, in declaration order.
    pub cells: IndexMap<String, Cell>,
}
