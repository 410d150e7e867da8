//! Lookup-table reduction strategies.
//!
//! A Liberty delay table indexes delay by input transition time (`index_1`,
//! rows) and output load (`index_2`, columns). SDF wants a single number per
//! arc, and picking the operating point is the one genuinely ambiguous step
//! in this conversion. The policy is therefore a strategy, not a constant:
//! the default [`FirstEntry`] takes the first table entry and marks the
//! reduction ambiguous so the builder can warn; [`NearestIndex`] snaps to the
//! entry closest to an explicitly supplied operating point. Callers wanting
//! interpolation implement [`TableReducer`] themselves.

use serde::{Deserialize, Serialize};

/// A resolved lookup table: index vectors plus the value grid.
///
/// `values` is rows-by-columns; `index_1` labels rows, `index_2` columns.
/// Either index may be empty for scalar or one-dimensional tables.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LutTable {
    /// Row breakpoints (input net transition).
    pub index_1: Vec<f64>,
    /// Column breakpoints (output net capacitance).
    pub index_2: Vec<f64>,
    /// The delay values, one row per `index_1` entry.
    pub values: Vec<Vec<f64>>,
}

impl LutTable {
    /// Returns (rows, columns).
    pub fn dims(&self) -> (usize, usize) {
        let rows = self.values.len();
        let cols = self.values.first().map_or(0, Vec::len);
        (rows, cols)
    }

    /// Returns `true` if the table holds exactly one value.
    pub fn is_single(&self) -> bool {
        self.dims() == (1, 1)
    }
}

/// The outcome of reducing a table to one value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Reduction {
    /// The selected value, still in library units.
    pub value: f64,
    /// `true` if the table offered multiple entries and the strategy picked
    /// one without an explicit selection. The builder reports this.
    pub ambiguous: bool,
}

/// Strategy for collapsing a multi-entry lookup table to one operating point.
pub trait TableReducer {
    /// Reduces the table to a single value.
    fn reduce(&self, table: &LutTable) -> Reduction;
}

/// Takes the first entry and flags the reduction as ambiguous when the table
/// has more than one. The documented default policy: deterministic and
/// explainable, never an unrequested interpolation.
pub struct FirstEntry;

impl TableReducer for FirstEntry {
    fn reduce(&self, table: &LutTable) -> Reduction {
        let value = table
            .values
            .first()
            .and_then(|row| row.first())
            .copied()
            .unwrap_or(0.0);
        Reduction {
            value,
            ambiguous: !table.is_single(),
        }
    }
}

/// Selects the entry whose breakpoints are nearest to a supplied operating
/// point (input transition, output load). Never ambiguous: the caller chose
/// the point.
pub struct NearestIndex {
    /// Target input net transition, in library time units.
    pub transition: f64,
    /// Target output capacitance, in library capacitance units.
    pub load: f64,
}

impl TableReducer for NearestIndex {
    fn reduce(&self, table: &LutTable) -> Reduction {
        let row = nearest(&table.index_1, self.transition);
        let col = nearest(&table.index_2, self.load);
        let (rows, cols) = table.dims();
        let row = row.min(rows.saturating_sub(1));
        let col = col.min(cols.saturating_sub(1));
        let value = table
            .values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0.0);
        Reduction {
            value,
            ambiguous: false,
        }
    }
}

/// Index of the breakpoint nearest to `target`; 0 when there are none.
fn nearest(breakpoints: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &b) in breakpoints.iter().enumerate() {
        let dist = (b - target).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}
