//! The typed timing model and its builder.
//!
//! This crate walks the generic Liberty tree and extracts the domain model:
//! [`Library`] → [`Cell`] → [`Pin`] → [`TimingArc`]/[`TimingCheck`], with all
//! delay values normalized to integer picoseconds at ingestion. The model is
//! built once per input file and never mutated afterwards; the SDF writer
//! consumes it read-only.
//!
//! Lookup-table reduction to a single operating point goes through the
//! [`TableReducer`] strategy so callers needing interpolation can supply
//! their own; the default takes the first entry and records a warning.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod model;
pub mod reduce;
pub mod units;

pub use builder::{build, BuildConfig};
pub use error::ModelError;
pub use model::{
    Cell, CheckKind, ClockEdge, Corner, DelayValue, Direction, Library, Pin, TimingArc,
    TimingCheck, TimingSense, Transition,
};
pub use reduce::{FirstEntry, LutTable, NearestIndex, Reduction, TableReducer};
pub use units::{CapScale, TimeScale, UnitError};
