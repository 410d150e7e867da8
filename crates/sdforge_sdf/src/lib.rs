//! SDF 3.0 writer for the typed timing model.
//!
//! Consumes a [`Library`](sdforge_model::Library) read-only and renders a
//! Standard Delay Format file: one `CELL` per library cell that carries
//! timing, `IOPATH` entries under `DELAY (ABSOLUTE ...)` for delay arcs, and
//! `TIMINGCHECK` entries for setup/hold/recovery/removal constraints.
//!
//! Output is a pure function of the model and the [`EmitConfig`]: no
//! timestamps, no environment lookups, cells and arcs in model order. The
//! same input always produces byte-identical SDF.

#![warn(missing_docs)]

pub mod emit;

pub use emit::{emit, EmitConfig, OutputUnit};
