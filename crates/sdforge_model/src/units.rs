//! Unit parsing and normalization.
//!
//! Liberty declares its units as strings (`time_unit : "1ns"`) or argument
//! pairs (`capacitive_load_unit (1, pf)`). Everything entering the typed
//! model is normalized exactly once — time to integer picoseconds,
//! capacitance to integer femtofarads — so no raw, unit-ambiguous number
//! survives past ingestion. Silent unit assumption is the most dangerous bug
//! class in this domain, so there is no defaulting: unknown suffixes fail.

use serde::{Deserialize, Serialize};

/// An unrecognized unit declaration.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum UnitError {
    /// The unit suffix is not one this converter knows.
    #[error("unrecognized unit '{0}'")]
    UnknownUnit(String),
}

/// A declared time unit, stored as picoseconds per declared unit.
///
/// `TimeScale::parse("1ns")` yields a scale of 1000; applying it to the raw
/// value `1.0` yields exactly 1000 ps.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct TimeScale {
    ps_per_unit: f64,
}

impl TimeScale {
    /// The identity scale: values already in picoseconds.
    pub const PS: TimeScale = TimeScale { ps_per_unit: 1.0 };

    /// Parses a Liberty time unit declaration like `"1ns"` or `"100ps"`.
    pub fn parse(decl: &str) -> Result<Self, UnitError> {
        let (multiplier, suffix) = split_unit(decl)?;
        let ps = match suffix.to_ascii_lowercase().as_str() {
            "s" => 1e12,
            "ms" => 1e9,
            "us" => 1e6,
            "ns" => 1e3,
            "ps" => 1.0,
            "fs" => 1e-3,
            _ => return Err(UnitError::UnknownUnit(decl.trim().to_string())),
        };
        Ok(TimeScale {
            ps_per_unit: multiplier * ps,
        })
    }

    /// Normalizes a raw library value to integer picoseconds.
    pub fn to_ps(&self, raw: f64) -> i64 {
        (raw * self.ps_per_unit).round() as i64
    }
}

/// A declared capacitance unit, stored as femtofarads per declared unit.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct CapScale {
    ff_per_unit: f64,
}

impl CapScale {
    /// The identity scale: values already in femtofarads.
    pub const FF: CapScale = CapScale { ff_per_unit: 1.0 };

    /// Builds a scale from `capacitive_load_unit (multiplier, suffix)`.
    pub fn new(multiplier: f64, suffix: &str) -> Result<Self, UnitError> {
        let ff = match suffix.trim().to_ascii_lowercase().as_str() {
            "ff" => 1.0,
            "pf" => 1e3,
            "nf" => 1e6,
            "uf" => 1e9,
            _ => return Err(UnitError::UnknownUnit(suffix.trim().to_string())),
        };
        Ok(CapScale {
            ff_per_unit: multiplier * ff,
        })
    }

    /// Normalizes a raw library value to integer femtofarads.
    pub fn to_ff(&self, raw: f64) -> i64 {
        (raw * self.ff_per_unit).round() as i64
    }
}

/// Splits a declaration like `"100ps"` into its numeric prefix and suffix.
///
/// A missing prefix (plain `"ns"`) means a multiplier of 1; a prefix that is
/// present but not a number (`"1..ns"`) is rejected rather than assumed.
fn split_unit(decl: &str) -> Result<(f64, &str), UnitError> {
    let decl = decl.trim();
    let split = decl
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(decl.len());
    let (prefix, suffix) = decl.split_at(split);
    let multiplier = if prefix.is_empty() {
        1.0
    } else {
        prefix
            .parse()
            .map_err(|_| UnitError::UnknownUnit(decl.to_string()))?
    };
    Ok((multiplier, suffix))
}
