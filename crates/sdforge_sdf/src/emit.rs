//! Rendering the model as SDF text.

use sdforge_model::{Cell, Corner, DelayValue, Library, Pin};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The time unit of the generated SDF.
///
/// Model values are integer picoseconds, so `Ps` renders every delay exactly.
/// `Ns` divides by 1000 and prints at most three decimals, which is still
/// exact because a picosecond is a thousandth of a nanosecond.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OutputUnit {
    /// Emit `(TIMESCALE 1ps)` and integer delays.
    Ps,
    /// Emit `(TIMESCALE 1ns)` and decimal delays.
    Ns,
}

impl OutputUnit {
    /// The `TIMESCALE` header entry for this unit.
    pub fn timescale(self) -> &'static str {
        match self {
            OutputUnit::Ps => "1ps",
            OutputUnit::Ns => "1ns",
        }
    }
}

/// Options controlling SDF emission.
pub struct EmitConfig {
    /// The `DESIGN` header entry. Defaults to the library name.
    pub design: Option<String>,
    /// The output time unit.
    pub unit: OutputUnit,
    /// When set, every min/typ/max triple collapses to this corner at
    /// render time. The model itself is not modified.
    pub corner: Option<Corner>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            design: None,
            unit: OutputUnit::Ps,
            corner: None,
        }
    }
}

/// Renders the library as a complete SDF 3.0 file.
///
/// Cells appear in library order; cells with neither delay arcs nor timing
/// checks are omitted. Output ends with a trailing newline.
pub fn emit(library: &Library, config: &EmitConfig) -> String {
    let mut w = SdfWriter::new();
    w.open("(DELAYFILE");
    w.line("(SDFVERSION \"3.0\")");
    let design = config.design.as_deref().unwrap_or(&library.name);
    w.line(&format!("(DESIGN \"{design}\")"));
    w.line("(VENDOR \"sdforge\")");
    w.line("(PROGRAM \"sdforge\")");
    w.line(&format!("(VERSION \"{}\")", env!("CARGO_PKG_VERSION")));
    w.line(&format!("(TIMESCALE {})", config.unit.timescale()));
    for cell in library.cells.values() {
        emit_cell(&mut w, cell, config);
    }
    w.close(")");
    w.finish()
}

fn emit_cell(w: &mut SdfWriter, cell: &Cell, config: &EmitConfig) {
    if !cell_has_timing(cell) {
        return;
    }
    w.open("(CELL");
    w.line(&format!("(CELLTYPE \"{}\")", cell.name));
    w.line("(INSTANCE *)");

    let has_delays = cell
        .pins
        .values()
        .any(|p| p.arcs.iter().any(|a| a.rise.is_some() || a.fall.is_some()));
    if has_delays {
        w.open("(DELAY");
        w.open("(ABSOLUTE");
        for pin in cell.pins.values() {
            emit_iopaths(w, pin, config);
        }
        w.close(")");
        w.close(")");
    }

    let has_checks = cell.pins.values().any(|p| !p.checks.is_empty());
    if has_checks {
        w.open("(TIMINGCHECK");
        for pin in cell.pins.values() {
            emit_checks(w, pin, config);
        }
        w.close(")");
    }
    w.close(")");
}

fn emit_iopaths(w: &mut SdfWriter, pin: &Pin, config: &EmitConfig) {
    for arc in &pin.arcs {
        // Slew-only arcs carry no delay and produce no IOPATH.
        if arc.rise.is_none() && arc.fall.is_none() {
            continue;
        }
        let rise = render_opt(arc.rise, config);
        let fall = render_opt(arc.fall, config);
        w.line(&format!(
            "(IOPATH {} {} {rise} {fall})",
            arc.related_pin, pin.name
        ));
    }
}

fn emit_checks(w: &mut SdfWriter, pin: &Pin, config: &EmitConfig) {
    for check in &pin.checks {
        let data_edge = match check.transition {
            sdforge_model::Transition::Rise => "posedge",
            sdforge_model::Transition::Fall => "negedge",
        };
        w.line(&format!(
            "({} ({data_edge} {}) ({} {}) {})",
            check.kind.sdf_keyword(),
            pin.name,
            check.edge.sdf_keyword(),
            check.related_pin,
            render(check.value, config),
        ));
    }
}

fn cell_has_timing(cell: &Cell) -> bool {
    cell.pins.values().any(|p| {
        !p.checks.is_empty() || p.arcs.iter().any(|a| a.rise.is_some() || a.fall.is_some())
    })
}

/// Renders a delay value as an SDF rvalue, applying corner collapse.
fn render(value: DelayValue, config: &EmitConfig) -> String {
    let value = match config.corner {
        Some(corner) => DelayValue::Scalar(value.corner(corner)),
        None => value,
    };
    match value {
        DelayValue::Scalar(v) => format!("({})", render_ps(v, config.unit)),
        DelayValue::Triple { min, typ, max } => format!(
            "({}:{}:{})",
            render_ps(min, config.unit),
            render_ps(typ, config.unit),
            render_ps(max, config.unit)
        ),
    }
}

/// A missing value renders as the empty rvalue `()`.
fn render_opt(value: Option<DelayValue>, config: &EmitConfig) -> String {
    match value {
        Some(v) => render(v, config),
        None => "()".to_string(),
    }
}

/// Formats an integer-picosecond delay in the output unit.
///
/// Nanosecond output prints at most three decimals with trailing zeros
/// trimmed, so `120` ps renders as `0.12`.
fn render_ps(ps: i64, unit: OutputUnit) -> String {
    match unit {
        OutputUnit::Ps => format!("{ps}"),
        OutputUnit::Ns => {
            let sign = if ps < 0 { "-" } else { "" };
            let abs = ps.unsigned_abs();
            let whole = abs / 1000;
            let frac = abs % 1000;
            if frac == 0 {
                format!("{sign}{whole}")
            } else {
                let frac = format!("{frac:03}");
                format!("{sign}{whole}.{}", frac.trim_end_matches('0'))
            }
        }
    }
}

/// Indented s-expression writer.
struct SdfWriter {
    out: String,
    depth: usize,
}

impl SdfWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        // Writing to a String cannot fail.
        let _ = writeln!(self.out, "{text}");
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth -= 1;
        self.line(text);
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdforge_diagnostics::DiagnosticSink;
    use sdforge_liberty::parse_source;
    use sdforge_model::{build, BuildConfig};
    use sdforge_source::FileId;

    fn library_from(source: &str) -> Library {
        let tree = parse_source(source, FileId::from_raw(0)).expect("parse should succeed");
        let sink = DiagnosticSink::new();
        build(&tree, &BuildConfig::default(), &sink).expect("build should succeed")
    }

    const BUF_LIB: &str = r#"
        library(demo) {
            time_unit : "1ns";
            capacitive_load_unit (1, pf);
            cell(BUF) {
                pin(A) { direction : input; }
                pin(Z) {
                    direction : output;
                    timing() {
                        related_pin : "A";
                        cell_rise(scalar) { values("0.120"); }
                        cell_fall(scalar) { values("0.150"); }
                    }
                }
            }
        }
    "#;

    #[test]
    fn buffer_iopath() {
        let library = library_from(BUF_LIB);
        let sdf = emit(&library, &EmitConfig::default());
        let expected = "\
(DELAYFILE
  (SDFVERSION \"3.0\")
  (DESIGN \"demo\")
  (VENDOR \"sdforge\")
  (PROGRAM \"sdforge\")
  (VERSION \"0.1.0\")
  (TIMESCALE 1ps)
  (CELL
    (CELLTYPE \"BUF\")
    (INSTANCE *)
    (DELAY
      (ABSOLUTE
        (IOPATH A Z (120) (150))
      )
    )
  )
)
";
        assert_eq!(sdf, expected);
    }

    #[test]
    fn design_override() {
        let library = library_from(BUF_LIB);
        let config = EmitConfig {
            design: Some("top".to_string()),
            ..EmitConfig::default()
        };
        let sdf = emit(&library, &config);
        assert!(sdf.contains("(DESIGN \"top\")"));
        assert!(!sdf.contains("(DESIGN \"demo\")"));
    }

    #[test]
    fn nanosecond_unit() {
        let library = library_from(BUF_LIB);
        let config = EmitConfig {
            unit: OutputUnit::Ns,
            ..EmitConfig::default()
        };
        let sdf = emit(&library, &config);
        assert!(sdf.contains("(TIMESCALE 1ns)"));
        assert!(sdf.contains("(IOPATH A Z (0.12) (0.15))"));
    }

    #[test]
    fn triple_renders_colon_separated() {
        let library = library_from(
            r#"library(l) {
                time_unit : "1ns";
                capacitive_load_unit (1, pf);
                cell(X) {
                    pin(A) { direction : input; }
                    pin(Z) {
                        direction : output;
                        timing() {
                            related_pin : "A";
                            cell_rise(scalar) { values("0.1"); }
                            cell_rise(scalar) { values("0.2"); }
                            cell_rise(scalar) { values("0.3"); }
                            cell_fall(scalar) { values("0.15"); }
                        }
                    }
                }
            }"#,
        );
        let sdf = emit(&library, &EmitConfig::default());
        assert!(sdf.contains("(IOPATH A Z (100:200:300) (150))"));

        let max_only = EmitConfig {
            corner: Some(Corner::Max),
            ..EmitConfig::default()
        };
        let sdf = emit(&library, &max_only);
        assert!(sdf.contains("(IOPATH A Z (300) (150))"));
    }

    #[test]
    fn unordered_triple_renders_as_characterized() {
        let library = library_from(
            r#"library(l) {
                time_unit : "1ns";
                capacitive_load_unit (1, pf);
                cell(X) {
                    pin(A) { direction : input; }
                    pin(Z) {
                        direction : output;
                        timing() {
                            related_pin : "A";
                            cell_rise(scalar) { values("0.3"); }
                            cell_rise(scalar) { values("0.2"); }
                            cell_rise(scalar) { values("0.1"); }
                        }
                    }
                }
            }"#,
        );
        let sdf = emit(&library, &EmitConfig::default());
        // Emitted exactly as characterized, never sorted into min <= max.
        assert!(sdf.contains("(IOPATH A Z (300:200:100) ())"));
    }

    #[test]
    fn timing_checks_section() {
        let library = library_from(
            r#"library(l) {
                time_unit : "1ns";
                capacitive_load_unit (1, pf);
                cell(DFF) {
                    pin(CLK) { direction : input; }
                    pin(D) {
                        direction : input;
                        timing() {
                            related_pin : "CLK";
                            timing_type : setup_rising;
                            rise_constraint(scalar) { values("0.050"); }
                        }
                        timing() {
                            related_pin : "CLK";
                            timing_type : hold_rising;
                            fall_constraint(scalar) { values("0.010"); }
                        }
                    }
                }
            }"#,
        );
        let sdf = emit(&library, &EmitConfig::default());
        assert!(sdf.contains("(TIMINGCHECK"));
        assert!(sdf.contains("(SETUP (posedge D) (posedge CLK) (50))"));
        assert!(sdf.contains("(HOLD (negedge D) (posedge CLK) (10))"));
        // No delay arcs means no DELAY section. Match the section's own
        // line so the `(DELAYFILE` header does not trip the check.
        assert!(!sdf.contains("(DELAY\n"));
    }

    #[test]
    fn missing_fall_renders_empty_rvalue() {
        let library = library_from(
            r#"library(l) {
                time_unit : "1ns";
                capacitive_load_unit (1, pf);
                cell(X) {
                    pin(A) { direction : input; }
                    pin(Z) {
                        direction : output;
                        timing() {
                            related_pin : "A";
                            cell_rise(scalar) { values("0.2"); }
                        }
                    }
                }
            }"#,
        );
        let sdf = emit(&library, &EmitConfig::default());
        assert!(sdf.contains("(IOPATH A Z (200) ())"));
    }

    #[test]
    fn timingless_cells_are_omitted() {
        let library = library_from(
            r#"library(l) {
                time_unit : "1ns";
                capacitive_load_unit (1, pf);
                cell(FILLER) {
                    pin(A) { direction : input; }
                }
            }"#,
        );
        let sdf = emit(&library, &EmitConfig::default());
        assert!(!sdf.contains("(CELL\n"));
        assert!(!sdf.contains("FILLER"));
    }

    #[test]
    fn emission_is_deterministic() {
        let library = library_from(BUF_LIB);
        let a = emit(&library, &EmitConfig::default());
        let b = emit(&library, &EmitConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn ns_rendering_edge_cases() {
        assert_eq!(render_ps(0, OutputUnit::Ns), "0");
        assert_eq!(render_ps(1000, OutputUnit::Ns), "1");
        assert_eq!(render_ps(1500, OutputUnit::Ns), "1.5");
        assert_eq!(render_ps(120, OutputUnit::Ns), "0.12");
        assert_eq!(render_ps(5, OutputUnit::Ns), "0.005");
        assert_eq!(render_ps(-250, OutputUnit::Ns), "-0.25");
        assert_eq!(render_ps(120, OutputUnit::Ps), "120");
    }
}
