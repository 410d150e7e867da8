//! The `sdforge check` subcommand.

use std::path::Path;

use sdforge_diagnostics::DiagnosticSink;
use sdforge_model::BuildConfig;
use sdforge_source::SourceDb;

use crate::pipeline::{describe_error, load_library, report_diagnostics};
use crate::{CheckArgs, GlobalArgs};

/// Parses and builds the library without writing anything.
///
/// Exits 0 when the library is valid, even with warnings; a summary line
/// reports what was found.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let config = BuildConfig::default();

    let result = load_library(&mut db, Path::new(&args.input), &config, &sink);
    let warnings = sink.warning_count();
    report_diagnostics(&sink, &db, global);

    match result {
        Ok(library) => {
            if !global.quiet {
                let arcs: usize = library
                    .cells
                    .values()
                    .flat_map(|c| c.pins.values())
                    .map(|p| p.arcs.len() + p.checks.len())
                    .sum();
                eprintln!(
                    "{}: {} cells, {} timing entries, {} warnings",
                    args.input,
                    library.cells.len(),
                    arcs,
                    warnings
                );
            }
            Ok(0)
        }
        Err(err) => Err(describe_error(&err, &db).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;
    use std::fs;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn valid_library_passes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ok.lib");
        fs::write(
            &input,
            r#"library(l) {
                time_unit : "1ns";
                capacitive_load_unit (1, pf);
                cell(INV) {
                    pin(A) { direction : input; }
                    pin(ZN) {
                        direction : output;
                        timing() {
                            related_pin : "A";
                            timing_sense : negative_unate;
                            cell_rise(scalar) { values("0.08"); }
                            cell_fall(scalar) { values("0.06"); }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let args = CheckArgs {
            input: input.to_string_lossy().into_owned(),
        };
        assert_eq!(run(&args, &quiet()).unwrap(), 0);
    }

    #[test]
    fn syntax_error_fails_with_location() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.lib");
        fs::write(&input, "library(l) { cell(X) { }").unwrap();

        let args = CheckArgs {
            input: input.to_string_lossy().into_owned(),
        };
        let err = run(&args, &quiet()).unwrap_err();
        assert!(format!("{err}").contains("bad.lib:"));
    }
}
