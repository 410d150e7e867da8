//! The `sdforge convert` subcommand.

use std::path::Path;

use sdforge_diagnostics::DiagnosticSink;
use sdforge_model::{BuildConfig, FirstEntry, NearestIndex, TableReducer};
use sdforge_sdf::{emit, EmitConfig};
use sdforge_source::SourceDb;

use crate::pipeline::{describe_error, load_library, report_diagnostics, write_atomic};
use crate::{ConvertArgs, GlobalArgs};

/// Runs the conversion: load, build, emit, write.
///
/// A fatal error at any stage leaves the output path untouched. Warnings are
/// reported to stderr but never change the exit code.
pub fn run(args: &ConvertArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let reducer: Box<dyn TableReducer> = match (args.transition, args.load) {
        (Some(transition), Some(load)) => Box::new(NearestIndex { transition, load }),
        _ => Box::new(FirstEntry),
    };
    let config = BuildConfig {
        reducer: reducer.as_ref(),
    };

    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();

    let result = load_library(&mut db, Path::new(&args.input), &config, &sink).and_then(|library| {
        if global.verbose && !global.quiet {
            for cell in library.cells.values() {
                let arcs: usize = cell.pins.values().map(|p| p.arcs.len()).sum();
                let checks: usize = cell.pins.values().map(|p| p.checks.len()).sum();
                eprintln!("  {}: {arcs} arcs, {checks} checks", cell.name);
            }
        }
        let emit_config = EmitConfig {
            design: args.design.clone(),
            unit: args.output_unit.into(),
            corner: args.corner.map(Into::into),
        };
        let sdf = emit(&library, &emit_config);
        write_atomic(Path::new(&args.output), &sdf)
    });

    report_diagnostics(&sink, &db, global);

    match result {
        Ok(()) => {
            if !global.quiet {
                eprintln!("wrote {}", args.output);
            }
            Ok(0)
        }
        Err(err) => Err(describe_error(&err, &db).into()),
    }
}
