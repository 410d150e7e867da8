//! sdforge CLI — Liberty-to-SDF timing conversion.
//!
//! Provides `sdforge convert` for turning a Liberty (`.lib`) timing library
//! into an SDF delay file, and `sdforge check` for validating a library
//! without writing anything.

#![warn(missing_docs)]

mod check;
mod convert;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use sdforge_model::Corner;
use sdforge_sdf::OutputUnit;

/// sdforge — a Liberty-to-SDF timing converter.
#[derive(Parser, Debug)]
#[command(name = "sdforge", version, about = "Liberty to SDF timing converter")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-cell conversion details.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a Liberty library to an SDF delay file.
    Convert(ConvertArgs),
    /// Parse and validate a Liberty library without writing output.
    Check(CheckArgs),
}

/// Arguments for the `sdforge convert` subcommand.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// The Liberty (`.lib`) input file.
    pub input: String,

    /// The SDF output file.
    pub output: String,

    /// Collapse min/typ/max triples to a single corner.
    #[arg(long, value_enum)]
    pub corner: Option<CornerArg>,

    /// Time unit of the generated SDF.
    #[arg(long, value_enum, default_value_t = UnitArg::Ps)]
    pub output_unit: UnitArg,

    /// The DESIGN name in the SDF header (default: the library name).
    #[arg(long)]
    pub design: Option<String>,

    /// Input transition operating point for table reduction, in library
    /// time units. Requires `--load`.
    #[arg(long, requires = "load")]
    pub transition: Option<f64>,

    /// Output load operating point for table reduction, in library
    /// capacitance units. Requires `--transition`.
    #[arg(long, requires = "transition")]
    pub load: Option<f64>,
}

/// Arguments for the `sdforge check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The Liberty (`.lib`) input file.
    pub input: String,
}

/// A characterization corner, as a CLI flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CornerArg {
    /// Best-case corner.
    Min,
    /// Nominal corner.
    Typ,
    /// Worst-case corner.
    Max,
}

impl From<CornerArg> for Corner {
    fn from(arg: CornerArg) -> Self {
        match arg {
            CornerArg::Min => Corner::Min,
            CornerArg::Typ => Corner::Typ,
            CornerArg::Max => Corner::Max,
        }
    }
}

/// An output time unit, as a CLI flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    /// Integer picoseconds.
    Ps,
    /// Decimal nanoseconds.
    Ns,
}

impl From<UnitArg> for OutputUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Ps => OutputUnit::Ps,
            UnitArg::Ns => OutputUnit::Ns,
        }
    }
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print per-cell detail.
    pub verbose: bool,
    /// Diagnostic output format.
    pub format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        format: cli.format,
    };

    let result = match cli.command {
        Command::Convert(ref args) => convert::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_convert_basic() {
        let cli = Cli::parse_from(["sdforge", "convert", "lib.lib", "out.sdf"]);
        match cli.command {
            Command::Convert(ref args) => {
                assert_eq!(args.input, "lib.lib");
                assert_eq!(args.output, "out.sdf");
                assert!(args.corner.is_none());
                assert_eq!(args.output_unit, UnitArg::Ps);
                assert!(args.design.is_none());
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn parse_convert_with_corner() {
        let cli = Cli::parse_from(["sdforge", "convert", "a.lib", "a.sdf", "--corner", "max"]);
        match cli.command {
            Command::Convert(ref args) => {
                assert_eq!(args.corner, Some(CornerArg::Max));
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn parse_convert_with_unit() {
        let cli = Cli::parse_from([
            "sdforge",
            "convert",
            "a.lib",
            "a.sdf",
            "--output-unit",
            "ns",
        ]);
        match cli.command {
            Command::Convert(ref args) => {
                assert_eq!(args.output_unit, UnitArg::Ns);
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn parse_convert_with_design() {
        let cli = Cli::parse_from(["sdforge", "convert", "a.lib", "a.sdf", "--design", "top"]);
        match cli.command {
            Command::Convert(ref args) => {
                assert_eq!(args.design.as_deref(), Some("top"));
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn parse_convert_operating_point() {
        let cli = Cli::parse_from([
            "sdforge",
            "convert",
            "a.lib",
            "a.sdf",
            "--transition",
            "0.5",
            "--load",
            "4.0",
        ]);
        match cli.command {
            Command::Convert(ref args) => {
                assert_eq!(args.transition, Some(0.5));
                assert_eq!(args.load, Some(4.0));
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn transition_requires_load() {
        let result = Cli::try_parse_from([
            "sdforge",
            "convert",
            "a.lib",
            "a.sdf",
            "--transition",
            "0.5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["sdforge", "check", "lib.lib"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.input, "lib.lib");
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["sdforge", "--quiet", "--format", "json", "check", "a.lib"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.format, ReportFormat::Json);
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["sdforge", "--verbose", "check", "a.lib"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn corner_conversion() {
        assert_eq!(Corner::from(CornerArg::Min), Corner::Min);
        assert_eq!(Corner::from(CornerArg::Typ), Corner::Typ);
        assert_eq!(Corner::from(CornerArg::Max), Corner::Max);
    }
}
