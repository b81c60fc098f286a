//! CLI argument definitions for `xtal-merge`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use xtal_model::DataKind;

#[derive(Parser)]
#[command(
    name = "xtal-merge",
    version,
    about = "Merge X-ray diffraction intensities",
    long_about = "Read intensities from a labeled reflection table, reduce them to the \
                  asymmetric unit, drop systematic absences and merge repeated \
                  observations by inverse-variance weighting."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge the intensities of a reflection table.
    Merge(MergeArgs),

    /// List the built-in space groups.
    SpaceGroups,
}

#[derive(Parser)]
pub struct MergeArgs {
    /// CSV table whose header row holds mmCIF reflection tags.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Space group symbol (`P 21 21 21`) or number (`19`).
    #[arg(long = "space-group", value_name = "SG")]
    pub space_group: String,

    /// Unit cell: a b c alpha beta gamma (Angstroms, degrees).
    #[arg(
        long = "cell",
        num_args = 6,
        required = true,
        value_names = ["A", "B", "C", "ALPHA", "BETA", "GAMMA"],
        allow_negative_numbers = true
    )]
    pub cell: Vec<f64>,

    /// X-ray wavelength in Angstroms.
    #[arg(long = "wavelength", default_value_t = 0.0)]
    pub wavelength: f64,

    /// Which intensities to read from the table.
    #[arg(long = "kind", value_enum, default_value = "unmerged")]
    pub kind: KindArg,

    /// Merge I(+) and I(-) separately instead of pooling Friedel mates.
    #[arg(long = "plus-minus")]
    pub plus_minus: bool,

    /// Keep reflections that the space group forbids.
    #[arg(long = "keep-absences")]
    pub keep_absences: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Unmerged,
    Mean,
    Anomalous,
}

impl From<KindArg> for DataKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Unmerged => DataKind::Unmerged,
            KindArg::Mean => DataKind::Mean,
            KindArg::Anomalous => DataKind::Anomalous,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
