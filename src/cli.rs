use std::ffi::OsString;

use clap::{ArgAction, CommandFactory, Parser};

use crate::config::defaults;

/// Reported by `--version` and in the help text.
pub const PROG_VERSION: &str = "0.8a1";

const REQUIRED: &str = "Required options";
const ADVANCED: &str = "Advanced options";
const OTHER: &str = "Other options";

/// Raw command-line options. Numeric values are kept signed so that
/// out-of-range input can be clamped instead of rejected. Paths are raw
/// `OsString`s so non-UTF-8 names are kept and an empty value reaches
/// validation.
#[derive(Parser, Debug)]
#[command(
    name = "detect-sv",
    version = PROG_VERSION,
    about = "Detect structural variants from contigs and long-read alignments",
    override_usage = "detect-sv -c contig.fasta -l longread.fasta -m lr2contig.paf -d outdir [options]",
    help_template = "{name} {version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}",
    args_override_self = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// Path to contigs file
    #[arg(
        short = 'c',
        long = "contig",
        value_name = "STR",
        allow_hyphen_values = true,
        help_heading = REQUIRED
    )]
    pub contig: Option<OsString>,

    /// Path to long read dataset
    #[arg(
        short = 'l',
        long = "long",
        value_name = "STR",
        allow_hyphen_values = true,
        help_heading = REQUIRED
    )]
    pub long: Option<OsString>,

    /// Path to mappings of long reads onto contigs
    #[arg(
        short = 'm',
        long = "mapping",
        value_name = "STR",
        allow_hyphen_values = true,
        help_heading = REQUIRED
    )]
    pub mapping: Option<OsString>,

    /// Path to the output directory
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "STR",
        allow_hyphen_values = true,
        help_heading = REQUIRED
    )]
    pub dir: Option<OsString>,

    /// Minimum length of alignment block
    #[arg(
        long = "aln-block",
        value_name = "INT",
        default_value_t = defaults::MIN_ALN_BLOCK as i32,
        allow_negative_numbers = true,
        help_heading = ADVANCED
    )]
    pub aln_block: i32,

    /// Minimum alignment similarity
    #[arg(
        long = "aln-sim",
        value_name = "FLOAT",
        default_value_t = defaults::MIN_ALN_SIM,
        allow_negative_numbers = true,
        help_heading = ADVANCED
    )]
    pub aln_sim: f64,

    /// Maximum deviation from mean frequency of uniq contigs
    #[arg(
        long = "uniq-dev",
        value_name = "FLOAT",
        default_value_t = defaults::MAX_UNIQ_DEV,
        allow_negative_numbers = true,
        help_heading = ADVANCED
    )]
    pub uniq_dev: f64,

    /// Minimum number of long reads supporting each edge
    #[arg(
        long = "edge-sup",
        value_name = "INT",
        default_value_t = defaults::MIN_EDGE_SUP as i32,
        allow_negative_numbers = true,
        help_heading = ADVANCED
    )]
    pub edge_sup: i32,

    /// Number of CPU cores to use
    #[arg(
        short = 't',
        long = "threads",
        value_name = "INT",
        default_value_t = defaults::NUM_THREADS as i32,
        allow_negative_numbers = true,
        help_heading = OTHER
    )]
    pub threads: i32,

    /// The file passed by -l is a file of file names
    #[arg(long = "long-fofn", help_heading = OTHER)]
    pub long_fofn: bool,

    /// The file passed by -m is a file of file names
    #[arg(long = "mapping-fofn", help_heading = OTHER)]
    pub mapping_fofn: bool,

    /// Print version
    #[arg(long, action = ArgAction::Version, help_heading = OTHER)]
    pub version: Option<bool>,

    /// Print this help message
    #[arg(short = 'h', long, action = ArgAction::Help, help_heading = OTHER)]
    pub help: Option<bool>,
}

/// One-line usage summary.
pub fn short_usage() -> String {
    Args::command().render_usage().to_string()
}

/// Full help text with every option and its default.
pub fn long_help() -> String {
    Args::command().render_long_help().to_string()
}
