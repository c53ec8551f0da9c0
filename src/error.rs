use std::{io, path::PathBuf};

use crate::cli::short_usage;

/// Outcome of a command-line parse that did not produce a [`crate::Config`].
///
/// [`CliError::Help`] and [`CliError::Version`] are requested early exits and
/// map to a successful exit code. Every other variant is a failure.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no arguments given")]
    Usage,

    #[error("{0}")]
    Help(String),

    #[error("{0}")]
    Version(String),

    /// Unrecognised option or malformed token.
    #[error("{0}")]
    Schema(String),

    /// Numeric option given a value that does not convert.
    #[error("{0}")]
    Conversion(String),

    #[error("option {flag} (--{name}) is required!")]
    MissingRequired {
        flag: &'static str,
        name: &'static str,
    },

    #[error("cannot create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    pub fn is_early_exit(&self) -> bool {
        matches!(self, CliError::Help(_) | CliError::Version(_))
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_early_exit() {
            0
        } else {
            1
        }
    }

    /// Text shown to the user for this outcome. Failures carry an `[ERROR]`
    /// line and, except for output-directory errors, the usage summary.
    pub fn diagnostic(&self) -> String {
        match self {
            CliError::Version(text) | CliError::Help(text) => text.clone(),
            CliError::Usage => short_usage(),
            CliError::OutputDir { .. } => format!("[ERROR] {self}"),
            CliError::Schema(_) | CliError::Conversion(_) | CliError::MissingRequired { .. } => {
                format!("[ERROR] {self}\n{}", short_usage())
            }
        }
    }

    /// Write the outcome where the user expects it. Version goes to stdout,
    /// everything else to stderr. Diagnostics bypass the logger so a quiet
    /// `RUST_LOG` never hides why the run stopped.
    pub fn report(&self) {
        match self {
            CliError::Version(_) => println!("{}", self.diagnostic()),
            _ => eprintln!("{}", self.diagnostic()),
        }
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        use clap::error::ErrorKind;

        match err.kind() {
            ErrorKind::DisplayHelp => CliError::Help(crate::cli::long_help()),
            ErrorKind::DisplayVersion => CliError::Version(crate::cli::PROG_VERSION.to_owned()),
            ErrorKind::ValueValidation => CliError::Conversion(first_line(&err)),
            _ => CliError::Schema(first_line(&err)),
        }
    }
}

// Clap messages carry a usage block and tips after the first line.
fn first_line(err: &clap::Error) -> String {
    let msg = err.to_string();
    let line = msg.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(CliError::Help(String::new()).exit_code(), 0);
        assert_eq!(CliError::Version(String::new()).exit_code(), 0);
        assert_eq!(CliError::Usage.exit_code(), 1);
        assert_eq!(CliError::Schema("bad".into()).exit_code(), 1);
    }

    #[test]
    fn missing_required_names_flag() {
        let err = CliError::MissingRequired {
            flag: "-m",
            name: "mapping",
        };
        assert_eq!(err.to_string(), "option -m (--mapping) is required!");
    }

    #[test]
    fn failures_render_error_line_and_usage() {
        let err = CliError::MissingRequired {
            flag: "-c",
            name: "contig",
        };
        let text = err.diagnostic();
        assert!(text.starts_with("[ERROR] option -c (--contig) is required!"));
        assert!(text.contains("detect-sv -c contig.fasta"));

        let err = CliError::Conversion("invalid value 'x' for '--aln-sim <FLOAT>'".into());
        assert!(err.diagnostic().starts_with("[ERROR] invalid value 'x'"));

        let err = CliError::OutputDir {
            path: PathBuf::from("missing/out"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let text = err.diagnostic();
        assert!(text.starts_with("[ERROR] cannot create output directory"));
        assert!(!text.contains("contig.fasta"));
    }

    #[test]
    fn early_exits_render_plain_text() {
        assert_eq!(CliError::Version("0.8a1".into()).diagnostic(), "0.8a1");
        assert!(CliError::Usage.diagnostic().contains("-d outdir"));
    }
}
