use std::{
    ffi::OsString,
    fmt::Display,
    fs, io,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::{
    cli::{Args, PROG_VERSION},
    error::CliError,
};

pub mod defaults {
    pub const MIN_ALN_BLOCK: u32 = 500;
    pub const MIN_ALN_SIM: f64 = 0.85;
    pub const MIN_ALN_MAPQ: u8 = 55;
    pub const MAX_UNIQ_DEV: f64 = 0.15;
    pub const MIN_EDGE_SUP: u32 = 3;
    pub const NUM_THREADS: usize = 1;
}

/// Validated run parameters handed to every downstream stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub contig_path: PathBuf,
    pub long_path: PathBuf,
    pub mapping_path: PathBuf,
    pub out_dir: PathBuf,
    pub long_is_fofn: bool,
    pub mapping_is_fofn: bool,
    /// Minimum alignment block length to accept an alignment.
    pub min_aln_block: u32,
    /// Minimum alignment similarity, in `[0, 1]`.
    pub min_aln_sim: f64,
    pub min_aln_mapq: u8,
    /// Maximum deviation from mean frequency of unique contigs. Not range checked.
    pub max_uniq_dev: f64,
    /// Minimum number of long reads supporting a graph edge.
    pub min_edge_sup: u32,
    pub num_threads: usize,
    pub prog_version: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            contig_path: PathBuf::new(),
            long_path: PathBuf::new(),
            mapping_path: PathBuf::new(),
            out_dir: PathBuf::new(),
            long_is_fofn: false,
            mapping_is_fofn: false,
            min_aln_block: defaults::MIN_ALN_BLOCK,
            min_aln_sim: defaults::MIN_ALN_SIM,
            min_aln_mapq: defaults::MIN_ALN_MAPQ,
            max_uniq_dev: defaults::MAX_UNIQ_DEV,
            min_edge_sup: defaults::MIN_EDGE_SUP,
            num_threads: defaults::NUM_THREADS,
            prog_version: PROG_VERSION,
        }
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "contig: {}", self.contig_path.display())?;
        writeln!(
            f,
            "long reads: {}{}",
            self.long_path.display(),
            if self.long_is_fofn { " (fofn)" } else { "" }
        )?;
        writeln!(
            f,
            "mapping: {}{}",
            self.mapping_path.display(),
            if self.mapping_is_fofn { " (fofn)" } else { "" }
        )?;
        writeln!(f, "output dir: {}", self.out_dir.display())?;
        writeln!(f, "min aln block: {}", self.min_aln_block)?;
        writeln!(f, "min aln sim: {:.2}", self.min_aln_sim)?;
        writeln!(f, "min aln mapq: {}", self.min_aln_mapq)?;
        writeln!(f, "max uniq dev: {:.2}", self.max_uniq_dev)?;
        writeln!(f, "min edge sup: {}", self.min_edge_sup)?;
        write!(f, "threads: {}", self.num_threads)
    }
}

/// Fresh configuration with every default filled in.
pub fn set_defaults() -> Config {
    Config::default()
}

/// Number of threads the host can run concurrently. At least 1.
pub fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Clamp a requested thread count to `[1, max(1, hardware)]`.
pub fn clamp_threads(requested: i32, hardware: usize) -> usize {
    let Ok(requested) = usize::try_from(requested) else {
        return 1;
    };
    requested.clamp(1, hardware.max(1))
}

/// Build a validated [`Config`] from process arguments, the first of which
/// is the program name.
///
/// On success the output directory exists.
pub fn parse<I, T>(args: I) -> Result<Config, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    parse_with_concurrency(args, hardware_concurrency())
}

/// [`parse`] with the host concurrency supplied by the caller.
pub fn parse_with_concurrency<I, T>(args: I, hardware: usize) -> Result<Config, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        return Err(CliError::Usage);
    }
    let args = Args::try_parse_from(args)?;

    let mut config = set_defaults();
    config.apply(args, hardware)?;
    ensure_out_dir(&config.out_dir)?;

    if config.long_is_fofn {
        log::info!("file passed by -l is a file of file names (FOFN)");
    }
    if config.mapping_is_fofn {
        log::info!("file passed by -m is a file of file names (FOFN)");
    }
    Ok(config)
}

impl Config {
    fn apply(&mut self, args: Args, hardware: usize) -> Result<(), CliError> {
        self.contig_path = required(args.contig, "-c", "contig")?;
        self.long_path = required(args.long, "-l", "long")?;
        self.mapping_path = required(args.mapping, "-m", "mapping")?;
        self.out_dir = required(args.dir, "-d", "dir")?;

        self.long_is_fofn = args.long_fofn;
        self.mapping_is_fofn = args.mapping_fofn;

        self.min_aln_block = u32::try_from(args.aln_block).unwrap_or(defaults::MIN_ALN_BLOCK);
        self.min_aln_sim = if (0.0..=1.0).contains(&args.aln_sim) {
            args.aln_sim
        } else {
            defaults::MIN_ALN_SIM
        };
        // TODO: decide on a range for uniq-dev; it is accepted as given for now.
        self.max_uniq_dev = args.uniq_dev;
        self.min_edge_sup = u32::try_from(args.edge_sup).unwrap_or(defaults::MIN_EDGE_SUP);
        self.num_threads = clamp_threads(args.threads, hardware);
        Ok(())
    }
}

fn required(
    path: Option<OsString>,
    flag: &'static str,
    name: &'static str,
) -> Result<PathBuf, CliError> {
    match path {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Err(CliError::MissingRequired { flag, name }),
    }
}

/// Create `dir` (not its parents) with mode `rwxrwxr-x`. An existing
/// directory is accepted as is.
fn ensure_out_dir(dir: &Path) -> Result<(), CliError> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o775);
    }
    match builder.create(dir) {
        Ok(()) => {
            log::debug!("Created output directory {dir:?}");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(CliError::OutputDir {
            path: dir.to_owned(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fixed() {
        let config = set_defaults();
        assert_eq!(config, set_defaults());
        assert!(config.contig_path.as_os_str().is_empty());
        assert!(config.out_dir.as_os_str().is_empty());
        assert!(!config.long_is_fofn && !config.mapping_is_fofn);
        assert_eq!(config.min_aln_block, 500);
        assert_eq!(config.min_aln_sim, 0.85);
        assert_eq!(config.min_aln_mapq, 55);
        assert_eq!(config.max_uniq_dev, 0.15);
        assert_eq!(config.min_edge_sup, 3);
        assert_eq!(config.num_threads, 1);
        assert_eq!(config.prog_version, "0.8a1");
    }

    #[test]
    fn threads_are_clamped() {
        assert_eq!(clamp_threads(0, 8), 1);
        assert_eq!(clamp_threads(-4, 8), 1);
        assert_eq!(clamp_threads(3, 8), 3);
        assert_eq!(clamp_threads(8, 8), 8);
        assert_eq!(clamp_threads(64, 8), 8);
        assert_eq!(clamp_threads(64, 0), 1);
    }

    #[test]
    fn hardware_concurrency_is_positive() {
        assert!(hardware_concurrency() >= 1);
    }

    #[test]
    fn empty_path_is_missing() {
        let err = required(Some(OsString::new()), "-c", "contig").unwrap_err();
        assert!(matches!(err, CliError::MissingRequired { flag: "-c", .. }));
        assert!(required(None, "-d", "dir").is_err());
        assert_eq!(
            required(Some(OsString::from("a.fa")), "-c", "contig").unwrap(),
            PathBuf::from("a.fa")
        );
    }

    #[test]
    fn existing_file_is_not_an_out_dir() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let err = ensure_out_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, CliError::OutputDir { .. }));
    }
}
