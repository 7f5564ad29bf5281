//! Command line of the host verifier.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::TypedValueParser;

use probe_api_types::{SPLIT_PARTS, UNIT_SIZE, VerifyStatus};
use read_verify::Verifier;

#[derive(Debug, Parser)]
#[command(
    name = "verifier",
    version,
    about = "Detect file system drivers that lose their read cursor after a partial read"
)]
pub struct Cli {
    /// File to check, relative to the volume root. A leading `F:\` is ignored.
    pub path: String,

    /// Directory the volume is mounted on.
    #[arg(long, default_value = ".", conflicts_with = "image")]
    pub root: PathBuf,

    /// Read the file out of this FAT image instead of a mounted volume.
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Size of each split read in bytes.
    #[arg(long, default_value_t = UNIT_SIZE,
          value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub unit_size: usize,

    /// Number of unit-sized reads in the second pass.
    #[arg(long, default_value_t = SPLIT_PARTS,
          value_parser = clap::value_parser!(u64).range(2..).map(|v| v as usize))]
    pub parts: usize,

    /// More output; repeat for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// The configured check, or `None` when `unit × parts` does not fit in memory.
    pub fn verifier(&self) -> Option<Verifier> {
        Verifier::new(self.unit_size, self.parts)
    }
}

/// Exit status for a command line clap refused. Help and version requests
/// are not failures.
pub fn parse_error_status(err: &clap::Error) -> VerifyStatus {
    if err.use_stderr() { VerifyStatus::Usage } else { VerifyStatus::Pass }
}
