use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::builder::TypedValueParser;

use fixture_builder::target::Target;
use fixture_builder::{BuildConfig, build};

// ── CLI definition ──────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "fixture_builder",
    version,
    about = "Write read-verification fixtures and the boot payload onto a removable volume"
)]
struct Cli {
    /// Drive (`F:`), mounted volume directory, or image file with --image-size.
    target: String,

    /// Directory holding list.txt and the boot companions.
    #[arg(long, default_value = ".")]
    source: PathBuf,

    /// Fixture block size in bytes.
    #[arg(long, default_value_t = probe_api_types::UNIT_SIZE,
          value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    unit_size: usize,

    /// Create TARGET as a fresh FAT image of this many MiB instead of
    /// writing to a mounted volume.
    #[arg(long, value_name = "MIB")]
    image_size: Option<u64>,

    /// More output; repeat for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    if let Err(err) = probe_log::init(probe_log::level_from_flags(cli.verbose, cli.quiet)) {
        eprintln!("logger: {err}");
    }

    let target = match cli.image_size {
        Some(mib) => Target::image(&cli.target, mib),
        None => Target::parse(&cli.target),
    };
    let config = match target {
        Ok(target) => BuildConfig { target, source: cli.source, unit: cli.unit_size },
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match build(&config) {
        Ok(summary) => {
            log::info!(
                "{} files ({} bytes) written, {} companions staged on {}",
                summary.files,
                summary.bytes,
                summary.copied,
                config.target.root().display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
