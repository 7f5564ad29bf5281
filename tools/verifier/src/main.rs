use std::fs::File;
use std::process::ExitCode;

use clap::Parser;

use probe_api_types::VerifyStatus;
use verifier::cli::{Cli, parse_error_status};
use verifier::{FatVolume, HostVolume, check};

fn exit(status: VerifyStatus) -> ExitCode {
    ExitCode::from(status.code())
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return exit(parse_error_status(&err));
        }
    };

    if let Err(err) = probe_log::init(probe_log::level_from_flags(cli.verbose, cli.quiet)) {
        eprintln!("logger: {err}");
    }

    let Some(verifier) = cli.verifier() else {
        log::error!("unit size {} x {} parts is out of range", cli.unit_size, cli.parts);
        return exit(VerifyStatus::Usage);
    };
    log::debug!("sample: {} x {} bytes", verifier.parts(), verifier.unit());

    let status = match &cli.image {
        None => check(&verifier, &mut HostVolume::new(&cli.root), &cli.path),
        Some(image) => {
            let mounted = File::open(image)
                .and_then(|disk| fatfs::FileSystem::new(disk, fatfs::FsOptions::new()));
            match mounted {
                Ok(fs) => check(&verifier, &mut FatVolume::new(&fs), &cli.path),
                Err(err) => {
                    log::error!("image '{}': {err}", image.display());
                    VerifyStatus::OpenFailed
                }
            }
        }
    };
    exit(status)
}
