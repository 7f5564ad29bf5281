//! Host build of the read-consistency verifier.

pub mod cli;
pub mod volume;

use probe_api_types::VerifyStatus;
use read_verify::{Outcome, Verifier, VerifyError, Volume};

pub use volume::{FatVolume, HostVolume, IoFile, WholeReads};

/// Run one check and log its result. Returns the process status.
pub fn check<V: Volume>(verifier: &Verifier, volume: &mut V, path: &str) -> VerifyStatus {
    let result = verifier.verify(volume, path);
    report(path, &result)
}

pub fn report(path: &str, result: &Result<Outcome, VerifyError>) -> VerifyStatus {
    match result {
        Ok(Outcome::Pass) => {
            log::info!("PASS: {path}");
            VerifyStatus::Pass
        }
        Ok(outcome @ Outcome::ContentMismatch(m)) => {
            log::error!(
                "FS DRIVER BUG! {path} (offset {:#x}: single read {:#04x}, split reads {:#04x})",
                m.offset,
                m.expected,
                m.observed
            );
            outcome.status()
        }
        Err(err) => {
            log::error!("{path}: {err}");
            err.status()
        }
    }
}
