//! Read-consistency check.
//!
//! The first `unit × parts` bytes of a file are read twice: once in a single
//! call, then again (after an explicit seek to 0) as `parts` consecutive
//! unit-sized calls that rely on the driver advancing its own cursor. A
//! correct driver returns the same bytes both times. A driver with the cursor
//! reset defect serves the start of the file again on a later partial read.
//!
//! One file per call, one pass, terminal on the first error.

use alloc::vec;

use probe_api_types::path::strip_volume_prefix;
use probe_api_types::{SPLIT_PARTS, UNIT_SIZE, VerifyStatus};

use crate::error::{ReadPass, VerifyError};
use crate::handle::{FileHandle, Volume};

// ─── Result types ──────────────────────────────────────────────────────────────

/// First byte at which the split reads disagreed with the single read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub offset:   usize,
    pub expected: u8,
    pub observed: u8,
}

/// A completed test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    ContentMismatch(Mismatch),
}

impl Outcome {
    pub fn status(&self) -> VerifyStatus {
        match self {
            Outcome::Pass => VerifyStatus::Pass,
            Outcome::ContentMismatch(_) => VerifyStatus::ContentMismatch,
        }
    }
}

/// Steps of the check, in order. Only used for tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Opened,
    Sized,
    FirstReadDone,
    Repositioned,
    SecondReadsDone,
    Compared,
}

// ─── Verifier ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verifier {
    unit:  usize,
    parts: usize,
}

impl Default for Verifier {
    fn default() -> Self {
        Self { unit: UNIT_SIZE, parts: SPLIT_PARTS }
    }
}

impl Verifier {
    /// `unit` must be non-zero and `parts` at least 2; `None` otherwise.
    pub fn new(unit: usize, parts: usize) -> Option<Self> {
        if unit == 0 || parts < 2 {
            return None;
        }
        unit.checked_mul(parts)?;
        Some(Self { unit, parts })
    }

    pub fn unit(&self) -> usize { self.unit }
    pub fn parts(&self) -> usize { self.parts }

    /// Bytes compared by one run; also the minimum file size.
    pub fn sample_len(&self) -> usize { self.unit * self.parts }

    /// Open `path` on `volume` and run the check on it.
    ///
    /// A leading volume designator (`F:\`, `FS0:\`) is stripped first. The
    /// handle is closed before returning, whatever the result.
    pub fn verify<V: Volume>(&self, volume: &mut V, path: &str) -> Result<Outcome, VerifyError> {
        let path = strip_volume_prefix(path);
        let mut file = volume.open(path).map_err(|err| {
            log::debug!("{path}: open: {err:?}");
            VerifyError::OpenFailed
        })?;
        trace_stage(path, Stage::Opened);
        self.verify_file(&mut file, path)
    }

    /// Run the check on an already opened handle positioned at offset 0.
    /// `path` is only used for diagnostics.
    pub fn verify_file<F: FileHandle>(&self, file: &mut F, path: &str) -> Result<Outcome, VerifyError> {
        let size = file.size().map_err(|err| {
            log::debug!("{path}: stat: {err:?}");
            VerifyError::StatFailed
        })?;
        let required = self.sample_len() as u64;
        if size < required {
            return Err(VerifyError::FileTooSmall { size, required });
        }
        trace_stage(path, Stage::Sized);

        let mut single = vec![0u8; self.sample_len()];
        read_once(file, &mut single, ReadPass::Single, path)?;
        trace_stage(path, Stage::FirstReadDone);

        // Under a correct driver this is a no-op for the reads that follow.
        file.set_position(0).map_err(|err| {
            log::debug!("{path}: set position: {err:?}");
            VerifyError::SeekFailed
        })?;
        trace_stage(path, Stage::Repositioned);

        let mut split = vec![0u8; self.sample_len()];
        for (part, chunk) in split.chunks_exact_mut(self.unit).enumerate() {
            read_once(file, chunk, ReadPass::Split(part), path)?;
        }
        trace_stage(path, Stage::SecondReadsDone);

        let outcome = match first_difference(&single, &split) {
            None => Outcome::Pass,
            Some(offset) => Outcome::ContentMismatch(Mismatch {
                offset,
                expected: single[offset],
                observed: split[offset],
            }),
        };
        trace_stage(path, Stage::Compared);
        Ok(outcome)
    }
}

// ─── Helpers ───────────────────────────────────────────────────────────────────

fn trace_stage(path: &str, stage: Stage) {
    log::trace!("{path}: {stage:?}");
}

/// One driver read that must fill `buf` completely.
fn read_once<F: FileHandle>(
    file: &mut F,
    buf: &mut [u8],
    pass: ReadPass,
    path: &str,
) -> Result<(), VerifyError> {
    let requested = buf.len();
    match file.read(buf) {
        Ok(n) if n == requested => Ok(()),
        Ok(n) => {
            log::debug!("{path}: {pass} read: short read, {n} of {requested} bytes");
            Err(VerifyError::ReadFailed { pass, requested, got: Some(n) })
        }
        Err(err) => {
            log::debug!("{path}: {pass} read: {err:?}");
            Err(VerifyError::ReadFailed { pass, requested, got: None })
        }
    }
}

pub fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter().zip(b).position(|(x, y)| x != y)
}

// ─── Unit tests ────────────────────────────────────────────────────────────────
