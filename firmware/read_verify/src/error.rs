use core::fmt;

use probe_api_types::VerifyStatus;
use thiserror::Error;

/// Which read of the test failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadPass {
    /// The single full-length read.
    Single,
    /// One of the unit-sized reads, numbered from 0.
    Split(usize),
}

impl fmt::Display for ReadPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadPass::Single => f.write_str("single"),
            ReadPass::Split(part) => write!(f, "split #{part}"),
        }
    }
}

/// The test could not be carried out. Distinct from a content mismatch,
/// which is a completed test that found the defect.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("could not open file")]
    OpenFailed,

    #[error("could not query file size")]
    StatFailed,

    #[error("file is {size} bytes, the test needs at least {required}")]
    FileTooSmall { size: u64, required: u64 },

    #[error("could not reset the file position")]
    SeekFailed,

    /// `got` is `None` when the driver returned an error instead of a count.
    #[error("{pass} read returned {got:?} of {requested} bytes")]
    ReadFailed { pass: ReadPass, requested: usize, got: Option<usize> },
}

impl VerifyError {
    pub fn status(&self) -> VerifyStatus {
        match self {
            VerifyError::OpenFailed => VerifyStatus::OpenFailed,
            VerifyError::StatFailed => VerifyStatus::StatFailed,
            VerifyError::FileTooSmall { .. } => VerifyStatus::FileTooSmall,
            VerifyError::SeekFailed => VerifyStatus::SeekFailed,
            VerifyError::ReadFailed { .. } => VerifyStatus::ReadFailed,
        }
    }
}
