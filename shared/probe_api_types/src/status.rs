/// Verifier result codes, also used as the verifier's process exit status.
///
/// `Pass` and `ContentMismatch` mean the test ran to completion; every other
/// code means the test could not be carried out.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyStatus {
    Pass            = 0,
    ContentMismatch = 1,
    OpenFailed      = 2,
    StatFailed      = 3,
    FileTooSmall    = 4,
    ReadFailed      = 5,
    SeekFailed      = 6,
    Usage           = 7,
}

impl VerifyStatus {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => VerifyStatus::Pass,
            1 => VerifyStatus::ContentMismatch,
            2 => VerifyStatus::OpenFailed,
            3 => VerifyStatus::StatFailed,
            4 => VerifyStatus::FileTooSmall,
            6 => VerifyStatus::SeekFailed,
            7 => VerifyStatus::Usage,
            _ => VerifyStatus::ReadFailed,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// True when the driver was actually exercised and a verdict reached.
    pub fn is_verdict(self) -> bool {
        matches!(self, VerifyStatus::Pass | VerifyStatus::ContentMismatch)
    }
}
