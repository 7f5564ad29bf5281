// No_std outside of `cargo test` so the verifier core can link it pre-OS.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod content;
pub mod layout;
pub mod path;
pub mod status;

pub use status::VerifyStatus;

/// Chunk size for fixture writes and verifier partial reads.
///
/// Kept below the NTFS cluster size of the volumes the defect shows up on,
/// so that every partial read lands inside a single cluster.
pub const UNIT_SIZE: usize = 0x1000;

/// Number of `UNIT_SIZE` reads the verifier splits its second pass into.
pub const SPLIT_PARTS: usize = 2;

/// Length of the region the verifier compares.
pub const SAMPLE_LEN: usize = UNIT_SIZE * SPLIT_PARTS;
