// No_std when not testing, so the engine builds for freestanding targets.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod engine;
pub mod error;
pub mod handle;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use engine::{Mismatch, Outcome, Stage, Verifier};
pub use error::{ReadPass, VerifyError};
pub use handle::{FileHandle, Volume};
