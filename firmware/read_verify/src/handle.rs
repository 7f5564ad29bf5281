//! File access capability the verifier runs on top of.
//!
//! The driver under test sits behind these traits: a host build plugs in
//! `std::fs`, a firmware build plugs in the platform's simple file system
//! protocol, tests plug in the models from `sim`.

use core::fmt::Debug;

/// An open, read-only file. Dropping the handle closes it.
pub trait FileHandle {
    type Error: Debug;

    /// Size of the file in bytes.
    fn size(&mut self) -> Result<u64, Self::Error>;

    /// Issue exactly one read at the driver's current cursor.
    /// Returns the number of bytes the driver reported.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Move the driver's cursor to an absolute offset.
    fn set_position(&mut self, position: u64) -> Result<(), Self::Error>;
}

/// A mounted volume that can open files by root-relative path.
pub trait Volume {
    type Error: Debug;
    type File: FileHandle;

    fn open(&mut self, path: &str) -> Result<Self::File, Self::Error>;
}
