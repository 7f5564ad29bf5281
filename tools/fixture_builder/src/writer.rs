//! Fixture writer.
//!
//! Files are written in manifest order, one unit at a time. Each unit is a
//! content block taken from a rotation index that runs across the whole
//! manifest: file N+1 starts on the block after file N's last block. The
//! index is passed into and returned from every file write so a run is a
//! pure function of its manifest.

use std::io::Write;

use probe_api_types::content::fill_block;

use crate::destination::Destination;
use crate::error::FixtureError;
use crate::manifest::{Manifest, ManifestEntry};

pub struct FixtureWriter {
    unit: usize,
    /// The only content buffer; refilled for every block.
    buf:  Vec<u8>,
}

impl FixtureWriter {
    /// `None` when `unit` is zero.
    pub fn new(unit: usize) -> Option<Self> {
        if unit == 0 {
            return None;
        }
        Some(Self { unit, buf: vec![0; unit] })
    }

    pub fn unit(&self) -> usize {
        self.unit
    }

    /// Write every manifest entry, starting the rotation at 0.
    /// Returns the rotation index after the last block.
    pub fn write_manifest<D: Destination + ?Sized>(
        &mut self,
        dest: &mut D,
        manifest: &Manifest,
    ) -> Result<u64, FixtureError> {
        let mut rotation = 0;
        for entry in manifest.entries() {
            rotation = self.write_entry(dest, entry, rotation)?;
        }
        Ok(rotation)
    }

    /// Create one fixture file. `rotation` is the index of its first block;
    /// the returned value is the index for the next file.
    pub fn write_entry<D: Destination + ?Sized>(
        &mut self,
        dest: &mut D,
        entry: &ManifestEntry,
        rotation: u64,
    ) -> Result<u64, FixtureError> {
        let shown = dest.display_path(&entry.path);

        if let Some(dir) = entry.parent() {
            dest.create_dir_all(dir).map_err(|source| FixtureError::DirectoryCreate {
                path: shown.clone(),
                source,
            })?;
        }

        let mut out = dest.create_file(&entry.path).map_err(|source| FixtureError::FileCreate {
            path: shown.clone(),
            source,
        })?;

        log::info!("CREATING: {shown} ({} bytes)", entry.size);
        let next = self.write_blocks(&mut out, entry.size, rotation, &shown)?;

        out.flush().map_err(|source| FixtureError::Close { path: shown.clone(), source })?;
        log::debug!("{shown}: blocks {rotation}..{next}");
        Ok(next)
    }

    fn write_blocks(
        &mut self,
        out: &mut dyn Write,
        size: u64,
        mut rotation: u64,
        shown: &str,
    ) -> Result<u64, FixtureError> {
        let mut remaining = size;
        while remaining > 0 {
            let chunk = remaining.min(self.unit as u64) as usize;
            let block = &mut self.buf[..chunk];
            fill_block(rotation, block);
            let written = out.write(block).map_err(|source| FixtureError::Write {
                path: shown.to_string(),
                source,
            })?;
            // A trailing partial block still consumes a rotation step.
            rotation += 1;
            if written != chunk {
                return Err(FixtureError::ShortWrite {
                    path: shown.to_string(),
                    expected: chunk,
                    written,
                });
            }
            remaining -= written as u64;
        }
        Ok(rotation)
    }
}
