//! Host-side fixture builder.
//!
//! Populates a removable volume (or a raw FAT image) with the files listed in
//! a manifest, filled with the rotating block pattern the firmware verifier
//! expects, and stages the boot payload next to them.

pub mod destination;
pub mod error;
pub mod manifest;
pub mod stage;
pub mod target;
pub mod writer;

use std::path::{Path, PathBuf};

use probe_api_types::layout::CompanionRole;

use destination::{Destination, FatImage, HostDir};
use error::FixtureError;
use manifest::Manifest;
use target::Target;
use writer::FixtureWriter;

#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub target: Target,
    /// Directory holding the manifest and the boot companions.
    pub source: PathBuf,
    pub unit:   usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub files:  usize,
    pub bytes:  u64,
    /// Rotation steps consumed, i.e. the index the next file would start on.
    pub blocks: u64,
    pub copied: usize,
}

/// Run a whole build.
///
/// Every check that can fail without side effects runs first: prerequisites,
/// destination access, then the full manifest. Only after all of them pass is
/// the destination written.
pub fn build(config: &BuildConfig) -> Result<BuildSummary, FixtureError> {
    if config.unit == 0 {
        return Err(FixtureError::Usage("unit size must be greater than zero".into()));
    }
    stage::check_prerequisites(&config.source)?;
    config.target.check_available()?;
    let manifest = Manifest::read(&stage::companion_path(&config.source, CompanionRole::Manifest))?;
    log::debug!(
        "manifest: {} entries, {} bytes",
        manifest.len(),
        manifest.total_bytes()
    );

    match &config.target {
        Target::Drive(_) | Target::Directory(_) => {
            let mut dest = HostDir::new(config.target.root());
            populate(&mut dest, &manifest, &config.source, config.unit)
        }
        Target::Image { path, size } => {
            let image_err = |source| FixtureError::Image { path: path.clone(), source };
            let mut dest = FatImage::create(path, *size).map_err(image_err)?;
            let summary = populate(&mut dest, &manifest, &config.source, config.unit)?;
            dest.unmount().map_err(image_err)?;
            Ok(summary)
        }
    }
}

/// Write the manifest's fixtures, then stage the companions, into `dest`.
pub fn populate<D: Destination + ?Sized>(
    dest: &mut D,
    manifest: &Manifest,
    source_dir: &Path,
    unit: usize,
) -> Result<BuildSummary, FixtureError> {
    let mut writer = FixtureWriter::new(unit)
        .ok_or_else(|| FixtureError::Usage("unit size must be greater than zero".into()))?;
    let blocks = writer.write_manifest(dest, manifest)?;
    log::debug!("{} blocks of {} bytes written", blocks, writer.unit());
    let copied = stage::stage_companions(dest, source_dir)?;
    Ok(BuildSummary {
        files: manifest.len(),
        bytes: manifest.total_bytes(),
        blocks,
        copied,
    })
}
