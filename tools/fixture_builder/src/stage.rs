//! Companion files: the prerequisite check and the boot payload copy.

use std::path::{Path, PathBuf};

use probe_api_types::layout::{self, BOOT_DIR};

use crate::destination::Destination;
use crate::error::FixtureError;

/// Every companion must be a regular file in `source_dir`. Runs before the
/// destination is touched.
pub fn check_prerequisites(source_dir: &Path) -> Result<(), FixtureError> {
    for companion in &layout::COMPANIONS {
        let path = source_dir.join(companion.source_name);
        if !path.is_file() {
            return Err(FixtureError::MissingPrerequisite(path));
        }
    }
    Ok(())
}

pub fn companion_path(source_dir: &Path, role: layout::CompanionRole) -> PathBuf {
    source_dir.join(layout::companion(role).source_name)
}

/// Copy the launch script, the verifier and the boot shim onto the
/// destination. The first failure aborts; whatever was already copied stays.
pub fn stage_companions<D: Destination + ?Sized>(dest: &mut D, source_dir: &Path) -> Result<usize, FixtureError> {
    dest.create_dir_all(BOOT_DIR).map_err(|source| FixtureError::DirectoryCreate {
        path: dest.display_path(BOOT_DIR),
        source,
    })?;

    let mut copied = 0;
    for (companion, staged) in layout::staged() {
        let from = source_dir.join(companion.source_name);
        let to = dest.display_path(staged);
        log::info!("COPYING: {to}");
        dest.copy_in(&from, staged)
            .map_err(|source| FixtureError::Copy { from, to, source })?;
        copied += 1;
    }
    Ok(copied)
}
