//! Files the fixture builder expects next to it, and where they end up on
//! the target volume.
//!
//! The verifier's launch script refers to the staged names, so both sides of
//! the test must agree on this table.

/// Role of a companion file in the staged boot payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompanionRole {
    Manifest,
    LaunchScript,
    Verifier,
    BootShim,
}

#[derive(Clone, Copy, Debug)]
pub struct Companion {
    pub role:        CompanionRole,
    /// Name in the builder's source directory.
    pub source_name: &'static str,
    /// Destination relative to the target root; `None` when not staged.
    pub staged_path: Option<&'static str>,
}

/// Directory firmware searches for the removable-media bootloader.
pub const BOOT_DIR: &str = "efi/boot";

/// Removable-media bootloader name for x86_64 firmware.
pub const BOOTLOADER_NAME: &str = "bootx64.efi";

pub static COMPANIONS: [Companion; 4] = [
    Companion {
        role:        CompanionRole::Manifest,
        source_name: "list.txt",
        staged_path: None,
    },
    Companion {
        role:        CompanionRole::LaunchScript,
        source_name: "runme.nsh",
        staged_path: Some("runme.nsh"),
    },
    Companion {
        role:        CompanionRole::Verifier,
        source_name: "readcheck.efi",
        staged_path: Some("readcheck.efi"),
    },
    Companion {
        role:        CompanionRole::BootShim,
        source_name: "shellx64.efi",
        staged_path: Some("efi/boot/bootx64.efi"),
    },
];

pub fn companion(role: CompanionRole) -> &'static Companion {
    match role {
        CompanionRole::Manifest     => &COMPANIONS[0],
        CompanionRole::LaunchScript => &COMPANIONS[1],
        CompanionRole::Verifier     => &COMPANIONS[2],
        CompanionRole::BootShim     => &COMPANIONS[3],
    }
}

/// Companions copied onto the target, in copy order.
pub fn staged() -> impl Iterator<Item = (&'static Companion, &'static str)> {
    COMPANIONS.iter().filter_map(|c| c.staged_path.map(|p| (c, p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_table_role() {
        for c in &COMPANIONS {
            assert_eq!(companion(c.role).role, c.role);
        }
    }

    #[test]
    fn manifest_is_not_staged() {
        assert!(companion(CompanionRole::Manifest).staged_path.is_none());
        assert_eq!(staged().count(), 3);
    }

    #[test]
    fn boot_shim_lands_on_bootloader_path() {
        let shim = companion(CompanionRole::BootShim);
        let staged = shim.staged_path.unwrap();
        assert!(staged.starts_with(BOOT_DIR));
        assert!(staged.ends_with(BOOTLOADER_NAME));
    }
}
