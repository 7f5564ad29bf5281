//! Manifest reader.
//!
//! One record per line: `<decimal size> <relative path>`. The whole file is
//! validated before the builder touches the destination, so a bad line or a
//! repeated destination never leaves a half-written tree behind.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use probe_api_types::layout;

use crate::error::{FixtureError, ManifestError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub size: u64,
    /// `/`-separated, relative, no `.`/`..`/empty segments.
    pub path: String,
    /// 1-based source line, for diagnostics.
    pub line: usize,
}

impl ManifestEntry {
    /// Directory part of `path`, `None` for files at the root.
    pub fn parent(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(dir, _)| dir)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn read(path: &Path) -> Result<Self, FixtureError> {
        let text = fs::read_to_string(path).map_err(|source| FixtureError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text)?)
    }

    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut entries = Vec::new();
        // Target volumes are case-insensitive, so `A/x.bin` and `a/X.BIN` collide.
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let mut fields = raw.split_whitespace();
            let Some(size_field) = fields.next() else { continue };
            let path_field = fields.next().ok_or_else(|| ManifestError::Malformed {
                line,
                reason: "missing destination path".into(),
            })?;
            if let Some(extra) = fields.next() {
                return Err(ManifestError::Malformed {
                    line,
                    reason: format!("unexpected trailing field '{extra}'"),
                });
            }

            let size: u64 = size_field.parse().map_err(|_| ManifestError::Malformed {
                line,
                reason: format!("'{size_field}' is not a decimal byte size"),
            })?;
            if size == 0 {
                return Err(ManifestError::ZeroSize { line });
            }

            let path = normalize_path(path_field).map_err(|reason| ManifestError::InvalidPath {
                line,
                path: path_field.to_string(),
                reason,
            })?;

            if let Some(staged) = reserved_clash(&path) {
                return Err(ManifestError::ReservedDestination { path, staged, line });
            }
            if let Some(&first_line) = seen.get(&path.to_ascii_lowercase()) {
                return Err(ManifestError::DuplicateDestination { path, first_line, line });
            }
            seen.insert(path.to_ascii_lowercase(), line);
            entries.push(ManifestEntry { size, path, line });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}

/// Staged companion path that `path` would overwrite or obstruct, compared
/// case-insensitively. A file may not sit on a staged file, on one of its
/// parent directories, or underneath it.
fn reserved_clash(path: &str) -> Option<&'static str> {
    let path = path.to_ascii_lowercase();
    layout::staged().map(|(_, staged)| staged).find(|staged| {
        let staged_lower = staged.to_ascii_lowercase();
        path == staged_lower || is_ancestor(&path, &staged_lower) || is_ancestor(&staged_lower, &path)
    })
}

fn is_ancestor(dir: &str, path: &str) -> bool {
    path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}

/// Turn a manifest path into its canonical `/`-separated relative form.
fn normalize_path(raw: &str) -> Result<String, &'static str> {
    let unified = raw.replace('\\', "/");
    if unified.starts_with('/') {
        return Err("must be relative to the volume root");
    }
    if unified.contains(':') {
        return Err("must not name a volume");
    }
    let mut out = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" => return Err("empty path segment"),
            "." | ".." => return Err("'.' and '..' segments are not allowed"),
            s => out.push(s),
        }
    }
    Ok(out.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_in_order() {
        let m = Manifest::parse("4096 a/b/f1.bin\n8192 c/f2.bin\n").unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.entries()[0], ManifestEntry { size: 4096, path: "a/b/f1.bin".into(), line: 1 });
        assert_eq!(m.entries()[1].path, "c/f2.bin");
        assert_eq!(m.total_bytes(), 12288);
    }

    #[test]
    fn accepts_backslashes_and_extra_whitespace() {
        let m = Manifest::parse("  12\t\tdir\\sub\\x.dat  \r\n").unwrap();
        assert_eq!(m.entries()[0].path, "dir/sub/x.dat");
        assert_eq!(m.entries()[0].size, 12);
    }

    #[test]
    fn skips_blank_lines_but_keeps_line_numbers() {
        let m = Manifest::parse("\n1 a\n\n   \n2 b\n").unwrap();
        assert_eq!(m.entries()[1].line, 5);
    }

    #[test]
    fn empty_input_is_empty_manifest() {
        assert!(Manifest::parse("").unwrap().is_empty());
    }

    #[test]
    fn parent_of_nested_and_root_entries() {
        let m = Manifest::parse("1 a/b/f\n1 g\n").unwrap();
        assert_eq!(m.entries()[0].parent(), Some("a/b"));
        assert_eq!(m.entries()[1].parent(), None);
    }

    #[test]
    fn rejects_missing_path() {
        assert!(matches!(
            Manifest::parse("4096\n"),
            Err(ManifestError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_trailing_fields() {
        assert!(matches!(
            Manifest::parse("1 a\n4096 my file.bin\n"),
            Err(ManifestError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_non_decimal_sizes() {
        for bad in ["0x1000 a", "-5 a", "12k a", "1.5 a"] {
            assert!(
                matches!(Manifest::parse(bad), Err(ManifestError::Malformed { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn rejects_zero_size() {
        assert_eq!(Manifest::parse("0 a"), Err(ManifestError::ZeroSize { line: 1 }));
    }

    #[test]
    fn rejects_paths_escaping_the_root() {
        for bad in ["/abs", "\\abs", "C:\\x", "a/../b", "./a", "a//b", "a/"] {
            assert!(
                matches!(Manifest::parse(&format!("1 {bad}")), Err(ManifestError::InvalidPath { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn rejects_staged_companion_paths() {
        for (text, staged) in [
            ("8192 runme.nsh", "runme.nsh"),
            ("8192 ReadCheck.EFI", "readcheck.efi"),
            ("8192 EFI\\BOOT\\BOOTX64.EFI", "efi/boot/bootx64.efi"),
        ] {
            match Manifest::parse(text) {
                Err(ManifestError::ReservedDestination { staged: s, line: 1, .. }) => assert_eq!(s, staged),
                other => panic!("{text}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_files_blocking_the_boot_directory() {
        for text in ["1 efi", "1 EFI/Boot", "1 runme.nsh/inner.bin"] {
            assert!(
                matches!(Manifest::parse(text), Err(ManifestError::ReservedDestination { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn boot_directory_neighbours_are_allowed() {
        let m = Manifest::parse("1 efi/other.bin
1 efi/boot/other.bin
1 efiboot
1 runme.nsh.bak
").unwrap();
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn rejects_duplicates_case_insensitively() {
        assert_eq!(
            Manifest::parse("1 a/x.bin\n2 b\n3 A\\X.BIN\n"),
            Err(ManifestError::DuplicateDestination { path: "A/X.BIN".into(), first_line: 1, line: 3 })
        );
    }
}
