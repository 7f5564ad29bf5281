//! Destination argument handling and the system-volume guard.

use std::path::{Path, PathBuf};

use crate::error::FixtureError;

/// Drive letter of the running system on the platforms the tool targets.
const SYSTEM_DRIVE: char = 'C';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A drive designator such as `F:`.
    Drive(char),
    /// A mounted volume or plain directory.
    Directory(PathBuf),
    /// A raw FAT image file to create, `size` bytes long.
    Image { path: PathBuf, size: u64 },
}

impl Target {
    /// Interpret the positional destination argument.
    ///
    /// `X:` (optionally followed by one separator) is a drive; anything else a
    /// directory. Anything on the system drive, and the filesystem root, is
    /// refused.
    pub fn parse(arg: &str) -> Result<Self, FixtureError> {
        if on_system_drive(arg) {
            return Err(FixtureError::ForbiddenTarget(arg.to_string()));
        }
        if let Some(letter) = drive_letter(arg) {
            return Ok(Target::Drive(letter.to_ascii_uppercase()));
        }
        if arg.len() == 2 && arg.ends_with(':') {
            return Err(FixtureError::Usage(format!("'{arg}' is not a drive designator")));
        }
        if arg.is_empty() {
            return Err(FixtureError::Usage("destination must not be empty".into()));
        }
        let path = PathBuf::from(arg);
        if is_filesystem_root(&path) {
            return Err(FixtureError::ForbiddenTarget(arg.to_string()));
        }
        Ok(Target::Directory(path))
    }

    /// Image destination of `size_mib` MiB at `arg`.
    pub fn image(arg: &str, size_mib: u64) -> Result<Self, FixtureError> {
        if arg.is_empty() {
            return Err(FixtureError::Usage("image path must not be empty".into()));
        }
        let size = size_mib
            .checked_mul(1024 * 1024)
            .filter(|&s| s > 0)
            .ok_or_else(|| FixtureError::Usage(format!("invalid image size {size_mib} MiB")))?;
        Ok(Target::Image { path: PathBuf::from(arg), size })
    }

    /// Root the fixture tree is written under (the image file for images).
    pub fn root(&self) -> PathBuf {
        match self {
            Target::Drive(letter) => PathBuf::from(format!("{letter}:\\")),
            Target::Directory(path) => path.clone(),
            Target::Image { path, .. } => path.clone(),
        }
    }

    /// Make sure the destination can be used, without modifying it.
    pub fn check_available(&self) -> Result<(), FixtureError> {
        match self {
            Target::Drive(_) | Target::Directory(_) => {
                let root = self.root();
                if root.is_dir() { Ok(()) } else { Err(FixtureError::TargetUnavailable(root)) }
            }
            Target::Image { path, .. } => {
                let parent = match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                if path.exists() || !parent.is_dir() {
                    Err(FixtureError::TargetUnavailable(path.clone()))
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn drive_letter(arg: &str) -> Option<char> {
    let mut chars = arg.chars();
    let letter = chars.next()?;
    if !letter.is_ascii_alphabetic() || chars.next()? != ':' {
        return None;
    }
    match chars.as_str() {
        "" | "\\" | "/" => Some(letter),
        _ => None,
    }
}

fn on_system_drive(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next().is_some_and(|c| c.eq_ignore_ascii_case(&SYSTEM_DRIVE)) && chars.next() == Some(':')
}

fn is_filesystem_root(path: &Path) -> bool {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    resolved.parent().is_none() && resolved.has_root()
}
