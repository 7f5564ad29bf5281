//! Where fixtures are written.
//!
//! `HostDir` writes through the host OS onto a mounted drive or directory.
//! `FatImage` formats a raw FAT volume with `fatfs` and writes into it, so a
//! fixture can be produced without a spare device.
//!
//! All paths passed in are the manifest's normalised `/`-separated form.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use probe_api_types::path::segments;

// ─── Destination abstraction ───────────────────────────────────────────────────

pub trait Destination {
    /// Create `dir` and any missing parents. Existing directories are kept.
    fn create_dir_all(&mut self, dir: &str) -> io::Result<()>;

    /// Create `path`, or truncate it if it already is a file. Parents must exist.
    ///
    /// `flush` on the returned writer only succeeds once the data has left
    /// the builder's buffers.
    fn create_file(&mut self, path: &str) -> io::Result<Box<dyn Write + '_>>;

    /// Location of `path` as shown to the operator.
    fn display_path(&self, path: &str) -> String;

    /// Copy a host file to `path`. Parents must exist.
    fn copy_in(&mut self, from: &Path, path: &str) -> io::Result<u64> {
        let mut src = File::open(from)?;
        let mut out = self.create_file(path)?;
        let copied = io::copy(&mut src, &mut out)?;
        out.flush()?;
        Ok(copied)
    }
}

// ─── Host directory ────────────────────────────────────────────────────────────

pub struct HostDir {
    root: PathBuf,
}

impl HostDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        full.extend(segments(path));
        full
    }
}

impl Destination for HostDir {
    fn create_dir_all(&mut self, dir: &str) -> io::Result<()> {
        fs::create_dir_all(self.resolve(dir))
    }

    fn create_file(&mut self, path: &str) -> io::Result<Box<dyn Write + '_>> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.resolve(path))?;
        Ok(Box::new(SyncOnFlush(file)))
    }

    fn display_path(&self, path: &str) -> String {
        self.resolve(path).display().to_string()
    }
}

/// Removable media is often yanked right after the tool exits; make `flush`
/// wait for the device.
struct SyncOnFlush(File);

impl Write for SyncOnFlush {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()?;
        self.0.sync_all()
    }
}

// ─── FAT image ─────────────────────────────────────────────────────────────────

pub struct FatImage<T: Read + Write + Seek> {
    fs:    fatfs::FileSystem<T>,
    label: String,
}

/// Volume label written by `format`.
pub const IMAGE_LABEL: [u8; 11] = *b"READPROBE  ";

impl FatImage<File> {
    /// Create a new image file of `size` bytes and format it. Refuses to
    /// overwrite an existing file.
    pub fn create(path: &Path, size: u64) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;
        file.set_len(size)?;
        Self::format(file, path.display().to_string())
    }
}

impl<T: Read + Write + Seek> FatImage<T> {
    /// Format `disk` (its whole length) and mount the fresh volume.
    pub fn format(mut disk: T, label: impl Into<String>) -> io::Result<Self> {
        fatfs::format_volume(&mut disk, fatfs::FormatVolumeOptions::new().volume_label(IMAGE_LABEL))?;
        disk.seek(SeekFrom::Start(0))?;
        Self::open(disk, label)
    }

    /// Mount an already formatted volume.
    pub fn open(disk: T, label: impl Into<String>) -> io::Result<Self> {
        let fs = fatfs::FileSystem::new(disk, fatfs::FsOptions::new())?;
        Ok(Self { fs, label: label.into() })
    }

    /// Flush FAT metadata and release the disk.
    pub fn unmount(self) -> io::Result<()> {
        self.fs.unmount()
    }
}

impl<T: Read + Write + Seek> Destination for FatImage<T> {
    fn create_dir_all(&mut self, dir: &str) -> io::Result<()> {
        let mut cur = self.fs.root_dir();
        for segment in segments(dir) {
            cur = cur.create_dir(segment)?;
        }
        Ok(())
    }

    fn create_file(&mut self, path: &str) -> io::Result<Box<dyn Write + '_>> {
        let mut file = self.fs.root_dir().create_file(path)?;
        file.truncate()?;
        Ok(Box::new(WholeWrites(file)))
    }

    fn display_path(&self, path: &str) -> String {
        format!("{}::/{path}", self.label)
    }
}

/// fatfs stops each write at the end of the current cluster. Present every
/// chunk as a single complete write so cluster size does not leak into the
/// builder's short-write check.
struct WholeWrites<W>(W);

impl<W: Write> Write for WholeWrites<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}
