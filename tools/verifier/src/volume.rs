//! Host-side `Volume` backends for the read-consistency check.
//!
//! `HostVolume` resolves paths under a directory and reads through the host
//! kernel's driver for whatever volume is mounted there. `FatVolume` reads
//! files straight out of a FAT image through `fatfs`.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

use probe_api_types::path::segments;
use read_verify::{FileHandle, Volume};

// ─── Handle adapter ────────────────────────────────────────────────────────────

/// Any seekable reader as a verifier file handle. Each `read` is forwarded
/// as exactly one call to the inner reader.
pub struct IoFile<T: Read + Seek>(T);

impl<T: Read + Seek> IoFile<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Read + Seek> FileHandle for IoFile<T> {
    type Error = io::Error;

    fn size(&mut self) -> io::Result<u64> {
        let pos = self.0.stream_position()?;
        let end = self.0.seek(SeekFrom::End(0))?;
        self.0.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }

    fn set_position(&mut self, position: u64) -> io::Result<()> {
        self.0.seek(SeekFrom::Start(position)).map(drop)
    }
}

// ─── Host directory ────────────────────────────────────────────────────────────

pub struct HostVolume {
    root: PathBuf,
}

impl HostVolume {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Volume for HostVolume {
    type Error = io::Error;
    type File = IoFile<File>;

    fn open(&mut self, path: &str) -> io::Result<Self::File> {
        let mut full = self.root.clone();
        full.extend(segments(path));
        File::open(full).map(IoFile::new)
    }
}

// ─── FAT image ─────────────────────────────────────────────────────────────────

pub struct FatVolume<'a, T: Read + io::Write + Seek> {
    fs: &'a fatfs::FileSystem<T>,
}

impl<'a, T: Read + io::Write + Seek> FatVolume<'a, T> {
    pub fn new(fs: &'a fatfs::FileSystem<T>) -> Self {
        Self { fs }
    }
}

impl<'a, T: Read + io::Write + Seek> Volume for FatVolume<'a, T> {
    type Error = io::Error;
    type File = IoFile<WholeReads<fatfs::File<'a, T>>>;

    fn open(&mut self, path: &str) -> io::Result<Self::File> {
        let fs: &'a fatfs::FileSystem<T> = self.fs;
        let path = segments(path).collect::<Vec<_>>().join("/");
        let file = fs.root_dir().open_file(&path)?;
        Ok(IoFile::new(WholeReads(file)))
    }
}

/// fatfs ends every read at a cluster boundary. The image is only the
/// carrier here, so fill the buffer the way a block driver would.
pub struct WholeReads<R>(R);

impl<R: Read> Read for WholeReads<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.0.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Seek> Seek for WholeReads<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.seek(pos)
    }
}
