//! In-memory driver models.
//!
//! `DriverModel::Correct` keeps its cursor like any sane file system.
//! `DriverModel::CursorReset` reproduces the defect: after a read that is
//! shorter than the previous one, the cursor snaps back to offset 0 instead
//! of advancing.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use probe_api_types::path::segments;

use crate::handle::{FileHandle, Volume};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverModel {
    Correct,
    CursorReset,
}

/// One-shot failure injected into every file the volume opens.
/// Read calls are numbered from 0 per handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    Stat,
    Seek,
    ReadError { call: usize },
    ShortRead { call: usize, len: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimError {
    NotFound,
    Injected,
}

// ─── Volume ────────────────────────────────────────────────────────────────────

pub struct MemVolume {
    model:        DriverModel,
    files:        BTreeMap<String, Rc<[u8]>>,
    fault:        Option<Fault>,
    open_handles: Rc<Cell<usize>>,
}

impl MemVolume {
    pub fn new(model: DriverModel) -> Self {
        Self {
            model,
            files: BTreeMap::new(),
            fault: None,
            open_handles: Rc::new(Cell::new(0)),
        }
    }

    /// Add or replace a file. Either separator is accepted.
    pub fn insert(&mut self, path: &str, data: Vec<u8>) {
        self.files.insert(normalize(path), data.into());
    }

    pub fn inject(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }

    /// Handles opened and not yet dropped.
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }
}

impl Volume for MemVolume {
    type Error = SimError;
    type File = MemFile;

    fn open(&mut self, path: &str) -> Result<MemFile, SimError> {
        let data = self.files.get(&normalize(path)).ok_or(SimError::NotFound)?.clone();
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(MemFile {
            data,
            model: self.model,
            fault: self.fault,
            position: 0,
            last_read: None,
            reads: 0,
            open_handles: self.open_handles.clone(),
        })
    }
}

fn normalize(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

// ─── File ──────────────────────────────────────────────────────────────────────

pub struct MemFile {
    data:         Rc<[u8]>,
    model:        DriverModel,
    fault:        Option<Fault>,
    position:     u64,
    last_read:    Option<usize>,
    reads:        usize,
    open_handles: Rc<Cell<usize>>,
}

impl MemFile {
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl FileHandle for MemFile {
    type Error = SimError;

    fn size(&mut self) -> Result<u64, SimError> {
        if self.fault == Some(Fault::Stat) {
            return Err(SimError::Injected);
        }
        Ok(self.data.len() as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SimError> {
        let call = self.reads;
        self.reads += 1;

        let mut want = buf.len();
        match self.fault {
            Some(Fault::ReadError { call: c }) if c == call => return Err(SimError::Injected),
            Some(Fault::ShortRead { call: c, len }) if c == call => want = want.min(len),
            _ => {}
        }

        let start = (self.position as usize).min(self.data.len());
        let n = want.min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);

        let shorter = self.last_read.is_some_and(|prev| buf.len() < prev);
        self.position = match self.model {
            DriverModel::CursorReset if shorter => 0,
            _ => (start + n) as u64,
        };
        self.last_read = Some(buf.len());
        Ok(n)
    }

    fn set_position(&mut self, position: u64) -> Result<(), SimError> {
        if self.fault == Some(Fault::Seek) {
            return Err(SimError::Injected);
        }
        self.position = position;
        Ok(())
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        self.open_handles.set(self.open_handles.get() - 1);
    }
}
