//! Deterministic fixture content.
//!
//! Every unit-sized block is filled with one byte value picked from a cycle of
//! sixteen (`0x00, 0x11, .. 0xFF`). The block index is global to a generator
//! run, so neighbouring blocks always differ and neighbouring files start on
//! different values.

use alloc::vec;
use alloc::vec::Vec;

/// Number of distinct blocks in a content cycle.
pub const CYCLE_LEN: u64 = 16;

/// Distance between the fill values of two consecutive cycle slots.
pub const FILL_STEP: u8 = 0x11;

/// Fill value of the block at rotation index `index`.
pub const fn fill_byte(index: u64) -> u8 {
    (index % CYCLE_LEN) as u8 * FILL_STEP
}

/// Overwrite `buf` with the content of block `index`.
pub fn fill_block(index: u64, buf: &mut [u8]) {
    buf.fill(fill_byte(index));
}

/// Materialise block `index` as a fresh `unit`-sized buffer.
pub fn block(index: u64, unit: usize) -> Vec<u8> {
    vec![fill_byte(index); unit]
}

/// Byte expected at `offset` of a file whose first block used rotation index `first_block`.
pub const fn expected_byte(first_block: u64, offset: u64, unit: u64) -> u8 {
    fill_byte(first_block + offset / unit)
}

/// Number of blocks (and therefore rotation steps) a file of `size` bytes consumes.
///
/// A trailing partial block still advances the rotation by one.
pub const fn blocks_for(size: u64, unit: u64) -> u64 {
    size.div_ceil(unit)
}
