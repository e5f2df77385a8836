#![allow(dead_code)]
//! Small shared constants and byte-reading helpers used across the decode
//! pipeline.

use std::io::Read;

use crate::errors::DecodeErrors;

/// Read a single byte, treating end-of-data as a malformed-input error.
pub fn read_byte<R: Read>(buf: &mut R) -> Result<u8, DecodeErrors> {
    let mut byte = [0u8; 1];
    buf.read_exact(&mut byte)
        .map_err(|_| DecodeErrors::Format("Unexpected end of data".to_string()))?;
    Ok(byte[0])
}

/// Read a big-endian `u16`, treating end-of-data as a malformed-input error.
pub fn read_u16_be<R: Read>(buf: &mut R) -> Result<u16, DecodeErrors> {
    let mut bytes = [0u8; 2];
    buf.read_exact(&mut bytes)
        .map_err(|_| DecodeErrors::Format("Unexpected end of data".to_string()))?;
    Ok(u16::from_be_bytes(bytes))
}

/// Undoes zig-zag run ordering: `UN_ZIGZAG[i]` is the raster-order position
/// of the coefficient that arrived `i`-th in scan order.
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; 64] = [
    0,  1,  8,  16, 9,  2,  3, 10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];
