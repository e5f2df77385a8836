//! Composes the whole JPEG-to-BMP path for a single input: parse, entropy
//! decode, dequantize, IDCT, color-convert, BMP-write.
//!
//! Grounded on the teacher's `Decoder::decode_internal` stage order,
//! trimmed to the single baseline path this decoder supports (no
//! progressive refinement passes, no worker threads).
use std::io::Write;

use crate::color_convert;
use crate::dequantize::dequantize;
use crate::errors::DecodeErrors;
use crate::header::Header;
use crate::idct::idct_block;
use crate::{bmp, mcu};

/// Decode one complete JPEG byte stream and write its raster as a BMP to
/// `out`. A failure at any stage aborts this call without writing
/// anything further to `out`.
pub fn decode_to_bmp<W: Write>(jpeg_bytes: &[u8], out: &mut W) -> Result<(), DecodeErrors> {
    let mut header = Header::parse(jpeg_bytes)?;
    let mut mcus = mcu::decode(&mut header)?;

    for mcu in &mut mcus {
        for comp_idx in 0..header.components.len() {
            let table_id = usize::from(header.components[comp_idx].quantization_table_id);
            let block = mcu.channel_mut(comp_idx);
            dequantize(block, &header.quantization_tables[table_id])?;
            idct_block(block);
        }
    }

    if header.num_components == 3 {
        color_convert::convert(&header, &mut mcus);
    } else {
        color_convert::level_shift_grayscale(&mut mcus);
    }

    bmp::write(out, &header, &mcus)
}

#[cfg(test)]
mod tests {
    use super::decode_to_bmp;

    fn minimal_baseline_jpeg() -> Vec<u8> {
        let mut bytes = vec![0xff, 0xd8];
        bytes.extend_from_slice(&[0xff, 0xdb, 0x00, 0x43, 0x00]);
        bytes.extend(std::iter::repeat(1u8).take(64));
        bytes.extend_from_slice(&[0xff, 0xc0, 0x00, 0x0b, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01]);
        bytes.extend_from_slice(&[0x01, 0x11, 0x00]);
        bytes.extend_from_slice(&[0xff, 0xc4, 0x00, 0x14, 0x00]);
        bytes.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        bytes.push(0);
        bytes.extend_from_slice(&[0xff, 0xc4, 0x00, 0x14, 0x10]);
        bytes.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        bytes.push(0);
        bytes.extend_from_slice(&[0xff, 0xda, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3f, 0x00]);
        bytes.push(0b0000_0111);
        bytes.extend_from_slice(&[0xff, 0xd9]);
        bytes
    }

    #[test]
    fn decodes_minimal_grayscale_jpeg_to_a_bmp() {
        let jpeg = minimal_baseline_jpeg();
        let mut out = Vec::new();
        decode_to_bmp(&jpeg, &mut out).unwrap();
        // 14 + 12 header bytes, 8x8 pixels, 3 bytes each, no row padding.
        assert_eq!(out.len(), 14 + 12 + 8 * 8 * 3);
        assert_eq!(&out[0..2], b"BM");
        // An all-zero-coefficient block IDCTs to zero then level-shifts to 128.
        assert_eq!(&out[26..29], &[128, 128, 128]);
    }

    #[test]
    fn rejects_truncated_input() {
        let mut out = Vec::new();
        assert!(decode_to_bmp(&[0xff, 0xd8], &mut out).is_err());
    }
}
