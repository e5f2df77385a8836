//! Windows v2 BMP (BITMAPCOREHEADER) writer.
//!
//! 14-byte file header plus a 12-byte core DIB header, then pixel rows
//! bottom-to-top as BGR byte triples padded to a multiple of 4 bytes per
//! row. No BMP-writing crate exists anywhere in the corpus this is
//! grounded on; the layout and `put_u32`/`put_u16` little-endian helpers
//! come straight from the original `putInt`/`putShort`/`writeBMP` C++.
use std::io::Write;

use crate::errors::DecodeErrors;
use crate::header::Header;
use crate::mcu::Mcu;

fn put_u32<W: Write>(out: &mut W, value: u32) -> std::io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

fn put_u16<W: Write>(out: &mut W, value: u16) -> std::io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

/// Serialize a decoded raster to a 24-bit BITMAPCOREHEADER BMP.
///
/// `mcus` holds one `Mcu` per 8x8 slot of the padded `mcu_width_real x
/// mcu_height_real` grid; for 3-component images its R/G/B accessors hold
/// the converted color, for single-component images its R accessor holds
/// the level-shifted gray value (read for R, G and B alike).
pub fn write<W: Write>(out: &mut W, header: &Header, mcus: &[Mcu]) -> Result<(), DecodeErrors> {
    let width = u32::from(header.width);
    let height = u32::from(header.height);
    let mcu_width = header.mcu_width_real;

    let padding = width % 4;
    let size = 14 + 12 + height * width * 3 + padding * height;

    out.write_all(b"BM")?;
    put_u32(out, size)?;
    put_u32(out, 0)?;
    put_u32(out, 0x1a)?;
    put_u32(out, 12)?;
    put_u16(out, header.width)?;
    put_u16(out, header.height)?;
    put_u16(out, 1)?;
    put_u16(out, 24)?;

    let zero_padding = [0u8; 4];

    for y in (0..height as usize).rev() {
        let mcu_row = y / 8;
        let pixel_row = y % 8;
        for x in 0..width as usize {
            let mcu_col = x / 8;
            let pixel_col = x % 8;
            let slot = mcu_row * mcu_width + mcu_col;
            let pixel_index = pixel_row * 8 + pixel_col;

            let mcu = &mcus[slot];
            if header.num_components == 1 {
                let gray = mcu.r()[pixel_index] as u8;
                out.write_all(&[gray, gray, gray])?;
            } else {
                out.write_all(&[
                    mcu.b()[pixel_index] as u8,
                    mcu.g()[pixel_index] as u8,
                    mcu.r()[pixel_index] as u8,
                ])?;
            }
        }
        out.write_all(&zero_padding[..padding as usize])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write;
    use crate::components::ColorComponent;
    use crate::dequantize::QuantizationTable;
    use crate::huffman::HuffmanTable;
    use crate::header::Header;
    use crate::mcu::Mcu;

    fn single_pixel_header() -> Header {
        let comp = ColorComponent::from_sof_bytes([1, 0x11, 0]).unwrap();
        Header {
            width: 1,
            height: 1,
            num_components: 1,
            zero_based: false,
            components: vec![comp],
            quantization_tables: [QuantizationTable::default(); 4],
            dc_huffman_tables: [
                HuffmanTable::default(),
                HuffmanTable::default(),
                HuffmanTable::default(),
                HuffmanTable::default(),
            ],
            ac_huffman_tables: [
                HuffmanTable::default(),
                HuffmanTable::default(),
                HuffmanTable::default(),
                HuffmanTable::default(),
            ],
            restart_interval: 0,
            h_max: 1,
            v_max: 1,
            mcu_x: 1,
            mcu_y: 1,
            mcu_width_real: 1,
            mcu_height_real: 1,
            entropy_data: Vec::new(),
        }
    }

    #[test]
    fn single_gray_pixel_is_58_bytes() {
        let header = single_pixel_header();
        let mut mcus = vec![Mcu::default(); 1];
        for sample in mcus[0].r_mut() {
            *sample = 128;
        }
        let mut out = Vec::new();
        write(&mut out, &header, &mcus).unwrap();
        assert_eq!(out.len(), 58);
        assert_eq!(&out[0..2], b"BM");
        assert_eq!(&out[14..18], &12u32.to_le_bytes());
        // bottom-to-top with a single row means the last 3 bytes (minus
        // the 1-byte pad from width % 4 == 1) are the B,G,R triple.
        assert_eq!(&out[26..29], &[128, 128, 128]);
    }

    #[test]
    fn eight_by_eight_has_no_padding() {
        let mut header = single_pixel_header();
        header.width = 8;
        header.height = 8;
        let mcus = vec![Mcu::default(); 1];
        let mut out = Vec::new();
        write(&mut out, &header, &mcus).unwrap();
        assert_eq!(out.len(), 14 + 12 + 8 * (24));
    }
}
