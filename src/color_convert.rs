#![allow(clippy::many_single_char_names)]
//! YCbCr -> RGB conversion with nearest-neighbor chroma upsampling.
//!
//! `R = Y + 1.402·Cr`, `G = Y - 0.344·Cb - 0.714·Cr`, `B = Y + 1.772·Cb`,
//! each biased by 128 and clamped to `0..=255`, generalized here from the
//! teacher's fixed-point `color_convert/scalar.rs` coefficients to plain
//! floats. Chroma is shared by every luma sub-block of a macro-block, so
//! each sub-block's chroma sample is looked up with `cbcr_row = y/Vmax +
//! (8/Vmax)*v`, `cbcr_col = x/Hmax + (8/Hmax)*h` against a snapshot of the
//! macro-block's one Cb/Cr block, taken before any sub-block's Y plane is
//! overwritten with its R value.
use crate::header::Header;
use crate::mcu::Mcu;

#[inline(always)]
fn clamp(value: f32) -> i32 {
    (value as i32).max(0).min(255)
}

/// Level-shift a single-component (grayscale) MCU grid in place: `R = G =
/// B = clamp(Y + 128)`, written into the luma slot so the BMP writer can
/// read it back through `Mcu::r`.
pub fn level_shift_grayscale(mcus: &mut [Mcu]) {
    for mcu in mcus {
        for sample in mcu.r_mut() {
            *sample = clamp(*sample as f32 + 128.0);
        }
    }
}

/// Convert every macro-block of a 3-component MCU grid from YCbCr to RGB,
/// in place, upsampling chroma by nearest neighbor.
pub fn convert(header: &Header, mcus: &mut [Mcu]) {
    let h_max = header.h_max;
    let v_max = header.v_max;

    for mb_row in 0..header.mcu_y {
        for mb_col in 0..header.mcu_x {
            let chroma_slot = (mb_row * v_max) * header.mcu_width_real + (mb_col * h_max);
            let cb = *mcus[chroma_slot].cb();
            let cr = *mcus[chroma_slot].cr();

            for v in 0..v_max {
                for h in 0..h_max {
                    let slot =
                        (mb_row * v_max + v) * header.mcu_width_real + (mb_col * h_max + h);
                    convert_block(&mut mcus[slot], &cb, &cr, h, v, h_max, v_max);
                }
            }
        }
    }
}

fn convert_block(
    mcu: &mut Mcu,
    cb: &[i32; 64],
    cr: &[i32; 64],
    h: usize,
    v: usize,
    h_max: usize,
    v_max: usize,
) {
    let y_plane = *mcu.y();

    for row in 0..8 {
        for col in 0..8 {
            let cbcr_row = row / v_max + (8 / v_max) * v;
            let cbcr_col = col / h_max + (8 / h_max) * h;

            let y = y_plane[row * 8 + col] as f32;
            let cb_val = cb[cbcr_row * 8 + cbcr_col] as f32;
            let cr_val = cr[cbcr_row * 8 + cbcr_col] as f32;

            let r = clamp(y + 1.402 * cr_val + 128.0);
            let g = clamp(y - 0.344 * cb_val - 0.714 * cr_val + 128.0);
            let b = clamp(y + 1.772 * cb_val + 128.0);

            mcu.r_mut()[row * 8 + col] = r;
            mcu.g_mut()[row * 8 + col] = g;
            mcu.b_mut()[row * 8 + col] = b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{convert, level_shift_grayscale};
    use crate::components::ColorComponent;
    use crate::dequantize::QuantizationTable;
    use crate::header::Header;
    use crate::huffman::HuffmanTable;
    use crate::mcu::Mcu;

    fn header_4_4_4() -> Header {
        let comp = |id| ColorComponent::from_sof_bytes([id, 0x11, 0]).unwrap();
        Header {
            width: 8,
            height: 8,
            num_components: 3,
            zero_based: false,
            components: vec![comp(1), comp(2), comp(3)],
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
    fn zero_ycbcr_is_mid_gray() {
        let header = header_4_4_4();
        let mut mcus = vec![Mcu::default(); 1];
        convert(&header, &mut mcus);
        assert_eq!(mcus[0].r(), &[128i32; 64]);
        assert_eq!(mcus[0].g(), &[128i32; 64]);
        assert_eq!(mcus[0].b(), &[128i32; 64]);
    }

    #[test]
    fn grayscale_level_shift() {
        let mut mcus = vec![Mcu::default(); 1];
        level_shift_grayscale(&mut mcus);
        assert_eq!(mcus[0].r(), &[128i32; 64]);
    }

    #[test]
    fn grayscale_clamps_at_bounds() {
        let mut mcus = vec![Mcu::default(); 1];
        mcus[0].y_mut()[0] = 200;
        mcus[0].y_mut()[1] = -200;
        level_shift_grayscale(&mut mcus);
        assert_eq!(mcus[0].r()[0], 255);
        assert_eq!(mcus[0].r()[1], 0);
    }
}
