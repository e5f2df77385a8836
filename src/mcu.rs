//! Entropy decoding: walks the macro-block grid and fills one `Mcu` per
//! 8x8 Y/Cb/Cr sub-block slot.
//!
//! Grounded on the teacher's MCU decode control flow (outer macro-block
//! loop, per-component Huffman table lookup ahead of the per-block hot
//! loop) and on the original C++ decoder's `decodeMCUComponent` for the
//! exact DC-prediction/extended-sign/zig-zag arithmetic.
use crate::bitstream::BitReader;
use crate::errors::DecodeErrors;
use crate::header::Header;
use crate::misc::UN_ZIGZAG;

/// One 8x8 slot of the MCU grid. During entropy decode and dequantize/IDCT
/// it holds a luma or chroma sample plane; after color conversion the same
/// storage holds the corresponding R/G/B plane (see the `r`/`g`/`b`
/// accessors). Two array fields cover the three aliased interpretations:
/// the luma slot (`channel0`, read as Y then written as R) and the two
/// chroma slots (`channel1`/`channel2`, Cb/Cr then G/B).
#[derive(Clone, Copy)]
pub struct Mcu {
    channel0: [i32; 64],
    channel1: [i32; 64],
    channel2: [i32; 64],
}

impl Default for Mcu {
    fn default() -> Self {
        Mcu {
            channel0: [0; 64],
            channel1: [0; 64],
            channel2: [0; 64],
        }
    }
}

impl Mcu {
    pub fn y(&self) -> &[i32; 64] {
        &self.channel0
    }
    pub fn y_mut(&mut self) -> &mut [i32; 64] {
        &mut self.channel0
    }
    pub fn cb(&self) -> &[i32; 64] {
        &self.channel1
    }
    pub fn cr(&self) -> &[i32; 64] {
        &self.channel2
    }
    pub fn r_mut(&mut self) -> &mut [i32; 64] {
        &mut self.channel0
    }
    pub fn g_mut(&mut self) -> &mut [i32; 64] {
        &mut self.channel1
    }
    pub fn b_mut(&mut self) -> &mut [i32; 64] {
        &mut self.channel2
    }
    pub fn r(&self) -> &[i32; 64] {
        &self.channel0
    }
    pub fn g(&self) -> &[i32; 64] {
        &self.channel1
    }
    pub fn b(&self) -> &[i32; 64] {
        &self.channel2
    }
    /// Slot 0 is always luma/Y; used when a caller is generic over
    /// component index (entropy decode, IDCT).
    pub fn channel_mut(&mut self, index: usize) -> &mut [i32; 64] {
        match index {
            0 => &mut self.channel0,
            1 => &mut self.channel1,
            _ => &mut self.channel2,
        }
    }
    pub fn channel(&self, index: usize) -> &[i32; 64] {
        match index {
            0 => &self.channel0,
            1 => &self.channel1,
            _ => &self.channel2,
        }
    }
}

/// Decode every macro-block of `header`'s scan data into the full
/// `mcu_width_real x mcu_height_real` slot grid.
pub fn decode(header: &mut Header) -> Result<Vec<Mcu>, DecodeErrors> {
    let mut mcus = vec![Mcu::default(); header.mcu_width_real * header.mcu_height_real];
    let mut reader = BitReader::new(&header.entropy_data);

    // interval_macroblocks = R * Hmax * Vmax, restated here as a per-
    // macro-block counter: one pass of this loop body decodes exactly one
    // macro-block (the full Hmax*Vmax luma grid plus one Cb and one Cr
    // block), so comparing that counter to R directly reproduces "reset
    // every R macro-blocks" without re-deriving Hmax*Vmax.
    let mut macroblock_counter: usize = 0;

    for mb_row in 0..header.mcu_y {
        for mb_col in 0..header.mcu_x {
            if header.restart_interval != 0
                && macroblock_counter != 0
                && macroblock_counter % usize::from(header.restart_interval) == 0
            {
                for component in &mut header.components {
                    component.dc_prediction = 0;
                }
                reader.align();
            }

            for comp_idx in 0..header.components.len() {
                let (h_factor, v_factor) = if comp_idx == 0 {
                    (
                        usize::from(header.components[0].horizontal_sampling_factor),
                        usize::from(header.components[0].vertical_sampling_factor),
                    )
                } else {
                    (1, 1)
                };

                for v in 0..v_factor {
                    for h in 0..h_factor {
                        let slot = if comp_idx == 0 {
                            (mb_row * header.v_max + v) * header.mcu_width_real
                                + (mb_col * header.h_max + h)
                        } else {
                            (mb_row * header.v_max) * header.mcu_width_real
                                + (mb_col * header.h_max)
                        };
                        decode_block(header, comp_idx, &mut reader, &mut mcus[slot])?;
                    }
                }
            }

            macroblock_counter += 1;
        }
    }

    Ok(mcus)
}

fn decode_block(
    header: &mut Header,
    comp_idx: usize,
    reader: &mut BitReader,
    mcu: &mut Mcu,
) -> Result<(), DecodeErrors> {
    let dc_table_id = usize::from(header.components[comp_idx].dc_huffman_table_id);
    let ac_table_id = usize::from(header.components[comp_idx].ac_huffman_table_id);

    let mut block = [0i32; 64];

    let dc_size = header.dc_huffman_tables[dc_table_id].decode_symbol(reader)?;
    if dc_size > 11 {
        return Err(DecodeErrors::EntropyDecode(format!(
            "DC coefficient magnitude category {} exceeds the 8-bit-sample maximum of 11",
            dc_size
        )));
    }
    let diff = reader.receive_extend(dc_size)?;
    header.components[comp_idx].dc_prediction += diff;
    block[0] = header.components[comp_idx].dc_prediction;

    let mut k = 1usize;
    while k < 64 {
        let rs = header.ac_huffman_tables[ac_table_id].decode_symbol(reader)?;
        let run = usize::from(rs >> 4);
        let size = rs & 0x0f;

        if size == 0 {
            if run == 15 {
                // ZRL: 16 zero coefficients, no value follows.
                k += 16;
                continue;
            }
            // EOB: remaining coefficients in this block are zero.
            break;
        }
        if size > 10 {
            return Err(DecodeErrors::EntropyDecode(format!(
                "AC coefficient magnitude category {} exceeds the 8-bit-sample maximum of 10",
                size
            )));
        }

        k += run;
        if k >= 64 {
            return Err(DecodeErrors::EntropyDecode(
                "AC run length overruns the 64-coefficient block".to_string(),
            ));
        }

        let value = reader.receive_extend(size)?;
        block[UN_ZIGZAG[k]] = value;
        k += 1;
    }

    *mcu.channel_mut(comp_idx) = block;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ColorComponent;
    use crate::dequantize::QuantizationTable;
    use crate::huffman::HuffmanTable;

    fn single_component_header(entropy_data: Vec<u8>) -> Header {
        let mut counts_dc = [0u8; 16];
        counts_dc[0] = 1;
        let dc_table = HuffmanTable::build(&counts_dc, &[0]).unwrap();

        let mut counts_ac = [0u8; 16];
        counts_ac[0] = 1;
        let ac_table = HuffmanTable::build(&counts_ac, &[0x00]).unwrap();

        let mut component = ColorComponent::from_sof_bytes([1, 0x11, 0]).unwrap();
        component.dc_huffman_table_id = 0;
        component.ac_huffman_table_id = 0;

        Header {
            width: 8,
            height: 8,
            num_components: 1,
            zero_based: false,
            components: vec![component],
            quantization_tables: [QuantizationTable::default(); 4],
            dc_huffman_tables: [
                dc_table,
                HuffmanTable::default(),
                HuffmanTable::default(),
                HuffmanTable::default(),
            ],
            ac_huffman_tables: [
                ac_table,
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
            entropy_data,
        }
    }

    #[test]
    fn decodes_single_all_zero_block() {
        // DC code "0" -> symbol 0 (zero-length diff), AC code "0" -> EOB.
        let mut header = single_component_header(vec![0b0000_0000]);
        let mcus = decode(&mut header).unwrap();
        assert_eq!(mcus.len(), 1);
        assert_eq!(mcus[0].y(), &[0i32; 64]);
    }

    #[test]
    fn rejects_ac_size_greater_than_ten() {
        // AC code "0" -> symbol 0x0b (run=0, size=11), which exceeds the
        // 8-bit-sample maximum magnitude category of 10.
        let mut header = single_component_header(vec![0b0000_0000]);
        let mut counts_ac = [0u8; 16];
        counts_ac[0] = 1;
        header.ac_huffman_tables[0] = HuffmanTable::build(&counts_ac, &[0x0b]).unwrap();
        assert!(decode(&mut header).is_err());
    }

    #[test]
    fn restart_interval_resets_dc_prediction() {
        // Two 1x1 macro-blocks, restart interval of 1: each block's DC
        // code "0" decodes a fresh zero prediction rather than accumulating.
        let mut header = single_component_header(vec![0b0000_0000, 0b0000_0000]);
        header.mcu_x = 2;
        header.mcu_width_real = 2;
        header.restart_interval = 1;
        let mcus = decode(&mut header).unwrap();
        assert_eq!(mcus.len(), 2);
        assert_eq!(mcus[0].y()[0], 0);
        assert_eq!(mcus[1].y()[0], 0);
    }
}
