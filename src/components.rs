//! Per-component metadata extracted from a SOF0 segment.
use crate::errors::DecodeErrors;

/// One color component (Y, Cb or Cr) as declared in the frame header.
#[derive(Clone, Copy, Debug)]
pub struct ColorComponent {
    /// Component identifier as it appeared in the SOF segment, before the
    /// zero-based remap described in the header parser.
    pub id: u8,
    /// Horizontal sampling factor (1 or 2).
    pub horizontal_sampling_factor: u8,
    /// Vertical sampling factor (1 or 2).
    pub vertical_sampling_factor: u8,
    /// Index into `Header::quantization_tables`.
    pub quantization_table_id: u8,
    /// Index into `Header::dc_huffman_tables`, set when parsing SOS.
    pub dc_huffman_table_id: u8,
    /// Index into `Header::ac_huffman_tables`, set when parsing SOS.
    pub ac_huffman_table_id: u8,
    /// The running DC predictor for this component during entropy decode.
    pub dc_prediction: i32,
}

impl ColorComponent {
    /// Parse the 3-byte per-component record from a SOF0 segment.
    pub fn from_sof_bytes(bytes: [u8; 3]) -> Result<ColorComponent, DecodeErrors> {
        let id = bytes[0];
        let horizontal_sampling_factor = bytes[1] >> 4;
        let vertical_sampling_factor = bytes[1] & 0x0f;
        let quantization_table_id = bytes[2];

        if horizontal_sampling_factor == 0
            || horizontal_sampling_factor > 2
            || vertical_sampling_factor == 0
            || vertical_sampling_factor > 2
        {
            return Err(DecodeErrors::SofError(format!(
                "Sampling factors other than 1 or 2 are not supported, found horizontal={} vertical={}",
                horizontal_sampling_factor, vertical_sampling_factor
            )));
        }
        if quantization_table_id > 3 {
            return Err(DecodeErrors::SofError(format!(
                "Quantization table selector must be between 0 and 3, found {}",
                quantization_table_id
            )));
        }

        Ok(ColorComponent {
            id,
            horizontal_sampling_factor,
            vertical_sampling_factor,
            quantization_table_id,
            dc_huffman_table_id: 0,
            ac_huffman_table_id: 0,
            dc_prediction: 0,
        })
    }
}
