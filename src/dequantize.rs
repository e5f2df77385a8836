//! Quantization tables and the dequantize step.
use crate::errors::DecodeErrors;

/// One DQT table: 64 coefficients in zig-zag order, already un-zig-zagged
/// into raster order at parse time (mirroring `UN_ZIGZAG`'s use elsewhere).
#[derive(Clone, Copy)]
pub struct QuantizationTable {
    pub table: [u16; 64],
    pub set: bool,
}

impl Default for QuantizationTable {
    fn default() -> Self {
        QuantizationTable {
            table: [0; 64],
            set: false,
        }
    }
}

/// Multiply each raster-order coefficient by the matching quantization
/// value, in place. Grounded directly on the flat `channel * quantization`
/// elementwise product used throughout the teacher's MCU pipeline.
pub fn dequantize(block: &mut [i32; 64], table: &QuantizationTable) -> Result<(), DecodeErrors> {
    if !table.set {
        return Err(DecodeErrors::DqtError(
            "Component references a quantization table that was never defined".to_string(),
        ));
    }
    for i in 0..64 {
        block[i] *= i32::from(table.table[i]);
    }
    Ok(())
}
