//! Canonical Huffman table construction and symbol decoding.
//!
//! Builds the canonical code assignment described in ITU-T T.81 Annex C
//! directly from the 16 per-length symbol counts carried in a DHT segment,
//! then decodes one bit at a time against it: at each bit length, a linear
//! scan over the symbols registered for that length looks for a match.
use crate::bitstream::BitReader;
use crate::errors::DecodeErrors;

/// A single DC or AC Huffman table, built from one DHT sub-table.
#[derive(Clone)]
pub struct HuffmanTable {
    /// `offsets[l]` is the index into `symbols`/`codes` of the first code of
    /// length `l` (1-indexed by bit length, `offsets[0]` is always 0).
    pub offsets: [u16; 17],
    /// Canonical codes, one per symbol, grouped by length via `offsets`.
    pub codes: [u16; 256],
    /// Symbol values, in the order they were read from the DHT segment.
    pub symbols: [u8; 256],
    /// Total number of symbols registered (`offsets[16]`).
    pub num_symbols: usize,
    /// Whether this slot has been populated by a DHT segment.
    pub set: bool,
}

impl Default for HuffmanTable {
    fn default() -> Self {
        HuffmanTable {
            offsets: [0; 17],
            codes: [0; 256],
            symbols: [0; 256],
            num_symbols: 0,
            set: false,
        }
    }
}

impl HuffmanTable {
    /// Build a table from the 16 per-length symbol counts and the symbol
    /// list read from a DHT sub-table, in scan order.
    pub fn build(counts: &[u8; 16], symbols: &[u8]) -> Result<HuffmanTable, DecodeErrors> {
        let mut table = HuffmanTable::default();

        // offsets[l] = total number of symbols of length < l
        for length in 0..16 {
            table.offsets[length + 1] = table.offsets[length] + u16::from(counts[length]);
        }
        table.num_symbols = usize::from(table.offsets[16]);

        if table.num_symbols > symbols.len() {
            return Err(DecodeErrors::HuffmanDecode(
                "Symbol count in DHT segment exceeds the symbols actually present".to_string(),
            ));
        }
        if table.num_symbols > 256 {
            return Err(DecodeErrors::HuffmanDecode(
                "Encountered Huffman table with more than 256 symbols".to_string(),
            ));
        }

        table.symbols[..table.num_symbols].copy_from_slice(&symbols[..table.num_symbols]);

        // Canonical code assignment: codes of the same length are
        // consecutive integers; moving to the next length doubles the code
        // and appends a zero bit.
        let mut code: u16 = 0;
        let mut k = 0usize;
        for length in 0..16 {
            for _ in 0..counts[length] {
                table.codes[k] = code;
                code += 1;
                k += 1;
            }
            code <<= 1;
        }

        table.set = true;
        Ok(table)
    }

    /// Decode one symbol from the bitstream by walking bit lengths 1..=16
    /// and linearly scanning the codes registered at that length.
    pub fn decode_symbol<'a>(&self, reader: &mut BitReader<'a>) -> Result<u8, DecodeErrors> {
        let mut code: u16 = 0;
        for length in 1..=16usize {
            code = (code << 1)
                | u16::from(reader.read_bit().ok_or_else(|| {
                    DecodeErrors::EntropyDecode(
                        "Entropy-coded data exhausted while decoding a Huffman symbol".to_string(),
                    )
                })?);

            let start = usize::from(self.offsets[length - 1]);
            let end = usize::from(self.offsets[length]);
            for i in start..end {
                if self.codes[i] == code {
                    return Ok(self.symbols[i]);
                }
            }
        }
        Err(DecodeErrors::EntropyDecode(
            "No Huffman code matched after 16 bits, corrupt entropy data".to_string(),
        ))
    }
}
