//! Marker-driven parsing of a JPEG byte stream into a `Header`.
//!
//! Walks segments in file order, dispatching on each marker byte, until the
//! scan header (SOS) hands off to entropy extraction and the stream
//! terminates at EOI. Grounded on the teacher's `parse_huffman`/`parse_dqt`/
//! `parse_start_of_frame`/`parse_sos` free-function shape, generalized to a
//! single pass that also performs byte-destuffed entropy extraction inline,
//! since this decoder only ever handles one scan per file.
use crate::components::ColorComponent;
use crate::dequantize::QuantizationTable;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::huffman::HuffmanTable;
use crate::markers::Marker;
use crate::misc::{read_byte, read_u16_be, UN_ZIGZAG};

/// Everything parsed out of the marker segments of a baseline JPEG, plus
/// the destuffed entropy-coded scan data ready for `mcu::decode`.
pub struct Header {
    pub width: u16,
    pub height: u16,
    pub num_components: u8,
    pub zero_based: bool,
    pub components: Vec<ColorComponent>,
    pub quantization_tables: [QuantizationTable; 4],
    pub dc_huffman_tables: [HuffmanTable; 4],
    pub ac_huffman_tables: [HuffmanTable; 4],
    pub restart_interval: u16,
    pub h_max: usize,
    pub v_max: usize,
    /// Macro-blocks across the image (ceil(width / (8 * h_max))).
    pub mcu_x: usize,
    /// Macro-blocks down the image (ceil(height / (8 * v_max))).
    pub mcu_y: usize,
    /// Width of the padded Y-sub-block grid, in 8x8 units (`mcu_x * h_max`).
    pub mcu_width_real: usize,
    /// Height of the padded Y-sub-block grid, in 8x8 units (`mcu_y * v_max`).
    pub mcu_height_real: usize,
    pub entropy_data: Vec<u8>,
}

impl Header {
    pub fn parse(data: &[u8]) -> Result<Header, DecodeErrors> {
        let mut cursor = data;

        let magic = read_u16_be(&mut cursor)?;
        if magic != 0xffd8 {
            return Err(DecodeErrors::IllegalMagicBytes(magic));
        }

        let mut header = Header {
            width: 0,
            height: 0,
            num_components: 0,
            zero_based: false,
            components: Vec::new(),
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
            mcu_x: 0,
            mcu_y: 0,
            mcu_width_real: 0,
            mcu_height_real: 0,
            entropy_data: Vec::new(),
        };

        let mut seen_sof = false;
        let mut seen_sos = false;

        // `next_marker` lets entropy extraction hand the marker it stopped
        // on straight back into this loop without re-reading a prefix.
        let mut next_marker: Option<u8> = None;

        loop {
            let marker_byte = match next_marker.take() {
                Some(b) => b,
                None => read_marker_byte(&mut cursor)?,
            };

            let marker = Marker::from_u8(marker_byte).ok_or_else(|| {
                DecodeErrors::Format(format!("Unknown marker 0xff{:02x}", marker_byte))
            })?;

            match marker {
                Marker::SOI => {
                    return Err(DecodeErrors::Format(
                        "Found a second SOI marker inside the stream".to_string(),
                    ));
                }
                Marker::EOI => {
                    if !seen_sos {
                        return Err(DecodeErrors::Format(
                            "Found EOI before any scan (SOS) was parsed".to_string(),
                        ));
                    }
                    break;
                }
                Marker::DQT => parse_dqt(&mut cursor, &mut header)?,
                Marker::DHT => parse_dht(&mut cursor, &mut header)?,
                Marker::DRI => parse_dri(&mut cursor, &mut header)?,
                Marker::DAC => {
                    return Err(DecodeErrors::Unsupported(UnsupportedSchemes::Arithmetic));
                }
                Marker::SOF(0) => {
                    if seen_sof {
                        return Err(DecodeErrors::SofError(
                            "Found a second SOF marker, hierarchical frames are not supported"
                                .to_string(),
                        ));
                    }
                    parse_sof0(&mut cursor, &mut header)?;
                    seen_sof = true;
                }
                Marker::SOF(n) => return Err(DecodeErrors::Unsupported(classify_sof(n))),
                Marker::SOS => {
                    if !seen_sof {
                        return Err(DecodeErrors::SosError(
                            "Found SOS before any SOF marker".to_string(),
                        ));
                    }
                    if seen_sos {
                        return Err(DecodeErrors::Unsupported(
                            UnsupportedSchemes::ProgressiveDctHuffman,
                        ));
                    }
                    parse_sos(&mut cursor, &mut header)?;
                    if header.num_components == 2 {
                        return Err(DecodeErrors::SofError(
                            "Images with exactly 2 components are not a valid colorspace (expected 1 or 3)"
                                .to_string(),
                        ));
                    }
                    seen_sos = true;

                    let (entropy, stop_marker) = extract_entropy_data(&mut cursor)?;
                    header.entropy_data = entropy;
                    next_marker = Some(stop_marker);
                }
                Marker::RST(_) => {
                    return Err(DecodeErrors::Format(
                        "Found a restart marker outside of scan data".to_string(),
                    ));
                }
                Marker::TEM => {
                    // Standalone marker, no length field, nothing to skip.
                }
                Marker::APP(_) | Marker::COM | Marker::JPG(_) | Marker::DNL | Marker::DHP
                | Marker::EXP => {
                    skip_segment(&mut cursor)?;
                }
            }
        }

        if !seen_sos {
            return Err(DecodeErrors::Format(
                "Reached end of file without finding a scan (SOS)".to_string(),
            ));
        }

        Ok(header)
    }
}

/// Classify an unsupported `SOFn` marker into the error taxonomy's scheme
/// families.
fn classify_sof(n: u8) -> UnsupportedSchemes {
    match n {
        1 => UnsupportedSchemes::ExtendedSequentialHuffman,
        2 => UnsupportedSchemes::ProgressiveDctHuffman,
        3 => UnsupportedSchemes::LosslessHuffman,
        5 | 6 | 7 => UnsupportedSchemes::DifferentialHuffman,
        _ => UnsupportedSchemes::Arithmetic,
    }
}

/// Read the byte after a `0xff` marker prefix, skipping any `0xff` fill
/// bytes that precede the real marker code.
fn read_marker_byte(cursor: &mut &[u8]) -> Result<u8, DecodeErrors> {
    let prefix = read_byte(cursor)?;
    if prefix != 0xff {
        return Err(DecodeErrors::Format(format!(
            "Expected a marker prefix 0xff, found {:#04x}",
            prefix
        )));
    }
    let mut code = read_byte(cursor)?;
    while code == 0xff {
        code = read_byte(cursor)?;
    }
    Ok(code)
}

/// Skip a generic length-prefixed segment (APPn, COM, JPGn, DNL, DHP, EXP)
/// whose payload this decoder has no use for.
fn skip_segment(cursor: &mut &[u8]) -> Result<(), DecodeErrors> {
    let length = read_u16_be(cursor)?;
    if length < 2 {
        return Err(DecodeErrors::Format(
            "Segment length is smaller than the length field itself".to_string(),
        ));
    }
    let skip = usize::from(length) - 2;
    if cursor.len() < skip {
        return Err(DecodeErrors::Format(
            "Segment length runs past the end of the file".to_string(),
        ));
    }
    *cursor = &cursor[skip..];
    Ok(())
}

fn parse_dri(cursor: &mut &[u8], header: &mut Header) -> Result<(), DecodeErrors> {
    let length = read_u16_be(cursor)?;
    if length != 4 {
        return Err(DecodeErrors::Format(format!(
            "DRI segment length must be 4, found {}",
            length
        )));
    }
    header.restart_interval = read_u16_be(cursor)?;
    Ok(())
}

fn parse_dqt(cursor: &mut &[u8], header: &mut Header) -> Result<(), DecodeErrors> {
    let length = read_u16_be(cursor)?;
    let mut read = 2u16;

    while read < length {
        let info = read_byte(cursor)?;
        let precision = info >> 4;
        let table_id = (info & 0x0f) as usize;
        if table_id > 3 {
            return Err(DecodeErrors::DqtError(format!(
                "Quantization table id must be between 0 and 3, found {}",
                table_id
            )));
        }

        let mut table = QuantizationTable::default();
        match precision {
            0 => {
                for i in 0..64 {
                    table.table[UN_ZIGZAG[i]] = u16::from(read_byte(cursor)?);
                }
                read += 1 + 64;
            }
            1 => {
                for i in 0..64 {
                    table.table[UN_ZIGZAG[i]] = read_u16_be(cursor)?;
                }
                read += 1 + 128;
            }
            _ => {
                return Err(DecodeErrors::DqtError(format!(
                    "Expected DQT precision of 0 or 1, found {}",
                    precision
                )));
            }
        }
        table.set = true;
        header.quantization_tables[table_id] = table;
    }

    Ok(())
}

fn parse_dht(cursor: &mut &[u8], header: &mut Header) -> Result<(), DecodeErrors> {
    let length = read_u16_be(cursor)?;
    let mut read = 2u16;

    while read < length {
        let info = read_byte(cursor)?;
        let is_ac = (info >> 4) & 1 == 1;
        let table_id = (info & 0x0f) as usize;
        if table_id > 3 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Huffman table id must be between 0 and 3, found {}",
                table_id
            )));
        }

        let mut counts = [0u8; 16];
        for count in &mut counts {
            *count = read_byte(cursor)?;
        }
        let total_symbols: u16 = counts.iter().map(|&c| u16::from(c)).sum();
        let mut symbols = vec![0u8; usize::from(total_symbols)];
        for symbol in &mut symbols {
            *symbol = read_byte(cursor)?;
        }

        let table = HuffmanTable::build(&counts, &symbols)?;
        if is_ac {
            header.ac_huffman_tables[table_id] = table;
        } else {
            header.dc_huffman_tables[table_id] = table;
        }

        read += 17 + total_symbols;
    }

    Ok(())
}

fn parse_sof0(cursor: &mut &[u8], header: &mut Header) -> Result<(), DecodeErrors> {
    let length = read_u16_be(cursor)?;
    let precision = read_byte(cursor)?;
    if precision != 8 {
        return Err(DecodeErrors::SofError(format!(
            "Only 8-bit samples are supported, found {}-bit precision",
            precision
        )));
    }

    let height = read_u16_be(cursor)?;
    let width = read_u16_be(cursor)?;
    if width == 0 || height == 0 {
        return Err(DecodeErrors::ZeroDimension);
    }

    let num_components = read_byte(cursor)?;
    if length != 8 + 3 * u16::from(num_components) {
        return Err(DecodeErrors::SofError(format!(
            "SOF length {} does not match {} components",
            length, num_components
        )));
    }
    if num_components == 0 || num_components > 3 {
        return Err(DecodeErrors::SofError(format!(
            "Expected 1 to 3 components, found {}",
            num_components
        )));
    }

    let mut components = Vec::with_capacity(usize::from(num_components));
    for _ in 0..num_components {
        let mut bytes = [0u8; 3];
        bytes[0] = read_byte(cursor)?;
        bytes[1] = read_byte(cursor)?;
        bytes[2] = read_byte(cursor)?;
        components.push(ColorComponent::from_sof_bytes(bytes)?);
    }

    for component in components.iter().skip(1) {
        if component.horizontal_sampling_factor != 1 || component.vertical_sampling_factor != 1 {
            return Err(DecodeErrors::SofError(format!(
                "Chroma sampling factors must be 1x1, found horizontal={} vertical={} for component id {}",
                component.horizontal_sampling_factor, component.vertical_sampling_factor, component.id
            )));
        }
    }

    let h_max = components
        .iter()
        .map(|c| usize::from(c.horizontal_sampling_factor))
        .max()
        .unwrap_or(1);
    let v_max = components
        .iter()
        .map(|c| usize::from(c.vertical_sampling_factor))
        .max()
        .unwrap_or(1);

    header.zero_based = components[0].id == 0;
    header.width = width;
    header.height = height;
    header.num_components = num_components;
    header.h_max = h_max;
    header.v_max = v_max;
    header.mcu_x = (usize::from(width) + 8 * h_max - 1) / (8 * h_max);
    header.mcu_y = (usize::from(height) + 8 * v_max - 1) / (8 * v_max);
    header.mcu_width_real = header.mcu_x * h_max;
    header.mcu_height_real = header.mcu_y * v_max;
    header.components = components;

    Ok(())
}

fn parse_sos(cursor: &mut &[u8], header: &mut Header) -> Result<(), DecodeErrors> {
    let _length = read_u16_be(cursor)?;
    let ns = read_byte(cursor)?;
    if ns != header.num_components {
        return Err(DecodeErrors::SosError(format!(
            "Scan declares {} components but SOF declared {}; partial scans are not supported",
            ns, header.num_components
        )));
    }

    for _ in 0..ns {
        let selector = read_byte(cursor)?;
        let tables = read_byte(cursor)?;
        let dc_id = tables >> 4;
        let ac_id = tables & 0x0f;

        let component = header
            .components
            .iter_mut()
            .find(|c| c.id == selector)
            .ok_or_else(|| {
                DecodeErrors::SosError(format!(
                    "Scan references component id {} not present in SOF",
                    selector
                ))
            })?;
        component.dc_huffman_table_id = dc_id;
        component.ac_huffman_table_id = ac_id;
    }

    let spectral_start = read_byte(cursor)?;
    let spectral_end = read_byte(cursor)?;
    let approximation = read_byte(cursor)?;

    if spectral_start != 0 || spectral_end != 63 {
        return Err(DecodeErrors::SosError(format!(
            "Baseline scans must cover the full spectral range (Ss=0, Se=63), found Ss={} Se={}",
            spectral_start, spectral_end
        )));
    }
    if approximation != 0 {
        return Err(DecodeErrors::SosError(
            "Baseline scans must not use successive approximation".to_string(),
        ));
    }

    Ok(())
}

/// Read raw scan bytes, undoing byte stuffing (`0xff 0x00` -> `0xff`) and
/// discarding restart markers, until a genuine marker is found. Returns the
/// destuffed entropy data and the marker byte that ended the scan.
fn extract_entropy_data(cursor: &mut &[u8]) -> Result<(Vec<u8>, u8), DecodeErrors> {
    let mut entropy = Vec::new();

    loop {
        let byte = read_byte(cursor)?;
        if byte != 0xff {
            entropy.push(byte);
            continue;
        }

        let mut next = read_byte(cursor)?;
        while next == 0xff {
            // Fill bytes between the 0xff and the real marker code.
            next = read_byte(cursor)?;
        }

        match next {
            0x00 => entropy.push(0xff),
            0xd0..=0xd7 => {
                // Restart marker: positionally recovered by the entropy
                // decoder's macro-block counter, so just drop it.
            }
            other => return Ok((entropy, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_baseline_jpeg() -> Vec<u8> {
        let mut bytes = vec![0xff, 0xd8];
        // DQT: one 8-bit table, id 0, all ones.
        bytes.extend_from_slice(&[0xff, 0xdb, 0x00, 0x43, 0x00]);
        bytes.extend(std::iter::repeat(1u8).take(64));
        // SOF0: 8-bit, 8x8, one grayscale component.
        bytes.extend_from_slice(&[0xff, 0xc0, 0x00, 0x0b, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01]);
        bytes.extend_from_slice(&[0x01, 0x11, 0x00]);
        // DHT: DC table id 0, a single 1-bit code -> symbol 0.
        bytes.extend_from_slice(&[0xff, 0xc4, 0x00, 0x14, 0x00]);
        bytes.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        bytes.push(0);
        // DHT: AC table id 0, a single 1-bit code -> symbol 0x00 (EOB).
        bytes.extend_from_slice(&[0xff, 0xc4, 0x00, 0x14, 0x10]);
        bytes.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        bytes.push(0);
        // SOS: one component.
        bytes.extend_from_slice(&[0xff, 0xda, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3f, 0x00]);
        // entropy data: DC code 0 then AC code 0 (EOB), padded with 1 bits.
        bytes.push(0b0000_0111);
        bytes.extend_from_slice(&[0xff, 0xd9]);
        bytes
    }

    #[test]
    fn parses_minimal_baseline_header() {
        let data = minimal_baseline_jpeg();
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.width, 8);
        assert_eq!(header.height, 8);
        assert_eq!(header.num_components, 1);
        assert_eq!(header.h_max, 1);
        assert_eq!(header.v_max, 1);
        assert_eq!(header.mcu_x, 1);
        assert_eq!(header.mcu_y, 1);
        assert!(!header.entropy_data.is_empty());
    }

    #[test]
    fn rejects_bad_magic() {
        let data = [0x00, 0x00, 0xff, 0xd9];
        assert!(Header::parse(&data).is_err());
    }

    #[test]
    fn rejects_progressive_sof2() {
        let mut data = vec![0xff, 0xd8, 0xff, 0xc2, 0x00, 0x0b];
        data.extend_from_slice(&[0x08, 0x00, 0x08, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00]);
        assert!(Header::parse(&data).is_err());
    }

    #[test]
    fn rejects_non_1x1_chroma_sampling() {
        // SOF0, 3 components: luma 2x2, Cb 2x1 (not 1x1) -> rejected before
        // any DHT/SOS is needed, since parse_sof0 errors out first.
        let mut data = vec![0xff, 0xd8, 0xff, 0xc0, 0x00, 0x11];
        data.extend_from_slice(&[0x08, 0x00, 0x08, 0x00, 0x08, 0x03]);
        data.extend_from_slice(&[0x01, 0x22, 0x00]);
        data.extend_from_slice(&[0x02, 0x21, 0x00]);
        data.extend_from_slice(&[0x03, 0x11, 0x00]);
        assert!(Header::parse(&data).is_err());
    }
}
