//! Errors that can be encountered decoding a JPEG or writing a BMP.
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Common decode/encode errors.
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors {
    /// First two bytes were not the SOI marker `0xFFD8`.
    IllegalMagicBytes(u16),
    /// A marker segment's framing or field values didn't make sense.
    Format(String),
    /// Width or height decoded to zero.
    ZeroDimension,
    /// Problems with the quantization tables (DQT segment).
    DqtError(String),
    /// Problems with the scan header (SOS segment).
    SosError(String),
    /// Problems with the frame header (SOF0 segment).
    SofError(String),
    /// Problems building or walking a Huffman table.
    HuffmanDecode(String),
    /// A frame type this decoder does not implement.
    Unsupported(UnsupportedSchemes),
    /// Entropy-coded data ran out, overflowed, or produced an impossible run.
    EntropyDecode(String),
    /// Underlying filesystem I/O failed.
    Io(std::io::Error),
    /// A validated size could not be allocated.
    ResourceError(String),
}
impl Debug for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::IllegalMagicBytes(bytes) => {
                write!(f, "Not a JPEG file, expected SOI 0xffd8, found {:#06x}", bytes)
            }
            Self::Format(ref reason) => write!(f, "Malformed JPEG. Reason:{}", reason),
            Self::ZeroDimension => write!(f, "Image width or height is set to zero, cannot continue"),
            Self::DqtError(ref reason) => write!(f, "Error parsing DQT segment. Reason:{}", reason),
            Self::SosError(ref reason) => write!(f, "Error parsing SOS Segment. Reason:{}", reason),
            Self::SofError(ref reason) => write!(f, "Error parsing SOF segment. Reason:{}", reason),
            Self::HuffmanDecode(ref reason) => {
                write!(f, "Error building huffman tables.Reason:{}", reason)
            }
            Self::Unsupported(ref image_type) => {
                write!(f, "{:?}", image_type)
            }
            Self::EntropyDecode(ref reason) => {
                write!(f, "Error decoding entropy-coded data.Reason:{}", reason)
            }
            Self::Io(ref err) => write!(f, "I/O error:{}", err),
            Self::ResourceError(ref reason) => write!(f, "Resource error:{}", reason),
        }
    }
}
impl Display for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}
impl Error for DecodeErrors {}

impl From<std::io::Error> for DecodeErrors {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Frame types this decoder recognizes in SOFn markers but refuses to decode.
#[derive(Eq, PartialEq, Copy, Clone)]
pub enum UnsupportedSchemes {
    /// SOF1, extended sequential DCT, Huffman coding
    ExtendedSequentialHuffman,
    /// SOF2, progressive DCT, Huffman coding
    ProgressiveDctHuffman,
    /// SOF3, lossless sequential, Huffman coding
    LosslessHuffman,
    /// SOF5, SOF6 or SOF7, differential/hierarchical frames
    DifferentialHuffman,
    /// SOF9, SOF10, SOF11, SOF13, SOF14 or SOF15, arithmetic coding variants
    Arithmetic,
}
impl Debug for UnsupportedSchemes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::ExtendedSequentialHuffman => write!(
                f,
                "This decoder only handles baseline SOF0 frames, found extended sequential DCT (SOF1)"
            ),
            Self::ProgressiveDctHuffman => write!(
                f,
                "This decoder only handles baseline SOF0 frames, found progressive DCT (SOF2)"
            ),
            Self::LosslessHuffman => write!(
                f,
                "This decoder only handles baseline SOF0 frames, found lossless sequential (SOF3)"
            ),
            Self::DifferentialHuffman => write!(
                f,
                "This decoder only handles baseline SOF0 frames, found a differential/hierarchical frame"
            ),
            Self::Arithmetic => write!(
                f,
                "This decoder only handles baseline Huffman frames, found an arithmetic-coded frame"
            ),
        }
    }
}
