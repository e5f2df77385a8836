//! JPEG marker identification.
//!
//! See ITU-T T.81 Annex B for the full marker table; only the markers this
//! decoder needs to distinguish are broken out, the rest fold into the
//! `Reserved`/skip-segment handling in `header.rs`.

/// A recognized marker code, with its sub-type where the marker range
/// encodes one (`SOFn`, `APPn`, `JPGn`, `RSTn`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Marker {
    /// Start of image, 0xffd8.
    SOI,
    /// End of image, 0xffd9.
    EOI,
    /// Start of frame, 0xffc0-0xffcf except DHT/JPG/DAC. Payload is `n` in
    /// `SOFn`.
    SOF(u8),
    /// Define Huffman table(s), 0xffc4.
    DHT,
    /// Define quantization table(s), 0xffdb.
    DQT,
    /// Start of scan, 0xffda.
    SOS,
    /// Define restart interval, 0xffdd.
    DRI,
    /// Define arithmetic coding conditioning(s), 0xffcc. Not supported;
    /// recognized so it can be rejected with a precise message.
    DAC,
    /// Restart marker `n`, 0xffd0-0xffd7. Only meaningful inside a scan.
    RST(u8),
    /// Application segment `n`, 0xffe0-0xffef.
    APP(u8),
    /// Comment, 0xfffe.
    COM,
    /// Reserved JPEG extension `n`, 0xfff0-0xfffd.
    JPG(u8),
    /// Define number of lines, 0xffdc.
    DNL,
    /// Define hierarchical progression, 0xffde.
    DHP,
    /// Expand reference component(s), 0xffdf.
    EXP,
    /// Temporary private use, 0xff01.
    TEM,
}

impl Marker {
    /// Map the byte following a `0xff` marker-prefix to a `Marker`.
    ///
    /// Returns `None` for bytes with no defined meaning in this decoder's
    /// marker table (including the reserved 0xc8 "JPG" extension marker),
    /// which callers should treat as an unknown/malformed marker.
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Marker> {
        match byte {
            0x01 => Some(Marker::TEM),
            0xc0..=0xc3 | 0xc5..=0xc7 | 0xc9..=0xcb | 0xcd..=0xcf => Some(Marker::SOF(byte - 0xc0)),
            0xc4 => Some(Marker::DHT),
            0xcc => Some(Marker::DAC),
            0xd0..=0xd7 => Some(Marker::RST(byte - 0xd0)),
            0xd8 => Some(Marker::SOI),
            0xd9 => Some(Marker::EOI),
            0xda => Some(Marker::SOS),
            0xdb => Some(Marker::DQT),
            0xdc => Some(Marker::DNL),
            0xdd => Some(Marker::DRI),
            0xde => Some(Marker::DHP),
            0xdf => Some(Marker::EXP),
            0xe0..=0xef => Some(Marker::APP(byte - 0xe0)),
            0xf0..=0xfd => Some(Marker::JPG(byte - 0xf0)),
            0xfe => Some(Marker::COM),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Marker;

    #[test]
    fn sof_excludes_dht_jpg_dac() {
        assert_eq!(Marker::from_u8(0xc0), Some(Marker::SOF(0)));
        assert_eq!(Marker::from_u8(0xc4), Some(Marker::DHT));
        assert_eq!(Marker::from_u8(0xc8), None);
        assert_eq!(Marker::from_u8(0xcc), Some(Marker::DAC));
        assert_eq!(Marker::from_u8(0xcf), Some(Marker::SOF(15)));
    }

    #[test]
    fn app_and_rst_ranges() {
        assert_eq!(Marker::from_u8(0xe0), Some(Marker::APP(0)));
        assert_eq!(Marker::from_u8(0xef), Some(Marker::APP(15)));
        assert_eq!(Marker::from_u8(0xd0), Some(Marker::RST(0)));
        assert_eq!(Marker::from_u8(0xd7), Some(Marker::RST(7)));
    }
}
