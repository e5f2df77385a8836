#![allow(clippy::needless_return, clippy::similar_names, clippy::inline_always)]
#![warn(clippy::correctness, clippy::perf)]
#[macro_use]
extern crate log;

pub mod bitstream;
pub mod bmp;
pub mod color_convert;
pub mod components;
pub mod dequantize;
pub mod errors;
pub mod header;
pub mod huffman;
pub mod idct;
pub mod markers;
pub mod mcu;
pub mod misc;
pub mod pipeline;

pub use crate::errors::DecodeErrors;
pub use crate::header::Header;
pub use crate::pipeline::decode_to_bmp;
