//! spuquant-io - Paletted image I/O for subpicture bitmaps
//!
//! Writes packed 2-bit bitmaps with their four-colour palette as indexed
//! PNGs, and reads the palette (and bitmap) back. Input is staged through a
//! lenient byte source that tolerates a short read.
//!
//! # Features
//!
//! - `png-format` (default): PNG support via the `png` crate

pub mod error;
pub mod source;

#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use source::{LenientReader, StagedInput, stage_png};

#[cfg(feature = "png-format")]
pub use crate::png::{
    PalettedPng, PngPalette, read_paletted_png, read_png_palette, write_paletted_png,
};
