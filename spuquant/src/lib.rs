//! spuquant - Subtitle bitmaps to DVD subpictures
//!
//! Reduces rendered subtitle or menu images to the 4-colour, 2-bit-per-pixel
//! format of a DVD subpicture unit, and moves the result in and out of
//! paletted PNG files.
//!
//! # Overview
//!
//! - Pixel model, histogram and colour distance ([`spuquant_core`])
//! - Quantization and 2-bit packing ([`index`])
//! - Paletted PNG I/O ([`io`])
//!
//! # Example
//!
//! ```
//! use spuquant::{Palette, build_histogram_and_index, expand_indexed};
//!
//! let red = 0xFFFF_0000;
//! let (bitmap, histogram) = build_histogram_and_index(&[red; 16], 50).unwrap();
//! assert_eq!(bitmap.as_deref(), Some(&[0u8; 4][..]));
//! assert_eq!(histogram[0].1, 16);
//!
//! let palette = Palette::from_colors(&[histogram[0].0]);
//! let pixels = expand_indexed(&bitmap.unwrap(), &palette).unwrap();
//! assert_eq!(pixels, vec![red; 16]);
//! ```

// Re-export core types (pixel model used everywhere)
pub use spuquant_core::*;

// Re-export the other crates as modules
pub use spuquant_index as index;
pub use spuquant_io as io;

// Host-facing operations
pub use spuquant_index::{build_histogram_and_index, expand_indexed};
pub use spuquant_io::{read_png_palette, write_paletted_png};
