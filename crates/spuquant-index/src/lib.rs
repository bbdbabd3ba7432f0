//! spuquant Index - Four-colour quantization and 2-bit packing
//!
//! This crate turns a pixel buffer into a subpicture bitmap:
//!
//! - **Quantization** ([`quantize`]): decides whether a histogram is close
//!   enough to four colours and assigns a palette index to every colour
//! - **Packing** ([`codec`]): 2-bit indices, four pixels per byte, as a flat
//!   stream or as byte-aligned rows with optional neighbour-majority
//!   resolution of outlier pixels
//! - **One-call indexing** ([`index`]): histogram, quantize and pack together

pub mod codec;
pub mod error;
pub mod index;
pub mod quantize;

pub use spuquant_core;

pub use error::{IndexError, IndexResult};

pub use codec::{BitmapLayout, IndexedBitmap, pack_flat, pack_rows, row_stride, unpack};
pub use index::{
    IndexOptions, IndexedImage, build_histogram_and_index, expand_indexed, index_image,
};
pub use quantize::{
    DEFAULT_COUNT_FACTOR, IndexAssignmentPolicy, QuantizeOptions, Quantization, is_quantizable,
    quantize,
};
