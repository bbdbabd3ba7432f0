//! spuquant Core - Pixel model and colour analysis for subpicture quantization
//!
//! This crate provides the building blocks shared by the rest of the
//! workspace:
//!
//! - [`color`] - native ARGB pixel packing and alpha (un)premultiplication
//! - [`Rgba`] / [`Palette`] - the fixed 4-entry subpicture palette
//! - [`colorspace`] - fixed-point HSV and the weighted colour distance
//! - [`ColorHistogram`] - exact histogram of distinct pixel values
//! - [`convert`] - RGB(A) byte rows to native pixels and back to serial RGBA
//!
//! Nothing here holds state between calls; every structure is built and
//! dropped within the operation that needs it.

pub mod colorspace;
pub mod convert;
pub mod error;
pub mod histogram;
pub mod palette;

pub use colorspace::{Hsv, distance, rgb_to_hsv};
pub use convert::{
    PixbufInfo, PixbufProperties, PropertyValue, convert_native_to_serial_rgba,
    convert_rgb_to_native_opaque, pixels_from_native_bytes, pixels_to_native_bytes,
};
pub use error::{Error, Result};
pub use histogram::{ColorHistogram, HistogramEntry};
pub use palette::{PALETTE_SIZE, Palette, Rgba};

/// Channel helpers for native 32-bit pixels.
///
/// # Pixel format
///
/// Native pixels are packed as `A << 24 | R << 16 | G << 8 | B` and stored in
/// host byte order. Colour channels are alpha-premultiplied.
pub mod color {
    /// Shift amounts for extracting color channels
    pub const ALPHA_SHIFT: u32 = 24;
    pub const RED_SHIFT: u32 = 16;
    pub const GREEN_SHIFT: u32 = 8;
    pub const BLUE_SHIFT: u32 = 0;

    /// Fully opaque alpha value
    pub const OPAQUE: u8 = 255;

    /// Extract red component from a native pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a native pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a native pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a native pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose an opaque native pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, OPAQUE)
    }

    /// Compose a native pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((a as u32) << ALPHA_SHIFT)
            | ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
    }

    /// Extract RGBA values from a native pixel.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// Scale a premultiplied channel back to straight alpha.
    ///
    /// Returns 0 when `alpha` is 0. Channels larger than their alpha are not
    /// valid premultiplied data and saturate at 255.
    #[inline]
    pub fn unpremultiply(channel: u8, alpha: u8) -> u8 {
        if alpha == 0 {
            return 0;
        }
        (channel as u32 * 255 / alpha as u32).min(255) as u8
    }

    /// Scale a straight-alpha channel by its alpha.
    #[inline]
    pub fn premultiply(channel: u8, alpha: u8) -> u8 {
        (channel as u32 * alpha as u32 / 255) as u8
    }

}
