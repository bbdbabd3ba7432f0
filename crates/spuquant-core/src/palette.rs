//! Palette - the fixed 4-entry colour table of a subpicture
//!
//! A subpicture bitmap stores a 2-bit index per pixel, so its palette always
//! has exactly four slots. Slots not backed by a real colour are transparent
//! black.

use crate::color;
use crate::error::{Error, Result};

/// Number of entries in a subpicture palette
pub const PALETTE_SIZE: usize = 4;

/// RGBA colour entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red component
    pub red: u8,
    /// Green component
    pub green: u8,
    /// Blue component
    pub blue: u8,
    /// Alpha component
    pub alpha: u8,
}

impl Rgba {
    /// Transparent black, used for unused palette slots
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Create a new RGBA color
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an opaque color (alpha = 255)
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, color::OPAQUE)
    }

    /// Build a colour from integer channels supplied by a host, in
    /// `(r, g, b, a)` order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColorValue`] if any channel is outside `[0, 255]`.
    pub fn from_channels(channels: [i64; 4]) -> Result<Self> {
        let mut out = [0u8; 4];
        for (slot, value) in out.iter_mut().zip(channels) {
            *slot = u8::try_from(value).map_err(|_| Error::InvalidColorValue(value))?;
        }
        let [red, green, blue, alpha] = out;
        Ok(Self::new(red, green, blue, alpha))
    }

    /// Unpack a native pixel.
    #[inline]
    pub fn from_pixel(pixel: u32) -> Self {
        let (red, green, blue, alpha) = color::extract_rgba(pixel);
        Self::new(red, green, blue, alpha)
    }

    /// Pack into a native pixel.
    #[inline]
    pub fn to_pixel(self) -> u32 {
        color::compose_rgba(self.red, self.green, self.blue, self.alpha)
    }

    /// Convert premultiplied channels to straight alpha.
    pub fn unpremultiplied(self) -> Self {
        let a = self.alpha;
        Self::new(
            color::unpremultiply(self.red, a),
            color::unpremultiply(self.green, a),
            color::unpremultiply(self.blue, a),
            a,
        )
    }

    /// Convert straight-alpha channels to premultiplied form.
    pub fn premultiplied(self) -> Self {
        let a = self.alpha;
        Self::new(
            color::premultiply(self.red, a),
            color::premultiply(self.green, a),
            color::premultiply(self.blue, a),
            a,
        )
    }
}

/// Fixed 4-colour palette. Colours are alpha-premultiplied, like the
/// native pixels they index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    colors: [Rgba; PALETTE_SIZE],
}

impl Palette {
    /// Create a palette from exactly four colours
    pub const fn new(colors: [Rgba; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    /// Create a palette from up to four colours.
    ///
    /// Colours past the fourth are ignored; missing slots are filled with
    /// [`Rgba::TRANSPARENT`].
    pub fn from_colors(colors: &[Rgba]) -> Self {
        let mut out = [Rgba::TRANSPARENT; PALETTE_SIZE];
        for (slot, c) in out.iter_mut().zip(colors) {
            *slot = *c;
        }
        Self { colors: out }
    }

    /// Create a palette from host-supplied `(r, g, b, a)` integer tuples.
    ///
    /// Same slot rules as [`Palette::from_colors`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColorValue`] if a channel of one of the first
    /// four tuples is outside `[0, 255]`.
    pub fn from_channels(tuples: &[[i64; 4]]) -> Result<Self> {
        let mut out = [Rgba::TRANSPARENT; PALETTE_SIZE];
        for (slot, tuple) in out.iter_mut().zip(tuples) {
            *slot = Rgba::from_channels(*tuple)?;
        }
        Ok(Self { colors: out })
    }

    /// Get a color by index
    pub fn get(&self, index: usize) -> Option<&Rgba> {
        self.colors.get(index)
    }

    /// All four colours in index order
    #[inline]
    pub fn colors(&self) -> &[Rgba; PALETTE_SIZE] {
        &self.colors
    }

    /// All four colours as native pixels
    pub fn pixels(&self) -> [u32; PALETTE_SIZE] {
        self.colors.map(Rgba::to_pixel)
    }
}

impl From<[Rgba; PALETTE_SIZE]> for Palette {
    fn from(colors: [Rgba; PALETTE_SIZE]) -> Self {
        Self::new(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_pixel_roundtrip() {
        let c = Rgba::new(1, 2, 3, 4);
        assert_eq!(c.to_pixel(), 0x0401_0203);
        assert_eq!(Rgba::from_pixel(0x0401_0203), c);
    }

    #[test]
    fn test_from_colors_pads_and_truncates() {
        let red = Rgba::rgb(255, 0, 0);
        let pal = Palette::from_colors(&[red]);
        assert_eq!(pal.get(0), Some(&red));
        assert_eq!(pal.get(3), Some(&Rgba::TRANSPARENT));

        let many = [red; 6];
        let pal = Palette::from_colors(&many);
        assert_eq!(pal.colors(), &[red; 4]);
        assert_eq!(pal.get(4), None);
    }

    #[test]
    fn test_from_channels_validation() {
        let pal = Palette::from_channels(&[[0, 128, 255, 255], [1, 2, 3, 4]]).unwrap();
        assert_eq!(pal.get(0), Some(&Rgba::new(0, 128, 255, 255)));
        assert_eq!(pal.get(2), Some(&Rgba::TRANSPARENT));

        let err = Palette::from_channels(&[[0, 256, 0, 0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidColorValue(256)));
        let err = Palette::from_channels(&[[0, 0, -1, 0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidColorValue(-1)));
    }

    #[test]
    fn test_from_channels_ignores_extra_tuples() {
        // The fifth tuple is out of range but never looked at
        let tuples = [[0, 0, 0, 255]; 4];
        let mut more = tuples.to_vec();
        more.push([999, 0, 0, 0]);
        assert!(Palette::from_channels(&more).is_ok());
    }

    #[test]
    fn test_premultiply_helpers() {
        let c = Rgba::new(128, 64, 0, 128);
        let straight = c.unpremultiplied();
        assert_eq!(straight, Rgba::new(255, 127, 0, 128));
        assert_eq!(straight.premultiplied(), Rgba::new(128, 63, 0, 128));
    }
}
