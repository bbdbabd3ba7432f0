//! Pixel format conversion at the system boundary
//!
//! Three layouts meet here:
//!
//! - RGB or RGBA byte rows with a row stride (pixbuf style, straight bytes)
//! - native pixels, `A << 24 | R << 16 | G << 8 | B` in host byte order
//! - serial RGBA, four bytes `R, G, B, A` per pixel
//!
//! Conversions between native and serial RGBA are exact.

use crate::color;
use crate::error::{Error, Result};

/// Value of a named host property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Int(i64),
    Bool(bool),
}

/// Named-property lookup on a host image object.
///
/// Implemented by whatever wraps the host pixbuf; returns `None` for an
/// unknown property.
pub trait PixbufProperties {
    fn property(&self, name: &str) -> Option<PropertyValue>;
}

/// Geometry of an RGB(A) byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixbufInfo {
    /// Pixels per row
    pub width: u32,
    /// Number of rows
    pub height: u32,
    /// Bytes from the start of one row to the start of the next
    pub row_stride: usize,
    /// Whether each pixel carries a fourth, alpha byte
    pub has_alpha: bool,
    /// Bytes per pixel as reported by the host
    pub n_channels: u32,
}

impl PixbufInfo {
    /// Describe a tightly packed buffer.
    pub fn packed(width: u32, height: u32, has_alpha: bool) -> Self {
        let n_channels = if has_alpha { 4 } else { 3 };
        Self {
            width,
            height,
            row_stride: width as usize * n_channels as usize,
            has_alpha,
            n_channels,
        }
    }

    /// Read the geometry from host properties `width`, `height`,
    /// `rowstride`, `has-alpha` and `n-channels`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPropertyType`] if a property is missing or has the
    ///   wrong type
    /// - [`Error::InvalidParameter`] if an integer property is negative or
    ///   too large
    pub fn from_properties<P: PixbufProperties + ?Sized>(props: &P) -> Result<Self> {
        Ok(Self {
            width: int_property(props, "width")?,
            height: int_property(props, "height")?,
            row_stride: int_property(props, "rowstride")?,
            has_alpha: bool_property(props, "has-alpha")?,
            n_channels: int_property(props, "n-channels")?,
        })
    }

    /// Bytes per pixel implied by the alpha flag, after checking that the
    /// reported channel count agrees with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelMismatch`] unless the image has 3 channels
    /// without alpha or 4 with alpha.
    pub fn bytes_per_pixel(&self) -> Result<usize> {
        let expected = if self.has_alpha { 4 } else { 3 };
        if self.n_channels != expected {
            return Err(Error::ChannelMismatch {
                channels: self.n_channels,
                has_alpha: self.has_alpha,
            });
        }
        Ok(expected as usize)
    }
}

fn int_property<P, T>(props: &P, name: &'static str) -> Result<T>
where
    P: PixbufProperties + ?Sized,
    T: TryFrom<i64>,
{
    match props.property(name) {
        Some(PropertyValue::Int(v)) => T::try_from(v)
            .map_err(|_| Error::InvalidParameter(format!("property '{name}' out of range: {v}"))),
        _ => Err(Error::InvalidPropertyType {
            name,
            expected: "integer",
        }),
    }
}

fn bool_property<P: PixbufProperties + ?Sized>(props: &P, name: &'static str) -> Result<bool> {
    match props.property(name) {
        Some(PropertyValue::Bool(v)) => Ok(v),
        _ => Err(Error::InvalidPropertyType {
            name,
            expected: "boolean",
        }),
    }
}

/// Convert RGB or RGBA byte rows to native pixels.
///
/// Only the first `width * channels` bytes of each row are read; the rest of
/// the stride is padding. Pixels without alpha become fully opaque.
///
/// # Errors
///
/// - [`Error::ChannelMismatch`] if the channel count disagrees with the alpha flag
/// - [`Error::InvalidParameter`] if the stride is shorter than a row, or the
///   geometry overflows `usize`
/// - [`Error::BufferTooSmall`] if `pixels` does not cover the last row
/// - [`Error::AllocationFailed`] if the output cannot be allocated
pub fn convert_rgb_to_native_opaque(pixels: &[u8], info: &PixbufInfo) -> Result<Vec<u32>> {
    let bpp = info.bytes_per_pixel()?;
    let width = info.width as usize;
    let height = info.height as usize;
    let row_bytes = width.checked_mul(bpp).ok_or_else(|| overflow(info))?;

    if height > 1 && info.row_stride < row_bytes {
        return Err(Error::InvalidParameter(format!(
            "row stride {} shorter than row of {} bytes",
            info.row_stride, row_bytes
        )));
    }
    if height > 0 {
        let needed = (height - 1)
            .checked_mul(info.row_stride)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or_else(|| overflow(info))?;
        if pixels.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }
    }

    let count = width.checked_mul(height).ok_or_else(|| overflow(info))?;
    let mut out = Vec::new();
    out.try_reserve_exact(count)?;

    // Every row lies within `pixels` once the length check has passed
    for y in 0..height {
        let start = y * info.row_stride;
        let row = &pixels[start..start + row_bytes];
        out.extend(row.chunks_exact(bpp).map(|px| {
            let a = if info.has_alpha { px[3] } else { color::OPAQUE };
            color::compose_rgba(px[0], px[1], px[2], a)
        }));
    }

    Ok(out)
}

fn overflow(info: &PixbufInfo) -> Error {
    Error::InvalidParameter(format!(
        "geometry {}x{} with row stride {} overflows",
        info.width, info.height, info.row_stride
    ))
}

/// Reorder native pixels to serial `R, G, B, A` bytes, in place.
///
/// Works on `buffer.len() / 4` pixels; trailing bytes of a partial pixel are
/// left untouched.
pub fn convert_native_to_serial_rgba(buffer: &mut [u8]) {
    for px in buffer.chunks_exact_mut(4) {
        let pixel = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
        let (r, g, b, a) = color::extract_rgba(pixel);
        px.copy_from_slice(&[r, g, b, a]);
    }
}

/// View a native-endian byte buffer as pixels.
///
/// # Errors
///
/// - [`Error::InvalidBufferLength`] if the length is not a multiple of 4
/// - [`Error::AllocationFailed`] if the output cannot be allocated
pub fn pixels_from_native_bytes(bytes: &[u8]) -> Result<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidBufferLength {
            len: bytes.len(),
            multiple: 4,
        });
    }
    let mut out = Vec::new();
    out.try_reserve_exact(bytes.len() / 4)?;
    out.extend(
        bytes
            .chunks_exact(4)
            .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]])),
    );
    Ok(out)
}

/// Native-endian bytes of a pixel buffer.
pub fn pixels_to_native_bytes(pixels: &[u32]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_ne_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Props(HashMap<&'static str, PropertyValue>);

    impl PixbufProperties for Props {
        fn property(&self, name: &str) -> Option<PropertyValue> {
            self.0.get(name).copied()
        }
    }

    fn props(has_alpha: PropertyValue) -> Props {
        Props(HashMap::from([
            ("width", PropertyValue::Int(2)),
            ("height", PropertyValue::Int(1)),
            ("rowstride", PropertyValue::Int(8)),
            ("has-alpha", has_alpha),
            ("n-channels", PropertyValue::Int(3)),
        ]))
    }

    #[test]
    fn test_single_rgb_pixel() {
        let info = PixbufInfo::packed(1, 1, false);
        let out = convert_rgb_to_native_opaque(&[10, 20, 30], &info).unwrap();
        assert_eq!(out, vec![0xFF0A_141E]);
    }

    #[test]
    fn test_rgba_keeps_alpha() {
        let info = PixbufInfo::packed(2, 1, true);
        let out = convert_rgb_to_native_opaque(&[1, 2, 3, 4, 5, 6, 7, 8], &info).unwrap();
        assert_eq!(out, vec![0x0401_0203, 0x0805_0607]);
    }

    #[test]
    fn test_stride_padding_skipped() {
        let info = PixbufInfo {
            width: 1,
            height: 2,
            row_stride: 4,
            has_alpha: false,
            n_channels: 3,
        };
        // Last row need not include its padding
        let out = convert_rgb_to_native_opaque(&[1, 2, 3, 99, 4, 5, 6], &info).unwrap();
        assert_eq!(out, vec![0xFF01_0203, 0xFF04_0506]);
    }

    #[test]
    fn test_channel_mismatch() {
        let mut info = PixbufInfo::packed(1, 1, true);
        info.n_channels = 3;
        let err = convert_rgb_to_native_opaque(&[0; 4], &info).unwrap_err();
        assert!(matches!(
            err,
            Error::ChannelMismatch {
                channels: 3,
                has_alpha: true
            }
        ));
    }

    #[test]
    fn test_buffer_too_small() {
        let info = PixbufInfo::packed(2, 2, false);
        let err = convert_rgb_to_native_opaque(&[0; 11], &info).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooSmall {
                needed: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn test_oversized_geometry_is_rejected() {
        let info = PixbufInfo {
            width: 1,
            height: u32::MAX,
            row_stride: i64::MAX as usize,
            has_alpha: false,
            n_channels: 3,
        };
        let err = convert_rgb_to_native_opaque(&[0; 3], &info).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let info = PixbufInfo {
            row_stride: usize::MAX,
            ..PixbufInfo::packed(2, 3, true)
        };
        let err = convert_rgb_to_native_opaque(&[0; 8], &info).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_from_properties() {
        let info = PixbufInfo::from_properties(&props(PropertyValue::Bool(false))).unwrap();
        assert_eq!(info.width, 2);
        assert_eq!(info.row_stride, 8);
        assert!(!info.has_alpha);

        let err = PixbufInfo::from_properties(&props(PropertyValue::Int(1))).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPropertyType {
                name: "has-alpha",
                expected: "boolean"
            }
        ));
    }

    #[test]
    fn test_serial_rgba_in_place() {
        let mut buf = pixels_to_native_bytes(&[0x8011_2233, 0xFF00_00FF]);
        buf.push(0xAB);
        convert_native_to_serial_rgba(&mut buf);
        assert_eq!(buf, vec![0x11, 0x22, 0x33, 0x80, 0, 0, 0xFF, 0xFF, 0xAB]);
    }

    #[test]
    fn test_native_bytes_roundtrip() {
        let pixels = vec![0x0102_0304, 0xFFFF_0000];
        let bytes = pixels_to_native_bytes(&pixels);
        assert_eq!(pixels_from_native_bytes(&bytes).unwrap(), pixels);

        let err = pixels_from_native_bytes(&bytes[..7]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidBufferLength {
                len: 7,
                multiple: 4
            }
        ));
    }
}
