//! Paletted PNG format support
//!
//! Subpicture bitmaps are written as 2-bit indexed PNGs with a four-entry
//! `PLTE` and a four-entry `tRNS`. The bitmap keeps its own bit order (first
//! pixel in the low bits), while PNG packs the first pixel into the high
//! bits, so every row is passed through [`swap_pixel_pairs`] on the way in
//! and out.
//!
//! Palette colours are premultiplied in memory and straight in the file.

use crate::source::stage_png;
use crate::{IoError, IoResult};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use spuquant_core::{PALETTE_SIZE, Palette, Rgba};
use spuquant_index::{IndexedBitmap, row_stride};
use std::io::{Cursor, Read, Write};

/// Palette and bitmap read back from a paletted PNG
#[derive(Debug, Clone)]
pub struct PalettedPng {
    /// First four palette entries, premultiplied, padded with transparent
    /// black
    pub palette: Palette,
    pub width: u32,
    pub height: u32,
    /// Indices in subpicture bit order; only for 2-bit images that decoded
    /// completely
    pub bitmap: Option<IndexedBitmap>,
    /// The source ended early and was zero-padded
    pub truncated: bool,
}

/// Palette read back from a paletted PNG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngPalette {
    /// First four palette entries, premultiplied, padded with transparent
    /// black
    pub palette: Palette,
    /// The source ended early and was zero-padded
    pub truncated: bool,
}

/// Reverse the order of the four 2-bit fields of a byte.
#[inline]
pub fn swap_pixel_pairs(byte: u8) -> u8 {
    (byte & 0x03) << 6 | (byte & 0x0C) << 2 | (byte & 0x30) >> 2 | (byte & 0xC0) >> 6
}

/// Write a packed bitmap as a 2-bit paletted PNG.
///
/// `bitmap` holds rows of stride `ceil(width / 4)`; the height is the number
/// of whole rows it contains.
///
/// # Errors
///
/// - [`IoError::InvalidData`] if the width is 0 or too large, or the bitmap
///   holds no complete row
/// - [`IoError::EncodeError`] if the encoder fails
pub fn write_paletted_png<W: Write>(
    bitmap: &[u8],
    width: usize,
    palette: &Palette,
    sink: W,
) -> IoResult<()> {
    if width == 0 {
        return Err(IoError::InvalidData("zero width".to_string()));
    }
    let stride = row_stride(width);
    let height = bitmap.len() / stride;
    if height == 0 {
        return Err(IoError::InvalidData(format!(
            "{} bytes hold no row of width {}",
            bitmap.len(),
            width
        )));
    }
    let png_width = u32::try_from(width)
        .map_err(|_| IoError::InvalidData(format!("width {} too large", width)))?;
    let png_height = u32::try_from(height)
        .map_err(|_| IoError::InvalidData(format!("height {} too large", height)))?;

    let mut plte = Vec::with_capacity(PALETTE_SIZE * 3);
    let mut trns = Vec::with_capacity(PALETTE_SIZE);
    for c in palette.colors().iter().map(|c| c.unpremultiplied()) {
        plte.extend_from_slice(&[c.red, c.green, c.blue]);
        trns.push(c.alpha);
    }

    tracing::debug!(width, height, "writing paletted PNG");

    let mut encoder = Encoder::new(sink, png_width, png_height);
    encoder.set_color(ColorType::Indexed);
    encoder.set_depth(BitDepth::Two);
    encoder.set_palette(plte);
    encoder.set_trns(trns);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = Vec::new();
    data.try_reserve_exact(stride * height)?;
    data.extend(
        bitmap[..stride * height]
            .iter()
            .map(|&b| swap_pixel_pairs(b)),
    );

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

/// Read the palette, and for 2-bit images the bitmap, of a paletted PNG.
///
/// Returns `None` if the image is not indexed. Missing `tRNS` entries count
/// as opaque. A source that ends early is zero-padded and reported through
/// [`PalettedPng::truncated`]; the palette is still returned if it was read.
///
/// # Errors
///
/// - [`IoError::Io`] if the source fails
/// - [`IoError::DecodeError`] if the PNG header or palette is malformed
pub fn read_paletted_png<R: Read>(source: R) -> IoResult<Option<PalettedPng>> {
    let staged = stage_png(source)?;

    let mut decoder = Decoder::new(Cursor::new(staged.data));
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    if info.color_type != ColorType::Indexed {
        tracing::debug!(color_type = ?info.color_type, "PNG is not indexed");
        return Ok(None);
    }
    let (width, height, bit_depth) = (info.width, info.height, info.bit_depth);

    let plte: &[u8] = info.palette.as_deref().unwrap_or_default();
    let trns: &[u8] = info.trns.as_deref().unwrap_or_default();
    let colors: Vec<Rgba> = plte
        .chunks_exact(3)
        .take(PALETTE_SIZE)
        .enumerate()
        .map(|(i, rgb)| {
            let alpha = trns.get(i).copied().unwrap_or(spuquant_core::color::OPAQUE);
            Rgba::new(rgb[0], rgb[1], rgb[2], alpha).premultiplied()
        })
        .collect();
    let palette = Palette::from_colors(&colors);

    tracing::debug!(
        width,
        height,
        bit_depth = ?bit_depth,
        entries = plte.len() / 3,
        "read PNG palette"
    );

    let bitmap = if bit_depth == BitDepth::Two {
        match read_bitmap(&mut reader, width as usize, height as usize) {
            Ok(bitmap) => Some(bitmap),
            Err(e) if staged.truncated => {
                tracing::warn!(error = %e, "discarding bitmap of truncated PNG");
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    Ok(Some(PalettedPng {
        palette,
        width,
        height,
        bitmap,
        truncated: staged.truncated,
    }))
}

fn read_bitmap<R: std::io::BufRead + std::io::Seek>(
    reader: &mut png::Reader<R>,
    width: usize,
    height: usize,
) -> IoResult<IndexedBitmap> {
    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(buf_size)?;
    buf.resize(buf_size, 0);
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let stride = row_stride(width);
    let line_size = output_info.line_size;
    if line_size < stride {
        return Err(IoError::DecodeError(format!(
            "line size {} shorter than stride {}",
            line_size, stride
        )));
    }

    let mut data = Vec::new();
    data.try_reserve_exact(stride * height)?;
    for row in buf.chunks(line_size).take(height) {
        data.extend(row[..stride].iter().map(|&b| swap_pixel_pairs(b)));
    }
    Ok(IndexedBitmap::from_rows(data, width, height)?)
}

/// Read only the palette of a paletted PNG.
///
/// Returns `None` if the image is not indexed. A short source still yields
/// the palette, with [`PngPalette::truncated`] set.
pub fn read_png_palette<R: Read>(source: R) -> IoResult<Option<PngPalette>> {
    Ok(read_paletted_png(source)?.map(|png| PngPalette {
        palette: png.palette,
        truncated: png.truncated,
    }))
}
