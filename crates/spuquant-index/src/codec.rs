//! 2-bit index packing
//!
//! Four pixels share a byte. The first pixel of each group of four sits in
//! the lowest two bits, so pixel `i` of a row lives in byte `i / 4` at bit
//! offset `(i % 4) * 2`. Unused bits of a final partial byte are zero.
//!
//! Two layouts are produced:
//!
//! - flat: the whole buffer packed as one stream
//! - rows: each row starts on a byte boundary, stride `ceil(width / 4)`

use crate::error::{IndexError, IndexResult};
use crate::quantize::{IndexAssignmentPolicy, Quantization};
use spuquant_core::{PALETTE_SIZE, Palette};

/// Pixels stored in one byte
pub const PIXELS_PER_BYTE: usize = 4;

/// Byte stride of a packed row of `width` pixels
#[inline]
pub fn row_stride(width: usize) -> usize {
    width.div_ceil(PIXELS_PER_BYTE)
}

/// `a * b`, or an error naming the geometry when it overflows
fn checked_size(a: usize, b: usize, what: &str) -> IndexResult<usize> {
    a.checked_mul(b).ok_or_else(|| {
        IndexError::InvalidParameters(format!("{} {} x {} overflows", what, a, b))
    })
}

#[inline]
fn shift(x: usize) -> usize {
    (x % PIXELS_PER_BYTE) * 2
}

/// How an indexed bitmap is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapLayout {
    /// One continuous stream with no row boundaries
    #[default]
    Flat,
    /// Rows of `width` pixels, each padded to a whole byte
    Rows { width: usize },
}

/// Packed 2-bit-per-pixel bitmap
///
/// A flat bitmap is described as a single row holding every pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBitmap {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
}

impl IndexedBitmap {
    /// Wrap packed rows of `width` pixels.
    ///
    /// # Errors
    ///
    /// - [`IndexError::BitmapTooSmall`] if `data` does not hold `height`
    ///   rows of stride `ceil(width / 4)`
    /// - [`IndexError::InvalidParameters`] if that size overflows `usize`
    pub fn from_rows(data: Vec<u8>, width: usize, height: usize) -> IndexResult<Self> {
        let stride = row_stride(width);
        let needed = checked_size(stride, height, "stride x height")?;
        if data.len() < needed {
            return Err(IndexError::BitmapTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Packed bytes
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the packed bytes
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Palette index at a position, or `None` outside the bitmap
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(get_index(&self.data, self.stride, x, y))
    }

    /// Expand to native pixels, `width * height` of them.
    pub fn unpack(&self, palette: &Palette) -> IndexResult<Vec<u32>> {
        unpack(&self.data, self.stride, self.width, self.height, palette)
    }
}

#[inline]
fn get_index(data: &[u8], stride: usize, x: usize, y: usize) -> u8 {
    (data[y * stride + x / PIXELS_PER_BYTE] >> shift(x)) & 3
}

#[inline]
fn set_index(data: &mut [u8], stride: usize, x: usize, y: usize, index: u8) {
    data[y * stride + x / PIXELS_PER_BYTE] |= (index & 3) << shift(x);
}

/// Pack a buffer in scan order with no row boundaries.
///
/// # Errors
///
/// - [`IndexError::UnmappedColor`] if a pixel has no index; only possible
///   when the quantization did not come from this buffer
/// - [`IndexError::Core`] if the output cannot be allocated
pub fn pack_flat(pixels: &[u32], quant: &Quantization) -> IndexResult<IndexedBitmap> {
    let mut data = Vec::new();
    data.try_reserve_exact(row_stride(pixels.len()))?;

    for group in pixels.chunks(PIXELS_PER_BYTE) {
        let mut byte = 0u8;
        for (k, &pixel) in group.iter().enumerate() {
            let index = quant
                .index_of(pixel)
                .ok_or(IndexError::UnmappedColor(pixel))?;
            byte |= index << shift(k);
        }
        data.push(byte);
    }

    let height = usize::from(!pixels.is_empty());
    IndexedBitmap::from_rows(data, pixels.len(), height)
}

/// Pack a buffer as rows of `width` pixels.
///
/// Pixels without an index are resolved by the quantization's policy: under
/// [`IndexAssignmentPolicy::NeighborMajority`] they take the index, among
/// the upper-left, upper and left neighbours already packed, whose palette
/// colour is most frequent in the image (the earlier neighbour wins a tie,
/// index 0 when there is no neighbour).
///
/// # Errors
///
/// - [`IndexError::InvalidParameters`] if `width` is 0 or does not divide
///   the buffer length
/// - [`IndexError::UnmappedColor`] for an unindexed pixel under
///   [`IndexAssignmentPolicy::NearestColorDistance`]
/// - [`IndexError::Core`] if the output cannot be allocated
pub fn pack_rows(pixels: &[u32], width: usize, quant: &Quantization) -> IndexResult<IndexedBitmap> {
    if width == 0 || pixels.len() % width != 0 {
        return Err(IndexError::InvalidParameters(format!(
            "width {} does not divide {} pixels",
            width,
            pixels.len()
        )));
    }
    let height = pixels.len() / width;
    let stride = row_stride(width);

    let mut data = Vec::new();
    data.try_reserve_exact(stride * height)?;
    data.resize(stride * height, 0);

    for (y, row) in pixels.chunks_exact(width).enumerate() {
        for (x, &pixel) in row.iter().enumerate() {
            let index = match quant.index_of(pixel) {
                Some(index) => index,
                None => match quant.policy() {
                    IndexAssignmentPolicy::NeighborMajority => {
                        neighbor_majority(&data, stride, x, y, quant.counts())
                    }
                    IndexAssignmentPolicy::NearestColorDistance => {
                        return Err(IndexError::UnmappedColor(pixel));
                    }
                },
            };
            set_index(&mut data, stride, x, y, index);
        }
    }

    IndexedBitmap::from_rows(data, width, height)
}

/// Most frequent palette index among the already packed neighbours of
/// `(x, y)`, in raster order.
fn neighbor_majority(
    data: &[u8],
    stride: usize,
    x: usize,
    y: usize,
    counts: &[u64; PALETTE_SIZE],
) -> u8 {
    let mut neighbors = [None; 3];
    if x > 0 && y > 0 {
        neighbors[0] = Some((x - 1, y - 1));
    }
    if y > 0 {
        neighbors[1] = Some((x, y - 1));
    }
    if x > 0 {
        neighbors[2] = Some((x - 1, y));
    }

    let mut best = 0u8;
    let mut best_count = 0u64;
    for (nx, ny) in neighbors.into_iter().flatten() {
        let index = get_index(data, stride, nx, ny);
        let count = counts[index as usize];
        if count > best_count {
            best = index;
            best_count = count;
        }
    }
    best
}

/// Expand packed rows back to native pixels.
///
/// # Errors
///
/// - [`IndexError::InvalidParameters`] if `stride` is shorter than a row, or
///   the geometry overflows `usize`
/// - [`IndexError::BitmapTooSmall`] if `bitmap` does not hold `height` rows
pub fn unpack(
    bitmap: &[u8],
    stride: usize,
    width: usize,
    height: usize,
    palette: &Palette,
) -> IndexResult<Vec<u32>> {
    if stride < row_stride(width) {
        return Err(IndexError::InvalidParameters(format!(
            "stride {} too short for width {}",
            stride, width
        )));
    }
    let needed = checked_size(stride, height, "stride x height")?;
    if bitmap.len() < needed {
        return Err(IndexError::BitmapTooSmall {
            needed,
            actual: bitmap.len(),
        });
    }

    let colors = palette.pixels();
    let mut out = Vec::new();
    out.try_reserve_exact(checked_size(width, height, "width x height")?)?;
    for y in 0..height {
        for x in 0..width {
            let index = get_index(bitmap, stride, x, y) as usize;
            debug_assert!(index < PALETTE_SIZE);
            out.push(colors[index]);
        }
    }
    Ok(out)
}

/// Expand every byte of a flat bitmap to four pixels.
///
/// Padding positions in a final partial byte come out as `palette[0]`.
pub fn expand(bitmap: &[u8], palette: &Palette) -> IndexResult<Vec<u32>> {
    let colors = palette.pixels();
    let mut out = Vec::new();
    out.try_reserve_exact(checked_size(bitmap.len(), PIXELS_PER_BYTE, "bytes x pixels")?)?;
    for &byte in bitmap {
        for k in 0..PIXELS_PER_BYTE {
            out.push(colors[((byte >> shift(k)) & 3) as usize]);
        }
    }
    Ok(out)
}
