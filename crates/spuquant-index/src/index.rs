//! Histogram, quantize and pack in one call

use crate::codec::{self, BitmapLayout, IndexedBitmap};
use crate::error::{IndexError, IndexResult};
use crate::quantize::{IndexAssignmentPolicy, QuantizeOptions, quantize};
use spuquant_core::{ColorHistogram, Palette, Rgba};

/// Options for [`index_image`]
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Quantization decision and outlier policy
    pub quantize: QuantizeOptions,
    /// Output bitmap layout
    pub layout: BitmapLayout,
}

impl IndexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantize(mut self, quantize: QuantizeOptions) -> Self {
        self.quantize = quantize;
        self
    }

    pub fn layout(mut self, layout: BitmapLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Result of [`index_image`]
#[derive(Debug, Clone)]
pub struct IndexedImage {
    /// Packed indices, `None` when the image has too many colours
    pub bitmap: Option<IndexedBitmap>,
    /// Palette the bitmap indexes into, present with the bitmap
    pub palette: Option<Palette>,
    /// Every distinct colour with its pixel count, most frequent first
    pub histogram: Vec<(Rgba, u64)>,
}

impl IndexedImage {
    /// True if the image was quantized
    pub fn is_indexed(&self) -> bool {
        self.bitmap.is_some()
    }
}

/// Count the colours of a buffer and, if it is close enough to four
/// colours, pack it into a 2-bit bitmap.
///
/// The histogram is returned whether or not the image could be quantized.
///
/// # Errors
///
/// - [`IndexError::InvalidParameters`] for a zero row width, a width that
///   does not divide the buffer, or neighbour-majority on a flat layout
/// - [`IndexError::Core`] on allocation failure
pub fn index_image(pixels: &[u32], options: &IndexOptions) -> IndexResult<IndexedImage> {
    match options.layout {
        BitmapLayout::Flat => {
            if options.quantize.policy == IndexAssignmentPolicy::NeighborMajority {
                return Err(IndexError::InvalidParameters(
                    "neighbor majority needs a row layout".to_string(),
                ));
            }
        }
        BitmapLayout::Rows { width } => {
            if width == 0 || pixels.len() % width != 0 {
                return Err(IndexError::InvalidParameters(format!(
                    "width {} does not divide {} pixels",
                    width,
                    pixels.len()
                )));
            }
        }
    }

    let mut hist = ColorHistogram::build(pixels)?;
    let quant = quantize(&mut hist, &options.quantize);
    let histogram = hist.color_counts();

    let Some(quant) = quant else {
        return Ok(IndexedImage {
            bitmap: None,
            palette: None,
            histogram,
        });
    };

    let bitmap = match options.layout {
        BitmapLayout::Flat => codec::pack_flat(pixels, &quant)?,
        BitmapLayout::Rows { width } => codec::pack_rows(pixels, width, &quant)?,
    };

    tracing::debug!(
        width = bitmap.width(),
        height = bitmap.height(),
        bytes = bitmap.data().len(),
        "packed indexed bitmap"
    );

    Ok(IndexedImage {
        bitmap: Some(bitmap),
        palette: Some(*quant.palette()),
        histogram,
    })
}

/// Flat histogram-and-index with nearest-colour outliers.
///
/// Returns the packed bytes (or `None` when quantization is refused) and the
/// histogram as `(colour, count)` pairs, most frequent first.
pub fn build_histogram_and_index(
    pixels: &[u32],
    count_factor: u64,
) -> IndexResult<(Option<Vec<u8>>, Vec<(Rgba, u64)>)> {
    let options =
        IndexOptions::new().quantize(QuantizeOptions::new().count_factor(count_factor));
    let image = index_image(pixels, &options)?;
    Ok((image.bitmap.map(IndexedBitmap::into_data), image.histogram))
}

/// Expand a flat bitmap to native pixels, four per byte.
pub fn expand_indexed(bitmap: &[u8], palette: &Palette) -> IndexResult<Vec<u32>> {
    codec::expand(bitmap, palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spuquant_core::color::compose_rgb;

    #[test]
    fn test_solid_red() {
        let red = 0xFFFF_0000;
        let (bitmap, hist) = build_histogram_and_index(&[red; 16], 50).unwrap();
        assert_eq!(bitmap, Some(vec![0; 4]));
        assert_eq!(hist, vec![(Rgba::rgb(255, 0, 0), 16)]);
    }

    #[test]
    fn test_refused_keeps_histogram() {
        let mut pixels = Vec::new();
        for (i, n) in [40usize, 30, 20, 10, 5, 5].iter().enumerate() {
            pixels.extend(std::iter::repeat_n(i as u32 + 1, *n));
        }
        let (bitmap, hist) = build_histogram_and_index(&pixels, 50).unwrap();
        assert!(bitmap.is_none());
        assert_eq!(hist.len(), 6);
        assert_eq!(hist.iter().map(|&(_, n)| n).sum::<u64>(), 110);
        assert_eq!(hist[0].1, 40);
    }

    #[test]
    fn test_flat_rejects_neighbor_majority() {
        let options = IndexOptions::new()
            .quantize(QuantizeOptions::new().policy(IndexAssignmentPolicy::NeighborMajority));
        assert!(matches!(
            index_image(&[1, 2], &options),
            Err(IndexError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_rows_validates_width() {
        let options = IndexOptions::new().layout(BitmapLayout::Rows { width: 3 });
        assert!(matches!(
            index_image(&[1, 2, 3, 4], &options),
            Err(IndexError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_rows_roundtrip() {
        let white = compose_rgb(255, 255, 255);
        let black = compose_rgb(0, 0, 0);
        let pixels = [white, black, white, black, white, black, black, white, black, white];
        let options = IndexOptions::new().layout(BitmapLayout::Rows { width: 5 });
        let image = index_image(&pixels, &options).unwrap();
        assert!(image.is_indexed());
        let (bitmap, palette) = (image.bitmap.unwrap(), image.palette.unwrap());
        assert_eq!(bitmap.stride(), 2);
        assert_eq!(bitmap.unpack(&palette).unwrap(), pixels.to_vec());
    }

    #[test]
    fn test_expand_indexed_pads_with_first_entry() {
        let pixels = [7u32, 8, 7];
        let options = IndexOptions::new();
        let image = index_image(&pixels, &options).unwrap();
        let palette = image.palette.unwrap();
        let out = expand_indexed(image.bitmap.unwrap().data(), &palette).unwrap();
        assert_eq!(out, vec![7, 8, 7, 7]);
    }
}
