//! ColorHistogram - exact frequency table of distinct pixel values
//!
//! Subtitle art has few distinct colours (a fill, an outline, anti-aliasing
//! shades and transparency), so entries live in a flat vector searched
//! linearly. The table is built from one buffer and dropped with it.

mod sort;

use crate::error::Result;
use crate::palette::Rgba;

/// Initial number of histogram slots
const INITIAL_CAPACITY: usize = 8;

/// One distinct pixel value and how often it occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramEntry {
    /// Native pixel value
    pub pixel: u32,
    /// Number of occurrences, always >= 1
    pub count: u64,
    /// Palette index, assigned by quantization
    pub index: Option<u8>,
}

impl HistogramEntry {
    /// Colour of this entry
    #[inline]
    pub fn color(&self) -> Rgba {
        Rgba::from_pixel(self.pixel)
    }
}

/// Histogram of distinct pixel values over one buffer.
///
/// Entries appear in first-seen order until [`ColorHistogram::sort_by_count`]
/// is called.
#[derive(Debug, Clone, Default)]
pub struct ColorHistogram {
    entries: Vec<HistogramEntry>,
    total: u64,
}

impl ColorHistogram {
    /// Count every pixel of a buffer.
    ///
    /// Each pixel is looked up linearly among the entries seen so far; a miss
    /// appends a new entry. Storage starts at a small capacity and doubles
    /// whenever it fills up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`](crate::Error::AllocationFailed) if
    /// the table cannot grow.
    pub fn build(pixels: &[u32]) -> Result<Self> {
        let mut entries: Vec<HistogramEntry> = Vec::new();

        for &pixel in pixels {
            match entries.iter().position(|e| e.pixel == pixel) {
                Some(i) => entries[i].count += 1,
                None => {
                    if entries.len() == entries.capacity() {
                        let grow = entries.capacity().max(INITIAL_CAPACITY);
                        entries.try_reserve_exact(grow)?;
                    }
                    entries.push(HistogramEntry {
                        pixel,
                        count: 1,
                        index: None,
                    });
                }
            }
        }

        tracing::debug!(
            pixels = pixels.len(),
            distinct = entries.len(),
            "built color histogram"
        );

        Ok(Self {
            entries,
            total: pixels.len() as u64,
        })
    }

    /// Number of distinct colours
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no pixels were counted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of pixels counted
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total
    }

    /// Entries in their current order
    #[inline]
    pub fn entries(&self) -> &[HistogramEntry] {
        &self.entries
    }

    /// Mutable access to the entries, used to record palette indices.
    ///
    /// Pixel values and counts must not be changed through this slice.
    #[inline]
    pub fn entries_mut(&mut self) -> &mut [HistogramEntry] {
        &mut self.entries
    }

    /// Find the entry for a pixel value
    pub fn find(&self, pixel: u32) -> Option<&HistogramEntry> {
        self.entries.iter().find(|e| e.pixel == pixel)
    }

    /// Sum of the counts of the first `n` entries
    pub fn leading_count(&self, n: usize) -> u64 {
        self.entries.iter().take(n).map(|e| e.count).sum()
    }

    /// Entries as ordered `(colour, count)` pairs
    pub fn color_counts(&self) -> Vec<(Rgba, u64)> {
        self.entries.iter().map(|e| (e.color(), e.count)).collect()
    }
}
