//! Four-colour quantization
//!
//! Decides whether a histogram is close enough to four colours to be turned
//! into a subpicture, and if so which palette index each distinct colour
//! gets:
//!
//! - the four most frequent colours become palette entries 0..=3
//! - every other colour is an outlier, normally anti-aliasing shades, and is
//!   either mapped to its nearest palette entry by colour distance or left
//!   for the row packer to resolve from its neighbours

use spuquant_core::{ColorHistogram, PALETTE_SIZE, Palette, Rgba, distance};
use std::collections::HashMap;

/// Default minimum ratio of all pixels to outlier pixels
pub const DEFAULT_COUNT_FACTOR: u64 = 50;

/// How colours outside the top four get their palette index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexAssignmentPolicy {
    /// Map every outlier colour to the palette entry at the smallest
    /// [`distance`]; ties go to the lower index.
    #[default]
    NearestColorDistance,
    /// Leave outliers unmapped; the row packer gives each outlier pixel the
    /// most frequent index among its already packed neighbours.
    NeighborMajority,
}

/// Options for quantization
#[derive(Debug, Clone)]
pub struct QuantizeOptions {
    /// Quantize only if outliers make up no more than `1 / count_factor` of
    /// all pixels
    pub count_factor: u64,
    /// Outlier index assignment
    pub policy: IndexAssignmentPolicy,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            count_factor: DEFAULT_COUNT_FACTOR,
            policy: IndexAssignmentPolicy::NearestColorDistance,
        }
    }
}

impl QuantizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_factor(mut self, count_factor: u64) -> Self {
        self.count_factor = count_factor;
        self
    }

    pub fn policy(mut self, policy: IndexAssignmentPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Palette and per-colour index assignment for one image
#[derive(Debug, Clone)]
pub struct Quantization {
    palette: Palette,
    counts: [u64; PALETTE_SIZE],
    used: usize,
    policy: IndexAssignmentPolicy,
    index_map: HashMap<u32, u8>,
}

impl Quantization {
    /// The four palette colours; unused slots are transparent black
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Pixel count of each palette entry; 0 for unused slots
    #[inline]
    pub fn counts(&self) -> &[u64; PALETTE_SIZE] {
        &self.counts
    }

    /// Number of palette slots backed by a real colour
    #[inline]
    pub fn used_slots(&self) -> usize {
        self.used
    }

    /// Policy this assignment was built with
    #[inline]
    pub fn policy(&self) -> IndexAssignmentPolicy {
        self.policy
    }

    /// Palette index of a pixel value, if it has one
    #[inline]
    pub fn index_of(&self, pixel: u32) -> Option<u8> {
        self.index_map.get(&pixel).copied()
    }

    /// Number of distinct colours with an index
    pub fn mapped_colors(&self) -> usize {
        self.index_map.len()
    }
}

/// Check the quantizability rule on a histogram sorted by count.
///
/// Four or fewer distinct colours always qualify. Otherwise the pixels
/// outside the top four must be absent, or few enough that
/// `total / outliers >= count_factor` (integer division).
pub fn is_quantizable(hist: &ColorHistogram, count_factor: u64) -> bool {
    if hist.len() <= PALETTE_SIZE {
        return true;
    }
    let total = hist.total_count();
    let outliers = total - hist.leading_count(PALETTE_SIZE);
    outliers == 0 || total / outliers >= count_factor
}

/// Quantize a histogram to four colours.
///
/// Sorts the histogram by count, then applies [`is_quantizable`]. Returns
/// `None` when there are too many distinct colours. On success the palette
/// indices are also recorded in the histogram entries.
///
/// Colours with equal counts may be ordered either way by the sort, so
/// which of them lands in the palette, and at which index, is not fixed.
pub fn quantize(hist: &mut ColorHistogram, options: &QuantizeOptions) -> Option<Quantization> {
    hist.sort_by_count();

    if !is_quantizable(hist, options.count_factor) {
        tracing::debug!(
            distinct = hist.len(),
            total = hist.total_count(),
            count_factor = options.count_factor,
            "too many distinct colors, not quantizing"
        );
        return None;
    }

    let used = hist.len().min(PALETTE_SIZE);
    let mut colors = [Rgba::TRANSPARENT; PALETTE_SIZE];
    let mut counts = [0u64; PALETTE_SIZE];
    let mut top = [0u32; PALETTE_SIZE];

    let entries = hist.entries_mut();
    for (i, entry) in entries.iter_mut().take(used).enumerate() {
        entry.index = Some(i as u8);
        colors[i] = entry.color();
        counts[i] = entry.count;
        top[i] = entry.pixel;
    }

    if options.policy == IndexAssignmentPolicy::NearestColorDistance {
        for entry in entries.iter_mut().skip(used) {
            entry.index = Some(nearest_index(entry.pixel, &top[..used]));
        }
    }

    let index_map: HashMap<u32, u8> = entries
        .iter()
        .filter_map(|e| e.index.map(|i| (e.pixel, i)))
        .collect();

    tracing::debug!(
        distinct = entries.len(),
        palette = used,
        mapped = index_map.len(),
        policy = ?options.policy,
        "quantized to palette"
    );

    Some(Quantization {
        palette: Palette::new(colors),
        counts,
        used,
        policy: options.policy,
        index_map,
    })
}

/// Index of the palette pixel closest to `pixel`; the first one wins a tie.
fn nearest_index(pixel: u32, palette: &[u32]) -> u8 {
    let mut best_index = 0;
    let mut best_weight = u64::MAX;
    for (i, &candidate) in palette.iter().enumerate() {
        let weight = distance(pixel, candidate);
        if i == 0 || weight < best_weight {
            best_index = i;
            best_weight = weight;
        }
    }
    best_index as u8
}
