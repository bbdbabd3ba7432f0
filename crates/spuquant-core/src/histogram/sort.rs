//! Frequency sort for histogram entries.
//!
//! Shellsort with gaps `(2^k - 1) >> 1`, halving down to 1. Successive gaps
//! are relatively prime, which keeps the number of passes small for the
//! short tables produced by subtitle images.
//!
//! The sort is not stable: entries with equal counts may come out in any
//! order. Callers that pick a palette from the front of the table must
//! accept that ties between equally frequent colours are arbitrary.

use super::{ColorHistogram, HistogramEntry};

impl ColorHistogram {
    /// Sort entries by count, most frequent first.
    pub fn sort_by_count(&mut self) {
        sort_entries_by_count(&mut self.entries);
    }
}

/// Shellsort `entries` by descending `count`.
pub(crate) fn sort_entries_by_count(entries: &mut [HistogramEntry]) {
    let n = entries.len();
    let mut gap = 1usize;
    while gap < n {
        gap += gap;
    }
    gap = (gap - 1) >> 1;
    if gap == 0 && n > 1 {
        gap = 1;
    }

    while gap > 0 {
        for j in 0..n - gap {
            let mut i = j;
            loop {
                let l = i + gap;
                if entries[i].count >= entries[l].count {
                    break;
                }
                entries.swap(i, l);
                if i < gap {
                    break;
                }
                i -= gap;
            }
        }
        gap >>= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(counts: &[u64]) -> Vec<HistogramEntry> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| HistogramEntry {
                pixel: i as u32,
                count,
                index: None,
            })
            .collect()
    }

    fn counts(entries: &[HistogramEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.count).collect()
    }

    #[test]
    fn test_sort_small() {
        let mut e = entries(&[2, 1, 3]);
        sort_entries_by_count(&mut e);
        assert_eq!(counts(&e), vec![3, 2, 1]);

        let mut e = entries(&[1, 5]);
        sort_entries_by_count(&mut e);
        assert_eq!(counts(&e), vec![5, 1]);

        let mut e = entries(&[7]);
        sort_entries_by_count(&mut e);
        assert_eq!(counts(&e), vec![7]);

        let mut e = entries(&[]);
        sort_entries_by_count(&mut e);
        assert!(e.is_empty());
    }

    #[test]
    fn test_sort_non_increasing() {
        let raw: Vec<u64> = (0..97u64).map(|i| (i * 37 + 11) % 23 + 1).collect();
        let mut e = entries(&raw);
        sort_entries_by_count(&mut e);
        assert!(e.windows(2).all(|w| w[0].count >= w[1].count));

        // Same multiset of entries, nothing lost or duplicated
        let mut pixels: Vec<u32> = e.iter().map(|x| x.pixel).collect();
        pixels.sort_unstable();
        assert_eq!(pixels, (0..97u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_ascending_input() {
        let raw: Vec<u64> = (1..=20).collect();
        let mut e = entries(&raw);
        sort_entries_by_count(&mut e);
        assert_eq!(counts(&e), (1..=20).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_keeps_pixel_with_count() {
        let mut hist = ColorHistogram {
            entries: entries(&[1, 4, 2]),
            total: 7,
        };
        hist.sort_by_count();
        let e = hist.entries();
        assert_eq!((e[0].pixel, e[0].count), (1, 4));
        assert_eq!((e[1].pixel, e[1].count), (2, 2));
        assert_eq!((e[2].pixel, e[2].count), (0, 1));
    }
}
