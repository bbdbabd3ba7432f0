//! Colour space conversion and colour distance
//!
//! HSV components are 16-bit fixed-point fractions of a full turn or of full
//! scale, computed entirely in integer arithmetic so that the same pixel
//! always maps to the same triple.
//!
//! Hue correspondence:
//! - 0: red
//! - 21845 (65536 / 3): green
//! - 43690 (65536 * 2 / 3): blue

use crate::color;

/// One full hue turn / full scale in fixed point
const FULL_SCALE: i64 = 65536;

/// Weight applied to the squared hue difference in [`distance`]
pub const HUE_WEIGHT: u64 = 4;

/// Fixed-point HSV color representation
///
/// - `h`: hue in `[0, 65536)`
/// - `s`: saturation, `(max - min) * 65536 / max`
/// - `v`: value, `max * 257` (so 255 maps to 65535)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv {
    pub h: u32,
    pub s: u32,
    pub v: u32,
}

/// Convert the colour of a native pixel to fixed-point HSV.
///
/// The dominant channel is chosen in the order red, green, blue, so ties go
/// to the earlier channel. The hue offset is taken from the dominant
/// channel and adjusted by the difference of the other two in cyclic order.
/// Alpha is ignored.
///
/// A black pixel (`max == 0`) has `h == 0` and `s == 0`.
pub fn rgb_to_hsv(pixel: u32) -> Hsv {
    let r = color::red(pixel) as i64;
    let g = color::green(pixel) as i64;
    let b = color::blue(pixel) as i64;

    let (max, v1, v2, hoffset) = if r >= g && r >= b {
        (r, g, b, 0)
    } else if g >= r && g >= b {
        (g, b, r, FULL_SCALE / 3)
    } else {
        (b, r, g, FULL_SCALE * 2 / 3)
    };

    let v = (max * 257) as u32;
    if max == 0 {
        return Hsv { h: 0, s: 0, v };
    }

    // Truncating division, in two steps
    let h = (hoffset + FULL_SCALE + (v1 - v2) * FULL_SCALE / 6 / max) % FULL_SCALE;
    let s = (max - v1.min(v2)) * FULL_SCALE / max;

    Hsv {
        h: h as u32,
        s: s as u32,
        v,
    }
}

/// Weighted perceptual distance between two native pixels.
///
/// Sum of the squared alpha difference, four times the squared hue
/// difference, and the squared saturation and value differences. Hue is
/// weighted up so that colour fringes cost more than brightness shifts.
///
/// The result is symmetric and zero for identical pixels. It is only meant
/// for nearest-colour ranking and is not a metric.
pub fn distance(p1: u32, p2: u32) -> u64 {
    let hsv1 = rgb_to_hsv(p1);
    let hsv2 = rgb_to_hsv(p2);

    let da = color::alpha(p1) as i64 - color::alpha(p2) as i64;
    let dh = hsv1.h as i64 - hsv2.h as i64;
    let ds = hsv1.s as i64 - hsv2.s as i64;
    let dv = hsv1.v as i64 - hsv2.v as i64;

    (da * da) as u64 + HUE_WEIGHT * (dh * dh) as u64 + (ds * ds) as u64 + (dv * dv) as u64
}
