//! Synthetic subtitle-like test images
//!
//! All buffers are native pixels in row-major order.

use spuquant_core::color;

/// A buffer filled with one pixel value
pub fn solid(width: usize, height: usize, pixel: u32) -> Vec<u32> {
    vec![pixel; width * height]
}

/// Horizontal bands, one per colour, top to bottom.
///
/// Row `y` gets `colors[y * colors.len() / height]`.
pub fn bands(width: usize, height: usize, colors: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let c = colors[y * colors.len() / height];
        out.extend(std::iter::repeat_n(c, width));
    }
    out
}

/// Per-channel average of two premultiplied pixels
pub fn blend(p1: u32, p2: u32) -> u32 {
    let (r1, g1, b1, a1) = color::extract_rgba(p1);
    let (r2, g2, b2, a2) = color::extract_rgba(p2);
    let avg = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
    color::compose_rgba(avg(r1, r2), avg(g1, g2), avg(b1, b2), avg(a1, a2))
}

/// A filled box on a background, with a one-pixel anti-aliased fringe.
///
/// The box covers the middle half of the image in both directions. Pixels
/// that touch the box edge from outside (sides only, not corners) get
/// `blend(fill, background)`, so the image has exactly three colours.
pub fn antialiased_box(width: usize, height: usize, fill: u32, background: u32) -> Vec<u32> {
    let (x0, x1) = (width / 4, width * 3 / 4);
    let (y0, y1) = (height / 4, height * 3 / 4);
    let fringe = blend(fill, background);
    let inside = |x: usize, y: usize| x >= x0 && x < x1 && y >= y0 && y < y1;

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let p = if inside(x, y) {
                fill
            } else if (x > 0 && inside(x - 1, y))
                || inside(x + 1, y)
                || (y > 0 && inside(x, y - 1))
                || inside(x, y + 1)
            {
                fringe
            } else {
                background
            };
            out.push(p);
        }
    }
    out
}
