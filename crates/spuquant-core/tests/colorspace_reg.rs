//! Colour space regression test
//!
//! Sweeps a grid of colours through the fixed-point HSV conversion and the
//! weighted colour distance.

use spuquant_core::color::{compose_rgb, compose_rgba};
use spuquant_core::{Hsv, distance, rgb_to_hsv};
use spuquant_test::RegParams;

fn grid() -> Vec<u32> {
    let steps = [0u8, 1, 64, 127, 128, 200, 254, 255];
    let mut out = Vec::new();
    for &r in &steps {
        for &g in &steps {
            for &b in &steps {
                out.push(compose_rgb(r, g, b));
            }
        }
    }
    out.push(compose_rgba(10, 10, 10, 20));
    out.push(compose_rgba(0, 0, 0, 0));
    out
}

#[test]
fn colorspace_reg() {
    let mut rp = RegParams::new("colorspace");
    let samples = grid();

    // --- Test 1: ranges ---
    let in_range = samples.iter().all(|&p| {
        let hsv = rgb_to_hsv(p);
        hsv.h < 65536 && hsv.s <= 65536 && hsv.v <= 65535
    });
    rp.compare_values(1.0, if in_range { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: greys have no hue or saturation ---
    let greys = (0..=255u8).all(|v| {
        let hsv = rgb_to_hsv(compose_rgb(v, v, v));
        hsv == Hsv {
            h: 0,
            s: 0,
            v: v as u32 * 257,
        }
    });
    rp.compare_values(1.0, if greys { 1.0 } else { 0.0 }, 0.0);

    // --- Test 3: secondary hues ---
    rp.compare_values(10922.0, rgb_to_hsv(compose_rgb(255, 255, 0)).h as f64, 0.0);
    rp.compare_values(32767.0, rgb_to_hsv(compose_rgb(0, 255, 255)).h as f64, 0.0);
    rp.compare_values(54614.0, rgb_to_hsv(compose_rgb(255, 0, 255)).h as f64, 0.0);

    // --- Test 4: distance is zero on the diagonal and symmetric ---
    let mut zero = true;
    let mut symmetric = true;
    for &a in &samples {
        zero &= distance(a, a) == 0;
        for &b in samples.iter().step_by(7) {
            symmetric &= distance(a, b) == distance(b, a);
        }
    }
    rp.compare_values(1.0, if zero { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if symmetric { 1.0 } else { 0.0 }, 0.0);

    // --- Test 5: a hue shift costs more than a small value shift ---
    let orange = compose_rgb(255, 128, 0);
    let yellow = compose_rgb(255, 255, 0);
    let dim_orange = compose_rgb(230, 115, 0);
    rp.compare_values(
        1.0,
        if distance(orange, yellow) > distance(orange, dim_orange) { 1.0 } else { 0.0 },
        0.0,
    );

    assert!(rp.cleanup(), "colorspace regression test failed");
}
