//! Index packing regression test
//!
//! Packs synthetic subtitle images flat and by rows, under both outlier
//! policies, and checks the bitmaps expand back to the expected pixels.

use spuquant_core::color::{compose_rgb, compose_rgba};
use spuquant_index::{
    BitmapLayout, IndexAssignmentPolicy, IndexOptions, QuantizeOptions, expand_indexed,
    index_image, row_stride,
};
use spuquant_test::{RegParams, images};

/// 16x4 black image with a white bar on rows 1-2, two red and two green
/// pixels, and one dark grey pixel inside the bar.
fn bar_image() -> (Vec<u32>, u32, u32) {
    let black = compose_rgb(0, 0, 0);
    let white = compose_rgb(255, 255, 255);
    let red = compose_rgb(255, 0, 0);
    let green = compose_rgb(0, 255, 0);
    let dark = compose_rgb(40, 40, 40);

    let mut img = images::solid(16, 4, black);
    for y in 1..3 {
        for x in 1..15 {
            img[y * 16 + x] = white;
        }
    }
    img[0] = red;
    img[1] = red;
    img[3 * 16 + 14] = green;
    img[3 * 16 + 15] = green;
    img[2 * 16 + 5] = dark;
    (img, dark, white)
}

#[test]
fn codec_reg() {
    let mut rp = RegParams::new("codec");

    let white = compose_rgb(255, 255, 255);
    let clear = compose_rgba(0, 0, 0, 0);

    // --- Test 1: anti-aliased box, flat and by rows ---
    for (w, h) in [(16usize, 8usize), (13, 7)] {
        let boxed = images::antialiased_box(w, h, white, clear);

        let flat = index_image(&boxed, &IndexOptions::new()).unwrap();
        let bitmap = flat.bitmap.unwrap();
        let palette = flat.palette.unwrap();
        rp.compare_values(row_stride(w * h) as f64, bitmap.data().len() as f64, 0.0);
        let expanded = expand_indexed(bitmap.data(), &palette).unwrap();
        rp.compare_pixels(&boxed, &expanded[..boxed.len()]);

        for policy in [
            IndexAssignmentPolicy::NearestColorDistance,
            IndexAssignmentPolicy::NeighborMajority,
        ] {
            let options = IndexOptions::new()
                .quantize(QuantizeOptions::new().policy(policy))
                .layout(BitmapLayout::Rows { width: w });
            let image = index_image(&boxed, &options).unwrap();
            let bitmap = image.bitmap.unwrap();
            rp.compare_values((row_stride(w) * h) as f64, bitmap.data().len() as f64, 0.0);
            let back = bitmap.unpack(&image.palette.unwrap()).unwrap();
            rp.compare_pixels(&boxed, &back);
        }
    }

    // --- Test 2: the outlier follows its colour under nearest distance ---
    let (img, dark, bar) = bar_image();
    let options = IndexOptions::new().layout(BitmapLayout::Rows { width: 16 });
    let image = index_image(&img, &options).unwrap();
    let bitmap = image.bitmap.unwrap();
    rp.compare_values(0.0, bitmap.get(5, 2).unwrap_or(9) as f64, 0.0);
    let back = bitmap.unpack(&image.palette.unwrap()).unwrap();
    let mut expected = img.clone();
    expected[2 * 16 + 5] = compose_rgb(0, 0, 0);
    rp.compare_pixels(&expected, &back);

    // --- Test 3: the outlier follows its neighbours under majority ---
    let options = IndexOptions::new()
        .quantize(QuantizeOptions::new().policy(IndexAssignmentPolicy::NeighborMajority))
        .layout(BitmapLayout::Rows { width: 16 });
    let image = index_image(&img, &options).unwrap();
    let bitmap = image.bitmap.unwrap();
    rp.compare_values(1.0, bitmap.get(5, 2).unwrap_or(9) as f64, 0.0);
    let back = bitmap.unpack(&image.palette.unwrap()).unwrap();
    expected[2 * 16 + 5] = bar;
    rp.compare_pixels(&expected, &back);
    rp.compare_values(
        0.0,
        back.iter().filter(|&&p| p == dark).count() as f64,
        0.0,
    );

    // --- Test 4: rows do not bleed into each other ---
    let img = images::bands(5, 2, &[compose_rgb(255, 0, 0), white]);
    let options = IndexOptions::new().layout(BitmapLayout::Rows { width: 5 });
    let bitmap = index_image(&img, &options).unwrap().bitmap.unwrap();
    // Equal counts, so either colour may take index 0
    let row0 = bitmap.get(0, 0).unwrap_or(9);
    let row1 = bitmap.get(0, 1).unwrap_or(9);
    rp.compare_values(1.0, if row0 != row1 { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(0.0, (bitmap.data()[1] >> 2) as f64, 0.0);
    rp.compare_values(0.0, (bitmap.data()[3] >> 2) as f64, 0.0);

    assert!(rp.cleanup(), "codec regression test failed");
}
