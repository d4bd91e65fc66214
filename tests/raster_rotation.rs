use image_text_composer::TextLayer;
use image_text_composer::fonts::FontCatalog;
use image_text_composer::raster::TextRasterizer;
use image_text_composer::surface::RasterSnapshot;

fn rasterizer() -> TextRasterizer {
    let bytes = FontCatalog::new()
        .export_font_bytes()
        .expect("embedded font available");
    TextRasterizer::from_bytes(&bytes).unwrap()
}

fn test_layer(rotation: f32) -> TextLayer {
    let mut layer = TextLayer::new("Test", 200, 120, 0);
    layer.x = 40.0;
    layer.y = 30.0;
    layer.width = 100.0;
    layer.height = 40.0;
    layer.rotation = rotation;
    layer
}

/// Mean position of the dark (text) pixels.
fn ink_centroid(snapshot: &RasterSnapshot) -> (f32, f32) {
    let (mut sum_x, mut sum_y, mut count) = (0.0f32, 0.0f32, 0u32);
    for y in 0..snapshot.height {
        for x in 0..snapshot.width {
            let index = ((y * snapshot.width + x) * 4) as usize;
            if snapshot.rgba[index] < 100 {
                sum_x += x as f32;
                sum_y += y as f32;
                count += 1;
            }
        }
    }
    assert!(count > 0, "no text pixels found");
    (sum_x / count as f32, sum_y / count as f32)
}

#[test]
fn test_unrotated_text_lands_inside_the_box() {
    let compositor = rasterizer();
    let snapshot = compositor.composite(200, 120, None, &[&test_layer(0.0)]);
    let (x, y) = ink_centroid(&snapshot);
    assert!(x >= 40.0 && x <= 140.0, "centroid x {x} outside box");
    assert!(y >= 30.0 && y <= 70.0, "centroid y {y} outside box");
}

#[test]
fn test_rotation_pivots_on_box_center() {
    let compositor = rasterizer();
    let straight = compositor.composite(200, 120, None, &[&test_layer(0.0)]);
    let flipped = compositor.composite(200, 120, None, &[&test_layer(180.0)]);

    // Box center: (40 + 100/2, 30 + 40/2).
    let (cx, cy) = (90.0, 50.0);
    let (x0, y0) = ink_centroid(&straight);
    let (x1, y1) = ink_centroid(&flipped);

    // A half turn about the center maps the ink to its point reflection.
    assert!(
        (x1 - (2.0 * cx - x0)).abs() < 2.0,
        "x centroid {x1} not mirrored from {x0} about {cx}"
    );
    assert!(
        (y1 - (2.0 * cy - y0)).abs() < 2.0,
        "y centroid {y1} not mirrored from {y0} about {cy}"
    );
}
