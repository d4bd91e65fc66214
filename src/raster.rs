use fontdue::layout::{CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle};

use crate::document::BackgroundImage;
use crate::layer::{TextAlign, TextLayer};
use crate::surface::RasterSnapshot;

/// Fill used where no background image covers the canvas, matching the
/// on-screen empty-canvas color.
const CANVAS_FILL: [u8; 4] = [0xf5, 0xf5, 0xf5, 0xff];

/// CPU compositor producing the export pixels: background image plus every
/// text layer, rasterized with fontdue at 1x scale.
pub struct TextRasterizer {
    font: fontdue::Font,
}

impl TextRasterizer {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| e.to_string())?;
        Ok(Self { font })
    }

    /// Composites the full canvas. Layers must already be in ascending
    /// z-index order (paint order).
    pub fn composite(
        &self,
        width: u32,
        height: u32,
        background: Option<&BackgroundImage>,
        layers: &[&TextLayer],
    ) -> RasterSnapshot {
        let mut rgba = vec![0u8; (width as usize) * (height as usize) * 4];
        for pixel in rgba.chunks_exact_mut(4) {
            pixel.copy_from_slice(&CANVAS_FILL);
        }

        if let Some(bg) = background {
            blit_background(&mut rgba, width, height, bg);
        }

        for layer in layers {
            let tile = self.rasterize_layer(layer);
            blit_rotated(&mut rgba, width, height, &tile, layer);
        }

        RasterSnapshot { width, height, rgba }
    }

    /// Rasterizes one layer's text into an unrotated RGBA tile the size of
    /// the layer box (grown vertically if the wrapped text overflows it).
    fn rasterize_layer(&self, layer: &TextLayer) -> Tile {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: 0.0,
            y: 0.0,
            max_width: Some(layer.width.max(1.0)),
            horizontal_align: match layer.text_align {
                TextAlign::Left => HorizontalAlign::Left,
                TextAlign::Center => HorizontalAlign::Center,
                TextAlign::Right => HorizontalAlign::Right,
            },
            ..LayoutSettings::default()
        });
        layout.append(
            &[&self.font],
            &TextStyle::new(&layer.text, layer.font_size.max(1.0), 0),
        );

        let tile_w = layer.width.max(1.0).ceil() as usize;
        let tile_h = layer.height.max(layout.height()).max(1.0).ceil() as usize;
        let mut tile = Tile {
            width: tile_w,
            height: tile_h,
            rgba: vec![0u8; tile_w * tile_h * 4],
        };

        let [r, g, b] = [layer.color.r(), layer.color.g(), layer.color.b()];
        let opacity = layer.opacity.clamp(0.0, 1.0);
        for glyph in layout.glyphs() {
            let (metrics, bitmap) = self.font.rasterize_indexed(glyph.key.glyph_index, glyph.key.px);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    if coverage == 0 {
                        continue;
                    }
                    let x = glyph.x as isize + col as isize;
                    let y = glyph.y as isize + row as isize;
                    if x < 0 || y < 0 || x as usize >= tile_w || y as usize >= tile_h {
                        continue;
                    }
                    let alpha = (coverage as f32 / 255.0) * opacity;
                    let index = (y as usize * tile_w + x as usize) * 4;
                    blend_pixel(&mut tile.rgba[index..index + 4], [r, g, b], alpha);
                }
            }
        }
        tile
    }
}

struct Tile {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

/// Copies the background's natural pixels into the canvas top-left; the
/// canvas dimensions are derived from the background so they normally match.
fn blit_background(dst: &mut [u8], dst_w: u32, dst_h: u32, bg: &BackgroundImage) {
    let copy_w = bg.width.min(dst_w) as usize;
    let copy_h = bg.height.min(dst_h) as usize;
    for row in 0..copy_h {
        let src_start = row * bg.width as usize * 4;
        let dst_start = row * dst_w as usize * 4;
        dst[dst_start..dst_start + copy_w * 4]
            .copy_from_slice(&bg.rgba[src_start..src_start + copy_w * 4]);
    }
}

/// Blits the tile into the destination with the layer's rotation applied
/// around the layer box center (the same pivot the on-screen surface uses),
/// by inverse-mapping each destination pixel back into tile space (nearest
/// neighbor).
fn blit_rotated(dst: &mut [u8], dst_w: u32, dst_h: u32, tile: &Tile, layer: &TextLayer) {
    let angle = layer.rotation.to_radians();
    let (sin, cos) = angle.sin_cos();
    let half_w = tile.width as f32 / 2.0;
    // Tile rows past layer.height (overflowing text) rotate around the box
    // pivot too, not around their own center.
    let pivot_y = layer.height.max(1.0) / 2.0;
    let cx = layer.x + half_w;
    let cy = layer.y + pivot_y;

    // Axis-aligned bounds of the rotated tile, clipped to the canvas.
    let reach_y = pivot_y.max(tile.height as f32 - pivot_y);
    let extent_x = half_w * cos.abs() + reach_y * sin.abs();
    let extent_y = half_w * sin.abs() + reach_y * cos.abs();
    let min_x = ((cx - extent_x).floor().max(0.0)) as usize;
    let min_y = ((cy - extent_y).floor().max(0.0)) as usize;
    let max_x = ((cx + extent_x).ceil().min(dst_w as f32)) as usize;
    let max_y = ((cy + extent_y).ceil().min(dst_h as f32)) as usize;

    for y in min_y..max_y {
        for x in min_x..max_x {
            // Rotate the destination pixel back into unrotated tile space.
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let sx = dx * cos + dy * sin + half_w;
            let sy = -dx * sin + dy * cos + pivot_y;
            if sx < 0.0 || sy < 0.0 {
                continue;
            }
            let (sx, sy) = (sx as usize, sy as usize);
            if sx >= tile.width || sy >= tile.height {
                continue;
            }
            let src = &tile.rgba[(sy * tile.width + sx) * 4..(sy * tile.width + sx) * 4 + 4];
            let alpha = src[3] as f32 / 255.0;
            if alpha <= 0.0 {
                continue;
            }
            let index = (y * dst_w as usize + x) * 4;
            blend_pixel(&mut dst[index..index + 4], [src[0], src[1], src[2]], alpha);
        }
    }
}

/// Standard source-over blend of a straight-alpha color onto one RGBA pixel.
fn blend_pixel(dst: &mut [u8], src: [u8; 3], alpha: f32) {
    let inv = 1.0 - alpha;
    for channel in 0..3 {
        dst[channel] = (src[channel] as f32 * alpha + dst[channel] as f32 * inv).round() as u8;
    }
    let dst_a = dst[3] as f32 / 255.0;
    dst[3] = ((alpha + dst_a * inv) * 255.0).round() as u8;
}
