//! Pixel composition
//!
//! Source-over blending of straight-alpha RGBA frames, drawing of rotated
//! and scaled images, and flattening onto an opaque background.

use identikit_core::{ImageFrame, Placement, Rgba};

/// Blend `src` over `dst` with an extra opacity factor
pub fn blend_pixel(src: Rgba, dst: Rgba, opacity: f32) -> Rgba {
    let src_a = (src[3] as f32 / 255.0) * opacity;

    if src_a <= 0.0 {
        return dst;
    }

    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let blend = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    [
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

/// Blend a whole frame of the same size over `target`
pub fn blend_frame(target: &mut ImageFrame, source: &ImageFrame, opacity: f32) {
    if opacity <= 0.0 || target.dimensions() != source.dimensions() {
        return;
    }

    for (dst, src) in target
        .data
        .chunks_exact_mut(4)
        .zip(source.data.chunks_exact(4))
    {
        let out = blend_pixel(
            [src[0], src[1], src[2], src[3]],
            [dst[0], dst[1], dst[2], dst[3]],
            opacity,
        );
        dst.copy_from_slice(&out);
    }
}

/// Draw `source` scaled and rotated into `placement` on `target`
///
/// Every target pixel whose center falls inside the placement is mapped
/// back into the source image and sampled bilinearly.
pub fn draw_placed(target: &mut ImageFrame, source: &ImageFrame, placement: &Placement, opacity: f32) {
    let [w, h] = placement.size;
    if opacity <= 0.0 || w <= 0.0 || h <= 0.0 || source.width == 0 || source.height == 0 {
        return;
    }

    let Some((x0, y0, x1, y1)) = clip(placement, target, 0.0) else {
        return;
    };

    let scale_x = source.width as f64 / w;
    let scale_y = source.height as f64 / h;

    for y in y0..y1 {
        for x in x0..x1 {
            let [lx, ly] = placement.to_local([x as f64 + 0.5, y as f64 + 0.5]);
            if lx < 0.0 || ly < 0.0 || lx >= w || ly >= h {
                continue;
            }

            let src = sample_bilinear(source, lx * scale_x, ly * scale_y);
            if let Some(dst) = target.get_pixel(x, y) {
                target.set_pixel(x, y, blend_pixel(src, dst, opacity));
            }
        }
    }
}

/// Stroke a band of `width` pixels just outside the placement's edges
pub fn stroke_outline(target: &mut ImageFrame, placement: &Placement, width: f64, color: Rgba) {
    if width <= 0.0 {
        return;
    }

    let Some((x0, y0, x1, y1)) = clip(placement, target, width) else {
        return;
    };
    let [w, h] = placement.size;

    for y in y0..y1 {
        for x in x0..x1 {
            let [lx, ly] = placement.to_local([x as f64 + 0.5, y as f64 + 0.5]);
            let in_band = lx >= -width && ly >= -width && lx < w + width && ly < h + width;
            let inside = lx >= 0.0 && ly >= 0.0 && lx < w && ly < h;
            if in_band && !inside {
                if let Some(dst) = target.get_pixel(x, y) {
                    target.set_pixel(x, y, blend_pixel(color, dst, 1.0));
                }
            }
        }
    }
}

/// Composite a frame onto an opaque background, returning packed RGB8
pub fn flatten(frame: &ImageFrame, background: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(frame.width as usize * frame.height as usize * 3);

    for pixel in frame.pixels() {
        let out = blend_pixel(pixel, [background[0], background[1], background[2], 255], 1.0);
        rgb.extend_from_slice(&out[..3]);
    }

    rgb
}

/// Pixel rectangle `(x0, y0, x1, y1)` covered by the placement, clipped to `target`
fn clip(placement: &Placement, target: &ImageFrame, grow: f64) -> Option<(u32, u32, u32, u32)> {
    let bounds = placement.bounds().inflate(grow);
    if !bounds.min_x.is_finite() || !bounds.max_x.is_finite() {
        return None;
    }

    let x0 = bounds.min_x.floor().max(0.0);
    let y0 = bounds.min_y.floor().max(0.0);
    let x1 = bounds.max_x.ceil().min(target.width as f64);
    let y1 = bounds.max_y.ceil().min(target.height as f64);

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Bilinear sample at continuous source coordinates
///
/// Interpolates in premultiplied space so transparent texels do not bleed
/// their color into neighbours.
fn sample_bilinear(source: &ImageFrame, u: f64, v: f64) -> Rgba {
    let max_x = source.width as f64 - 1.0;
    let max_y = source.height as f64 - 1.0;
    let fx = (u - 0.5).clamp(0.0, max_x);
    let fy = (v - 0.5).clamp(0.0, max_y);

    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(source.width - 1);
    let y1 = (y0 + 1).min(source.height - 1);
    let tx = fx - x0 as f64;
    let ty = fy - y0 as f64;

    let texel = |x: u32, y: u32| -> [f64; 4] {
        let p = source.get_pixel(x, y).unwrap_or([0, 0, 0, 0]);
        let a = p[3] as f64 / 255.0;
        [p[0] as f64 * a, p[1] as f64 * a, p[2] as f64 * a, a]
    };

    let (p00, p10, p01, p11) = (texel(x0, y0), texel(x1, y0), texel(x0, y1), texel(x1, y1));
    let mut acc = [0.0; 4];
    for (i, value) in acc.iter_mut().enumerate() {
        let top = p00[i] + (p10[i] - p00[i]) * tx;
        let bottom = p01[i] + (p11[i] - p01[i]) * tx;
        *value = top + (bottom - top) * ty;
    }

    let alpha = acc[3];
    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }

    let channel = |c: f64| (c / alpha).round().clamp(0.0, 255.0) as u8;
    [
        channel(acc[0]),
        channel(acc[1]),
        channel(acc[2]),
        (alpha * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_opaque_replaces() {
        let out = blend_pixel([255, 0, 0, 255], [0, 0, 255, 255], 1.0);
        assert_eq!(out, [255, 0, 0, 255]);
    }

    #[test]
    fn test_blend_transparent_keeps_destination() {
        let dst = [10, 20, 30, 255];
        assert_eq!(blend_pixel([255, 255, 255, 0], dst, 1.0), dst);
        assert_eq!(blend_pixel([255, 255, 255, 255], dst, 0.0), dst);
    }

    #[test]
    fn test_blend_half_opacity() {
        let out = blend_pixel([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
        assert_eq!(out[3], 255);
        assert!((127..=128).contains(&out[0]));
    }

    #[test]
    fn test_draw_placed_scales() {
        let mut target = ImageFrame::filled(20, 20, [255, 255, 255, 255]);
        let source = ImageFrame::filled(2, 2, [255, 0, 0, 255]);
        let placement = Placement::axis_aligned([5.0, 5.0], [10.0, 10.0]);

        draw_placed(&mut target, &source, &placement, 1.0);

        assert_eq!(target.get_pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(target.get_pixel(14, 14), Some([255, 0, 0, 255]));
        assert_eq!(target.get_pixel(4, 5), Some([255, 255, 255, 255]));
        assert_eq!(target.get_pixel(15, 14), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_draw_placed_rotated_quarter_turn() {
        let mut target = ImageFrame::new(40, 40);
        let source = ImageFrame::filled(20, 4, [0, 0, 0, 255]);
        let mut placement = Placement::axis_aligned([10.0, 18.0], [20.0, 4.0]);
        placement.rotation = std::f64::consts::FRAC_PI_2;

        draw_placed(&mut target, &source, &placement, 1.0);

        // A horizontal bar turned upright
        assert_eq!(target.get_pixel(20, 12), Some([0, 0, 0, 255]));
        assert_eq!(target.get_pixel(12, 20), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_placed_off_artboard_is_clipped() {
        let mut target = ImageFrame::new(10, 10);
        let source = ImageFrame::filled(4, 4, [0, 0, 0, 255]);
        let placement = Placement::axis_aligned([-100.0, -100.0], [4.0, 4.0]);

        draw_placed(&mut target, &source, &placement, 1.0);
        assert!(target.pixels().all(|p| p == [0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_outline_surrounds() {
        let mut target = ImageFrame::new(20, 20);
        let placement = Placement::axis_aligned([5.0, 5.0], [10.0, 10.0]);
        stroke_outline(&mut target, &placement, 2.0, [0, 0, 255, 255]);

        assert_eq!(target.get_pixel(3, 10), Some([0, 0, 255, 255]));
        assert_eq!(target.get_pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(target.get_pixel(2, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_flatten_onto_white() {
        let mut frame = ImageFrame::new(2, 1);
        frame.set_pixel(1, 0, [0, 0, 0, 255]);

        let rgb = flatten(&frame, [255, 255, 255]);
        assert_eq!(rgb, vec![255, 255, 255, 0, 0, 0]);
    }
}
