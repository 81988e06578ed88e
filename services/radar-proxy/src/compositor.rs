//! Two-layer tile compositing and PNG encoding.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};

use tile_common::{ProxyError, ProxyResult};

/// Draw `overlay` over `base` with alpha-over blending.
///
/// The output has `base`'s dimensions. Both inputs are expected to cover the
/// same pixel rectangle; if they differ, only the common top-left region is
/// blended.
pub fn composite(base: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let mut output = base.clone();
    let width = base.width().min(overlay.width());
    let height = base.height().min(overlay.height());

    for y in 0..height {
        for x in 0..width {
            let top = *overlay.get_pixel(x, y);
            let pixel = output.get_pixel_mut(x, y);
            *pixel = blend_over(*pixel, top);
        }
    }

    output
}

/// Porter-Duff "over" for straight (non-premultiplied) RGBA.
fn blend_over(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let Rgba([tr, tg, tb, ta]) = top;
    match ta {
        0 => return bottom,
        255 => return top,
        _ => {}
    }

    let Rgba([br, bg, bb, ba]) = bottom;
    let top_a = ta as f32 / 255.0;
    let bottom_a = ba as f32 / 255.0 * (1.0 - top_a);
    let out_a = top_a + bottom_a;

    let channel =
        |t: u8, b: u8| ((t as f32 * top_a + b as f32 * bottom_a) / out_a).round() as u8;

    Rgba([
        channel(tr, br),
        channel(tg, bg),
        channel(tb, bb),
        (out_a * 255.0).round() as u8,
    ])
}

/// Encode an RGBA tile as PNG.
pub fn encode_png(image: &RgbaImage) -> ProxyResult<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| ProxyError::Encode(e.to_string()))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> RgbaImage {
        RgbaImage::from_fn(256, 256, |x, y| {
            if (x / 16 + y / 16) % 2 == 0 {
                Rgba([0, 0, 255, 255])
            } else {
                Rgba([30, 200, 40, 90])
            }
        })
    }

    #[test]
    fn test_transparent_overlay_leaves_base_unchanged() {
        let base = checkerboard();
        let overlay = RgbaImage::from_pixel(256, 256, Rgba([255, 255, 255, 0]));

        let output = composite(&base, &overlay);
        assert_eq!(output, base);
    }

    #[test]
    fn test_opaque_overlay_replaces_base() {
        let base = checkerboard();
        let overlay = RgbaImage::from_pixel(256, 256, Rgba([255, 0, 0, 255]));

        let output = composite(&base, &overlay);
        assert!(output.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_half_alpha_over_opaque() {
        let base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 128]));

        let output = composite(&base, &overlay);
        assert_eq!(output.get_pixel(0, 0), &Rgba([128, 0, 127, 255]));
    }

    #[test]
    fn test_overlay_on_transparent_base_keeps_overlay_color() {
        let base = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let overlay = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 64]));

        let output = composite(&base, &overlay);
        assert_eq!(output.get_pixel(1, 1), &Rgba([200, 100, 50, 64]));
    }

    #[test]
    fn test_smaller_overlay_is_cropped() {
        let base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        let overlay = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));

        let output = composite(&base, &overlay);
        assert_eq!(output.dimensions(), (4, 4));
        assert_eq!(output.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(output.get_pixel(3, 3), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_encode_png_round_trips_dimensions() {
        let png = encode_png(&checkerboard()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, checkerboard());
    }
}
