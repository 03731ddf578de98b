//! Backend-independent raster helpers.
//!
//! All buffers are straight-alpha RGBA8. Compositing is integer source-over with exact fast
//! paths, so drawing onto a transparent canvas reproduces the source pixels bit for bit.

use crate::{
    convert::backend::RasterImage,
    foundation::error::{SpriteError, SpriteResult},
};

pub type Rgba8 = [u8; 4];

/// Straight-alpha source-over of one pixel.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    let da = u32::from(dst[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 || da == 0 {
        return src;
    }

    let inv = 255 - sa;
    // Alpha scaled by 255 to keep the colour division exact enough in integers.
    let a255 = sa * 255 + da * inv;

    let mut out = [0u8; 4];
    out[3] = ((a255 + 127) / 255).min(255) as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + a255 / 2) / a255).min(255) as u8;
    }
    out
}

/// Draw `src` onto `canvas` with its top-left corner at `(x, y)`, clipping to the canvas.
pub fn draw_over(canvas: &mut RasterImage, src: &RasterImage, x: i64, y: i64) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(cw);
    let y1 = (y + sh).min(ch);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for dy in y0..y1 {
        for dx in x0..x1 {
            let s = src.get_pixel((dx - x) as u32, (dy - y) as u32).0;
            let d = canvas.get_pixel_mut(dx as u32, dy as u32);
            d.0 = over(d.0, s);
        }
    }
}

/// Tight bounding box `(x, y, width, height)` of pixels with non-zero alpha.
pub fn content_bounds(image: &RasterImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in image.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Crop away fully transparent rows and columns around the content.
///
/// An image with no visible pixel becomes a 1x1 transparent image.
pub fn trim_transparent_border(image: &RasterImage) -> RasterImage {
    match content_bounds(image) {
        Some((x, y, w, h)) => image::imageops::crop_imm(image, x, y, w, h).to_image(),
        None => RasterImage::new(1, 1),
    }
}

/// Nearest-neighbor resize: destination pixel `d` samples source `floor(d * src / dst)`.
///
/// Returns an identical copy when the size already matches.
pub fn resize_nearest(image: &RasterImage, width: u32, height: u32) -> SpriteResult<RasterImage> {
    if width == 0 || height == 0 {
        return Err(SpriteError::invalid_dimension(
            i64::from(width),
            i64::from(height),
        ));
    }
    let (sw, sh) = image.dimensions();
    if (sw, sh) == (width, height) {
        return Ok(image.clone());
    }
    if sw == 0 || sh == 0 {
        return Ok(RasterImage::new(width, height));
    }

    let col_map = (0..width)
        .map(|x| sample_index(x, sw, width))
        .collect::<Vec<_>>();
    let mut out = RasterImage::new(width, height);
    for y in 0..height {
        let sy = sample_index(y, sh, height);
        for (x, &sx) in col_map.iter().enumerate() {
            out.put_pixel(x as u32, y, *image.get_pixel(sx, sy));
        }
    }
    Ok(out)
}

fn sample_index(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    let v = u64::from(dst) * u64::from(src_len) / u64::from(dst_len);
    (v as u32).min(src_len - 1)
}

/// Largest aspect-preserving nearest-neighbor resize that fits within `max_w x max_h`.
pub fn fit_within(image: &RasterImage, max_w: u32, max_h: u32) -> SpriteResult<RasterImage> {
    let (sw, sh) = image.dimensions();
    if sw == 0 || sh == 0 {
        return Err(SpriteError::invalid_dimension(i64::from(sw), i64::from(sh)));
    }
    let scale = (f64::from(max_w) / f64::from(sw)).min(f64::from(max_h) / f64::from(sh));
    let w = ((f64::from(sw) * scale).floor() as u32).clamp(1, max_w.max(1));
    let h = ((f64::from(sh) * scale).floor() as u32).clamp(1, max_h.max(1));
    resize_nearest(image, w, h)
}

/// Surround the image with `amount` transparent pixels on every side.
pub fn pad_image(image: &RasterImage, amount: u32) -> SpriteResult<RasterImage> {
    let grow = |side: u32| amount.checked_mul(2).and_then(|extra| side.checked_add(extra));
    let (Some(w), Some(h)) = (grow(image.width()), grow(image.height())) else {
        return Err(SpriteError::configuration(format!(
            "padding {amount} overflows a {}x{} image",
            image.width(),
            image.height()
        )));
    };
    let mut out = RasterImage::new(w, h);
    draw_over(&mut out, image, i64::from(amount), i64::from(amount));
    Ok(out)
}

/// Place the image centered on a transparent canvas; content larger than the canvas is clipped.
pub fn center_on_canvas(image: &RasterImage, canvas_width: u32, canvas_height: u32) -> RasterImage {
    let mut out = RasterImage::new(canvas_width, canvas_height);
    let x = (i64::from(canvas_width) - i64::from(image.width())) / 2;
    let y = (i64::from(canvas_height) - i64::from(image.height())) / 2;
    draw_over(&mut out, image, x, y);
    out
}

/// Convert premultiplied RGBA8 to straight alpha in place.
pub fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/image_ops.rs"]
mod tests;
