//! Straight-alpha RGBA8 compositing primitives.
//!
//! Pasting follows mask-interpolation semantics: every channel of the destination, alpha
//! included, moves toward the source by `mask / 255`. This is not Porter-Duff "over"; a pasted
//! layer can lower destination alpha as well as raise it.

use crate::foundation::error::{VrcPngError, VrcPngResult};

/// One straight-alpha pixel.
pub type Rgba8 = [u8; 4];

/// Interpolate `dst` toward `src` by `mask` (0 keeps `dst`, 255 yields `src`).
pub fn lerp(dst: Rgba8, src: Rgba8, mask: u8) -> Rgba8 {
    if mask == 0 {
        return dst;
    }
    if mask == 255 {
        return src;
    }
    let m = u16::from(mask);
    let inv = 255 - m;
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = mul_add_div255(u16::from(src[i]), m, u16::from(dst[i]), inv);
    }
    out
}

/// Paste `src` onto `dst` at `(x, y)` using the alpha channel of `src` as the mask.
///
/// Regions outside `dst` are clipped.
pub fn paste_with_alpha(dst: &mut image::RgbaImage, src: &image::RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, px) in src.enumerate_pixels() {
        let tx = x + i64::from(sx);
        let ty = y + i64::from(sy);
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let d = dst.get_pixel_mut(tx as u32, ty as u32);
        d.0 = lerp(d.0, px.0, px.0[3]);
    }
}

/// Fill `dst` with `color` wherever `coverage` (row-major, one byte per pixel) is non-zero.
///
/// Fully transparent destination pixels take the color channels outright so glyph edges drawn
/// over cut-out corners keep their hue.
pub fn fill_with_coverage(
    dst: &mut image::RgbaImage,
    color: Rgba8,
    coverage: &[u8],
) -> VrcPngResult<()> {
    let expected = dst.width() as usize * dst.height() as usize;
    if coverage.len() != expected {
        return Err(VrcPngError::validation(format!(
            "coverage covers {} pixels, canvas has {expected}",
            coverage.len()
        )));
    }
    for (px, &cov) in dst.pixels_mut().zip(coverage) {
        if cov == 0 {
            continue;
        }
        let mut out = lerp(px.0, color, cov);
        if px.0[3] == 0 {
            out[..3].copy_from_slice(&color[..3]);
        }
        px.0 = out;
    }
    Ok(())
}

/// Replace the alpha channel of `dst` with the values of `mask`.
pub fn put_alpha(dst: &mut image::RgbaImage, mask: &image::GrayImage) -> VrcPngResult<()> {
    if dst.dimensions() != mask.dimensions() {
        return Err(VrcPngError::validation(format!(
            "alpha mask is {:?}, image is {:?}",
            mask.dimensions(),
            dst.dimensions()
        )));
    }
    for (px, m) in dst.pixels_mut().zip(mask.pixels()) {
        px.0[3] = m.0[0];
    }
    Ok(())
}

/// Multiply every alpha value by `factor`, rounding to nearest.
pub fn scale_alpha(img: &mut image::RgbaImage, factor: f64) {
    let factor = factor.clamp(0.0, 1.0);
    for px in img.pixels_mut() {
        px.0[3] = (f64::from(px.0[3]) * factor).round() as u8;
    }
}

/// Resample a straight-alpha image to `width` x `height`.
///
/// Filtering happens on premultiplied values so transparent pixels do not bleed their color into
/// neighbours. Requests for the current size return a copy.
pub fn resample_rgba8(
    img: &image::RgbaImage,
    width: u32,
    height: u32,
    filter: image::imageops::FilterType,
) -> image::RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    let mut premul = img.clone();
    premultiply_rgba8_in_place(&mut premul);
    let mut out = image::imageops::resize(&premul, width, height, filter);
    unpremultiply_rgba8_in_place(&mut out);
    out
}

/// Resample a grayscale image to `width` x `height`; same-size requests return a copy.
pub fn resample_luma8(
    img: &image::GrayImage,
    width: u32,
    height: u32,
    filter: image::imageops::FilterType,
) -> image::GrayImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    image::imageops::resize(img, width, height, filter)
}

fn premultiply_rgba8_in_place(img: &mut image::RgbaImage) {
    for px in img.pixels_mut() {
        let a = u16::from(px.0[3]);
        if a == 0 {
            px.0 = [0, 0, 0, 0];
            continue;
        }
        for c in &mut px.0[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply_rgba8_in_place(img: &mut image::RgbaImage) {
    for px in img.pixels_mut() {
        let a = u16::from(px.0[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px.0[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn mul_add_div255(a: u16, x: u16, b: u16, y: u16) -> u8 {
    (((u32::from(a) * u32::from(x)) + (u32::from(b) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
