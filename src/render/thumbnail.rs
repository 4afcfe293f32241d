use std::path::Path;

use image::imageops::FilterType;

use crate::{
    assets::{bundle::ThumbnailAssets, decode},
    foundation::error::{VrcPngError, VrcPngResult},
    foundation::layout::{Canvas, ICON_ALPHA_SCALE, ThumbnailLayout},
    platform::support::PlatformSupport,
    render::blend,
    render::text::{CaptionRenderer, TextBrushRgba8},
};

/// Filter used to stretch the source image onto the canvas.
const BASE_FILTER: FilterType = FilterType::CatmullRom;
/// Filter used for overlays, mask and badges.
const ASSET_FILTER: FilterType = FilterType::Lanczos3;

/// Source image handed to the compositor.
#[derive(Clone, Copy, Debug)]
pub enum SourceImage<'a> {
    /// Already decoded image.
    Decoded(&'a image::DynamicImage),
    /// Encoded bytes in any format the `image` crate can sniff.
    Encoded(&'a [u8]),
}

impl SourceImage<'_> {
    fn to_rgba8(self) -> VrcPngResult<image::RgbaImage> {
        match self {
            SourceImage::Decoded(img) => Ok(img.to_rgba8()),
            SourceImage::Encoded(bytes) => decode::decode_rgba8(bytes),
        }
    }
}

/// Inputs of one compositing call.
#[derive(Clone, Copy, Debug)]
pub struct CompositionRequest<'a> {
    /// Avatar preview image.
    pub source: SourceImage<'a>,
    /// Platforms the avatar supports.
    pub platform: PlatformSupport,
    /// Avatar display name, drawn large in white.
    pub avatar_name: &'a str,
    /// Author display name, drawn smaller in yellow.
    pub author_name: &'a str,
    /// Directory holding the overlay images and font.
    pub data_dir: &'a Path,
    /// Draw the asset-file badge.
    pub contains_asset: bool,
}

/// Canvas after image layers, before captions.
#[derive(Clone, Debug)]
pub struct LayeredThumbnail {
    /// Composited RGBA8 canvas with the corner mask applied as alpha.
    pub image: image::RgbaImage,
    /// Geometry used to place the layers.
    pub layout: ThumbnailLayout,
    /// Height of the platform badge that was drawn.
    pub platform_badge_height: u32,
}

/// Produce the branded 1200x900 thumbnail for `req`.
///
/// Assets are read from `req.data_dir` on every call.
#[tracing::instrument(
    skip(req),
    fields(platform = %req.platform, contains_asset = req.contains_asset)
)]
pub fn make_thumbnail(req: &CompositionRequest<'_>) -> VrcPngResult<image::RgbaImage> {
    let assets = ThumbnailAssets::load(req.data_dir)?;
    let base = req.source.to_rgba8()?;

    let layered = compose_layers(&base, req.platform, &assets, req.contains_asset)?;
    let mut canvas = layered.image;

    let mut captions = CaptionRenderer::new(&assets.font_bytes)?;
    captions.draw(
        &mut canvas,
        req.avatar_name,
        layered.layout.title,
        TextBrushRgba8::WHITE,
    )?;
    captions.draw(
        &mut canvas,
        req.author_name,
        layered.layout.author,
        TextBrushRgba8::YELLOW,
    )?;

    tracing::debug!(
        width = canvas.width(),
        height = canvas.height(),
        "thumbnail composited"
    );
    Ok(canvas)
}

/// Stack the image layers: stretched base, text overlay, platform badge, corner mask, and the
/// optional file badge.
pub fn compose_layers(
    base: &image::RgbaImage,
    platform: PlatformSupport,
    assets: &ThumbnailAssets,
    contains_asset: bool,
) -> VrcPngResult<LayeredThumbnail> {
    let canvas_size = Canvas::THUMBNAIL;
    let (cw, ch) = canvas_size.dimensions();

    let mut canvas = blend::resample_rgba8(base, cw, ch, BASE_FILTER);
    let overlay = blend::resample_rgba8(&assets.text_overlay, cw, ch, ASSET_FILTER);
    let mask = blend::resample_luma8(&assets.corner_mask, cw, ch, ASSET_FILTER);

    let (sheet_w, sheet_h) = assets.platform_sheet.dimensions();
    let layout = ThumbnailLayout::new(canvas_size, sheet_w, sheet_h)?;

    let badge = platform_badge(&assets.platform_sheet, &layout, platform)?;
    let file_badge = soften_badge(
        &assets.file_icon,
        layout.file_icon_side,
        layout.file_icon_side,
    );

    blend::paste_with_alpha(&mut canvas, &overlay, 0, 0);
    let (px, py) = layout.platform_badge_origin();
    blend::paste_with_alpha(&mut canvas, &badge, px, py);
    blend::put_alpha(&mut canvas, &mask)?;

    if contains_asset {
        let (fx, fy) = layout.file_badge_origin(badge.height());
        blend::paste_with_alpha(&mut canvas, &file_badge, fx, fy);
    }

    Ok(LayeredThumbnail {
        image: canvas,
        layout,
        platform_badge_height: badge.height(),
    })
}

/// Soften and resize the sprite sheet, then crop the band for `platform`.
pub fn platform_badge(
    sheet: &image::RgbaImage,
    layout: &ThumbnailLayout,
    platform: PlatformSupport,
) -> VrcPngResult<image::RgbaImage> {
    let resized = soften_badge(sheet, layout.icon_width, layout.icon_sheet_height);
    let (top, bottom) = layout.sprite_band_rows(platform.sprite_band());
    if bottom <= top {
        return Err(VrcPngError::validation(format!(
            "platform sprite sheet too short for band {}",
            platform.sprite_band()
        )));
    }
    Ok(image::imageops::crop_imm(&resized, 0, top, resized.width(), bottom - top).to_image())
}

/// Scale a badge's alpha to 85% and resize it.
pub fn soften_badge(icon: &image::RgbaImage, width: u32, height: u32) -> image::RgbaImage {
    let mut softened = icon.clone();
    blend::scale_alpha(&mut softened, ICON_ALPHA_SCALE);
    blend::resample_rgba8(&softened, width, height, ASSET_FILTER)
}

#[cfg(test)]
#[path = "../../tests/unit/render/thumbnail.rs"]
mod tests;
