use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::decode,
    foundation::error::{VrcPngError, VrcPngResult},
};

/// Base name of the dark text backdrop image.
pub const TEXT_OVERLAY_NAME: &str = "text_overlay";
/// Base name of the rounded-corner alpha mask.
pub const CORNER_MASK_NAME: &str = "corner_mask";
/// Base name of the platform sprite sheet.
pub const PLATFORM_SHEET_NAME: &str = "vrc_platform";
/// Base name of the asset-file badge.
pub const FILE_ICON_NAME: &str = "file";
/// Font file candidates, in order of preference.
pub const FONT_CANDIDATES: [&str; 2] = ["font.ttf", "font.otf"];

/// Overlay images and font for one compositing call.
///
/// Always loaded fresh from disk; the compositor rewrites alpha channels and resizes these images,
/// so an instance must not be reused across calls.
#[derive(Clone, Debug)]
pub struct ThumbnailAssets {
    /// Dark backdrop behind the text, straight RGBA8.
    pub text_overlay: image::RgbaImage,
    /// Grayscale image that becomes the output alpha channel.
    pub corner_mask: image::GrayImage,
    /// Vertical sprite sheet of three platform badges, straight RGBA8.
    pub platform_sheet: image::RgbaImage,
    /// Badge drawn when an asset file accompanies the avatar, straight RGBA8.
    pub file_icon: image::RgbaImage,
    /// Raw TrueType/OpenType font bytes.
    pub font_bytes: Vec<u8>,
    /// Path the font was read from.
    pub font_path: PathBuf,
}

impl ThumbnailAssets {
    /// Load every asset from `data_dir`.
    ///
    /// Fails with [`VrcPngError::MissingAsset`] before decoding anything when the font or one of
    /// the four images is absent.
    pub fn load(data_dir: &Path) -> VrcPngResult<Self> {
        let font_path = resolve_font(data_dir)?;
        let overlay_path = require_png(data_dir, TEXT_OVERLAY_NAME)?;
        let mask_path = require_png(data_dir, CORNER_MASK_NAME)?;
        let sheet_path = require_png(data_dir, PLATFORM_SHEET_NAME)?;
        let file_path = require_png(data_dir, FILE_ICON_NAME)?;

        tracing::debug!(font = %font_path.display(), "loading thumbnail assets");

        Ok(Self {
            text_overlay: decode::decode_rgba8(&read_bytes(&overlay_path)?)
                .map_err(|e| with_asset_name(e, TEXT_OVERLAY_NAME))?,
            corner_mask: decode::decode_luma8(&read_bytes(&mask_path)?)
                .map_err(|e| with_asset_name(e, CORNER_MASK_NAME))?,
            platform_sheet: decode::decode_rgba8(&read_bytes(&sheet_path)?)
                .map_err(|e| with_asset_name(e, PLATFORM_SHEET_NAME))?,
            file_icon: decode::decode_rgba8(&read_bytes(&file_path)?)
                .map_err(|e| with_asset_name(e, FILE_ICON_NAME))?,
            font_bytes: read_bytes(&font_path)?,
            font_path,
        })
    }
}

/// Locate the font file, preferring `.ttf` over `.otf`.
pub fn resolve_font(data_dir: &Path) -> VrcPngResult<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(|name| data_dir.join(name))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            VrcPngError::missing_asset(format!(
                "no font.ttf or font.otf in '{}'",
                data_dir.display()
            ))
        })
}

fn require_png(data_dir: &Path, name: &str) -> VrcPngResult<PathBuf> {
    let path = data_dir.join(format!("{name}.png"));
    if path.is_file() {
        Ok(path)
    } else {
        Err(VrcPngError::missing_asset(format!(
            "'{}' not found",
            path.display()
        )))
    }
}

fn read_bytes(path: &Path) -> VrcPngResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(VrcPngError::from)
}

fn with_asset_name(err: VrcPngError, name: &str) -> VrcPngError {
    match err {
        VrcPngError::Decode(msg) => VrcPngError::decode(format!("asset '{name}': {msg}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bundle.rs"]
mod tests;
