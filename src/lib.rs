//! Branded thumbnails for VRChat avatar archives.
//!
//! The crate turns an avatar preview image plus a little catalog metadata into a 1200x900 PNG
//! styled like the in-game avatar card: a platform badge, the avatar and author names, an optional
//! badge marking that the avatar bundle is included, and rounded corners. The PNG can carry a
//! trailing archive payload so a single file holds both the preview and the archived files.
//!
//! # Pipeline overview
//!
//! 1. **Classify**: catalog record -> [`PlatformSupport`] (which client builds exist)
//! 2. **Load**: data directory -> [`ThumbnailAssets`] (overlay, mask, sprite sheet, badge, font)
//! 3. **Lay out**: canvas + sprite sheet size -> [`ThumbnailLayout`]
//! 4. **Composite**: [`compose_layers`] stacks base, overlay, badge and mask
//! 5. **Caption**: [`CaptionRenderer`] draws the two names
//! 6. **Package**: [`write_png_with_payload`] writes the PNG, optionally followed by a
//!    [`RecordArchive`] holding the record JSON, preview, asset bundle and thumbnail
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Fresh assets per call**: [`make_thumbnail`] reloads the data directory every time, so
//!   concurrent calls never share mutable image state.
//! - **Straight RGBA8** at the API boundary; premultiplication only happens inside resampling.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assets;
mod catalog;
mod foundation;
mod package;
mod platform;
mod render;

#[cfg(test)]
#[path = "../tests/support/mod.rs"]
mod test_support;

pub use assets::bundle::{
    CORNER_MASK_NAME, FILE_ICON_NAME, FONT_CANDIDATES, PLATFORM_SHEET_NAME, TEXT_OVERLAY_NAME,
    ThumbnailAssets, resolve_font,
};
pub use assets::decode::{decode_image, decode_luma8, decode_rgba8};
pub use catalog::batch::{BatchOpts, BatchReport, RecordOutcome, process_record, run_batch};
pub use catalog::record::{
    ASSET_FILE_EXT, AvatarRecord, FAVORITE_KEYS, RecordVersion, UnityPackage, load_records,
    parse_records,
};
pub use foundation::error::{VrcPngError, VrcPngResult};
pub use foundation::layout::{
    CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, ICON_ALPHA_SCALE, SPRITE_BANDS, TextPlacement,
    ThumbnailLayout,
};
pub use package::archive::{RecordArchive, THUMBNAIL_ENTRY_NAME};
pub use package::embed::{
    encode_png, ensure_parent_dir, resolve_output_path, timestamped_output_name, unix_seconds,
    write_png_with_payload, write_thumbnail,
};
pub use platform::support::{PC_PLATFORM_TAG, PlatformSupport, QUEST_PLATFORM_TAG};
pub use render::blend::{
    Rgba8, fill_with_coverage, lerp, paste_with_alpha, put_alpha, resample_luma8, resample_rgba8,
    scale_alpha,
};
pub use render::text::{CaptionRenderer, TextBrushRgba8};
pub use render::thumbnail::{
    CompositionRequest, LayeredThumbnail, SourceImage, compose_layers, make_thumbnail,
    platform_badge, soften_badge,
};
