use crate::foundation::error::{VrcPngError, VrcPngResult};

/// Reference thumbnail width in pixels.
pub const CANVAS_WIDTH: u32 = 1200;
/// Reference thumbnail height in pixels.
pub const CANVAS_HEIGHT: u32 = 900;
/// Multiplier applied to the alpha channel of the platform and file badges.
pub const ICON_ALPHA_SCALE: f64 = 0.85;
/// Number of equal-height frames stacked in the platform sprite sheet.
pub const SPRITE_BANDS: u32 = 3;

const ICON_WIDTH_RATIO: f64 = 320.0 / 1200.0;
const ICON_OFFSET_RATIO: f64 = 25.0 / 900.0;

/// Output canvas dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed 1200x900 thumbnail canvas.
    pub const THUMBNAIL: Canvas = Canvas {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    };

    /// Build a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> VrcPngResult<Self> {
        if width == 0 || height == 0 {
            return Err(VrcPngError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// `(width, height)` tuple.
    pub fn dimensions(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::THUMBNAIL
    }
}

/// Where and how large a line of text is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPlacement {
    /// Left edge in canvas pixels.
    pub x: u32,
    /// Top edge (ascender line) in canvas pixels.
    pub y: u32,
    /// Font size in pixels.
    pub size_px: u32,
}

/// Proportional geometry of one thumbnail.
///
/// Every value is derived from the canvas size and the native size of the platform sprite sheet;
/// truncation follows integer pixel semantics so the reference canvas yields the exact badge and
/// text coordinates (icon 320 px wide, 25 px margin, title at (120, 630), author at (240, 787)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbnailLayout {
    /// Canvas the layout was computed for.
    pub canvas: Canvas,
    /// Width of the resized platform sprite sheet.
    pub icon_width: u32,
    /// Height of the resized platform sprite sheet (all bands).
    pub icon_sheet_height: u32,
    /// Side of the square file badge.
    pub file_icon_side: u32,
    /// Margin between canvas edge and the platform badge.
    pub icon_offset: u32,
    /// Avatar name placement.
    pub title: TextPlacement,
    /// Author name placement.
    pub author: TextPlacement,
}

impl ThumbnailLayout {
    /// Compute the layout for `canvas` given the native sprite sheet dimensions.
    pub fn new(canvas: Canvas, sheet_width: u32, sheet_height: u32) -> VrcPngResult<Self> {
        if sheet_width == 0 || sheet_height == 0 {
            return Err(VrcPngError::validation(
                "platform sprite sheet dimensions must be > 0",
            ));
        }

        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);

        let icon_width = (ICON_WIDTH_RATIO * w).round().max(1.0) as u32;
        let icon_sheet_height = (f64::from(sheet_height) / f64::from(sheet_width)
            * f64::from(icon_width))
        .max(1.0) as u32;

        Ok(Self {
            canvas,
            icon_width,
            icon_sheet_height,
            file_icon_side: (icon_width / 2).max(1),
            icon_offset: (ICON_OFFSET_RATIO * h) as u32,
            title: TextPlacement {
                x: (w * 0.1) as u32,
                y: (h - h * 0.3) as u32,
                size_px: (w * 0.1) as u32,
            },
            author: TextPlacement {
                x: (w * 0.2) as u32,
                y: (h - h * 0.125) as u32,
                size_px: (w * 0.065) as u32,
            },
        })
    }

    /// Row range `[top, bottom)` of sprite band `band` in the resized sheet.
    pub fn sprite_band_rows(&self, band: u32) -> (u32, u32) {
        let band_h = f64::from(self.icon_sheet_height) / f64::from(SPRITE_BANDS);
        let top = (band_h * f64::from(band)) as u32;
        let bottom = (band_h * f64::from(band + 1)) as u32;
        (top, bottom.min(self.icon_sheet_height))
    }

    /// Top-left corner of the platform badge.
    pub fn platform_badge_origin(&self) -> (i64, i64) {
        let o = i64::from(self.icon_offset);
        (o, o)
    }

    /// Top-left corner of the file badge, placed below a platform badge of `band_height` rows.
    pub fn file_badge_origin(&self, band_height: u32) -> (i64, i64) {
        let o = f64::from(self.icon_offset);
        (
            (o * 1.5) as i64,
            i64::from(self.icon_offset) * 2 + i64::from(band_height),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/layout.rs"]
mod tests;
