use crate::foundation::error::{VrcPngError, VrcPngResult};

/// Decode encoded image bytes in any format the `image` crate recognizes.
pub fn decode_image(bytes: &[u8]) -> VrcPngResult<image::DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| VrcPngError::decode(e.to_string()))
}

/// Decode encoded image bytes and convert to straight (non-premultiplied) RGBA8.
pub fn decode_rgba8(bytes: &[u8]) -> VrcPngResult<image::RgbaImage> {
    Ok(decode_image(bytes)?.to_rgba8())
}

/// Decode encoded image bytes and convert to 8-bit luminance.
pub fn decode_luma8(bytes: &[u8]) -> VrcPngResult<image::GrayImage> {
    Ok(decode_image(bytes)?.to_luma8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
