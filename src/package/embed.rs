use std::{
    io::Write as _,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;

use crate::foundation::error::{VrcPngError, VrcPngResult};

/// Encode an RGBA8 image as PNG bytes.
pub fn encode_png(image: &image::RgbaImage) -> VrcPngResult<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| VrcPngError::Other(anyhow::anyhow!("encode png: {e}")))?;
    Ok(buf)
}

/// Write `image` as PNG to `out`, followed verbatim by `payload` when given.
pub fn write_thumbnail(
    out: &Path,
    image: &image::RgbaImage,
    payload: Option<&[u8]>,
) -> VrcPngResult<()> {
    let png = encode_png(image)?;
    write_png_with_payload(out, &png, payload)
}

/// Write already-encoded `png` to `out` and append `payload` after its IEND chunk.
///
/// PNG readers stop at the IEND chunk and zip readers locate their directory from the end of the
/// file, so a zip payload leaves the result readable as both.
pub fn write_png_with_payload(
    out: &Path,
    png: &[u8],
    payload: Option<&[u8]>,
) -> VrcPngResult<()> {
    ensure_parent_dir(out)?;
    let mut file = std::fs::File::create(out)
        .with_context(|| format!("create output '{}'", out.display()))?;
    file.write_all(png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    if let Some(payload) = payload {
        file.write_all(payload)
            .with_context(|| format!("append payload to '{}'", out.display()))?;
        tracing::debug!(bytes = payload.len(), out = %out.display(), "payload appended");
    }
    file.flush()
        .with_context(|| format!("flush output '{}'", out.display()))?;
    Ok(())
}

/// Seconds since the Unix epoch, 0 if the clock is before it.
pub fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `"{unix_seconds}.{stem}.png"`.
pub fn timestamped_output_name(stem: &str) -> String {
    format!("{}.{stem}.png", unix_seconds())
}

/// Resolve the output path of a single-image run.
///
/// `out` may be a file path, an existing directory, or absent (next to `input`).
pub fn resolve_output_path(input: &Path, out: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("thumbnail");
    match out {
        Some(p) if !p.is_dir() => p.to_path_buf(),
        Some(dir) => dir.join(timestamped_output_name(stem)),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(timestamped_output_name(stem)),
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> VrcPngResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/package/embed.rs"]
mod tests;
