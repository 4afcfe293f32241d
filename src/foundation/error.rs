/// Convenience result type used across the crate.
pub type VrcPngResult<T> = Result<T, VrcPngError>;

/// Top-level error taxonomy used by compositor and packaging APIs.
#[derive(thiserror::Error, Debug)]
pub enum VrcPngError {
    /// A required asset image or the font file is absent from the data directory.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// Platform ordinal or tag outside of the supported set.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Source or asset bytes could not be decoded as a raster image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Malformed caller input (catalog records, layout dimensions, font bytes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VrcPngError {
    /// Build a [`VrcPngError::MissingAsset`] value.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingAsset(msg.into())
    }

    /// Build a [`VrcPngError::UnsupportedPlatform`] value.
    pub fn unsupported_platform(msg: impl Into<String>) -> Self {
        Self::UnsupportedPlatform(msg.into())
    }

    /// Build a [`VrcPngError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`VrcPngError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
