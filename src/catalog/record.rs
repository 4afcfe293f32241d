use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::error::{VrcPngError, VrcPngResult},
    platform::support::PlatformSupport,
};

/// Keys dropped from records before they are archived.
pub const FAVORITE_KEYS: [&str; 2] = ["favoriteId", "favoriteGroup"];
/// Extension of cached avatar bundles.
pub const ASSET_FILE_EXT: &str = "vrca";

/// Record version; the catalog emits integers but strings are tolerated.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RecordVersion {
    /// Numeric version.
    Number(u64),
    /// Free-form version.
    Text(String),
}

impl Default for RecordVersion {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl fmt::Display for RecordVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One build of the avatar for a client platform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UnityPackage {
    /// Catalog platform tag (`standalonewindows`, `android`, ...).
    pub platform: String,
    /// Remaining package fields, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Avatar metadata as exported from the catalog.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRecord {
    /// Catalog identifier (`avtr_...`).
    pub id: String,
    /// Record version.
    #[serde(default)]
    pub version: RecordVersion,
    /// Avatar display name.
    pub name: String,
    /// Author display name.
    pub author_name: String,
    /// Preview image URL.
    pub image_url: String,
    /// Platform builds.
    #[serde(default)]
    pub unity_packages: Vec<UnityPackage>,
    /// Remaining record fields, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AvatarRecord {
    /// Parse a single record from JSON text.
    pub fn from_json_str(s: &str) -> VrcPngResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| VrcPngError::validation(format!("invalid avatar record: {e}")))
    }

    /// `"{id}.{version}"`, the stem shared by every output of this record.
    pub fn unique_name(&self) -> String {
        format!("{}.{}", self.id, self.version)
    }

    /// Platform classification derived from the package list.
    pub fn platform_support(&self) -> PlatformSupport {
        PlatformSupport::from_tags(self.unity_packages.iter().map(|p| p.platform.as_str()))
    }

    /// File stem of the preview image: the URL segments between the file route and the trailing
    /// segment, joined with `.` (`.../file/file_abc/3/file` becomes `file_abc.3`).
    pub fn image_file_stem(&self) -> VrcPngResult<String> {
        let segments: Vec<&str> = self.image_url.split('/').collect();
        if segments.len() < 8 {
            return Err(VrcPngError::validation(format!(
                "image url '{}' has no file segments",
                self.image_url
            )));
        }
        Ok(segments[6..segments.len() - 1].join("."))
    }

    /// Drop the favorite bookkeeping keys.
    pub fn strip_favorites(&mut self) {
        for key in FAVORITE_KEYS {
            self.extra.remove(key);
        }
    }

    /// Pretty-printed JSON with favorite keys removed.
    pub fn to_archived_json(&self) -> VrcPngResult<String> {
        let mut copy = self.clone();
        copy.strip_favorites();
        serde_json::to_string_pretty(&copy)
            .map_err(|e| VrcPngError::validation(format!("serialize avatar record: {e}")))
    }

    /// Newest cached bundle for this avatar under `asset_dir`, searched recursively.
    ///
    /// Bundles are named `{id}.{anything}.vrca`; the lexicographically last path wins.
    pub fn find_asset_file(&self, asset_dir: &Path) -> VrcPngResult<Option<PathBuf>> {
        let prefix = format!("{}.", self.id);
        let suffix = format!(".{ASSET_FILE_EXT}");
        let mut found = Vec::new();
        collect_matching(asset_dir, &|name: &str| {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(&prefix)
                && name.ends_with(&suffix)
        }, &mut found)?;
        found.sort();
        Ok(found.pop())
    }
}

/// Load records from a JSON file holding one record object or an array of them.
pub fn load_records(path: &Path) -> VrcPngResult<Vec<AvatarRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read records from '{}'", path.display()))?;
    parse_records(&text)
}

/// Parse records from JSON text holding one record object or an array of them.
pub fn parse_records(text: &str) -> VrcPngResult<Vec<AvatarRecord>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| VrcPngError::validation(format!("invalid records json: {e}")))?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                serde_json::from_value(v).map_err(|e| {
                    VrcPngError::validation(format!("invalid avatar record at index {i}: {e}"))
                })
            })
            .collect(),
        v @ serde_json::Value::Object(_) => Ok(vec![
            serde_json::from_value(v)
                .map_err(|e| VrcPngError::validation(format!("invalid avatar record: {e}")))?,
        ]),
        _ => Err(VrcPngError::validation(
            "records json must be an object or an array of objects",
        )),
    }
}

fn collect_matching(
    dir: &Path,
    matches: &dyn Fn(&str) -> bool,
    out: &mut Vec<PathBuf>,
) -> VrcPngResult<()> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("read asset dir '{}'", dir.display()))?;
    for entry in rd {
        let entry =
            entry.with_context(|| format!("read entry of asset dir '{}'", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat '{}'", path.display()))?;
        if file_type.is_dir() {
            collect_matching(&path, matches, out)?;
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if matches(name) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/record.rs"]
mod tests;
