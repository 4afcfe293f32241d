use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    catalog::record::AvatarRecord,
    foundation::error::{VrcPngError, VrcPngResult},
    package::{
        archive::{RecordArchive, THUMBNAIL_ENTRY_NAME},
        embed,
    },
    render::thumbnail::{CompositionRequest, SourceImage, make_thumbnail},
};

/// Options for a batch run over catalog records.
#[derive(Clone, Debug)]
pub struct BatchOpts {
    /// Directory holding the overlay images and font.
    pub data_dir: PathBuf,
    /// Directory holding the downloaded preview images (`{image_file_stem}.png`).
    pub images_dir: PathBuf,
    /// Optional cache directory searched for `{id}.*.vrca` bundles.
    pub asset_dir: Option<PathBuf>,
    /// Directory receiving `{unique_name}.png`.
    pub out_dir: PathBuf,
    /// Append a zip of the record JSON, preview, asset bundle and thumbnail to each PNG.
    pub embed_archive: bool,
    /// Also write `{unique_name}.json` next to each thumbnail.
    pub write_record_json: bool,
    /// Continue with the next record when one fails.
    pub keep_going: bool,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            images_dir: PathBuf::from("."),
            asset_dir: None,
            out_dir: PathBuf::from("."),
            embed_archive: true,
            write_record_json: false,
            keep_going: false,
        }
    }
}

/// Outcome of one record.
#[derive(Debug)]
pub struct RecordOutcome {
    /// `{id}.{version}` of the record.
    pub unique_name: String,
    /// Written thumbnail path, or the error that stopped it.
    pub result: VrcPngResult<PathBuf>,
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-record outcomes, in input order.
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    /// Number of records that produced a thumbnail.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of records that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Composite and write a thumbnail for every record.
///
/// Without `keep_going` the first failure is returned as the error; otherwise failures are logged
/// and recorded in the report.
pub fn run_batch(records: &[AvatarRecord], opts: &BatchOpts) -> VrcPngResult<BatchReport> {
    let mut report = BatchReport::default();
    for record in records {
        let unique_name = record.unique_name();
        tracing::info!(record = %unique_name, "processing record");

        match process_record(record, opts) {
            Ok(path) => {
                tracing::info!(out = %path.display(), "wrote thumbnail");
                report.outcomes.push(RecordOutcome {
                    unique_name,
                    result: Ok(path),
                });
            }
            Err(e) if opts.keep_going => {
                tracing::warn!(record = %unique_name, error = %e, "skipping record");
                report.outcomes.push(RecordOutcome {
                    unique_name,
                    result: Err(e),
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

/// Composite and write the thumbnail for one record, returning the output path.
///
/// Outputs of a record whose write fails are removed.
pub fn process_record(record: &AvatarRecord, opts: &BatchOpts) -> VrcPngResult<PathBuf> {
    let image_name = format!("{}.png", record.image_file_stem()?);
    let image_path = opts.images_dir.join(&image_name);
    let source = std::fs::read(&image_path)
        .with_context(|| format!("read preview image '{}'", image_path.display()))?;

    let asset_file = match &opts.asset_dir {
        Some(dir) => record.find_asset_file(dir)?,
        None => None,
    };
    if let Some(p) = &asset_file {
        tracing::debug!(asset = %p.display(), "found asset bundle");
    }

    let image = make_thumbnail(&CompositionRequest {
        source: SourceImage::Encoded(&source),
        platform: record.platform_support(),
        avatar_name: &record.name,
        author_name: &record.author_name,
        data_dir: &opts.data_dir,
        contains_asset: asset_file.is_some(),
    })?;
    let png = embed::encode_png(&image)?;

    let unique_name = record.unique_name();
    let out = opts.out_dir.join(format!("{unique_name}.png"));
    let json_path = opts.out_dir.join(format!("{unique_name}.json"));

    let files = RecordFiles {
        unique_name: &unique_name,
        image_name: &image_name,
        source: &source,
        asset_file: asset_file.as_deref(),
        png: &png,
    };
    let written = write_record_outputs(record, opts, &files, &out, &json_path);

    if let Err(e) = written {
        remove_partial(&out);
        if opts.write_record_json {
            remove_partial(&json_path);
        }
        return Err(e);
    }
    Ok(out)
}

struct RecordFiles<'a> {
    unique_name: &'a str,
    image_name: &'a str,
    source: &'a [u8],
    asset_file: Option<&'a Path>,
    png: &'a [u8],
}

fn write_record_outputs(
    record: &AvatarRecord,
    opts: &BatchOpts,
    files: &RecordFiles<'_>,
    out: &Path,
    json_path: &Path,
) -> VrcPngResult<()> {
    let archive = if opts.embed_archive {
        Some(build_record_archive(record, files)?)
    } else {
        None
    };
    embed::write_png_with_payload(out, files.png, archive.as_deref())?;
    if opts.write_record_json {
        write_record_json(json_path, record)?;
    }
    Ok(())
}

/// Zip holding the record JSON, the preview image, the asset bundle if any, an empty entry
/// named after the current Unix time, and the rendered thumbnail.
fn build_record_archive(
    record: &AvatarRecord,
    src: &RecordFiles<'_>,
) -> VrcPngResult<Vec<u8>> {
    let mut archive = RecordArchive::new();
    archive.add_bytes(
        &format!("{}.json", src.unique_name),
        record.to_archived_json()?.as_bytes(),
    )?;
    archive.add_bytes(src.image_name, src.source)?;
    if let Some(path) = src.asset_file {
        let name = path.file_name().and_then(|s| s.to_str()).ok_or_else(|| {
            VrcPngError::validation(format!("asset path '{}' has no file name", path.display()))
        })?;
        archive.add_file(name, path)?;
    }
    archive.add_bytes(&embed::unix_seconds().to_string(), b"")?;
    archive.add_bytes(THUMBNAIL_ENTRY_NAME, src.png)?;
    archive.finish()
}

fn remove_partial(path: &Path) {
    if path.is_file() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/batch.rs"]
mod tests;
