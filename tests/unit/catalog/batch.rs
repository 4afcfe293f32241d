use std::io::Read as _;

use super::*;
use crate::test_support;

/// Data dir with images and a host font; `None` when the host has no font.
fn full_data_dir(dir: &Path) -> Option<PathBuf> {
    let data_dir = dir.join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    test_support::write_image_assets(&data_dir, (1200, 900));
    test_support::install_system_font(&data_dir).then_some(data_dir)
}

/// Split an output file into its PNG pixels and the archive appended after it.
fn split_output(bytes: &[u8]) -> (image::RgbaImage, Vec<u8>) {
    let img = image::load_from_memory(bytes).unwrap().to_rgba8();
    let png_len = embed::encode_png(&img).unwrap().len();
    (img, bytes[png_len..].to_vec())
}

fn zip_entry(archive: &[u8], name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive)).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut out = Vec::new();
    entry.read_to_end(&mut out).unwrap();
    out
}

fn record(id: &str, file: &str) -> AvatarRecord {
    AvatarRecord::from_json_str(&format!(
        r#"{{
  "id": "{id}",
  "version": 2,
  "name": "Rex",
  "authorName": "Jane",
  "imageUrl": "https://api.vrchat.cloud/api/1/file/{file}/1/file",
  "unityPackages": [{{ "platform": "standalonewindows" }}],
  "favoriteId": "fvrt_x"
}}"#
    ))
    .unwrap()
}

fn opts_in(dir: &Path, data_dir: PathBuf) -> BatchOpts {
    let images_dir = dir.join("images");
    let out_dir = dir.join("out");
    std::fs::create_dir_all(&images_dir).unwrap();
    BatchOpts {
        data_dir,
        images_dir,
        out_dir,
        ..BatchOpts::default()
    }
}

fn write_preview(opts: &BatchOpts, file: &str) {
    test_support::write_png(
        &opts.images_dir.join(format!("{file}.1.png")),
        image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            64,
            64,
            image::Rgba([255, 0, 0, 255]),
        )),
    );
}

#[test]
fn missing_preview_aborts_without_keep_going() {
    let dir = test_support::fresh_dir("batch_abort");
    let opts = opts_in(&dir, dir.join("data"));
    let err = run_batch(&[record("avtr_a", "file_a")], &opts).unwrap_err();
    assert!(err.to_string().contains("file_a.1.png"), "{err}");
}

#[test]
fn keep_going_records_failures() {
    let dir = test_support::fresh_dir("batch_keep_going");
    let opts = BatchOpts {
        keep_going: true,
        ..opts_in(&dir, dir.join("data"))
    };
    let report = run_batch(
        &[record("avtr_a", "file_a"), record("avtr_b", "file_b")],
        &opts,
    )
    .unwrap();
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.outcomes[1].unique_name, "avtr_b.2");
}

#[test]
fn missing_assets_do_not_leave_output() {
    let dir = test_support::fresh_dir("batch_missing_assets");
    let opts = opts_in(&dir, dir.join("data"));
    write_preview(&opts, "file_a");

    let err = process_record(&record("avtr_a", "file_a"), &opts).unwrap_err();
    assert!(matches!(err, VrcPngError::MissingAsset(_)));
    assert!(!opts.out_dir.join("avtr_a.2.png").exists());
}

#[test]
fn writes_thumbnail_json_and_archives_bundle() {
    let dir = test_support::fresh_dir("batch_full");
    let Some(data_dir) = full_data_dir(&dir) else {
        return;
    };

    let asset_dir = dir.join("cache");
    std::fs::create_dir_all(&asset_dir).unwrap();
    std::fs::write(asset_dir.join("avtr_a.2.vrca"), b"bundle").unwrap();

    let opts = BatchOpts {
        asset_dir: Some(asset_dir),
        write_record_json: true,
        ..opts_in(&dir, data_dir)
    };
    write_preview(&opts, "file_a");

    let report = run_batch(&[record("avtr_a", "file_a")], &opts).unwrap();
    assert_eq!(report.succeeded(), 1);

    let bytes = std::fs::read(opts.out_dir.join("avtr_a.2.png")).unwrap();
    let (img, archive) = split_output(&bytes);
    assert_eq!(img.dimensions(), (1200, 900));
    // file badge centre
    let px = img.get_pixel(117, 290).0;
    assert!(px[0] > 200 && px[1] < 60 && px[2] > 150, "no file badge: {px:?}");

    let names: Vec<String> = zip::ZipArchive::new(std::io::Cursor::new(archive.as_slice()))
        .unwrap()
        .file_names()
        .map(str::to_owned)
        .collect();
    for expected in ["avtr_a.2.json", "file_a.1.png", "avtr_a.2.vrca", "image.png"] {
        assert!(names.iter().any(|n| n == expected), "{expected} missing: {names:?}");
    }
    assert!(
        names.iter().any(|n| n.parse::<u64>().is_ok()),
        "no timestamp entry: {names:?}"
    );
    assert_eq!(zip_entry(&archive, "avtr_a.2.vrca"), b"bundle");
    assert_eq!(
        image::load_from_memory(&zip_entry(&archive, "image.png"))
            .unwrap()
            .to_rgba8(),
        img
    );
    let archived_json = String::from_utf8(zip_entry(&archive, "avtr_a.2.json")).unwrap();
    assert!(!archived_json.contains("favoriteId"));

    let json = std::fs::read_to_string(opts.out_dir.join("avtr_a.2.json")).unwrap();
    assert!(!json.contains("favoriteId"));
}

#[test]
fn without_archive_writes_plain_png() {
    let dir = test_support::fresh_dir("batch_no_archive");
    let Some(data_dir) = full_data_dir(&dir) else {
        return;
    };
    let opts = BatchOpts {
        embed_archive: false,
        ..opts_in(&dir, data_dir)
    };
    write_preview(&opts, "file_a");

    let out = process_record(&record("avtr_a", "file_a"), &opts).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    let (_, trailing) = split_output(&bytes);
    assert!(trailing.is_empty());
}

#[test]
fn failed_json_write_removes_thumbnail() {
    let dir = test_support::fresh_dir("batch_json_unwritable");
    let Some(data_dir) = full_data_dir(&dir) else {
        return;
    };
    let opts = BatchOpts {
        write_record_json: true,
        ..opts_in(&dir, data_dir)
    };
    write_preview(&opts, "file_a");
    // a directory squatting on the json path
    std::fs::create_dir_all(opts.out_dir.join("avtr_a.2.json")).unwrap();

    let err = process_record(&record("avtr_a", "file_a"), &opts).unwrap_err();
    assert!(err.to_string().contains("avtr_a.2.json"), "{err}");
    assert!(!opts.out_dir.join("avtr_a.2.png").exists());
    assert!(opts.out_dir.join("avtr_a.2.json").is_dir());
}
