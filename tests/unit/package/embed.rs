use super::*;
use crate::test_support;

fn sample() -> image::RgbaImage {
    image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 40]))
}

#[test]
fn encode_png_round_trips_pixels() {
    let png = encode_png(&sample()).unwrap();
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back, sample());
}

#[test]
fn payload_is_appended_after_png() {
    let dir = test_support::fresh_dir("embed_payload");
    let out = dir.join("nested").join("out.png");

    write_thumbnail(&out, &sample(), Some(b"PK\x03\x04payload-bytes".as_slice())).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    let png = encode_png(&sample()).unwrap();
    assert_eq!(&bytes[..png.len()], png.as_slice());
    assert_eq!(&bytes[png.len()..], b"PK\x03\x04payload-bytes");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded, sample());
}

#[test]
fn payload_containing_iend_does_not_disturb_png() {
    let dir = test_support::fresh_dir("embed_payload_iend");
    let out = dir.join("out.png");
    let png = encode_png(&sample()).unwrap();
    let payload: &[u8] = b"k\0IENDzz\0\0\0\0IEND";

    write_png_with_payload(&out, &png, Some(payload)).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.len(), png.len() + payload.len());
    assert_eq!(&bytes[png.len()..], payload);
    assert_eq!(image::load_from_memory(&bytes).unwrap().to_rgba8(), sample());
}

#[test]
fn no_payload_writes_plain_png() {
    let dir = test_support::fresh_dir("embed_plain");
    let out = dir.join("out.png");
    write_thumbnail(&out, &sample(), None).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes, encode_png(&sample()).unwrap());
}

#[test]
fn unwritable_output_is_an_error() {
    let dir = test_support::fresh_dir("embed_unwritable");
    // a directory where the file should go
    let out = dir.join("taken.png");
    std::fs::create_dir_all(&out).unwrap();
    assert!(write_thumbnail(&out, &sample(), None).is_err());
}

#[test]
fn timestamped_name_has_stem_and_extension() {
    let name = timestamped_output_name("avatar");
    assert!(name.ends_with(".avatar.png"));
    let secs = name.split('.').next().unwrap();
    assert!(secs.parse::<u64>().is_ok());
}

#[test]
fn resolve_output_path_variants() {
    let dir = test_support::fresh_dir("embed_resolve");
    let input = dir.join("pic.jpg");

    let explicit = dir.join("explicit.png");
    assert_eq!(resolve_output_path(&input, Some(&explicit)), explicit);

    let in_dir = resolve_output_path(&input, Some(&dir));
    assert_eq!(in_dir.parent().unwrap(), dir.as_path());
    assert!(in_dir.to_string_lossy().ends_with(".pic.png"));

    let beside = resolve_output_path(&input, None);
    assert_eq!(beside.parent().unwrap(), dir.as_path());
}
