use super::*;

#[test]
fn lerp_mask_0_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(lerp(dst, [200, 200, 200, 200], 0), dst);
}

#[test]
fn lerp_mask_255_replaces_dst() {
    assert_eq!(lerp([0, 0, 0, 255], [255, 0, 0, 10], 255), [255, 0, 0, 10]);
}

#[test]
fn lerp_blends_alpha_channel_too() {
    let out = lerp([0, 0, 0, 255], [255, 255, 255, 0], 128);
    assert_eq!(out, [128, 128, 128, 127]);
}

#[test]
fn paste_clips_and_offsets() {
    let mut dst = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
    let src = image::RgbaImage::from_pixel(3, 3, image::Rgba([255, 0, 0, 255]));
    paste_with_alpha(&mut dst, &src, 2, -1);

    assert_eq!(dst.get_pixel(2, 0).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(3, 1).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(2, 2).0, [0, 0, 0, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [0, 0, 0, 255]);
}

#[test]
fn paste_transparent_source_leaves_dst() {
    let mut dst = image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]));
    let src = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 0]));
    paste_with_alpha(&mut dst, &src, 0, 0);
    assert!(dst.pixels().all(|p| p.0 == [9, 9, 9, 255]));
}

#[test]
fn put_alpha_replaces_alpha_only() {
    let mut img = image::RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
    let mask = image::GrayImage::from_raw(2, 1, vec![0, 200]).unwrap();
    put_alpha(&mut img, &mask).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 0]);
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 200]);
}

#[test]
fn put_alpha_rejects_size_mismatch() {
    let mut img = image::RgbaImage::new(2, 2);
    let mask = image::GrayImage::new(3, 2);
    assert!(put_alpha(&mut img, &mask).is_err());
}

#[test]
fn scale_alpha_opaque_becomes_217() {
    let mut img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
    scale_alpha(&mut img, 0.85);
    assert!(img.pixels().all(|p| p.0 == [1, 2, 3, 217]));
}

#[test]
fn scale_alpha_keeps_transparent_transparent() {
    let mut img = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 0]));
    scale_alpha(&mut img, 0.85);
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
}

#[test]
fn fill_with_coverage_tints_only_covered_pixels() {
    let mut img = image::RgbaImage::from_pixel(2, 1, image::Rgba([0, 0, 0, 255]));
    fill_with_coverage(&mut img, [255, 255, 0, 255], &[0, 255]).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [255, 255, 0, 255]);
}

#[test]
fn fill_with_coverage_keeps_hue_on_transparent_pixels() {
    let mut img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 0]));
    fill_with_coverage(&mut img, [255, 255, 255, 255], &[64]).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 64]);
}

#[test]
fn fill_with_coverage_rejects_short_coverage() {
    let mut img = image::RgbaImage::new(2, 2);
    assert!(fill_with_coverage(&mut img, [255; 4], &[255; 3]).is_err());
}

#[test]
fn fill_with_coverage_rejects_long_coverage_untouched() {
    let mut img = image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]));
    let err = fill_with_coverage(&mut img, [255; 4], &[255; 5]).unwrap_err();
    assert!(err.to_string().contains("5 pixels"), "{err}");
    assert!(img.pixels().all(|p| p.0 == [9, 9, 9, 255]));
}

#[test]
fn resample_same_size_is_identity() {
    let img = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8, y as u8, 7, 200]));
    let out = resample_rgba8(&img, 3, 2, image::imageops::FilterType::Lanczos3);
    assert_eq!(out, img);
}

#[test]
fn resample_uniform_image_keeps_color() {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 100, 50, 255]));
    let out = resample_rgba8(&img, 3, 5, image::imageops::FilterType::CatmullRom);
    assert_eq!(out.dimensions(), (3, 5));
    assert!(out.pixels().all(|p| p.0 == [200, 100, 50, 255]));
}

#[test]
fn resample_does_not_bleed_transparent_color() {
    let img = image::RgbaImage::from_fn(4, 1, |x, _| {
        if x < 2 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });
    let out = resample_rgba8(&img, 2, 1, image::imageops::FilterType::Triangle);
    for px in out.pixels() {
        if px.0[3] > 0 {
            assert!(px.0[0] >= 250, "white edge darkened: {:?}", px.0);
        }
    }
}

#[test]
fn resample_luma_changes_dimensions() {
    let img = image::GrayImage::from_pixel(10, 10, image::Luma([255]));
    let out = resample_luma8(&img, 20, 5, image::imageops::FilterType::Lanczos3);
    assert_eq!(out.dimensions(), (20, 5));
}
