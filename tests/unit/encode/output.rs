use std::path::PathBuf;

use super::*;
use crate::foundation::core::Rgba8Premul;

#[test]
fn format_is_inferred_from_extension() {
    assert_eq!(OutputFormat::from_path(Path::new("a/b.PNG")), OutputFormat::Png);
    assert_eq!(OutputFormat::from_path(Path::new("map.jpg")), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_path(Path::new("map.jpeg")), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_path(Path::new("map.bmp")), OutputFormat::Bmp);
    assert_eq!(OutputFormat::from_path(Path::new("map")), OutputFormat::Png);
}

#[test]
fn png_output_round_trips_straight_alpha() {
    let px = Rgba8Premul::from_straight_rgba(200, 100, 0, 128);
    let canvas = Canvas::filled(3, 2, px).unwrap();
    let bytes = encode_canvas(&canvas, OutputFormat::Png).unwrap();

    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    let p = back.get_pixel(1, 1).0;
    assert_eq!(p[3], 128);
    assert!((i16::from(p[0]) - 200).abs() <= 1);
    assert!((i16::from(p[1]) - 100).abs() <= 1);
}

#[test]
fn jpeg_output_is_opaque_rgb() {
    let canvas = Canvas::filled(8, 8, Rgba8Premul::from_straight_rgba(0, 0, 255, 255)).unwrap();
    let bytes = encode_canvas(&canvas, OutputFormat::Jpeg).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    let back = image::load_from_memory(&bytes).unwrap();
    assert_eq!(back.color(), image::ColorType::Rgb8);
}

#[test]
fn save_creates_parent_dirs() {
    let dir = PathBuf::from("target").join("unit_encode_output");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("out.png");

    let canvas = Canvas::new(4, 4).unwrap();
    save_canvas(&canvas, &path).unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (4, 4));
}

#[test]
fn save_into_a_file_path_is_io_error() {
    let dir = PathBuf::from("target").join("unit_encode_blocked");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let canvas = Canvas::new(2, 2).unwrap();
    let err = save_canvas(&canvas, &blocker.join("out.png")).unwrap_err();
    assert!(matches!(err, TrackmapError::Io { .. }));
}
