use std::io::Cursor;

use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::TrackmapError;

fn solid_png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn white(w: u32, h: u32) -> Canvas {
    Canvas::filled(w, h, Rgba8Premul::from_straight_rgba(255, 255, 255, 255)).unwrap()
}

fn text_setup() -> (TextLayoutEngine, TextStyle) {
    let mut engine = TextLayoutEngine::new();
    let family = engine
        .register_font(std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap())
        .unwrap();
    (
        engine,
        TextStyle {
            font_family: family,
            ..TextStyle::default()
        },
    )
}

#[test]
fn marker_is_centered_on_anchor() {
    let mut canvas = white(200, 200);
    let (mut engine, style) = text_setup();
    let poi = PointOfInterest::new(100, 100, solid_png(16, 16, [0, 0, 255, 255]), "");
    draw_points(&mut canvas, &[poi], &mut engine, &style).unwrap();

    let blue = [0, 0, 255, 255];
    assert_eq!(canvas.pixel(92, 92).unwrap().to_array(), blue);
    assert_eq!(canvas.pixel(107, 107).unwrap().to_array(), blue);
    assert_eq!(canvas.pixel(91, 92).unwrap().to_array(), [255; 4]);
    assert_eq!(canvas.pixel(108, 108).unwrap().to_array(), [255; 4]);
}

#[test]
fn odd_sized_marker_rounds_origin_toward_anchor() {
    let poi = PointOfInterest::new(10, 10, Vec::new(), "x");
    assert_eq!(poi.centered_origin(5, 3), (8, 9));
    assert_eq!(poi.label_anchor(), Point::new(20.0, 12.0));
}

#[test]
fn anchors_at_coordinate_limits_saturate() {
    let poi = PointOfInterest::new(i64::MAX, i64::MIN, Vec::new(), "x");
    assert_eq!(poi.centered_origin(16, 16), (i64::MAX - 8, i64::MIN));
    assert_eq!(
        poi.label_anchor(),
        Point::new(i64::MAX as f64, (i64::MIN + 2) as f64)
    );
}

#[test]
fn later_marker_occludes_earlier_marker() {
    let mut canvas = white(50, 50);
    let (mut engine, style) = text_setup();
    let points = [
        PointOfInterest::new(20, 20, solid_png(10, 10, [255, 0, 0, 255]), ""),
        PointOfInterest::new(25, 25, solid_png(10, 10, [0, 255, 0, 255]), ""),
    ];
    draw_points(&mut canvas, &points, &mut engine, &style).unwrap();

    assert_eq!(canvas.pixel(22, 22).unwrap().to_array(), [0, 255, 0, 255]);
    assert_eq!(canvas.pixel(16, 16).unwrap().to_array(), [255, 0, 0, 255]);
}

#[test]
fn labels_stay_above_markers_drawn_later_in_sequence() {
    let mut canvas = white(160, 100);
    let (mut engine, style) = text_setup();
    let points = [
        PointOfInterest::new(50, 50, solid_png(4, 4, [255, 0, 0, 255]), "MMMM"),
        // Opaque green marker covering x 62..78, y 40..56, right over the first label.
        PointOfInterest::new(70, 48, solid_png(16, 16, [0, 255, 0, 255]), ""),
    ];
    draw_points(&mut canvas, &points, &mut engine, &style).unwrap();

    let mut label_px = 0;
    for y in 40..56 {
        for x in 62..78 {
            if canvas.pixel(x, y).unwrap().to_array() == [0, 0, 0, 255] {
                label_px += 1;
            }
        }
    }
    assert!(label_px > 10, "label pixels under marker: {label_px}");
}

#[test]
fn bad_marker_aborts_before_any_drawing() {
    let mut canvas = white(40, 40);
    let before = canvas.clone();
    let (mut engine, style) = text_setup();
    let points = [
        PointOfInterest::new(10, 10, solid_png(4, 4, [0, 0, 0, 255]), "ok"),
        PointOfInterest::new(20, 20, b"GIF89a-truncated".to_vec(), "bad"),
    ];
    let err = draw_points(&mut canvas, &points, &mut engine, &style).unwrap_err();
    assert!(matches!(err, TrackmapError::Decode(_)));
    assert_eq!(canvas, before);
}
