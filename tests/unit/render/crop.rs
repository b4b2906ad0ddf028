use super::*;
use crate::foundation::core::Rgba8Premul;

#[test]
fn explicit_bounds_with_margin() {
    let r = CropRegion::compute(200, 200, PixelBounds::new(50, 150, 50, 150), 10);
    assert_eq!(
        r,
        CropRegion {
            top: 40,
            right: 40,
            bottom: 40,
            left: 40
        }
    );
    assert_eq!(r.cropped_size(200, 200), (120, 120));
}

#[test]
fn negative_offsets_clamp_to_zero() {
    let r = CropRegion::compute(300, 200, PixelBounds::new(20, 290, 5, 120), 50);
    assert_eq!(r.left, 0);
    assert_eq!(r.top, 0);
    assert_eq!(r.right, 0);
    assert_eq!(r.bottom, 30);
}

#[test]
fn offsets_are_never_negative_and_sizes_stay_positive() {
    let sizes = [(1u32, 1u32), (7, 3), (200, 200), (513, 97)];
    let coords = [-400i64, -1, 0, 3, 50, 150, 199, 600];
    for (w, h) in sizes {
        for &a in &coords {
            for &b in &coords {
                for margin in [0i64, 10, 50] {
                    let r = CropRegion::compute(w, h, PixelBounds::new(a, b, b, a), margin);
                    let (nw, nh) = r.cropped_size(w, h);
                    assert_eq!(nw, w - r.left - r.right);
                    assert_eq!(nh, h - r.top - r.bottom);
                    assert!(nw >= 1 && nh >= 1, "{r:?} on {w}x{h}");

                    // Each side is either the plain formula value or dropped to zero.
                    let w64 = i64::from(w);
                    let h64 = i64::from(h);
                    for (got, formula) in [
                        (r.left, a - margin),
                        (r.right, w64 - b - margin),
                        (r.top, b - margin),
                        (r.bottom, h64 - a - margin),
                    ] {
                        assert!(got == 0 || i64::from(got) == formula, "{r:?} on {w}x{h}");
                    }
                }
            }
        }
    }
}

#[test]
fn degenerate_box_drops_the_offending_sides() {
    let r = CropRegion::compute(200, 200, PixelBounds::new(100, 100, 100, 100), 0);
    assert_eq!(r, CropRegion::default());
    assert_eq!(r.cropped_size(200, 200), (200, 200));

    // Content entirely right of the canvas: the left side alone would empty the axis.
    let r = CropRegion::compute(100, 100, PixelBounds::new(150, 160, 10, 20), 0);
    assert_eq!(
        r,
        CropRegion {
            top: 10,
            right: 0,
            bottom: 80,
            left: 0
        }
    );
}

#[test]
fn extreme_coordinates_saturate_instead_of_overflowing() {
    let r = CropRegion::compute(100, 100, PixelBounds::new(i64::MIN, 10, 0, 10), 50);
    assert_eq!(r.left, 0);
    assert_eq!(r.right, 40);

    let r = CropRegion::compute(100, 100, PixelBounds::new(0, i64::MAX, i64::MIN, i64::MAX), 50);
    assert_eq!(r.cropped_size(100, 100), (100, 100));

    let r = CropRegion::compute_fixed(100, 100, i64::MAX, i64::MIN, 40, 40);
    let (nw, nh) = r.cropped_size(100, 100);
    assert!(nw >= 1 && nh >= 1);
}

#[test]
fn fixed_mode_matches_explicit_bounds_with_zero_margin() {
    for (cx, cy, w, h) in [(100, 100, 80, 60), (10, 190, 51, 33), (0, 0, 400, 400)] {
        let fixed = CropRegion::compute_fixed(200, 200, cx, cy, w, h);
        let half_w = i64::from(w / 2);
        let half_h = i64::from(h / 2);
        let explicit = CropRegion::compute(
            200,
            200,
            PixelBounds::new(cx - half_w, cx + half_w, cy - half_h, cy + half_h),
            0,
        );
        assert_eq!(fixed, explicit);
    }
}

#[test]
fn apply_extracts_the_kept_rectangle() {
    let mut data = Vec::new();
    for y in 0..4u8 {
        for x in 0..5u8 {
            data.extend_from_slice(&[x, y, 0, 255]);
        }
    }
    let canvas = Canvas::from_premul_parts(5, 4, data).unwrap();
    let region = CropRegion {
        top: 1,
        right: 1,
        bottom: 0,
        left: 2,
    };
    let out = region.apply(&canvas).unwrap();
    assert_eq!(out.dimensions(), (2, 3));
    assert_eq!(out.pixel(0, 0).unwrap().to_array(), [2, 1, 0, 255]);
    assert_eq!(out.pixel(1, 2).unwrap().to_array(), [3, 3, 0, 255]);
}

#[test]
fn plan_is_noop_unless_enabled() {
    let canvas = Canvas::filled(50, 50, Rgba8Premul::from_straight_rgba(1, 2, 3, 255)).unwrap();
    let mut plan = CropPlan::new(CropConfig::default());
    plan.set_bounds(50, 50, PixelBounds::new(20, 30, 20, 30));
    assert_eq!(plan.apply(canvas.clone()).unwrap().dimensions(), (50, 50));

    let mut enabled = CropPlan::new(CropConfig {
        enabled: true,
        margin: 5,
    });
    assert_eq!(enabled.apply(canvas.clone()).unwrap().dimensions(), (50, 50));
    enabled.set_bounds(50, 50, PixelBounds::new(20, 30, 20, 30));
    assert_eq!(enabled.apply(canvas).unwrap().dimensions(), (20, 20));
}

#[test]
fn fixed_plan_forces_zero_margin_and_enables() {
    let mut plan = CropPlan::new(CropConfig::default());
    plan.set_fixed(200, 200, (100, 100), 60, 40);
    assert!(plan.enabled);
    assert_eq!(plan.margin, 0);
    assert_eq!(
        plan.region.unwrap(),
        CropRegion {
            top: 80,
            right: 70,
            bottom: 80,
            left: 70
        }
    );

    plan.set_bounds(200, 200, PixelBounds::new(50, 150, 50, 150));
    assert_eq!(plan.region.unwrap().left, 50);
}

#[test]
fn negative_margin_is_invalid_config() {
    let cfg = CropConfig {
        enabled: true,
        margin: -1,
    };
    assert!(matches!(cfg.validate(), Err(TrackmapError::InvalidConfig(_))));
}
