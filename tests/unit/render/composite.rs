use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_half_opacity_mixes() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 255];
    let out = over(dst, src, 0.5);
    assert_eq!(out[3], 255);
    assert!(out[0] > 120 && out[0] < 135);
    assert!(out[2] > 120 && out[2] < 135);
}

#[test]
fn over_in_place_rejects_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn offset_blit_clips_negative_and_overflowing_offsets() {
    let mut dst = vec![0u8; 4 * 4 * 4];
    let src = [9u8, 9, 9, 255].repeat(2 * 2);

    over_at_offset(
        &mut dst,
        &src,
        BlitParams {
            dst_width: 4,
            dst_height: 4,
            src_width: 2,
            src_height: 2,
            x: -1,
            y: 3,
        },
    )
    .unwrap();

    let px = |x: usize, y: usize| &dst[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
    assert_eq!(px(0, 3), &[9, 9, 9, 255]);
    assert_eq!(px(1, 3), &[0, 0, 0, 0]);
    assert_eq!(px(0, 2), &[0, 0, 0, 0]);
    assert_eq!(dst.iter().filter(|&&b| b == 255).count(), 1);
}

#[test]
fn offset_blit_fully_outside_is_noop() {
    let mut dst = vec![7u8; 2 * 2 * 4];
    let src = [1u8, 1, 1, 255].repeat(4);
    over_at_offset(
        &mut dst,
        &src,
        BlitParams {
            dst_width: 2,
            dst_height: 2,
            src_width: 2,
            src_height: 2,
            x: 5,
            y: -9,
        },
    )
    .unwrap();
    assert!(dst.iter().all(|&b| b == 7));
}

#[test]
fn offset_blit_at_extreme_offsets_is_noop() {
    let mut dst = vec![7u8; 2 * 2 * 4];
    let src = [1u8, 1, 1, 255].repeat(4);
    for (x, y) in [(i64::MAX, 0), (0, i64::MAX), (i64::MIN, 0), (i64::MAX - 1, i64::MIN)] {
        let params = BlitParams {
            dst_width: 2,
            dst_height: 2,
            src_width: 2,
            src_height: 2,
            x,
            y,
        };
        over_at_offset(&mut dst, &src, params).unwrap();
    }
    assert!(dst.iter().all(|&b| b == 7));
}

#[test]
fn harden_coverage_snaps_alpha() {
    let mut px = vec![60u8, 0, 0, 100, 100, 0, 0, 200];
    harden_coverage_in_place(&mut px);
    assert_eq!(&px[0..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..8], &[128, 0, 0, 255]);
}
