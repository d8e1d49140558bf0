#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn placement_approx_eq(a: Placement, b: Placement) -> bool {
    approx_eq(a.scale_x, b.scale_x)
        && approx_eq(a.scale_y, b.scale_y)
        && approx_eq(a.offset_x, b.offset_x)
        && approx_eq(a.offset_y, b.offset_y)
}

// --- Placement basics ---

#[test]
fn placement_default_is_unit_scale_origin() {
    let p = Placement::default();
    assert_eq!(p.scale_x, 1.0);
    assert_eq!(p.scale_y, 1.0);
    assert_eq!(p.offset_x, 0.0);
    assert_eq!(p.offset_y, 0.0);
}

#[test]
fn scaled_size_multiplies_each_axis() {
    let p = Placement::new(0.5, 2.0, 0.0, 0.0);
    let scaled = p.scaled_size(Size::new(1000.0, 300.0));
    assert!(approx_eq(scaled.width, 500.0));
    assert!(approx_eq(scaled.height, 600.0));
}

#[test]
fn placement_serde_round_trip() {
    let p = Placement::new(0.75, 1.25, 12.5, -40.0);
    let json = serde_json::to_string(&p).unwrap();
    let restored: Placement = serde_json::from_str(&json).unwrap();
    assert!(placement_approx_eq(restored, p));
}

// --- max_scale ---

#[test]
fn max_scale_is_slot_over_natural() {
    assert!(approx_eq(max_scale(800.0, 1600.0), 0.5));
    assert!(approx_eq(max_scale(800.0, 400.0), 2.0));
}

#[test]
fn max_scale_zero_natural_returns_floor() {
    assert_eq!(max_scale(800.0, 0.0), MIN_SCALE);
    assert_eq!(max_scale(800.0, -5.0), MIN_SCALE);
}

// --- offset_bounds ---

#[test]
fn offset_bounds_image_smaller_than_slot() {
    let (lo, hi) = offset_bounds(800.0, 600.0);
    assert_eq!(lo, 0.0);
    assert!(approx_eq(hi, 200.0));
}

#[test]
fn offset_bounds_image_larger_than_slot() {
    let (lo, hi) = offset_bounds(800.0, 1000.0);
    assert!(approx_eq(lo, -200.0));
    assert_eq!(hi, 0.0);
}

#[test]
fn offset_bounds_exact_fit_pins_to_zero() {
    let (lo, hi) = offset_bounds(800.0, 800.0);
    assert_eq!(lo, 0.0);
    assert_eq!(hi, 0.0);
}

// --- constrain: oversized image clamps down ---

#[test]
fn oversized_image_clamps_to_slot() {
    // 1600x900 photo in an 800x450 slot: scale caps at 0.5 on both axes and
    // the exact fit pins the offsets.
    let natural = Size::new(1600.0, 900.0);
    let slot = Size::new(800.0, 450.0);
    let out = constrain(natural, slot, Placement::new(1.0, 1.0, 0.0, 0.0));
    assert!(approx_eq(out.scale_x, 0.5));
    assert!(approx_eq(out.scale_y, 0.5));
    assert_eq!(out.offset_x, 0.0);
    assert_eq!(out.offset_y, 0.0);
}

// --- constrain: undersized axis leaves headroom ---

#[test]
fn undersized_image_keeps_scale_and_clamps_offset() {
    // 400x450 photo in an 800x450 slot: max scale is (2.0, 1.0), so the
    // unit proposal survives; a wild X offset clamps to the 400px gap.
    let natural = Size::new(400.0, 450.0);
    let slot = Size::new(800.0, 450.0);
    let out = constrain(natural, slot, Placement::new(1.0, 1.0, 1000.0, 0.0));
    assert!(approx_eq(out.scale_x, 1.0));
    assert!(approx_eq(out.scale_y, 1.0));
    assert!(approx_eq(out.offset_x, 400.0));
    assert_eq!(out.offset_y, 0.0);
}

#[test]
fn negative_offset_clamps_to_zero_when_image_fits() {
    let natural = Size::new(400.0, 450.0);
    let slot = Size::new(800.0, 450.0);
    let out = constrain(natural, slot, Placement::new(1.0, 1.0, -50.0, -50.0));
    assert_eq!(out.offset_x, 0.0);
    assert_eq!(out.offset_y, 0.0);
}

// --- constrain: scale floor ---

#[test]
fn scale_floor_is_hard() {
    let natural = Size::new(1600.0, 900.0);
    let slot = Size::new(800.0, 450.0);
    let out = constrain(natural, slot, Placement::new(0.01, 0.01, 0.0, 0.0));
    assert_eq!(out.scale_x, MIN_SCALE);
    assert_eq!(out.scale_y, MIN_SCALE);
}

#[test]
fn floor_wins_over_tiny_slot_maximum() {
    // Slot max scale (0.08, 0.045) sits below the floor; the floor wins and
    // the image overflows the slot, so offsets swing negative for panning.
    let natural = Size::new(10_000.0, 10_000.0);
    let slot = Size::new(800.0, 450.0);
    let out = constrain(natural, slot, Placement::new(1.0, 1.0, 0.0, 0.0));
    assert_eq!(out.scale_x, MIN_SCALE);
    assert_eq!(out.scale_y, MIN_SCALE);
    // Scaled 1000x1000: X range [-200, 0], Y range [-550, 0].
    assert_eq!(out.offset_x, 0.0);
    assert_eq!(out.offset_y, 0.0);

    let panned = constrain(natural, slot, Placement::new(1.0, 1.0, -500.0, -100.0));
    assert!(approx_eq(panned.offset_x, -200.0));
    assert!(approx_eq(panned.offset_y, -100.0));
}

#[test]
fn overflow_offset_never_exposes_slot_background() {
    // Image larger than slot: positive offsets clamp back to zero.
    let natural = Size::new(10_000.0, 10_000.0);
    let slot = Size::new(800.0, 450.0);
    let out = constrain(natural, slot, Placement::new(MIN_SCALE, MIN_SCALE, 50.0, 50.0));
    assert_eq!(out.offset_x, 0.0);
    assert_eq!(out.offset_y, 0.0);
}

// --- constrain: totality ---

#[test]
fn zero_natural_dimension_does_not_panic() {
    let out = constrain(Size::new(0.0, 0.0), Size::new(800.0, 450.0), Placement::default());
    assert_eq!(out.scale_x, MIN_SCALE);
    assert_eq!(out.scale_y, MIN_SCALE);
}

#[test]
fn nan_scale_proposal_resolves_to_max() {
    let natural = Size::new(1600.0, 900.0);
    let slot = Size::new(800.0, 450.0);
    let out = constrain(natural, slot, Placement::new(f64::NAN, f64::NAN, 0.0, 0.0));
    assert!(approx_eq(out.scale_x, 0.5));
    assert!(approx_eq(out.scale_y, 0.5));
}

// --- constrain: idempotence ---

#[test]
fn constrain_is_idempotent() {
    let natural = Size::new(1600.0, 900.0);
    let slot = Size::new(800.0, 450.0);
    let proposals = [
        Placement::new(1.0, 1.0, 0.0, 0.0),
        Placement::new(0.01, 3.0, 500.0, -500.0),
        Placement::new(0.3, 0.3, 10.0, 10.0),
        Placement::new(f64::NAN, 0.5, f64::NAN, 0.0),
    ];
    for proposed in proposals {
        let once = constrain(natural, slot, proposed);
        let twice = constrain(natural, slot, once);
        assert!(placement_approx_eq(once, twice), "not idempotent for {proposed:?}");
    }
}

#[test]
fn constrained_output_always_satisfies_bounds() {
    let natural = Size::new(1234.0, 777.0);
    let slot = Size::new(800.0, 450.0);
    for scale in [0.0, 0.05, 0.1, 0.5, 1.0, 10.0] {
        for offset in [-5000.0, -1.0, 0.0, 1.0, 5000.0] {
            let out = constrain(natural, slot, Placement::new(scale, scale, offset, offset));
            assert!(out.scale_x >= MIN_SCALE);
            assert!(out.scale_y >= MIN_SCALE);
            let (lo_x, hi_x) = offset_bounds(slot.width, natural.width * out.scale_x);
            let (lo_y, hi_y) = offset_bounds(slot.height, natural.height * out.scale_y);
            assert!(out.offset_x >= lo_x - EPSILON && out.offset_x <= hi_x + EPSILON);
            assert!(out.offset_y >= lo_y - EPSILON && out.offset_y <= hi_y + EPSILON);
        }
    }
}

// --- Placement::fit ---

#[test]
fn fit_exact_aspect_fills_slot() {
    let fitted = Placement::fit(Size::new(1600.0, 900.0), Size::new(800.0, 450.0));
    assert!(approx_eq(fitted.scale_x, 0.5));
    assert!(approx_eq(fitted.scale_y, 0.5));
    assert_eq!(fitted.offset_x, 0.0);
    assert_eq!(fitted.offset_y, 0.0);
}

#[test]
fn fit_centers_narrow_image() {
    // 400x450 in 800x450: uniform fit scale is 1.0, centered horizontally.
    let fitted = Placement::fit(Size::new(400.0, 450.0), Size::new(800.0, 450.0));
    assert!(approx_eq(fitted.scale_x, 1.0));
    assert!(approx_eq(fitted.scale_y, 1.0));
    assert!(approx_eq(fitted.offset_x, 200.0));
    assert_eq!(fitted.offset_y, 0.0);
}

#[test]
fn fit_holds_the_scale_floor() {
    let fitted = Placement::fit(Size::new(10_000.0, 10_000.0), Size::new(800.0, 450.0));
    assert_eq!(fitted.scale_x, MIN_SCALE);
    assert_eq!(fitted.scale_y, MIN_SCALE);
}

#[test]
fn fit_output_is_already_constrained() {
    let natural = Size::new(3000.0, 1000.0);
    let slot = Size::new(800.0, 450.0);
    let fitted = Placement::fit(natural, slot);
    assert!(placement_approx_eq(fitted, constrain(natural, slot, fitted)));
}
