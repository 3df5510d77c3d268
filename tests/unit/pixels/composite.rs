use super::*;
use crate::pixels::buffer::Payload;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over_rgba8(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let src = [255, 0, 0, 255];
    assert_eq!(over_rgba8([0, 0, 0, 255], src), src);
}

#[test]
fn over_half_alpha_mixes_straight_colour() {
    let out = over_rgba8([0, 0, 0, 255], [255, 255, 255, 128]);
    assert!((127..=129).contains(&out[0]));
    assert_eq!(out[3], 255);
}

#[test]
fn float_over_matches_straight_formula() {
    let out = RgbaF32::over([0.0, 0.0, 1.0, 1.0], [1.0, 0.0, 0.0, 0.25]);
    assert!((out[0] - 0.25).abs() < 1e-6);
    assert!((out[2] - 0.75).abs() < 1e-6);
    assert!((out[3] - 1.0).abs() < 1e-6);
}

#[test]
fn preprocessor_converts_overlay_to_target_type() {
    let overlay = PixelBuffer::solid(PixelType::Color8, 2, 2, [1.0, 1.0, 1.0, 1.0], Payload::default());
    let pre = PixelPreProcessor::composite_for(PixelType::Float16, &overlay);
    assert_eq!(pre.pixel_type(), PixelType::Float16);

    let mut target = PixelBuffer::solid(PixelType::Float16, 2, 2, [0.0, 0.0, 0.0, 1.0], Payload::default());
    pre.apply(&mut target).unwrap();
    let PixelData::Float16(p) = &target.data else {
        panic!("expected half-float target");
    };
    assert_eq!(p.get(1, 1).to_rgba_f32(), [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn preprocessor_rejects_mismatched_target() {
    let overlay = PixelBuffer::solid(PixelType::Color8, 1, 1, [1.0; 4], Payload::default());
    let pre = PixelPreProcessor::composite_for(PixelType::Color8, &overlay);
    let mut target = PixelBuffer::solid(PixelType::Float32, 1, 1, [0.0; 4], Payload::default());
    assert!(pre.apply(&mut target).is_err());
}

#[test]
fn composite_rejects_size_mismatch() {
    let overlay = PixelBuffer::solid(PixelType::Float32, 2, 2, [1.0; 4], Payload::default());
    let c = CompositeImage::<RgbaF32>::new(&overlay);
    let mut target = Plane::filled(3, 2, [0.0f32; 4]);
    assert!(c.apply(&mut target).is_err());
}
