use super::*;

#[test]
fn plane_rejects_short_pixel_vec() {
    let err = Plane::<Rgba8>::new(2, 2, vec![[0; 4]; 3]).unwrap_err();
    assert!(err.to_string().contains("expected 4"));
}

#[test]
fn plane_rejects_stride_narrower_than_width() {
    assert!(Plane::<RgbaF32>::with_stride(4, 1, 3, vec![[0.0; 4]; 3]).is_err());
}

#[test]
fn strided_rows_skip_padding() {
    let px = vec![[1u8, 0, 0, 255], [2, 0, 0, 255], [99, 99, 99, 99], [3, 0, 0, 255], [4, 0, 0, 255], [99, 99, 99, 99]];
    let p = Plane::with_stride(2, 2, 3, px).unwrap();
    assert_eq!(p.row(1)[0][0], 3);
    assert_eq!(p.get(1, 1)[0], 4);
    let packed = p.to_packed();
    assert_eq!(packed.len(), 4);
    assert!(packed.iter().all(|px| px[0] != 99));
}

#[test]
fn float_to_color8_clamps_and_rounds() {
    let p = Plane::new(1, 1, vec![[1.5f32, -0.2, 0.5, 1.0]]).unwrap();
    let q: Plane<Rgba8> = p.convert();
    assert_eq!(q.get(0, 0), [255, 0, 128, 255]);
}

#[test]
fn half_round_trips_simple_values() {
    let v = RgbaF16::from_rgba_f32([0.25, 0.5, 1.0, 0.0]);
    assert_eq!(v.to_rgba_f32(), [0.25, 0.5, 1.0, 0.0]);
}

#[test]
fn solid_buffer_reports_shape_and_type() {
    let b = PixelBuffer::solid(PixelType::Float16, 3, 2, [0.0, 0.0, 0.0, 1.0], Payload::default());
    assert_eq!(b.width(), 3);
    assert_eq!(b.height(), 2);
    assert_eq!(b.pixel_type(), PixelType::Float16);
    assert_eq!(b.pixel_type().bit_depth(), 16);
}
