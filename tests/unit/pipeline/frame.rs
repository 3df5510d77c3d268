use super::*;
use crate::pixels::buffer::{Payload, PixelType};

fn buffer() -> PixelBuffer {
    PixelBuffer::solid(PixelType::Color8, 1, 1, [0.0, 0.0, 0.0, 1.0], Payload::default())
}

#[test]
fn identifiers_compare_name_and_view() {
    assert_eq!(PassIdentifier::new("a"), PassIdentifier::new("a"));
    assert_ne!(PassIdentifier::new("a"), PassIdentifier::with_view("a", 0));
    assert!(PassIdentifier::with_view(FINAL_IMAGE_PASS, 2).is_final_image());
}

#[test]
fn standalone_count_excludes_composited_passes() {
    let mut f = MergedOutputFrame::default();
    f.image_outputs.insert(PassIdentifier::final_image(), buffer());
    f.image_outputs.insert(PassIdentifier::new("BurnIn"), buffer());
    f.composited_passes.push(CompositePassInfo {
        pass_identifier: PassIdentifier::new("BurnIn"),
        pixel_data: buffer(),
    });
    assert_eq!(f.standalone_pass_count(), 1);
    assert!(f.is_composited(&PassIdentifier::new("BurnIn")));
}

#[test]
fn multiple_cameras_from_state_or_views() {
    let mut f = MergedOutputFrame::default();
    assert!(!f.has_data_from_multiple_cameras());
    f.image_outputs.insert(PassIdentifier::with_view("FinalImage", 0), buffer());
    f.image_outputs.insert(PassIdentifier::with_view("FinalImage", 1), buffer());
    assert!(f.has_data_from_multiple_cameras());

    let mut g = MergedOutputFrame::default();
    g.frame_output_state.camera_count = 2;
    assert!(g.has_data_from_multiple_cameras());
}
