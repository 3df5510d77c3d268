use super::*;
use crate::foundation::core::{Resolution, Rotator};
use crate::sidecar::{write_float, write_float_array, write_string_lines};
use glam::Vec3;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_reader").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn camera_record_round_trips_bit_exactly() {
    let path = scratch("camera").join("Cam/0000.dat");
    let r = CameraRecord {
        location: Vec3::new(0.1, -200.25, 1.0e-3),
        rotation: Rotator::new(0.0, -12.5, 359.9),
        fov_degrees: 47.3,
        resolution: Resolution::new(1920, 1080),
    };
    write_float_array(&r.to_floats(), &path).unwrap();
    let back = read_camera_record(&path).unwrap();
    for (a, b) in back.to_floats().iter().zip(r.to_floats()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn stencil_requires_single_float() {
    let dir = scratch("stencil");
    write_float(7.0, &dir.join("one.dat")).unwrap();
    assert_eq!(read_stencil_id(&dir.join("one.dat")).unwrap(), 7);
    write_float_array(&[1.0, 2.0], &dir.join("two.dat")).unwrap();
    assert!(read_stencil_id(&dir.join("two.dat")).is_err());
}

#[test]
fn truncated_file_is_rejected() {
    let dir = scratch("truncated");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("x.dat"), [0u8; 6]).unwrap();
    assert!(read_float_array(&dir.join("x.dat")).is_err());
    assert!(read_actor_info(&dir.join("missing.dat")).is_err());
}

#[test]
fn bone_names_read_back_in_order() {
    let path = scratch("bones").join("Ava_BoneName.txt");
    write_string_lines(&["pelvis", "spine_01", "head"], &path).unwrap();
    assert_eq!(read_bone_names(&path).unwrap().names, vec!["pelvis", "spine_01", "head"]);
}
