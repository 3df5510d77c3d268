use super::*;
use crate::annotate::reader::{read_actor_info, read_camera_record, read_float_array, read_stencil_id};
use crate::memory::{StaticBone, StaticCamera, StaticRigidMesh, StaticSkinnedLod, StaticSkinnedMesh};
use crate::scene::binding::SceneBinding;
use crate::scene::model::{
    BoneInfluence, CameraActor, RigidMeshComponent, SkinnedLodData, SkinnedMeshComponent,
};
use smallvec::smallvec;
use std::path::PathBuf;
use std::sync::Arc;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_exporter").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn bind<T: ?Sized>(name: &str, handle: Arc<T>) -> SceneBinding<T> {
    SceneBinding {
        name: name.to_owned(),
        export_name: name.to_owned(),
        handle,
    }
}

fn ava() -> StaticSkinnedMesh {
    let lod = StaticSkinnedLod {
        data: SkinnedLodData {
            ref_positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: vec![0, 1, 2],
        },
        weights: vec![
            smallvec![BoneInfluence { bone: 0, weight: 1.0 }],
            smallvec![BoneInfluence { bone: 1, weight: 1.0 }],
            smallvec![],
        ],
    };
    let mut m = StaticSkinnedMesh::new(
        "Ava",
        vec![
            StaticBone {
                name: "pelvis".into(),
                location: Vec3::ZERO,
            },
            StaticBone {
                name: "head".into(),
                location: Vec3::Z,
            },
        ],
        vec![lod],
    );
    m.stencil_value = 3;
    m
}

fn scene() -> SceneBindings {
    let mut b = SceneBindings::default();
    let cam: Arc<dyn CameraActor> = Arc::new(StaticCamera::new("Cam", Vec3::new(0.0, 0.0, 100.0)));
    b.cameras.insert("Cam".into(), bind("Cam", cam));
    let mut block = StaticRigidMesh::new("Block", Vec3::new(10.0, 0.0, 0.0), vec![Vec3::ZERO, Vec3::ONE]);
    block.stencil_value = 7;
    let block: Arc<dyn RigidMeshComponent> = Arc::new(block);
    b.rigid_meshes.insert("Block".into(), bind("Block", block));
    let ava: Arc<dyn SkinnedMeshComponent> = Arc::new(ava());
    b.skinned_meshes.insert("Ava".into(), bind("Ava", ava));
    b
}

fn state(frame: i32) -> FrameOutputState {
    FrameOutputState {
        frame_index: FrameNumber(frame),
        ..FrameOutputState::default()
    }
}

fn exporter(dir: &Path, settings: AnnotationSettings) -> AnnotationExporter {
    AnnotationExporter::new(
        SidecarLayout::new(dir, &settings),
        settings,
        Resolution::new(640, 480),
    )
}

#[test]
fn first_frame_writes_static_then_per_frame_sidecars() {
    let dir = scratch("first");
    let mut ex = exporter(&dir, AnnotationSettings::default());
    let stats = ex.on_frame(&scene(), &state(0));
    assert!(ex.first_frame_done());
    // camera static + frame, two stencils, two actor infos
    assert_eq!(stats.written, 6);
    assert_eq!(stats.skipped, 0);

    let cam = read_camera_record(&dir.join("camera_params/Cam/0000.dat")).unwrap();
    assert_eq!(cam.location, Vec3::new(0.0, 0.0, 100.0));
    assert_eq!(cam.resolution, Resolution::new(640, 480));
    assert!(dir.join("camera_params/Cam.dat").exists());
    assert_eq!(read_stencil_id(&dir.join("actor_infos/Block.dat")).unwrap(), 7);
    assert_eq!(read_stencil_id(&dir.join("actor_infos/Ava.dat")).unwrap(), 3);
    let info = read_actor_info(&dir.join("actor_infos/Block/0000.dat")).unwrap();
    assert_eq!(info.location, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(info.stencil_id, 7);
    assert!(!dir.join("vertices").exists());
}

#[test]
fn repeated_frame_is_written_once() {
    let dir = scratch("repeat");
    let mut ex = exporter(&dir, AnnotationSettings::default());
    let scene = scene();
    assert!(ex.on_frame(&scene, &state(4)).written > 0);
    assert_eq!(ex.on_frame(&scene, &state(4)), ExportStats::default());
    let second = ex.on_frame(&scene, &state(5));
    // no static sidecars after the first frame
    assert_eq!(second.written, 3);
    assert!(dir.join("camera_params/Cam/0005.dat").exists());
}

#[test]
fn vertices_and_skeleton_follow_toggles() {
    let dir = scratch("geometry");
    let settings = AnnotationSettings {
        save_vertices_position: true,
        save_skeleton_position: true,
        ..AnnotationSettings::default()
    };
    let mut ex = exporter(&dir, settings);
    let stats = ex.on_frame(&scene(), &state(0));
    assert_eq!(stats.objects_skipped, 0);

    let block = read_float_array(&dir.join("vertices/Block/0000.dat")).unwrap();
    assert_eq!(block, vec![10.0, 0.0, 0.0, 11.0, 1.0, 1.0]);
    let ava = read_float_array(&dir.join("vertices/Ava/0000.dat")).unwrap();
    assert_eq!(ava.len(), 9);
    let bones = read_float_array(&dir.join("skeleton/Ava/0000.dat")).unwrap();
    assert_eq!(bones, vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn lod_out_of_range_skips_only_that_object() {
    let dir = scratch("lod");
    let settings = AnnotationSettings {
        save_vertices_position: true,
        lod_index_to_save: 99,
        ..AnnotationSettings::default()
    };
    let mut ex = exporter(&dir, settings);
    let stats = ex.on_frame(&scene(), &state(0));
    assert_eq!(stats.objects_skipped, 2);
    assert!(!dir.join("vertices/Block/0000.dat").exists());
    assert!(!dir.join("vertices/Ava/0000.dat").exists());
    assert!(dir.join("actor_infos/Ava/0000.dat").exists());
    assert!(dir.join("camera_params/Cam/0000.dat").exists());
}

#[test]
fn skeleton_frames_are_checked_against_the_bone_table() {
    let dir = scratch("bone_table");
    let settings = AnnotationSettings {
        save_skeleton_position: true,
        ..AnnotationSettings::default()
    };
    let scene = scene();

    let mut ex = exporter(&dir, settings.clone());
    ex.track_bone_tables(&scene);
    assert_eq!(ex.on_frame(&scene, &state(0)).skeleton_mismatches, 0);

    // Table written for a rig with one more bone than the mesh now reports.
    let mut taller = ava();
    taller.bones.push(StaticBone {
        name: "hand_r".into(),
        location: Vec3::X,
    });
    let taller: Arc<dyn SkinnedMeshComponent> = Arc::new(taller);
    let mut at_setup = SceneBindings::default();
    at_setup.skinned_meshes.insert("Ava".into(), bind("Ava", taller));

    let mut ex = exporter(&scratch("bone_table_stale"), settings);
    ex.track_bone_tables(&at_setup);
    let stats = ex.on_frame(&scene, &state(0));
    assert_eq!(stats.skeleton_mismatches, 1);
    assert_eq!(stats.objects_skipped, 0);
}
