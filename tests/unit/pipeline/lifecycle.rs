use super::*;
use crate::foundation::core::FrameNumber;
use crate::memory::{
    InMemoryHost, InMemorySequence, RecordingQueue, StaticBone, StaticCamera, StaticRigidMesh,
    StaticSkinnedMesh,
};
use crate::pipeline::config::OutputSetting;
use crate::pipeline::frame::{FrameOutputState, PassIdentifier};
use crate::pixels::buffer::{Payload, PixelBuffer, PixelType};
use crate::scene::model::{BindingKind, BoundObject};
use glam::Vec3;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_lifecycle").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn host(dir: &std::path::Path) -> InMemoryHost {
    let ava = StaticSkinnedMesh::new(
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
        Vec::new(),
    );
    let seq = InMemorySequence::new("Seq", 0, 2)
        .unwrap()
        .with_binding(
            "Cam",
            BindingKind::Spawnable,
            vec![BoundObject::CameraActor(Arc::new(StaticCamera::new("Cam", Vec3::ZERO)))],
        )
        .with_binding(
            "Block",
            BindingKind::Possessable,
            vec![BoundObject::RigidMeshActor(Arc::new(StaticRigidMesh::new(
                "Block",
                Vec3::ZERO,
                vec![Vec3::ONE],
            )))],
        )
        .with_binding("Ava", BindingKind::Spawnable, vec![BoundObject::SkinnedMeshActor(Arc::new(ava))]);
    let output = OutputSetting {
        output_directory: dir.to_string_lossy().into_owned(),
        ..OutputSetting::default()
    };
    InMemoryHost::new(output, Arc::new(seq))
}

fn frame(n: i32) -> MergedOutputFrame {
    let mut f = MergedOutputFrame::new(FrameOutputState {
        frame_index: FrameNumber(n),
        source_frame_number: FrameNumber(n),
        camera_count: 1,
        ..FrameOutputState::default()
    });
    let mut buf =
        PixelBuffer::solid(PixelType::Color8, 2, 2, [1.0, 0.0, 0.0, 1.0], Payload::default());
    buf.payload.sample_state.output_state = f.frame_output_state.clone();
    f.image_outputs.insert(PassIdentifier::final_image(), buf);
    f
}

#[test]
fn setup_resolves_bindings_and_requests_per_shot_flush() {
    let dir = scratch("setup");
    let mut h = host(&dir);
    let settings = AnnotationSettings {
        save_skeleton_position: true,
        ..AnnotationSettings::default()
    };
    let mut p = AnnotatedPipeline::new(
        OutputStageSettings::default(),
        settings,
        Arc::new(RecordingQueue::new()),
    );
    assert!(p.exporter().is_none());
    p.setup_for_pipeline(&mut h).unwrap();

    assert!(h.flush_disk_writes_per_shot());
    assert_eq!(p.bindings().len(), 3);
    assert!(p.exporter().is_some());
    let names = std::fs::read_to_string(dir.join("skeleton/Ava_BoneName.txt")).unwrap();
    assert_eq!(names, "pelvis\nhead\n");
}

#[test]
fn frames_write_sidecars_then_images() {
    let dir = scratch("frames");
    let mut h = host(&dir);
    let queue = Arc::new(RecordingQueue::new());
    let mut p = AnnotatedPipeline::new(
        OutputStageSettings::default(),
        AnnotationSettings::default(),
        queue.clone(),
    );
    p.setup_for_pipeline(&mut h).unwrap();

    for n in 0..2 {
        let report = p.on_receive_image_data(&mut h, frame(n)).unwrap();
        assert_eq!(report.images_enqueued, 1);
        assert_eq!(report.annotations.skipped, 0);
    }
    p.begin_export(&mut h);

    assert_eq!(p.frames_received(), 2);
    assert_eq!(queue.tasks().len(), 2);
    assert_eq!(h.output_futures().len(), 2);
    assert!(dir.join("camera_params/Cam.dat").exists());
    assert!(dir.join("camera_params/Cam/0001.dat").exists());
    assert!(dir.join("actor_infos/Block/0001.dat").exists());
    assert!(dir.join("actor_infos/Ava.dat").exists());
}

#[test]
fn frame_before_setup_is_rejected() {
    let dir = scratch("early");
    let mut h = host(&dir);
    let mut p = AnnotatedPipeline::new(
        OutputStageSettings::default(),
        AnnotationSettings::default(),
        Arc::new(RecordingQueue::new()),
    );
    assert!(p.on_receive_image_data(&mut h, frame(0)).is_err());
}

#[test]
fn multi_camera_frame_without_camera_token_writes_nothing() {
    let dir = scratch("multicam");
    let mut h = host(&dir);
    let queue = Arc::new(RecordingQueue::new());
    let mut p = AnnotatedPipeline::new(
        OutputStageSettings::default(),
        AnnotationSettings::default(),
        queue.clone(),
    );
    p.setup_for_pipeline(&mut h).unwrap();

    let mut f = frame(0);
    f.frame_output_state.camera_count = 2;
    let err = p.on_receive_image_data(&mut h, f).unwrap_err();
    assert!(err.is_fatal());
    assert!(queue.tasks().is_empty());
    assert!(!dir.join("camera_params").exists());
}
