use super::*;

fn layout() -> SidecarLayout {
    SidecarLayout::new("/out", &AnnotationSettings::default())
}

#[test]
fn default_directories_and_padding() {
    let l = layout();
    assert_eq!(l.camera_static("Cam"), PathBuf::from("/out/camera_params/Cam.dat"));
    assert_eq!(l.camera_frame("Cam", FrameNumber(7)), PathBuf::from("/out/camera_params/Cam/0007.dat"));
    assert_eq!(l.actor_static("Block"), PathBuf::from("/out/actor_infos/Block.dat"));
    assert_eq!(l.actor_frame("Block", FrameNumber(0)), PathBuf::from("/out/actor_infos/Block/0000.dat"));
    assert_eq!(l.vertices_frame("Ava", FrameNumber(12)), PathBuf::from("/out/vertices/Ava/0012.dat"));
    assert_eq!(l.skeleton_frame("Ava", FrameNumber(2)), PathBuf::from("/out/skeleton/Ava/0002.dat"));
    assert_eq!(l.bone_names("Ava"), PathBuf::from("/out/skeleton/Ava_BoneName.txt"));
}

#[test]
fn per_frame_paths_are_injective() {
    let l = layout();
    let mut seen = std::collections::BTreeSet::new();
    for name in ["A", "B", "AB"] {
        for f in 0..20 {
            assert!(seen.insert(l.actor_frame(name, FrameNumber(f))));
        }
    }
}

#[test]
fn custom_directory_names_apply() {
    let settings = AnnotationSettings {
        dir_camera_info: "cams".into(),
        dir_skeleton: "joints".into(),
        ..AnnotationSettings::default()
    };
    let l = SidecarLayout::new("/r", &settings);
    assert_eq!(l.camera_frame("C", FrameNumber(1)), PathBuf::from("/r/cams/C/0001.dat"));
    assert_eq!(l.bone_names("M"), PathBuf::from("/r/joints/M_BoneName.txt"));
}
