use super::*;

const SCENE: &str = r#"{
    "sequence_name": "Seq",
    "level_name": "Lab",
    "end_frame": 3,
    "bindings": [
        {"name": "Cam", "objects": [{"type": "camera_actor", "name": "Cam", "fov": 60.0}]},
        {"name": "Ava", "kind": "possessable", "objects": [
            {"type": "skinned_mesh_actor", "name": "Ava", "lods": [], "bones": [{"name": "root"}]}
        ]},
        {"name": "AvaComp", "objects": [{"type": "skinned_component_of", "binding": "Ava"}]},
        {"name": "Light", "objects": [{"type": "other", "class": "PointLight"}]}
    ]
}"#;

#[test]
fn scene_json_builds_bindings_by_kind() {
    let seq = InMemorySequence::from_json_str(SCENE).unwrap();
    assert_eq!(seq.name(), "Seq");
    assert_eq!(seq.level_name(), "Lab");
    assert_eq!(seq.playback_range().len_frames(), 3);
    assert_eq!(seq.spawnables().len(), 3);
    assert_eq!(seq.possessables().len(), 1);
}

#[test]
fn component_reference_shares_the_actor_handle() {
    let seq = InMemorySequence::from_json_str(SCENE).unwrap();
    let range = seq.playback_range();
    let ava = seq.possessables().remove(0);
    let comp = seq
        .spawnables()
        .into_iter()
        .find(|b| b.name == "AvaComp")
        .unwrap();
    let (BoundObject::SkinnedMeshActor(a), BoundObject::SkinnedComponent(c)) = (
        seq.bound_objects(&ava, range).remove(0),
        seq.bound_objects(&comp, range).remove(0),
    ) else {
        panic!("unexpected bound object kinds");
    };
    assert!(Arc::ptr_eq(&a, &c));
}

#[test]
fn dangling_component_reference_is_config_error() {
    let err = InMemorySequence::from_json_str(
        r#"{"sequence_name": "S", "end_frame": 1, "bindings": [
            {"name": "X", "objects": [{"type": "rigid_component_of", "binding": "Missing"}]}
        ]}"#,
    )
    .unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn reversed_range_is_rejected() {
    assert!(InMemorySequence::new("S", 5, 1).is_err());
}
