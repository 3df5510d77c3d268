use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg = RenderConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg.annotation.dir_camera_info, "camera_params");
    assert_eq!(cfg.annotation.dir_actor_info, "actor_infos");
    assert_eq!(cfg.annotation.dir_vertices, "vertices");
    assert_eq!(cfg.annotation.dir_skeleton, "skeleton");
    assert_eq!(cfg.output.zero_pad_frame_numbers, 4);
    assert!(cfg.stage.enable_render_pass_rgb);
}

#[test]
fn material_asset_name_prefers_object_name() {
    assert_eq!(MaterialRef("/Game/Masks/PM_Seg.PM_Seg".into()).asset_name(), "PM_Seg");
    assert_eq!(MaterialRef("/Game/Masks/PM_Depth".into()).asset_name(), "PM_Depth");
    assert_eq!(MaterialRef("Plain".into()).asset_name(), "Plain");
}

#[test]
fn passes_parse_with_engine_codec_names() {
    let cfg = RenderConfig::from_json_str(
        r#"{"stage": {"additional_render_passes": [
            {"display_name": "seg", "material": "/Game/PM_Seg.PM_Seg", "extension": "JPEG"},
            {"enabled": false, "material": "/Game/PM_N.PM_N"},
            {"material": ""}
        ]}}"#,
    )
    .unwrap();
    let passes = &cfg.stage.additional_render_passes;
    assert_eq!(passes[0].extension, ImageCodec::Jpeg);
    assert!(passes[0].enabled);
    assert!(passes[2].resolved_material().is_none());
    assert_eq!(cfg.stage.enabled_pass_count(), 2);
}

#[test]
fn empty_rgb_name_defaults_to_rgb() {
    let stage = OutputStageSettings {
        render_pass_name_rgb: String::new(),
        ..OutputStageSettings::default()
    };
    assert_eq!(stage.rgb_pass_name(), "rgb");
}

#[test]
fn validation_rejects_empty_directory_and_zero_resolution() {
    let err = RenderConfig::from_json_str(r#"{"output": {"output_directory": ""}}"#).unwrap_err();
    assert!(err.is_fatal());
    let err = RenderConfig::from_json_str(r#"{"output": {"output_resolution": {"width": 0, "height": 5}}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("output_resolution"));
}

#[test]
fn malformed_json_is_other_error() {
    let err = RenderConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, AnnotateError::Other(_)));
}
