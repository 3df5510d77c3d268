use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Resolution;
use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::output::codec::ImageCodec;

/// Host output settings (`findSetting<OutputSetting>()`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSetting {
    /// Root directory for images and sidecars.
    pub output_directory: String,
    /// Image file name template, relative to `output_directory`.
    pub file_name_format: String,
    /// Rendered resolution.
    pub output_resolution: Resolution,
    /// Digits frame-number tokens are padded to.
    pub zero_pad_frame_numbers: usize,
    /// Constant added to every frame-number token.
    pub frame_number_offset: i32,
    /// Output frame rate for `{frame_rate}`.
    pub frame_rate: f64,
    /// Version number for `{version}`.
    pub version_number: u32,
}

impl Default for OutputSetting {
    fn default() -> Self {
        Self {
            output_directory: "output".to_owned(),
            file_name_format: "{sequence_name}/{render_pass}/{frame_number}.{ext}".to_owned(),
            output_resolution: Resolution::default(),
            zero_pad_frame_numbers: 4,
            frame_number_offset: 0,
            frame_rate: 30.0,
            version_number: 1,
        }
    }
}

/// Host colour settings (`findSetting<ColorSetting>()`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSetting {
    /// OCIO colour management is active; disables quantisation dither.
    pub ocio_enabled: bool,
}

/// Reference to a post-process material asset, e.g. `/Game/Masks/PM_Seg.PM_Seg`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialRef(pub String);

impl MaterialRef {
    /// Asset name: text after the last `.`, else after the last `/`.
    pub fn asset_name(&self) -> &str {
        let tail = self.0.rsplit('/').next().unwrap_or(&self.0);
        tail.rsplit('.').next().unwrap_or(tail)
    }

    /// An empty path counts as unresolved.
    pub fn is_resolved(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

/// User-declared annotation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPassSpec {
    /// Whether the pass is rendered.
    pub enabled: bool,
    /// `{render_pass}` value; defaults to the material asset name.
    pub display_name: String,
    /// Post-process material producing the pass.
    pub material: Option<MaterialRef>,
    /// Output codec.
    pub extension: ImageCodec,
    /// Name the pass appears under in merged frames; filled in at setup.
    #[serde(skip)]
    pub synthetic_pass_name: String,
}

impl Default for RenderPassSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            display_name: String::new(),
            material: None,
            extension: ImageCodec::Png,
            synthetic_pass_name: String::new(),
        }
    }
}

impl RenderPassSpec {
    /// Resolved material, if any.
    pub fn resolved_material(&self) -> Option<&MaterialRef> {
        self.material.as_ref().filter(|m| m.is_resolved())
    }
}

/// Settings of the annotated output stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputStageSettings {
    /// Fallback codec for passes without their own.
    pub output_format: ImageCodec,
    /// Write the beauty pass.
    pub enable_render_pass_rgb: bool,
    /// `{render_pass}` value of the beauty pass; empty means `rgb`.
    pub render_pass_name_rgb: String,
    /// Codec of the beauty pass.
    pub extension_rgb: ImageCodec,
    /// Annotation passes, in declaration order.
    pub additional_render_passes: Vec<RenderPassSpec>,
}

impl Default for OutputStageSettings {
    fn default() -> Self {
        Self {
            output_format: ImageCodec::Png,
            enable_render_pass_rgb: true,
            render_pass_name_rgb: "rgb".to_owned(),
            extension_rgb: ImageCodec::Png,
            additional_render_passes: Vec::new(),
        }
    }
}

impl OutputStageSettings {
    /// Beauty pass display name, defaulting to `rgb`.
    pub fn rgb_pass_name(&self) -> &str {
        if self.render_pass_name_rgb.is_empty() {
            "rgb"
        } else {
            &self.render_pass_name_rgb
        }
    }

    /// Passes that will produce image files.
    pub fn enabled_pass_count(&self) -> usize {
        let extra = self
            .additional_render_passes
            .iter()
            .filter(|p| p.enabled && p.resolved_material().is_some())
            .count();
        extra + usize::from(self.enable_render_pass_rgb)
    }
}

/// Mesh export toggles and sidecar directory names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Write world-space vertex arrays.
    pub save_vertices_position: bool,
    /// Write bone position arrays and bone name tables.
    pub save_skeleton_position: bool,
    /// LOD sampled for vertex arrays.
    pub lod_index_to_save: u32,
    /// Camera sidecar directory.
    pub dir_camera_info: String,
    /// Actor info sidecar directory.
    pub dir_actor_info: String,
    /// Vertex sidecar directory.
    pub dir_vertices: String,
    /// Skeleton sidecar directory.
    pub dir_skeleton: String,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            save_vertices_position: false,
            save_skeleton_position: false,
            lod_index_to_save: 0,
            dir_camera_info: "camera_params".to_owned(),
            dir_actor_info: "actor_infos".to_owned(),
            dir_vertices: "vertices".to_owned(),
            dir_skeleton: "skeleton".to_owned(),
        }
    }
}

/// Complete render configuration as authored in JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output settings.
    pub output: OutputSetting,
    /// Colour settings.
    pub color: ColorSetting,
    /// Output stage settings.
    pub stage: OutputStageSettings,
    /// Annotation settings.
    pub annotation: AnnotationSettings,
}

impl RenderConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> AnnotateResult<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse render config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> AnnotateResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject settings that cannot produce correct output.
    pub fn validate(&self) -> AnnotateResult<()> {
        if self.output.output_directory.trim().is_empty() {
            return Err(AnnotateError::config("output_directory must not be empty"));
        }
        if self.output.file_name_format.trim().is_empty() {
            return Err(AnnotateError::config("file_name_format must not be empty"));
        }
        if self.output.output_resolution.width == 0 || self.output.output_resolution.height == 0 {
            return Err(AnnotateError::config("output_resolution must be non-zero"));
        }
        let a = &self.annotation;
        for (what, dir) in [
            ("dir_camera_info", &a.dir_camera_info),
            ("dir_actor_info", &a.dir_actor_info),
            ("dir_vertices", &a.dir_vertices),
            ("dir_skeleton", &a.dir_skeleton),
        ] {
            if dir.trim().is_empty() {
                return Err(AnnotateError::config(format!("{what} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
