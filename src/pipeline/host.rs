use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::output::queue::WriteFuture;
use crate::pipeline::config::{ColorSetting, MaterialRef, OutputSetting};
use crate::pipeline::frame::{FrameOutputState, PassIdentifier};
use crate::scene::model::CinematicSequence;

/// One entry of the host's active shot list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotHandle {
    /// Position in the shot list.
    pub index: usize,
    /// Shot name.
    pub name: String,
}

/// What the host needs to track a pending image write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFutureData {
    /// Shot the image belongs to.
    pub shot: Option<ShotHandle>,
    /// Pass that produced the image.
    pub pass_identifier: PassIdentifier,
    /// Resolved absolute path.
    pub file_path: String,
}

/// Per-frame entry for edit-decision-list export.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputMetadata {
    /// Frame-independent clip identifier.
    pub clip_name: String,
    /// File name with shot-relative frame numbers.
    pub image_sequence_file_name: String,
    /// Frame the entry describes.
    pub frame_output_state: FrameOutputState,
    /// File extension.
    pub extension: String,
    /// Whether the pass was written with alpha.
    pub require_transparent: bool,
}

/// The movie pipeline hosting the output stage.
pub trait PipelineHost {
    /// `findSetting<OutputSetting>()`.
    fn output_setting(&self) -> &OutputSetting;

    /// `findSetting<ColorSetting>()`; `None` when not configured.
    fn color_setting(&self) -> Option<&ColorSetting>;

    /// Name of the level being rendered.
    fn level_name(&self) -> &str;

    /// Active shot at `index`.
    fn active_shot(&self, index: usize) -> Option<ShotHandle>;

    /// Sequence being rendered.
    fn target_sequence(&self) -> Arc<dyn CinematicSequence>;

    /// Drain each shot's writes before the next shot starts.
    fn set_flush_disk_writes_per_shot(&mut self, flush: bool);

    /// Ask the deferred renderer to produce a pass for `material`.
    fn register_post_process_material(&mut self, material: &MaterialRef);

    /// Track a pending image write.
    fn add_output_future(&mut self, future: WriteFuture, data: OutputFutureData);

    /// Record clip metadata (editor builds).
    fn add_frame_to_output_metadata(&mut self, _metadata: OutputMetadata) {}

    /// Whether the render was cancelled.
    fn is_cancelled(&self) -> bool {
        false
    }
}
