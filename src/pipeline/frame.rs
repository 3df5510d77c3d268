use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameNumber;
use crate::pixels::buffer::PixelBuffer;

/// Name of the beauty pass.
pub const FINAL_IMAGE_PASS: &str = "FinalImage";

/// Identifies one render pass of a merged frame.
///
/// Equal iff both name and view index match.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PassIdentifier {
    /// Pass name, e.g. `FinalImage` or a synthetic annotation pass name.
    pub name: String,
    /// Optional view (camera) index.
    #[serde(default)]
    pub view: Option<u32>,
}

impl PassIdentifier {
    /// Identifier without a view index.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view: None,
        }
    }

    /// Identifier bound to a view index.
    pub fn with_view(name: impl Into<String>, view: u32) -> Self {
        Self {
            name: name.into(),
            view: Some(view),
        }
    }

    /// The beauty pass.
    pub fn final_image() -> Self {
        Self::new(FINAL_IMAGE_PASS)
    }

    /// Whether this is the beauty pass (any view).
    pub fn is_final_image(&self) -> bool {
        self.name == FINAL_IMAGE_PASS
    }
}

/// Frame bookkeeping the host attaches to every merged frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameOutputState {
    /// Index into the host's active shot list.
    pub shot_index: usize,
    /// Zero-based output frame index across the render (`{frame_number_rel}`).
    pub frame_index: FrameNumber,
    /// Frame number on the root sequence timeline (`{frame_number}`).
    pub source_frame_number: FrameNumber,
    /// Frame number on the shot timeline (`{frame_number_shot}`).
    pub shot_source_frame_number: FrameNumber,
    /// Zero-based output frame index within the shot (`{frame_number_shot_rel}`).
    pub shot_output_frame_number: FrameNumber,
    /// Number of cameras contributing to this frame.
    pub camera_count: u32,
    /// Camera name for `{camera_name}`.
    pub camera_name: String,
    /// Shot name for `{shot_name}`.
    pub shot_name: String,
}

/// An overlay to blend onto the beauty pass.
#[derive(Clone, Debug)]
pub struct CompositePassInfo {
    /// Which pass the overlay came from.
    pub pass_identifier: PassIdentifier,
    /// Overlay pixels.
    pub pixel_data: PixelBuffer,
}

/// Everything the host produced for one output frame.
#[derive(Clone, Debug, Default)]
pub struct MergedOutputFrame {
    /// Pixel buffer per pass.
    pub image_outputs: BTreeMap<PassIdentifier, PixelBuffer>,
    /// Frame bookkeeping.
    pub frame_output_state: FrameOutputState,
    /// Overlays consumed by the beauty pass.
    pub composited_passes: Vec<CompositePassInfo>,
}

impl MergedOutputFrame {
    /// Empty frame for `state`.
    pub fn new(frame_output_state: FrameOutputState) -> Self {
        Self {
            image_outputs: BTreeMap::new(),
            frame_output_state,
            composited_passes: Vec::new(),
        }
    }

    /// Whether `pass` is consumed as an overlay.
    pub fn is_composited(&self, pass: &PassIdentifier) -> bool {
        self.composited_passes
            .iter()
            .any(|c| &c.pass_identifier == pass)
    }

    /// Number of passes that will be written as standalone files.
    pub fn standalone_pass_count(&self) -> usize {
        self.image_outputs
            .keys()
            .filter(|k| !self.is_composited(k))
            .count()
    }

    /// Whether the frame carries data from more than one camera.
    pub fn has_data_from_multiple_cameras(&self) -> bool {
        if self.frame_output_state.camera_count > 1 {
            return true;
        }
        let mut views = self.image_outputs.keys().filter_map(|k| k.view);
        match views.next() {
            Some(first) => views.any(|v| v != first),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/frame.rs"]
mod tests;
