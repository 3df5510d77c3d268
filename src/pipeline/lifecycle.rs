use std::sync::Arc;

use crate::annotate::exporter::{AnnotationExporter, ExportStats};
use crate::annotate::layout::SidecarLayout;
use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::naming::filename::normalize_path;
use crate::output::fanout::RenderPassFanout;
use crate::output::queue::ImageWriteQueue;
use crate::pipeline::config::{AnnotationSettings, OutputStageSettings, RenderConfig};
use crate::pipeline::frame::MergedOutputFrame;
use crate::pipeline::host::PipelineHost;
use crate::scene::binding::{BindingResolver, SceneBindings};

/// Hooks a host pipeline calls on an output stage.
///
/// `setup_for_pipeline` runs once before any frame; `on_receive_image_data` runs once per
/// merged frame, in frame order, on the pipeline thread.
pub trait PipelineStage {
    /// One-shot setup.
    fn setup_for_pipeline(&mut self, host: &mut dyn PipelineHost) -> AnnotateResult<()>;

    /// Consume one merged frame.
    fn on_receive_image_data(
        &mut self,
        host: &mut dyn PipelineHost,
        frame: MergedOutputFrame,
    ) -> AnnotateResult<FrameReport>;

    /// Called once after the last frame, before the host finalises output.
    fn begin_export(&mut self, _host: &mut dyn PipelineHost) {}
}

/// What one frame produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Sidecar counters.
    pub annotations: ExportStats,
    /// Image tasks enqueued.
    pub images_enqueued: usize,
}

/// Output stage writing render passes plus annotation sidecars.
#[derive(Debug)]
pub struct AnnotatedPipeline {
    annotation: AnnotationSettings,
    fanout: RenderPassFanout,
    bindings: SceneBindings,
    exporter: Option<AnnotationExporter>,
    frames: u64,
}

impl AnnotatedPipeline {
    /// Stage writing images through `queue`.
    pub fn new(
        stage: OutputStageSettings,
        annotation: AnnotationSettings,
        queue: Arc<dyn ImageWriteQueue>,
    ) -> Self {
        Self {
            annotation,
            fanout: RenderPassFanout::new(stage, queue),
            bindings: SceneBindings::default(),
            exporter: None,
            frames: 0,
        }
    }

    /// Stage configured from a render config.
    pub fn from_config(config: &RenderConfig, queue: Arc<dyn ImageWriteQueue>) -> Self {
        Self::new(config.stage.clone(), config.annotation.clone(), queue)
    }

    /// Objects resolved at setup.
    pub fn bindings(&self) -> &SceneBindings {
        &self.bindings
    }

    /// Render-pass fan-out.
    pub fn fanout(&self) -> &RenderPassFanout {
        &self.fanout
    }

    /// Annotation exporter; `None` before setup.
    pub fn exporter(&self) -> Option<&AnnotationExporter> {
        self.exporter.as_ref()
    }

    /// Frames received so far.
    pub fn frames_received(&self) -> u64 {
        self.frames
    }
}

impl PipelineStage for AnnotatedPipeline {
    #[tracing::instrument(skip_all)]
    fn setup_for_pipeline(&mut self, host: &mut dyn PipelineHost) -> AnnotateResult<()> {
        host.set_flush_disk_writes_per_shot(true);
        self.fanout.setup(host)?;

        let root = normalize_path(&host.output_setting().output_directory)?;
        let layout = SidecarLayout::new(root, &self.annotation);
        let sequence = host.target_sequence();
        self.bindings = BindingResolver::resolve(sequence.as_ref());
        if self.annotation.save_skeleton_position {
            let tables = BindingResolver::write_bone_name_tables(&self.bindings, &layout.skeleton_dir());
            tracing::debug!(tables, "wrote bone name tables");
        }

        tracing::info!(
            root = %layout.root().display(),
            objects = self.bindings.len(),
            "annotated pipeline ready"
        );
        let mut exporter = AnnotationExporter::new(
            layout,
            self.annotation.clone(),
            host.output_setting().output_resolution,
        );
        if self.annotation.save_skeleton_position {
            exporter.track_bone_tables(&self.bindings);
        }
        self.exporter = Some(exporter);
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(frame = frame.frame_output_state.frame_index.0))]
    fn on_receive_image_data(
        &mut self,
        host: &mut dyn PipelineHost,
        frame: MergedOutputFrame,
    ) -> AnnotateResult<FrameReport> {
        let exporter = self
            .exporter
            .as_mut()
            .ok_or_else(|| AnnotateError::config("frame received before pipeline setup"))?;
        self.fanout.validate_frame(&frame)?;
        self.frames += 1;

        let annotations = exporter.on_frame(&self.bindings, &frame.frame_output_state);
        let images_enqueued = self.fanout.on_frame(host, frame)?;
        Ok(FrameReport {
            annotations,
            images_enqueued,
        })
    }

    fn begin_export(&mut self, _host: &mut dyn PipelineHost) {
        self.fanout.queue().flush();
        self.fanout.finish();
        tracing::info!(frames = self.frames, "annotated render complete");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/lifecycle.rs"]
mod tests;
