use std::sync::Arc;

use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::naming::filename::{FilenameResolver, FormatOverrides, ValidationFlags};
use crate::output::codec::ImageCodec;
use crate::output::queue::ImageWriteQueue;
use crate::output::task::ImageWriteTask;
use crate::pipeline::config::{OutputStageSettings, RenderPassSpec};
use crate::pipeline::frame::{FINAL_IMAGE_PASS, MergedOutputFrame, PassIdentifier};
use crate::pipeline::host::{OutputFutureData, PipelineHost};
use crate::pixels::composite::PixelPreProcessor;
use crate::pixels::quantize::quantize_to_bit_depth;

/// Lifecycle of one declared annotation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassState {
    /// Configured but not registered (disabled or no material).
    Declared,
    /// Material registered with the deferred renderer.
    Registered,
    /// At least one buffer of the pass has been written.
    Emitting,
    /// The render has finished.
    Terminal,
}

#[derive(Clone, Debug)]
struct DeclaredPass {
    spec: RenderPassSpec,
    state: PassState,
}

/// Routes every pass of a merged frame to a codec, a file name and the write queue.
pub struct RenderPassFanout {
    stage: OutputStageSettings,
    passes: Vec<DeclaredPass>,
    queue: Arc<dyn ImageWriteQueue>,
    resolver: Option<FilenameResolver>,
    dither: bool,
    tasks_enqueued: u64,
}

impl std::fmt::Debug for RenderPassFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPassFanout")
            .field("passes", &self.passes)
            .field("dither", &self.dither)
            .field("tasks_enqueued", &self.tasks_enqueued)
            .finish_non_exhaustive()
    }
}

// Codec and `{render_pass}` value chosen for one incoming pass.
struct Route {
    codec: ImageCodec,
    display_name: String,
}

impl RenderPassFanout {
    /// Fan-out for `stage`, writing through `queue`.
    pub fn new(stage: OutputStageSettings, queue: Arc<dyn ImageWriteQueue>) -> Self {
        let passes = stage
            .additional_render_passes
            .iter()
            .cloned()
            .map(|spec| DeclaredPass {
                spec,
                state: PassState::Declared,
            })
            .collect();
        Self {
            stage,
            passes,
            queue,
            resolver: None,
            dither: true,
            tasks_enqueued: 0,
        }
    }

    #[tracing::instrument(skip_all)]
    /// Register annotation pass materials and bind the filename resolver to the host.
    ///
    /// Setup fails with a configuration error when the output template cannot give
    /// every pass and frame its own file.
    pub fn setup(&mut self, host: &mut dyn PipelineHost) -> AnnotateResult<()> {
        for pass in &mut self.passes {
            let Some(material) = pass.spec.resolved_material().cloned() else {
                tracing::info!(pass = %pass.spec.display_name, "skipping pass without material");
                continue;
            };
            // Named even when disabled, so its buffers are recognised and dropped.
            pass.spec.synthetic_pass_name = format!("{FINAL_IMAGE_PASS}{}", material.asset_name());
            if pass.spec.display_name.is_empty() {
                pass.spec.display_name = material.asset_name().to_owned();
            }
            if !pass.spec.enabled {
                tracing::info!(pass = %pass.spec.display_name, "skipping disabled pass");
                continue;
            }
            host.register_post_process_material(&material);
            pass.state = PassState::Registered;
            tracing::debug!(
                pass = %pass.spec.display_name,
                synthetic = %pass.spec.synthetic_pass_name,
                "registered annotation pass"
            );
        }

        self.dither = !host.color_setting().is_some_and(|c| c.ocio_enabled);
        let sequence = host.target_sequence();
        let resolver = FilenameResolver::new(host.output_setting(), sequence.name(), host.level_name());
        resolver.validate(ValidationFlags {
            include_render_pass: self.stage.enabled_pass_count() > 1,
            include_camera_name: false,
            test_frame_number: true,
        })?;
        self.resolver = Some(resolver);
        Ok(())
    }

    /// Check that `frame` can be written without two passes or cameras sharing a file.
    pub fn validate_frame(&self, frame: &MergedOutputFrame) -> AnnotateResult<()> {
        self.resolver()?.validate(ValidationFlags {
            include_render_pass: frame.standalone_pass_count() > 1,
            include_camera_name: frame.has_data_from_multiple_cameras(),
            test_frame_number: true,
        })
    }

    #[tracing::instrument(skip_all, fields(frame = frame.frame_output_state.frame_index.0))]
    /// Turn every standalone pass of `frame` into an image write task.
    ///
    /// File names resolve against each buffer's own output state. Pixel buffers move into
    /// the tasks. Returns the number of tasks enqueued.
    pub fn on_frame(
        &mut self,
        host: &mut dyn PipelineHost,
        frame: MergedOutputFrame,
    ) -> AnnotateResult<usize> {
        let MergedOutputFrame {
            image_outputs,
            composited_passes,
            ..
        } = frame;
        let mut enqueued = 0;

        for (pass_id, buffer) in image_outputs {
            if composited_passes.iter().any(|c| c.pass_identifier == pass_id) {
                continue;
            }
            let Some(route) = self.route(&pass_id) else {
                continue;
            };

            // Each view carries its own camera and shot; names follow the buffer, not the frame.
            let state = buffer.payload.sample_state.output_state.clone();
            let require_transparent = buffer.payload.require_transparent;
            let codec = route.codec.for_transparency(require_transparent);
            if codec != route.codec {
                tracing::debug!(pass = %pass_id.name, from = ?route.codec, "promoting to PNG for alpha");
            }

            let pixel_data = if codec.requires_8bit() {
                match quantize_to_bit_depth(&buffer, 8, self.dither) {
                    Ok(q) => q,
                    Err(e) => {
                        tracing::error!(pass = %pass_id.name, error = %e, "failed to quantise pass");
                        continue;
                    }
                }
            } else {
                buffer
            };

            let mut overrides = FormatOverrides::new();
            overrides.insert("render_pass".to_owned(), route.display_name);
            overrides.insert("ext".to_owned(), codec.extension().to_owned());
            let resolver = self.resolver()?;
            let file_path = resolver.resolve_image_path(&overrides, &state)?;

            let mut task = ImageWriteTask::new(&file_path, codec, pixel_data);
            if pass_id.is_final_image() {
                let target = task.pixel_data.pixel_type();
                task.pre_processors = composited_passes
                    .iter()
                    .map(|c| PixelPreProcessor::composite_for(target, &c.pixel_data))
                    .collect();
            }

            if host.is_cancelled() {
                tracing::info!(enqueued, "render cancelled, dropping remaining passes");
                return Err(AnnotateError::Cancelled);
            }

            #[cfg(feature = "editor")]
            host.add_frame_to_output_metadata(crate::pipeline::host::OutputMetadata {
                clip_name: resolver.clip_name(&overrides, &state),
                image_sequence_file_name: resolver.image_sequence_file_name(&overrides, &state),
                frame_output_state: state.clone(),
                extension: codec.extension().to_owned(),
                require_transparent,
            });

            let shot = host.active_shot(state.shot_index);
            let future = self.queue.enqueue(task);
            host.add_output_future(
                future,
                OutputFutureData {
                    shot,
                    pass_identifier: pass_id,
                    file_path,
                },
            );
            enqueued += 1;
        }

        self.tasks_enqueued += enqueued as u64;
        tracing::debug!(enqueued, "fanned out frame");
        Ok(enqueued)
    }

    /// Mark every registered pass terminal and log a summary.
    pub fn finish(&mut self) {
        for pass in &mut self.passes {
            if pass.state != PassState::Declared {
                pass.state = PassState::Terminal;
            }
        }
        tracing::info!(
            tasks = self.tasks_enqueued,
            passes = self.passes.len(),
            "render pass fan-out finished"
        );
    }

    /// State of the annotation pass with `display_name`.
    pub fn pass_state(&self, display_name: &str) -> Option<PassState> {
        self.passes
            .iter()
            .find(|p| p.spec.display_name == display_name)
            .map(|p| p.state)
    }

    /// Annotation passes with their setup-time names filled in.
    pub fn passes(&self) -> impl Iterator<Item = &RenderPassSpec> {
        self.passes.iter().map(|p| &p.spec)
    }

    /// Tasks enqueued since creation.
    pub fn tasks_enqueued(&self) -> u64 {
        self.tasks_enqueued
    }

    /// The write queue.
    pub fn queue(&self) -> &Arc<dyn ImageWriteQueue> {
        &self.queue
    }

    fn resolver(&self) -> AnnotateResult<&FilenameResolver> {
        self.resolver
            .as_ref()
            .ok_or_else(|| AnnotateError::config("render pass fan-out used before setup"))
    }

    fn route(&mut self, pass_id: &PassIdentifier) -> Option<Route> {
        if pass_id.is_final_image() {
            if !self.stage.enable_render_pass_rgb {
                return None;
            }
            return Some(Route {
                codec: self.stage.extension_rgb,
                display_name: self.stage.rgb_pass_name().to_owned(),
            });
        }

        if let Some(pass) = self
            .passes
            .iter_mut()
            .find(|p| !p.spec.synthetic_pass_name.is_empty() && p.spec.synthetic_pass_name == pass_id.name)
        {
            if !pass.spec.enabled {
                return None;
            }
            if pass.state == PassState::Registered {
                pass.state = PassState::Emitting;
            }
            return Some(Route {
                codec: pass.spec.extension,
                display_name: pass.spec.display_name.clone(),
            });
        }

        Some(Route {
            codec: self.stage.output_format,
            display_name: pass_id.name.clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/fanout.rs"]
mod tests;
