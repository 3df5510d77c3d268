//! annorender is the output stage of an annotated movie render.
//!
//! For every merged frame the host pipeline delivers, it writes the beauty pass and any
//! post-process annotation passes through an asynchronous image write queue, plus a bundle of
//! per-frame sidecars for computer-vision datasets:
//!
//! - camera pose, field of view and resolution
//! - actor pose and stencil id
//! - world-space mesh vertices and skeleton joints
//!
//! The host is abstracted behind [`PipelineHost`] and [`CinematicSequence`]; [`memory`] holds
//! in-memory implementations that replay JSON scenes offline.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Per-frame annotation sidecars and their readers.
pub mod annotate;
/// In-memory host collaborators.
pub mod memory;
/// Output path templating.
pub mod naming;
/// Image write tasks, queues and the render-pass fan-out.
pub mod output;
/// Host-facing settings, frames and lifecycle.
pub mod pipeline;
/// Tagged pixel buffers, quantisation and compositing.
pub mod pixels;
/// Sequence bindings, scene object traits and mesh sampling.
pub mod scene;
/// Raw float and text sinks.
pub mod sidecar;

pub use crate::foundation::core::{FrameNumber, FrameRange, Resolution, Rotator};
pub use crate::foundation::error::{AnnotateError, AnnotateResult};

pub use crate::annotate::{AnnotationExporter, CameraRecord, SidecarLayout};
pub use crate::naming::FilenameResolver;
pub use crate::output::{
    ImageCodec, ImageWriteQueue, ImageWriteTask, RenderPassFanout, ThreadedImageWriteQueue,
    WriteFuture,
};
pub use crate::pipeline::{
    AnnotatedPipeline, MergedOutputFrame, PassIdentifier, PipelineHost, PipelineStage,
    RenderConfig,
};
pub use crate::pixels::{PixelBuffer, PixelData, PixelType};
pub use crate::scene::{BindingResolver, CinematicSequence, MeshSampler, SceneBindings};
