//! Host-facing surface: settings, merged frames, the host trait, and the stage lifecycle.

pub(crate) mod config;
pub(crate) mod frame;
pub(crate) mod host;
pub(crate) mod lifecycle;

pub use config::{
    AnnotationSettings, ColorSetting, MaterialRef, OutputSetting, OutputStageSettings,
    RenderConfig, RenderPassSpec,
};
pub use frame::{
    CompositePassInfo, FINAL_IMAGE_PASS, FrameOutputState, MergedOutputFrame, PassIdentifier,
};
pub use host::{OutputFutureData, OutputMetadata, PipelineHost, ShotHandle};
pub use lifecycle::{AnnotatedPipeline, FrameReport, PipelineStage};
