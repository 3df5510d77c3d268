use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::AnnotateResult;
use crate::output::queue::WriteFuture;
use crate::pipeline::config::{ColorSetting, MaterialRef, OutputSetting};
use crate::pipeline::host::{OutputFutureData, OutputMetadata, PipelineHost, ShotHandle};
use crate::scene::model::CinematicSequence;

// A tracked write; settled once the worker reports back so the channel is released.
enum Tracked {
    Pending(WriteFuture),
    Settled(AnnotateResult<PathBuf>),
}

impl Tracked {
    fn into_result(self) -> AnnotateResult<PathBuf> {
        match self {
            Self::Pending(f) => f.wait(),
            Self::Settled(r) => r,
        }
    }
}

/// A [`PipelineHost`] that records every call.
pub struct InMemoryHost {
    output: OutputSetting,
    color: Option<ColorSetting>,
    level_name: String,
    shots: Vec<ShotHandle>,
    sequence: Arc<dyn CinematicSequence>,
    flush_disk_writes_per_shot: bool,
    registered_materials: Vec<MaterialRef>,
    futures: Vec<(OutputFutureData, Tracked)>,
    // Entries before this index are all settled.
    settled: usize,
    metadata: Vec<OutputMetadata>,
    cancelled: Arc<AtomicBool>,
}

impl std::fmt::Debug for InMemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryHost")
            .field("sequence", &self.sequence.name())
            .field("output_directory", &self.output.output_directory)
            .field("futures", &self.futures.len())
            .finish_non_exhaustive()
    }
}

impl InMemoryHost {
    /// Host rendering `sequence` as a single shot named after it.
    pub fn new(output: OutputSetting, sequence: Arc<dyn CinematicSequence>) -> Self {
        let shot = ShotHandle {
            index: 0,
            name: sequence.name().to_owned(),
        };
        Self {
            output,
            color: None,
            level_name: String::new(),
            shots: vec![shot],
            sequence,
            flush_disk_writes_per_shot: false,
            registered_materials: Vec::new(),
            futures: Vec::new(),
            settled: 0,
            metadata: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the colour setting.
    pub fn with_color_setting(mut self, color: ColorSetting) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the level name.
    pub fn with_level_name(mut self, name: impl Into<String>) -> Self {
        self.level_name = name.into();
        self
    }

    /// Replace the shot list.
    pub fn with_shots(mut self, shots: Vec<ShotHandle>) -> Self {
        self.shots = shots;
        self
    }

    /// Whether setup asked for per-shot flushing.
    pub fn flush_disk_writes_per_shot(&self) -> bool {
        self.flush_disk_writes_per_shot
    }

    /// Materials registered with the deferred renderer, in order.
    pub fn registered_materials(&self) -> &[MaterialRef] {
        &self.registered_materials
    }

    /// Tracking data of every output future, in registration order.
    pub fn output_futures(&self) -> Vec<&OutputFutureData> {
        self.futures.iter().map(|(d, _)| d).collect()
    }

    /// Writes registered but not yet seen to complete.
    pub fn pending_writes(&self) -> usize {
        self.futures[self.settled..]
            .iter()
            .filter(|(_, t)| matches!(t, Tracked::Pending(_)))
            .count()
    }

    /// Recorded clip metadata.
    pub fn metadata(&self) -> &[OutputMetadata] {
        &self.metadata
    }

    /// Shared cancel flag; storing `true` cancels the render.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Wait for every tracked write, returning its tracking data and outcome.
    pub fn wait_all(&mut self) -> Vec<(OutputFutureData, AnnotateResult<PathBuf>)> {
        self.settled = 0;
        std::mem::take(&mut self.futures)
            .into_iter()
            .map(|(d, t)| (d, t.into_result()))
            .collect()
    }

    // Swap finished futures for their results without blocking.
    fn settle_ready(&mut self) {
        for (_, tracked) in &mut self.futures[self.settled..] {
            let Tracked::Pending(f) = tracked else {
                continue;
            };
            if !f.is_ready() {
                continue;
            }
            let placeholder = Tracked::Settled(Ok(PathBuf::new()));
            if let Tracked::Pending(f) = std::mem::replace(tracked, placeholder) {
                *tracked = Tracked::Settled(f.wait());
            }
        }
        while self
            .futures
            .get(self.settled)
            .is_some_and(|(_, t)| matches!(t, Tracked::Settled(_)))
        {
            self.settled += 1;
        }
    }
}

impl PipelineHost for InMemoryHost {
    fn output_setting(&self) -> &OutputSetting {
        &self.output
    }

    fn color_setting(&self) -> Option<&ColorSetting> {
        self.color.as_ref()
    }

    fn level_name(&self) -> &str {
        &self.level_name
    }

    fn active_shot(&self, index: usize) -> Option<ShotHandle> {
        self.shots.get(index).cloned()
    }

    fn target_sequence(&self) -> Arc<dyn CinematicSequence> {
        Arc::clone(&self.sequence)
    }

    fn set_flush_disk_writes_per_shot(&mut self, flush: bool) {
        self.flush_disk_writes_per_shot = flush;
    }

    fn register_post_process_material(&mut self, material: &MaterialRef) {
        self.registered_materials.push(material.clone());
    }

    fn add_output_future(&mut self, future: WriteFuture, data: OutputFutureData) {
        self.futures.push((data, Tracked::Pending(future)));
        self.settle_ready();
    }

    fn add_frame_to_output_metadata(&mut self, metadata: OutputMetadata) {
        self.metadata.push(metadata);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/memory/host.rs"]
mod tests;
