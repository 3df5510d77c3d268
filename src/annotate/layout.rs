use std::path::{Path, PathBuf};

use crate::foundation::core::FrameNumber;
use crate::pipeline::config::AnnotationSettings;

const FRAME_PAD: usize = 4;

/// Sidecar paths under one output root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidecarLayout {
    root: PathBuf,
    camera_dir: String,
    actor_dir: String,
    vertices_dir: String,
    skeleton_dir: String,
}

impl SidecarLayout {
    /// Layout rooted at `root` using the configured directory names.
    pub fn new(root: impl Into<PathBuf>, settings: &AnnotationSettings) -> Self {
        Self {
            root: root.into(),
            camera_dir: settings.dir_camera_info.clone(),
            actor_dir: settings.dir_actor_info.clone(),
            vertices_dir: settings.dir_vertices.clone(),
            skeleton_dir: settings.dir_skeleton.clone(),
        }
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/{camera_dir}`.
    pub fn camera_dir(&self) -> PathBuf {
        self.root.join(&self.camera_dir)
    }

    /// `{root}/{skeleton_dir}`.
    pub fn skeleton_dir(&self) -> PathBuf {
        self.root.join(&self.skeleton_dir)
    }

    /// First-frame camera record.
    pub fn camera_static(&self, camera: &str) -> PathBuf {
        self.camera_dir().join(format!("{camera}.dat"))
    }

    /// Per-frame camera record.
    pub fn camera_frame(&self, camera: &str, frame: FrameNumber) -> PathBuf {
        per_frame(&self.camera_dir(), camera, frame)
    }

    /// First-frame stencil id.
    pub fn actor_static(&self, mesh: &str) -> PathBuf {
        self.root.join(&self.actor_dir).join(format!("{mesh}.dat"))
    }

    /// Per-frame actor info.
    pub fn actor_frame(&self, mesh: &str, frame: FrameNumber) -> PathBuf {
        per_frame(&self.root.join(&self.actor_dir), mesh, frame)
    }

    /// Per-frame vertex positions.
    pub fn vertices_frame(&self, mesh: &str, frame: FrameNumber) -> PathBuf {
        per_frame(&self.root.join(&self.vertices_dir), mesh, frame)
    }

    /// Per-frame bone positions.
    pub fn skeleton_frame(&self, mesh: &str, frame: FrameNumber) -> PathBuf {
        per_frame(&self.skeleton_dir(), mesh, frame)
    }

    /// Bone name table written at setup.
    pub fn bone_names(&self, mesh: &str) -> PathBuf {
        self.skeleton_dir().join(format!("{mesh}_BoneName.txt"))
    }
}

fn per_frame(dir: &Path, object: &str, frame: FrameNumber) -> PathBuf {
    dir.join(object).join(format!("{}.dat", frame.padded(FRAME_PAD)))
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/layout.rs"]
mod tests;
