use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use glam::Vec3;

use crate::annotate::layout::SidecarLayout;
use crate::annotate::records::{ActorInfoRecord, CameraRecord, MeshGeometryRecord};
use crate::foundation::core::{FrameNumber, Resolution};
use crate::foundation::error::AnnotateResult;
use crate::pipeline::config::AnnotationSettings;
use crate::pipeline::frame::FrameOutputState;
use crate::scene::binding::SceneBindings;
use crate::scene::model::MeshComponent;
use crate::scene::sampler::MeshSampler;
use crate::sidecar::{write_float, write_float_array};

/// Counters for one exported frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Sidecar files written.
    pub written: usize,
    /// Sidecars skipped because they could not be written.
    pub skipped: usize,
    /// Objects skipped for this frame after a sampling failure.
    pub objects_skipped: usize,
    /// Skeleton frames whose bone count differs from the mesh's bone name table.
    pub skeleton_mismatches: usize,
}

impl ExportStats {
    fn record(&mut self, result: AnnotateResult<()>, path: &Path) {
        match result {
            Ok(()) => self.written += 1,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping sidecar");
                self.skipped += 1;
            }
        }
    }
}

/// Writes camera, actor, vertex and skeleton sidecars for every bound object.
#[derive(Debug)]
pub struct AnnotationExporter {
    layout: SidecarLayout,
    settings: AnnotationSettings,
    resolution: Resolution,
    first_frame_done: bool,
    exported: BTreeSet<FrameNumber>,
    bone_tables: BTreeMap<String, usize>,
}

impl AnnotationExporter {
    /// Exporter writing below `layout` for images of `resolution`.
    pub fn new(layout: SidecarLayout, settings: AnnotationSettings, resolution: Resolution) -> Self {
        Self {
            layout,
            settings,
            resolution,
            first_frame_done: false,
            exported: BTreeSet::new(),
            bone_tables: BTreeMap::new(),
        }
    }

    /// Remember the bone count of every name table written for `bindings`.
    ///
    /// Skeleton frames of these meshes are checked against it.
    pub fn track_bone_tables(&mut self, bindings: &SceneBindings) {
        self.bone_tables = bindings
            .skinned_meshes
            .values()
            .map(|b| (b.export_name.clone(), b.handle.bone_names().len()))
            .collect();
    }

    /// Sidecar layout.
    pub fn layout(&self) -> &SidecarLayout {
        &self.layout
    }

    /// Whether the first-frame sidecars have been written.
    pub fn first_frame_done(&self) -> bool {
        self.first_frame_done
    }

    #[tracing::instrument(skip_all, fields(frame = state.frame_index.0))]
    /// Export one frame. Static sidecars go out before the first frame's per-frame ones.
    ///
    /// A frame index seen before is ignored, so each per-frame sidecar is written once.
    pub fn on_frame(&mut self, bindings: &SceneBindings, state: &FrameOutputState) -> ExportStats {
        let frame = state.frame_index;
        let mut stats = ExportStats::default();
        if !self.exported.insert(frame) {
            tracing::debug!("frame already exported");
            return stats;
        }

        if !self.first_frame_done {
            self.export_static(bindings, &mut stats);
            self.first_frame_done = true;
        }

        for cam in bindings.cameras.values() {
            let record = CameraRecord::from_camera(cam.handle.as_ref(), self.resolution);
            let path = self.layout.camera_frame(&cam.export_name, frame);
            stats.record(write_float_array(&record.to_floats(), &path), &path);
        }

        let lod = self.settings.lod_index_to_save;
        for mesh in bindings.rigid_meshes.values() {
            let name = &mesh.export_name;
            self.export_actor_info(mesh.handle.as_ref(), name, frame, &mut stats);
            if self.settings.save_vertices_position {
                match MeshSampler::rigid_vertices_at_lod(mesh.handle.as_ref(), lod) {
                    Ok(v) => self.write_geometry(&self.layout.vertices_frame(name, frame), v, &mut stats),
                    Err(e) => {
                        tracing::error!(mesh = %name, error = %e, "failed to get vertex positions");
                        stats.objects_skipped += 1;
                    }
                }
            }
        }

        for mesh in bindings.skinned_meshes.values() {
            let name = &mesh.export_name;
            let handle = mesh.handle.as_ref();
            self.export_actor_info(handle, name, frame, &mut stats);
            if self.settings.save_vertices_position {
                match MeshSampler::skinned_vertices_at_lod(handle, lod) {
                    Ok(v) => self.write_geometry(&self.layout.vertices_frame(name, frame), v, &mut stats),
                    Err(e) => {
                        tracing::error!(mesh = %name, error = %e, "failed to get vertex positions");
                        stats.objects_skipped += 1;
                        continue;
                    }
                }
            }
            if self.settings.save_skeleton_position {
                match MeshSampler::bone_positions(handle) {
                    Ok((positions, names)) => {
                        if let Some(&table) = self.bone_tables.get(name)
                            && table != names.len()
                        {
                            tracing::warn!(
                                mesh = %name,
                                table,
                                bones = names.len(),
                                "skeleton does not match its bone name table"
                            );
                            stats.skeleton_mismatches += 1;
                        }
                        self.write_geometry(&self.layout.skeleton_frame(name, frame), positions, &mut stats)
                    }
                    Err(e) => {
                        tracing::error!(mesh = %name, error = %e, "failed to get skeleton positions");
                        stats.objects_skipped += 1;
                    }
                }
            }
        }

        tracing::debug!(
            written = stats.written,
            skipped = stats.skipped,
            objects_skipped = stats.objects_skipped,
            skeleton_mismatches = stats.skeleton_mismatches,
            "exported frame annotations"
        );
        stats
    }

    fn export_static(&self, bindings: &SceneBindings, stats: &mut ExportStats) {
        for cam in bindings.cameras.values() {
            let record = CameraRecord::from_camera(cam.handle.as_ref(), self.resolution);
            let path = self.layout.camera_static(&cam.export_name);
            stats.record(write_float_array(&record.to_floats(), &path), &path);
        }
        let stencils = bindings
            .rigid_meshes
            .values()
            .map(|m| (&m.export_name, m.handle.stencil_value()))
            .chain(
                bindings
                    .skinned_meshes
                    .values()
                    .map(|m| (&m.export_name, m.handle.stencil_value())),
            );
        for (name, stencil) in stencils {
            let path = self.layout.actor_static(name);
            stats.record(write_float(stencil as f32, &path), &path);
        }
    }

    fn export_actor_info(
        &self,
        mesh: &dyn MeshComponent,
        name: &str,
        frame: FrameNumber,
        stats: &mut ExportStats,
    ) {
        let record = ActorInfoRecord::from_mesh(mesh);
        let path = self.layout.actor_frame(name, frame);
        stats.record(write_float_array(&record.to_floats(), &path), &path);
    }

    fn write_geometry(&self, path: &Path, positions: Vec<Vec3>, stats: &mut ExportStats) {
        let record = MeshGeometryRecord::new(positions);
        stats.record(write_float_array(&record.to_floats(), path), path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/exporter.rs"]
mod tests;
