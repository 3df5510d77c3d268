use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Resolution, Rotator};
use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::scene::model::{CameraActor, MeshComponent};

/// Camera pose, field of view and resolution for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// World location.
    pub location: Vec3,
    /// World rotation.
    pub rotation: Rotator,
    /// Horizontal field of view, degrees.
    pub fov_degrees: f32,
    /// Image resolution.
    pub resolution: Resolution,
}

impl CameraRecord {
    /// Number of floats on disk.
    pub const FLOATS: usize = 9;

    /// Snapshot `camera` for an image of `resolution`.
    pub fn from_camera(camera: &dyn CameraActor, resolution: Resolution) -> Self {
        Self {
            location: camera.location(),
            rotation: camera.rotation(),
            fov_degrees: camera.fov_degrees(),
            resolution,
        }
    }

    /// `x y z roll pitch yaw fov width height`.
    pub fn to_floats(&self) -> [f32; 9] {
        [
            self.location.x,
            self.location.y,
            self.location.z,
            self.rotation.roll,
            self.rotation.pitch,
            self.rotation.yaw,
            self.fov_degrees,
            self.resolution.width as f32,
            self.resolution.height as f32,
        ]
    }

    /// Inverse of [`CameraRecord::to_floats`].
    pub fn from_floats(v: &[f32]) -> AnnotateResult<Self> {
        let v: &[f32; 9] = v.try_into().map_err(|_| {
            AnnotateError::sidecar(format!("camera record needs 9 floats, got {}", v.len()))
        })?;
        Ok(Self {
            location: Vec3::new(v[0], v[1], v[2]),
            rotation: Rotator::new(v[3], v[4], v[5]),
            fov_degrees: v[6],
            resolution: Resolution::new(v[7] as u32, v[8] as u32),
        })
    }

    /// Pinhole intrinsics, row-major: `f = max(w, h) / 2 / tan(fov / 2)`, centre `(w/2, h/2)`.
    pub fn intrinsics(&self) -> [[f32; 3]; 3] {
        let w = self.resolution.width as f32;
        let h = self.resolution.height as f32;
        let f = w.max(h) / 2.0 / (self.fov_degrees.to_radians() / 2.0).tan();
        [[f, 0.0, w / 2.0], [0.0, f, h / 2.0], [0.0, 0.0, 1.0]]
    }
}

/// Actor pose and stencil id for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorInfoRecord {
    /// Owner actor world location.
    pub location: Vec3,
    /// Owner actor world rotation.
    pub rotation: Rotator,
    /// Custom stencil value.
    pub stencil_id: i32,
}

impl ActorInfoRecord {
    /// Number of floats on disk.
    pub const FLOATS: usize = 7;

    /// Snapshot a mesh component.
    pub fn from_mesh(mesh: &dyn MeshComponent) -> Self {
        Self {
            location: mesh.location(),
            rotation: mesh.rotation(),
            stencil_id: mesh.stencil_value(),
        }
    }

    /// `x y z roll pitch yaw stencil`.
    pub fn to_floats(&self) -> [f32; 7] {
        [
            self.location.x,
            self.location.y,
            self.location.z,
            self.rotation.roll,
            self.rotation.pitch,
            self.rotation.yaw,
            self.stencil_id as f32,
        ]
    }

    /// Inverse of [`ActorInfoRecord::to_floats`].
    pub fn from_floats(v: &[f32]) -> AnnotateResult<Self> {
        let v: &[f32; 7] = v.try_into().map_err(|_| {
            AnnotateError::sidecar(format!("actor info needs 7 floats, got {}", v.len()))
        })?;
        Ok(Self {
            location: Vec3::new(v[0], v[1], v[2]),
            rotation: Rotator::new(v[3], v[4], v[5]),
            stencil_id: v[6] as i32,
        })
    }
}

/// World-space points (vertices or bones), XYZ-interleaved on disk.
///
/// The point count is the file length divided by 12; no prefix is stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometryRecord {
    /// Points in sampling order.
    pub positions: Vec<Vec3>,
}

impl MeshGeometryRecord {
    /// Wrap sampled points.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave to `3 * len` floats.
    pub fn to_floats(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Group floats into points; the count must be a multiple of three.
    pub fn from_floats(v: &[f32]) -> AnnotateResult<Self> {
        if !v.len().is_multiple_of(3) {
            return Err(AnnotateError::sidecar(format!(
                "geometry record has {} floats, not a multiple of 3",
                v.len()
            )));
        }
        Ok(Self {
            positions: v
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2]))
                .collect(),
        })
    }
}

/// Bone names of one skinned mesh, aligned with its skeleton records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneNameTable {
    /// Names in skeleton order.
    pub names: Vec<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/records.rs"]
mod tests;
