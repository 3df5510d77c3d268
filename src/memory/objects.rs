use glam::{Affine3A, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rotator;
use crate::scene::model::{
    CameraActor, MeshComponent, MeshDescription, RigidMeshComponent, SceneObject, SkinInfluences,
    SkinnedLodData, SkinnedMeshComponent,
};

fn one() -> Vec3 {
    Vec3::ONE
}

fn default_fov() -> f32 {
    90.0
}

/// A camera that never moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticCamera {
    /// Internal object name.
    pub name: String,
    /// Outliner label.
    #[serde(default)]
    pub label: String,
    /// World location.
    #[serde(default)]
    pub location: Vec3,
    /// World rotation.
    #[serde(default)]
    pub rotation: Rotator,
    /// Horizontal field of view, degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
}

impl StaticCamera {
    /// Camera at `location` looking down +X with a 90 degree field of view.
    pub fn new(name: impl Into<String>, location: Vec3) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            location,
            rotation: Rotator::ZERO,
            fov: default_fov(),
        }
    }
}

impl SceneObject for StaticCamera {
    fn internal_name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl CameraActor for StaticCamera {
    fn location(&self) -> Vec3 {
        self.location
    }

    fn rotation(&self) -> Rotator {
        self.rotation
    }

    fn fov_degrees(&self) -> f32 {
        self.fov
    }
}

/// A rigid mesh with fixed transform and per-LOD vertex lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticRigidMesh {
    /// Internal object name.
    pub name: String,
    /// Outliner label.
    #[serde(default)]
    pub label: String,
    /// World location.
    #[serde(default)]
    pub location: Vec3,
    /// World rotation.
    #[serde(default)]
    pub rotation: Rotator,
    /// World scale.
    #[serde(default = "one")]
    pub scale: Vec3,
    /// Custom stencil value.
    #[serde(default)]
    pub stencil_value: i32,
    /// Vertex lists per LOD; empty means no mesh asset.
    #[serde(default)]
    pub lods: Vec<MeshDescription>,
}

impl StaticRigidMesh {
    /// Mesh with one LOD.
    pub fn new(name: impl Into<String>, location: Vec3, vertices: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            location,
            rotation: Rotator::ZERO,
            scale: Vec3::ONE,
            stencil_value: 0,
            lods: vec![MeshDescription {
                vertex_positions: vertices,
            }],
        }
    }
}

fn to_world(location: Vec3, rotation: Rotator, scale: Vec3) -> Affine3A {
    Affine3A::from_scale_rotation_translation(scale, rotation.to_quat(), location)
}

impl SceneObject for StaticRigidMesh {
    fn internal_name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl MeshComponent for StaticRigidMesh {
    fn location(&self) -> Vec3 {
        self.location
    }

    fn rotation(&self) -> Rotator {
        self.rotation
    }

    fn stencil_value(&self) -> i32 {
        self.stencil_value
    }

    fn component_to_world(&self) -> Affine3A {
        to_world(self.location, self.rotation, self.scale)
    }

    fn has_mesh_asset(&self) -> bool {
        !self.lods.is_empty()
    }
}

impl RigidMeshComponent for StaticRigidMesh {
    fn mesh_description(&self, lod: u32) -> Option<MeshDescription> {
        self.lods.get(lod as usize).cloned()
    }
}

/// A bone with a fixed component-space location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticBone {
    /// Bone name.
    pub name: String,
    /// Component-space location.
    #[serde(default)]
    pub location: Vec3,
}

/// Render data and skin weights of one skinned LOD.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSkinnedLod {
    /// Reference-pose vertices and triangles.
    #[serde(flatten)]
    pub data: SkinnedLodData,
    /// One influence list per vertex.
    #[serde(default)]
    pub weights: Vec<SkinInfluences>,
}

/// A skinned mesh frozen in one pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticSkinnedMesh {
    /// Internal object name.
    pub name: String,
    /// Outliner label.
    #[serde(default)]
    pub label: String,
    /// World location.
    #[serde(default)]
    pub location: Vec3,
    /// World rotation.
    #[serde(default)]
    pub rotation: Rotator,
    /// World scale.
    #[serde(default = "one")]
    pub scale: Vec3,
    /// Custom stencil value.
    #[serde(default)]
    pub stencil_value: i32,
    /// Skeleton in bone-index order.
    #[serde(default)]
    pub bones: Vec<StaticBone>,
    /// Reference-to-local matrices; identity for every bone when empty.
    #[serde(default)]
    pub pose: Vec<Mat4>,
    /// LODs; empty means no mesh asset.
    #[serde(default)]
    pub lods: Vec<StaticSkinnedLod>,
}

impl StaticSkinnedMesh {
    /// Mesh with the given skeleton and LODs in reference pose.
    pub fn new(name: impl Into<String>, bones: Vec<StaticBone>, lods: Vec<StaticSkinnedLod>) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            location: Vec3::ZERO,
            rotation: Rotator::ZERO,
            scale: Vec3::ONE,
            stencil_value: 0,
            bones,
            pose: Vec::new(),
            lods,
        }
    }
}

impl SceneObject for StaticSkinnedMesh {
    fn internal_name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl MeshComponent for StaticSkinnedMesh {
    fn location(&self) -> Vec3 {
        self.location
    }

    fn rotation(&self) -> Rotator {
        self.rotation
    }

    fn stencil_value(&self) -> i32 {
        self.stencil_value
    }

    fn component_to_world(&self) -> Affine3A {
        to_world(self.location, self.rotation, self.scale)
    }

    fn has_mesh_asset(&self) -> bool {
        !self.lods.is_empty()
    }
}

impl SkinnedMeshComponent for StaticSkinnedMesh {
    fn lod_count(&self) -> u32 {
        self.lods.len() as u32
    }

    fn lod_render_data(&self, lod: u32) -> Option<SkinnedLodData> {
        self.lods.get(lod as usize).map(|l| l.data.clone())
    }

    fn ref_to_local_matrices(&self) -> Vec<Mat4> {
        if self.pose.is_empty() {
            vec![Mat4::IDENTITY; self.bones.len()]
        } else {
            self.pose.clone()
        }
    }

    fn skin_weight_buffer(&self, lod: u32) -> Option<Vec<SkinInfluences>> {
        self.lods.get(lod as usize).map(|l| l.weights.clone())
    }

    fn bone_names(&self) -> Vec<String> {
        self.bones.iter().map(|b| b.name.clone()).collect()
    }

    fn bone_location(&self, bone: &str) -> Option<Vec3> {
        let idx = self.bones.iter().position(|b| b.name == bone)?;
        let posed = self
            .pose
            .get(idx)
            .map_or(self.bones[idx].location, |m| m.transform_point3(self.bones[idx].location));
        Some(self.component_to_world().transform_point3(posed))
    }
}
