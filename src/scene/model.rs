use std::sync::Arc;

use glam::{Affine3A, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::foundation::core::{FrameRange, Rotator};

/// Any named scene object.
pub trait SceneObject: Send + Sync {
    /// Engine-internal object name (`CineCameraActor_3`, `BP_Hero_C_0`, ...).
    fn internal_name(&self) -> &str;

    /// Human label shown in the level outliner.
    fn label(&self) -> &str;
}

/// A camera actor bound by the sequence.
pub trait CameraActor: SceneObject {
    /// World-space location.
    fn location(&self) -> Vec3;
    /// World-space rotation.
    fn rotation(&self) -> Rotator;
    /// Horizontal field of view, degrees.
    fn fov_degrees(&self) -> f32;
}

/// State shared by rigid and skinned mesh components.
pub trait MeshComponent: SceneObject {
    /// Owner actor's world location.
    fn location(&self) -> Vec3;
    /// Owner actor's world rotation.
    fn rotation(&self) -> Rotator;
    /// Custom stencil value used as the segmentation label.
    fn stencil_value(&self) -> i32;
    /// Component-to-world transform.
    fn component_to_world(&self) -> Affine3A;
    /// Whether a mesh asset is assigned.
    fn has_mesh_asset(&self) -> bool;
}

/// Vertex positions of one LOD of a rigid mesh, indexed by vertex id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    /// Local-space positions.
    pub vertex_positions: Vec<Vec3>,
}

/// A rigid (static) mesh component.
pub trait RigidMeshComponent: MeshComponent {
    /// Mesh description at `lod`, or `None` when the LOD does not exist.
    fn mesh_description(&self, lod: u32) -> Option<MeshDescription>;
}

/// One bone's contribution to a skinned vertex.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneInfluence {
    /// Bone index into the reference skeleton.
    pub bone: u16,
    /// Normalised weight.
    pub weight: f32,
}

/// Influences of one vertex; four fit inline.
pub type SkinInfluences = SmallVec<[BoneInfluence; 4]>;

/// Render data of one skinned LOD.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinnedLodData {
    /// Reference-pose positions in component space, in vertex-buffer order.
    pub ref_positions: Vec<Vec3>,
    /// Triangle list into `ref_positions`.
    pub indices: Vec<u32>,
}

/// A skinned (skeletal) mesh component.
pub trait SkinnedMeshComponent: MeshComponent {
    /// Number of LODs of the assigned mesh.
    fn lod_count(&self) -> u32;
    /// Render data of `lod`.
    fn lod_render_data(&self, lod: u32) -> Option<SkinnedLodData>;
    /// Current reference-to-local bone matrices, one per bone.
    fn ref_to_local_matrices(&self) -> Vec<Mat4>;
    /// Skin weights of `lod`, one entry per vertex.
    fn skin_weight_buffer(&self, lod: u32) -> Option<Vec<SkinInfluences>>;
    /// Bone names in skeleton order.
    fn bone_names(&self) -> Vec<String>;
    /// Current world-space location of `bone`.
    fn bone_location(&self, bone: &str) -> Option<Vec3>;
}

/// Whether the sequence owns a binding's object or references a level object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// Spawned and destroyed by the sequence.
    Spawnable,
    /// Pre-placed in the level.
    Possessable,
}

/// One entry of the sequence's binding table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingInfo {
    /// Binding id, unique within the sequence.
    pub id: String,
    /// Display name, unique within the sequence.
    pub name: String,
    /// Binding flavour.
    pub kind: BindingKind,
}

/// A concrete object a binding resolves to, tagged by its dynamic kind.
#[derive(Clone)]
pub enum BoundObject {
    /// Camera actor.
    CameraActor(Arc<dyn CameraActor>),
    /// Skinned-mesh actor, represented by its mesh component.
    SkinnedMeshActor(Arc<dyn SkinnedMeshComponent>),
    /// Rigid-mesh actor, represented by its mesh component.
    RigidMeshActor(Arc<dyn RigidMeshComponent>),
    /// Skinned component bound without its actor.
    SkinnedComponent(Arc<dyn SkinnedMeshComponent>),
    /// Rigid component bound without its actor.
    RigidComponent(Arc<dyn RigidMeshComponent>),
    /// Anything else (lights, audio, ...).
    Other(String),
}

impl std::fmt::Debug for BoundObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, name) = match self {
            Self::CameraActor(c) => ("CameraActor", c.internal_name()),
            Self::SkinnedMeshActor(m) => ("SkinnedMeshActor", m.internal_name()),
            Self::RigidMeshActor(m) => ("RigidMeshActor", m.internal_name()),
            Self::SkinnedComponent(m) => ("SkinnedComponent", m.internal_name()),
            Self::RigidComponent(m) => ("RigidComponent", m.internal_name()),
            Self::Other(n) => ("Other", n.as_str()),
        };
        f.debug_tuple(kind).field(&name).finish()
    }
}

/// Read-only view of the cinematic sequence being rendered.
pub trait CinematicSequence: Send + Sync {
    /// Sequence asset name.
    fn name(&self) -> &str;
    /// Bindings the sequence spawns.
    fn spawnables(&self) -> Vec<BindingInfo>;
    /// Bindings to pre-placed level objects.
    fn possessables(&self) -> Vec<BindingInfo>;
    /// Playback range in display-rate frames.
    fn playback_range(&self) -> FrameRange;
    /// Objects bound to `binding` during `range`.
    fn bound_objects(&self, binding: &BindingInfo, range: FrameRange) -> Vec<BoundObject>;
}
