//! Scene collaborators: the cinematic sequence, its bound objects, and mesh sampling.

pub(crate) mod binding;
pub(crate) mod model;
pub(crate) mod sampler;

pub use binding::{BindingResolver, SYNTHETIC_NAME_PREFIXES, SceneBinding, SceneBindings, export_name};
pub use model::{
    BindingInfo, BindingKind, BoneInfluence, BoundObject, CameraActor, CinematicSequence,
    MeshComponent, MeshDescription, RigidMeshComponent, SceneObject, SkinInfluences,
    SkinnedLodData, SkinnedMeshComponent,
};
pub use sampler::MeshSampler;
