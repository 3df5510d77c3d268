//! In-memory implementations of every host collaborator.
//!
//! They deserialize from JSON so whole scenes can be replayed offline, and they back the test
//! suite.

pub(crate) mod host;
pub(crate) mod objects;
pub(crate) mod queue;
pub(crate) mod sequence;

pub use host::InMemoryHost;
pub use objects::{StaticBone, StaticCamera, StaticRigidMesh, StaticSkinnedLod, StaticSkinnedMesh};
pub use queue::RecordingQueue;
pub use sequence::{BindingDef, BoundObjectDef, InMemorySequence, SceneDef};
