use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{FrameNumber, FrameRange};
use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::memory::objects::{StaticCamera, StaticRigidMesh, StaticSkinnedMesh};
use crate::scene::model::{
    BindingInfo, BindingKind, BoundObject, CinematicSequence, RigidMeshComponent,
    SkinnedMeshComponent,
};

/// A bound object as authored in a scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundObjectDef {
    /// Camera actor.
    CameraActor(StaticCamera),
    /// Skinned-mesh actor.
    SkinnedMeshActor(StaticSkinnedMesh),
    /// Rigid-mesh actor.
    RigidMeshActor(StaticRigidMesh),
    /// Standalone skinned component.
    SkinnedComponent(StaticSkinnedMesh),
    /// Standalone rigid component.
    RigidComponent(StaticRigidMesh),
    /// The skinned component of another binding's actor.
    SkinnedComponentOf {
        /// Binding whose actor owns the component.
        binding: String,
    },
    /// The rigid component of another binding's actor.
    RigidComponentOf {
        /// Binding whose actor owns the component.
        binding: String,
    },
    /// Unsupported object.
    Other {
        /// Object class name.
        class: String,
    },
}

/// One binding as authored in a scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingDef {
    /// Display name.
    pub name: String,
    /// Binding flavour.
    #[serde(default = "spawnable")]
    pub kind: BindingKind,
    /// Objects bound over the playback range.
    #[serde(default)]
    pub objects: Vec<BoundObjectDef>,
}

fn spawnable() -> BindingKind {
    BindingKind::Spawnable
}

/// A whole scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    /// Sequence name.
    pub sequence_name: String,
    /// Level name.
    #[serde(default)]
    pub level_name: String,
    /// Playback range start (inclusive).
    #[serde(default)]
    pub start_frame: i32,
    /// Playback range end (exclusive).
    pub end_frame: i32,
    /// Binding table.
    #[serde(default)]
    pub bindings: Vec<BindingDef>,
}

/// A [`CinematicSequence`] whose bindings resolve to fixed in-memory objects.
///
/// Objects are created once, so repeated lookups return the same handles.
#[derive(Clone, Debug)]
pub struct InMemorySequence {
    name: String,
    level_name: String,
    range: FrameRange,
    bindings: Vec<(BindingInfo, Vec<BoundObject>)>,
}

impl InMemorySequence {
    /// Empty sequence over `[start, end)`.
    pub fn new(name: impl Into<String>, start: i32, end: i32) -> AnnotateResult<Self> {
        Ok(Self {
            name: name.into(),
            level_name: String::new(),
            range: FrameRange::new(FrameNumber(start), FrameNumber(end))?,
            bindings: Vec::new(),
        })
    }

    /// Append a binding.
    pub fn with_binding(
        mut self,
        name: impl Into<String>,
        kind: BindingKind,
        objects: Vec<BoundObject>,
    ) -> Self {
        let name = name.into();
        let info = BindingInfo {
            id: format!("{:08x}", self.bindings.len()),
            name,
            kind,
        };
        self.bindings.push((info, objects));
        self
    }

    /// Level the scene was authored in.
    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    /// Build from a parsed scene file.
    pub fn from_def(def: SceneDef) -> AnnotateResult<Self> {
        let mut seq = Self::new(def.sequence_name, def.start_frame, def.end_frame)?;
        seq.level_name = def.level_name;

        let mut skinned_by_binding = BTreeMap::<String, Arc<dyn SkinnedMeshComponent>>::new();
        let mut rigid_by_binding = BTreeMap::<String, Arc<dyn RigidMeshComponent>>::new();
        let mut deferred = Vec::new();

        for (bi, b) in def.bindings.into_iter().enumerate() {
            let mut objects = Vec::with_capacity(b.objects.len());
            for obj in b.objects {
                let bound = match obj {
                    BoundObjectDef::CameraActor(c) => BoundObject::CameraActor(Arc::new(c)),
                    BoundObjectDef::SkinnedMeshActor(m) => {
                        let m: Arc<dyn SkinnedMeshComponent> = Arc::new(m);
                        skinned_by_binding.insert(b.name.clone(), Arc::clone(&m));
                        BoundObject::SkinnedMeshActor(m)
                    }
                    BoundObjectDef::RigidMeshActor(m) => {
                        let m: Arc<dyn RigidMeshComponent> = Arc::new(m);
                        rigid_by_binding.insert(b.name.clone(), Arc::clone(&m));
                        BoundObject::RigidMeshActor(m)
                    }
                    BoundObjectDef::SkinnedComponent(m) => BoundObject::SkinnedComponent(Arc::new(m)),
                    BoundObjectDef::RigidComponent(m) => BoundObject::RigidComponent(Arc::new(m)),
                    BoundObjectDef::Other { class } => BoundObject::Other(class),
                    reference @ (BoundObjectDef::SkinnedComponentOf { .. }
                    | BoundObjectDef::RigidComponentOf { .. }) => {
                        deferred.push((bi, objects.len(), reference));
                        BoundObject::Other("unresolved".to_owned())
                    }
                };
                objects.push(bound);
            }
            seq = seq.with_binding(b.name, b.kind, objects);
        }

        for (bi, oi, reference) in deferred {
            let resolved = match &reference {
                BoundObjectDef::SkinnedComponentOf { binding } => skinned_by_binding
                    .get(binding)
                    .map(|m| BoundObject::SkinnedComponent(Arc::clone(m))),
                BoundObjectDef::RigidComponentOf { binding } => rigid_by_binding
                    .get(binding)
                    .map(|m| BoundObject::RigidComponent(Arc::clone(m))),
                _ => None,
            };
            let resolved = resolved.ok_or_else(|| {
                AnnotateError::config(format!("{reference:?} names no mesh actor binding"))
            })?;
            seq.bindings[bi].1[oi] = resolved;
        }
        Ok(seq)
    }

    /// Parse a scene JSON document.
    pub fn from_json_str(s: &str) -> AnnotateResult<Self> {
        let def: SceneDef = serde_json::from_str(s).context("parse scene JSON")?;
        Self::from_def(def)
    }

    /// Load a scene JSON file.
    pub fn load(path: &Path) -> AnnotateResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

impl CinematicSequence for InMemorySequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn spawnables(&self) -> Vec<BindingInfo> {
        self.bindings
            .iter()
            .filter(|(b, _)| b.kind == BindingKind::Spawnable)
            .map(|(b, _)| b.clone())
            .collect()
    }

    fn possessables(&self) -> Vec<BindingInfo> {
        self.bindings
            .iter()
            .filter(|(b, _)| b.kind == BindingKind::Possessable)
            .map(|(b, _)| b.clone())
            .collect()
    }

    fn playback_range(&self) -> FrameRange {
        self.range
    }

    fn bound_objects(&self, binding: &BindingInfo, _range: FrameRange) -> Vec<BoundObject> {
        self.bindings
            .iter()
            .find(|(b, _)| b.id == binding.id)
            .map(|(_, objs)| objs.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/memory/sequence.rs"]
mod tests;
