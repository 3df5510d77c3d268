use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::scene::model::{
    BindingInfo, BoundObject, CameraActor, CinematicSequence, RigidMeshComponent, SceneObject,
    SkinnedMeshComponent,
};
use crate::sidecar::write_string_lines;

/// Name prefixes the engine gives actors a sequence spawns.
pub const SYNTHETIC_NAME_PREFIXES: [&str; 4] =
    ["SkeletalMesh", "StaticMesh", "CameraActor", "CineCameraActor"];

/// Name used in sidecar paths: the label for sequence-spawned actors, else the internal name.
pub fn export_name(obj: &dyn SceneObject) -> String {
    let internal = obj.internal_name();
    let synthetic = SYNTHETIC_NAME_PREFIXES
        .iter()
        .any(|p| internal.starts_with(p));
    if synthetic && !obj.label().is_empty() {
        obj.label().to_owned()
    } else {
        internal.to_owned()
    }
}

/// One resolved object of the sequence.
pub struct SceneBinding<T: ?Sized> {
    /// Binding display name.
    pub name: String,
    /// Object name used in sidecar paths; fixed for the whole render.
    pub export_name: String,
    /// Live scene object.
    pub handle: Arc<T>,
}

impl<T: ?Sized> Clone for SceneBinding<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            export_name: self.export_name.clone(),
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for SceneBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneBinding")
            .field("name", &self.name)
            .field("export_name", &self.export_name)
            .finish_non_exhaustive()
    }
}

/// Bound objects of a sequence, each collection keyed by binding display name.
#[derive(Clone, Debug, Default)]
pub struct SceneBindings {
    /// Cameras.
    pub cameras: BTreeMap<String, SceneBinding<dyn CameraActor>>,
    /// Rigid mesh components.
    pub rigid_meshes: BTreeMap<String, SceneBinding<dyn RigidMeshComponent>>,
    /// Skinned mesh components.
    pub skinned_meshes: BTreeMap<String, SceneBinding<dyn SkinnedMeshComponent>>,
}

impl SceneBindings {
    /// Total number of resolved objects.
    pub fn len(&self) -> usize {
        self.cameras.len() + self.rigid_meshes.len() + self.skinned_meshes.len()
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walks a sequence's binding table once and classifies what each binding resolves to.
#[derive(Debug, Default)]
pub struct BindingResolver;

impl BindingResolver {
    #[tracing::instrument(skip_all, fields(sequence = sequence.name()))]
    /// Resolve every spawnable and possessable binding over the playback range.
    pub fn resolve(sequence: &dyn CinematicSequence) -> SceneBindings {
        let mut table = BTreeMap::<String, BindingInfo>::new();
        for b in sequence.spawnables().into_iter().chain(sequence.possessables()) {
            table.insert(b.name.clone(), b);
        }

        let range = sequence.playback_range();
        let mut out = SceneBindings::default();
        for (name, binding) in &table {
            let objects = sequence.bound_objects(binding, range);
            if objects.is_empty() {
                tracing::debug!(binding = %name, "binding resolves to no objects");
            }
            for obj in objects {
                classify(&mut out, name, obj);
            }
        }
        dedupe_export_names(&mut out);

        tracing::info!(
            cameras = out.cameras.len(),
            rigid_meshes = out.rigid_meshes.len(),
            skinned_meshes = out.skinned_meshes.len(),
            "resolved sequence bindings"
        );
        out
    }

    /// Write `{skeleton_dir}/{mesh}_BoneName.txt` for every skinned mesh; returns files written.
    pub fn write_bone_name_tables(bindings: &SceneBindings, skeleton_dir: &Path) -> usize {
        let mut written = 0;
        for b in bindings.skinned_meshes.values() {
            let names = b.handle.bone_names();
            let path = skeleton_dir.join(format!("{}_BoneName.txt", b.export_name));
            match write_string_lines(&names, &path) {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!(mesh = %b.export_name, error = %e, "skipping bone name table"),
            }
        }
        written
    }
}

fn classify(out: &mut SceneBindings, name: &str, obj: BoundObject) {
    match obj {
        BoundObject::CameraActor(c) => insert_unique(&mut out.cameras, name, c, |c| export_name(c)),
        BoundObject::SkinnedMeshActor(m) | BoundObject::SkinnedComponent(m) => {
            insert_unique(&mut out.skinned_meshes, name, m, |m| export_name(m))
        }
        BoundObject::RigidMeshActor(m) | BoundObject::RigidComponent(m) => {
            insert_unique(&mut out.rigid_meshes, name, m, |m| export_name(m))
        }
        BoundObject::Other(kind) => {
            tracing::debug!(binding = %name, %kind, "ignoring unsupported bound object");
        }
    }
}

// First object per binding name wins; a handle already bound elsewhere is skipped.
fn insert_unique<T: ?Sized>(
    map: &mut BTreeMap<String, SceneBinding<T>>,
    name: &str,
    handle: Arc<T>,
    export: impl FnOnce(&T) -> String,
) {
    if map.contains_key(name) {
        return;
    }
    if let Some(existing) = map.values().find(|b| Arc::ptr_eq(&b.handle, &handle)) {
        tracing::debug!(
            binding = %name,
            already = %existing.name,
            "object already bound, skipping"
        );
        return;
    }
    let export_name = export(handle.as_ref());
    map.insert(
        name.to_owned(),
        SceneBinding {
            name: name.to_owned(),
            export_name,
            handle,
        },
    );
}

// Sidecar paths must be injective per object: on a clash, the later binding
// (in name order) falls back to its binding name, then to `{name}_{n}`.
fn dedupe_export_names(out: &mut SceneBindings) {
    fn fix<T: ?Sized>(map: &mut BTreeMap<String, SceneBinding<T>>, taken: &mut HashSet<String>) {
        for b in map.values_mut() {
            if taken.contains(&b.export_name) {
                let mut candidate = b.name.clone();
                let mut n = 1;
                while taken.contains(&candidate) {
                    candidate = format!("{}_{n}", b.name);
                    n += 1;
                }
                tracing::warn!(
                    binding = %b.name,
                    export_name = %b.export_name,
                    fallback = %candidate,
                    "duplicate export name"
                );
                b.export_name = candidate;
            }
            taken.insert(b.export_name.clone());
        }
    }
    let mut cams = HashSet::new();
    fix(&mut out.cameras, &mut cams);
    // Rigid and skinned meshes share the actor-info directory.
    let mut meshes = HashSet::new();
    fix(&mut out.rigid_meshes, &mut meshes);
    fix(&mut out.skinned_meshes, &mut meshes);
}

#[cfg(test)]
#[path = "../../tests/unit/scene/binding.rs"]
mod tests;
