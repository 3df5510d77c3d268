use glam::{Mat4, Vec3};
use rayon::prelude::*;

use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::scene::model::{RigidMeshComponent, SkinInfluences, SkinnedMeshComponent};

/// Extracts world-space geometry from mesh components.
///
/// Every operation returns a [`AnnotateError::Sampling`] on failure and never panics; the
/// caller decides whether to skip the object.
#[derive(Debug, Default)]
pub struct MeshSampler;

impl MeshSampler {
    /// World-space vertex positions of a rigid mesh at `lod`, in vertex-id order.
    pub fn rigid_vertices_at_lod(
        component: &dyn RigidMeshComponent,
        lod: u32,
    ) -> AnnotateResult<Vec<Vec3>> {
        if !component.has_mesh_asset() {
            return Err(AnnotateError::sampling(format!(
                "'{}' has no mesh asset",
                component.internal_name()
            )));
        }
        let desc = component.mesh_description(lod).ok_or_else(|| {
            AnnotateError::sampling(format!(
                "'{}' has no LOD {lod}",
                component.internal_name()
            ))
        })?;
        let xf = component.component_to_world();
        Ok(desc
            .vertex_positions
            .iter()
            .map(|&p| xf.transform_point3(p))
            .collect())
    }

    /// World-space skinned vertex positions at `lod`, in vertex-buffer order.
    pub fn skinned_vertices_at_lod(
        component: &dyn SkinnedMeshComponent,
        lod: u32,
    ) -> AnnotateResult<Vec<Vec3>> {
        let name = component.internal_name();
        if !component.has_mesh_asset() {
            return Err(AnnotateError::sampling(format!("'{name}' has no mesh asset")));
        }
        let lod_count = component.lod_count();
        if lod >= lod_count {
            return Err(AnnotateError::sampling(format!(
                "'{name}': LOD {lod} out of range ({lod_count} LODs)"
            )));
        }
        let data = component
            .lod_render_data(lod)
            .ok_or_else(|| AnnotateError::sampling(format!("'{name}': no render data for LOD {lod}")))?;
        let weights = component
            .skin_weight_buffer(lod)
            .ok_or_else(|| AnnotateError::sampling(format!("'{name}': no skin weights for LOD {lod}")))?;
        let bones = component.ref_to_local_matrices();

        let skinned = compute_skinned_positions(&bones, &data.ref_positions, &weights)?;
        let xf = component.component_to_world();
        Ok(skinned
            .into_iter()
            .map(|p| xf.transform_point3(p))
            .collect())
    }

    /// Current world-space bone positions and their names, in skeleton order.
    pub fn bone_positions(
        component: &dyn SkinnedMeshComponent,
    ) -> AnnotateResult<(Vec<Vec3>, Vec<String>)> {
        if !component.has_mesh_asset() {
            return Err(AnnotateError::sampling(format!(
                "'{}' has no mesh asset",
                component.internal_name()
            )));
        }
        let names = component.bone_names();
        let mut positions = Vec::with_capacity(names.len());
        for bone in &names {
            let p = component.bone_location(bone).ok_or_else(|| {
                AnnotateError::sampling(format!(
                    "'{}': bone '{bone}' has no location",
                    component.internal_name()
                ))
            })?;
            positions.push(p);
        }
        Ok((positions, names))
    }

    /// Centres of the triangles at `lod` whose world normal faces `camera_forward`.
    ///
    /// Not used by the annotation path.
    #[cfg(feature = "experimental-face-centers")]
    pub fn skinned_face_centers_at_lod(
        component: &dyn SkinnedMeshComponent,
        lod: u32,
        camera_forward: Vec3,
    ) -> AnnotateResult<Vec<Vec3>> {
        let positions = Self::skinned_vertices_at_lod(component, lod)?;
        let data = component.lod_render_data(lod).ok_or_else(|| {
            AnnotateError::sampling(format!(
                "'{}': no render data for LOD {lod}",
                component.internal_name()
            ))
        })?;
        let mut out = Vec::with_capacity(data.indices.len() / 3);
        for tri in data.indices.chunks_exact(3) {
            let fetch = |i: u32| {
                positions.get(i as usize).copied().ok_or_else(|| {
                    AnnotateError::sampling(format!("index {i} outside {} vertices", positions.len()))
                })
            };
            let (p1, p2, p3) = (fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?);
            let normal = (p1 - p3).cross(p2 - p1);
            if camera_forward.dot(normal) < 0.0 {
                out.push((p1 + p2 + p3) / 3.0);
            }
        }
        Ok(out)
    }
}

/// Linear-blend skinning of reference-pose positions.
///
/// Vertices without influences keep their reference position.
pub(crate) fn compute_skinned_positions(
    bones: &[Mat4],
    ref_positions: &[Vec3],
    weights: &[SkinInfluences],
) -> AnnotateResult<Vec<Vec3>> {
    if weights.len() != ref_positions.len() {
        return Err(AnnotateError::sampling(format!(
            "skin weight buffer has {} entries for {} vertices",
            weights.len(),
            ref_positions.len()
        )));
    }
    ref_positions
        .par_iter()
        .zip(weights.par_iter())
        .map(|(&p, influences)| {
            if influences.is_empty() {
                return Ok(p);
            }
            let mut acc = Vec3::ZERO;
            for inf in influences {
                let m = bones.get(usize::from(inf.bone)).ok_or_else(|| {
                    AnnotateError::sampling(format!(
                        "bone index {} outside {} bones",
                        inf.bone,
                        bones.len()
                    ))
                })?;
                acc += m.transform_point3(p) * inf.weight;
            }
            Ok(acc)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/sampler.rs"]
mod tests;
