use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::annotate::reader::read_camera_record;
use crate::annotate::records::CameraRecord;
use crate::foundation::error::{AnnotateError, AnnotateResult};

/// JSON form of a camera sidecar, with the derived intrinsics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraDocument {
    /// World location `[x, y, z]`.
    pub location: [f32; 3],
    /// `[roll, pitch, yaw]` in degrees.
    pub rotation: [f32; 3],
    /// Horizontal field of view, degrees.
    pub fov: f32,
    /// `[width, height]` in pixels.
    pub resolution: [u32; 2],
    /// Pinhole intrinsics, row-major.
    #[serde(rename = "K")]
    pub k: [[f32; 3]; 3],
}

impl From<&CameraRecord> for CameraDocument {
    fn from(r: &CameraRecord) -> Self {
        Self {
            location: r.location.to_array(),
            rotation: [r.rotation.roll, r.rotation.pitch, r.rotation.yaw],
            fov: r.fov_degrees,
            resolution: [r.resolution.width, r.resolution.height],
            k: r.intrinsics(),
        }
    }
}

#[tracing::instrument(skip_all, fields(dir = %camera_dir.display()))]
/// Convert every `*.dat` directly inside `camera_dir` into a sibling `*.json`.
///
/// Only the first-frame records live at that level; per-frame folders are left alone.
/// Returns the written JSON paths in file-name order.
pub fn convert_camera_dir(camera_dir: &Path, remove_dat: bool) -> AnnotateResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(camera_dir).map_err(|e| {
        AnnotateError::sidecar(format!(
            "failed to list camera dir '{}': {e}",
            camera_dir.display()
        ))
    })?;

    let mut dats: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "dat"))
        .collect();
    dats.sort();

    let mut out = Vec::with_capacity(dats.len());
    for dat in dats {
        let record = read_camera_record(&dat)?;
        let doc = CameraDocument::from(&record);
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| AnnotateError::Other(anyhow::Error::new(e)))?;
        let target = dat.with_extension("json");
        std::fs::write(&target, json).map_err(|e| {
            AnnotateError::sidecar(format!("failed to write '{}': {e}", target.display()))
        })?;
        if remove_dat {
            std::fs::remove_file(&dat).map_err(|e| {
                AnnotateError::sidecar(format!("failed to remove '{}': {e}", dat.display()))
            })?;
        }
        out.push(target);
    }

    tracing::info!(converted = out.len(), "converted camera sidecars");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/convert.rs"]
mod tests;
