use std::path::Path;

use crate::annotate::records::{ActorInfoRecord, BoneNameTable, CameraRecord};
use crate::foundation::error::{AnnotateError, AnnotateResult};

/// Read a little-endian `f32` array sidecar.
pub fn read_float_array(path: &Path) -> AnnotateResult<Vec<f32>> {
    let bytes = std::fs::read(path)
        .map_err(|e| AnnotateError::sidecar(format!("failed to read '{}': {e}", path.display())))?;
    if !bytes.len().is_multiple_of(4) {
        return Err(AnnotateError::sidecar(format!(
            "'{}' is {} bytes, not a whole number of floats",
            path.display(),
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Read a 9-float camera record.
pub fn read_camera_record(path: &Path) -> AnnotateResult<CameraRecord> {
    CameraRecord::from_floats(&read_float_array(path)?)
}

/// Read a 7-float actor info record.
pub fn read_actor_info(path: &Path) -> AnnotateResult<ActorInfoRecord> {
    ActorInfoRecord::from_floats(&read_float_array(path)?)
}

/// Read a first-frame stencil id sidecar (one float).
pub fn read_stencil_id(path: &Path) -> AnnotateResult<i32> {
    match read_float_array(path)?.as_slice() {
        [v] => Ok(*v as i32),
        other => Err(AnnotateError::sidecar(format!(
            "stencil sidecar '{}' holds {} floats, expected 1",
            path.display(),
            other.len()
        ))),
    }
}

/// Read a `_BoneName.txt` table.
pub fn read_bone_names(path: &Path) -> AnnotateResult<BoneNameTable> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AnnotateError::sidecar(format!("failed to read '{}': {e}", path.display())))?;
    Ok(BoneNameTable {
        names: text.lines().map(str::to_owned).collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/reader.rs"]
mod tests;
