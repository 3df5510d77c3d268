//! Per-frame annotation sidecars: camera parameters, actor info, vertices and skeletons.
//!
//! On-disk layout under the output root (frame numbers zero-padded to four digits):
//!
//! ```text
//! {camera_dir}/{camera}.dat             9 x f32, first frame
//! {camera_dir}/{camera}/{NNNN}.dat      9 x f32
//! {actor_dir}/{mesh}.dat                1 x f32 stencil id, first frame
//! {actor_dir}/{mesh}/{NNNN}.dat         7 x f32
//! {vertices_dir}/{mesh}/{NNNN}.dat      3N x f32
//! {skeleton_dir}/{mesh}/{NNNN}.dat      3M x f32
//! {skeleton_dir}/{mesh}_BoneName.txt    M lines
//! ```
//!
//! All floats are little-endian.

pub(crate) mod convert;
pub(crate) mod exporter;
pub(crate) mod layout;
pub(crate) mod reader;
pub(crate) mod records;

pub use convert::{CameraDocument, convert_camera_dir};
pub use exporter::{AnnotationExporter, ExportStats};
pub use layout::SidecarLayout;
pub use reader::{
    read_actor_info, read_bone_names, read_camera_record, read_float_array, read_stencil_id,
};
pub use records::{ActorInfoRecord, BoneNameTable, CameraRecord, MeshGeometryRecord};
