//! Byte sinks for annotation sidecars.
//!
//! Every sink creates missing parent directories and truncates an existing file. Floats are
//! written little-endian regardless of host byte order.

pub(crate) mod bytes;

pub use bytes::{ensure_parent_dir, write_float, write_float_array, write_string_lines};
