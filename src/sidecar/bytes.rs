use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::foundation::error::{AnnotateError, AnnotateResult};

/// Create every missing directory above `path`.
pub fn ensure_parent_dir(path: &Path) -> AnnotateResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            AnnotateError::sidecar(format!(
                "failed to create sidecar directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Write a single `f32` (4 bytes).
pub fn write_float(value: f32, path: &Path) -> AnnotateResult<()> {
    write_float_array(&[value], path)
}

/// Write `values` as raw `4 * values.len()` bytes.
pub fn write_float_array(values: &[f32], path: &Path) -> AnnotateResult<()> {
    ensure_parent_dir(path)?;

    let mut bytes = Vec::<u8>::with_capacity(values.len() * 4);
    for &v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    std::fs::write(path, bytes).map_err(|e| {
        AnnotateError::sidecar(format!(
            "failed to write float sidecar '{}': {e}",
            path.display()
        ))
    })
}

/// Write one UTF-8 line per entry, each terminated by `\n`.
pub fn write_string_lines<S: AsRef<str>>(lines: &[S], path: &Path) -> AnnotateResult<()> {
    ensure_parent_dir(path)?;

    let map_err = |e: std::io::Error| {
        AnnotateError::sidecar(format!(
            "failed to write text sidecar '{}': {e}",
            path.display()
        ))
    };
    let file = File::create(path).map_err(map_err)?;
    let mut w = BufWriter::new(file);
    for line in lines {
        w.write_all(line.as_ref().as_bytes()).map_err(map_err)?;
        w.write_all(b"\n").map_err(map_err)?;
    }
    w.flush().map_err(map_err)
}

#[cfg(test)]
#[path = "../../tests/unit/sidecar/bytes.rs"]
mod tests;
