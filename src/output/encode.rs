use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb, Rgba};

use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::output::codec::ImageCodec;
use crate::output::task::ImageWriteTask;
use crate::pixels::buffer::{PixelBuffer, PixelData, RgbaF32};
use crate::sidecar::ensure_parent_dir;

/// Apply pre-processors then encode; returns the written path.
pub fn run_write_task(task: ImageWriteTask) -> AnnotateResult<PathBuf> {
    let ImageWriteTask {
        output_path,
        format,
        compression_quality,
        mut pixel_data,
        pre_processors,
    } = task;
    for pre in &pre_processors {
        pre.apply(&mut pixel_data)?;
    }
    ensure_parent_dir(&output_path)?;
    encode_to_file(&pixel_data, format, compression_quality, &output_path)?;
    Ok(output_path)
}

/// Encode `buf` with `codec` to `path`.
///
/// 8-bit codecs need `Color8` data; EXR accepts any element type and stores 32-bit floats.
pub fn encode_to_file(
    buf: &PixelBuffer,
    codec: ImageCodec,
    quality: u8,
    path: &Path,
) -> AnnotateResult<()> {
    let (w, h) = (buf.width(), buf.height());
    match codec {
        ImageCodec::Png | ImageCodec::Bmp => {
            let bytes = color8_bytes(buf, codec)?;
            let img = ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, bytes)
                .ok_or_else(|| AnnotateError::codec("rgba8 buffer does not match its dimensions"))?;
            img.save_with_format(path, codec.image_format())
                .map_err(|e| encode_err(path, e))
        }
        ImageCodec::Jpeg => {
            let bytes = color8_bytes(buf, codec)?;
            let rgb: Vec<u8> = bytes
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let img = ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, rgb)
                .ok_or_else(|| AnnotateError::codec("rgb8 buffer does not match its dimensions"))?;
            let file = File::create(path).map_err(|e| encode_err(path, e))?;
            let mut out = BufWriter::new(file);
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                .encode_image(&img)
                .map_err(|e| encode_err(path, e))
        }
        ImageCodec::Exr => {
            let plane = buf.data.to_plane::<RgbaF32>();
            let floats: Vec<f32> = plane.to_packed().into_iter().flatten().collect();
            let img = ImageBuffer::<Rgba<f32>, _>::from_raw(w, h, floats)
                .ok_or_else(|| AnnotateError::codec("rgba32f buffer does not match its dimensions"))?;
            img.save_with_format(path, codec.image_format())
                .map_err(|e| encode_err(path, e))
        }
    }
}

fn color8_bytes(buf: &PixelBuffer, codec: ImageCodec) -> AnnotateResult<Vec<u8>> {
    match &buf.data {
        PixelData::Color8(p) => Ok(p.to_packed().into_iter().flatten().collect()),
        other => Err(AnnotateError::codec(format!(
            "{} needs 8-bit pixels, got {:?}",
            codec.extension(),
            other.pixel_type()
        ))),
    }
}

fn encode_err(path: &Path, e: impl std::fmt::Display) -> AnnotateError {
    AnnotateError::codec(format!("write '{}': {e}", path.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/output/encode.rs"]
mod tests;
