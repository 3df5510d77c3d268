use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::foundation::math::dither_noise;
use crate::pixels::buffer::{PixelBuffer, PixelData, PixelElement, Plane, Rgba8};

/// Convert `src` to the element type with `bit_depth` bits per channel.
///
/// Converting to 8 bits clamps to `[0, 1]` and rounds; with `dither` on, colour
/// channels get deterministic triangular noise of at most half an LSB before
/// rounding. Alpha is never dithered. 16 and 32 convert to the float types.
pub fn quantize_to_bit_depth(
    src: &PixelBuffer,
    bit_depth: u32,
    dither: bool,
) -> AnnotateResult<PixelBuffer> {
    let data = match bit_depth {
        8 => PixelData::Color8(match &src.data {
            PixelData::Color8(p) => Plane::new(p.width(), p.height(), p.to_packed())?,
            PixelData::Float16(p) => quantize_plane(p, dither),
            PixelData::Float32(p) => quantize_plane(p, dither),
        }),
        16 => PixelData::Float16(src.data.to_plane()),
        32 => PixelData::Float32(src.data.to_plane()),
        other => {
            return Err(AnnotateError::codec(format!(
                "unsupported quantisation bit depth {other}"
            )));
        }
    };
    Ok(PixelBuffer::new(data, src.payload.clone()))
}

fn quantize_plane<P: PixelElement>(src: &Plane<P>, dither: bool) -> Plane<Rgba8> {
    let mut out = Vec::with_capacity(src.width() as usize * src.height() as usize);
    for y in 0..src.height() {
        for (x, px) in src.row(y).iter().enumerate() {
            let v = px.to_rgba_f32();
            let x = x as u32;
            let mut q = [0u8; 4];
            for (c, slot) in q.iter_mut().enumerate() {
                let mut s = v[c].clamp(0.0, 1.0) * 255.0;
                if dither && c < 3 {
                    s += dither_noise(x, y, c as u32);
                }
                *slot = s.round().clamp(0.0, 255.0) as u8;
            }
            out.push(q);
        }
    }
    Plane::from_packed(src.width(), src.height(), out)
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/quantize.rs"]
mod tests;
