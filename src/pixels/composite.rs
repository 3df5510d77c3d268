use std::marker::PhantomData;

use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::foundation::math::mul_div255_u8;
use crate::pixels::buffer::{
    PixelBuffer, PixelData, PixelElement, PixelType, Plane, Rgba8, RgbaF16, RgbaF32,
};

/// Straight-alpha 8-bit "over" of `src` onto `dst`.
pub(crate) fn over_rgba8(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let sa = u16::from(sa);
    let inv = 255u16 - sa;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), sa);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// An overlay composited on top of a target plane of element type `P`.
///
/// The overlay is converted to `P` once, up front, so applying it to many
/// targets is a straight per-pixel blend.
#[derive(Clone, Debug)]
pub struct CompositeImage<P: PixelElement> {
    overlay: Plane<P>,
    _marker: PhantomData<P>,
}

impl<P: PixelElement> CompositeImage<P> {
    /// Convert `overlay` to the target element type.
    pub fn new(overlay: &PixelBuffer) -> Self {
        Self {
            overlay: overlay.data.to_plane::<P>(),
            _marker: PhantomData,
        }
    }

    /// Converted overlay.
    pub fn overlay(&self) -> &Plane<P> {
        &self.overlay
    }

    /// Blend the overlay over `target` in place.
    pub fn apply(&self, target: &mut Plane<P>) -> AnnotateResult<()> {
        if target.width() != self.overlay.width() || target.height() != self.overlay.height() {
            return Err(AnnotateError::codec(format!(
                "composite overlay is {}x{}, target is {}x{}",
                self.overlay.width(),
                self.overlay.height(),
                target.width(),
                target.height()
            )));
        }
        for y in 0..target.height() {
            let src = self.overlay.row(y);
            for (d, s) in target.row_mut(y).iter_mut().zip(src) {
                *d = P::over(*d, *s);
            }
        }
        Ok(())
    }
}

/// Pixel pre-processor attached to an image write task.
#[derive(Clone, Debug)]
pub enum PixelPreProcessor {
    /// Composite onto an 8-bit target.
    CompositeColor8(CompositeImage<Rgba8>),
    /// Composite onto a half-float target.
    CompositeFloat16(CompositeImage<RgbaF16>),
    /// Composite onto a single-precision target.
    CompositeFloat32(CompositeImage<RgbaF32>),
}

impl PixelPreProcessor {
    /// Composite pre-processor whose element type matches `target`.
    pub fn composite_for(target: PixelType, overlay: &PixelBuffer) -> Self {
        match target {
            PixelType::Color8 => Self::CompositeColor8(CompositeImage::new(overlay)),
            PixelType::Float16 => Self::CompositeFloat16(CompositeImage::new(overlay)),
            PixelType::Float32 => Self::CompositeFloat32(CompositeImage::new(overlay)),
        }
    }

    /// Element type this pre-processor operates on.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            Self::CompositeColor8(_) => PixelType::Color8,
            Self::CompositeFloat16(_) => PixelType::Float16,
            Self::CompositeFloat32(_) => PixelType::Float32,
        }
    }

    /// Run on `target`; element types must match.
    pub fn apply(&self, target: &mut PixelBuffer) -> AnnotateResult<()> {
        match (self, &mut target.data) {
            (Self::CompositeColor8(c), PixelData::Color8(p)) => c.apply(p),
            (Self::CompositeFloat16(c), PixelData::Float16(p)) => c.apply(p),
            (Self::CompositeFloat32(c), PixelData::Float32(p)) => c.apply(p),
            (pre, data) => Err(AnnotateError::codec(format!(
                "{:?} pre-processor cannot run on {:?} pixels",
                pre.pixel_type(),
                data.pixel_type()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/composite.rs"]
mod tests;
