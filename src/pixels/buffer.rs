use half::f16;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::pipeline::frame::FrameOutputState;

/// 8-bit RGBA, straight alpha.
pub type Rgba8 = [u8; 4];
/// Half-float RGBA.
pub type RgbaF16 = [f16; 4];
/// Single-precision RGBA.
pub type RgbaF32 = [f32; 4];

/// Element type tag of a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelType {
    /// 8 bits per channel.
    Color8,
    /// 16-bit float per channel.
    Float16,
    /// 32-bit float per channel.
    Float32,
}

impl PixelType {
    /// Bits per channel.
    pub fn bit_depth(self) -> u32 {
        match self {
            Self::Color8 => 8,
            Self::Float16 => 16,
            Self::Float32 => 32,
        }
    }
}

/// One RGBA pixel of a concrete element type.
pub trait PixelElement: Copy + Send + Sync + 'static {
    /// Tag matching this element type.
    const TYPE: PixelType;

    /// Widen to normalized float RGBA.
    fn to_rgba_f32(self) -> RgbaF32;

    /// Narrow from float RGBA (8-bit clamps and rounds).
    fn from_rgba_f32(v: RgbaF32) -> Self;

    /// Straight-alpha "over": `src` on top of `dst`.
    fn over(dst: Self, src: Self) -> Self {
        let d = dst.to_rgba_f32();
        let s = src.to_rgba_f32();
        let sa = s[3].clamp(0.0, 1.0);
        let inv = 1.0 - sa;
        Self::from_rgba_f32([
            s[0] * sa + d[0] * inv,
            s[1] * sa + d[1] * inv,
            s[2] * sa + d[2] * inv,
            sa + d[3] * inv,
        ])
    }
}

impl PixelElement for Rgba8 {
    const TYPE: PixelType = PixelType::Color8;

    fn to_rgba_f32(self) -> RgbaF32 {
        self.map(|c| f32::from(c) / 255.0)
    }

    fn from_rgba_f32(v: RgbaF32) -> Self {
        v.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    fn over(dst: Self, src: Self) -> Self {
        crate::pixels::composite::over_rgba8(dst, src)
    }
}

impl PixelElement for RgbaF16 {
    const TYPE: PixelType = PixelType::Float16;

    fn to_rgba_f32(self) -> RgbaF32 {
        self.map(f16::to_f32)
    }

    fn from_rgba_f32(v: RgbaF32) -> Self {
        v.map(f16::from_f32)
    }
}

impl PixelElement for RgbaF32 {
    const TYPE: PixelType = PixelType::Float32;

    fn to_rgba_f32(self) -> RgbaF32 {
        self
    }

    fn from_rgba_f32(v: RgbaF32) -> Self {
        v
    }
}

/// Typed pixel storage with a row stride (in pixels, `stride >= width`).
#[derive(Clone, Debug, PartialEq)]
pub struct Plane<P> {
    width: u32,
    height: u32,
    stride: u32,
    pixels: Vec<P>,
}

impl<P: PixelElement> Plane<P> {
    /// Create a tightly packed plane.
    pub fn new(width: u32, height: u32, pixels: Vec<P>) -> AnnotateResult<Self> {
        Self::with_stride(width, height, width, pixels)
    }

    /// Create a plane whose rows are `stride` pixels apart.
    pub fn with_stride(width: u32, height: u32, stride: u32, pixels: Vec<P>) -> AnnotateResult<Self> {
        if stride < width {
            return Err(AnnotateError::codec(format!(
                "row stride {stride} is smaller than width {width}"
            )));
        }
        let expected = (stride as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| AnnotateError::codec("pixel buffer size overflow"))?;
        if pixels.len() != expected {
            return Err(AnnotateError::codec(format!(
                "pixel buffer holds {} pixels, expected {expected} ({stride}x{height})",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            pixels,
        })
    }

    /// Tightly packed plane whose length the caller already guarantees.
    pub(crate) fn from_packed(width: u32, height: u32, pixels: Vec<P>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            stride: width,
            pixels,
        }
    }

    /// Plane filled with a single pixel value.
    pub fn filled(width: u32, height: u32, px: P) -> Self {
        Self {
            width,
            height,
            stride: width,
            pixels: vec![px; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in pixels.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Borrow row `y` (exactly `width` pixels).
    pub fn row(&self, y: u32) -> &[P] {
        let start = y as usize * self.stride as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Mutably borrow row `y` (exactly `width` pixels).
    pub fn row_mut(&mut self, y: u32) -> &mut [P] {
        let start = y as usize * self.stride as usize;
        let width = self.width as usize;
        &mut self.pixels[start..start + width]
    }

    /// Pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> P {
        self.pixels[y as usize * self.stride as usize + x as usize]
    }

    /// Copy visible pixels into a tightly packed vector.
    pub fn to_packed(&self) -> Vec<P> {
        if self.stride == self.width {
            return self.pixels.clone();
        }
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }

    /// Convert every pixel to another element type (output is tightly packed).
    pub fn convert<Q: PixelElement>(&self) -> Plane<Q> {
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            pixels.extend(self.row(y).iter().map(|p| Q::from_rgba_f32(p.to_rgba_f32())));
        }
        Plane::from_packed(self.width, self.height, pixels)
    }
}

/// Element-typed storage of a [`PixelBuffer`].
#[derive(Clone, Debug, PartialEq)]
pub enum PixelData {
    /// 8-bit colour.
    Color8(Plane<Rgba8>),
    /// Half-float colour.
    Float16(Plane<RgbaF16>),
    /// Single-precision float colour.
    Float32(Plane<RgbaF32>),
}

impl PixelData {
    /// Element type tag.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            Self::Color8(_) => PixelType::Color8,
            Self::Float16(_) => PixelType::Float16,
            Self::Float32(_) => PixelType::Float32,
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Color8(p) => (p.width(), p.height()),
            Self::Float16(p) => (p.width(), p.height()),
            Self::Float32(p) => (p.width(), p.height()),
        }
    }

    /// Convert to a tightly packed plane of element type `P`.
    pub fn to_plane<P: PixelElement>(&self) -> Plane<P> {
        match self {
            Self::Color8(p) => p.convert(),
            Self::Float16(p) => p.convert(),
            Self::Float32(p) => p.convert(),
        }
    }
}

/// Frame bookkeeping carried by a sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleState {
    /// Output state of the frame this sample belongs to.
    pub output_state: FrameOutputState,
}

/// Per-buffer metadata travelling with the pixels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Sample bookkeeping (shot index, frame numbers, ...).
    pub sample_state: SampleState,
    /// The pass is only useful with an alpha channel; forces an alpha-capable codec.
    pub require_transparent: bool,
}

/// A render pass result: typed pixels plus payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    /// Pixel storage.
    pub data: PixelData,
    /// Metadata.
    pub payload: Payload,
}

impl PixelBuffer {
    /// Wrap pixel data and payload.
    pub fn new(data: PixelData, payload: Payload) -> Self {
        Self { data, payload }
    }

    /// Buffer of `pixel_type` filled with one normalized colour.
    pub fn solid(pixel_type: PixelType, width: u32, height: u32, rgba: RgbaF32, payload: Payload) -> Self {
        let data = match pixel_type {
            PixelType::Color8 => PixelData::Color8(Plane::filled(width, height, Rgba8::from_rgba_f32(rgba))),
            PixelType::Float16 => {
                PixelData::Float16(Plane::filled(width, height, RgbaF16::from_rgba_f32(rgba)))
            }
            PixelType::Float32 => PixelData::Float32(Plane::filled(width, height, rgba)),
        };
        Self { data, payload }
    }

    /// Element type tag.
    pub fn pixel_type(&self) -> PixelType {
        self.data.pixel_type()
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.data.dimensions().0
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.data.dimensions().1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/buffer.rs"]
mod tests;
