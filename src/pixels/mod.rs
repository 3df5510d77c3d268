//! Tagged pixel buffers, 8-bit quantisation and overlay compositing.

pub(crate) mod buffer;
pub(crate) mod composite;
pub(crate) mod quantize;

pub use buffer::{
    Payload, PixelBuffer, PixelData, PixelElement, PixelType, Plane, Rgba8, RgbaF16, RgbaF32,
    SampleState,
};
pub use composite::{CompositeImage, PixelPreProcessor};
pub use quantize::quantize_to_bit_depth;
