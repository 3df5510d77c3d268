use std::path::PathBuf;

use crate::output::codec::ImageCodec;
use crate::pixels::buffer::PixelBuffer;
use crate::pixels::composite::PixelPreProcessor;

/// One image to encode and write, owned by the write queue once enqueued.
#[derive(Clone, Debug)]
pub struct ImageWriteTask {
    /// Absolute destination path.
    pub output_path: PathBuf,
    /// Codec to encode with.
    pub format: ImageCodec,
    /// Quality in `[0, 100]`; only lossy codecs use it.
    pub compression_quality: u8,
    /// Pixels to write.
    pub pixel_data: PixelBuffer,
    /// Run in order on `pixel_data` before encoding.
    pub pre_processors: Vec<PixelPreProcessor>,
}

impl ImageWriteTask {
    /// Task at full quality with no pre-processors.
    pub fn new(output_path: impl Into<PathBuf>, format: ImageCodec, pixel_data: PixelBuffer) -> Self {
        Self {
            output_path: output_path.into(),
            format,
            compression_quality: 100,
            pixel_data,
            pre_processors: Vec::new(),
        }
    }
}
