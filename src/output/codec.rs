use serde::{Deserialize, Serialize};

/// Image codec an output pass is written with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCodec {
    /// Lossless 8-bit with alpha.
    #[default]
    #[serde(alias = "PNG")]
    Png,
    /// Lossy 8-bit, no alpha.
    #[serde(alias = "JPEG", alias = "jpg")]
    Jpeg,
    /// Uncompressed 8-bit, no alpha.
    #[serde(alias = "BMP")]
    Bmp,
    /// OpenEXR float with alpha.
    #[serde(alias = "EXR")]
    Exr,
}

impl ImageCodec {
    /// File extension (no leading dot) used for `{ext}`.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Exr => "exr",
        }
    }

    /// Parse a file extension; `jpg` is accepted for JPEG.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "exr" => Some(Self::Exr),
            _ => None,
        }
    }

    /// Whether the codec stores an alpha channel.
    pub fn supports_alpha(self) -> bool {
        matches!(self, Self::Png | Self::Exr)
    }

    /// Whether pixels must be quantised to 8 bits before encoding.
    pub fn requires_8bit(self) -> bool {
        !matches!(self, Self::Exr)
    }

    /// Promote to PNG when transparency is required but unsupported.
    pub fn for_transparency(self, require_transparent: bool) -> Self {
        if require_transparent && !self.supports_alpha() {
            Self::Png
        } else {
            self
        }
    }

    /// Matching `image` crate format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Exr => image::ImageFormat::OpenExr,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/codec.rs"]
mod tests;
