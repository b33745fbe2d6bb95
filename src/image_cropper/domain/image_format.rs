use crate::domain::error::DomainError;
use image::ImageFormat as InnerImageFormat; // imageクレートの型
use std::fmt;

/// Encoding of an image file. Only formats that can be written back are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl TryFrom<InnerImageFormat> for ImageFormat {
    type Error = DomainError;

    fn try_from(format: InnerImageFormat) -> Result<Self, Self::Error> {
        match format {
            InnerImageFormat::Jpeg => Ok(ImageFormat::Jpeg),
            InnerImageFormat::Png => Ok(ImageFormat::Png),
            other => Err(DomainError::UnsupportedFormat(format!("{:?}", other).to_lowercase())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => f.write_str("jpeg"),
            ImageFormat::Png => f.write_str("png"),
        }
    }
}
