pub mod crop;
pub mod error;
pub mod image;
pub mod image_codec_trait;
pub mod image_format;
