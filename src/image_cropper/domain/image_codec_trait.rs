use crate::domain::image::Image;
use crate::domain::image_format::ImageFormat;
use crate::infrastructure::error::InfrastructureError;
use std::path::Path;

// 画像ファイルの読み書き。実装はインフラ層 (ImageCrateCodec)
#[cfg_attr(test, mockall::automock)]
pub trait ImageCodec {
    fn decode(&self, path: &Path) -> Result<(Image, ImageFormat), InfrastructureError>;

    fn encode(&self, path: &Path, image: &Image, format: ImageFormat) -> Result<(), InfrastructureError>;
}
