use crate::domain::image::Image;
use crate::domain::image_codec_trait::ImageCodec;
use crate::domain::image_format::ImageFormat;
use super::error::{CodecCause, InfrastructureError};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageEncoder};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// `ImageCodec` backed by the `image` crate.
pub struct ImageCrateCodec;

impl ImageCrateCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Result<(Image, ImageFormat), InfrastructureError> {
        let file = File::open(path).map_err(|e| InfrastructureError::decode(path, e))?;
        // 拡張子ではなくバイト列の先頭からフォーマットを判定する
        let reader = image::io::Reader::new(BufReader::new(file))
            .with_guessed_format()
            .map_err(|e| InfrastructureError::decode(path, e))?;
        // JPEG/PNG以外は書き戻せないので、デコードする前に弾く
        let format = match reader.format() {
            Some(detected) => ImageFormat::try_from(detected).map_err(|_| InfrastructureError::UnsupportedFormatError {
                path: path.to_path_buf(),
                format: format!("{:?}", detected).to_lowercase(),
            })?,
            None => {
                return Err(InfrastructureError::decode(
                    path,
                    io::Error::new(io::ErrorKind::InvalidData, "unrecognized image signature"),
                ))
            }
        };
        let dynamic = reader.decode().map_err(|e| InfrastructureError::decode(path, e))?;

        let image = Image::from_dynamic(dynamic).map_err(|e| InfrastructureError::decode(path, e))?;
        Ok((image, format))
    }

    fn encode(&self, path: &Path, image: &Image, format: ImageFormat) -> Result<(), InfrastructureError> {
        let file = File::create(path).map_err(|e| InfrastructureError::encode(path, e))?;
        let mut writer = BufWriter::new(file);
        write_image(&mut writer, image, format).map_err(|e| InfrastructureError::encode(path, e))?;
        writer.flush().map_err(|e| InfrastructureError::encode(path, e))?;
        Ok(())
    }
}

fn write_image<W: Write>(writer: &mut W, image: &Image, format: ImageFormat) -> Result<(), CodecCause> {
    let (width, height) = (image.width(), image.height());

    match format {
        ImageFormat::Jpeg => {
            // デフォルト品質 (75)
            let mut encoder = JpegEncoder::new(writer);
            match image.packed_bytes() {
                Some((bytes, layout)) if !layout.has_alpha() => {
                    encoder.encode(&bytes, width, height, layout.color_type())?;
                }
                // JPEGはアルファを持てないのでRGBに落とす
                _ => {
                    let rgb = image.to_dynamic()?.to_rgb8();
                    encoder.encode(rgb.as_raw(), width, height, ColorType::Rgb8)?;
                }
            }
        }
        ImageFormat::Png => {
            let encoder = PngEncoder::new(writer);
            match image.packed_bytes() {
                Some((bytes, layout)) => encoder.write_image(&bytes, width, height, layout.color_type())?,
                None => {
                    let dynamic = match image.to_dynamic()? {
                        // PNGは浮動小数点を扱えない
                        float @ (DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)) => {
                            DynamicImage::ImageRgba16(float.to_rgba16())
                        }
                        other => other,
                    };
                    let (w, h) = dynamic.dimensions();
                    encoder.write_image(dynamic.as_bytes(), w, h, dynamic.color())?;
                }
            }
        }
    }
    Ok(())
}
