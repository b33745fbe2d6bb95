use crate::domain::error::DomainError;
use image::{
    ColorType, DynamicImage, GenericImageView, GrayAlphaImage, GrayImage, Rgba, RgbImage,
    RgbaImage,
};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Bounding rectangle of an image. `min` is inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Rect {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Result<Self, DomainError> {
        if min_x > max_x || min_y > max_y {
            return Err(DomainError::InvalidBounds { min_x, min_y, max_x, max_y });
        }
        Ok(Self { min_x, min_y, max_x, max_y })
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self { min_x: 0, min_y: 0, max_x: width, max_y: height }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Largest rectangle covered by both. Disjoint rectangles give an empty one.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x).max(min_x);
        let max_y = self.max_y.min(other.max_y).max(min_y);
        Rect { min_x, min_y, max_x, max_y }
    }
}

/// Channel layout of a packed 8-bit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Luma8,
    LumaA8,
    Rgb8,
    Rgba8,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Luma8 => 1,
            PixelLayout::LumaA8 => 2,
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, PixelLayout::LumaA8 | PixelLayout::Rgba8)
    }

    pub fn color_type(self) -> ColorType {
        match self {
            PixelLayout::Luma8 => ColorType::L8,
            PixelLayout::LumaA8 => ColorType::La8,
            PixelLayout::Rgb8 => ColorType::Rgb8,
            PixelLayout::Rgba8 => ColorType::Rgba8,
        }
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelLayout::Luma8 => "luma8",
            PixelLayout::LumaA8 => "luma-alpha8",
            PixelLayout::Rgb8 => "rgb8",
            PixelLayout::Rgba8 => "rgba8",
        };
        f.write_str(name)
    }
}

/// Contiguous row-major 8-bit pixel storage, shared between an image and its views.
#[derive(Clone)]
pub struct PackedBuffer {
    data: Arc<Vec<u8>>,
    width: u32,
    height: u32,
    layout: PixelLayout,
    // 画像座標でのバッファ左上
    origin_x: u32,
    origin_y: u32,
}

impl PackedBuffer {
    pub fn new(data: Vec<u8>, width: u32, height: u32, layout: PixelLayout) -> Result<Self, DomainError> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(DomainError::BufferSizeMismatch { width, height, actual: data.len() });
        }
        Ok(Self { data: Arc::new(data), width, height, layout, origin_x: 0, origin_y: 0 })
    }

    fn with_origin(mut self, origin_x: u32, origin_y: u32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            min_x: self.origin_x,
            min_y: self.origin_y,
            max_x: self.origin_x + self.width,
            max_y: self.origin_y + self.height,
        }
    }

    fn stride(&self) -> usize {
        self.width as usize * self.layout.channels()
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let ch = self.layout.channels();
        let (x, y) = (x - self.origin_x, y - self.origin_y);
        let start = y as usize * self.stride() + x as usize * ch;
        let p = &self.data[start..start + ch];
        match self.layout {
            PixelLayout::Luma8 => Rgba([p[0], p[0], p[0], 255]),
            PixelLayout::LumaA8 => Rgba([p[0], p[0], p[0], p[1]]),
            PixelLayout::Rgb8 => Rgba([p[0], p[1], p[2], 255]),
            PixelLayout::Rgba8 => Rgba([p[0], p[1], p[2], p[3]]),
        }
    }

    /// Bytes of `rect`, row by row. Borrowed when the rows are full width.
    fn region_bytes(&self, rect: Rect) -> Cow<'_, [u8]> {
        let ch = self.layout.channels();
        let stride = self.stride();
        let (min_x, max_x) = (rect.min_x - self.origin_x, rect.max_x - self.origin_x);
        let (min_y, max_y) = (rect.min_y - self.origin_y, rect.max_y - self.origin_y);
        if min_x == 0 && max_x == self.width {
            return Cow::Borrowed(&self.data[min_y as usize * stride..max_y as usize * stride]);
        }

        let row_len = rect.width() as usize * ch;
        let mut out = Vec::with_capacity(row_len * rect.height() as usize);
        for y in min_y..max_y {
            let start = y as usize * stride + min_x as usize * ch;
            out.extend_from_slice(&self.data[start..start + row_len]);
        }
        Cow::Owned(out)
    }
}

impl fmt::Debug for PackedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout)
            .finish()
    }
}

/// How the pixels of an [`Image`] are stored.
#[derive(Debug, Clone)]
pub enum PixelBacking {
    /// Supports zero-copy sub-region views.
    Packed(PackedBuffer),
    /// 16-bit and float images. Always covers exactly the image bounds.
    Other(Arc<DynamicImage>),
}

impl PixelBacking {
    pub fn supports_views(&self) -> bool {
        matches!(self, PixelBacking::Packed(_))
    }

    pub fn kind(&self) -> String {
        match self {
            PixelBacking::Packed(buffer) => format!("packed-{}", buffer.layout()),
            PixelBacking::Other(dynamic) => format!("{:?}", dynamic.color()).to_lowercase(),
        }
    }
}

/// A rectangular grid of pixels.
#[derive(Debug, Clone)]
pub struct Image {
    backing: PixelBacking,
    bounds: Rect,
}

impl Image {
    pub fn from_packed(buffer: PackedBuffer) -> Self {
        let bounds = buffer.bounds();
        Self { backing: PixelBacking::Packed(buffer), bounds }
    }

    /// 8-bit images keep their buffer as a packed backing, anything else is kept as is.
    pub fn from_dynamic(dynamic: DynamicImage) -> Result<Self, DomainError> {
        let (width, height) = dynamic.dimensions();
        let packed = match dynamic {
            DynamicImage::ImageLuma8(buf) => PackedBuffer::new(buf.into_raw(), width, height, PixelLayout::Luma8)?,
            DynamicImage::ImageLumaA8(buf) => PackedBuffer::new(buf.into_raw(), width, height, PixelLayout::LumaA8)?,
            DynamicImage::ImageRgb8(buf) => PackedBuffer::new(buf.into_raw(), width, height, PixelLayout::Rgb8)?,
            DynamicImage::ImageRgba8(buf) => PackedBuffer::new(buf.into_raw(), width, height, PixelLayout::Rgba8)?,
            other => {
                return Ok(Self {
                    backing: PixelBacking::Other(Arc::new(other)),
                    bounds: Rect::from_size(width, height),
                })
            }
        };
        Ok(Self::from_packed(packed))
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn width(&self) -> u32 {
        self.bounds.width()
    }

    pub fn height(&self) -> u32 {
        self.bounds.height()
    }

    pub fn backing(&self) -> &PixelBacking {
        &self.backing
    }

    /// Color at `(x, y)` in image coordinates.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        match &self.backing {
            PixelBacking::Packed(buffer) => Some(buffer.pixel(x, y)),
            PixelBacking::Other(dynamic) => {
                Some(dynamic.get_pixel(x - self.bounds.min_x, y - self.bounds.min_y))
            }
        }
    }

    /// Zero-copy view of `rect` clipped to the bounds. `None` when the backing
    /// cannot be shared.
    pub fn sub_image(&self, rect: Rect) -> Option<Image> {
        if !self.backing.supports_views() {
            return None;
        }
        Some(Image {
            backing: self.backing.clone(),
            bounds: self.bounds.intersect(&rect),
        })
    }

    /// New image holding a copy of `rect` clipped to the bounds.
    pub fn copy_region(&self, rect: Rect) -> Result<Image, DomainError> {
        let rect = self.bounds.intersect(&rect);
        match &self.backing {
            PixelBacking::Packed(buffer) => {
                let bytes = buffer.region_bytes(rect).into_owned();
                let packed = PackedBuffer::new(bytes, rect.width(), rect.height(), buffer.layout())?
                    .with_origin(rect.min_x, rect.min_y);
                // 座標系は元画像のまま
                Ok(Image { backing: PixelBacking::Packed(packed), bounds: rect })
            }
            PixelBacking::Other(dynamic) => {
                let copied = dynamic.crop_imm(
                    rect.min_x - self.bounds.min_x,
                    rect.min_y - self.bounds.min_y,
                    rect.width(),
                    rect.height(),
                );
                Ok(Image { backing: PixelBacking::Other(Arc::new(copied)), bounds: rect })
            }
        }
    }

    /// Packed bytes of the visible region and their layout.
    pub fn packed_bytes(&self) -> Option<(Cow<'_, [u8]>, PixelLayout)> {
        match &self.backing {
            PixelBacking::Packed(buffer) => Some((buffer.region_bytes(self.bounds), buffer.layout())),
            PixelBacking::Other(_) => None,
        }
    }

    /// Owned `DynamicImage` of the visible region, for encoders that need one.
    pub fn to_dynamic(&self) -> Result<DynamicImage, DomainError> {
        let (width, height) = (self.width(), self.height());
        match &self.backing {
            PixelBacking::Packed(buffer) => {
                let bytes = buffer.region_bytes(self.bounds).into_owned();
                let actual = bytes.len();
                let mismatch = || DomainError::BufferSizeMismatch { width, height, actual };
                let dynamic = match buffer.layout() {
                    PixelLayout::Luma8 => DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, bytes).ok_or_else(mismatch)?),
                    PixelLayout::LumaA8 => DynamicImage::ImageLumaA8(GrayAlphaImage::from_raw(width, height, bytes).ok_or_else(mismatch)?),
                    PixelLayout::Rgb8 => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, bytes).ok_or_else(mismatch)?),
                    PixelLayout::Rgba8 => DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, bytes).ok_or_else(mismatch)?),
                };
                Ok(dynamic)
            }
            PixelBacking::Other(dynamic) => {
                if dynamic.dimensions() == (width, height) {
                    Ok(dynamic.as_ref().clone())
                } else {
                    Ok(dynamic.crop_imm(0, 0, width, height))
                }
            }
        }
    }
}

/// Builds a packed RGBA image from a closure.
#[cfg(test)]
pub fn rgba_from_fn<F>(width: u32, height: u32, f: F) -> Image
where
    F: FnMut(u32, u32) -> Rgba<u8>,
{
    use image::ImageBuffer;

    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, f);
    Image::from_packed(PackedBuffer {
        data: Arc::new(buffer.into_raw()),
        width,
        height,
        layout: PixelLayout::Rgba8,
        origin_x: 0,
        origin_y: 0,
    })
}
