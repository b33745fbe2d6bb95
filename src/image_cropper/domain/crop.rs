use crate::domain::image::{Image, Rect};
use tracing::warn;

/// Removes `cut_pixels` rows from the bottom of `image`.
///
/// Non-positive amounts, and amounts that would leave no rows, return the
/// image unchanged. Packed images are cropped as a view over the same buffer;
/// other backings are copied.
pub fn crop_bottom(image: &Image, cut_pixels: i64) -> Image {
    if cut_pixels <= 0 {
        return image.clone();
    }

    let bounds = image.bounds();
    if i64::from(bounds.height()) <= cut_pixels {
        return image.clone();
    }

    // cut_pixels < height なので u32 に収まる
    let rect = match Rect::new(bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y - cut_pixels as u32) {
        Ok(rect) => rect,
        Err(e) => {
            warn!("invalid crop bounds, returning original image: {}", e);
            return image.clone();
        }
    };

    if let Some(view) = image.sub_image(rect) {
        return view;
    }

    warn!(
        backing = %image.backing().kind(),
        "image backing does not support sub-region views, copying rows"
    );
    match image.copy_region(rect) {
        Ok(copy) => copy,
        Err(e) => {
            warn!("failed to copy cropped region, returning original image: {}", e);
            image.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::rgba_from_fn;
    use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    // テスト用にログ出力を溜めておくライター
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn sixteen_bit(width: u32, height: u32) -> Image {
        let wide: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::from_pixel(width, height, Rgb([100, 200, 300]));
        Image::from_dynamic(DynamicImage::ImageRgb16(wide)).unwrap()
    }

    fn solid(width: u32, height: u32) -> Image {
        rgba_from_fn(width, height, |_, _| Rgba([255, 0, 0, 255]))
    }

    fn patterned(width: u32, height: u32) -> Image {
        rgba_from_fn(width, height, |x, y| Rgba([(x * 3) as u8, (y * 7) as u8, (x ^ y) as u8, 200]))
    }

    fn assert_same_pixels(a: &Image, b: &Image) {
        assert_eq!(a.bounds(), b.bounds());
        let bounds = a.bounds();
        for y in bounds.min_y..bounds.max_y {
            for x in bounds.min_x..bounds.max_x {
                assert_eq!(a.pixel(x, y), b.pixel(x, y), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_crop_bottom_dimensions() {
        // (width, height, cut, want_w, want_h)
        let cases = [
            (100, 200, 50, 100, 150),
            (100, 200, 0, 100, 200),
            (100, 200, -10, 100, 200),
            (100, 200, 200, 100, 200),
            (100, 200, 300, 100, 200),
            (50, 50, 10, 50, 40),
        ];

        for (width, height, cut, want_w, want_h) in cases {
            let result = crop_bottom(&solid(width, height), cut);
            assert_eq!(result.width(), want_w, "width for cut {}", cut);
            assert_eq!(result.height(), want_h, "height for cut {}", cut);
        }
    }

    #[test]
    fn test_non_positive_cut_is_identity() {
        let image = patterned(20, 30);
        for cut in [0, -1, -500, i64::MIN] {
            assert_same_pixels(&crop_bottom(&image, cut), &image);
        }
    }

    #[test]
    fn test_cut_at_or_above_height_is_identity() {
        let image = patterned(20, 30);
        for cut in [30, 31, 10_000, i64::MAX] {
            assert_same_pixels(&crop_bottom(&image, cut), &image);
        }
    }

    #[test]
    fn test_retained_pixels_match_source() {
        let image = patterned(17, 23);
        let cropped = crop_bottom(&image, 5);

        assert_eq!(cropped.bounds(), Rect::new(0, 0, 17, 18).unwrap());
        for y in 0..18 {
            for x in 0..17 {
                assert_eq!(cropped.pixel(x, y), image.pixel(x, y));
            }
        }
        assert_eq!(cropped.pixel(0, 18), None);
    }

    #[test]
    fn test_crop_keeps_min_corner() {
        let image = patterned(10, 10);
        let view = image.sub_image(Rect::new(2, 3, 10, 10).unwrap()).unwrap();
        let cropped = crop_bottom(&view, 4);
        assert_eq!(cropped.bounds(), Rect { min_x: 2, min_y: 3, max_x: 10, max_y: 6 });
    }

    #[test]
    fn test_packed_crop_is_a_view() {
        let image = patterned(8, 8);
        let cropped = crop_bottom(&image, 2);
        assert!(cropped.backing().supports_views());
        let (bytes, _) = cropped.packed_bytes().unwrap();
        assert!(matches!(bytes, std::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn test_unviewable_backing_is_copied() {
        let wide: ImageBuffer<Rgb<u16>, Vec<u16>> =
            ImageBuffer::from_fn(100, 200, |x, y| Rgb([x as u16 * 300, y as u16 * 300, 65535]));
        let image = Image::from_dynamic(DynamicImage::ImageRgb16(wide)).unwrap();
        assert!(!image.backing().supports_views());

        let cropped = crop_bottom(&image, 50);
        assert_eq!((cropped.width(), cropped.height()), (100, 150));
        for y in (0..150).step_by(7) {
            for x in (0..100).step_by(9) {
                assert_eq!(cropped.pixel(x, y), image.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_copy_fallback_logs_a_warning() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let cropped = tracing::subscriber::with_default(subscriber, || crop_bottom(&sixteen_bit(10, 20), 5));

        assert_eq!(cropped.height(), 15);
        let output = logs.contents();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("does not support sub-region views"), "{}", output);
        assert!(output.contains("rgb16"), "{}", output);
    }

    #[test]
    fn test_packed_crop_logs_nothing() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || crop_bottom(&patterned(10, 20), 5));

        assert!(logs.contents().is_empty());
    }
}
