//! Thumbnail generation for queued images.
//!
//! The source image is drawn centered on a fixed-size transparent canvas.
//! When it is larger than the canvas in both dimensions it is first scaled so
//! that its shorter side equals the larger canvas side (aspect-fill). Smaller
//! images are drawn unscaled and may leave the canvas partly empty or overflow
//! it in one dimension. The canvas is encoded as a PNG data URL.

use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::models::queued::QueuedFile;

pub const DEFAULT_THUMB_WIDTH: u32 = 300;
pub const DEFAULT_THUMB_HEIGHT: u32 = 169;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Where and how large the source is drawn on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailLayout {
    pub draw_x: f64,
    pub draw_y: f64,
    pub draw_width: f64,
    pub draw_height: f64,
}

pub fn is_image_type(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Compute the draw rectangle for a `width`×`height` source on a
/// `thumb_width`×`thumb_height` canvas.
pub fn compute_layout(width: u32, height: u32, thumb_width: u32, thumb_height: u32) -> ThumbnailLayout {
    let (w, h) = (width as f64, height as f64);
    let (tw, th) = (thumb_width as f64, thumb_height as f64);

    let should_resize = width > thumb_width && height > thumb_height;
    let (new_width, new_height) = if should_resize {
        let largest = tw.max(th);
        if width > height {
            (w * (largest / h), largest)
        } else {
            (largest, h * (largest / w))
        }
    } else {
        (w, h)
    };

    ThumbnailLayout {
        draw_x: (tw - new_width) / 2.0,
        draw_y: (th - new_height) / 2.0,
        draw_width: new_width,
        draw_height: new_height,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailGenerator {
    width: u32,
    height: u32,
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_THUMB_WIDTH, DEFAULT_THUMB_HEIGHT)
    }
}

impl ThumbnailGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decode `bytes` and render the thumbnail as a PNG data URL.
    pub fn render(&self, bytes: &[u8]) -> crate::error::Result<String> {
        let source = image::load_from_memory(bytes)?.to_rgba8();
        let layout = compute_layout(source.width(), source.height(), self.width, self.height);

        let draw_width = layout.draw_width.round().max(1.0) as u32;
        let draw_height = layout.draw_height.round().max(1.0) as u32;
        let scaled = if (draw_width, draw_height) == source.dimensions() {
            source
        } else {
            imageops::resize(&source, draw_width, draw_height, FilterType::Triangle)
        };

        let mut canvas = RgbaImage::new(self.width, self.height);
        imageops::overlay(
            &mut canvas,
            &scaled,
            layout.draw_x.round() as i64,
            layout.draw_y.round() as i64,
        );

        let mut png = Cursor::new(Vec::new());
        canvas.write_to(&mut png, ImageFormat::Png)?;
        Ok(format!("{}{}", DATA_URL_PREFIX, BASE64.encode(png.into_inner())))
    }

    /// Render on the blocking pool.
    pub async fn generate(&self, bytes: Arc<[u8]>) -> crate::error::Result<String> {
        let generator = *self;
        tokio::task::spawn_blocking(move || generator.render(&bytes))
            .await
            .map_err(|e| AppError::Internal(format!("spawn_blocking join error: {}", e)))?
    }

    /// Schedule thumbnail generation for an image entry.
    ///
    /// Returns `None` when the entry is not an image or no tokio runtime is
    /// running. Decode failures leave the entry without a thumbnail.
    pub fn attach(&self, entry: Arc<QueuedFile>) -> Option<JoinHandle<()>> {
        if !is_image_type(entry.file().mime_type()) {
            return None;
        }
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!(
                    "No async runtime; skipping thumbnail for '{}'",
                    entry.file().name()
                );
                return None;
            }
        };

        let generator = *self;
        Some(handle.spawn(async move {
            match generator.generate(entry.file().shared_bytes()).await {
                Ok(data_url) => {
                    entry.set_thumbnail(data_url);
                }
                Err(e) => {
                    log::debug!("No thumbnail for '{}': {}", entry.file().name(), e);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file::RawFile;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn decode_data_url(data_url: &str) -> RgbaImage {
        let b64 = data_url.strip_prefix(DATA_URL_PREFIX).expect("png data url");
        let bytes = BASE64.decode(b64).unwrap();
        image::load_from_memory(&bytes).unwrap().to_rgba8()
    }

    #[test]
    fn layout_landscape_fills_height() {
        let layout = compute_layout(1200, 600, 300, 169);
        assert_eq!(layout.draw_height, 300.0);
        assert_eq!(layout.draw_width, 600.0);
        assert_eq!(layout.draw_x, -150.0);
        assert_eq!(layout.draw_y, (169.0 - 300.0) / 2.0);
    }

    #[test]
    fn layout_portrait_fills_width() {
        let layout = compute_layout(600, 1200, 300, 169);
        assert_eq!(layout.draw_width, 300.0);
        assert_eq!(layout.draw_height, 600.0);
        assert_eq!(layout.draw_x, 0.0);
        assert_eq!(layout.draw_y, (169.0 - 600.0) / 2.0);
    }

    #[test]
    fn layout_square_uses_width_branch() {
        let layout = compute_layout(1000, 1000, 300, 169);
        assert_eq!((layout.draw_width, layout.draw_height), (300.0, 300.0));
    }

    #[test]
    fn layout_small_image_is_not_scaled() {
        let layout = compute_layout(100, 50, 300, 169);
        assert_eq!((layout.draw_width, layout.draw_height), (100.0, 50.0));
        assert_eq!((layout.draw_x, layout.draw_y), (100.0, 59.5));
    }

    #[test]
    fn layout_one_side_small_is_not_scaled() {
        // wider than the canvas but not taller: drawn as-is, overflowing
        let layout = compute_layout(2000, 100, 300, 169);
        assert_eq!((layout.draw_width, layout.draw_height), (2000.0, 100.0));
        assert_eq!(layout.draw_x, -850.0);
    }

    #[test]
    fn render_produces_canvas_sized_png() {
        let generator = ThumbnailGenerator::default();
        let data_url = generator.render(&png_bytes(640, 480)).unwrap();
        assert!(data_url.starts_with("data:image/png;base64,"));

        let thumb = decode_data_url(&data_url);
        assert_eq!(thumb.dimensions(), (300, 169));
        // aspect-fill covers the whole canvas
        assert!(thumb.get_pixel(0, 0)[3] > 250);
        assert!(thumb.get_pixel(299, 168)[3] > 250);
    }

    #[test]
    fn render_small_image_leaves_transparent_border() {
        let generator = ThumbnailGenerator::new(100, 100);
        let thumb = decode_data_url(&generator.render(&png_bytes(20, 20)).unwrap());
        assert_eq!(thumb.dimensions(), (100, 100));
        assert_eq!(thumb.get_pixel(0, 0)[3], 0);
        assert_eq!(thumb.get_pixel(50, 50)[3], 255);
    }

    #[test]
    fn render_rejects_non_image_bytes() {
        let generator = ThumbnailGenerator::default();
        assert!(matches!(
            generator.render(b"definitely not an image"),
            Err(AppError::Image(_))
        ));
    }

    #[test]
    fn is_image_type_checks_prefix() {
        assert!(is_image_type("image/png"));
        assert!(is_image_type("image/svg+xml"));
        assert!(!is_image_type("application/pdf"));
        assert!(!is_image_type(""));
    }

    #[tokio::test]
    async fn attach_sets_thumbnail_once_generated() {
        let entry = Arc::new(QueuedFile::valid(RawFile::new(
            "photo.png",
            "image/png",
            png_bytes(400, 400),
        )));
        let handle = ThumbnailGenerator::default().attach(entry.clone()).unwrap();
        handle.await.unwrap();

        let thumb = decode_data_url(entry.thumbnail().unwrap());
        assert_eq!(thumb.dimensions(), (300, 169));
    }

    #[tokio::test]
    async fn attach_skips_non_images() {
        let entry = Arc::new(QueuedFile::valid(RawFile::new("a.txt", "text/plain", b"x".to_vec())));
        assert!(ThumbnailGenerator::default().attach(entry).is_none());
    }

    #[tokio::test]
    async fn attach_decode_failure_leaves_no_thumbnail() {
        let entry = Arc::new(QueuedFile::valid(RawFile::new(
            "broken.png",
            "image/png",
            b"not a png".to_vec(),
        )));
        let handle = ThumbnailGenerator::default().attach(entry.clone()).unwrap();
        handle.await.unwrap();
        assert!(entry.thumbnail().is_none());
        assert!(entry.error().is_none());
    }

    #[test]
    fn attach_without_runtime_is_skipped() {
        let entry = Arc::new(QueuedFile::valid(RawFile::new(
            "photo.png",
            "image/png",
            png_bytes(10, 10),
        )));
        assert!(ThumbnailGenerator::default().attach(entry.clone()).is_none());
        assert!(entry.thumbnail().is_none());
    }
}
