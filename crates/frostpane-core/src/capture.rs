//! Background capture types and the capture source seam.
//!
//! The engine never reads host pixels directly. The host hands it still
//! snapshots of whatever sits behind the overlay through [`CaptureSource`];
//! everything downstream (renditions, compositing) works on those snapshots.

use image::RgbImage;
use thiserror::Error;

/// Error types for background capture
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The capture region currently has zero width or height
    #[error("capture region has zero size")]
    EmptyRegion,

    /// The overlay is not attached to a capturable surface
    #[error("not attached to a surface")]
    Detached,

    /// The host failed to produce a snapshot
    #[error("capture failed: {0}")]
    Failed(String),
}

/// A raster image with RGB pixel data
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// RGB pixel data (3 bytes per pixel, row-major)
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a new raster image
    ///
    /// # Arguments
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `pixels` - RGB pixel data (must be width * height * 3 bytes)
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel data size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether the image has no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy this image into an [`image::RgbImage`] buffer.
    ///
    /// Returns `None` if the pixel buffer does not match the dimensions.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Wrap an [`image::RgbImage`] buffer without copying.
    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}

/// A still snapshot of the content behind the overlay
#[derive(Debug, Clone)]
pub struct Capture {
    /// The snapshot pixels
    pub image: RasterImage,
    /// Raster pixels per logical point at capture time
    pub scale: f32,
}

impl Capture {
    /// Create a new capture. Non-finite or non-positive scales fall back to 1.0.
    pub fn new(image: RasterImage, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self { image, scale }
    }
}

/// Source of background snapshots.
///
/// Implemented by the host embedding. The overlay pulls a fresh capture
/// whenever its background must be refreshed; a failure is reported through
/// [`CaptureError`] and leaves the previously built renditions in place.
pub trait CaptureSource {
    /// Produce a snapshot of the content currently behind the overlay.
    fn capture(&mut self) -> Result<Capture, CaptureError>;
}
