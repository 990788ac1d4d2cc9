//! Image loading and the raw pixel buffer type
//!
//! Single entry point for turning an image file into the flat RGB buffer
//! the classifier consumes. Decoding goes through the `image` crate; every
//! input is converted to 8-bit RGB regardless of the on-disk format.

use std::path::Path;

use image::RgbImage;
use log::debug;

use crate::error::{ClassifyError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image (including .jfif)
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "jfif" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// A decoded image as a flat height x width x 3 buffer of 8-bit channels
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RawImage {
    /// Build a raw image from an interleaved RGB buffer
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::ImageLoad` if the buffer length does not
    /// match `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ClassifyError::image_load_message(format!(
                "buffer size mismatch: expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the image holds no pixels
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// The pixel population as a list of RGB triples, row-major
    pub fn pixel_samples(&self) -> Vec<[u8; 3]> {
        self.data
            .chunks_exact(3)
            .map(|chunk| [chunk[0], chunk[1], chunk[2]])
            .collect()
    }
}

impl From<RgbImage> for RawImage {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// Load an image from disk as a raw RGB buffer
///
/// # Errors
///
/// Returns `ClassifyError::ImageLoad` if:
/// - the extension is not a supported format
/// - the file cannot be opened or decoded
/// - the decoded image holds no pixels
pub fn load_image(path: &Path) -> Result<RawImage> {
    use image::ImageReader;

    if ImageFormat::from_extension(path).is_none() {
        return Err(ClassifyError::image_load_message(format!(
            "unsupported image format: {}",
            path.display()
        )));
    }

    let reader = ImageReader::open(path).map_err(|e| {
        ClassifyError::image_load(format!("failed to open {}", path.display()), e)
    })?;
    let decoded = reader.decode().map_err(|e| {
        ClassifyError::image_load(format!("failed to decode {}", path.display()), e)
    })?;

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(ClassifyError::image_load_message(format!(
            "image is empty: {}",
            path.display()
        )));
    }
    debug!("loaded {} ({}x{})", path.display(), width, height);
    Ok(RawImage::from(rgb))
}

/// Supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "jpg", "jpeg", "jfif", "png", "gif", "webp", "tiff", "tif", "bmp",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
