//! Image loading and the fixed grayscale + sharpen pass applied before OCR

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};

use crate::config::Kernel;
use crate::error::ScanError;

/// Decode an image file, format detected from its contents
pub fn load_image(path: &Path) -> Result<DynamicImage, ScanError> {
    image::ImageReader::open(path)
        .map_err(|e| ScanError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?
        .with_guessed_format()
        .map_err(|e| ScanError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?
        .decode()
        .map_err(|source| ScanError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Luminance-weighted conversion to a single 8-bit channel
pub fn grayscale(img: &DynamicImage) -> Result<GrayImage, ScanError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ScanError::EmptyImage);
    }
    Ok(img.to_luma8())
}

/// Apply a 3x3 kernel to every pixel.
///
/// The kernel is applied as written (no flip), matching the usual image
/// filtering convention. Coordinates outside the image are clamped to the
/// nearest edge pixel (replicate border). Results are rounded and saturated
/// to 0..=255, so the output keeps the input's size and bit depth.
pub fn sharpen(img: &GrayImage, kernel: &Kernel) -> Result<GrayImage, ScanError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ScanError::EmptyImage);
    }

    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0_f32;
            for (ky, row) in kernel.iter().enumerate() {
                let sy = (y as i64 + ky as i64 - 1).clamp(0, max_y) as u32;
                for (kx, weight) in row.iter().enumerate() {
                    if *weight == 0.0 {
                        continue;
                    }
                    let sx = (x as i64 + kx as i64 - 1).clamp(0, max_x) as u32;
                    acc += weight * img.get_pixel(sx, sy)[0] as f32;
                }
            }
            out.put_pixel(x, y, Luma([acc.round().clamp(0.0, 255.0) as u8]));
        }
    }

    Ok(out)
}

/// Grayscale then sharpen, the input expected by the OCR engine
pub fn preprocess(img: &DynamicImage, kernel: &Kernel) -> Result<GrayImage, ScanError> {
    let gray = grayscale(img)?;
    sharpen(&gray, kernel)
}
