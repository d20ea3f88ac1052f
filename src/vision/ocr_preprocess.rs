//! Image preprocessing filters for OCR
//!
//! Optional enhancements applied before an image is handed to tesseract.
//! Helps with low-contrast scans and small text in screenshots.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::config::OcrPreprocessing;
use crate::vision::image_input::{encode_png, SourceImage};

/// Produce the PNG bytes the engine should read. Returns the original bytes
/// untouched when preprocessing is disabled.
pub fn prepare_for_ocr(image: &SourceImage, settings: &OcrPreprocessing) -> Result<Vec<u8>, image::ImageError> {
    if !settings.enabled {
        debug!("OCR preprocessing disabled");
        return Ok(image.bytes.clone());
    }

    let processed = apply_preprocessing(image.decode()?, settings);
    encode_png(&processed)
}

/// Apply the enabled filters in a fixed order: upscale, contrast, grayscale, sharpen
pub fn apply_preprocessing(image: DynamicImage, settings: &OcrPreprocessing) -> DynamicImage {
    debug!(
        "OCR preprocessing: grayscale={}, contrast={}, sharpen={}, scale={}",
        settings.grayscale, settings.contrast, settings.sharpen, settings.scale
    );

    // Upscale first so later filters work on the final resolution
    let mut image = if settings.scale > 1 {
        image.resize_exact(
            image.width() * settings.scale,
            image.height() * settings.scale,
            FilterType::Triangle,
        )
    } else {
        image
    };

    if (settings.contrast - 1.0).abs() > 0.01 {
        let mut rgba = image.to_rgba8();
        apply_contrast(&mut rgba, settings.contrast);
        image = DynamicImage::ImageRgba8(rgba);
    }

    if settings.grayscale || settings.sharpen {
        let mut gray = image.to_luma8();
        if settings.sharpen {
            gray = imageproc::filter::sharpen3x3(&gray);
        }
        image = DynamicImage::ImageLuma8(gray);
    }

    image
}

/// Stretch RGB channels around the midpoint. Factor > 1.0 increases contrast.
fn apply_contrast(image: &mut RgbaImage, factor: f32) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            let adjusted = ((*channel as f32 - 128.0) * factor + 128.0).clamp(0.0, 255.0);
            *channel = adjusted as u8;
        }
    }
}
