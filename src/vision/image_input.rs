//! Image intake and validation
//!
//! Anything the user opens, drops or pastes arrives as an [`ImageInput`].
//! Only a validated [`SourceImage`] is ever handed to a recognition engine.

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rejected input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no image data")]
    Empty,

    #[error("{name} is not an image ({mime})")]
    NotAnImage { name: String, mime: String },

    #[error("{name} could not be read as an image: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// What the user is told, whatever the cause
    pub const USER_MESSAGE: &'static str = "Please select a valid image file.";
}

/// Unvalidated image bytes plus whatever the source told us about them
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub name: String,
    /// MIME type reported by the source, if any
    pub declared_mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageInput {
    pub fn from_bytes(name: impl Into<String>, declared_mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_mime: declared_mime.filter(|m| !m.is_empty()),
            bytes,
        }
    }

    /// Read a file from disk
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let bytes = std::fs::read(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::from_bytes(name, None, bytes))
    }

    /// Wrap raw RGBA pixels (e.g. from the clipboard) as a PNG
    pub fn from_rgba(
        name: impl Into<String>,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<Self, InputError> {
        let name = name.into();
        if width == 0 || height == 0 || rgba.is_empty() {
            return Err(InputError::Empty);
        }

        let image = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| InputError::NotAnImage {
            name: name.clone(),
            mime: "raw pixels with mismatched size".to_string(),
        })?;

        let bytes = encode_png(&DynamicImage::ImageRgba8(image))
            .map_err(|source| InputError::Unreadable { name: name.clone(), source })?;

        Ok(Self::from_bytes(name, Some("image/png".to_string()), bytes))
    }
}

/// A validated image
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub mime: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Hex sha256 of `bytes`
    pub digest: String,
}

impl SourceImage {
    /// Accept `input` only if it is a readable image
    pub fn validate(input: ImageInput) -> Result<Self, InputError> {
        let ImageInput {
            name,
            declared_mime,
            bytes,
        } = input;

        if bytes.is_empty() {
            return Err(InputError::Empty);
        }

        if let Some(mime) = &declared_mime {
            if !mime.starts_with("image/") {
                return Err(InputError::NotAnImage {
                    name,
                    mime: mime.clone(),
                });
            }
        }

        let format = image::guess_format(&bytes).map_err(|_| InputError::NotAnImage {
            name: name.clone(),
            mime: declared_mime.unwrap_or_else(|| "unknown".to_string()),
        })?;

        let (width, height) = ImageReader::with_format(Cursor::new(bytes.as_slice()), format)
            .into_dimensions()
            .map_err(|source| InputError::Unreadable {
                name: name.clone(),
                source,
            })?;

        let digest = format!("{:x}", Sha256::digest(&bytes));

        Ok(Self {
            name,
            mime: format.to_mime_type().to_string(),
            format,
            bytes,
            width,
            height,
            digest,
        })
    }

    pub fn decode(&self) -> Result<DynamicImage, image::ImageError> {
        image::load_from_memory_with_format(&self.bytes, self.format)
    }

    /// URI for the UI image cache, distinct for distinct image contents
    pub fn preview_uri(&self) -> String {
        format!("bytes://{}/{}", &self.digest[..16], self.name)
    }

    #[cfg(test)]
    pub fn solid_for_tests(width: u32, height: u32) -> Self {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
        let bytes = encode_png(&DynamicImage::ImageRgba8(image)).unwrap();
        Self::validate(ImageInput::from_bytes("test.png", None, bytes)).unwrap()
    }
}

/// Encode an image as PNG
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
