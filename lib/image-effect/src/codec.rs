//! Byte buffer <-> `RasterImage`.
//!
//! Decoding accepts PNG and JPEG streams only. Encoding always emits PNG,
//! whatever the source format was.

use crate::{ImageEffectError, ImageEffectResult, RasterImage};
use image::ImageFormat;
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
}

impl SourceFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            SourceFormat::Png => "image/png",
            SourceFormat::Jpeg => "image/jpeg",
        }
    }

    /// Maps a file extension (`png`, `jpg`, `jpeg`, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(SourceFormat::Png),
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            _ => None,
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            SourceFormat::Png => ImageFormat::Png,
            SourceFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Identifies the stream by its magic bytes.
pub fn sniff(bytes: &[u8]) -> ImageEffectResult<SourceFormat> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok(SourceFormat::Png),
        Ok(ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        Ok(other) => Err(ImageEffectError::CorruptImage(format!(
            "{other:?} streams are not accepted"
        ))),
        Err(_) => Err(ImageEffectError::CorruptImage(
            "not a PNG or JPEG stream".to_string(),
        )),
    }
}

pub fn decode(bytes: &[u8]) -> ImageEffectResult<RasterImage> {
    let format = sniff(bytes)?;
    let image = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| ImageEffectError::CorruptImage(e.to_string()))?;

    log::debug!(
        "decoded {:?} {}x{} ({:?})",
        format,
        image.width(),
        image.height(),
        image.color()
    );

    Ok(RasterImage::from_dynamic(image))
}

pub fn encode_png(image: &RasterImage) -> ImageEffectResult<Vec<u8>> {
    if image.is_empty() {
        return Err(ImageEffectError::InvalidImage(format!(
            "cannot encode a {}x{} image",
            image.width(),
            image.height()
        )));
    }

    let mut buf = Cursor::new(Vec::new());
    image.to_dynamic()?.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
