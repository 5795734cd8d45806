pub mod model;
pub mod remover;

pub use model::Model;
pub use remover::BackgroundRemover;

use image::{RgbImage, RgbaImage};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Model file not found: {0}")]
    ModelNotFound(std::path::PathBuf),

    #[error("Failed to load model: {0}")]
    ModelLoadFailed(String),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::Error),

    #[error("Image resize error: {0}")]
    ImageResize(#[from] fast_image_resize::ResizeError),

    #[error("Image buffer error: {0}")]
    ImageBufferError(#[from] fast_image_resize::ImageBufferError),
}

/// Separates the foreground subject from its background.
///
/// Implementations may be slow; callers block until they return.
pub trait Segmenter {
    /// Returns `image` with an alpha channel where background pixels are
    /// transparent. The output has the same dimensions as the input.
    fn remove(&mut self, image: &RgbImage) -> Result<RgbaImage>;
}

impl Segmenter for BackgroundRemover {
    fn remove(&mut self, image: &RgbImage) -> Result<RgbaImage> {
        BackgroundRemover::remove(self, image)
    }
}
