pub mod base_effect;
pub mod blur_effect;
pub mod codec;
pub mod raster;
pub mod sketch_effect;

pub use raster::{Channels, RasterImage};

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Corrupt image: {0}")]
    CorruptImage(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A pipeline stage: takes ownership of one image and hands back a new one.
pub trait Effect {
    fn apply(&self, image: RasterImage) -> ImageEffectResult<RasterImage>;
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    Grayscale(base_effect::GrayscaleConfig),
    Invert,
    GaussianBlur(blur_effect::GaussianBlurConfig),
    PencilSketch(sketch_effect::PencilSketchConfig),
}

impl ImageEffect {
    pub fn name(&self) -> &'static str {
        match self {
            ImageEffect::Grayscale(_) => "Grayscale",
            ImageEffect::Invert => "Invert",
            ImageEffect::GaussianBlur(_) => "Gaussian Blur",
            ImageEffect::PencilSketch(_) => "Pencil Sketch",
        }
    }
}

impl Effect for ImageEffect {
    fn apply(&self, image: RasterImage) -> ImageEffectResult<RasterImage> {
        match self {
            ImageEffect::Grayscale(config) => config.apply(image),
            ImageEffect::Invert => Ok(base_effect::invert(image)),
            ImageEffect::GaussianBlur(config) => config.apply(image),
            ImageEffect::PencilSketch(config) => config.apply(image),
        }
    }
}
