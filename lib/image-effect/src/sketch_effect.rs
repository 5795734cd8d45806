//! Pencil sketch: divide the grayscale image by a blurred, inverted copy of
//! itself.
//!
//! ```text
//! gray    = luma(rgb)
//! blurred = 255 - gaussian(255 - gray, k)
//! sketch  = clamp(round_half_even(gray * 256 / blurred), 0, 255)
//! ```
//!
//! A zero numerator gives 0. A zero denominator with a non-zero numerator
//! saturates to 255.

use crate::{
    Channels, Effect, ImageEffectError, ImageEffectResult, RasterImage,
    base_effect::{self, GrayscaleConfig},
    blur_effect::GaussianBlurConfig,
};
use derivative::Derivative;
use derive_setters::Setters;

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct PencilSketchConfig {
    #[derivative(Default(value = "111"))]
    kernel_size: u32,

    #[derivative(Default(value = "0.0"))]
    sigma: f64,

    #[derivative(Default(value = "256.0"))]
    scale: f64,
}

impl PencilSketchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kernel_size(&self) -> u32 {
        self.kernel_size
    }

    fn blur(&self) -> GaussianBlurConfig {
        GaussianBlurConfig::new()
            .with_kernel_size(self.kernel_size)
            .with_sigma(self.sigma)
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        self.blur().validate()?;

        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ImageEffectError::InvalidParameter(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }

        Ok(())
    }
}

/// Per-pixel `numerator * scale / denominator`, saturated to 8 bits.
pub fn divide(
    numerator: &RasterImage,
    denominator: &RasterImage,
    scale: f64,
) -> ImageEffectResult<RasterImage> {
    if numerator.dimensions() != denominator.dimensions()
        || numerator.channels() != denominator.channels()
    {
        return Err(ImageEffectError::InvalidParameter(format!(
            "cannot divide {:?} {}x{} by {:?} {}x{}",
            numerator.channels(),
            numerator.width(),
            numerator.height(),
            denominator.channels(),
            denominator.width(),
            denominator.height(),
        )));
    }

    let samples = numerator
        .samples()
        .iter()
        .zip(denominator.samples())
        .map(|(&n, &d)| match (n, d) {
            (0, _) => 0,
            (_, 0) => 255,
            _ => (n as f64 * scale / d as f64)
                .round_ties_even()
                .clamp(0.0, 255.0) as u8,
        })
        .collect();

    RasterImage::new(
        numerator.width(),
        numerator.height(),
        numerator.channels(),
        samples,
    )
}

impl Effect for PencilSketchConfig {
    fn apply(&self, image: RasterImage) -> ImageEffectResult<RasterImage> {
        self.validate()?;

        if image.is_empty() {
            return Err(ImageEffectError::InvalidImage(format!(
                "cannot sketch a {}x{} image",
                image.width(),
                image.height()
            )));
        }

        if image.channels() != Channels::Rgb {
            return Err(ImageEffectError::UnsupportedFormat(format!(
                "pencil sketch needs 3 channels, got {}",
                image.channels().count()
            )));
        }

        log::debug!(
            "pencil sketch {}x{} with kernel {}",
            image.width(),
            image.height(),
            self.kernel_size
        );

        let gray = GrayscaleConfig::new().apply(image)?;
        let inverted = base_effect::invert(gray.clone());
        let blurred = self.blur().apply(inverted)?;
        let inverted_blur = base_effect::invert(blurred);

        divide(&gray, &inverted_blur, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(samples: Vec<u8>) -> RasterImage {
        RasterImage::new(samples.len() as u32, 1, Channels::Gray, samples).unwrap()
    }

    #[test]
    fn test_divide_rules() {
        let n = gray(vec![0, 0, 10, 200, 128, 100, 1]);
        let d = gray(vec![0, 50, 0, 100, 128, 200, 255]);
        let out = divide(&n, &d, 256.0).unwrap();
        // 100*256/200 = 128, 1*256/255 = 1.0039 -> 1
        assert_eq!(out.samples(), &[0, 0, 255, 255, 255, 128, 1]);
    }

    #[test]
    fn test_divide_rounds_half_to_even() {
        // 0.5 -> 0, 1.5 -> 2, 2.5 -> 2
        let n = gray(vec![1, 3, 5]);
        let d = gray(vec![2, 2, 2]);
        let out = divide(&n, &d, 1.0).unwrap();
        assert_eq!(out.samples(), &[0, 2, 2]);
    }

    #[test]
    fn test_divide_shape_mismatch() {
        let err = divide(&gray(vec![1, 2]), &gray(vec![1]), 256.0).unwrap_err();
        assert!(matches!(err, ImageEffectError::InvalidParameter(_)));
    }

    #[test]
    fn test_invalid_scale() {
        let img = RasterImage::filled(2, 2, Channels::Rgb, &[1, 2, 3]).unwrap();
        let err = PencilSketchConfig::new()
            .with_scale(0.0)
            .apply(img)
            .unwrap_err();
        assert!(matches!(err, ImageEffectError::InvalidParameter(_)));
    }

    #[test]
    fn test_effect_enum_dispatch() {
        use crate::ImageEffect;

        let img = RasterImage::filled(3, 3, Channels::Rgb, &[90, 90, 90]).unwrap();
        let effect = ImageEffect::PencilSketch(PencilSketchConfig::new().with_kernel_size(3));
        assert_eq!(effect.name(), "Pencil Sketch");

        let out = effect.apply(img).unwrap();
        assert_eq!(out.channels(), Channels::Gray);
        assert!(out.samples().iter().all(|&v| v == 255));
    }
}
