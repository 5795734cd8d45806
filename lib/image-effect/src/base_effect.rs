use crate::{Channels, Effect, ImageEffectError, ImageEffectResult, RasterImage};
use derivative::Derivative;
use derive_setters::Setters;

/// Invert every color sample (`255 - v`). Alpha is left as is.
pub fn invert(mut image: RasterImage) -> RasterImage {
    let channels = image.channels();
    let samples = image.samples_mut();

    match channels {
        Channels::Rgba => {
            for pixel in samples.chunks_exact_mut(4) {
                pixel[0] = 255 - pixel[0];
                pixel[1] = 255 - pixel[1];
                pixel[2] = 255 - pixel[2];
            }
        }
        _ => samples.iter_mut().for_each(|v| *v = 255 - *v),
    }

    image
}

/// Grayscale effect configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GrayscaleConfig {
    #[derivative(Default(value = "GrayscaleMode::Luminance"))]
    mode: GrayscaleMode,
}

impl GrayscaleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GrayscaleMode {
        self.mode
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrayscaleMode {
    Average,
    Luminance,
}

// BT.601 weights in 14-bit fixed point: 0.299, 0.587, 0.114.
const R2Y: u32 = 4899;
const G2Y: u32 = 9617;
const B2Y: u32 = 1868;
const Y_SHIFT: u32 = 14;

pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * R2Y + g as u32 * G2Y + b as u32 * B2Y + (1 << (Y_SHIFT - 1))) >> Y_SHIFT) as u8
}

impl Effect for GrayscaleConfig {
    /// Reduces a 3-channel image to a single channel.
    fn apply(&self, image: RasterImage) -> ImageEffectResult<RasterImage> {
        if image.channels() != Channels::Rgb {
            return Err(ImageEffectError::UnsupportedFormat(format!(
                "grayscale needs 3 channels, got {}",
                image.channels().count()
            )));
        }

        let (width, height) = image.dimensions();
        let samples = image
            .samples()
            .chunks_exact(3)
            .map(|p| match self.mode {
                GrayscaleMode::Luminance => luma(p[0], p[1], p[2]),
                GrayscaleMode::Average => ((p[0] as u32 + p[1] as u32 + p[2] as u32 + 1) / 3) as u8,
            })
            .collect();

        RasterImage::new(width, height, Channels::Gray, samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn test_grayscale_shape() {
        let img = RasterImage::filled(4, 3, Channels::Rgb, &[10, 200, 30]).unwrap();
        let gray = GrayscaleConfig::new().apply(img).unwrap();
        assert_eq!(gray.channels(), Channels::Gray);
        assert_eq!(gray.dimensions(), (4, 3));
        assert!(gray.samples().iter().all(|&v| v == luma(10, 200, 30)));
    }

    #[test]
    fn test_grayscale_average() {
        let img = RasterImage::new(1, 1, Channels::Rgb, vec![10, 20, 31]).unwrap();
        let gray = GrayscaleConfig::new()
            .with_mode(GrayscaleMode::Average)
            .apply(img)
            .unwrap();
        assert_eq!(gray.samples(), &[20]);
    }

    #[test]
    fn test_grayscale_rejects_gray_input() {
        let img = RasterImage::filled(2, 2, Channels::Gray, &[1]).unwrap();
        assert!(matches!(
            GrayscaleConfig::new().apply(img),
            Err(ImageEffectError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invert() {
        let img = RasterImage::new(2, 1, Channels::Gray, vec![0, 200]).unwrap();
        assert_eq!(invert(img).samples(), &[255, 55]);

        let rgba = RasterImage::new(1, 1, Channels::Rgba, vec![0, 100, 255, 17]).unwrap();
        assert_eq!(invert(rgba).samples(), &[255, 155, 0, 17]);
    }
}
