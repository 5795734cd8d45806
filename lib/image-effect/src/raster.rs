use crate::{ImageEffectError, ImageEffectResult};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Number of interleaved 8-bit samples per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Channels {
    Gray = 1,
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    pub fn count(&self) -> usize {
        u8::from(*self) as usize
    }
}

/// Row-major, interleaved 8-bit raster.
///
/// Pipeline stages take the image by value and hand back their result, so an
/// image is only ever owned by the stage working on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: Channels,
    samples: Vec<u8>,
}

impl RasterImage {
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        samples: Vec<u8>,
    ) -> ImageEffectResult<Self> {
        let expected = width as usize * height as usize * channels.count();
        if samples.len() != expected {
            return Err(ImageEffectError::InvalidImage(format!(
                "{width}x{height}x{} expects {expected} samples, got {}",
                channels.count(),
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Image with every pixel set to `pixel`, which must hold `channels` samples.
    pub fn filled(
        width: u32,
        height: u32,
        channels: Channels,
        pixel: &[u8],
    ) -> ImageEffectResult<Self> {
        if pixel.len() != channels.count() {
            return Err(ImageEffectError::InvalidParameter(format!(
                "pixel has {} samples, expected {}",
                pixel.len(),
                channels.count()
            )));
        }

        let samples = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * channels.count())
            .collect();

        Self::new(width, height, channels, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let c = self.channels.count();
        let start = (y as usize * self.width as usize + x as usize) * c;
        Some(&self.samples[start..start + c])
    }

    /// Same raster re-laid out as 3-channel RGB. Alpha is dropped and gray is
    /// replicated into every channel.
    pub fn into_rgb(self) -> Self {
        let samples = match self.channels {
            Channels::Rgb => return self,
            Channels::Gray => self.samples.iter().flat_map(|&v| [v, v, v]).collect(),
            Channels::Rgba => self
                .samples
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect(),
        };

        Self {
            width: self.width,
            height: self.height,
            channels: Channels::Rgb,
            samples,
        }
    }

    /// Wraps any decoded image, normalizing the sample depth to 8 bits.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(img) => img.into(),
            DynamicImage::ImageRgb8(img) => img.into(),
            DynamicImage::ImageRgba8(img) => img.into(),
            other if other.color().has_alpha() => other.to_rgba8().into(),
            other if other.color().channel_count() < 3 => other.to_luma8().into(),
            other => other.to_rgb8().into(),
        }
    }

    pub fn to_dynamic(&self) -> ImageEffectResult<DynamicImage> {
        let (w, h) = self.dimensions();
        let samples = self.samples.clone();
        let image = match self.channels {
            Channels::Gray => GrayImage::from_raw(w, h, samples).map(DynamicImage::ImageLuma8),
            Channels::Rgb => RgbImage::from_raw(w, h, samples).map(DynamicImage::ImageRgb8),
            Channels::Rgba => RgbaImage::from_raw(w, h, samples).map(DynamicImage::ImageRgba8),
        };

        image.ok_or_else(|| {
            ImageEffectError::InvalidImage(format!("buffer does not match {w}x{h}"))
        })
    }
}

impl From<GrayImage> for RasterImage {
    fn from(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Gray,
            samples: img.into_raw(),
        }
    }
}

impl From<RgbImage> for RasterImage {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgb,
            samples: img.into_raw(),
        }
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgba,
            samples: img.into_raw(),
        }
    }
}

impl TryFrom<RasterImage> for RgbImage {
    type Error = ImageEffectError;

    fn try_from(img: RasterImage) -> ImageEffectResult<Self> {
        if img.channels != Channels::Rgb {
            return Err(ImageEffectError::UnsupportedFormat(format!(
                "expected 3 channels, got {}",
                img.channels.count()
            )));
        }

        let (w, h) = img.dimensions();
        RgbImage::from_raw(w, h, img.samples)
            .ok_or_else(|| ImageEffectError::InvalidImage(format!("buffer does not match {w}x{h}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = RasterImage::new(2, 2, Channels::Rgb, vec![0; 11]).unwrap_err();
        assert!(matches!(err, ImageEffectError::InvalidImage(_)));
    }

    #[test]
    fn test_channels_from_count() {
        assert_eq!(Channels::try_from(3u8).unwrap(), Channels::Rgb);
        assert_eq!(Channels::Rgba.count(), 4);
        assert!(Channels::try_from(2u8).is_err());
    }

    #[test]
    fn test_filled_and_pixel() {
        let img = RasterImage::filled(3, 2, Channels::Rgb, &[1, 2, 3]).unwrap();
        assert_eq!(img.samples().len(), 18);
        assert_eq!(img.pixel(2, 1), Some(&[1u8, 2, 3][..]));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn test_into_rgb() {
        let gray = RasterImage::new(2, 1, Channels::Gray, vec![7, 9]).unwrap();
        assert_eq!(gray.into_rgb().samples(), &[7, 7, 7, 9, 9, 9]);

        let rgba = RasterImage::new(1, 1, Channels::Rgba, vec![1, 2, 3, 4]).unwrap();
        let rgb = rgba.into_rgb();
        assert_eq!(rgb.channels(), Channels::Rgb);
        assert_eq!(rgb.samples(), &[1, 2, 3]);
    }

    #[test]
    fn test_dynamic_conversion() {
        let img = RasterImage::filled(4, 3, Channels::Rgba, &[10, 20, 30, 40]).unwrap();
        let back = RasterImage::from_dynamic(img.to_dynamic().unwrap());
        assert_eq!(back, img);

        let luma16 = DynamicImage::ImageLuma16(image::ImageBuffer::new(2, 2));
        assert_eq!(RasterImage::from_dynamic(luma16).channels(), Channels::Gray);
    }

    #[test]
    fn test_try_into_rgb_image() {
        let gray = RasterImage::filled(1, 1, Channels::Gray, &[0]).unwrap();
        assert!(RgbImage::try_from(gray).is_err());

        let rgb = RasterImage::filled(2, 2, Channels::Rgb, &[5, 6, 7]).unwrap();
        let img = RgbImage::try_from(rgb).unwrap();
        assert_eq!(img.get_pixel(1, 1).0, [5, 6, 7]);
    }
}
